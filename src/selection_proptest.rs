//! Property-based tests for repository URL decomposition, removal
//! selection and closing pull requests below a number.

#[cfg(test)]
mod proptest_tests {
    use std::collections::BTreeMap;

    use crate::filter::{name_matches, RepositoryFilter};
    use crate::options::ScmContext;
    use crate::pull_request::{close, CloseOptions};
    use crate::repository::parse_repository_url;
    use crate::scm::fake::FakeProvider;
    use crate::scm::{ClientConfig, PullRequest, Repository, ScmKind};
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn segment() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9-]{0,15}"
    }

    // ============================================================================
    // parse_repository_url property tests
    // ============================================================================

    proptest! {
        /// Property: the last two path segments are always owner and name
        #[test]
        fn url_last_segments_are_owner_and_name(
            host in "[a-z]{1,10}(\\.[a-z]{2,5})?",
            prefix in proptest::collection::vec(segment(), 0..3),
            owner in segment(),
            name in segment(),
            dot_git in any::<bool>(),
            trailing_slash in any::<bool>(),
        ) {
            let mut path = prefix.clone();
            path.push(owner.clone());
            path.push(format!("{}{}", name, if dot_git { ".git" } else { "" }));
            let url = format!(
                "https://{}/{}{}",
                host,
                path.join("/"),
                if trailing_slash { "/" } else { "" }
            );

            let location = parse_repository_url(&url).unwrap();
            prop_assert_eq!(&location.owner, &owner);
            prop_assert_eq!(&location.name, &name);

            let mut server = format!("https://{}", host);
            if !prefix.is_empty() {
                server = format!("{}/{}", server, prefix.join("/"));
            }
            prop_assert_eq!(location.server, server);
        }

        /// Property: the decomposed server never ends with a slash
        #[test]
        fn url_server_has_no_trailing_slash(owner in segment(), name in segment()) {
            let url = format!("https://example.com/{}/{}/", owner, name);
            let location = parse_repository_url(&url).unwrap();
            prop_assert!(!location.server.ends_with('/'));
        }
    }

    // ============================================================================
    // Removal selection property tests
    // ============================================================================

    fn repo(namespace: &str, name: &str, age_days: i64) -> Repository {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        Repository {
            id: name.to_string(),
            namespace: namespace.to_string(),
            name: name.to_string(),
            full_name: format!("{}/{}", namespace, name),
            private: false,
            clone: String::new(),
            link: String::new(),
            created: now - Duration::days(age_days),
        }
    }

    proptest! {
        /// Property: a repository is never selected for a different owner
        #[test]
        fn selection_requires_owner(owner in segment(), other in segment(), name in segment()) {
            prop_assume!(owner != other);
            let filter = RepositoryFilter { owner, ..Default::default() };
            prop_assert!(!filter.matches(&repo(&other, &name, 10)));
        }

        /// Property: selection by cutoff is exactly `age >= cutoff age`
        #[test]
        fn selection_by_cutoff(age in 0i64..400, cutoff_days in 0i64..400) {
            let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
            let filter = RepositoryFilter {
                owner: "myorg".to_string(),
                created_before: Some(now - Duration::days(cutoff_days)),
                ..Default::default()
            };
            prop_assert_eq!(filter.matches(&repo("myorg", "r", age)), age >= cutoff_days);
        }

        /// Property: an exclude that occurs in the name always wins
        #[test]
        fn exclude_always_wins(name in segment(), start in 0usize..16, len in 1usize..4) {
            let start = start.min(name.len() - 1);
            let end = (start + len).min(name.len());
            let excludes = vec![name[start..end].to_string()];
            let includes = vec![name.clone()];
            prop_assert!(!name_matches(&name, &includes, &excludes));
        }
    }

    // ============================================================================
    // Closing pull requests below a number
    // ============================================================================

    /// Seeds `myorg/myrepo` with the given numbers and their closed state and
    /// returns a context whose listings come back in the requested order.
    fn seeded(prs: &BTreeMap<u64, bool>, newest_first: bool) -> (FakeProvider, ScmContext) {
        let fake = FakeProvider::new("https://github.com", "me");
        fake.with_data(|data| {
            data.newest_first = newest_first;
            data.pull_requests.insert(
                "myorg/myrepo".to_string(),
                prs.iter()
                    .map(|(number, closed)| PullRequest {
                        number: *number,
                        closed: *closed,
                        ..Default::default()
                    })
                    .collect(),
            );
        })
        .unwrap();
        let ctx = ScmContext::with_client(
            fake.client(),
            ClientConfig {
                kind: ScmKind::Fake,
                server: "https://github.com".to_string(),
                token: "dummytoken".to_string(),
                username: "me".to_string(),
            },
        )
        .unwrap();
        (fake, ctx)
    }

    proptest! {
        /// Property: exactly the open pull requests numbered below the cutoff
        /// are closed, in the order the provider listed them
        #[test]
        fn close_before_closes_lower_numbers_in_listing_order(
            prs in proptest::collection::btree_map(1u64..60, any::<bool>(), 0..25),
            cutoff in 1u64..70,
            newest_first in any::<bool>(),
        ) {
            let (fake, ctx) = seeded(&prs, newest_first);
            let opts = CloseOptions {
                owner: "myorg".to_string(),
                name: "myrepo".to_string(),
                before: Some(cutoff),
                ..Default::default()
            };

            let closed = close(&ctx, &opts).unwrap();

            let mut expected: Vec<u64> = prs
                .iter()
                .filter(|(number, closed)| !**closed && **number < cutoff)
                .map(|(number, _)| *number)
                .collect();
            if newest_first {
                expected.reverse();
            }
            prop_assert_eq!(&closed, &expected);

            let close_calls: Vec<String> = fake
                .calls()
                .unwrap()
                .into_iter()
                .filter(|call| call.starts_with("pull_requests.close"))
                .collect();
            let expected_calls: Vec<String> = expected
                .iter()
                .map(|number| format!("pull_requests.close myorg/myrepo #{}", number))
                .collect();
            prop_assert_eq!(close_calls, expected_calls);

            let still_open: Vec<u64> = fake
                .with_data(|data| {
                    data.pull_requests["myorg/myrepo"]
                        .iter()
                        .filter(|pr| !pr.closed)
                        .map(|pr| pr.number)
                        .collect()
                })
                .unwrap();
            prop_assert!(still_open.iter().all(|number| *number >= cutoff));
        }
    }
}
