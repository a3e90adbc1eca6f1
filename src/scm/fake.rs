//! In-memory provider.
//!
//! [`FakeProvider`] keeps pull requests, releases and repositories in a
//! shared [`FakeData`] so every service of a [`Client`] built from it sees the
//! same state. It records each call it serves and can be told to fail
//! selected operations, which lets tests exercise the soft-failure paths of
//! the commands.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use super::{
    join, Client, ListOptions, PullRequest, PullRequestBranch, PullRequestInput,
    PullRequestListOptions, PullRequestService, Release, ReleaseInput, ReleaseService, Repository,
    RepositoryInput, RepositoryService, ScmKind, User, UserService,
};
use crate::error::{Error, Result};

/// Operations a [`FakeProvider`] should fail.
#[derive(Debug, Clone, Default)]
pub struct FakeFailures {
    /// Fail every pull request listing.
    pub list_pull_requests: bool,
    /// Pull request numbers whose close call fails.
    pub close_pull_requests: Vec<u64>,
    /// Repository full names whose delete call fails.
    pub delete_repositories: Vec<String>,
}

/// State shared by the services of a [`FakeProvider`].
#[derive(Debug, Default)]
pub struct FakeData {
    pub pull_requests: BTreeMap<String, Vec<PullRequest>>,
    pub releases: BTreeMap<String, Vec<Release>>,
    pub repositories: Vec<Repository>,
    pub failures: FakeFailures,
    /// List pull requests highest number first, as GitHub and GitLab do by
    /// default.
    pub newest_first: bool,
    /// One entry per served call, e.g. `pull_requests.update myorg/myrepo #1`.
    pub calls: Vec<String>,
    next_release_id: u64,
}

/// A provider that lives entirely in memory.
#[derive(Debug, Clone)]
pub struct FakeProvider {
    server: String,
    login: String,
    data: Arc<Mutex<FakeData>>,
}

impl FakeProvider {
    /// Creates an empty provider. An empty `login` becomes `fake-user`.
    pub fn new(server: &str, login: &str) -> Self {
        let login = if login.is_empty() { "fake-user" } else { login };
        Self {
            server: server.trim_end_matches('/').to_string(),
            login: login.to_string(),
            data: Arc::new(Mutex::new(FakeData::default())),
        }
    }

    /// Returns a client backed by this provider's shared state.
    pub fn client(&self) -> Client {
        Client::from_provider(ScmKind::Fake, &self.server, Arc::new(self.clone()))
    }

    /// Runs `f` with mutable access to the shared state.
    pub fn with_data<R>(&self, f: impl FnOnce(&mut FakeData) -> R) -> Result<R> {
        let mut data = self.lock()?;
        Ok(f(&mut data))
    }

    /// Returns the calls served so far.
    pub fn calls(&self) -> Result<Vec<String>> {
        self.with_data(|data| data.calls.clone())
    }

    /// Adds a repository as-is, keeping its `created` timestamp.
    pub fn insert_repository(&self, repository: Repository) -> Result<()> {
        self.with_data(|data| data.repositories.push(repository))
    }

    /// Builds a repository in this provider's URL scheme.
    pub fn repository(&self, namespace: &str, name: &str) -> Repository {
        let full_name = join(namespace, name);
        Repository {
            id: full_name.clone(),
            namespace: namespace.to_string(),
            name: name.to_string(),
            clone: format!("{}/{}.git", self.server, full_name),
            link: format!("{}/{}", self.server, full_name),
            full_name,
            private: false,
            created: Utc::now(),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, FakeData>> {
        self.data.lock().map_err(|_| Error::LockPoisoned {
            context: "fake provider state".to_string(),
        })
    }
}

fn page<T: Clone>(items: &[T], page: u32, size: u32) -> Vec<T> {
    if size == 0 {
        return if page > 1 { Vec::new() } else { items.to_vec() };
    }
    let start = (page.max(1) as usize - 1) * size as usize;
    items
        .iter()
        .skip(start)
        .take(size as usize)
        .cloned()
        .collect()
}

impl PullRequestService for FakeProvider {
    fn list(&self, repo: &str, opts: &PullRequestListOptions) -> Result<Vec<PullRequest>> {
        let mut data = self.lock()?;
        data.calls.push(format!("pull_requests.list {}", repo));
        if data.failures.list_pull_requests {
            return Err(Error::Api {
                status: 503,
                message: "service unavailable".to_string(),
            });
        }
        let mut matching: Vec<PullRequest> = data
            .pull_requests
            .get(repo)
            .map(|prs| {
                prs.iter()
                    .filter(|pr| match (opts.open, opts.closed) {
                        (true, false) => !pr.closed,
                        (false, true) => pr.closed,
                        _ => true,
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        if data.newest_first {
            matching.reverse();
        }
        Ok(page(&matching, opts.page, opts.size))
    }

    fn create(&self, repo: &str, input: &PullRequestInput) -> Result<PullRequest> {
        let mut data = self.lock()?;
        data.calls.push(format!("pull_requests.create {}", repo));
        let prs = data.pull_requests.entry(repo.to_string()).or_default();
        if prs
            .iter()
            .any(|pr| !pr.closed && pr.head.r#ref == input.head && pr.base.r#ref == input.base)
        {
            return Err(Error::Conflict {
                message: format!(
                    "a pull request already exists for {}:{} into {}",
                    repo, input.head, input.base
                ),
            });
        }
        let number = prs.len() as u64 + 1;
        let pr = PullRequest {
            number,
            title: input.title.clone(),
            body: input.body.clone(),
            head: PullRequestBranch {
                r#ref: input.head.clone(),
                sha: String::new(),
            },
            base: PullRequestBranch {
                r#ref: input.base.clone(),
                sha: String::new(),
            },
            closed: false,
            merged: false,
            link: format!("{}/{}/pull/{}", self.server, repo, number),
            author: self.login.clone(),
        };
        prs.push(pr.clone());
        Ok(pr)
    }

    fn update(&self, repo: &str, number: u64, input: &PullRequestInput) -> Result<PullRequest> {
        let mut data = self.lock()?;
        data.calls
            .push(format!("pull_requests.update {} #{}", repo, number));
        let pr = data
            .pull_requests
            .get_mut(repo)
            .and_then(|prs| prs.iter_mut().find(|pr| pr.number == number))
            .ok_or_else(|| Error::NotFound {
                resource: format!("pull request {} #{}", repo, number),
            })?;
        if !input.title.is_empty() {
            pr.title = input.title.clone();
        }
        pr.body = input.body.clone();
        if !input.base.is_empty() {
            pr.base.r#ref = input.base.clone();
        }
        Ok(pr.clone())
    }

    fn close(&self, repo: &str, number: u64) -> Result<()> {
        let mut data = self.lock()?;
        data.calls.push(format!("pull_requests.close {} #{}", repo, number));
        if data.failures.close_pull_requests.contains(&number) {
            return Err(Error::Api {
                status: 500,
                message: format!("cannot close #{}", number),
            });
        }
        let pr = data
            .pull_requests
            .get_mut(repo)
            .and_then(|prs| prs.iter_mut().find(|pr| pr.number == number))
            .ok_or_else(|| Error::NotFound {
                resource: format!("pull request {} #{}", repo, number),
            })?;
        pr.closed = true;
        Ok(())
    }
}

impl ReleaseService for FakeProvider {
    fn find_by_tag(&self, repo: &str, tag: &str) -> Result<Release> {
        let mut data = self.lock()?;
        data.calls.push(format!("releases.find_by_tag {} {}", repo, tag));
        data.releases
            .get(repo)
            .and_then(|releases| releases.iter().find(|r| r.tag == tag))
            .cloned()
            .ok_or_else(|| Error::NotFound {
                resource: format!("release {} {}", repo, tag),
            })
    }

    fn create(&self, repo: &str, input: &ReleaseInput) -> Result<Release> {
        let mut data = self.lock()?;
        data.calls.push(format!("releases.create {} {}", repo, input.tag));
        data.next_release_id += 1;
        let id = data.next_release_id;
        let releases = data.releases.entry(repo.to_string()).or_default();
        if releases.iter().any(|r| r.tag == input.tag) {
            return Err(Error::Conflict {
                message: format!("release {} already exists in {}", input.tag, repo),
            });
        }
        let release = Release {
            id,
            tag: input.tag.clone(),
            title: input.title.clone(),
            description: input.description.clone(),
            prerelease: input.prerelease,
            draft: input.draft,
            link: format!("{}/{}/releases/tag/{}", self.server, repo, input.tag),
        };
        releases.push(release.clone());
        Ok(release)
    }

    fn update(&self, repo: &str, id: u64, input: &ReleaseInput) -> Result<Release> {
        let mut data = self.lock()?;
        data.calls.push(format!("releases.update {} {}", repo, id));
        let release = data
            .releases
            .get_mut(repo)
            .and_then(|releases| releases.iter_mut().find(|r| r.id == id))
            .ok_or_else(|| Error::NotFound {
                resource: format!("release {} id {}", repo, id),
            })?;
        if !input.tag.is_empty() {
            release.tag = input.tag.clone();
        }
        release.title = input.title.clone();
        release.description = input.description.clone();
        release.prerelease = input.prerelease;
        release.draft = input.draft;
        Ok(release.clone())
    }
}

impl RepositoryService for FakeProvider {
    fn list(&self, opts: &ListOptions) -> Result<Vec<Repository>> {
        let mut data = self.lock()?;
        data.calls.push(format!("repositories.list page {}", opts.page));
        let owned: Vec<Repository> = data
            .repositories
            .iter()
            .filter(|r| r.namespace == self.login)
            .cloned()
            .collect();
        Ok(page(&owned, opts.page, opts.size))
    }

    fn list_organisation(&self, org: &str, opts: &ListOptions) -> Result<Vec<Repository>> {
        let mut data = self.lock()?;
        data.calls.push(format!(
            "repositories.list_organisation {} page {}",
            org, opts.page
        ));
        let owned: Vec<Repository> = data
            .repositories
            .iter()
            .filter(|r| r.namespace == org)
            .cloned()
            .collect();
        Ok(page(&owned, opts.page, opts.size))
    }

    fn create(&self, input: &RepositoryInput) -> Result<Repository> {
        let namespace = if input.namespace.is_empty() {
            self.login.clone()
        } else {
            input.namespace.clone()
        };
        let mut repository = self.repository(&namespace, &input.name);
        repository.private = input.private;

        let mut data = self.lock()?;
        data.calls
            .push(format!("repositories.create {}", repository.full_name));
        if data
            .repositories
            .iter()
            .any(|r| r.full_name == repository.full_name)
        {
            return Err(Error::Conflict {
                message: format!("repository {} already exists", repository.full_name),
            });
        }
        data.repositories.push(repository.clone());
        Ok(repository)
    }

    fn delete(&self, repo: &str) -> Result<()> {
        let mut data = self.lock()?;
        data.calls.push(format!("repositories.delete {}", repo));
        if data.failures.delete_repositories.iter().any(|r| r == repo) {
            return Err(Error::Api {
                status: 403,
                message: format!("not allowed to delete {}", repo),
            });
        }
        let before = data.repositories.len();
        data.repositories.retain(|r| r.full_name != repo);
        if data.repositories.len() == before {
            return Err(Error::NotFound {
                resource: format!("repository {}", repo),
            });
        }
        Ok(())
    }
}

impl UserService for FakeProvider {
    fn find(&self) -> Result<User> {
        Ok(User {
            login: self.login.clone(),
            name: self.login.clone(),
        })
    }
}
