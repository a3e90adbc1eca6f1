//! GitHub REST v3 provider.
//!
//! `https://github.com` talks to `https://api.github.com`; any other server
//! is treated as GitHub Enterprise and served from `<server>/api/v3`.

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::http::{collect_pages, encode_segment, ApiClient, TokenAuth};
use super::{
    ListOptions, PullRequest, PullRequestBranch, PullRequestInput, PullRequestListOptions,
    PullRequestService, Release, ReleaseInput, ReleaseService, Repository, RepositoryInput,
    RepositoryService, User, UserService,
};
use crate::error::Result;

const MAX_PER_PAGE: u32 = 100;

/// Returns the REST API root for a GitHub web URL.
pub fn api_url(server: &str) -> String {
    let server = server.trim_end_matches('/');
    match url::Url::parse(server) {
        Ok(url) if matches!(url.host_str(), Some("github.com") | Some("www.github.com")) => {
            "https://api.github.com".to_string()
        }
        Ok(url) if url.host_str().is_some_and(|h| h.starts_with("api.")) => server.to_string(),
        _ if server.is_empty() => "https://api.github.com".to_string(),
        _ if server.ends_with("/api/v3") => server.to_string(),
        _ => format!("{}/api/v3", server),
    }
}

/// GitHub and GitHub Enterprise.
#[derive(Debug, Clone)]
pub struct GitHub {
    api: ApiClient,
}

impl GitHub {
    pub fn new(server: &str, token: &str) -> Result<Self> {
        let api = ApiClient::new(
            &api_url(server),
            token,
            TokenAuth::Bearer,
            "application/vnd.github+json",
        )?;
        Ok(Self { api })
    }

    /// The API root this client sends requests to.
    pub fn api_base(&self) -> &str {
        self.api.base()
    }
}

#[derive(Debug, Deserialize)]
struct GhUser {
    login: String,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GhBranch {
    #[serde(rename = "ref")]
    r#ref: String,
    #[serde(default)]
    sha: String,
}

#[derive(Debug, Deserialize)]
struct GhPullRequest {
    number: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    body: Option<String>,
    state: String,
    #[serde(default)]
    merged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    html_url: String,
    head: GhBranch,
    base: GhBranch,
    #[serde(default)]
    user: Option<GhUser>,
}

impl From<GhPullRequest> for PullRequest {
    fn from(pr: GhPullRequest) -> Self {
        PullRequest {
            number: pr.number,
            title: pr.title,
            body: pr.body.unwrap_or_default(),
            head: PullRequestBranch {
                r#ref: pr.head.r#ref,
                sha: pr.head.sha,
            },
            base: PullRequestBranch {
                r#ref: pr.base.r#ref,
                sha: pr.base.sha,
            },
            closed: pr.state == "closed",
            merged: pr.merged_at.is_some(),
            link: pr.html_url,
            author: pr.user.map(|u| u.login).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct GhPullRequestCreate<'a> {
    title: &'a str,
    body: &'a str,
    head: &'a str,
    base: &'a str,
}

#[derive(Debug, Serialize)]
struct GhPullRequestPatch<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    base: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct GhRelease {
    id: u64,
    tag_name: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    prerelease: bool,
    #[serde(default)]
    draft: bool,
    #[serde(default)]
    html_url: String,
}

impl From<GhRelease> for Release {
    fn from(r: GhRelease) -> Self {
        Release {
            id: r.id,
            tag: r.tag_name,
            title: r.name.unwrap_or_default(),
            description: r.body.unwrap_or_default(),
            prerelease: r.prerelease,
            draft: r.draft,
            link: r.html_url,
        }
    }
}

#[derive(Debug, Serialize)]
struct GhReleaseInput<'a> {
    tag_name: &'a str,
    name: &'a str,
    body: &'a str,
    prerelease: bool,
    draft: bool,
}

impl<'a> From<&'a ReleaseInput> for GhReleaseInput<'a> {
    fn from(input: &'a ReleaseInput) -> Self {
        GhReleaseInput {
            tag_name: &input.tag,
            name: &input.title,
            body: &input.description,
            prerelease: input.prerelease,
            draft: input.draft,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GhOwner {
    login: String,
}

#[derive(Debug, Deserialize)]
struct GhRepository {
    id: u64,
    name: String,
    full_name: String,
    owner: GhOwner,
    #[serde(default)]
    private: bool,
    #[serde(default)]
    clone_url: String,
    #[serde(default)]
    html_url: String,
    created_at: DateTime<Utc>,
}

impl From<GhRepository> for Repository {
    fn from(r: GhRepository) -> Self {
        Repository {
            id: r.id.to_string(),
            namespace: r.owner.login,
            name: r.name,
            full_name: r.full_name,
            private: r.private,
            clone: r.clone_url,
            link: r.html_url,
            created: r.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct GhRepositoryCreate<'a> {
    name: &'a str,
    description: &'a str,
    homepage: &'a str,
    private: bool,
}

fn pull_request_state(opts: &PullRequestListOptions) -> &'static str {
    match (opts.open, opts.closed) {
        (true, false) => "open",
        (false, true) => "closed",
        _ => "all",
    }
}

impl PullRequestService for GitHub {
    fn list(&self, repo: &str, opts: &PullRequestListOptions) -> Result<Vec<PullRequest>> {
        let state = pull_request_state(opts);
        let prs: Vec<GhPullRequest> =
            collect_pages(opts.page, opts.size, MAX_PER_PAGE, |page, per_page| {
                self.api.get(&format!(
                    "repos/{}/pulls?state={}&per_page={}&page={}",
                    repo, state, per_page, page
                ))
            })?;
        Ok(prs.into_iter().map(PullRequest::from).collect())
    }

    fn create(&self, repo: &str, input: &PullRequestInput) -> Result<PullRequest> {
        let body = GhPullRequestCreate {
            title: &input.title,
            body: &input.body,
            head: &input.head,
            base: &input.base,
        };
        let pr: GhPullRequest =
            self.api
                .send(Method::POST, &format!("repos/{}/pulls", repo), &body)?;
        Ok(pr.into())
    }

    fn update(&self, repo: &str, number: u64, input: &PullRequestInput) -> Result<PullRequest> {
        let body = GhPullRequestPatch {
            title: Some(input.title.as_str()).filter(|t| !t.is_empty()),
            body: Some(input.body.as_str()),
            base: Some(input.base.as_str()).filter(|b| !b.is_empty()),
            state: None,
        };
        let pr: GhPullRequest = self.api.send(
            Method::PATCH,
            &format!("repos/{}/pulls/{}", repo, number),
            &body,
        )?;
        Ok(pr.into())
    }

    fn close(&self, repo: &str, number: u64) -> Result<()> {
        let body = GhPullRequestPatch {
            title: None,
            body: None,
            base: None,
            state: Some("closed"),
        };
        let _: GhPullRequest = self.api.send(
            Method::PATCH,
            &format!("repos/{}/pulls/{}", repo, number),
            &body,
        )?;
        Ok(())
    }
}

impl ReleaseService for GitHub {
    fn find_by_tag(&self, repo: &str, tag: &str) -> Result<Release> {
        let release: GhRelease = self.api.get(&format!(
            "repos/{}/releases/tags/{}",
            repo,
            encode_segment(tag)
        ))?;
        Ok(release.into())
    }

    fn create(&self, repo: &str, input: &ReleaseInput) -> Result<Release> {
        let release: GhRelease = self.api.send(
            Method::POST,
            &format!("repos/{}/releases", repo),
            &GhReleaseInput::from(input),
        )?;
        Ok(release.into())
    }

    fn update(&self, repo: &str, id: u64, input: &ReleaseInput) -> Result<Release> {
        let release: GhRelease = self.api.send(
            Method::PATCH,
            &format!("repos/{}/releases/{}", repo, id),
            &GhReleaseInput::from(input),
        )?;
        Ok(release.into())
    }
}

impl RepositoryService for GitHub {
    fn list(&self, opts: &ListOptions) -> Result<Vec<Repository>> {
        let repos: Vec<GhRepository> =
            collect_pages(opts.page, opts.size, MAX_PER_PAGE, |page, per_page| {
                self.api.get(&format!(
                    "user/repos?affiliation=owner&per_page={}&page={}",
                    per_page, page
                ))
            })?;
        Ok(repos.into_iter().map(Repository::from).collect())
    }

    fn list_organisation(&self, org: &str, opts: &ListOptions) -> Result<Vec<Repository>> {
        let repos: Vec<GhRepository> =
            collect_pages(opts.page, opts.size, MAX_PER_PAGE, |page, per_page| {
                self.api.get(&format!(
                    "orgs/{}/repos?per_page={}&page={}",
                    org, per_page, page
                ))
            })?;
        Ok(repos.into_iter().map(Repository::from).collect())
    }

    fn create(&self, input: &RepositoryInput) -> Result<Repository> {
        let path = if input.namespace.is_empty() {
            "user/repos".to_string()
        } else {
            format!("orgs/{}/repos", input.namespace)
        };
        let body = GhRepositoryCreate {
            name: &input.name,
            description: &input.description,
            homepage: &input.homepage,
            private: input.private,
        };
        let repo: GhRepository = self.api.send(Method::POST, &path, &body)?;
        Ok(repo.into())
    }

    fn delete(&self, repo: &str) -> Result<()> {
        self.api.delete(&format!("repos/{}", repo))
    }
}

impl UserService for GitHub {
    fn find(&self) -> Result<User> {
        let user: GhUser = self.api.get("user")?;
        Ok(User {
            name: user.name.unwrap_or_else(|| user.login.clone()),
            login: user.login,
        })
    }
}
