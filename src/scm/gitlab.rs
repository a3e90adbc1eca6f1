//! GitLab REST v4 provider.
//!
//! Merge requests are exposed as pull requests, keyed by their project-scoped
//! `iid`. Projects and groups are addressed by their URL-encoded full path.
//! GitLab identifies releases by tag rather than by a numeric id, so
//! [`Release::id`] is always `0` here and updates use the tag from the
//! [`ReleaseInput`]. GitLab derives the prerelease state itself; the
//! `prerelease` flag is reported as `upcoming_release` and ignored on writes.

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

/// Returns the REST API root for a GitLab web URL.
pub fn api_url(server: &str) -> String {
    let server = server.trim_end_matches('/');
    if server.is_empty() {
        "https://gitlab.com/api/v4".to_string()
    } else if server.ends_with("/api/v4") {
        server.to_string()
    } else {
        format!("{}/api/v4", server)
    }
}

/// GitLab.com and self-managed GitLab.
#[derive(Debug, Clone)]
pub struct GitLab {
    api: ApiClient,
}

impl GitLab {
    pub fn new(server: &str, token: &str) -> Result<Self> {
        let api = ApiClient::new(
            &api_url(server),
            token,
            TokenAuth::Header("private-token"),
            "application/json",
        )?;
        Ok(Self { api })
    }

    /// The API root this client sends requests to.
    pub fn api_base(&self) -> &str {
        self.api.base()
    }
}

fn project_path(repo: &str) -> String {
    format!("projects/{}", encode_segment(repo))
}

#[derive(Debug, Deserialize)]
struct GlUser {
    username: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct GlMergeRequest {
    iid: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: Option<String>,
    state: String,
    source_branch: String,
    target_branch: String,
    #[serde(default)]
    sha: Option<String>,
    #[serde(default)]
    web_url: String,
    #[serde(default)]
    author: Option<GlUser>,
}

impl From<GlMergeRequest> for PullRequest {
    fn from(mr: GlMergeRequest) -> Self {
        PullRequest {
            number: mr.iid,
            title: mr.title,
            body: mr.description.unwrap_or_default(),
            head: PullRequestBranch {
                r#ref: mr.source_branch,
                sha: mr.sha.unwrap_or_default(),
            },
            base: PullRequestBranch {
                r#ref: mr.target_branch,
                sha: String::new(),
            },
            closed: mr.state == "closed" || mr.state == "merged",
            merged: mr.state == "merged",
            link: mr.web_url,
            author: mr.author.map(|a| a.username).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct GlMergeRequestCreate<'a> {
    source_branch: &'a str,
    target_branch: &'a str,
    title: &'a str,
    description: &'a str,
}

#[derive(Debug, Serialize)]
struct GlMergeRequestUpdate<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_branch: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state_event: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct GlReleaseLinks {
    #[serde(rename = "self", default)]
    self_link: String,
}

#[derive(Debug, Deserialize)]
struct GlRelease {
    tag_name: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    upcoming_release: bool,
    #[serde(rename = "_links", default)]
    links: Option<GlReleaseLinks>,
}

impl From<GlRelease> for Release {
    fn from(r: GlRelease) -> Self {
        Release {
            id: 0,
            tag: r.tag_name,
            title: r.name.unwrap_or_default(),
            description: r.description.unwrap_or_default(),
            prerelease: r.upcoming_release,
            draft: false,
            link: r.links.map(|l| l.self_link).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct GlReleaseInput<'a> {
    tag_name: &'a str,
    name: &'a str,
    description: &'a str,
}

impl<'a> From<&'a ReleaseInput> for GlReleaseInput<'a> {
    fn from(input: &'a ReleaseInput) -> Self {
        GlReleaseInput {
            tag_name: &input.tag,
            name: &input.title,
            description: &input.description,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GlNamespace {
    id: u64,
    full_path: String,
}

#[derive(Debug, Deserialize)]
struct GlProject {
    id: u64,
    path: String,
    path_with_namespace: String,
    namespace: GlNamespace,
    #[serde(default)]
    visibility: String,
    #[serde(default)]
    http_url_to_repo: String,
    #[serde(default)]
    web_url: String,
    created_at: DateTime<Utc>,
}

impl From<GlProject> for Repository {
    fn from(p: GlProject) -> Self {
        Repository {
            id: p.id.to_string(),
            namespace: p.namespace.full_path,
            name: p.path,
            full_name: p.path_with_namespace,
            private: p.visibility != "public",
            clone: p.http_url_to_repo,
            link: p.web_url,
            created: p.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct GlProjectCreate<'a> {
    name: &'a str,
    path: &'a str,
    description: &'a str,
    visibility: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace_id: Option<u64>,
}

fn merge_request_state(opts: &PullRequestListOptions) -> &'static str {
    match (opts.open, opts.closed) {
        (true, false) => "opened",
        (false, true) => "closed",
        _ => "all",
    }
}

impl PullRequestService for GitLab {
    fn list(&self, repo: &str, opts: &PullRequestListOptions) -> Result<Vec<PullRequest>> {
        let state = merge_request_state(opts);
        let mrs: Vec<GlMergeRequest> =
            collect_pages(opts.page, opts.size, MAX_PER_PAGE, |page, per_page| {
                self.api.get(&format!(
                    "{}/merge_requests?state={}&per_page={}&page={}",
                    project_path(repo),
                    state,
                    per_page,
                    page
                ))
            })?;
        Ok(mrs.into_iter().map(PullRequest::from).collect())
    }

    fn create(&self, repo: &str, input: &PullRequestInput) -> Result<PullRequest> {
        let body = GlMergeRequestCreate {
            source_branch: &input.head,
            target_branch: &input.base,
            title: &input.title,
            description: &input.body,
        };
        let mr: GlMergeRequest = self.api.send(
            Method::POST,
            &format!("{}/merge_requests", project_path(repo)),
            &body,
        )?;
        Ok(mr.into())
    }

    fn update(&self, repo: &str, number: u64, input: &PullRequestInput) -> Result<PullRequest> {
        let body = GlMergeRequestUpdate {
            title: Some(input.title.as_str()).filter(|t| !t.is_empty()),
            description: Some(input.body.as_str()),
            target_branch: Some(input.base.as_str()).filter(|b| !b.is_empty()),
            state_event: None,
        };
        let mr: GlMergeRequest = self.api.send(
            Method::PUT,
            &format!("{}/merge_requests/{}", project_path(repo), number),
            &body,
        )?;
        Ok(mr.into())
    }

    fn close(&self, repo: &str, number: u64) -> Result<()> {
        let body = GlMergeRequestUpdate {
            title: None,
            description: None,
            target_branch: None,
            state_event: Some("close"),
        };
        let _: GlMergeRequest = self.api.send(
            Method::PUT,
            &format!("{}/merge_requests/{}", project_path(repo), number),
            &body,
        )?;
        Ok(())
    }
}

impl ReleaseService for GitLab {
    fn find_by_tag(&self, repo: &str, tag: &str) -> Result<Release> {
        let release: GlRelease = self.api.get(&format!(
            "{}/releases/{}",
            project_path(repo),
            encode_segment(tag)
        ))?;
        Ok(release.into())
    }

    fn create(&self, repo: &str, input: &ReleaseInput) -> Result<Release> {
        let release: GlRelease = self.api.send(
            Method::POST,
            &format!("{}/releases", project_path(repo)),
            &GlReleaseInput::from(input),
        )?;
        Ok(release.into())
    }

    fn update(&self, repo: &str, _id: u64, input: &ReleaseInput) -> Result<Release> {
        let release: GlRelease = self.api.send(
            Method::PUT,
            &format!(
                "{}/releases/{}",
                project_path(repo),
                encode_segment(&input.tag)
            ),
            &GlReleaseInput::from(input),
        )?;
        Ok(release.into())
    }
}

impl RepositoryService for GitLab {
    fn list(&self, opts: &ListOptions) -> Result<Vec<Repository>> {
        let projects: Vec<GlProject> =
            collect_pages(opts.page, opts.size, MAX_PER_PAGE, |page, per_page| {
                self.api.get(&format!(
                    "projects?owned=true&per_page={}&page={}",
                    per_page, page
                ))
            })?;
        Ok(projects.into_iter().map(Repository::from).collect())
    }

    fn list_organisation(&self, org: &str, opts: &ListOptions) -> Result<Vec<Repository>> {
        let projects: Vec<GlProject> =
            collect_pages(opts.page, opts.size, MAX_PER_PAGE, |page, per_page| {
                self.api.get(&format!(
                    "groups/{}/projects?per_page={}&page={}",
                    encode_segment(org),
                    per_page,
                    page
                ))
            })?;
        Ok(projects.into_iter().map(Repository::from).collect())
    }

    fn create(&self, input: &RepositoryInput) -> Result<Repository> {
        let namespace_id = if input.namespace.is_empty() {
            None
        } else {
            let namespace: GlNamespace = self
                .api
                .get(&format!("namespaces/{}", encode_segment(&input.namespace)))?;
            log::debug!(
                "resolved namespace {} to id {}",
                namespace.full_path,
                namespace.id
            );
            Some(namespace.id)
        };
        let body = GlProjectCreate {
            name: &input.name,
            path: &input.name,
            description: &input.description,
            visibility: if input.private { "private" } else { "public" },
            namespace_id,
        };
        let project: GlProject = self.api.send(Method::POST, "projects", &body)?;
        Ok(project.into())
    }

    fn delete(&self, repo: &str) -> Result<()> {
        self.api.delete(&project_path(repo))
    }
}

impl UserService for GitLab {
    fn find(&self) -> Result<User> {
        let user: GlUser = self.api.get("user")?;
        Ok(User {
            login: user.username,
            name: user.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url() {
        assert_eq!(api_url("https://gitlab.com"), "https://gitlab.com/api/v4");
        assert_eq!(
            api_url("https://git.example.com/"),
            "https://git.example.com/api/v4"
        );
        assert_eq!(
            api_url("https://git.example.com/api/v4"),
            "https://git.example.com/api/v4"
        );
    }

    #[test]
    fn test_project_path_encodes_subgroups() {
        assert_eq!(
            project_path("group/sub/repo"),
            "projects/group%2Fsub%2Frepo"
        );
    }

    #[test]
    fn test_merge_request_mapping() {
        let json = r#"{
            "iid": 5,
            "title": "Fix",
            "description": "Drastically improve the product",
            "state": "merged",
            "source_branch": "some_feature_branch",
            "target_branch": "main",
            "sha": "abc",
            "web_url": "https://gitlab.com/myorg/myrepo/-/merge_requests/5",
            "author": {"username": "jdoe", "name": "J Doe"}
        }"#;
        let pr: PullRequest = serde_json::from_str::<GlMergeRequest>(json)
            .unwrap()
            .into();
        assert_eq!(pr.number, 5);
        assert_eq!(pr.head.r#ref, "some_feature_branch");
        assert_eq!(pr.base.r#ref, "main");
        assert!(pr.closed);
        assert!(pr.merged);
        assert_eq!(pr.author, "jdoe");
    }

    #[test]
    fn test_release_mapping_has_no_id() {
        let json = r#"{
            "tag_name": "v1.0.0",
            "name": "First",
            "description": null,
            "upcoming_release": true,
            "_links": {"self": "https://gitlab.com/myorg/myrepo/-/releases/v1.0.0"}
        }"#;
        let release: Release = serde_json::from_str::<GlRelease>(json).unwrap().into();
        assert_eq!(release.id, 0);
        assert_eq!(release.description, "");
        assert!(release.prerelease);
        assert_eq!(
            release.link,
            "https://gitlab.com/myorg/myrepo/-/releases/v1.0.0"
        );
    }

    #[test]
    fn test_project_mapping() {
        let json = r#"{
            "id": 99,
            "path": "foo-test",
            "path_with_namespace": "mygroup/sub/foo-test",
            "namespace": {"id": 3, "full_path": "mygroup/sub"},
            "visibility": "internal",
            "http_url_to_repo": "https://gitlab.com/mygroup/sub/foo-test.git",
            "web_url": "https://gitlab.com/mygroup/sub/foo-test",
            "created_at": "2024-05-01T10:00:00.000Z"
        }"#;
        let repo: Repository = serde_json::from_str::<GlProject>(json).unwrap().into();
        assert_eq!(repo.namespace, "mygroup/sub");
        assert_eq!(repo.name, "foo-test");
        assert_eq!(repo.full_name, "mygroup/sub/foo-test");
        assert!(repo.private);
    }

    #[test]
    fn test_close_body() {
        let body = GlMergeRequestUpdate {
            title: None,
            description: None,
            target_branch: None,
            state_event: Some("close"),
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"state_event":"close"}"#
        );
    }

    #[test]
    fn test_merge_request_state() {
        let closed = PullRequestListOptions {
            closed: true,
            ..Default::default()
        };
        assert_eq!(merge_request_state(&closed), "closed");
    }

    #[test]
    fn test_new_sets_api_base() {
        let gitlab = GitLab::new("https://gitlab.example.com", "token").unwrap();
        assert_eq!(gitlab.api_base(), "https://gitlab.example.com/api/v4");
    }
}
