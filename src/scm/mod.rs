//! # Provider Client
//!
//! A small abstraction over git hosting APIs. A [`Client`] bundles one
//! service per resource collection:
//!
//! - [`PullRequestService`]: list, create, update and close pull requests.
//! - [`ReleaseService`]: find releases by tag, create and update them.
//! - [`RepositoryService`]: list, create and delete repositories.
//! - [`UserService`]: look up the authenticated user.
//!
//! Each provider implements all four traits on a single type and
//! [`new_client`] hands out that type behind trait objects, so commands pick
//! the provider at runtime from [`ScmKind`] and never branch on it.
//!
//! Supported kinds:
//!
//! - `github`: GitHub.com and GitHub Enterprise ([`github`]).
//! - `gitlab`: GitLab.com and self-managed GitLab ([`gitlab`]).
//! - `fake`: an in-memory provider ([`fake`]) for tests and experiments.

pub mod fake;
pub mod github;
pub mod gitlab;
mod http;
mod types;

pub use types::*;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Pull request operations.
pub trait PullRequestService: Send + Sync {
    /// Lists pull requests of `repo` (a full name).
    fn list(&self, repo: &str, opts: &PullRequestListOptions) -> Result<Vec<PullRequest>>;

    /// Opens a new pull request.
    fn create(&self, repo: &str, input: &PullRequestInput) -> Result<PullRequest>;

    /// Changes title, body and base of an existing pull request.
    fn update(&self, repo: &str, number: u64, input: &PullRequestInput) -> Result<PullRequest>;

    /// Closes a pull request without merging.
    fn close(&self, repo: &str, number: u64) -> Result<()>;
}

/// Release operations.
pub trait ReleaseService: Send + Sync {
    fn find_by_tag(&self, repo: &str, tag: &str) -> Result<Release>;

    fn create(&self, repo: &str, input: &ReleaseInput) -> Result<Release>;

    /// Updates the release with the given `id`.
    fn update(&self, repo: &str, id: u64, input: &ReleaseInput) -> Result<Release>;
}

/// Repository operations.
pub trait RepositoryService: Send + Sync {
    /// Lists repositories owned by the authenticated user.
    fn list(&self, opts: &ListOptions) -> Result<Vec<Repository>>;

    /// Lists repositories of an organisation or group.
    fn list_organisation(&self, org: &str, opts: &ListOptions) -> Result<Vec<Repository>>;

    fn create(&self, input: &RepositoryInput) -> Result<Repository>;

    /// Deletes the repository with the given full name.
    fn delete(&self, repo: &str) -> Result<()>;
}

/// User operations.
pub trait UserService: Send + Sync {
    /// Returns the authenticated user.
    fn find(&self) -> Result<User>;
}

/// The kind of git hosting provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScmKind {
    GitHub,
    GitLab,
    Fake,
}

impl FromStr for ScmKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "github" => Ok(ScmKind::GitHub),
            "gitlab" => Ok(ScmKind::GitLab),
            "fake" => Ok(ScmKind::Fake),
            kind @ ("bitbucket" | "bitbucketcloud" | "bitbucketserver" | "stash" | "azure") => {
                Err(Error::invalid(format!("git kind '{}' is not supported yet", kind)))
            }
            other => Err(Error::invalid(format!(
                "unsupported git kind '{}': expected one of github, gitlab, fake",
                other
            ))),
        }
    }
}

impl fmt::Display for ScmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScmKind::GitHub => "github",
            ScmKind::GitLab => "gitlab",
            ScmKind::Fake => "fake",
        };
        f.write_str(name)
    }
}

/// Everything needed to connect to a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub kind: ScmKind,
    /// Web URL of the server, e.g. `https://github.com`.
    pub server: String,
    pub token: String,
    /// May be empty; callers resolve it through [`UserService::find`].
    pub username: String,
}

/// A handle on one provider, exposing its resource collections.
#[derive(Clone)]
pub struct Client {
    pub kind: ScmKind,
    pub server: String,
    pub pull_requests: Arc<dyn PullRequestService>,
    pub releases: Arc<dyn ReleaseService>,
    pub repositories: Arc<dyn RepositoryService>,
    pub users: Arc<dyn UserService>,
}

impl Client {
    /// Builds a client whose collections are all served by `provider`.
    pub fn from_provider<P>(kind: ScmKind, server: &str, provider: Arc<P>) -> Self
    where
        P: PullRequestService + ReleaseService + RepositoryService + UserService + 'static,
    {
        Self {
            kind,
            server: server.trim_end_matches('/').to_string(),
            pull_requests: provider.clone(),
            releases: provider.clone(),
            repositories: provider.clone(),
            users: provider,
        }
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("kind", &self.kind)
            .field("server", &self.server)
            .finish_non_exhaustive()
    }
}

/// Creates a client for the configured provider.
pub fn new_client(config: &ClientConfig) -> Result<Client> {
    let client = match config.kind {
        ScmKind::GitHub => {
            let provider = github::GitHub::new(&config.server, &config.token)?;
            Client::from_provider(config.kind, &config.server, Arc::new(provider))
        }
        ScmKind::GitLab => {
            let provider = gitlab::GitLab::new(&config.server, &config.token)?;
            Client::from_provider(config.kind, &config.server, Arc::new(provider))
        }
        ScmKind::Fake => fake::FakeProvider::new(&config.server, &config.username).client(),
    };
    log::debug!("created {} client for {}", client.kind, client.server);
    Ok(client)
}
