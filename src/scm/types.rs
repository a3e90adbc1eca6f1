//! Provider-neutral resource model.
//!
//! These are the shapes every provider maps its API responses into. Commands
//! only ever see these types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Joins an owner and a repository name into a full name (`owner/name`).
pub fn join(owner: &str, name: &str) -> String {
    format!("{}/{}", owner.trim_matches('/'), name.trim_matches('/'))
}

/// One side of a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestBranch {
    /// Branch name, e.g. `main`.
    pub r#ref: String,
    /// Commit the branch pointed at when the pull request was read.
    pub sha: String,
}

/// A pull request (GitHub) or merge request (GitLab).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// Repository-scoped number.
    pub number: u64,
    pub title: String,
    pub body: String,
    pub head: PullRequestBranch,
    pub base: PullRequestBranch,
    pub closed: bool,
    pub merged: bool,
    /// Web URL of the pull request.
    pub link: String,
    /// Login of the author, when the provider reports one.
    pub author: String,
}

/// Fields used to create or update a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestInput {
    pub title: String,
    pub body: String,
    pub head: String,
    pub base: String,
}

/// Selects which pull requests a listing returns.
///
/// When neither `open` nor `closed` is set, every pull request is returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PullRequestListOptions {
    pub open: bool,
    pub closed: bool,
    /// 1-based page; `0` walks pages until `size` items are collected.
    pub page: u32,
    /// Maximum number of items; `0` means no limit.
    pub size: u32,
}

/// Paging for repository listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// 1-based page; `0` walks pages until `size` items are collected.
    pub page: u32,
    /// Page size; `0` means the provider maximum.
    pub size: u32,
}

/// A release attached to a tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub id: u64,
    pub tag: String,
    pub title: String,
    pub description: String,
    pub prerelease: bool,
    pub draft: bool,
    pub link: String,
}

/// Fields used to create or update a release.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseInput {
    pub tag: String,
    pub title: String,
    pub description: String,
    pub prerelease: bool,
    pub draft: bool,
}

/// A hosted repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: String,
    /// Owning user, organisation or group path.
    pub namespace: String,
    pub name: String,
    /// `namespace/name`.
    pub full_name: String,
    pub private: bool,
    /// HTTPS clone URL.
    pub clone: String,
    /// Web URL.
    pub link: String,
    pub created: DateTime<Utc>,
}

/// Fields used to create a repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryInput {
    /// Organisation or group to create the repository in. Empty means the
    /// authenticated user.
    pub namespace: String,
    pub name: String,
    pub description: String,
    pub homepage: String,
    pub private: bool,
}

/// An account on the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join() {
        assert_eq!(join("myorg", "myrepo"), "myorg/myrepo");
        assert_eq!(join("myorg/", "/myrepo"), "myorg/myrepo");
    }
}
