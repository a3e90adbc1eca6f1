//! # SCM Tool Library
//!
//! Automation helpers for git hosting providers: pull requests, releases and
//! repositories on GitHub, GitLab or an in-memory fake. The `scm` binary is a
//! thin command-line layer over this library.
//!
//! ## Quick Example
//!
//! ```
//! use scm_tool::options::ScmContext;
//! use scm_tool::pull_request::{self, Action, CreateOptions};
//! use scm_tool::scm::fake::FakeProvider;
//! use scm_tool::scm::{ClientConfig, ScmKind};
//!
//! let fake = FakeProvider::new("https://github.com", "me");
//! let config = ClientConfig {
//!     kind: ScmKind::Fake,
//!     server: "https://github.com".to_string(),
//!     token: "dummytoken".to_string(),
//!     username: "me".to_string(),
//! };
//! let ctx = ScmContext::with_client(fake.client(), config).unwrap();
//!
//! let opts = CreateOptions {
//!     owner: "myorg".to_string(),
//!     name: "myrepo".to_string(),
//!     title: "Bump dependencies".to_string(),
//!     body: String::new(),
//!     head: "bump-deps".to_string(),
//!     base: "main".to_string(),
//!     allow_update: true,
//! };
//! let outcome = pull_request::create_or_update(&ctx, &opts).unwrap();
//! assert_eq!(outcome.action, Action::Created);
//! assert_eq!(outcome.pull_request.number, 1);
//! ```
//!
//! ## Core Concepts
//!
//! - **Provider client (`scm`)**: one trait per resource collection, served by
//!   the GitHub, GitLab or fake provider chosen at runtime.
//! - **Options (`options`)**: resolves provider flags and environment
//!   fallbacks into a connected [`options::ScmContext`].
//! - **Handlers (`pull_request`, `release`, `repository`)**: the operations
//!   behind each command.
//! - **Selection (`filter`)**: decides which repositories a bulk removal
//!   touches.
//! - **Seams (`git`, `prompt`)**: the system `git` binary and terminal prompts,
//!   both replaceable in tests.

pub mod error;
pub mod filter;
pub mod git;
pub mod logging;
pub mod options;
pub mod output;
pub mod prompt;
pub mod pull_request;
pub mod release;
pub mod repository;
pub mod scm;

#[cfg(test)]
mod selection_proptest;
