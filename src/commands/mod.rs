//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the `scm`
//! command-line tool. Each command group is defined in its own file.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args`, connects to the
//!   provider and calls into the `scm_tool` library.
//!
//! Provider flags shared by every provider-backed command live in
//! [`ScmArgs`].

pub mod completions;
pub mod pull_request;
pub mod release;
pub mod repository;

use clap::Args;

use scm_tool::options::{ScmContext, ScmOptions};

/// Flags selecting and authenticating against a git provider.
#[derive(Args, Debug, Clone, Default)]
pub struct ScmArgs {
    /// The kind of git server: github, gitlab or fake. Defaults to $GIT_KIND
    #[arg(short, long, value_name = "KIND")]
    pub kind: Option<String>,

    /// The git server URL. Defaults to $GIT_SERVER
    #[arg(short, long, value_name = "URL")]
    pub server: Option<String>,

    /// The git username. Defaults to $GIT_USERNAME or $GIT_USER, or the owner
    /// of the token
    #[arg(short, long, value_name = "NAME")]
    pub username: Option<String>,

    /// The git token. Defaults to $GIT_TOKEN
    #[arg(short, long, value_name = "TOKEN")]
    pub token: Option<String>,
}

impl From<ScmArgs> for ScmOptions {
    fn from(args: ScmArgs) -> Self {
        Self {
            kind: args.kind,
            server: args.server,
            username: args.username,
            token: args.token,
        }
    }
}

/// Resolves provider options and connects.
pub fn connect(options: ScmOptions) -> scm_tool::error::Result<ScmContext> {
    ScmContext::connect(options.resolve()?)
}
