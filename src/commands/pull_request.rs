//! # Pull Request Commands
//!
//! `scm pull-request create` opens a pull request, optionally updating the
//! open one for the same branches. `scm pull-request close` closes one pull
//! request, every open pull request below a number, or the open pull request
//! for a head/base pair.
//!
//! ## Example
//!
//! ```bash
//! scm pr create --kind github --owner myorg --name myrepo \
//!     --title "Bump dependencies" --head bump-deps --allow-update
//!
//! scm pr close --owner myorg --name myrepo --before 120
//! ```

use anyhow::Result;
use clap::{Args, Subcommand};

use scm_tool::pull_request::{self, CloseOptions, CreateOptions, DEFAULT_CLOSE_SIZE};

use super::{connect, ScmArgs};

/// Commands for working with pull requests
#[derive(Args, Debug)]
pub struct PullRequestArgs {
    #[command(subcommand)]
    command: PullRequestCommand,
}

#[derive(Subcommand, Debug)]
enum PullRequestCommand {
    /// Creates a pull request, or updates an existing one with --allow-update
    Create(CreateArgs),
    /// Closes one or more pull requests
    Close(CloseArgs),
}

/// Create a pull request
#[derive(Args, Debug)]
pub struct CreateArgs {
    #[command(flatten)]
    pub scm: ScmArgs,

    /// The owner of the repository. Either an organisation or username
    #[arg(short, long, default_value = "")]
    pub owner: String,

    /// The name of the repository
    #[arg(short = 'r', long, default_value = "")]
    pub name: String,

    /// The title of the new pull request
    #[arg(long, default_value = "")]
    pub title: String,

    /// The contents of the pull request
    #[arg(long, default_value = "")]
    pub body: String,

    /// The name of the branch where your changes are implemented
    #[arg(long, default_value = "")]
    pub head: String,

    /// The name of the branch you want the changes pulled into
    #[arg(long, default_value = "main")]
    pub base: String,

    /// Update the open pull request for the same head and base if there is one
    #[arg(long)]
    pub allow_update: bool,
}

/// Close pull requests
#[derive(Args, Debug)]
pub struct CloseArgs {
    #[command(flatten)]
    pub scm: ScmArgs,

    /// The owner of the repository. Either an organisation or username
    #[arg(short, long, default_value = "")]
    pub owner: String,

    /// The name of the repository
    #[arg(short = 'r', long, default_value = "")]
    pub name: String,

    /// The pull request to close
    #[arg(long, value_name = "NUMBER")]
    pub pr: Option<u64>,

    /// Close ALL open pull requests numbered below this one
    #[arg(long, value_name = "NUMBER")]
    pub before: Option<u64>,

    /// The number of open pull requests to scan when using --before
    #[arg(long, default_value_t = DEFAULT_CLOSE_SIZE)]
    pub size: u32,

    /// Close the open pull request from this branch (requires --base)
    #[arg(long)]
    pub head: Option<String>,

    /// Close the open pull request into this branch (requires --head)
    #[arg(long)]
    pub base: Option<String>,
}

/// Execute a `pull-request` subcommand.
pub fn execute(args: PullRequestArgs) -> Result<()> {
    match args.command {
        PullRequestCommand::Create(args) => create(args),
        PullRequestCommand::Close(args) => close(args),
    }
}

fn create(args: CreateArgs) -> Result<()> {
    let opts = CreateOptions {
        owner: args.owner,
        name: args.name,
        title: args.title,
        body: args.body,
        head: args.head,
        base: args.base,
        allow_update: args.allow_update,
    };
    opts.validate()?;
    let ctx = connect(args.scm.into())?;
    pull_request::create_or_update(&ctx, &opts)?;
    Ok(())
}

fn close(args: CloseArgs) -> Result<()> {
    let opts = CloseOptions {
        owner: args.owner,
        name: args.name,
        pr: args.pr,
        before: args.before,
        size: args.size,
        head: args.head,
        base: args.base,
    };
    opts.validate()?;
    let ctx = connect(args.scm.into())?;
    pull_request::close(&ctx, &opts)?;
    Ok(())
}
