//! # Repository Commands
//!
//! - `scm repository create` creates a repository, optionally seeding it from
//!   a template repository.
//! - `scm repository clone` clones a repository into the current directory.
//! - `scm repository remove` bulk-deletes an owner's repositories selected by
//!   name and age.
//!
//! ## Example
//!
//! ```bash
//! scm repo create https://github.com/myorg/myrepo --template https://github.com/myorg/template
//!
//! scm repo remove --owner myorg --filter preview- --created-days-ago 30 --dry-run
//! ```

use std::env;

use anyhow::Result;
use chrono::Utc;
use clap::{Args, Subcommand};

use scm_tool::filter::{self, RepositoryFilter};
use scm_tool::git::DefaultGitOperations;
use scm_tool::options::ScmOptions;
use scm_tool::prompt::TerminalPrompter;
use scm_tool::repository::{self, CreateOptions, RemoveOptions};

use super::{connect, ScmArgs};

/// Server used by `remove` when none is configured.
const DEFAULT_REMOVE_SERVER: &str = "https://github.com";

/// Commands for working with repositories
#[derive(Args, Debug)]
pub struct RepositoryArgs {
    #[command(subcommand)]
    command: RepositoryCommand,
}

#[derive(Subcommand, Debug)]
enum RepositoryCommand {
    /// Creates a new repository, optionally from a template
    Create(CreateArgs),
    /// Clones a git repository
    Clone(CloneArgs),
    /// Removes one or more repositories
    #[command(visible_aliases = ["delete", "rm"])]
    Remove(RemoveArgs),
}

/// Create a repository
#[derive(Args, Debug)]
pub struct CreateArgs {
    #[command(flatten)]
    pub scm: ScmArgs,

    /// The repository URL, e.g. https://github.com/myorg/myrepo. Replaces
    /// --server, --owner and --name
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    /// The owner of the repository to create. Either an organisation or username
    #[arg(short, long, default_value = "")]
    pub owner: String,

    /// The name of the repository to create
    #[arg(short, long, default_value = "")]
    pub name: String,

    /// The repository description
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// The repository home page
    #[arg(long, default_value = "")]
    pub home_page: String,

    /// The git template repository to create the repository from
    #[arg(long, value_name = "URL")]
    pub template: Option<String>,

    /// Make the repository private
    #[arg(long)]
    pub private: bool,

    /// Create the repository without asking
    #[arg(long)]
    pub confirm: bool,
}

/// Clone a repository
#[derive(Args, Debug)]
pub struct CloneArgs {
    /// The git URL of the repository to clone
    #[arg(value_name = "URL")]
    pub url: String,
}

/// Remove repositories
#[derive(Args, Debug)]
pub struct RemoveArgs {
    #[command(flatten)]
    pub scm: ScmArgs,

    /// The owner of the repositories to remove. Either an organisation or username
    #[arg(short, long, default_value = "")]
    pub owner: String,

    /// Only remove repositories whose name contains this text (repeatable)
    #[arg(short, long = "filter", value_name = "TEXT")]
    pub filters: Vec<String>,

    /// Never remove repositories whose name contains this text (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "TEXT")]
    pub excludes: Vec<String>,

    /// Only remove repositories created at or before this time (RFC 3339,
    /// RFC 2822 or YYYY-MM-DD)
    #[arg(long, value_name = "TIME")]
    pub created_before: Option<String>,

    /// Only remove repositories created more than this number of days ago
    #[arg(long, value_name = "DAYS")]
    pub created_days_ago: Option<u32>,

    /// Remove without prompting
    #[arg(long)]
    pub confirm: bool,

    /// Only log the repositories that would be removed
    #[arg(long)]
    pub dry_run: bool,

    /// Stop at the first repository that fails to be removed
    #[arg(long)]
    pub fail_on_error: bool,
}

/// Execute a `repository` subcommand.
pub fn execute(args: RepositoryArgs) -> Result<()> {
    match args.command {
        RepositoryCommand::Create(args) => create(args),
        RepositoryCommand::Clone(args) => clone(args),
        RepositoryCommand::Remove(args) => remove(args),
    }
}

fn create(args: CreateArgs) -> Result<()> {
    let mut scm: ScmOptions = args.scm.into();
    let mut opts = CreateOptions {
        url: args.url,
        owner: args.owner,
        name: args.name,
        description: args.description,
        home_page: args.home_page,
        template: args.template,
        private: args.private,
        confirm: args.confirm,
    };
    opts.apply_url(&mut scm)?;
    opts.validate()?;

    let ctx = connect(scm)?;
    repository::create(&ctx, &DefaultGitOperations, &TerminalPrompter, &opts)?;
    Ok(())
}

fn clone(args: CloneArgs) -> Result<()> {
    let dir = env::current_dir()?;
    repository::clone(&DefaultGitOperations, &args.url, &dir)?;
    Ok(())
}

fn remove(args: RemoveArgs) -> Result<()> {
    let created_before = filter::resolve_cutoff(
        args.created_before.as_deref(),
        args.created_days_ago,
        Utc::now(),
    )?;
    let opts = RemoveOptions {
        filter: RepositoryFilter {
            owner: args.owner,
            includes: args.filters,
            excludes: args.excludes,
            created_before,
        },
        confirm: args.confirm,
        dry_run: args.dry_run,
        fail_on_error: args.fail_on_error,
    };
    opts.validate()?;

    let scm = ScmOptions::from(args.scm)
        .with_default_server(DEFAULT_REMOVE_SERVER, |name| env::var(name).ok());
    let ctx = connect(scm)?;
    let report = repository::remove(&ctx, &TerminalPrompter, &opts)?;
    log::debug!(
        "removed {} of {} selected repositories",
        report.removed.len(),
        report.selected.len()
    );
    Ok(())
}
