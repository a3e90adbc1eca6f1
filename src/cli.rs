//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use scm_tool::logging;
use scm_tool::output::OutputConfig;

use crate::commands;

/// scm - Automate pull requests, releases and repositories on git providers
#[derive(Parser, Debug)]
#[command(name = "scm")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Commands for working with pull requests
    #[command(name = "pull-request", visible_alias = "pr")]
    PullRequest(commands::pull_request::PullRequestArgs),

    /// Commands for working with releases
    Release(commands::release::ReleaseArgs),

    /// Commands for working with repositories
    #[command(visible_aliases = ["repo", "repos", "repositories"])]
    Repository(commands::repository::RepositoryArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        OutputConfig::from_env_and_flag(&self.color).apply();
        logging::init(logging::parse_level(&self.log_level)?);

        match self.command {
            Commands::PullRequest(args) => commands::pull_request::execute(args),
            Commands::Release(args) => commands::release::execute(args),
            Commands::Repository(args) => commands::repository::execute(args),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
