//! # scm CLI
//!
//! This is the binary entry point for the `scm` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Executing the appropriate command based on the parsed arguments.
//! - Reporting errors: `main` returns `anyhow::Result`, so a failed command
//!   prints `Error: ...` with its cause chain and exits with status 1.
//!
//! The provider logic lives in the `scm_tool` library; the binary is a thin
//! wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
