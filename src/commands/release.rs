//! # Release Commands
//!
//! `scm release update` rewrites the title, description and prerelease flag
//! of the release for a tag.
//!
//! ```bash
//! scm release update --owner myorg --name myrepo --tag v1.2.0 \
//!     --title "v1.2.0" --prerelease false
//! ```

use anyhow::Result;
use clap::{ArgAction, Args, Subcommand};

use scm_tool::release::{self, UpdateOptions};

use super::{connect, ScmArgs};

/// Commands for working with releases
#[derive(Args, Debug)]
pub struct ReleaseArgs {
    #[command(subcommand)]
    command: ReleaseCommand,
}

#[derive(Subcommand, Debug)]
enum ReleaseCommand {
    /// Updates a release
    Update(UpdateArgs),
}

/// Update a release
#[derive(Args, Debug)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub scm: ScmArgs,

    /// The owner of the repository to update. Either an organisation or username
    #[arg(short, long, default_value = "")]
    pub owner: String,

    /// The name of the repository to update
    #[arg(short = 'r', long, default_value = "")]
    pub name: String,

    /// The tag of the release to update
    #[arg(long, default_value = "")]
    pub tag: String,

    /// The updated release title
    #[arg(long, default_value = "")]
    pub title: String,

    /// The updated release description
    #[arg(long, default_value = "")]
    pub description: String,

    /// The updated prerelease status: true marks a prerelease, false a full release
    #[arg(
        long,
        visible_alias = "pre-release",
        action = ArgAction::Set,
        value_name = "BOOL",
        default_value_t = true
    )]
    pub prerelease: bool,
}

/// Execute a `release` subcommand.
pub fn execute(args: ReleaseArgs) -> Result<()> {
    match args.command {
        ReleaseCommand::Update(args) => update(args),
    }
}

fn update(args: UpdateArgs) -> Result<()> {
    let opts = UpdateOptions {
        owner: args.owner,
        name: args.name,
        tag: args.tag,
        title: args.title,
        description: args.description,
        prerelease: args.prerelease,
    };
    opts.validate()?;
    let ctx = connect(args.scm.into())?;
    release::update(&ctx, &opts)?;
    Ok(())
}
