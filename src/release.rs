//! Handler behind `scm release update`.

use crate::error::{Result, ResultExt};
use crate::options::{require, ScmContext};
use crate::output;
use crate::scm::{join, Release, ReleaseInput};

/// Inputs of `release update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOptions {
    pub owner: String,
    pub name: String,
    pub tag: String,
    pub title: String,
    pub description: String,
    pub prerelease: bool,
}

impl UpdateOptions {
    /// Checks the required fields.
    pub fn validate(&self) -> Result<()> {
        require(&self.owner, "owner")?;
        require(&self.name, "name")?;
        require(&self.tag, "tag")?;
        Ok(())
    }
}

/// Looks up the release for `opts.tag` and overwrites its title,
/// description and prerelease flag.
pub fn update(ctx: &ScmContext, opts: &UpdateOptions) -> Result<Release> {
    opts.validate()?;

    let repo = join(&opts.owner, &opts.name);
    let target = format!("{} tag {}", repo, opts.tag);
    let existing = ctx
        .client
        .releases
        .find_by_tag(&repo, &opts.tag)
        .scm_context("find release", &target)?;

    let input = ReleaseInput {
        tag: opts.tag.clone(),
        title: opts.title.clone(),
        description: opts.description.clone(),
        prerelease: opts.prerelease,
        draft: existing.draft,
    };
    let release = ctx
        .client
        .releases
        .update(&repo, existing.id, &input)
        .scm_context("update release", &target)?;
    log::info!(
        "updated release {} in repo '{}'. url: {}",
        release.tag,
        output::info(&repo),
        output::info(&release.link)
    );
    Ok(release)
}
