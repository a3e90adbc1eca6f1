//! # Repositories
//!
//! Handlers behind `scm repository create`, `clone` and `remove`.
//!
//! ## Create
//!
//! The target can be given as `--owner`/`--name` (plus `--server`) or as a
//! single URL such as `https://github.com/myorg/myrepo.git`, which
//! [`parse_repository_url`] splits into server, owner and name. With a
//! template, the template is cloned into a temporary directory and its
//! current branch pushed to the new repository.
//!
//! ## Remove
//!
//! Bulk removal walks every page of the owner's repositories, selects them
//! with a [`RepositoryFilter`] and only then deletes, so deletions never
//! shift the pages still to be read. Each selected repository is either
//! logged (dry run), deleted straight away (`--confirm`) or confirmed
//! interactively.

use std::path::Path;

use crate::error::{Error, Result, ResultExt};
use crate::filter::RepositoryFilter;
use crate::git::{self, GitOperations};
use crate::options::{require, ScmContext, ScmOptions};
use crate::output;
use crate::prompt::Prompter;
use crate::scm::{join, ListOptions, Repository, RepositoryInput};

/// Remote name used when pushing a template into a new repository.
pub const TEMPLATE_REMOTE: &str = "newrepo";

/// Repositories requested per page when listing for removal.
pub const REMOVE_PAGE_SIZE: u32 = 100;

/// Server, owner and name taken from a repository URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocation {
    pub server: String,
    pub owner: String,
    pub name: String,
}

/// Splits `https://myserver/prefix/myowner/myrepo(.git)` into its parts.
///
/// The last two path segments are the name and owner; anything before them
/// stays on the server URL. Query and fragment are dropped.
pub fn parse_repository_url(text: &str) -> Result<RepositoryLocation> {
    let mut url = url::Url::parse(text).map_err(|e| {
        Error::invalid(format!("failed to parse repository URL {}: {}", text, e))
    })?;

    let raw = url.path().to_string();
    let path = raw.strip_prefix('/').unwrap_or(&raw);
    let path = path.strip_suffix('/').unwrap_or(path);
    let path = path.strip_suffix(".git").unwrap_or(path);
    let mut segments: Vec<&str> = path.split('/').collect();

    let shape_error = || {
        Error::invalid(format!(
            "repository URL should be in the form https://myserver/myowner/myrepo but was {}",
            text
        ))
    };
    let name = segments.pop().filter(|s| !s.is_empty()).ok_or_else(shape_error)?;
    let owner = segments.pop().filter(|s| !s.is_empty()).ok_or_else(shape_error)?;

    url.set_path(&segments.join("/"));
    url.set_query(None);
    url.set_fragment(None);

    Ok(RepositoryLocation {
        server: url.as_str().trim_end_matches('/').to_string(),
        owner: owner.to_string(),
        name: name.to_string(),
    })
}

/// Inputs of `repository create`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateOptions {
    /// Repository URL, replacing `--server`, `--owner` and `--name`.
    pub url: Option<String>,
    pub owner: String,
    pub name: String,
    pub description: String,
    pub home_page: String,
    /// Git URL of a repository whose current branch seeds the new one.
    pub template: Option<String>,
    pub private: bool,
    /// Create without asking.
    pub confirm: bool,
}

impl CreateOptions {
    /// Checks the required fields.
    pub fn validate(&self) -> Result<()> {
        require(&self.owner, "owner")?;
        require(&self.name, "name")?;
        Ok(())
    }

    /// Fills server, owner and name from `url` when one was given.
    pub fn apply_url(&mut self, scm: &mut ScmOptions) -> Result<()> {
        let Some(url) = self.url.as_deref().filter(|u| !u.trim().is_empty()) else {
            return Ok(());
        };
        for (flag, given) in [
            ("server", scm.server.as_deref().unwrap_or_default()),
            ("owner", self.owner.as_str()),
            ("name", self.name.as_str()),
        ] {
            if !given.trim().is_empty() {
                return Err(Error::conflicting(format!(
                    "specified --{} when already supplied {}",
                    flag, url
                )));
            }
        }
        let location = parse_repository_url(url)?;
        scm.server = Some(location.server);
        self.owner = location.owner;
        self.name = location.name;
        Ok(())
    }
}

/// Creates a repository, seeding it from the template when one is set.
///
/// Returns `None` when the user declined the confirmation prompt.
pub fn create(
    ctx: &ScmContext,
    git: &dyn GitOperations,
    prompter: &dyn Prompter,
    opts: &CreateOptions,
) -> Result<Option<Repository>> {
    opts.validate()?;
    let full_name = join(&opts.owner, &opts.name);

    if !opts.confirm
        && prompter.is_interactive()
        && !prompter.confirm(&format!("do you want to create repository {}?", full_name), true)?
    {
        log::info!("not creating repository {}", output::info(&full_name));
        return Ok(None);
    }

    let input = RepositoryInput {
        namespace: if opts.owner != ctx.username {
            opts.owner.clone()
        } else {
            String::new()
        },
        name: opts.name.clone(),
        description: opts.description.clone(),
        homepage: opts.home_page.clone(),
        private: opts.private,
    };
    let repository = ctx
        .client
        .repositories
        .create(&input)
        .scm_context("create repository", &full_name)?;
    log::info!(
        "created repository {} at {}",
        output::info(&full_name),
        output::info(&repository.link)
    );

    if let Some(template) = opts.template.as_deref().filter(|t| !t.trim().is_empty()) {
        push_template(ctx, git, template, &repository)?;
    }
    Ok(Some(repository))
}

fn push_template(
    ctx: &ScmContext,
    git: &dyn GitOperations,
    template: &str,
    repository: &Repository,
) -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let dir = temp_dir.path().join("template");
    git.clone_to(template, &dir)?;

    let remote_url = git::url_with_credentials(&repository.clone, &ctx.username, &ctx.token)?;
    git.add_remote(&dir, TEMPLATE_REMOTE, &remote_url)?;
    let branch = git.current_branch(&dir)?;
    git.push(&dir, TEMPLATE_REMOTE, &branch)?;

    log::info!(
        "pushed the template repository {} to {}",
        output::info(template),
        output::info(&repository.clone)
    );
    Ok(())
}

/// Clones `url` into `dir`.
pub fn clone(git: &dyn GitOperations, url: &str, dir: &Path) -> Result<()> {
    require(url, "url")?;
    git.clone_in(url, dir)?;
    log::info!("cloned the repository {}", output::info(url));
    Ok(())
}

/// Inputs of `repository remove`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoveOptions {
    pub filter: RepositoryFilter,
    /// Delete without prompting.
    pub confirm: bool,
    /// Only log what would be removed.
    pub dry_run: bool,
    /// Stop at the first failed delete.
    pub fail_on_error: bool,
}

impl RemoveOptions {
    /// Checks the required fields and flag combinations.
    pub fn validate(&self) -> Result<()> {
        require(&self.filter.owner, "owner")?;
        if self.dry_run && self.confirm {
            return Err(Error::conflicting(
                "you cannot supply --dry-run and --confirm",
            ));
        }
        Ok(())
    }
}

/// Full names of the repositories `remove` selected, by outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalReport {
    pub selected: Vec<String>,
    pub removed: Vec<String>,
    /// Declined at the prompt.
    pub skipped: Vec<String>,
    pub failed: Vec<String>,
}

/// Deletes every repository of the owner that the filter selects.
pub fn remove(
    ctx: &ScmContext,
    prompter: &dyn Prompter,
    opts: &RemoveOptions,
) -> Result<RemovalReport> {
    opts.validate()?;

    let selected: Vec<String> = list_owner_repositories(ctx, &opts.filter.owner)?
        .into_iter()
        .filter(|repo| opts.filter.matches(repo))
        .map(|repo| repo.full_name)
        .collect();
    log::debug!("selected {} repositories", selected.len());

    let mut report = RemovalReport {
        selected: selected.clone(),
        ..Default::default()
    };
    for name in selected {
        if opts.dry_run {
            log::info!("would remove repository {}", output::info(&name));
            continue;
        }
        if !opts.confirm
            && !prompter.confirm(&format!("do you want to delete repository {}?", name), false)?
        {
            log::info!("not removing repository {}", output::info(&name));
            report.skipped.push(name);
            continue;
        }

        match ctx.client.repositories.delete(&name) {
            Ok(()) => {
                log::info!("removed repository {}", output::info(&name));
                report.removed.push(name);
            }
            Err(e) if opts.fail_on_error => {
                return Err(e).scm_context("delete repository", &name);
            }
            Err(e) => {
                log::warn!("failed to delete repository {}: {}", name, e);
                report.failed.push(name);
            }
        }
    }
    Ok(report)
}

/// Reads every page of the owner's repositories.
///
/// The owner is listed as the authenticated user when the logins match and
/// as an organisation otherwise. A not-found page counts as empty.
fn list_owner_repositories(ctx: &ScmContext, owner: &str) -> Result<Vec<Repository>> {
    let current = ctx
        .client
        .users
        .find()
        .scm_context("find", "current user")?
        .login;

    let mut all = Vec::new();
    let mut page = 1;
    loop {
        let opts = ListOptions {
            page,
            size: REMOVE_PAGE_SIZE,
        };
        let listed = if owner == current {
            ctx.client
                .repositories
                .list(&opts)
                .scm_context("list repositories of user", owner)
        } else {
            ctx.client
                .repositories
                .list_organisation(owner, &opts)
                .scm_context("list repositories of organisation", owner)
        };
        let repos = match listed {
            Ok(repos) => repos,
            Err(e) if e.is_not_found() => Vec::new(),
            Err(e) => return Err(e),
        };
        if repos.is_empty() {
            break;
        }
        all.extend(repos);
        page += 1;
    }
    Ok(all)
}
