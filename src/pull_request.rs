//! # Pull Requests
//!
//! Handlers behind `scm pull-request create` and `scm pull-request close`.
//!
//! Creating can optionally reuse an open pull request for the same head and
//! base branches, which lets pipelines re-run without piling up duplicates.
//! Closing works in one of three modes: a single pull request by number,
//! every open pull request numbered below a cutoff, or the open pull request
//! for a head/base pair.

use crate::error::{Error, Result, ResultExt};
use crate::options::{require, ScmContext};
use crate::output;
use crate::scm::{join, Client, PullRequest, PullRequestInput, PullRequestListOptions};

/// How many open pull requests are scanned for an existing head/base pair.
pub const FIND_LIMIT: u32 = 5000;

/// Default number of open pull requests scanned when closing by cutoff.
pub const DEFAULT_CLOSE_SIZE: u32 = 200;

/// Inputs of `pull-request create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOptions {
    pub owner: String,
    pub name: String,
    pub title: String,
    pub body: String,
    pub head: String,
    pub base: String,
    /// Update an open pull request for the same branches instead of failing.
    pub allow_update: bool,
}

impl CreateOptions {
    /// Checks the required fields.
    pub fn validate(&self) -> Result<()> {
        require(&self.owner, "owner")?;
        require(&self.name, "name")?;
        require(&self.title, "title")?;
        require(&self.head, "head")?;
        require(&self.base, "base")?;
        Ok(())
    }
}

/// What `create_or_update` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Created,
    Updated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOutcome {
    pub action: Action,
    pub pull_request: PullRequest,
}

/// Creates a pull request, or updates the open one for the same branches
/// when `allow_update` is set.
pub fn create_or_update(ctx: &ScmContext, opts: &CreateOptions) -> Result<CreateOutcome> {
    opts.validate()?;

    let repo = join(&opts.owner, &opts.name);
    let input = PullRequestInput {
        title: opts.title.clone(),
        body: opts.body.clone(),
        head: opts.head.clone(),
        base: opts.base.clone(),
    };

    if opts.allow_update {
        if let Some(existing) =
            find_open_pull_request_by_branches(&ctx.client, &repo, &opts.head, &opts.base)
        {
            let pr = ctx
                .client
                .pull_requests
                .update(&repo, existing.number, &input)
                .scm_context("update pull request", format!("{} #{}", repo, existing.number))?;
            log::info!(
                "updated pull request #{} in repo '{}'. url: {}",
                pr.number,
                output::info(&repo),
                output::info(&pr.link)
            );
            return Ok(CreateOutcome {
                action: Action::Updated,
                pull_request: pr,
            });
        }
    }

    let pr = ctx
        .client
        .pull_requests
        .create(&repo, &input)
        .scm_context("create pull request", &repo)?;
    log::info!(
        "created pull request #{} in repo '{}'. url: {}",
        pr.number,
        output::info(&repo),
        output::info(&pr.link)
    );
    Ok(CreateOutcome {
        action: Action::Created,
        pull_request: pr,
    })
}

/// Returns the first open pull request from `head` into `base`.
///
/// A failed listing is logged and reported as no match.
pub fn find_open_pull_request_by_branches(
    client: &Client,
    repo: &str,
    head: &str,
    base: &str,
) -> Option<PullRequest> {
    let opts = PullRequestListOptions {
        open: true,
        size: FIND_LIMIT,
        ..Default::default()
    };
    match client.pull_requests.list(repo, &opts) {
        Ok(prs) => prs
            .into_iter()
            .find(|pr| pr.head.r#ref == head && pr.base.r#ref == base),
        Err(e) => {
            log::warn!("failed to list open pull requests on repo {}: {}", repo, e);
            None
        }
    }
}

/// Inputs of `pull-request close`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseOptions {
    pub owner: String,
    pub name: String,
    pub pr: Option<u64>,
    pub before: Option<u64>,
    /// Open pull requests scanned in cutoff mode.
    pub size: u32,
    pub head: Option<String>,
    pub base: Option<String>,
}

impl Default for CloseOptions {
    fn default() -> Self {
        Self {
            owner: String::new(),
            name: String::new(),
            pr: None,
            before: None,
            size: DEFAULT_CLOSE_SIZE,
            head: None,
            base: None,
        }
    }
}

/// The selected close mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseMode {
    /// Close this pull request.
    Number(u64),
    /// Close every open pull request numbered below the cutoff.
    Before(u64),
    /// Close the open pull request from `head` into `base`.
    Branches { head: String, base: String },
}

impl CloseOptions {
    /// Checks the required fields and returns the close mode.
    pub fn validate(&self) -> Result<CloseMode> {
        require(&self.owner, "owner")?;
        require(&self.name, "name")?;
        self.mode()
    }

    /// Picks the close mode, requiring exactly one.
    ///
    /// Zero numbers and blank branch names count as not given.
    pub fn mode(&self) -> Result<CloseMode> {
        let pr = self.pr.filter(|n| *n > 0);
        let before = self.before.filter(|n| *n > 0);
        let head = self.head.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let base = self.base.as_deref().map(str::trim).filter(|s| !s.is_empty());

        let branches = match (head, base) {
            (Some(head), Some(base)) => Some(CloseMode::Branches {
                head: head.to_string(),
                base: base.to_string(),
            }),
            (Some(_), None) => return Err(Error::missing_option("base")),
            (None, Some(_)) => return Err(Error::missing_option("head")),
            (None, None) => None,
        };

        let mut modes = pr
            .map(CloseMode::Number)
            .into_iter()
            .chain(before.map(CloseMode::Before))
            .chain(branches);
        match (modes.next(), modes.next()) {
            (Some(mode), None) => Ok(mode),
            (None, _) => Err(Error::conflicting(
                "you must supply one of --pr, --before or --head and --base",
            )),
            (Some(_), Some(_)) => Err(Error::conflicting(
                "you can only supply one of --pr, --before or --head and --base",
            )),
        }
    }
}

/// Closes pull requests as selected by `opts`, returning the closed numbers
/// in the order they were closed.
///
/// Stops at the first failed close; pull requests closed before it stay
/// closed.
pub fn close(ctx: &ScmContext, opts: &CloseOptions) -> Result<Vec<u64>> {
    let mode = opts.validate()?;
    let repo = join(&opts.owner, &opts.name);

    let numbers = match mode {
        CloseMode::Number(number) => vec![number],
        CloseMode::Before(cutoff) => {
            let list = PullRequestListOptions {
                open: true,
                size: opts.size,
                ..Default::default()
            };
            ctx.client
                .pull_requests
                .list(&repo, &list)
                .scm_context("list open pull requests of", &repo)?
                .into_iter()
                .map(|pr| pr.number)
                .filter(|number| *number < cutoff)
                .collect()
        }
        CloseMode::Branches { head, base } => {
            match find_open_pull_request_by_branches(&ctx.client, &repo, &head, &base) {
                Some(pr) => vec![pr.number],
                None => {
                    log::info!(
                        "no open pull request in repo '{}' from branch {} to {}",
                        output::info(&repo),
                        head,
                        base
                    );
                    Vec::new()
                }
            }
        }
    };

    for number in &numbers {
        ctx.client
            .pull_requests
            .close(&repo, *number)
            .scm_context("close pull request", format!("{} #{}", repo, number))?;
        log::info!("closed pull request #{} in repo '{}'", number, output::info(&repo));
    }
    Ok(numbers)
}
