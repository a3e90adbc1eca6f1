//! # Repository Selection
//!
//! Decides which repositories `repository remove` acts on. A repository is
//! selected when all of the following hold:
//!
//! 1. its namespace equals the requested owner exactly;
//! 2. no cutoff is set, or it was created at or before the cutoff;
//! 3. its name contains one of the include substrings (when any are given)
//!    and none of the exclude substrings.
//!
//! The cutoff comes from either an absolute time (`--created-before`) or a
//! number of days before now (`--created-days-ago`), never both.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::error::{Error, Result};
use crate::scm::Repository;

/// Selection criteria for repositories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryFilter {
    pub owner: String,
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    pub created_before: Option<DateTime<Utc>>,
}

impl RepositoryFilter {
    /// Returns true when `repo` should be selected.
    pub fn matches(&self, repo: &Repository) -> bool {
        if repo.namespace != self.owner {
            return false;
        }
        if let Some(cutoff) = self.created_before {
            if cutoff < repo.created {
                return false;
            }
        }
        name_matches(&repo.name, &self.includes, &self.excludes)
    }
}

/// True when `name` contains any include (or there are none) and no exclude.
pub fn name_matches(name: &str, includes: &[String], excludes: &[String]) -> bool {
    let included = includes.is_empty() || includes.iter().any(|i| name.contains(i.as_str()));
    included && !excludes.iter().any(|e| name.contains(e.as_str()))
}

/// Parses a `--created-before` value.
///
/// Accepts RFC 3339 (`2024-01-02T15:04:05Z`), RFC 2822
/// (`Tue, 2 Jan 2024 15:04:05 +0000`) or a date (`2024-01-02`, read as
/// midnight UTC).
pub fn parse_time(text: &str) -> Result<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(text) {
        return Ok(t.with_timezone(&Utc));
    }
    if let Ok(t) = DateTime::parse_from_rfc2822(text) {
        return Ok(t.with_timezone(&Utc));
    }
    if let Some(midnight) = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc());
    }
    Err(Error::invalid(format!(
        "failed to parse created-before time '{}': expected RFC 3339, RFC 2822 or YYYY-MM-DD",
        text
    )))
}

/// Works out the creation cutoff from the two mutually exclusive options.
///
/// A day count of zero counts as not given.
pub fn resolve_cutoff(
    created_before: Option<&str>,
    created_days_ago: Option<u32>,
    now: DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>> {
    let created_before = created_before.filter(|s| !s.trim().is_empty());
    let created_days_ago = created_days_ago.filter(|d| *d > 0);
    match (created_before, created_days_ago) {
        (Some(_), Some(_)) => Err(Error::conflicting(
            "you cannot supply --created-before and --created-days-ago",
        )),
        (Some(text), None) => parse_time(text).map(Some),
        (None, Some(days)) => Duration::try_days(i64::from(days))
            .and_then(|age| now.checked_sub_signed(age))
            .map(Some)
            .ok_or_else(|| Error::invalid("--created-days-ago is too large")),
        (None, None) => Ok(None),
    }
}
