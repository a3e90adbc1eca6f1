//! # Error Handling
//!
//! This module defines the centralized error type for the `scm-tool` library.
//! It uses the `thiserror` library to create an `Error` enum that covers the
//! failure modes of option validation, provider calls and git invocations.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Variants fall into four groups:
//!   - option problems raised before any network call (`MissingOption`,
//!     `ConflictingOptions`, `InvalidArgument`);
//!   - provider conditions (`NotFound`, `Conflict`, `Api`);
//!   - a provider call wrapped with the operation and target that failed
//!     (`Scm`);
//!   - wrapped lower-level errors (`Http`, `Io`, `UrlParse`,
//!     `GitCommand`, `Prompt`, `LockPoisoned`).
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! The [`ResultExt::scm_context`] helper wraps any error from a provider call
//! into `Error::Scm`, so messages read like
//! `failed to close pull request myorg/myrepo #3: ...`.

use thiserror::Error;

/// Main error type for scm-tool operations
#[derive(Error, Debug)]
pub enum Error {
    /// A required option was neither passed as a flag nor found in the
    /// environment.
    #[error("missing option: --{option}")]
    MissingOption { option: String },

    /// Two or more options were supplied that cannot be combined.
    #[error("conflicting options: {message}")]
    ConflictingOptions { message: String },

    /// An option value could not be interpreted.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// A provider call failed.
    ///
    /// `operation` and `target` identify what was attempted, e.g.
    /// `close pull request` and `myorg/myrepo #3`.
    #[error("failed to {operation} {target}: {source}")]
    Scm {
        operation: String,
        target: String,
        #[source]
        source: Box<Error>,
    },

    /// The provider reported that a resource does not exist.
    #[error("not found: {resource}")]
    NotFound { resource: String },

    /// The provider rejected a create because the resource already exists.
    #[error("conflict: {message}")]
    Conflict { message: String },

    /// The provider answered with an unexpected status.
    #[error("provider API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// A git command exited unsuccessfully.
    #[error("git command failed in {dir}: git {command} - {stderr}")]
    GitCommand {
        command: String,
        dir: String,
        stderr: String,
    },

    /// An interactive prompt could not be shown or answered.
    #[error("prompt error: {message}")]
    Prompt { message: String },

    /// A mutex guarding shared state has been poisoned.
    #[error("Lock poisoned: {context}")]
    LockPoisoned { context: String },

    /// An HTTP transport error, wrapped from `reqwest::Error`.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Shorthand for [`Error::MissingOption`].
    pub fn missing_option(option: impl Into<String>) -> Self {
        Error::MissingOption {
            option: option.into(),
        }
    }

    /// Shorthand for [`Error::ConflictingOptions`].
    pub fn conflicting(message: impl Into<String>) -> Self {
        Error::ConflictingOptions {
            message: message.into(),
        }
    }

    /// Shorthand for [`Error::InvalidArgument`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            message: message.into(),
        }
    }

    /// Returns true when this error, or the provider error it wraps, means
    /// the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound { .. } => true,
            Error::Api { status, .. } => *status == 404,
            Error::Scm { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Adds operation context to provider results.
pub trait ResultExt<T> {
    /// Wraps an error as [`Error::Scm`] naming the failed operation and target.
    fn scm_context(self, operation: &str, target: impl std::fmt::Display) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn scm_context(self, operation: &str, target: impl std::fmt::Display) -> Result<T> {
        self.map_err(|source| Error::Scm {
            operation: operation.to_string(),
            target: target.to_string(),
            source: Box::new(source),
        })
    }
}
