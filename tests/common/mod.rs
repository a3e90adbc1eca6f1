//! Shared test utilities for the CLI E2E tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     fake_cmd(&["repository", "remove", "--owner", "myorg", "--dry-run"])
//!         .assert()
//!         .success();
//! }
//! ```

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::{fake_cmd, scm_cmd};
}

/// Environment variables the provider options fall back to.
pub const PROVIDER_ENV: &[&str] = &[
    "GIT_KIND",
    "GIT_SERVER",
    "GIT_USERNAME",
    "GIT_USER",
    "GIT_TOKEN",
];

/// The `scm` binary with provider environment cleared and colours off.
pub fn scm_cmd() -> Command {
    let mut cmd = cargo_bin_cmd!("scm");
    for var in PROVIDER_ENV {
        cmd.env_remove(var);
    }
    cmd.env_remove("RUST_LOG").env("NO_COLOR", "1");
    cmd
}

/// `scm <args>` against the in-memory provider.
///
/// The provider flags go after the subcommand path in `args`.
pub fn fake_cmd(args: &[&str]) -> Command {
    let mut cmd = scm_cmd();
    cmd.args(args).args([
        "--kind",
        "fake",
        "--server",
        "https://github.com",
        "--token",
        "dummytoken",
    ]);
    cmd
}
