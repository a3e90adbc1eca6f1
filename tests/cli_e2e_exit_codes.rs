//! End-to-end tests for CLI exit codes.
//!
//! - Exit code 0: Success
//! - Exit code 1: Validation or provider error, printed as `Error: ...`
//! - Exit code 2: Invalid command-line usage (handled by clap)

#[allow(dead_code)]
mod common;
use common::prelude::*;

/// Exit code 0 is returned for --help.
#[test]
fn test_exit_code_help() {
    scm_cmd()
        .arg("--help")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("pull-request"))
        .stdout(predicate::str::contains("release"))
        .stdout(predicate::str::contains("repository"));
}

/// Exit code 0 is returned for --version.
#[test]
fn test_exit_code_version() {
    scm_cmd()
        .arg("--version")
        .assert()
        .code(0)
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

/// Exit code 1 when no provider kind is configured.
#[test]
fn test_exit_code_missing_kind() {
    scm_cmd()
        .args(["release", "update", "--owner", "myorg", "--name", "myrepo"])
        .args(["--tag", "v1.0.0", "--token", "t", "--server", "https://github.com"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing option: --kind"));
}

/// Exit code 1 when no token is configured.
#[test]
fn test_exit_code_missing_token() {
    scm_cmd()
        .args(["release", "update", "--owner", "myorg", "--name", "myrepo"])
        .args(["--tag", "v1.0.0", "--kind", "fake", "--server", "https://github.com"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing option: --token"));
}

/// Provider settings are read from the environment.
#[test]
fn test_environment_fallbacks() {
    scm_cmd()
        .args(["repository", "remove", "--owner", "myorg", "--dry-run"])
        .env("GIT_KIND", "fake")
        .env("GIT_TOKEN", "dummytoken")
        .assert()
        .code(0);
}

/// Exit code 1 for an unsupported provider kind.
#[test]
fn test_exit_code_unsupported_kind() {
    scm_cmd()
        .args(["repository", "remove", "--owner", "myorg", "--dry-run"])
        .args(["--kind", "bitbucketserver", "--token", "t"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not supported"));
}

/// Exit code 1 for an unknown log level.
#[test]
fn test_exit_code_bad_log_level() {
    scm_cmd()
        .args(["--log-level", "chatty", "completions", "bash"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown log level"));
}

/// Exit code 2 for an unknown subcommand.
#[test]
fn test_exit_code_unknown_subcommand() {
    scm_cmd().arg("frobnicate").assert().code(2);
}

/// Exit code 2 for a malformed number.
#[test]
fn test_exit_code_malformed_number() {
    fake_cmd(&["pr", "close", "--owner", "myorg", "--name", "myrepo", "--pr", "one"])
        .assert()
        .code(2);
}
