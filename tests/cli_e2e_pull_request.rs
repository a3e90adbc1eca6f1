//! End-to-end tests for `scm pull-request` against the in-memory provider.

#[allow(dead_code)]
mod common;
use common::prelude::*;

#[test]
fn test_pull_request_create() {
    fake_cmd(&["pull-request", "create", "--owner", "myorg", "--name", "myrepo"])
        .args(["--title", "my title", "--head", "some_feature_branch"])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "created pull request #1 in repo 'myorg/myrepo'. url: https://github.com/myorg/myrepo/pull/1",
        ));
}

#[test]
fn test_pull_request_alias_and_allow_update() {
    fake_cmd(&["pr", "create", "-o", "myorg", "-r", "myrepo", "--allow-update"])
        .args(["--title", "t", "--head", "feature", "--base", "develop"])
        .assert()
        .success()
        .stderr(predicate::str::contains("created pull request #1"));
}

#[test]
fn test_pull_request_create_requires_head() {
    fake_cmd(&["pr", "create", "--owner", "myorg", "--name", "myrepo", "--title", "t"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing option: --head"));
}

#[test]
fn test_pull_request_close_rejects_two_modes() {
    fake_cmd(&["pr", "close", "--owner", "myorg", "--name", "myrepo"])
        .args(["--pr", "3", "--before", "5"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("you can only supply one of"));
}

#[test]
fn test_pull_request_close_requires_a_mode() {
    fake_cmd(&["pr", "close", "--owner", "myorg", "--name", "myrepo"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("you must supply one of"));
}

#[test]
fn test_pull_request_close_head_without_base() {
    fake_cmd(&["pr", "close", "--owner", "myorg", "--name", "myrepo", "--head", "f"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing option: --base"));
}

#[test]
fn test_pull_request_close_before_with_nothing_open() {
    fake_cmd(&["pr", "close", "--owner", "myorg", "--name", "myrepo", "--before", "10"])
        .assert()
        .success();
}

#[test]
fn test_pull_request_close_by_branches_without_match() {
    fake_cmd(&["pr", "close", "--owner", "myorg", "--name", "myrepo"])
        .args(["--head", "feature", "--base", "main"])
        .assert()
        .success()
        .stderr(predicate::str::contains("no open pull request"));
}

#[test]
fn test_pull_request_close_unknown_number() {
    fake_cmd(&["pr", "close", "--owner", "myorg", "--name", "myrepo", "--pr", "7"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "failed to close pull request myorg/myrepo #7",
        ));
}
