//! Binary-level CLI checks.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_subcommands() {
    let mut cmd = Command::cargo_bin("helix").expect("binary");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("describe"));
}

#[test]
fn unknown_subcommand_fails() {
    let mut cmd = Command::cargo_bin("helix").expect("binary");
    cmd.arg("frobnicate").assert().failure();
}

#[test]
fn describe_without_token_reports_config_error() {
    let mut cmd = Command::cargo_bin("helix").expect("binary");
    cmd.env_remove("HELIX_API_TOKEN")
        .args(["describe", "file-B5QF8pQ04QJzx0xKzZ8rTkYv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("HELIX_API_TOKEN"));
}

#[test]
fn run_requires_an_executable() {
    let mut cmd = Command::cargo_bin("helix").expect("binary");
    cmd.arg("run").assert().failure();
}
