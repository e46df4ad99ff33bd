//! End-to-end tests for the `aksdeploy` binary surface.
//!
//! These only exercise paths that stop before any tool probe or cloud
//! call: argument parsing and configuration loading.

use std::io::Write as _;

use assert_cmd::Command;
use predicates::prelude::*;

fn aksdeploy() -> Command {
    Command::cargo_bin("aksdeploy").expect("binary builds")
}

#[test]
fn help_lists_both_subcommands() {
    aksdeploy()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check").and(predicate::str::contains("deploy")));
}

#[test]
fn version_reports_the_binary_name() {
    aksdeploy()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("aksdeploy"));
}

#[test]
fn deploy_with_missing_config_exits_with_the_config_code() {
    aksdeploy()
        .args(["deploy", "--config", "/nonexistent/deploy.json"])
        .assert()
        .code(2)
        .stderr(
            predicate::str::contains("configuration error")
                .and(predicate::str::contains("Expected configuration shape")),
        );
}

#[test]
fn check_with_malformed_config_prints_the_expected_shape() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(b"{\"cluster\": true}").expect("write config");

    aksdeploy()
        .args(["check", "--config"])
        .arg(file.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("subscription_id"));
}

#[test]
fn unknown_subcommand_is_rejected() {
    aksdeploy().arg("teardown").assert().failure();
}
