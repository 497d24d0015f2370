use assert_cmd::prelude::*;
use std::process::Command;

#[test]
fn help_lists_server_flags() {
    let mut cmd = Command::cargo_bin("repotable").unwrap();
    let out = cmd.arg("--help").assert().success().get_output().stdout.clone();
    let text = String::from_utf8(out).unwrap();
    for flag in ["--bind", "--output", "--work-dir", "--command-timeout"] {
        assert!(text.contains(flag), "missing {flag} in help:\n{text}");
    }
}

#[test]
fn version_flag() {
    let mut cmd = Command::cargo_bin("repotable").unwrap();
    let out = cmd.arg("--version").assert().success().get_output().stdout.clone();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn invalid_timeout_is_a_usage_error() {
    let mut cmd = Command::cargo_bin("repotable").unwrap();
    cmd.args(["--command-timeout", "whenever"]).assert().failure().code(2);
}

#[test]
fn unbindable_address_fails() {
    let mut cmd = Command::cargo_bin("repotable").unwrap();
    let out = cmd
        .env("REPOTABLE_LOG", "off")
        .args(["--bind", "not-an-address"])
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    let text = String::from_utf8_lossy(&out);
    assert!(text.contains("Failed to bind not-an-address"), "{text}");
}
