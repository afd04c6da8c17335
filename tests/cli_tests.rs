//! CLI integration tests.

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fundwatch() -> Command {
    let mut cmd = cargo_bin_cmd!("fundwatch");
    cmd.env_remove("TELEGRAM_BOT_TOKEN")
        .env_remove("TELEGRAM_CHAT_IDS")
        .env_remove("TELEGRAM_CHAT_ID");
    cmd
}

#[test]
fn help_lists_commands() {
    fundwatch()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn version_names_binary() {
    fundwatch()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fundwatch"));
}

#[test]
fn check_config_accepts_valid_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[exchanges]\nenabled = [\"binance\", \"bybit\"]\n").unwrap();

    fundwatch()
        .args(["check", "config", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file is valid"))
        .stdout(predicate::str::contains("Binance, Bybit"));
}

#[test]
fn check_config_warns_about_missing_telegram_env() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[telegram]\nenabled = true\n").unwrap();

    fundwatch()
        .args(["check", "config", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("TELEGRAM_BOT_TOKEN"));
}

#[test]
fn check_config_rejects_invalid_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[scan]\ninterval_secs = 0\n").unwrap();

    fundwatch()
        .args(["check", "config", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("scan.interval_secs"));
}

#[test]
fn check_config_fails_for_missing_file() {
    let dir = TempDir::new().unwrap();

    fundwatch()
        .args(["check", "config", "--config"])
        .arg(dir.path().join("nope.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration file not found"));
}

#[test]
fn run_rejects_invalid_interval_override() {
    let dir = TempDir::new().unwrap();

    fundwatch()
        .current_dir(dir.path())
        .args(["run", "--once", "--interval", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("scan.interval_secs"));
}
