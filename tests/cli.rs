use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const CONFIG: &str = r#"
host = "app1.example.com"
user = "textit"
gh_account = "acme"
gh_repo = "flowserver"
"#;

fn deploy_cmd() -> Command {
    let mut cmd = Command::cargo_bin("kodegen_deploy").unwrap();
    cmd.env_remove("KODEGEN_DEPLOY_CONFIG")
        .env_remove("DEPLOY_DEBUG")
        .env_remove("GITHUB_TOKEN")
        .env_remove("GH_TOKEN")
        .env_remove("SLACK_TOKEN");
    cmd
}

fn write_config(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("deploy.toml");
    fs::write(&path, CONFIG).unwrap();
    path
}

#[test]
fn test_help_lists_tasks() {
    deploy_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("deploy"))
        .stdout(predicate::str::contains("choose-version"))
        .stdout(predicate::str::contains("install-version"))
        .stdout(predicate::str::contains("stop-server"))
        .stdout(predicate::str::contains("start-server"))
        .stdout(predicate::str::contains("chat"));
}

#[test]
fn test_missing_config_fails() {
    deploy_cmd()
        .args(["--config", "/nonexistent/deploy.toml", "stop-server"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No deploy config found"));
}

#[test]
fn test_deploy_requires_github_token() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);

    deploy_cmd()
        .arg("--config")
        .arg(&config)
        .arg("deploy")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("GITHUB_TOKEN"));
}

#[test]
fn test_chat_without_token_still_succeeds() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);

    deploy_cmd()
        .arg("--config")
        .arg(&config)
        .args(["chat", "maintenance in 5 minutes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Trouble contacting slack"));
}

#[test]
fn test_invalid_config_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("deploy.toml");
    fs::write(&path, "host = \"app1\"\nuser = \"text it\"\ngh_account = \"a\"\ngh_repo = \"b\"\n")
        .unwrap();

    deploy_cmd()
        .arg("--config")
        .arg(&path)
        .arg("start-server")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid value for 'user'"));
}

#[test]
fn test_empty_chat_message_rejected() {
    deploy_cmd()
        .args(["chat", "  "])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid arguments: message must not be empty"));
}
