//! Binary-level smoke tests. None of these reach a server.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CONFIG: &str = r#"
[default]
service = "cloud"
public_api_key = "abcdefgh"
private_api_key = "11111111-2222-3333-4444-555555559999"

[onprem]
service = "ops-manager"
ops_manager_url = "http://127.0.0.1:9/"
project_id = "p1"
"#;

fn dbplane(dir: &TempDir) -> Command {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, CONFIG).expect("write config");

    let mut cmd = Command::cargo_bin("dbplane").expect("binary built");
    cmd.env_clear().arg("--config").arg(path);
    cmd
}

#[test]
fn help_lists_command_groups() {
    let dir = tempfile::tempdir().expect("tempdir");
    dbplane(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("atlas"))
        .stdout(predicate::str::contains("ops-manager"))
        .stdout(predicate::str::contains("iam"));
}

#[test]
fn config_describe_masks_private_key() {
    let dir = tempfile::tempdir().expect("tempdir");
    dbplane(&dir)
        .args(["config", "describe"])
        .assert()
        .success()
        .stdout(predicate::str::contains("abcdefgh"))
        .stdout(predicate::str::contains("********9999"))
        .stdout(predicate::str::contains("11111111").not());
}

#[test]
fn config_list_marks_selected_profile() {
    let dir = tempfile::tempdir().expect("tempdir");
    dbplane(&dir)
        .args(["-P", "onprem", "-o", "json", "config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""name": "onprem""#))
        .stdout(predicate::str::contains(r#""active": true"#));
}

#[test]
fn missing_project_fails_before_any_request() {
    let dir = tempfile::tempdir().expect("tempdir");
    dbplane(&dir)
        .args(["atlas", "clusters", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing project ID"));
}

#[test]
fn cloud_profile_refuses_automation() {
    let dir = tempfile::tempdir().expect("tempdir");
    dbplane(&dir)
        .args(["ops-manager", "automation", "status", "--project-id", "p1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not supported for service cloud"));
}

#[test]
fn ops_manager_profile_refuses_cloud_clusters() {
    let dir = tempfile::tempdir().expect("tempdir");
    dbplane(&dir)
        .args(["-P", "onprem", "atlas", "clusters", "pause", "Cluster0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not supported for service ops-manager"));
}

#[test]
fn invalid_ip_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    dbplane(&dir)
        .args(["atlas", "access-lists", "create", "--ip", "300.1.1.1", "--project-id", "p1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid argument"));
}

#[test]
fn unknown_profile_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    dbplane(&dir)
        .args(["-P", "staging", "config", "describe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("staging"));
}
