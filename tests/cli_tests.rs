//! CLI interface tests

mod common;

use assert_cmd::Command;
use common::{NAME, OWNER, TestRemote};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn sparsefetch() -> Command {
    let mut cmd = Command::cargo_bin("sparsefetch").unwrap();
    cmd.env_remove("SPARSEFETCH_HOST")
        .env_remove("SPARSEFETCH_GIT")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_version_flag() {
    sparsefetch()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sparsefetch"));
}

#[test]
fn test_help_flag() {
    sparsefetch()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Fetch selected files and directories",
        ));
}

#[test]
fn test_missing_config_error() {
    sparsefetch()
        .arg("--config")
        .arg("nonexistent.yaml")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Configuration file not found"));
}

#[test]
fn test_no_plan_error() {
    let work_dir = TempDir::new().unwrap();
    sparsefetch()
        .current_dir(work_dir.path())
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("No configuration found"));
}

#[test]
fn test_invalid_yaml_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("invalid.yaml");
    fs::write(&config_path, "repository: \"myorg/repo\"\npaths: [\n").unwrap();

    sparsefetch()
        .arg("--config")
        .arg(&config_path)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Failed to parse YAML"));
}

#[test]
fn test_dry_run_with_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("plan.yaml");
    fs::write(
        &config_path,
        r#"
repository: "myorg/repo"
branch: "main"
paths:
  - "docs"
  - "src/lib.rs"
destination: "./out"
"#,
    )
    .unwrap();

    sparsefetch()
        .arg("--config")
        .arg(&config_path)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run preview"))
        .stdout(predicate::str::contains("https://github.com/myorg/repo.git"))
        .stdout(predicate::str::contains("src/lib.rs"));
}

#[test]
fn test_unsafe_path_rejected() {
    sparsefetch()
        .args(["--repository", "myorg/repo", "--path", "../escape", "--dry-run"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("unsafe directory traversal"));
}

#[test]
fn test_fetch_paths_into_destination() {
    let remote = TestRemote::new();
    let work_dir = TempDir::new().unwrap();

    sparsefetch()
        .current_dir(work_dir.path())
        .args([
            "--repository",
            &format!("{OWNER}/{NAME}"),
            "--host",
            &remote.host(),
            "--path",
            "docs",
            "--path",
            "vtr_flow/benchmarks/fpu/add.v",
            "--destination",
            "out",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed fetch successfully"))
        .stdout(predicate::str::contains("Branch: main"));

    let out = work_dir.path().join("out");
    assert_eq!(
        fs::read_to_string(out.join("docs/guide.md")).unwrap(),
        "guide\n"
    );
    assert!(out.join("docs/api/index.md").exists());
    assert!(out.join("vtr_flow/benchmarks/fpu/add.v").is_file());
    assert!(!out.join("src").exists());
    assert!(!out.join("README.md").exists());
}

#[test]
fn test_fetch_with_config_file() {
    let remote = TestRemote::new();
    let work_dir = TempDir::new().unwrap();
    fs::write(
        work_dir.path().join("sparsefetch.yaml"),
        format!(
            r#"
owner: "{OWNER}"
name: "{NAME}"
host: "{}"
branch: "release"
paths:
  - "RELEASE_NOTES.md"
destination: "./vendor"
"#,
            remote.host()
        ),
    )
    .unwrap();

    sparsefetch()
        .current_dir(work_dir.path())
        .assert()
        .success();

    assert!(work_dir.path().join("vendor/RELEASE_NOTES.md").is_file());
}

#[test]
fn test_fetch_nonexistent_path() {
    let remote = TestRemote::new();
    let work_dir = TempDir::new().unwrap();

    sparsefetch()
        .current_dir(work_dir.path())
        .args([
            "--repository",
            &format!("{OWNER}/{NAME}"),
            "--host",
            &remote.host(),
            "--path",
            "nonexistent/path",
        ])
        .assert()
        .failure()
        .code(6)
        .stdout(predicate::str::contains("not checked out"));
}

#[test]
fn test_fetch_unknown_branch() {
    let remote = TestRemote::new();
    let work_dir = TempDir::new().unwrap();

    sparsefetch()
        .current_dir(work_dir.path())
        .args([
            "--repository",
            &format!("{OWNER}/{NAME}"),
            "--host",
            &remote.host(),
            "--branch",
            "no-such-branch",
            "--path",
            "docs",
        ])
        .assert()
        .failure()
        .code(3)
        .stdout(predicate::str::contains("no-such-branch"));
}

#[test]
fn test_leaves_no_temporary_directories() {
    let remote = TestRemote::new();
    let work_dir = TempDir::new().unwrap();
    let tmp = TempDir::new().unwrap();

    sparsefetch()
        .current_dir(work_dir.path())
        .env("TMPDIR", tmp.path())
        .args([
            "--repository",
            &format!("{OWNER}/{NAME}"),
            "--host",
            &remote.host(),
            "--path",
            "nonexistent/path",
        ])
        .assert()
        .failure();

    assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
}
