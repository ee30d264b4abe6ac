#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn memo_cmd(data_dir: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin("memo"));
    cmd.env("MEMO_DATA_DIR", data_dir.as_os_str())
        .env_remove("RUST_LOG");
    cmd
}

fn capture_example(data_dir: &Path, file: &str) -> assert_cmd::assert::Assert {
    memo_cmd(data_dir)
        .args(["capture", "--offline", "--url", "https://example.com/x"])
        .arg(fixture("example.html"))
        .args(["-s", "Hello World", "-t", "demo", "-f", file])
        .assert()
}

#[test]
fn capture_status_unstage_workflow() {
    let temp = TempDir::new().unwrap();

    capture_example(temp.path(), "notes.md")
        .success()
        .stdout(predicate::str::contains("Staged to notes.md"));

    let local: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(temp.path().join("local.json")).unwrap())
            .unwrap();
    assert_eq!(
        local["working-area"]["notes.md"][0],
        "- [Example](https://example.com/canonical-x) #demo \n > Hello World"
    );
    assert_eq!(local["new-tagfiles"]["tags"][0], "demo");

    memo_cmd(temp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("notes.md"))
        .stdout(predicate::str::contains(
            "- [Example](https://example.com/canonical-x) #demo",
        ))
        .stdout(predicate::str::contains("> Hello World"))
        .stdout(predicate::str::contains("New tags:"));

    memo_cmd(temp.path())
        .args(["unstage", "notes.md", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unstaged from notes.md"));

    memo_cmd(temp.path())
        .args(["unstage", "notes.md", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Nothing staged at notes.md[0]"));
}

#[test]
fn capture_without_target_file_fails() {
    let temp = TempDir::new().unwrap();

    memo_cmd(temp.path())
        .args(["capture", "--offline", "--url", "https://example.com/x"])
        .arg(fixture("example.html"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("target file"));

    memo_cmd(temp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing staged."));
}

#[test]
fn capture_reads_page_from_stdin() {
    let temp = TempDir::new().unwrap();

    memo_cmd(temp.path())
        .args(["capture", "-", "--offline", "--url", "https://example.com/y"])
        .args(["-f", "inbox.md", "--title", "Custom"])
        .write_stdin("<html><head><title>Ignored</title></head></html>")
        .assert()
        .success();

    memo_cmd(temp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("- [Custom](https://example.com/y)"));
}

#[test]
fn clear_discards_everything() {
    let temp = TempDir::new().unwrap();
    capture_example(temp.path(), "a.md").success();
    capture_example(temp.path(), "b.md").success();

    memo_cmd(temp.path())
        .arg("clear")
        .assert()
        .success()
        .stdout(predicate::str::contains("Discarded 2 staged entries."));

    memo_cmd(temp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing staged."));
}

#[test]
fn config_round_trip() {
    let temp = TempDir::new().unwrap();

    memo_cmd(temp.path())
        .args(["config", "repo", "wiki"])
        .assert()
        .success()
        .stdout(predicate::str::contains("repo set to wiki"));

    memo_cmd(temp.path())
        .args(["config", "branch", "main"])
        .assert()
        .success();

    memo_cmd(temp.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("repo = wiki"))
        .stdout(predicate::str::contains("branch = main"))
        .stdout(predicate::str::contains("place = home"));

    assert!(temp.path().join("sync.json").exists());
    assert!(temp.path().join("config.json").exists());
}

#[test]
fn save_with_nothing_staged_does_not_need_credentials() {
    let temp = TempDir::new().unwrap();

    memo_cmd(temp.path())
        .arg("save")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing staged."));
}

#[test]
fn save_without_credentials_keeps_staged_notes() {
    let temp = TempDir::new().unwrap();
    capture_example(temp.path(), "notes.md").success();

    memo_cmd(temp.path())
        .arg("save")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Config error"));

    memo_cmd(temp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("notes.md"));
}

#[test]
fn forget_drops_a_pending_tag_but_keeps_the_note() {
    let temp = TempDir::new().unwrap();
    capture_example(temp.path(), "notes.md").success();

    memo_cmd(temp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("0. demo"));

    memo_cmd(temp.path())
        .args(["forget", "tag", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed demo from new tags"));

    let local: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(temp.path().join("local.json")).unwrap())
            .unwrap();
    assert!(local["new-tagfiles"]["tags"]
        .as_array()
        .map_or(true, |tags| tags.is_empty()));
    assert_eq!(
        local["working-area"]["notes.md"][0],
        "- [Example](https://example.com/canonical-x) #demo \n > Hello World"
    );

    memo_cmd(temp.path())
        .args(["forget", "tag", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Nothing staged at new tags[0]"));
}

#[test]
fn version_starts_with_package_version() {
    let temp = TempDir::new().unwrap();
    memo_cmd(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!(
            "memo {}",
            env!("CARGO_PKG_VERSION")
        )));
}
