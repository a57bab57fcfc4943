//! CLI integration tests for all implemented subcommands.
//!
//! Uses `assert_cmd` to spawn the `namespacer` binary and verify
//! exit codes, stdout content, and stderr content. Fixtures are written
//! to temporary directories.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const BOX: &str = r#"// SPDX-License-Identifier: MIT
pragma solidity ^0.8.20;

contract Box {
    uint256 public a;
    address public b;

    function set(uint256 value) external {
        a = value;
        b = msg.sender;
    }
}

contract Crate {
    bool open;
    uint256 public constant SIZE = 4;

    function toggle() external {
        open = !open;
    }
}
"#;

fn namespacer() -> Command {
    let mut cmd = cargo_bin_cmd!("namespacer");
    cmd.env_remove("NAMESPACER_LOG");
    cmd
}

/// Helper: write `source` into a fresh temp dir and return (dir, path).
fn fixture(source: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("Box.sol");
    fs::write(&path, source).expect("write fixture");
    (dir, path)
}

// ──────────────────────────────────────────────
// 1. Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    namespacer()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ERC-7201 namespaced storage"));
}

#[test]
fn version_exits_0() {
    namespacer()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("namespacer"));
}

// ──────────────────────────────────────────────
// 2. check
// ──────────────────────────────────────────────

#[test]
fn check_lists_candidates_per_contract() {
    let (_dir, path) = fixture(BOX);
    namespacer()
        .arg("check")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Box (2 variables)"))
        .stdout(predicate::str::contains(":5:5  uint256 a;"))
        .stdout(predicate::str::contains(":6:5  address b;"))
        .stdout(predicate::str::contains("Crate (1 variable)"))
        .stdout(predicate::str::contains("SIZE").not());
}

#[test]
fn check_json_output() {
    let (_dir, path) = fixture(BOX);
    let out = namespacer()
        .args(["--output", "json", "check"])
        .arg(&path)
        .output()
        .expect("run");
    assert!(out.status.success());
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json");
    assert_eq!(report["syntax_errors"], 0);
    assert_eq!(report["contracts"][0]["contract"], "Box");
    assert_eq!(report["contracts"][0]["variables"][1]["name"], "b");
    assert_eq!(report["contracts"][0]["variables"][1]["line"], 6);
    assert_eq!(report["contracts"][1]["contract"], "Crate");
}

#[test]
fn check_missing_file_exits_1() {
    namespacer()
        .args(["check", "does/not/exist.sol"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error reading file"));
}

#[test]
fn check_missing_file_quiet_prints_nothing() {
    namespacer()
        .args(["--quiet", "check", "does/not/exist.sol"])
        .assert()
        .code(1)
        .stderr(predicate::str::is_empty());
}

// ──────────────────────────────────────────────
// 3. migrate
// ──────────────────────────────────────────────

#[test]
fn migrate_prints_result_without_touching_file() {
    let (_dir, path) = fixture(BOX);
    namespacer()
        .args(["migrate", "--prefix", "box"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "/// @custom:storage-location erc7201:box.storage.Box",
        ))
        .stdout(predicate::str::contains(
            "/// @custom:storage-location erc7201:box.storage.Crate",
        ))
        .stdout(predicate::str::contains("$.open = !$.open;"));
    assert_eq!(fs::read_to_string(&path).unwrap(), BOX);
}

#[test]
fn migrate_single_contract() {
    let (_dir, path) = fixture(BOX);
    let out = namespacer()
        .args(["migrate", "--contract", "Crate"])
        .arg(&path)
        .output()
        .expect("run");
    assert!(out.status.success());
    let text = String::from_utf8(out.stdout).unwrap();
    assert!(text.contains("erc7201:example.storage.Crate"));
    assert!(!text.contains("BoxStorage"));
    assert!(text.contains("    uint256 public a;\n"));
}

#[test]
fn migrate_write_is_idempotent() {
    let (_dir, path) = fixture(BOX);
    namespacer()
        .args(["migrate", "--write"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("migrated Box, Crate"));
    let once = fs::read_to_string(&path).unwrap();
    assert_ne!(once, BOX);
    assert_eq!(once.matches("BoxStorage storage $ = _getBoxStorage();").count(), 1);

    namespacer()
        .args(["migrate", "--write"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to migrate"));
    assert_eq!(fs::read_to_string(&path).unwrap(), once);
}

#[test]
fn migrate_json_reports_contracts() {
    let (_dir, path) = fixture(BOX);
    let out = namespacer()
        .args(["--output", "json", "migrate"])
        .arg(&path)
        .output()
        .expect("run");
    assert!(out.status.success());
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json");
    assert_eq!(report["migrated"], serde_json::json!(["Box", "Crate"]));
    assert_eq!(report["written"], false);
    assert!(report["source"].as_str().unwrap().contains("struct CrateStorage"));
}

#[test]
fn migrate_unknown_contract_changes_nothing() {
    let (_dir, path) = fixture(BOX);
    namespacer()
        .args(["migrate", "--contract", "Nope"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::diff(BOX))
        .stderr(predicate::str::contains("nothing to migrate"));
}

#[test]
fn migrate_ambiguous_contract_exits_1() {
    let (_dir, path) = fixture("contract A { uint256 x; }\ncontract A { uint256 y; }\n");
    namespacer()
        .args(["migrate"])
        .arg(&path)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("cannot migrate contract A"));
}
