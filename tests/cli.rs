use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const HEADER: &str = "service_category,service_sub_category,service_unit,total\n";

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("usage-analyzer").unwrap();
        cmd.env("USAGE_ANALYZER_HOME", self.dir.path().join("config"))
            .env_remove("USAGE_ANALYZER_SETTINGS")
            .env_remove("RUST_LOG");
        cmd
    }
}

#[test]
fn analyze_prints_breakdown_and_summary() {
    let fixture = Fixture::new();
    let usage = fixture.file(
        "usage.csv",
        &format!(
            "{}Storage,Blob,GB,1200.5\nCompute,VM,Hours,10\nCompute,VM,Hours,5\nStorage,,GB,3\n",
            HEADER
        ),
    );

    fixture
        .command()
        .arg("analyze")
        .arg(&usage)
        .assert()
        .success()
        .stdout(predicate::str::contains("File: usage.csv"))
        .stdout(predicate::str::contains("    Unit: Hours | Total Amount: 15.00"))
        .stdout(predicate::str::contains("  Subcategory: N/A"))
        .stdout(predicate::str::contains("Grand Total Amount: 1,218.50"))
        .stdout(predicate::str::contains("  1. Storage: 1,203.50"));
}

#[test]
fn compare_lists_missing_and_added_services() {
    let fixture = Fixture::new();
    let old = fixture.file(
        "old.csv",
        &format!("{}A,x,Hours,1\nB,y,GB,2\n", HEADER),
    );
    let new = fixture.file(
        "new.csv",
        &format!("{}B,y,GB,5\nC,w,Hours,3\n", HEADER),
    );

    fixture
        .command()
        .args(["compare"])
        .arg(&old)
        .arg(&new)
        .arg("--details")
        .assert()
        .success()
        .stdout(predicate::str::contains("SERVICES MISSING FROM NEW FILE (1):\n  - A"))
        .stdout(predicate::str::contains("NEW SERVICES ADDED (1):\n  + C"))
        .stdout(predicate::str::contains("B (2.00 -> 5.00, +3.00)"));
}

#[test]
fn compare_side_by_side() {
    let fixture = Fixture::new();
    let old = fixture.file("old.csv", &format!("{}A,x,Hours,1\n", HEADER));
    let new = fixture.file("new.csv", &format!("{}B,y,GB,5\n", HEADER));

    fixture
        .command()
        .arg("compare")
        .arg(&old)
        .arg(&new)
        .args(["--layout", "side-by-side", "--width", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("| A (MISSING)"))
        .stdout(predicate::str::contains("| B (NEW)"));
}

#[test]
fn missing_columns_fail() {
    let fixture = Fixture::new();
    let bad = fixture.file("bad.csv", "service_category,service_sub_category\nA,x\n");

    fixture
        .command()
        .arg("analyze")
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Missing required columns in 'bad.csv': service_unit, total",
        ));
}

#[test]
fn no_usable_data_fails() {
    let fixture = Fixture::new();
    let empty = fixture.file("empty.csv", &format!("{},x,u,1\nA,x,u,abc\n", HEADER));

    fixture
        .command()
        .arg("analyze")
        .arg(&empty)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No usable data in 'empty.csv'"));
}

#[test]
fn missing_file_fails() {
    let fixture = Fixture::new();

    fixture
        .command()
        .arg("analyze")
        .arg(fixture.dir.path().join("nope.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn analyze_writes_csv_export() {
    let fixture = Fixture::new();
    let usage = fixture.file("usage.csv", &format!("{}Compute,VM,Hours,15\n", HEADER));
    let output = fixture.dir.path().join("out.csv");

    fixture
        .command()
        .arg("analyze")
        .arg(&usage)
        .args(["--format", "csv", "--output"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to:"));

    let contents = fs::read_to_string(&output).unwrap();
    assert_eq!(
        contents,
        "category,subcategory,unit,total\nCompute,VM,Hours,15\n"
    );
}

#[test]
fn compare_json_reports_changes() {
    let fixture = Fixture::new();
    let old = fixture.file("old.csv", &format!("{}A,x,Hours,1\n", HEADER));
    let new = fixture.file("new.csv", &format!("{}B,y,GB,5\n", HEADER));

    let output = fixture
        .command()
        .arg("compare")
        .arg(&old)
        .arg(&new)
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["changes"]["missing_categories"][0], "A");
    assert_eq!(value["changes"]["added_categories"][0], "B");
    assert_eq!(value["document"]["title"], "Service Usage Comparison Report");
}

#[test]
fn analyze_document_is_paginated() {
    let fixture = Fixture::new();
    let usage = fixture.file("usage.csv", &format!("{}Compute,VM,Hours,15\n", HEADER));

    fixture
        .command()
        .arg("analyze")
        .arg(&usage)
        .args(["--format", "document"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Service Usage Analysis Report"))
        .stdout(predicate::str::contains("Page 2 of 2"));
}

#[test]
fn init_writes_settings() {
    let fixture = Fixture::new();

    fixture.command().arg("init").assert().success();
    assert!(fixture.dir.path().join("config").join("settings.json").exists());

    fixture
        .command()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized:      yes"));
}
