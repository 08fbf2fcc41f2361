//! End-to-end tests for the pricesift binary

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

const CATALOG: &str = "tests/data/catalog";

// Helper function to create a directory with two CSV sources and one text file
fn prepare_test_dir(dir: &std::path::Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let root = dir.join("products");
    fs::create_dir(&root)?;
    fs::write(
        root.join("first.csv"),
        "CompanyID,Kind,Price\nA1,lamp,$19.99\nA2,chair,49.00\n",
    )?;
    fs::write(root.join("second.csv"), "CompanyID,Kind,Price\nB1,lamp,abc\n")?;
    fs::write(root.join("notes.txt"), "CompanyID,Kind,Price\nN1,lamp,5.00\n")?;
    Ok(root)
}

#[test]
fn test_greater_than_table() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let dir = prepare_test_dir(temp_dir.path())?;

    let mut cmd = Command::cargo_bin("pricesift")?;
    cmd.arg("--dir").arg(&dir).args(["--op", ">", "--price", "20"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("CompanyID"))
        .stdout(predicate::str::contains("A2"))
        .stdout(predicate::str::contains("49.00"))
        .stdout(predicate::str::contains("A1").not())
        .stdout(predicate::str::contains("N1").not())
        .stderr(predicate::str::contains("loaded 2 total records"));

    Ok(())
}

#[test]
fn test_equal_json() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let dir = prepare_test_dir(temp_dir.path())?;

    let output = Command::cargo_bin("pricesift")?
        .arg("--dir")
        .arg(&dir)
        .args(["--op", "=", "--price", "19.99", "--json"])
        .output()?;
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(
        value,
        serde_json::json!([{ "company_id": "A1", "kind": "lamp", "price": 19.99 }])
    );

    Ok(())
}

#[test]
fn test_no_matches() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("pricesift")?;
    cmd.args(["--dir", CATALOG, "--op", ">", "--price", "1000"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No matching products."));

    let mut cmd = Command::cargo_bin("pricesift")?;
    cmd.args(["--dir", CATALOG, "--op", ">", "--price", "1000", "--json"]);
    cmd.assert().success().stdout(predicate::str::starts_with("[]"));

    Ok(())
}

#[test]
fn test_cheapest_and_category() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("pricesift")?;
    cmd.args(["--dir", CATALOG, "--op", ">", "--price", "1", "--cheapest"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("A1"))
        .stdout(predicate::str::contains("A2").not())
        .stdout(predicate::str::contains("C1").not());

    let mut cmd = Command::cargo_bin("pricesift")?;
    cmd.args(["--dir", CATALOG, "--op", ">", "--price", "1", "--category", "desk"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("C1"))
        .stdout(predicate::str::contains("120.00"))
        .stdout(predicate::str::contains("A1").not());

    Ok(())
}

#[test]
fn test_files_with_jobs() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("pricesift")?;
    cmd.args([
        "--file",
        "tests/data/catalog/a.csv",
        "--file",
        "tests/data/catalog/nested/C.CSV",
        "--jobs",
        "2",
        "--op",
        "<",
        "--price",
        "200",
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("A1"))
        .stdout(predicate::str::contains("A2"))
        .stdout(predicate::str::contains("C1"))
        .stderr(predicate::str::contains("loaded 3 total records"));

    Ok(())
}

#[test]
fn test_invalid_operator() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("pricesift")?;
    cmd.args(["--dir", CATALOG, "--op", "<=", "--price", "5"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid operator"));

    Ok(())
}

#[test]
fn test_non_positive_price() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("pricesift")?;
    cmd.args(["--dir", CATALOG, "--op", "<", "--price", "0"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("must be a positive number"));

    Ok(())
}

#[test]
fn test_missing_input() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("pricesift")?;
    cmd.args(["--op", "<", "--price", "5"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no input given"));

    Ok(())
}

#[test]
fn test_schema_error_names_source() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("broken.csv"), "CompanyID,Kind\nA1,lamp\n")?;

    let mut cmd = Command::cargo_bin("pricesift")?;
    cmd.arg("--dir")
        .arg(temp_dir.path())
        .args(["--op", "<", "--price", "5"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("error loading CSVs"))
        .stderr(predicate::str::contains("broken.csv"))
        .stderr(predicate::str::contains("missing required column \"price\""));

    Ok(())
}
