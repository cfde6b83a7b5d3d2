use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::prelude::*;
use std::path::Path;

fn fintrack(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("fintrack").unwrap();
    cmd.env("FINTRACK_HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn first_run_loads_sample_records() {
    let temp_dir = tempfile::tempdir().unwrap();

    fintrack(temp_dir.path())
        .arg("list")
        .assert()
        .success()
        .stderr(predicates::str::contains("Loaded 6 sample records"))
        .stdout(predicates::str::contains("Weekly groceries"))
        .stdout(predicates::str::contains("Gym membership"));

    // Second run reads the saved records without seeding again
    fintrack(temp_dir.path())
        .arg("list")
        .assert()
        .success()
        .stderr(predicates::str::contains("sample records").not())
        .stdout(predicates::str::contains("Weekly groceries"));
}

#[test]
fn add_then_search() {
    let temp_dir = tempfile::tempdir().unwrap();

    fintrack(temp_dir.path())
        .args(["add", "Rent payment", "500", "Housing", "--date", "2024-01-02"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Record added: Rent payment"))
        .stdout(predicates::str::contains("id: rec_"));

    fintrack(temp_dir.path())
        .args(["list", "--search", "payment"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Rent payment"))
        .stdout(predicates::str::contains("Weekly groceries").not());
}

#[test]
fn category_filter_limits_listing() {
    let temp_dir = tempfile::tempdir().unwrap();

    fintrack(temp_dir.path())
        .args(["list", "--category", "Transport"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Bus pass"))
        .stdout(predicates::str::contains("September rent").not());
}

#[test]
fn invalid_add_is_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();

    fintrack(temp_dir.path())
        .args(["add", "Lunch", "12.555", "Food", "--date", "2024-03-01"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("Invalid amount"));

    fintrack(temp_dir.path())
        .args(["add", "the the", "-5", "Food 2", "--date", "2024-13-01"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("Invalid amount"))
        .stderr(predicates::str::contains("Invalid category"))
        .stderr(predicates::str::contains("Invalid date"))
        .stderr(predicates::str::contains("Description has duplicate words"));
}

#[test]
fn bad_search_pattern_matches_nothing() {
    let temp_dir = tempfile::tempdir().unwrap();

    fintrack(temp_dir.path())
        .args(["list", "--search", "[oops"])
        .assert()
        .success()
        .stdout(predicates::str::contains("No records match your filters"));
}

#[test]
fn export_then_import() {
    let temp_dir = tempfile::tempdir().unwrap();
    let export_path = temp_dir.path().join("backup.json");

    fintrack(temp_dir.path())
        .args(["export", "--output"])
        .arg(&export_path)
        .assert()
        .success()
        .stdout(predicates::str::contains("Exported to"));

    let exported = std::fs::read_to_string(&export_path).unwrap();
    assert!(exported.contains("\"createdAt\""));

    fintrack(temp_dir.path())
        .args(["delete", "does-not-exist"])
        .assert()
        .success()
        .stdout(predicates::str::contains("No record with id does-not-exist"));

    fintrack(temp_dir.path())
        .arg("import")
        .arg(&export_path)
        .arg("--strict")
        .assert()
        .success()
        .stdout(predicates::str::contains("Imported 6 records"));
}

#[test]
fn import_rejects_non_array() {
    let temp_dir = tempfile::tempdir().unwrap();
    let import_path = temp_dir.path().join("bad.json");
    std::fs::write(&import_path, r#"{"description": "not a list"}"#).unwrap();

    fintrack(temp_dir.path())
        .arg("import")
        .arg(&import_path)
        .assert()
        .failure()
        .stderr(predicates::str::contains("JSON must be an array"));

    // Nothing was replaced
    fintrack(temp_dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicates::str::contains("Weekly groceries"));
}

#[test]
fn settings_drive_cap_status() {
    let temp_dir = tempfile::tempdir().unwrap();

    fintrack(temp_dir.path())
        .args(["settings", "--currency", "EUR", "--cap", "100"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Settings saved"))
        .stdout(predicates::str::contains("EUR"));

    fintrack(temp_dir.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicates::str::contains("Records:"))
        .stdout(predicates::str::contains("Over cap by EUR"));
}
