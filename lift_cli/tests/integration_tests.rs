//! Integration tests for the lift binary.
//!
//! These tests verify end-to-end behavior including:
//! - Plate loadout output
//! - Superset execution order
//! - Highlights against the session journal
//! - Session logging

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to create a test data directory with an empty config file
fn setup_test_dir() -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(temp_dir.path().join("config.toml"), "").expect("Failed to write config");
    temp_dir
}

/// Helper to get the CLI pointed at an isolated data dir and config
fn cli(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("lift"));
    cmd.arg("--data-dir")
        .arg(temp_dir.path().join("data"))
        .arg("--config")
        .arg(temp_dir.path().join("config.toml"));
    cmd
}

fn write_session(dir: &Path, file: &str, session: serde_json::Value) -> PathBuf {
    let path = dir.join(file);
    fs::write(&path, serde_json::to_string_pretty(&session).unwrap())
        .expect("Failed to write session");
    path
}

fn completed_set(index: u32, weight: f64, reps: u32) -> serde_json::Value {
    json!({
        "index": index,
        "actual_weight": { "value": weight, "unit": "lbs" },
        "actual_reps": reps,
        "status": "completed"
    })
}

fn squat_session(date: &str, weight: f64) -> serde_json::Value {
    json!({
        "name": "Leg Day",
        "date": date,
        "exercises": [
            {
                "name": "Back Squat",
                "sets": [completed_set(0, weight, 5), completed_set(1, weight, 5)]
            }
        ]
    })
}

#[test]
fn test_cli_help() {
    Command::new(assert_cmd::cargo::cargo_bin!("lift"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout performance analytics"));
}

#[test]
fn test_plates_output() {
    let temp_dir = setup_test_dir();

    cli(&temp_dir)
        .args(["plates", "225"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2×45lbs"));

    cli(&temp_dir)
        .args(["plates", "152.5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(+1.25lbs short)"));

    cli(&temp_dir)
        .args(["plates", "100", "--unit", "kg", "--per-side"])
        .assert()
        .success()
        .stdout(predicate::str::contains("20kg bar + 1×25kg + 1×15kg per side"));
}

#[test]
fn test_plates_rejects_unknown_unit() {
    let temp_dir = setup_test_dir();

    cli(&temp_dir)
        .args(["plates", "100", "--unit", "stone"])
        .assert()
        .failure();
}

#[test]
fn test_plates_uses_configured_bar() {
    let temp_dir = setup_test_dir();
    fs::write(
        temp_dir.path().join("config.toml"),
        "[plates]\nbar_lbs = 35.0\n",
    )
    .unwrap();

    cli(&temp_dir)
        .args(["plates", "135", "--per-side"])
        .assert()
        .success()
        .stdout(predicate::str::contains("35lbs bar + 1×45lbs + 1×5lbs per side"));
}

#[test]
fn test_classify() {
    let temp_dir = setup_test_dir();

    cli(&temp_dir)
        .args(["classify", "Romanian Deadlift"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Romanian Deadlift: barbell"));

    cli(&temp_dir)
        .args(["classify", "Dumbbell Row"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not a barbell lift"));
}

#[test]
fn test_superset_order() {
    let temp_dir = setup_test_dir();
    let session = json!({
        "name": "Upper",
        "date": "2024-06-01",
        "exercises": [
            {
                "name": "Bench Press",
                "grouping": { "type": "superset", "group_id": "A" },
                "sets": [completed_set(0, 185.0, 5), completed_set(1, 185.0, 5)]
            },
            {
                "name": "Pull-up",
                "grouping": { "type": "superset", "group_id": "A" },
                "sets": [{ "index": 0 }]
            }
        ]
    });
    let path = write_session(temp_dir.path(), "upper.json", session);

    let output = cli(&temp_dir)
        .arg("superset")
        .arg(&path)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).unwrap();

    assert!(stdout.contains("Superset A: Bench Press / Pull-up"));
    let steps: Vec<_> = stdout
        .lines()
        .filter(|l| l.starts_with("  "))
        .map(str::trim)
        .collect();
    assert_eq!(
        steps,
        vec!["Bench Press set 1", "Pull-up set 1", "Bench Press set 2"]
    );
}

#[test]
fn test_log_reports_highlights_and_appends() {
    let temp_dir = setup_test_dir();
    let first = write_session(temp_dir.path(), "first.json", squat_session("2024-06-01", 225.0));
    let second = write_session(temp_dir.path(), "second.json", squat_session("2024-06-04", 245.0));

    cli(&temp_dir)
        .arg("log")
        .arg(&first)
        .assert()
        .success()
        .stdout(predicate::str::contains("First record for Back Squat: 225lbs × 5"))
        .stdout(predicate::str::contains("Session logged"));

    cli(&temp_dir)
        .arg("log")
        .arg(&second)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Back Squat: 245lbs × 5 (previous best 225lbs × 5)",
        ))
        .stdout(predicate::str::contains("Volume Up"))
        .stdout(predicate::str::contains("2-day streak"))
        .stdout(predicate::str::contains("225lbs → 245lbs"));

    let journal = temp_dir.path().join("data").join("sessions.jsonl");
    let contents = fs::read_to_string(&journal).expect("Failed to read journal");
    assert_eq!(contents.lines().count(), 2);
}

#[test]
fn test_logged_session_without_id_is_recognised() {
    let temp_dir = setup_test_dir();
    let first = write_session(temp_dir.path(), "first.json", squat_session("2024-06-01", 225.0));
    let second = write_session(temp_dir.path(), "second.json", squat_session("2024-06-04", 245.0));

    cli(&temp_dir).arg("log").arg(&first).assert().success();
    cli(&temp_dir).arg("log").arg(&second).assert().success();

    cli(&temp_dir)
        .arg("highlights")
        .arg(&second)
        .assert()
        .success()
        .stdout(predicate::str::contains("Volume Up"))
        .stdout(predicate::str::contains("2-day streak"))
        .stdout(predicate::str::contains("3-day streak").not())
        .stdout(predicate::str::contains("225lbs → 245lbs"));

    cli(&temp_dir)
        .arg("log")
        .arg(&second)
        .assert()
        .success()
        .stdout(predicate::str::contains("Session already logged"));

    let journal = temp_dir.path().join("data").join("sessions.jsonl");
    let contents = fs::read_to_string(&journal).expect("Failed to read journal");
    assert_eq!(contents.lines().count(), 2);
}

#[test]
fn test_highlights_does_not_log() {
    let temp_dir = setup_test_dir();
    let session = write_session(temp_dir.path(), "session.json", squat_session("2024-06-01", 225.0));

    cli(&temp_dir)
        .arg("highlights")
        .arg(&session)
        .assert()
        .success()
        .stdout(predicate::str::contains("New PR"));

    assert!(!temp_dir.path().join("data").join("sessions.jsonl").exists());
}

#[test]
fn test_no_highlights_for_repeat_session() {
    let temp_dir = setup_test_dir();
    let first = write_session(temp_dir.path(), "first.json", squat_session("2024-06-01", 225.0));
    let repeat = write_session(temp_dir.path(), "repeat.json", squat_session("2024-07-01", 225.0));

    cli(&temp_dir).arg("log").arg(&first).assert().success();

    cli(&temp_dir)
        .arg("highlights")
        .arg(&repeat)
        .assert()
        .success()
        .stdout(predicate::str::contains("No highlights this time."));
}

#[test]
fn test_malformed_session_fails() {
    let temp_dir = setup_test_dir();
    let path = temp_dir.path().join("bad.json");
    fs::write(&path, "{ not json").unwrap();

    cli(&temp_dir)
        .arg("highlights")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Json"));
}
