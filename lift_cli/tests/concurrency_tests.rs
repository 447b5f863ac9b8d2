//! Concurrency tests for the lift binary.
//!
//! These tests verify that multiple processes can safely append to and read
//! from the session journal at the same time.

use assert_cmd::Command;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use tempfile::TempDir;

fn cli(data_dir: &Path, config: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("lift"));
    cmd.arg("--data-dir").arg(data_dir).arg("--config").arg(config);
    cmd
}

fn setup_test_dir() -> (TempDir, PathBuf, PathBuf) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let data_dir = temp_dir.path().join("data");
    let config = temp_dir.path().join("config.toml");
    fs::write(&config, "").expect("Failed to write config");
    (temp_dir, data_dir, config)
}

fn write_session(temp_dir: &TempDir, day: u32) -> PathBuf {
    let path = temp_dir.path().join(format!("session_{}.json", day));
    let session = json!({
        "name": "Full Body",
        "date": format!("2024-06-{:02}", day),
        "exercises": [{
            "name": "Deadlift",
            "sets": [{
                "index": 0,
                "actual_weight": { "value": 300.0 + f64::from(day) * 5.0, "unit": "lbs" },
                "actual_reps": 3,
                "status": "completed"
            }]
        }]
    });
    fs::write(&path, session.to_string()).expect("Failed to write session");
    path
}

#[test]
fn test_concurrent_session_logging() {
    let (temp_dir, data_dir, config) = setup_test_dir();
    let sessions: Vec<PathBuf> = (1..=8).map(|day| write_session(&temp_dir, day)).collect();

    let handles: Vec<_> = sessions
        .into_iter()
        .map(|session| {
            let data_dir = data_dir.clone();
            let config = config.clone();
            thread::spawn(move || {
                cli(&data_dir, &config)
                    .arg("log")
                    .arg(&session)
                    .assert()
                    .success();
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Logging thread panicked");
    }

    let journal = fs::read_to_string(data_dir.join("sessions.jsonl")).expect("Failed to read journal");
    assert_eq!(journal.lines().count(), 8, "Expected 8 sessions");
    for line in journal.lines() {
        serde_json::from_str::<serde_json::Value>(line).expect("Corrupt journal line");
    }
}

#[test]
fn test_concurrent_reads_and_writes() {
    let (temp_dir, data_dir, config) = setup_test_dir();
    let seed = write_session(&temp_dir, 1);
    cli(&data_dir, &config).arg("log").arg(&seed).assert().success();

    let unlogged = write_session(&temp_dir, 20);
    let writers: Vec<_> = (2..=5)
        .map(|day| {
            let session = write_session(&temp_dir, day);
            let data_dir = data_dir.clone();
            let config = config.clone();
            thread::spawn(move || {
                cli(&data_dir, &config).arg("log").arg(&session).assert().success();
            })
        })
        .collect();
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let unlogged = unlogged.clone();
            let data_dir = data_dir.clone();
            let config = config.clone();
            thread::spawn(move || {
                cli(&data_dir, &config)
                    .arg("highlights")
                    .arg(&unlogged)
                    .assert()
                    .success();
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().expect("Worker thread panicked");
    }

    let journal = fs::read_to_string(data_dir.join("sessions.jsonl")).expect("Failed to read journal");
    assert_eq!(journal.lines().count(), 5);
}
