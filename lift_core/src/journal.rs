//! Session journal: one JSON session per line.
//!
//! Each session is stored at most once, keyed by its id. Logging the same
//! workout twice (including an id-less file, whose id is derived from its
//! contents) leaves the journal unchanged. Writers hold an exclusive lock
//! while they check for the id and append, so concurrent `lift log` runs
//! cannot interleave lines or both add the same session.

use crate::{Result, WorkoutSession};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub struct SessionJournal {
    path: PathBuf,
}

impl SessionJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record a session unless one with the same id is already logged
    ///
    /// Returns `false` when the session was already present.
    pub fn append(&self, session: &WorkoutSession) -> Result<bool> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)?;
        file.lock_exclusive()?;

        if parse_sessions(&file)?.iter().any(|logged| logged.id == session.id) {
            file.unlock()?;
            tracing::info!("Session {} is already in the journal", session.id);
            return Ok(false);
        }

        let mut line = serde_json::to_vec(session)?;
        line.push(b'\n');
        file.write_all(&line)?;
        file.flush()?;
        file.unlock()?;

        tracing::debug!("Journaled session {} ({})", session.id, session.date);
        Ok(true)
    }

    /// Every logged session in journal order; a missing journal is empty
    pub fn sessions(&self) -> Result<Vec<WorkoutSession>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        file.lock_shared()?;
        let sessions = parse_sessions(&file)?;
        file.unlock()?;

        tracing::debug!("Read {} sessions from {:?}", sessions.len(), self.path);
        Ok(sessions)
    }
}

/// Unreadable lines are logged and skipped
fn parse_sessions(file: &File) -> Result<Vec<WorkoutSession>> {
    let mut sessions = Vec::new();

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match WorkoutSession::from_json(&line) {
            Ok(session) => sessions.push(session),
            Err(e) => tracing::warn!("Skipping journal line {}: {}", index + 1, e),
        }
    }

    Ok(sessions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SessionExercise, SessionSet, SessionStatus, SetStatus, Weight};
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn bench_session(day: u32, weight: f64) -> WorkoutSession {
        WorkoutSession {
            id: Uuid::new_v4(),
            name: "Push".into(),
            date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            started_at: None,
            ended_at: None,
            duration_seconds: Some(3600),
            exercises: vec![SessionExercise {
                name: "Bench Press".into(),
                sets: vec![SessionSet {
                    actual_weight: Some(Weight::lbs(weight)),
                    actual_reps: Some(5),
                    status: SetStatus::Completed,
                    ..Default::default()
                }],
                ..Default::default()
            }],
            status: SessionStatus::Completed,
            template_id: None,
        }
    }

    #[test]
    fn test_append_creates_journal_and_keeps_order() {
        let temp_dir = tempfile::tempdir().unwrap();
        let journal = SessionJournal::new(temp_dir.path().join("data").join("sessions.jsonl"));

        assert!(journal.append(&bench_session(1, 185.0)).unwrap());
        assert!(journal.append(&bench_session(4, 190.0)).unwrap());

        let weights: Vec<_> = journal
            .sessions()
            .unwrap()
            .iter()
            .map(|s| s.exercises[0].sets[0].actual_weight.unwrap().value)
            .collect();
        assert_eq!(weights, vec![185.0, 190.0]);
    }

    #[test]
    fn test_same_session_is_logged_once() {
        let temp_dir = tempfile::tempdir().unwrap();
        let journal = SessionJournal::new(temp_dir.path().join("sessions.jsonl"));
        let session = bench_session(1, 185.0);

        assert!(journal.append(&session).unwrap());
        assert!(!journal.append(&session).unwrap());

        let json = r#"{ "name": "Push", "date": "2024-05-02" }"#;
        assert!(journal.append(&WorkoutSession::from_json(json).unwrap()).unwrap());
        assert!(!journal.append(&WorkoutSession::from_json(json).unwrap()).unwrap());

        assert_eq!(journal.sessions().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_journal_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let journal = SessionJournal::new(temp_dir.path().join("nonexistent.jsonl"));
        assert!(journal.sessions().unwrap().is_empty());
    }

    #[test]
    fn test_unreadable_lines_are_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let journal = SessionJournal::new(temp_dir.path().join("sessions.jsonl"));

        journal.append(&bench_session(1, 185.0)).unwrap();
        {
            let mut file = OpenOptions::new().append(true).open(journal.path()).unwrap();
            writeln!(file, "{{ truncated").unwrap();
            writeln!(file).unwrap();
        }
        journal.append(&bench_session(8, 195.0)).unwrap();

        let days: Vec<_> = journal
            .sessions()
            .unwrap()
            .iter()
            .map(|s| s.date.format("%d").to_string())
            .collect();
        assert_eq!(days, vec!["01", "08"]);
    }
}
