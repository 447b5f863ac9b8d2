//! Session history providers.
//!
//! The highlight engine never reads storage directly; it asks a
//! [`SessionHistoryProvider`] for immutable snapshots. This module defines
//! that seam plus two implementations: an in-memory snapshot and a reader
//! over the JSONL session journal.

use crate::highlights::exercise_maxima;
use crate::{BestWeight, Error, Result, SessionJournal, SessionStatus, WorkoutSession};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;

/// Read-only source of historical sessions
#[async_trait]
pub trait SessionHistoryProvider: Send + Sync {
    /// All-time best weight per exercise name (case-sensitive as stored)
    async fn exercise_best_weights(&self) -> Result<HashMap<String, BestWeight>>;

    /// Up to `limit` sessions, most recent first
    async fn recent_sessions(&self, limit: usize) -> Result<Vec<WorkoutSession>>;
}

/// Aggregate all-time bests over completed sessions
///
/// Sessions are visited oldest first so that the earliest of two equal bests
/// is kept. Sets recorded in a different unit from an exercise's existing
/// best are not compared against it.
pub fn aggregate_best_weights(sessions: &[WorkoutSession]) -> HashMap<String, BestWeight> {
    let mut chronological: Vec<&WorkoutSession> = sessions
        .iter()
        .filter(|s| s.status == SessionStatus::Completed)
        .collect();
    chronological.sort_by(|a, b| a.date.cmp(&b.date).then(a.started_at.cmp(&b.started_at)));

    let mut bests: HashMap<String, BestWeight> = HashMap::new();
    for session in chronological {
        for (name, top) in exercise_maxima(session) {
            let candidate = BestWeight {
                weight: top.weight.value,
                reps: top.reps,
                unit: top.weight.unit,
            };
            match bests.get_mut(&name) {
                Some(best) if best.unit == candidate.unit && candidate.weight > best.weight => {
                    *best = candidate;
                }
                Some(_) => {}
                None => {
                    bests.insert(name, candidate);
                }
            }
        }
    }

    bests
}

/// Order sessions most recent first and keep at most `limit`
pub fn most_recent_first(mut sessions: Vec<WorkoutSession>, limit: usize) -> Vec<WorkoutSession> {
    sessions.sort_by(|a, b| b.date.cmp(&a.date).then(b.started_at.cmp(&a.started_at)));
    sessions.truncate(limit);
    sessions
}

// ============================================================================
// In-memory provider
// ============================================================================

/// Provider over an owned snapshot of sessions
#[derive(Clone, Debug, Default)]
pub struct InMemoryHistory {
    sessions: Vec<WorkoutSession>,
}

impl InMemoryHistory {
    pub fn new(sessions: Vec<WorkoutSession>) -> Self {
        Self { sessions }
    }

    pub fn sessions(&self) -> &[WorkoutSession] {
        &self.sessions
    }
}

#[async_trait]
impl SessionHistoryProvider for InMemoryHistory {
    async fn exercise_best_weights(&self) -> Result<HashMap<String, BestWeight>> {
        Ok(aggregate_best_weights(&self.sessions))
    }

    async fn recent_sessions(&self, limit: usize) -> Result<Vec<WorkoutSession>> {
        Ok(most_recent_first(self.sessions.clone(), limit))
    }
}

// ============================================================================
// Journal-backed provider
// ============================================================================

/// Provider reading the JSONL session journal on every call
#[derive(Clone, Debug)]
pub struct JsonlHistory {
    journal: SessionJournal,
}

impl JsonlHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            journal: SessionJournal::new(path),
        }
    }

    async fn load(&self) -> Result<Vec<WorkoutSession>> {
        let journal = self.journal.clone();
        tokio::task::spawn_blocking(move || journal.sessions())
            .await
            .map_err(|e| Error::History(format!("Journal reader task failed: {}", e)))?
    }
}

#[async_trait]
impl SessionHistoryProvider for JsonlHistory {
    async fn exercise_best_weights(&self) -> Result<HashMap<String, BestWeight>> {
        let sessions = self.load().await?;
        let bests = aggregate_best_weights(&sessions);
        tracing::debug!("Aggregated bests for {} exercises", bests.len());
        Ok(bests)
    }

    async fn recent_sessions(&self, limit: usize) -> Result<Vec<WorkoutSession>> {
        let sessions = self.load().await?;
        Ok(most_recent_first(sessions, limit))
    }
}
