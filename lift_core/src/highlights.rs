//! Post-workout performance highlights.
//!
//! After a session is completed the host asks the [`HighlightEngine`] what
//! went well. Four independent detectors run against history fetched from a
//! [`SessionHistoryProvider`]:
//!
//! 1. **Personal records** against the all-time best per exercise
//! 2. **Volume** against the last similar session
//! 3. **Streak** of sessions within a week of this one
//! 4. **Weight increases** against the last session with the same exercise
//!
//! Highlights are emitted in that order. Each detector is also available as a
//! pure function returning structured data.

use crate::config::HighlightsConfig;
use crate::history::SessionHistoryProvider;
use crate::types::format_magnitude;
use crate::{
    BestWeight, ExercisePR, HighlightKind, Result, VolumeComparison, Weight, WeightIncrease,
    WorkoutHighlight, WorkoutSession,
};
use std::collections::HashMap;

/// Tunables for the highlight detectors
#[derive(Clone, Debug, PartialEq)]
pub struct HighlightSettings {
    /// Sessions fetched for weight and volume comparison
    pub recent_limit: usize,
    /// Sessions fetched for streak counting
    pub streak_limit: usize,
    /// Largest day distance from this session that still extends a streak
    pub streak_gap_days: i64,
    /// Volume increase (percent) that must be exceeded to highlight
    pub volume_threshold_percent: f64,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self::from(&HighlightsConfig::default())
    }
}

impl From<&HighlightsConfig> for HighlightSettings {
    fn from(config: &HighlightsConfig) -> Self {
        Self {
            recent_limit: config.recent_limit,
            streak_limit: config.streak_limit,
            streak_gap_days: config.streak_gap_days,
            volume_threshold_percent: config.volume_threshold_percent,
        }
    }
}

// ============================================================================
// Per-exercise maxima
// ============================================================================

/// Heaviest completed set of an exercise within one session
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TopSet {
    pub weight: Weight,
    pub reps: u32,
}

/// Heaviest completed set per exercise name, in order of first appearance
///
/// Exercises without sets (section headers) and exercises with no completed
/// weighted set are left out. Ties keep the first set found; sets in another
/// unit than the first weighted set of that exercise are ignored.
pub fn exercise_maxima(session: &WorkoutSession) -> Vec<(String, TopSet)> {
    let mut maxima: Vec<(String, TopSet)> = Vec::new();

    for exercise in session.exercises.iter().filter(|e| !e.sets.is_empty()) {
        for set in exercise.sets.iter().filter(|s| s.is_completed()) {
            let Some(weight) = set.actual_weight else {
                continue;
            };
            let candidate = TopSet {
                weight,
                reps: set.actual_reps.unwrap_or(0),
            };

            match maxima.iter_mut().find(|(name, _)| *name == exercise.name) {
                Some((_, top)) => {
                    if top.weight.unit == weight.unit && weight.value > top.weight.value {
                        *top = candidate;
                    }
                }
                None => maxima.push((exercise.name.clone(), candidate)),
            }
        }
    }

    maxima
}

fn top_set_for(session: &WorkoutSession, exercise_name: &str) -> Option<TopSet> {
    exercise_maxima(session)
        .into_iter()
        .find(|(name, _)| name == exercise_name)
        .map(|(_, top)| top)
}

fn has_sets_for(session: &WorkoutSession, exercise_name: &str) -> bool {
    session
        .exercises
        .iter()
        .any(|e| e.name == exercise_name && !e.sets.is_empty())
}

// ============================================================================
// Detectors
// ============================================================================

/// Personal records set in `session` relative to all-time bests
///
/// An exercise with no history is always a first-time record. Otherwise the
/// session's top weight must strictly exceed the stored best.
pub fn detect_personal_records(
    session: &WorkoutSession,
    best_weights: &HashMap<String, BestWeight>,
) -> Vec<ExercisePR> {
    exercise_maxima(session)
        .into_iter()
        .filter_map(|(name, top)| match best_weights.get(&name) {
            None => Some(ExercisePR {
                exercise_name: name,
                new_weight: top.weight.value,
                new_reps: top.reps,
                old_weight: None,
                old_reps: None,
                unit: top.weight.unit,
            }),
            Some(best) if best.unit != top.weight.unit => {
                tracing::debug!(
                    "Skipping PR check for {}: best recorded in {}, session in {}",
                    name,
                    best.unit,
                    top.weight.unit
                );
                None
            }
            Some(best) if top.weight.value > best.weight => Some(ExercisePR {
                exercise_name: name,
                new_weight: top.weight.value,
                new_reps: top.reps,
                old_weight: Some(best.weight),
                old_reps: Some(best.reps),
                unit: top.weight.unit,
            }),
            Some(_) => None,
        })
        .collect()
}

/// Exercises whose top weight went up since the last session containing them
///
/// `recent` is scanned in the order given (most recent first); the current
/// session is skipped by id.
pub fn detect_weight_increases(
    session: &WorkoutSession,
    recent: &[WorkoutSession],
) -> Vec<WeightIncrease> {
    let mut increases = Vec::new();

    for (name, current) in exercise_maxima(session) {
        let Some(previous_session) = recent
            .iter()
            .filter(|s| s.id != session.id)
            .find(|s| has_sets_for(s, &name))
        else {
            continue;
        };

        let Some(previous) = top_set_for(previous_session, &name) else {
            continue;
        };

        if previous.weight.unit == current.weight.unit
            && current.weight.value > previous.weight.value
        {
            increases.push(WeightIncrease {
                exercise_name: name,
                new_weight: current.weight.value,
                previous_weight: previous.weight.value,
                unit: current.weight.unit,
            });
        }
    }

    increases
}

/// Compare total volume against the most recent similar session
///
/// A session is similar when its name matches case-insensitively or it came
/// from the same template. Only the first similar session is considered.
/// Returns `None` when either volume is zero, the two volumes are in
/// different units, or no similar session exists.
pub fn compare_volume(
    session: &WorkoutSession,
    recent: &[WorkoutSession],
) -> Option<VolumeComparison> {
    let current = session.volume().filter(|v| v.value > 0.0)?;

    let name = session.name.to_lowercase();
    let baseline = recent.iter().filter(|s| s.id != session.id).find(|s| {
        s.name.to_lowercase() == name
            || matches!(
                (&s.template_id, &session.template_id),
                (Some(a), Some(b)) if a == b
            )
    })?;

    let previous = baseline.volume().filter(|v| v.value > 0.0)?;
    if previous.unit != current.unit {
        tracing::debug!(
            "Skipping volume comparison for {}: baseline in {}, session in {}",
            session.name,
            previous.unit,
            current.unit
        );
        return None;
    }

    Some(VolumeComparison {
        current_volume: current.value,
        previous_volume: previous.value,
        percentage_increase: (current.value - previous.value) * 100.0 / previous.value,
        unit: current.unit,
    })
}

/// Count of sessions in the current streak, including `session` itself
///
/// Each other session dated within `gap_days` of *this* session extends the
/// streak; walking back from the most recent, the first one further away
/// ends it. The distance is measured from this session, not between
/// neighbouring sessions.
pub fn calculate_streak(
    session: &WorkoutSession,
    recent: &[WorkoutSession],
    gap_days: i64,
) -> u32 {
    let mut history: Vec<&WorkoutSession> =
        recent.iter().filter(|s| s.id != session.id).collect();
    history.sort_by(|a, b| b.date.cmp(&a.date));

    let mut streak = 1;
    for other in history {
        let days = (session.date - other.date).num_days();
        if days > gap_days {
            break;
        }
        streak += 1;
    }

    streak
}

// ============================================================================
// Highlight rendering
// ============================================================================

pub fn personal_record_highlight(pr: &ExercisePR) -> WorkoutHighlight {
    let new = format!("{} × {}", Weight::new(pr.new_weight, pr.unit), pr.new_reps);
    let message = match (pr.old_weight, pr.old_reps) {
        (Some(old_weight), old_reps) => format!(
            "{}: {} (previous best {} × {})",
            pr.exercise_name,
            new,
            Weight::new(old_weight, pr.unit),
            old_reps.unwrap_or(0)
        ),
        (None, _) => format!("First record for {}: {}", pr.exercise_name, new),
    };

    WorkoutHighlight {
        kind: HighlightKind::PersonalRecord,
        label: "New PR".into(),
        message,
    }
}

pub fn volume_highlight(comparison: &VolumeComparison) -> WorkoutHighlight {
    WorkoutHighlight {
        kind: HighlightKind::VolumeIncrease,
        label: "Volume Up".into(),
        message: format!(
            "Total volume up {:.1}% ({} → {})",
            comparison.percentage_increase,
            format_magnitude(comparison.previous_volume),
            format_magnitude(comparison.current_volume)
        ),
    }
}

/// Streak highlight, or `None` for a streak shorter than two sessions
///
/// Seven or more sessions are reported in whole weeks, fewer in days.
pub fn streak_highlight(streak: u32) -> Option<WorkoutHighlight> {
    if streak < 2 {
        return None;
    }

    let (count, unit) = if streak >= 7 {
        (streak / 7, "week")
    } else {
        (streak % 7, "day")
    };
    Some(WorkoutHighlight {
        kind: HighlightKind::Streak,
        label: "Streak".into(),
        message: format!("{}-{} streak! Keep it going.", count, unit),
    })
}

pub fn weight_increase_highlight(increase: &WeightIncrease) -> WorkoutHighlight {
    WorkoutHighlight {
        kind: HighlightKind::WeightIncrease,
        label: "Weight Up".into(),
        message: format!(
            "{}: {} → {} since last time",
            increase.exercise_name,
            Weight::new(increase.previous_weight, increase.unit),
            Weight::new(increase.new_weight, increase.unit)
        ),
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Computes highlights for completed sessions against a history provider
///
/// The engine holds no state between calls; every invocation fetches fresh
/// snapshots from the provider.
pub struct HighlightEngine<P> {
    provider: P,
    settings: HighlightSettings,
}

impl<P: SessionHistoryProvider> HighlightEngine<P> {
    pub fn new(provider: P) -> Self {
        Self::with_settings(provider, HighlightSettings::default())
    }

    pub fn with_settings(provider: P, settings: HighlightSettings) -> Self {
        Self { provider, settings }
    }

    pub fn settings(&self) -> &HighlightSettings {
        &self.settings
    }

    /// Highlights for a just-completed session
    ///
    /// Provider errors are returned unchanged; everything else degrades to
    /// omitting the affected highlight.
    pub async fn calculate_workout_highlights(
        &self,
        session: &WorkoutSession,
    ) -> Result<Vec<WorkoutHighlight>> {
        let (best_weights, recent, streak_window) = tokio::try_join!(
            self.provider.exercise_best_weights(),
            self.provider.recent_sessions(self.settings.recent_limit),
            self.provider.recent_sessions(self.settings.streak_limit),
        )?;

        let mut highlights = Vec::new();

        let records = detect_personal_records(session, &best_weights);
        highlights.extend(records.iter().map(personal_record_highlight));

        if let Some(comparison) = compare_volume(session, &recent) {
            if comparison.percentage_increase > self.settings.volume_threshold_percent {
                highlights.push(volume_highlight(&comparison));
            }
        }

        let streak = calculate_streak(session, &streak_window, self.settings.streak_gap_days);
        highlights.extend(streak_highlight(streak));

        let increases = detect_weight_increases(session, &recent);
        highlights.extend(increases.iter().map(weight_increase_highlight));

        tracing::info!(
            "Session {} ({}): {} PRs, streak {}, {} weight increases, {} highlights",
            session.id,
            session.name,
            records.len(),
            streak,
            increases.len(),
            highlights.len()
        );

        Ok(highlights)
    }
}
