//! Core domain types for the Lift workout logger.
//!
//! This module defines the fundamental types used throughout the system:
//! - Weights and units
//! - Sets, exercises and sessions as recorded by the session tracker
//! - Plate breakdowns
//! - Achievement signals derived after a workout

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Weight Types
// ============================================================================

/// Unit a weight is recorded in
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeightUnit {
    #[default]
    Lbs,
    Kg,
}

impl WeightUnit {
    /// Standard Olympic bar weight for this unit
    pub fn standard_bar_weight(self) -> f64 {
        match self {
            WeightUnit::Lbs => 45.0,
            WeightUnit::Kg => 20.0,
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightUnit::Lbs => write!(f, "lbs"),
            WeightUnit::Kg => write!(f, "kg"),
        }
    }
}

impl FromStr for WeightUnit {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lb" | "lbs" | "pound" | "pounds" => Ok(WeightUnit::Lbs),
            "kg" | "kgs" | "kilo" | "kilos" | "kilogram" | "kilograms" => Ok(WeightUnit::Kg),
            other => Err(crate::Error::Other(format!("Unknown weight unit: {}", other))),
        }
    }
}

/// A weight magnitude paired with its unit
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Weight {
    pub value: f64,
    pub unit: WeightUnit,
}

impl Weight {
    pub fn new(value: f64, unit: WeightUnit) -> Self {
        Self { value, unit }
    }

    pub fn lbs(value: f64) -> Self {
        Self::new(value, WeightUnit::Lbs)
    }

    pub fn kg(value: f64) -> Self {
        Self::new(value, WeightUnit::Kg)
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", format_magnitude(self.value), self.unit)
    }
}

/// Render a weight magnitude with at most two decimals and no trailing zeros
///
/// `45.0` renders as `45`, `2.5` as `2.5`, `1.2499999` as `1.25`.
pub fn format_magnitude(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        // Avoid "-0"
        return "0".into();
    }
    format!("{}", rounded)
}

// ============================================================================
// Plate Types
// ============================================================================

/// A number of identical plates loaded on one side of the bar
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlateCount {
    pub plate_weight: f64,
    pub count: u32,
}

/// Plate loadout for one side of a barbell
///
/// When `is_achievable` is true, `remainder` is `None` and the plates sum to
/// `weight_per_side` within the plate tolerance. Otherwise `remainder` holds
/// the signed per-side weight that could not be loaded.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlateBreakdown {
    pub weight_per_side: f64,
    pub unit: WeightUnit,
    pub bar_weight: f64,
    pub plates: Vec<PlateCount>,
    pub is_achievable: bool,
    pub remainder: Option<f64>,
}

impl PlateBreakdown {
    /// Total weight loaded on one side
    pub fn loaded_per_side(&self) -> f64 {
        self.plates
            .iter()
            .map(|p| p.plate_weight * f64::from(p.count))
            .sum()
    }

    /// Total weight on the bar including the bar itself
    pub fn loaded_total(&self) -> f64 {
        self.bar_weight + 2.0 * self.loaded_per_side()
    }
}

// ============================================================================
// Session Types
// ============================================================================

/// Completion status of a single set
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SetStatus {
    Completed,
    Skipped,
    #[default]
    Pending,
}

/// One performed (or skipped) unit of work of an exercise
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct SessionSet {
    pub index: u32,
    #[serde(default)]
    pub target_weight: Option<Weight>,
    #[serde(default)]
    pub target_reps: Option<u32>,
    #[serde(default)]
    pub target_time_seconds: Option<u32>,
    #[serde(default)]
    pub target_rpe: Option<f32>,
    #[serde(default)]
    pub actual_weight: Option<Weight>,
    #[serde(default)]
    pub actual_reps: Option<u32>,
    #[serde(default)]
    pub actual_time_seconds: Option<u32>,
    #[serde(default)]
    pub actual_rpe: Option<f32>,
    #[serde(default)]
    pub status: SetStatus,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_dropset: bool,
    #[serde(default)]
    pub is_per_side: bool,
}

impl SessionSet {
    pub fn is_completed(&self) -> bool {
        self.status == SetStatus::Completed
    }

    /// Weight × reps for a completed set with both values recorded
    pub fn volume(&self) -> Option<f64> {
        if !self.is_completed() {
            return None;
        }
        match (self.actual_weight, self.actual_reps) {
            (Some(weight), Some(reps)) => Some(weight.value * f64::from(reps)),
            _ => None,
        }
    }
}

/// How an exercise is grouped within its session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExerciseGrouping {
    #[default]
    Standalone,
    Superset { group_id: String },
}

/// Aggregate status of an exercise
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Skipped,
}

/// An exercise within a session and its ordered sets
///
/// An exercise with no sets is a section header in the imported plan.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct SessionExercise {
    pub name: String,
    #[serde(default)]
    pub equipment_type: Option<String>,
    #[serde(default)]
    pub grouping: ExerciseGrouping,
    #[serde(default)]
    pub sets: Vec<SessionSet>,
    #[serde(default)]
    pub status: ExerciseStatus,
}

impl SessionExercise {
    /// Superset group id, if this exercise belongs to one
    pub fn superset_group(&self) -> Option<&str> {
        match &self.grouping {
            ExerciseGrouping::Superset { group_id } => Some(group_id),
            ExerciseGrouping::Standalone => None,
        }
    }
}

/// Overall status of a workout session
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Completed,
    InProgress,
    Abandoned,
}

/// A recorded workout session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutSession {
    /// Nil when absent from the input; see [`WorkoutSession::from_json`]
    #[serde(default = "Uuid::nil")]
    pub id: Uuid,
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_seconds: Option<u32>,
    #[serde(default)]
    pub exercises: Vec<SessionExercise>,
    #[serde(default)]
    pub status: SessionStatus,
    #[serde(default)]
    pub template_id: Option<String>,
}

/// Namespace for ids derived from session contents
const SESSION_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6c69_6674_2d73_6573_7369_6f6e_2d69_6473);

impl WorkoutSession {
    /// Parse a session, deriving a stable id from its contents when it has none
    ///
    /// Parsing the same id-less document twice yields the same id, so a
    /// session that was already logged is still recognised as itself.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let mut session: WorkoutSession = serde_json::from_str(json)?;
        if session.id.is_nil() {
            session.id = session.content_id()?;
        }
        Ok(session)
    }

    /// Name-based (v5) id over everything but the id itself
    pub fn content_id(&self) -> crate::Result<Uuid> {
        let mut keyed = self.clone();
        keyed.id = Uuid::nil();
        let bytes = serde_json::to_vec(&keyed)?;
        Ok(Uuid::new_v5(&SESSION_ID_NAMESPACE, &bytes))
    }

    /// Total volume: Σ weight × reps over completed sets
    ///
    /// The unit is that of the first completed weighted set; sets recorded in
    /// another unit are left out. `None` when nothing counts toward volume.
    pub fn volume(&self) -> Option<Weight> {
        let mut total: Option<Weight> = None;

        for set in self.exercises.iter().flat_map(|e| e.sets.iter()) {
            let (Some(weight), Some(volume)) = (set.actual_weight, set.volume()) else {
                continue;
            };
            match total.as_mut() {
                Some(total) if total.unit == weight.unit => total.value += volume,
                Some(_) => {}
                None => total = Some(Weight::new(volume, weight.unit)),
            }
        }

        total
    }
}

// ============================================================================
// History and Highlight Types
// ============================================================================

/// All-time best for an exercise, as aggregated by a history provider
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct BestWeight {
    pub weight: f64,
    pub reps: u32,
    pub unit: WeightUnit,
}

/// A personal record set in the current session
///
/// `old_weight`/`old_reps` are `None` for a first-ever record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExercisePR {
    pub exercise_name: String,
    pub new_weight: f64,
    pub new_reps: u32,
    pub old_weight: Option<f64>,
    pub old_reps: Option<u32>,
    pub unit: WeightUnit,
}

impl ExercisePR {
    pub fn is_first_time(&self) -> bool {
        self.old_weight.is_none()
    }
}

/// Top weight moved up compared with the last session containing the exercise
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WeightIncrease {
    pub exercise_name: String,
    pub new_weight: f64,
    pub previous_weight: f64,
    pub unit: WeightUnit,
}

/// Session volume compared with the last similar session
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct VolumeComparison {
    pub current_volume: f64,
    pub previous_volume: f64,
    pub percentage_increase: f64,
    pub unit: WeightUnit,
}

/// Category of an achievement highlight
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HighlightKind {
    PersonalRecord,
    WeightIncrease,
    VolumeIncrease,
    Streak,
}

/// Display-ready achievement derived after a workout
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutHighlight {
    pub kind: HighlightKind,
    pub label: String,
    pub message: String,
}
