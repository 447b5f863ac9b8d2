#![forbid(unsafe_code)]

//! Core domain model and analytics for the Lift workout logger.
//!
//! This crate provides:
//! - Domain types (weights, sets, exercises, sessions, highlights)
//! - Plate loadout resolution and barbell classification
//! - Superset set sequencing
//! - Post-workout performance highlights
//! - Session history providers and the JSONL session journal

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod plates;
pub mod superset;
pub mod journal;
pub mod history;
pub mod highlights;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use plates::{
    calculate_plates, format_plate_breakdown, format_plates_per_side, is_barbell_exercise,
    BarbellClassifier, KeywordClassifier, PlateInventory, PlateResolver,
};
pub use superset::{
    group_exercises, interleave_superset_sets, session_execution_order, ExerciseBlock,
    InterleavedSet,
};
pub use journal::SessionJournal;
pub use history::{InMemoryHistory, JsonlHistory, SessionHistoryProvider};
pub use highlights::{HighlightEngine, HighlightSettings};
