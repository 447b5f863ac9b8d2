//! Superset set sequencing.
//!
//! Exercises trained as a superset are performed round-robin: the first set
//! of each exercise, then the second set of each, and so on.

use crate::{SessionExercise, SessionSet};

/// One step of an interleaved superset
#[derive(Clone, Copy, Debug)]
pub struct InterleavedSet<'a> {
    pub exercise: &'a SessionExercise,
    pub set: &'a SessionSet,
    pub set_index: usize,
}

/// Interleave the sets of a superset group round-robin
///
/// `[A(3 sets), B(2 sets)]` yields `A1, B1, A2, B2, A3`. Exercises with fewer
/// sets stop contributing once exhausted; order within a round is the order
/// the exercises were supplied in.
pub fn interleave_superset_sets(exercises: &[SessionExercise]) -> Vec<InterleavedSet<'_>> {
    let max_sets = exercises.iter().map(|e| e.sets.len()).max().unwrap_or(0);
    let mut sequence = Vec::with_capacity(exercises.iter().map(|e| e.sets.len()).sum());

    for set_index in 0..max_sets {
        for exercise in exercises {
            if let Some(set) = exercise.sets.get(set_index) {
                sequence.push(InterleavedSet {
                    exercise,
                    set,
                    set_index,
                });
            }
        }
    }

    sequence
}

/// A run of exercises performed together
#[derive(Clone, Copy, Debug)]
pub enum ExerciseBlock<'a> {
    Standalone(&'a SessionExercise),
    Superset {
        group_id: &'a str,
        exercises: &'a [SessionExercise],
    },
}

impl<'a> ExerciseBlock<'a> {
    /// Sets of this block in execution order
    pub fn execution_order(&self) -> Vec<InterleavedSet<'a>> {
        match *self {
            ExerciseBlock::Standalone(exercise) => {
                interleave_superset_sets(std::slice::from_ref(exercise))
            }
            ExerciseBlock::Superset { exercises, .. } => interleave_superset_sets(exercises),
        }
    }
}

/// Split a session's exercises into standalone exercises and superset blocks
///
/// A superset block is a maximal run of consecutive exercises sharing one
/// group id. A lone exercise tagged with a group still forms its own block.
pub fn group_exercises(exercises: &[SessionExercise]) -> Vec<ExerciseBlock<'_>> {
    let mut blocks = Vec::new();
    let mut start = 0;

    while start < exercises.len() {
        let Some(group_id) = exercises[start].superset_group() else {
            blocks.push(ExerciseBlock::Standalone(&exercises[start]));
            start += 1;
            continue;
        };

        let len = exercises[start..]
            .iter()
            .take_while(|e| e.superset_group() == Some(group_id))
            .count();
        blocks.push(ExerciseBlock::Superset {
            group_id,
            exercises: &exercises[start..start + len],
        });
        start += len;
    }

    blocks
}

/// Full execution order of a session, block by block
pub fn session_execution_order(exercises: &[SessionExercise]) -> Vec<InterleavedSet<'_>> {
    group_exercises(exercises)
        .iter()
        .flat_map(|block| block.execution_order())
        .collect()
}
