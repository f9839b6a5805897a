//! Core domain types for Liftbook.
//!
//! - Exercises and the drafts used to create or replace them
//! - Workouts and the exercise snapshots they embed
//! - The set of user-editable exercise fields

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Exercises
// ============================================================================

/// A named movement tagged with the muscle group it works
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub muscle_category: String,
}

impl Exercise {
    /// Build a new record with a freshly generated id
    pub fn new(name: impl Into<String>, muscle_category: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            muscle_category: muscle_category.into(),
        }
    }

    /// Overwrite every user attribute, keeping the id
    pub fn apply(&mut self, draft: ExerciseDraft) {
        self.name = draft.name;
        self.muscle_category = draft.muscle_category;
    }

    pub fn set(&mut self, field: ExerciseField, value: impl Into<String>) {
        match field {
            ExerciseField::Name => self.name = value.into(),
            ExerciseField::MuscleCategory => self.muscle_category = value.into(),
        }
    }
}

/// The user attributes of an exercise, without an id
///
/// This is the shape accepted by full replacement and by bulk import.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseDraft {
    pub name: String,
    pub muscle_category: String,
}

impl ExerciseDraft {
    pub fn new(name: impl Into<String>, muscle_category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            muscle_category: muscle_category.into(),
        }
    }
}

impl From<ExerciseDraft> for Exercise {
    fn from(draft: ExerciseDraft) -> Self {
        Exercise::new(draft.name, draft.muscle_category)
    }
}

/// Exercise attributes that may be changed one at a time
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExerciseField {
    Name,
    MuscleCategory,
}

impl ExerciseField {
    pub const ALL: [ExerciseField; 2] = [ExerciseField::Name, ExerciseField::MuscleCategory];

    /// Stored attribute name
    pub fn as_str(self) -> &'static str {
        match self {
            ExerciseField::Name => "name",
            ExerciseField::MuscleCategory => "muscleCategory",
        }
    }
}

impl fmt::Display for ExerciseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExerciseField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| Error::InvalidField(s.to_string()))
    }
}

// ============================================================================
// Workouts
// ============================================================================

/// A copy of an exercise taken when it was added to a workout
///
/// Snapshots are values, not references: editing or deleting the source
/// exercise afterwards leaves every embedded copy as it was.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSnapshot {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub muscle_category: String,
}

impl From<&Exercise> for ExerciseSnapshot {
    fn from(exercise: &Exercise) -> Self {
        Self {
            id: exercise.id,
            name: exercise.name.clone(),
            muscle_category: exercise.muscle_category.clone(),
        }
    }
}

/// A named, ordered list of embedded exercise snapshots
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub exercises: Vec<ExerciseSnapshot>,
}

impl Workout {
    /// Build an empty workout with a freshly generated id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            exercises: Vec::new(),
        }
    }

    /// Distinct names of the embedded exercises, in first-seen order
    pub fn exercise_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::with_capacity(self.exercises.len());
        for snapshot in &self.exercises {
            if !names.contains(&snapshot.name.as_str()) {
                names.push(&snapshot.name);
            }
        }
        names
    }

    pub fn contains_exercise(&self, name: &str) -> bool {
        self.exercises.iter().any(|s| s.name == name)
    }
}
