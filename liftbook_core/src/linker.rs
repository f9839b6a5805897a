//! Adding exercises to workouts and taking them back out.
//!
//! A workout embeds copies ([`ExerciseSnapshot`]) of the exercises added to
//! it, at most one per exercise name. The copy is taken when the exercise
//! is added; edits made to the exercise afterwards do not reach workouts
//! that already hold it.
//!
//! Each operation is a short sequence of lookups followed by one update
//! matched on the workout id. Nothing makes the sequence atomic, so a
//! concurrent writer can still slip in between the steps.

use crate::db::{Database, Filter};
use crate::exercise_store::ExerciseStore;
use crate::workout_store::WorkoutStore;
use crate::{Error, ExerciseSnapshot, Result, Workout};

pub struct Linker {
    exercises: ExerciseStore,
    workouts: WorkoutStore,
}

impl Linker {
    pub fn new(db: &Database) -> Self {
        Self {
            exercises: ExerciseStore::new(db),
            workouts: WorkoutStore::new(db),
        }
    }

    /// Embed a snapshot of `exercise_name` into `workout_name`
    ///
    /// Returns the workout as it now stands.
    pub fn insert(&self, workout_name: &str, exercise_name: &str) -> Result<Workout> {
        self.workouts.find_by_name(workout_name)?;
        let exercise = self.exercises.find_by_name(exercise_name)?;

        // Re-read: the workout may have changed while the exercise was fetched
        let mut workout = self.workouts.find_by_name(workout_name)?;

        if workout.exercise_names().contains(&exercise_name) {
            return Err(Error::AlreadyInWorkout {
                workout: workout_name.to_string(),
                exercise: exercise_name.to_string(),
            });
        }

        let snapshot = ExerciseSnapshot::from(&exercise);
        let result = self
            .workouts
            .collection()
            .update_one(Filter::Id(workout.id), |w| w.exercises.push(snapshot.clone()))?;
        if result.modified == 0 {
            return Err(Error::Unchanged(format!(
                "Failed to add exercise '{}' to workout '{}'.",
                exercise_name, workout_name
            )));
        }

        workout.exercises.push(snapshot);
        tracing::info!("Added '{}' to workout '{}'", exercise_name, workout_name);
        Ok(workout)
    }

    /// Remove every snapshot named `exercise_name` from `workout_name`
    pub fn remove(&self, workout_name: &str, exercise_name: &str) -> Result<Workout> {
        let mut workout = self.workouts.find_by_name(workout_name)?;

        if !workout.exercise_names().contains(&exercise_name) {
            return Err(Error::NotInWorkout {
                workout: workout_name.to_string(),
                exercise: exercise_name.to_string(),
            });
        }

        let result = self
            .workouts
            .collection()
            .update_one(Filter::Id(workout.id), |w| {
                w.exercises.retain(|s| s.name != exercise_name)
            })?;
        if result.modified == 0 {
            return Err(Error::Unchanged(format!(
                "Failed to remove exercise '{}' from workout '{}'.",
                exercise_name, workout_name
            )));
        }

        workout.exercises.retain(|s| s.name != exercise_name);
        tracing::info!(
            "Removed '{}' from workout '{}'",
            exercise_name,
            workout_name
        );
        Ok(workout)
    }
}
