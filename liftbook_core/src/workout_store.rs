//! Workout records.
//!
//! Workouts start empty; their embedded exercises are managed by
//! [`crate::linker::Linker`].

use crate::db::{Collection, Database, Filter};
use crate::{Error, Result, Workout};

#[derive(Clone)]
pub struct WorkoutStore {
    workouts: Collection<Workout>,
}

impl WorkoutStore {
    pub fn new(db: &Database) -> Self {
        Self {
            workouts: db.workouts(),
        }
    }

    /// Insert an empty workout unless one with `name` already exists
    pub fn create(&self, name: &str) -> Result<Workout> {
        if self.workouts.find_one(Filter::Name(name))?.is_some() {
            return Err(Error::WorkoutExists(name.to_string()));
        }

        let workout = Workout::new(name);
        self.workouts.insert_one(&workout)?;
        tracing::info!("Created workout '{}' ({})", workout.name, workout.id);
        Ok(workout)
    }

    pub fn find_by_name(&self, name: &str) -> Result<Workout> {
        self.workouts
            .find_one(Filter::Name(name))?
            .ok_or_else(|| Error::WorkoutNotFound(name.to_string()))
    }

    pub fn list(&self) -> Result<Vec<Workout>> {
        self.workouts.all()
    }

    pub(crate) fn collection(&self) -> &Collection<Workout> {
        &self.workouts
    }
}
