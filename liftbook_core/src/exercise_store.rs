//! Exercise records: create, look up, edit, replace and delete by name.
//!
//! Name uniqueness is checked with a lookup before each insert. It is not
//! a storage constraint, so two writers racing on the same name can both
//! succeed.

use crate::db::{Collection, Database, Filter};
use crate::{Error, Exercise, ExerciseDraft, ExerciseField, Result};

#[derive(Clone)]
pub struct ExerciseStore {
    exercises: Collection<Exercise>,
}

impl ExerciseStore {
    pub fn new(db: &Database) -> Self {
        Self {
            exercises: db.exercises(),
        }
    }

    /// Insert a new exercise unless one with `name` already exists
    pub fn create(&self, name: &str, muscle_category: &str) -> Result<Exercise> {
        if self.exercises.find_one(Filter::Name(name))?.is_some() {
            return Err(Error::ExerciseExists(name.to_string()));
        }

        let exercise = Exercise::new(name, muscle_category);
        self.exercises.insert_one(&exercise)?;
        tracing::info!("Created exercise '{}' ({})", exercise.name, exercise.id);
        Ok(exercise)
    }

    pub fn find_by_name(&self, name: &str) -> Result<Exercise> {
        self.exercises
            .find_one(Filter::Name(name))?
            .ok_or_else(|| Error::ExerciseNotFound(name.to_string()))
    }

    pub fn list(&self) -> Result<Vec<Exercise>> {
        self.exercises.all()
    }

    /// Set one attribute of the exercise named `name`
    ///
    /// `field` is the stored attribute name (`name` or `muscleCategory`);
    /// anything else is rejected before the database is touched.
    pub fn update_field(&self, name: &str, field: &str, value: &str) -> Result<Exercise> {
        let field: ExerciseField = field.parse()?;
        let mut exercise = self.find_by_name(name)?;

        let result = self
            .exercises
            .update_one(Filter::Id(exercise.id), |e| e.set(field, value))?;
        if result.matched == 0 {
            return Err(Error::Unchanged(format!(
                "Failed to update exercise '{}'.",
                name
            )));
        }

        exercise.set(field, value);
        tracing::info!("Updated exercise '{}': {} = {:?}", name, field, value);
        Ok(exercise)
    }

    /// Replace every attribute of the exercise named `name`, keeping its id
    pub fn replace(&self, name: &str, draft: ExerciseDraft) -> Result<Exercise> {
        let existing = self.find_by_name(name)?;

        let mut replacement = existing.clone();
        replacement.apply(draft);
        let result = self
            .exercises
            .replace_one(Filter::Id(existing.id), replacement.clone())?;
        if result.matched == 0 {
            return Err(Error::Unchanged(format!(
                "Failed to update exercise '{}'.",
                name
            )));
        }

        tracing::info!("Replaced exercise '{}' ({})", name, existing.id);
        Ok(replacement)
    }

    /// Delete every exercise named `name`, returning the count removed
    ///
    /// Snapshots already embedded in workouts are left alone.
    pub fn delete_by_name(&self, name: &str) -> Result<usize> {
        self.find_by_name(name)?;

        let deleted = self.exercises.delete_many(Filter::Name(name))?;
        if deleted == 0 {
            return Err(Error::Unchanged(format!(
                "Failed to delete exercise '{}'.",
                name
            )));
        }

        tracing::info!("Deleted {} exercise(s) named '{}'", deleted, name);
        Ok(deleted)
    }
}
