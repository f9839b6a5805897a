//! Error types for the liftbook_core library.
//!
//! Store and linker operations report their informational outcomes
//! (missing records, duplicates, rejected fields, no-op mutations) as
//! error variants so the caller decides how to present them. Everything
//! else is an infrastructure failure.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for liftbook_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No exercise with this name exists
    #[error("Exercise '{0}' not found in the database.")]
    ExerciseNotFound(String),

    /// No workout with this name exists
    #[error("Workout '{0}' not found in the database.")]
    WorkoutNotFound(String),

    /// The workout exists but does not embed the exercise
    #[error("Exercise '{exercise}' not found in workout '{workout}'.")]
    NotInWorkout { workout: String, exercise: String },

    /// An exercise with this name already exists
    #[error("Exercise '{0}' already created.")]
    ExerciseExists(String),

    /// A workout with this name already exists
    #[error("Workout '{0}' already created.")]
    WorkoutExists(String),

    /// The workout already embeds an exercise with this name
    #[error("{exercise} already exists in workout {workout}.")]
    AlreadyInWorkout { workout: String, exercise: String },

    /// Attempt to update an attribute that is not user-editable
    #[error("Invalid attribute '{0}'. Only 'name' or 'muscleCategory' can be updated.")]
    InvalidField(String),

    /// A mutation ran but matched or modified nothing
    #[error("{0}")]
    Unchanged(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A stored document could not be decoded
    #[error("Collection '{collection}' is corrupt at line {line}: {source}")]
    Corrupt {
        collection: String,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Coarse classification of an [`Error`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    InvalidField,
    Unchanged,
    Infrastructure,
}

impl ErrorKind {
    /// True for outcomes that end a request without anything being broken
    pub fn is_informational(self) -> bool {
        !matches!(self, ErrorKind::Infrastructure)
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ExerciseNotFound(_) | Error::WorkoutNotFound(_) | Error::NotInWorkout { .. } => {
                ErrorKind::NotFound
            }
            Error::ExerciseExists(_)
            | Error::WorkoutExists(_)
            | Error::AlreadyInWorkout { .. } => ErrorKind::AlreadyExists,
            Error::InvalidField(_) => ErrorKind::InvalidField,
            Error::Unchanged(_) => ErrorKind::Unchanged,
            Error::Io(_)
            | Error::Json(_)
            | Error::Toml(_)
            | Error::Config(_)
            | Error::Corrupt { .. } => ErrorKind::Infrastructure,
        }
    }
}
