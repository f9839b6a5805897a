#![forbid(unsafe_code)]

//! Core domain model and data access for Liftbook.
//!
//! This crate provides:
//! - Domain types (exercises, workouts, embedded exercise snapshots)
//! - A file-backed document database
//! - Exercise and workout stores
//! - The linker that adds exercises to workouts and removes them
//! - Bulk exercise import

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod db;
pub mod exercise_store;
pub mod workout_store;
pub mod linker;
pub mod import;

// Re-export commonly used types
pub use error::{Error, ErrorKind, Result};
pub use types::*;
pub use config::Config;
pub use db::Database;
pub use exercise_store::ExerciseStore;
pub use workout_store::WorkoutStore;
pub use linker::Linker;
pub use import::{import_exercises, ImportReport};
