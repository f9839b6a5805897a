//! Human-readable rendering of store and linker results.

use liftbook_core::{Exercise, Result, Workout};
use std::io::Write;

pub fn exercise_created(exercise: &Exercise) -> String {
    format!(
        "Exercise name: {}, ID: {}, was successfully created.",
        exercise.name, exercise.id
    )
}

pub fn exercise_updated(name: &str) -> String {
    format!("Exercise '{}' updated successfully.", name)
}

pub fn exercise_replaced(name: &str) -> String {
    format!("Exercise '{}' was successfully updated.", name)
}

pub fn exercises_deleted(name: &str, count: usize) -> String {
    if count == 1 {
        format!("Exercise '{}' deleted successfully.", name)
    } else {
        format!(
            "Exercise '{}' deleted successfully ({} records removed).",
            name, count
        )
    }
}

pub fn workout_created(workout: &Workout) -> String {
    format!("Workout '{}' created successfully.", workout.name)
}

pub fn exercise_added(workout: &str, exercise: &str) -> String {
    format!("{} added to workout {}.", exercise, workout)
}

pub fn exercise_removed(workout: &str, exercise: &str) -> String {
    format!("Exercise '{}' removed from workout '{}'.", exercise, workout)
}

pub fn exercise_line(exercise: &Exercise) -> String {
    format!(
        "{} [{}] ({})",
        exercise.name, exercise.muscle_category, exercise.id
    )
}

pub fn workout_detail(workout: &Workout) -> String {
    let mut text = format!("{} ({})", workout.name, workout.id);
    if workout.exercises.is_empty() {
        text.push_str("\n  (no exercises)");
    }
    for (i, snapshot) in workout.exercises.iter().enumerate() {
        text.push_str(&format!(
            "\n  {}. {} [{}]",
            i + 1,
            snapshot.name,
            snapshot.muscle_category
        ));
    }
    text
}

/// Print the outcome of one action
///
/// Successes and informational outcomes (not found, already exists, ...)
/// are printed and the action counts as handled. Infrastructure failures
/// are handed back to the caller.
pub fn report<W: Write>(out: &mut W, outcome: Result<String>) -> Result<()> {
    match outcome {
        Ok(message) => writeln!(out, "{}", message)?,
        Err(e) if e.kind().is_informational() => {
            tracing::debug!("Informational outcome: {:?}", e.kind());
            writeln!(out, "{}", e)?
        }
        Err(e) => return Err(e),
    }
    Ok(())
}

/// Like [`report`], but infrastructure failures are logged and printed too
pub fn report_and_continue<W: Write>(out: &mut W, outcome: Result<String>) -> Result<()> {
    if let Err(e) = report(out, outcome) {
        tracing::error!("Action failed: {}", e);
        writeln!(out, "Error: {}", e)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use liftbook_core::{Error, ExerciseSnapshot};

    #[test]
    fn test_workout_detail_lists_snapshots_in_order() {
        let mut workout = Workout::new("LegDay");
        workout
            .exercises
            .push(ExerciseSnapshot::from(&Exercise::new("Squat", "Legs")));
        workout
            .exercises
            .push(ExerciseSnapshot::from(&Exercise::new("Lunge", "Legs")));

        let text = workout_detail(&workout);
        assert!(text.starts_with("LegDay ("));
        assert!(text.contains("\n  1. Squat [Legs]"));
        assert!(text.contains("\n  2. Lunge [Legs]"));
    }

    #[test]
    fn test_report_prints_informational_outcomes() {
        let mut out = Vec::new();
        report(&mut out, Err(Error::WorkoutNotFound("LegDay".into()))).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Workout 'LegDay' not found in the database.\n"
        );
    }

    #[test]
    fn test_report_returns_infrastructure_failures() {
        let mut out = Vec::new();
        let err = report(&mut out, Err(Error::Config("bad".into()))).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(out.is_empty());

        report_and_continue(&mut out, Err(Error::Config("bad".into()))).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Error: Configuration error: bad\n"
        );
    }
}
