//! Interactive numbered menu.
//!
//! Reads one line per prompt from the input. End of input or `q` leaves
//! the loop. Typed text is only ever used as data.

use crate::output::{self, report_and_continue};
use liftbook_core::{Database, ExerciseStore, Linker, Result, WorkoutStore};
use std::io::{BufRead, Write};

const MENU: &str = "Welcome, user. What task would you like to run?
1. Create an exercise
2. Update an exercise
3. Delete an exercise
4. Create a workout
5. Add exercises to a workout
6. Delete exercises from a workout
q. Quit
";

pub struct Shell<R, W> {
    exercises: ExerciseStore,
    workouts: WorkoutStore,
    linker: Linker,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(db: &Database, input: R, output: W) -> Self {
        Self {
            exercises: ExerciseStore::new(db),
            workouts: WorkoutStore::new(db),
            linker: Linker::new(db),
            input,
            output,
        }
    }

    /// Print `message` and read one trimmed line; `None` at end of input
    ///
    /// A line that is not valid UTF-8 is reported and the question asked again.
    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        loop {
            let Some(bytes) = self.read_raw(message)? else {
                return Ok(None);
            };
            match String::from_utf8(bytes) {
                Ok(line) => return Ok(Some(line.trim().to_string())),
                Err(e) => {
                    tracing::debug!("Rejected non UTF-8 input: {}", e);
                    writeln!(self.output, "Invalid input. Please enter plain text.")?;
                }
            }
        }
    }

    fn read_raw(&mut self, message: &str) -> Result<Option<Vec<u8>>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;

        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(buf))
    }

    /// Wait for the user before showing the menu again; the line is discarded
    fn pause(&mut self) -> Result<bool> {
        Ok(self.read_raw("Press Enter to continue... ")?.is_some())
    }

    pub fn run(&mut self) -> Result<()> {
        loop {
            write!(self.output, "\n{}", MENU)?;

            let Some(choice) = self.prompt("Select an option... ")? else {
                break;
            };
            if choice.eq_ignore_ascii_case("q") || choice.eq_ignore_ascii_case("quit") {
                break;
            }

            let choice: u32 = match choice.parse() {
                Ok(n) => n,
                Err(_) => {
                    writeln!(
                        self.output,
                        "Invalid input. Please enter a number between 1 and 6."
                    )?;
                    if !self.pause()? {
                        break;
                    }
                    continue;
                }
            };

            let outcome = match choice {
                1 => {
                    let Some(name) = self.prompt("Enter the exercise name: ")? else {
                        break;
                    };
                    let Some(category) = self.prompt("Enter the muscle category: ")? else {
                        break;
                    };
                    self.exercises
                        .create(&name, &category)
                        .map(|e| output::exercise_created(&e))
                }
                2 => {
                    let Some(name) = self.prompt("Enter the name of the exercise to update: ")?
                    else {
                        break;
                    };
                    let Some(field) =
                        self.prompt("Enter the attribute to update (name, muscleCategory): ")?
                    else {
                        break;
                    };
                    let Some(value) = self.prompt("Enter the new value: ")? else {
                        break;
                    };
                    self.exercises
                        .update_field(&name, &field, &value)
                        .map(|_| output::exercise_updated(&name))
                }
                3 => {
                    let Some(name) = self.prompt("Enter the name of the exercise to delete: ")?
                    else {
                        break;
                    };
                    self.exercises
                        .delete_by_name(&name)
                        .map(|count| output::exercises_deleted(&name, count))
                }
                4 => {
                    let Some(name) = self.prompt("Enter the name of the workout: ")? else {
                        break;
                    };
                    self.workouts
                        .create(&name)
                        .map(|w| output::workout_created(&w))
                }
                5 => {
                    let Some(workout) = self.prompt("Enter the name of the workout: ")? else {
                        break;
                    };
                    let Some(exercise) = self.prompt("Enter the name of the exercise to add: ")?
                    else {
                        break;
                    };
                    self.linker
                        .insert(&workout, &exercise)
                        .map(|_| output::exercise_added(&workout, &exercise))
                }
                6 => {
                    let Some(workout) = self.prompt("Enter the name of the workout: ")? else {
                        break;
                    };
                    let Some(exercise) =
                        self.prompt("Enter the name of the exercise to be deleted: ")?
                    else {
                        break;
                    };
                    self.linker
                        .remove(&workout, &exercise)
                        .map(|_| output::exercise_removed(&workout, &exercise))
                }
                _ => {
                    writeln!(
                        self.output,
                        "Invalid option. Please select a number between 1 and 6."
                    )?;
                    continue;
                }
            };

            report_and_continue(&mut self.output, outcome)?;
            if !self.pause()? {
                break;
            }
        }

        writeln!(self.output)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liftbook_core::config::DatabaseConfig;
    use std::io::Cursor;

    fn run_bytes(script: &[u8]) -> (tempfile::TempDir, String) {
        let temp_dir = tempfile::tempdir().unwrap();
        let db = Database::connect(&DatabaseConfig {
            data_dir: temp_dir.path().to_path_buf(),
            name: "shell_test".into(),
        })
        .unwrap();

        let mut out = Vec::new();
        Shell::new(&db, Cursor::new(script.to_vec()), &mut out)
            .run()
            .unwrap();
        (temp_dir, String::from_utf8(out).unwrap())
    }

    fn run_script(script: &str) -> (tempfile::TempDir, String) {
        run_bytes(script.as_bytes())
    }

    #[test]
    fn test_create_and_link() {
        let (_tmp, out) = run_script(
            "1\nSquat\nLegs\n\n4\nLegDay\n\n5\nLegDay\nSquat\n\n5\nLegDay\nSquat\n\nq\n",
        );
        assert!(out.contains("Exercise name: Squat, ID: "));
        assert!(out.contains("Workout 'LegDay' created successfully."));
        assert!(out.contains("Squat added to workout LegDay."));
        assert!(out.contains("Squat already exists in workout LegDay."));
    }

    #[test]
    fn test_invalid_input_messages() {
        let (_tmp, out) = run_script("abc\n\n9\nq\n");
        assert!(out.contains("Invalid input. Please enter a number between 1 and 6."));
        assert!(out.contains("Invalid option. Please select a number between 1 and 6."));
    }

    #[test]
    fn test_pause_input_is_not_interpreted() {
        let (_tmp, out) = run_script("4\nLegDay\n__import__('os')\n4\nLegDay\n\n");
        assert!(out.contains("Workout 'LegDay' created successfully."));
        assert!(out.contains("Workout 'LegDay' already created."));
    }

    #[test]
    fn test_end_of_input_mid_action_exits_cleanly() {
        let (_tmp, out) = run_script("1\nSquat\n");
        assert!(out.contains("Enter the muscle category: "));
        assert!(!out.contains("successfully created"));
    }

    #[test]
    fn test_update_with_bad_attribute() {
        let (_tmp, out) = run_script("1\nSquat\nLegs\n\n2\nSquat\ncategory\nQuads\n\n");
        assert!(out.contains(
            "Invalid attribute 'category'. Only 'name' or 'muscleCategory' can be updated."
        ));
    }

    #[test]
    fn test_non_utf8_input_keeps_session_alive() {
        let (_tmp, out) = run_bytes(b"\xff\xfe\n4\nLeg\xc3\nLegDay\n\xff\nq\n");
        assert_eq!(out.matches("Invalid input. Please enter plain text.").count(), 2);
        assert!(out.contains("Workout 'LegDay' created successfully."));
        // The pause discards its line whatever the bytes
        assert!(!out.contains("Invalid input. Please enter a number"));
    }
}
