//! Concurrency tests for the liftbook binary.
//!
//! Several processes writing the same collections must never interleave
//! partial documents or lose each other's updates to a single record.

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

fn cli(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("liftbook").expect("Failed to find liftbook binary");
    cmd.env("XDG_CONFIG_HOME", data_dir.join("config"))
        .env_remove("LIFTBOOK_DATA_DIR")
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn collection_lines(data_dir: &Path, collection: &str) -> Vec<serde_json::Value> {
    let path = data_dir
        .join("workout_application")
        .join(format!("{}.jsonl", collection));
    let content = std::fs::read_to_string(path).expect("Failed to read collection");

    content
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| {
            serde_json::from_str(line)
                .unwrap_or_else(|e| panic!("Collection contains invalid JSON line {}: {}", line, e))
        })
        .collect()
}

#[test]
fn test_no_collection_corruption_under_load() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let data_dir = data_dir.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(i * 5));
                cli(&data_dir)
                    .args(["exercise", "create", format!("Exercise {}", i).as_str(), "Legs"])
                    .timeout(Duration::from_secs(10))
                    .assert()
                    .success();
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let exercises = collection_lines(&data_dir, "exercises");
    assert_eq!(exercises.len(), 10, "Expected 10 exercises");
}

#[test]
fn test_concurrent_adds_to_one_workout() {
    let temp_dir = setup_test_dir();
    let data_dir: PathBuf = temp_dir.path().to_path_buf();
    let names = ["Squat", "Lunge", "Deadlift", "Step Up", "Calf Raise"];

    for name in names {
        cli(&data_dir)
            .args(["exercise", "create", name, "Legs"])
            .assert()
            .success();
    }
    cli(&data_dir)
        .args(["workout", "create", "LegDay"])
        .assert()
        .success();

    let handles: Vec<_> = names
        .iter()
        .map(|name| {
            let data_dir = data_dir.clone();
            let name = name.to_string();
            thread::spawn(move || {
                cli(&data_dir)
                    .args(["workout", "add", "LegDay", name.as_str()])
                    .timeout(Duration::from_secs(10))
                    .assert()
                    .success();
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let workouts = collection_lines(&data_dir, "workouts");
    assert_eq!(workouts.len(), 1);
    let embedded = workouts[0]["exercises"].as_array().unwrap();
    assert_eq!(embedded.len(), names.len(), "Lost an update: {:?}", embedded);
}
