//! Bulk loading of exercises from a JSON file.
//!
//! The file holds a JSON array of `{ "name": ..., "muscleCategory": ... }`
//! objects. Records whose name is already taken are skipped; records that
//! don't have that shape or fail to insert are counted as failures. Both
//! skips and failures count against "all documents loaded".

use crate::exercise_store::ExerciseStore;
use crate::{Error, ExerciseDraft, Result};
use std::fmt;
use std::path::Path;

/// A record that was not inserted, with the reason
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportFailure {
    /// Exercise name, or `#<index>` when the record has no usable name
    pub record: String,
    pub reason: String,
}

/// Per-record results of a bulk import
#[derive(Clone, Debug, Default)]
pub struct ImportReport {
    pub inserted: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<ImportFailure>,
}

impl ImportReport {
    /// Records that did not end up inserted, skips included
    pub fn failure_count(&self) -> usize {
        self.skipped.len() + self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failure_count() == 0
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Successful insertions: {}", self.inserted.len())?;
        writeln!(f, "Failed insertions: {}", self.failure_count())?;
        if self.is_complete() {
            write!(f, "All documents were loaded successfully.")
        } else {
            write!(
                f,
                "Some documents failed to load. Please review the error messages."
            )
        }
    }
}

/// Load the exercises in `path` into `store`
pub fn import_exercises(store: &ExerciseStore, path: &Path) -> Result<ImportReport> {
    let contents = std::fs::read_to_string(path)?;
    let records: Vec<serde_json::Value> = serde_json::from_str(&contents)?;
    tracing::info!("Importing {} records from {:?}", records.len(), path);

    let mut report = ImportReport::default();

    for (index, record) in records.into_iter().enumerate() {
        let label = record
            .get("name")
            .and_then(|n| n.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{}", index));

        let draft: ExerciseDraft = match serde_json::from_value(record) {
            Ok(draft) => draft,
            Err(e) => {
                tracing::warn!("Failed to parse record {}: {}", label, e);
                report.failed.push(ImportFailure {
                    record: label,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        match store.create(&draft.name, &draft.muscle_category) {
            Ok(_) => report.inserted.push(draft.name),
            Err(Error::ExerciseExists(name)) => {
                tracing::warn!(
                    "Document {} already exists in the collection, skipping...",
                    name
                );
                report.skipped.push(name);
            }
            Err(e) => {
                tracing::warn!("Failed to insert document {}: {}", draft.name, e);
                report.failed.push(ImportFailure {
                    record: draft.name,
                    reason: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        "Import finished: {} inserted, {} skipped, {} failed",
        report.inserted.len(),
        report.skipped.len(),
        report.failed.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::open_temp_db;

    fn write_file(dir: &Path, contents: &str) -> std::path::PathBuf {
        let path = dir.join("exercises.json");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_import_inserts_new_records() {
        let (tmp, db) = open_temp_db();
        let store = ExerciseStore::new(&db);
        let path = write_file(
            tmp.path(),
            r#"[
                {"name": "Squat", "muscleCategory": "Legs"},
                {"name": "Bench Press", "muscleCategory": "Chest"}
            ]"#,
        );

        let report = import_exercises(&store, &path).unwrap();
        assert_eq!(report.inserted, vec!["Squat", "Bench Press"]);
        assert!(report.is_complete());
        assert_eq!(store.list().unwrap().len(), 2);
        assert!(report
            .to_string()
            .ends_with("All documents were loaded successfully."));
    }

    #[test]
    fn test_import_skips_existing_names() {
        let (tmp, db) = open_temp_db();
        let store = ExerciseStore::new(&db);
        store.create("Squat", "Legs").unwrap();
        let path = write_file(
            tmp.path(),
            r#"[
                {"name": "Squat", "muscleCategory": "Quads"},
                {"name": "Row", "muscleCategory": "Back"},
                {"name": "Row", "muscleCategory": "Back"}
            ]"#,
        );

        let report = import_exercises(&store, &path).unwrap();
        assert_eq!(report.inserted, vec!["Row"]);
        assert_eq!(report.skipped, vec!["Squat", "Row"]);
        assert_eq!(report.failure_count(), 2);
        assert_eq!(store.find_by_name("Squat").unwrap().muscle_category, "Legs");
        assert!(report.to_string().contains("Failed insertions: 2"));
    }

    #[test]
    fn test_import_counts_malformed_records() {
        let (tmp, db) = open_temp_db();
        let store = ExerciseStore::new(&db);
        let path = write_file(
            tmp.path(),
            r#"[
                {"name": "Squat"},
                {"muscleCategory": "Back"},
                {"name": "Row", "muscleCategory": "Back"}
            ]"#,
        );

        let report = import_exercises(&store, &path).unwrap();
        assert_eq!(report.inserted, vec!["Row"]);
        assert_eq!(report.failed.len(), 2);
        assert_eq!(report.failed[0].record, "Squat");
        assert_eq!(report.failed[1].record, "#1");
        assert!(!report.is_complete());
    }

    #[test]
    fn test_import_keeps_going_after_storage_failures() {
        let (tmp, db) = open_temp_db();
        let store = ExerciseStore::new(&db);
        store.create("Squat", "Legs").unwrap();
        // Replacing the collection file with a directory makes every
        // later lookup and insert fail at the storage layer
        std::fs::remove_file(db.exercises().path()).unwrap();
        std::fs::create_dir(db.exercises().path()).unwrap();
        let path = write_file(
            tmp.path(),
            r#"[
                {"name": "Lunge", "muscleCategory": "Legs"},
                {"muscleCategory": "Back"},
                {"name": "Row", "muscleCategory": "Back"}
            ]"#,
        );

        let report = import_exercises(&store, &path).unwrap();
        assert!(report.inserted.is_empty());
        let failed: Vec<&str> = report.failed.iter().map(|f| f.record.as_str()).collect();
        assert_eq!(failed, vec!["Lunge", "#1", "Row"]);
        assert!(report.to_string().contains("Failed insertions: 3"));
    }

    #[test]
    fn test_import_requires_array() {
        let (tmp, db) = open_temp_db();
        let store = ExerciseStore::new(&db);
        let path = write_file(tmp.path(), r#"{"name": "Squat"}"#);

        assert!(matches!(
            import_exercises(&store, &path),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_import_missing_file() {
        let (tmp, db) = open_temp_db();
        let store = ExerciseStore::new(&db);

        assert!(matches!(
            import_exercises(&store, &tmp.path().join("nope.json")),
            Err(Error::Io(_))
        ));
    }
}
