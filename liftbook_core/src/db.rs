//! File-backed document database.
//!
//! A database is a directory; each collection is a JSON Lines file in it
//! holding one document per line. Every collection operation holds an
//! advisory lock on a sibling `.lock` file for its duration: shared for
//! reads, exclusive for writes. Rewrites go through a temp file in the same
//! directory that is synced and renamed over the collection file.
//!
//! Locks cover single operations only. A lookup followed by a mutation is
//! two operations, and another writer may run in between.

use crate::config::DatabaseConfig;
use crate::{Error, Exercise, Result, Workout};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// A record type stored in its own collection
pub trait Document: Serialize + DeserializeOwned + Clone + PartialEq {
    /// Collection (file stem) this type lives in
    const COLLECTION: &'static str;

    fn id(&self) -> Uuid;
    fn name(&self) -> &str;
}

impl Document for Exercise {
    const COLLECTION: &'static str = "exercises";

    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Document for Workout {
    const COLLECTION: &'static str = "workouts";

    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Match criterion for collection queries
#[derive(Clone, Copy, Debug)]
pub enum Filter<'a> {
    Id(Uuid),
    Name(&'a str),
}

impl Filter<'_> {
    pub fn matches<T: Document>(&self, doc: &T) -> bool {
        match self {
            Filter::Id(id) => doc.id() == *id,
            Filter::Name(name) => doc.name() == *name,
        }
    }
}

/// Outcome of a single-document mutation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateResult {
    pub matched: usize,
    pub modified: usize,
}

/// An open database directory
///
/// Constructed explicitly with [`Database::connect`] and handed by
/// reference to the stores that need it.
#[derive(Debug)]
pub struct Database {
    dir: PathBuf,
}

impl Database {
    /// Open (creating if needed) the database described by `config`
    pub fn connect(config: &DatabaseConfig) -> Result<Self> {
        config.validate()?;
        let dir = config.database_dir();
        std::fs::create_dir_all(&dir)?;
        tracing::debug!("Connected to database at {:?}", dir);
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Handle to the collection storing `T`
    pub fn collection<T: Document>(&self) -> Collection<T> {
        Collection::new(&self.dir)
    }

    pub fn exercises(&self) -> Collection<Exercise> {
        self.collection()
    }

    pub fn workouts(&self) -> Collection<Workout> {
        self.collection()
    }

    /// End the database lifecycle
    pub fn close(self) {
        tracing::debug!("Closed database at {:?}", self.dir);
    }
}

/// Typed handle to one collection file
pub struct Collection<T> {
    path: PathBuf,
    lock_path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            lock_path: self.lock_path.clone(),
            _marker: PhantomData,
        }
    }
}

/// Held advisory lock, released on drop
struct LockGuard {
    file: File,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

impl<T: Document> Collection<T> {
    fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(format!("{}.jsonl", T::COLLECTION)),
            lock_path: dir.join(format!("{}.lock", T::COLLECTION)),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self, exclusive: bool) -> Result<LockGuard> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock_path)?;
        if exclusive {
            file.lock_exclusive()?;
        } else {
            file.lock_shared()?;
        }
        Ok(LockGuard { file })
    }

    /// Read every document; caller holds the lock
    fn read_all(&self) -> Result<Vec<T>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let mut docs = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            if line.trim().is_empty() {
                continue;
            }
            let doc = serde_json::from_str::<T>(&line).map_err(|source| Error::Corrupt {
                collection: T::COLLECTION.to_string(),
                line: line_num + 1,
                source,
            })?;
            docs.push(doc);
        }

        Ok(docs)
    }

    /// Atomically replace the collection contents; caller holds the lock
    fn write_all(&self, docs: &[T]) -> Result<()> {
        let dir = self.path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "collection path missing parent")
        })?;
        let temp = NamedTempFile::new_in(dir)?;

        {
            let mut writer = BufWriter::new(temp.as_file());
            for doc in docs {
                serde_json::to_writer(&mut writer, doc)?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }

    /// Every document in storage order
    pub fn all(&self) -> Result<Vec<T>> {
        let _guard = self.lock(false)?;
        self.read_all()
    }

    /// All documents matching `filter`
    pub fn find(&self, filter: Filter<'_>) -> Result<Vec<T>> {
        let _guard = self.lock(false)?;
        let docs = self.read_all()?;
        Ok(docs.into_iter().filter(|d| filter.matches(d)).collect())
    }

    /// First document matching `filter`
    pub fn find_one(&self, filter: Filter<'_>) -> Result<Option<T>> {
        let _guard = self.lock(false)?;
        let docs = self.read_all()?;
        tracing::debug!("find_one in {} ({:?})", T::COLLECTION, filter);
        Ok(docs.into_iter().find(|d| filter.matches(d)))
    }

    pub fn count(&self, filter: Filter<'_>) -> Result<usize> {
        Ok(self.find(filter)?.len())
    }

    /// Append a document
    pub fn insert_one(&self, doc: &T) -> Result<()> {
        let _guard = self.lock(true)?;

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;

        // A file written elsewhere may lack the final newline
        let needs_newline = file.metadata()?.len() > 0 && {
            let mut last = [0u8; 1];
            file.seek(SeekFrom::End(-1))?;
            file.read_exact(&mut last)?;
            last[0] != b'\n'
        };

        let mut writer = BufWriter::new(&file);
        if needs_newline {
            writer.write_all(b"\n")?;
        }
        let line = serde_json::to_string(doc)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        tracing::debug!("Inserted {} into {}", doc.id(), T::COLLECTION);
        Ok(())
    }

    /// Apply `update` to the first document matching `filter`
    ///
    /// The collection is only rewritten when the document actually changed.
    pub fn update_one<F>(&self, filter: Filter<'_>, update: F) -> Result<UpdateResult>
    where
        F: FnOnce(&mut T),
    {
        let _guard = self.lock(true)?;
        let mut docs = self.read_all()?;

        let Some(doc) = docs.iter_mut().find(|d| filter.matches(&**d)) else {
            return Ok(UpdateResult::default());
        };

        let before = doc.clone();
        update(doc);
        if *doc == before {
            return Ok(UpdateResult {
                matched: 1,
                modified: 0,
            });
        }

        self.write_all(&docs)?;
        tracing::debug!("Updated one document in {} ({:?})", T::COLLECTION, filter);
        Ok(UpdateResult {
            matched: 1,
            modified: 1,
        })
    }

    /// Swap the first document matching `filter` for `replacement`
    pub fn replace_one(&self, filter: Filter<'_>, replacement: T) -> Result<UpdateResult> {
        self.update_one(filter, |doc| *doc = replacement)
    }

    /// Remove every document matching `filter`, returning how many went
    pub fn delete_many(&self, filter: Filter<'_>) -> Result<usize> {
        let _guard = self.lock(true)?;
        let mut docs = self.read_all()?;

        let before = docs.len();
        docs.retain(|d| !filter.matches(d));
        let deleted = before - docs.len();

        if deleted > 0 {
            self.write_all(&docs)?;
        }
        tracing::debug!("Deleted {} documents from {}", deleted, T::COLLECTION);
        Ok(deleted)
    }
}
