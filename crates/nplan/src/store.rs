//! Plan persistence.
//!
//! [`PlanStore`] reads and writes a [`PlanDocument`] as YAML through a
//! [`FileSystem`] capability. The host filesystem is [`OsFs`]; tests use
//! [`MemoryFs`], which also counts writes.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::Result;
use crate::plan::PlanDocument;

/// Filesystem operations needed by the store.
pub trait FileSystem {
    /// Check if a file exists.
    fn exists(&self, path: &Path) -> bool;

    /// Read a whole file as UTF-8.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Replace a file's contents.
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
}

/// The host filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFs;

impl FileSystem for OsFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        std::fs::write(path, contents)
    }
}

#[derive(Debug, Default)]
struct MemoryFsInner {
    files: BTreeMap<PathBuf, String>,
    writes: usize,
}

/// An in-memory filesystem.
///
/// Clones share the same files, so a test can keep a handle while the
/// store owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    inner: Arc<Mutex<MemoryFsInner>>,
}

impl MemoryFs {
    /// Create an empty filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file without counting it as a write.
    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.lock().files.insert(path.into(), contents.into());
        self
    }

    /// Get a file's contents.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.lock().files.get(path.as_ref()).cloned()
    }

    /// Number of writes performed so far.
    pub fn writes(&self) -> usize {
        self.lock().writes
    }

    fn lock(&self) -> MutexGuard<'_, MemoryFsInner> {
        // A poisoned lock only means another test thread panicked.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl FileSystem for MemoryFs {
    fn exists(&self, path: &Path) -> bool {
        self.lock().files.contains_key(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.lock()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        let mut inner = self.lock();
        inner.files.insert(path.to_path_buf(), contents.to_string());
        inner.writes += 1;
        Ok(())
    }
}

/// Result of [`PlanStore::write`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    /// File contents before the write (empty if there was no file).
    pub old: String,
    /// Serialized plan.
    pub new: String,
    /// Whether the file was actually written.
    pub written: bool,
}

impl WriteOutcome {
    /// Check if the serialized plan differs from what was on disk.
    pub fn changed(&self) -> bool {
        self.old != self.new
    }
}

/// Reads and writes a plan file.
#[derive(Debug, Clone)]
pub struct PlanStore<F = OsFs> {
    fs: F,
    path: PathBuf,
}

impl<F: FileSystem> PlanStore<F> {
    /// Create a store for the file at `path`.
    pub fn new(fs: F, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    /// Path of the plan file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Filesystem used by this store.
    pub fn fs(&self) -> &F {
        &self.fs
    }

    /// Read the plan file.
    ///
    /// Returns `Ok(None)` when the file does not exist or is blank.
    pub fn load(&self) -> Result<Option<PlanDocument>> {
        if !self.fs.exists(&self.path) {
            tracing::debug!(path = %self.path.display(), "no plan file, keeping current plan");
            return Ok(None);
        }

        let contents = self.fs.read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            tracing::debug!(path = %self.path.display(), "plan file is empty");
            return Ok(None);
        }

        let doc = serde_yaml::from_str(&contents)?;
        tracing::debug!(path = %self.path.display(), "loaded plan");
        Ok(Some(doc))
    }

    /// Serialize `doc` and write it if it differs from the file on disk.
    pub fn write(&self, doc: &PlanDocument) -> Result<WriteOutcome> {
        let old = if self.fs.exists(&self.path) {
            self.fs.read_to_string(&self.path)?
        } else {
            String::new()
        };
        let new = serialize(doc)?;

        let written = old != new;
        if written {
            self.fs.write(&self.path, &new)?;
            tracing::debug!(path = %self.path.display(), bytes = new.len(), "wrote plan");
        } else {
            tracing::debug!(path = %self.path.display(), "plan unchanged, skipping write");
        }

        Ok(WriteOutcome { old, new, written })
    }
}

/// Serialize a plan to YAML.
pub fn serialize(doc: &PlanDocument) -> Result<String> {
    Ok(serde_yaml::to_string(doc)?)
}

/// Read `KEY=VALUE` lines from a file.
///
/// Lines without `=` are skipped. The value ends at the next `=`, if any.
pub fn read_key_values<F: FileSystem>(fs: &F, path: &Path) -> Result<BTreeMap<String, String>> {
    let contents = fs.read_to_string(path)?;
    Ok(parse_key_values(&contents))
}

fn parse_key_values(contents: &str) -> BTreeMap<String, String> {
    contents
        .lines()
        .filter_map(|line| {
            let mut parts = line.split('=');
            let key = parts.next()?;
            let value = parts.next()?;
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}
