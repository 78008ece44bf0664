//! Filesystem staging index.
//!
//! The staging sequence lives in a single `STAGE` file under the repository
//! root, one hex id per line in insertion order. Every mutation rewrites the
//! file through a temp file plus atomic rename, under an internal mutex, so
//! a reader never observes a torn write and a failed `stage` never appends a
//! truncated entry.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;
use vellum_types::ObjectId;

use crate::error::{IndexError, IndexResult};
use crate::traits::StagingIndex;

const STAGE_FILE: &str = "STAGE";

/// Filesystem-backed [`StagingIndex`].
pub struct FsStagingIndex {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FsStagingIndex {
    /// Open (creating an empty sequence if necessary) the staging index
    /// under `root`.
    pub fn open(root: impl AsRef<Path>) -> IndexResult<Self> {
        let path = root.as_ref().join(STAGE_FILE);
        if !path.is_file() {
            fs::write(&path, "")?;
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    fn load(&self) -> IndexResult<Vec<ObjectId>> {
        let raw = fs::read_to_string(&self.path)?;
        let mut ids = Vec::new();
        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let id = ObjectId::from_hex(line)
                .map_err(|e| IndexError::CorruptEntry(format!("{line}: {e}")))?;
            ids.push(id);
        }
        Ok(ids)
    }

    fn lock(&self) -> IndexResult<std::sync::MutexGuard<'_, ()>> {
        self.write_lock.lock().map_err(|e| {
            IndexError::StorageUnavailable(std::io::Error::other(format!("lock poisoned: {e}")))
        })
    }

    /// Atomically replace the staging file with the given sequence.
    fn persist(&self, ids: &[ObjectId]) -> IndexResult<()> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut temp = NamedTempFile::new_in(dir)?;
        for id in ids {
            writeln!(temp, "{id}")?;
        }
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl StagingIndex for FsStagingIndex {
    fn stage(&self, id: &ObjectId) -> IndexResult<()> {
        let _guard = self.lock()?;
        let mut ids = self.load()?;
        ids.push(*id);
        self.persist(&ids)?;
        tracing::trace!(id = %id.short_hex(), staged = ids.len(), "object staged");
        Ok(())
    }

    fn read_all(&self) -> IndexResult<Vec<ObjectId>> {
        self.load()
    }

    fn clear(&self) -> IndexResult<()> {
        let _guard = self.lock()?;
        self.persist(&[])
    }
}

impl std::fmt::Debug for FsStagingIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsStagingIndex")
            .field("path", &self.path)
            .finish()
    }
}
