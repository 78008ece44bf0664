//! Filesystem reference store.
//!
//! Layout under the store root:
//!
//! ```text
//! HEAD                 "ref: refs/heads/main" or a bare hex id (detached)
//! refs/heads/<name>    one hex commit id per branch file
//! ```
//!
//! Branch names may contain slashes (`feature/auth`), which become
//! subdirectories. All writes go through a temp file plus atomic rename
//! under an internal mutex.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;
use vellum_types::ObjectId;
use walkdir::WalkDir;

use crate::error::{RefError, RefResult};
use crate::names::validate_ref_name;
use crate::traits::RefStore;
use crate::types::Head;

const HEAD_FILE: &str = "HEAD";
const HEADS_DIR: &str = "refs/heads";
const SYMBOLIC_PREFIX: &str = "ref: refs/heads/";

/// Filesystem-backed [`RefStore`].
pub struct FsRefStore {
    root: PathBuf,
    heads: PathBuf,
    write_lock: Mutex<()>,
}

impl FsRefStore {
    /// Open (creating the layout if necessary) a ref store rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> RefResult<Self> {
        let root = root.as_ref().to_path_buf();
        let heads = root.join(HEADS_DIR);
        fs::create_dir_all(&heads)?;
        Ok(Self {
            root,
            heads,
            write_lock: Mutex::new(()),
        })
    }

    fn lock(&self) -> RefResult<std::sync::MutexGuard<'_, ()>> {
        self.write_lock.lock().map_err(|e| {
            RefError::Unavailable(std::io::Error::other(format!("lock poisoned: {e}")))
        })
    }

    fn write_atomic(&self, path: &Path, contents: &str) -> RefResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut temp = NamedTempFile::new_in(&self.root)?;
        writeln!(temp, "{contents}")?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl RefStore for FsRefStore {
    fn set_ref(&self, name: &str, target: ObjectId) -> RefResult<()> {
        validate_ref_name(name)?;
        let _guard = self.lock()?;
        self.write_atomic(&self.heads.join(name), &target.to_hex())
    }

    fn get_ref(&self, name: &str) -> RefResult<ObjectId> {
        validate_ref_name(name)?;
        let raw = match fs::read_to_string(self.heads.join(name)) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RefError::NotFound {
                    name: name.to_string(),
                })
            }
            Err(e) => return Err(RefError::Unavailable(e)),
        };
        ObjectId::from_hex(raw.trim()).map_err(|e| RefError::Corrupt {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }

    fn list_refs(&self, prefix: &str) -> RefResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in WalkDir::new(&self.heads) {
            let entry = entry.map_err(|e| {
                RefError::Unavailable(e.into_io_error().unwrap_or_else(|| {
                    std::io::Error::other("ref walk failed")
                }))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&self.heads)
                .expect("entry under heads dir")
                .to_string_lossy()
                .into_owned();
            if relative.starts_with(prefix) {
                names.push(relative);
            }
        }
        names.sort();
        Ok(names)
    }

    fn head(&self) -> RefResult<Option<Head>> {
        let raw = match fs::read_to_string(self.root.join(HEAD_FILE)) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(RefError::Unavailable(e)),
        };
        let raw = raw.trim();
        if let Some(branch) = raw.strip_prefix(SYMBOLIC_PREFIX) {
            return Ok(Some(Head::Symbolic(branch.to_string())));
        }
        let id = ObjectId::from_hex(raw).map_err(|e| RefError::Corrupt {
            name: HEAD_FILE.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Some(Head::Detached(id)))
    }

    fn set_head(&self, branch: &str) -> RefResult<()> {
        validate_ref_name(branch)?;
        let _guard = self.lock()?;
        self.write_atomic(
            &self.root.join(HEAD_FILE),
            &format!("{SYMBOLIC_PREFIX}{branch}"),
        )
    }

    fn set_head_detached(&self, id: ObjectId) -> RefResult<()> {
        let _guard = self.lock()?;
        self.write_atomic(&self.root.join(HEAD_FILE), &id.to_hex())
    }
}

impl std::fmt::Debug for FsRefStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsRefStore").field("root", &self.root).finish()
    }
}
