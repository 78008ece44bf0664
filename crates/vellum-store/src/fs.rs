//! Filesystem object store.
//!
//! Layout under the store root:
//!
//! ```text
//! objects/
//!   tmp/                  in-flight writes (private temp files)
//!   2c/
//!     f24dba…9824         object payload, keyed by content hash
//!     f24dba…9824.meta    optional content-type sidecar
//! ```
//!
//! Every write lands in `objects/tmp/` first and is published by an atomic
//! rename into its fan-out directory. A crash mid-write leaves at worst an
//! orphaned temp file; the final key either holds the complete payload or
//! nothing.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use vellum_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::traits::{ObjectStore, DEFAULT_CONTENT_TYPE};

const OBJECTS_DIR: &str = "objects";
const TMP_DIR: &str = "tmp";
const META_SUFFIX: &str = ".meta";
const STREAM_BUF_SIZE: usize = 64 * 1024;

/// Filesystem-backed [`ObjectStore`].
pub struct FsObjectStore {
    objects: PathBuf,
    tmp: PathBuf,
}

impl FsObjectStore {
    /// Open (creating if necessary) a store rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let objects = root.as_ref().join(OBJECTS_DIR);
        let tmp = objects.join(TMP_DIR);
        fs::create_dir_all(&tmp)?;
        Ok(Self { objects, tmp })
    }

    fn object_path(&self, id: &ObjectId) -> PathBuf {
        let hex = id.to_hex();
        self.objects.join(&hex[..2]).join(&hex[2..])
    }

    fn meta_path(&self, id: &ObjectId) -> PathBuf {
        let mut path = self.object_path(id).into_os_string();
        path.push(META_SUFFIX);
        PathBuf::from(path)
    }

    /// Publish a fully written temp file under its final key.
    ///
    /// Idempotent under races: if another writer published the same content
    /// first, the rename target already holds identical bytes and the loss
    /// of this temp file is harmless.
    fn publish(&self, temp: NamedTempFile, id: &ObjectId) -> StoreResult<()> {
        let path = self.object_path(id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        match temp.persist(&path) {
            Ok(_) => Ok(()),
            Err(e) if path.is_file() => {
                tracing::debug!(id = %id.short_hex(), "object published concurrently");
                drop(e.file);
                Ok(())
            }
            Err(e) => Err(StoreError::Unavailable(e.error)),
        }
    }

    fn write_meta(&self, id: &ObjectId, content_type: &str) -> StoreResult<()> {
        let path = self.meta_path(id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content_type)?;
        Ok(())
    }
}

impl ObjectStore for FsObjectStore {
    fn put(&self, payload: &[u8]) -> StoreResult<ObjectId> {
        let id = vellum_hash::digest(payload);
        if self.object_path(&id).is_file() {
            return Ok(id);
        }
        let mut temp = NamedTempFile::new_in(&self.tmp)?;
        temp.write_all(payload)?;
        temp.as_file().sync_all()?;
        self.publish(temp, &id)?;
        tracing::trace!(id = %id.short_hex(), bytes = payload.len(), "object written");
        Ok(id)
    }

    fn put_stream(
        &self,
        reader: &mut dyn Read,
        content_type: Option<&str>,
    ) -> StoreResult<ObjectId> {
        let mut temp = NamedTempFile::new_in(&self.tmp)?;
        let mut hasher = vellum_hash::StreamHasher::new();
        let mut buf = vec![0u8; STREAM_BUF_SIZE];
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
            temp.write_all(&buf[..n])?;
        }
        temp.as_file().sync_all()?;
        let id = hasher.finalize();

        if !self.object_path(&id).is_file() {
            self.publish(temp, &id)?;
        }
        // Sidecar metadata only after the object is addressable; a failed
        // publish must not leave an orphaned `.meta` file behind.
        if let Some(ct) = content_type {
            self.write_meta(&id, ct)?;
        }
        Ok(id)
    }

    fn get(&self, id: &ObjectId) -> StoreResult<Vec<u8>> {
        match fs::read(self.object_path(id)) {
            Ok(payload) => Ok(payload),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StoreError::NotFound(*id)),
            Err(e) => Err(StoreError::Unavailable(e)),
        }
    }

    fn get_stream(&self, id: &ObjectId) -> StoreResult<(Box<dyn Read + Send>, String)> {
        let file = match File::open(self.object_path(id)) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(*id))
            }
            Err(e) => return Err(StoreError::Unavailable(e)),
        };
        let content_type = fs::read_to_string(self.meta_path(id))
            .unwrap_or_else(|_| DEFAULT_CONTENT_TYPE.to_string());
        Ok((Box::new(file), content_type))
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.object_path(id).is_file())
    }

    fn list(&self, prefix: &str) -> StoreResult<Vec<ObjectId>> {
        let mut ids = Vec::new();
        for fan_entry in fs::read_dir(&self.objects)? {
            let fan_entry = fan_entry?;
            let fan_name = fan_entry.file_name().to_string_lossy().into_owned();
            if fan_name == TMP_DIR || !fan_entry.file_type()?.is_dir() {
                continue;
            }
            for obj_entry in fs::read_dir(fan_entry.path())? {
                let obj_entry = obj_entry?;
                let obj_name = obj_entry.file_name().to_string_lossy().into_owned();
                if obj_name.ends_with(META_SUFFIX) {
                    continue;
                }
                let hex = format!("{fan_name}{obj_name}");
                if !hex.starts_with(prefix) {
                    continue;
                }
                if let Ok(id) = ObjectId::from_hex(&hex) {
                    ids.push(id);
                }
            }
        }
        ids.sort();
        Ok(ids)
    }
}

impl std::fmt::Debug for FsObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsObjectStore")
            .field("objects", &self.objects)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn make_store() -> (tempfile::TempDir, FsObjectStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn put_and_get_roundtrip() {
        let (_dir, store) = make_store();
        let id = store.put(b"hello world").unwrap();
        assert_eq!(store.get(&id).unwrap(), b"hello world");
    }

    #[test]
    fn put_is_idempotent() {
        let (_dir, store) = make_store();
        let id1 = store.put(b"same payload").unwrap();
        let id2 = store.put(b"same payload").unwrap();
        assert_eq!(id1, id2);
        assert_eq!(store.list("").unwrap().len(), 1);
    }

    #[test]
    fn put_hello_matches_known_digest() {
        let (_dir, store) = make_store();
        let id = store.put(b"hello").unwrap();
        assert_eq!(
            id.to_hex(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn get_missing_object() {
        let (_dir, store) = make_store();
        let id = vellum_hash::digest(b"never written");
        let err = store.get(&id).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn exists_reflects_writes() {
        let (_dir, store) = make_store();
        let id = vellum_hash::digest(b"probe");
        assert!(!store.exists(&id).unwrap());
        store.put(b"probe").unwrap();
        assert!(store.exists(&id).unwrap());
    }

    #[test]
    fn put_stream_matches_buffered_put() {
        let (_dir, store) = make_store();
        let buffered = store.put(b"streamed content").unwrap();

        let (_dir2, store2) = make_store();
        let mut reader = Cursor::new(b"streamed content".to_vec());
        let streamed = store2.put_stream(&mut reader, None).unwrap();
        assert_eq!(buffered, streamed);
        assert_eq!(store2.get(&streamed).unwrap(), b"streamed content");
    }

    #[test]
    fn put_stream_records_content_type() {
        let (_dir, store) = make_store();
        let mut reader = Cursor::new(b"<svg/>".to_vec());
        let id = store.put_stream(&mut reader, Some("image/svg+xml")).unwrap();

        let (mut body, content_type) = store.get_stream(&id).unwrap();
        assert_eq!(content_type, "image/svg+xml");
        let mut out = Vec::new();
        body.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"<svg/>");
    }

    #[test]
    fn get_stream_defaults_content_type() {
        let (_dir, store) = make_store();
        let id = store.put(b"plain bytes").unwrap();
        let (_body, content_type) = store.get_stream(&id).unwrap();
        assert_eq!(content_type, DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn get_stream_missing_object() {
        let (_dir, store) = make_store();
        let id = vellum_hash::digest(b"ghost");
        assert!(matches!(
            store.get_stream(&id),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn list_with_prefix() {
        let (_dir, store) = make_store();
        let a = store.put(b"alpha").unwrap();
        let b = store.put(b"beta").unwrap();
        let c = store.put(b"gamma").unwrap();

        let all = store.list("").unwrap();
        assert_eq!(all.len(), 3);
        // Sorted output.
        for w in all.windows(2) {
            assert!(w[0] < w[1]);
        }

        for id in [a, b, c] {
            let matched = store.list(&id.to_hex()[..6]).unwrap();
            assert!(matched.contains(&id));
        }
    }

    #[test]
    fn list_excludes_meta_sidecars() {
        let (_dir, store) = make_store();
        let mut reader = Cursor::new(b"typed".to_vec());
        store.put_stream(&mut reader, Some("text/plain")).unwrap();
        assert_eq!(store.list("").unwrap().len(), 1);
    }

    #[test]
    fn no_partial_object_visible_after_failed_stream() {
        struct FailingReader {
            fed: bool,
        }
        impl Read for FailingReader {
            fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
                if self.fed {
                    Err(std::io::Error::other("stream broke"))
                } else {
                    self.fed = true;
                    buf[..4].copy_from_slice(b"part");
                    Ok(4)
                }
            }
        }

        let (dir, store) = make_store();
        let mut reader = FailingReader { fed: false };
        assert!(store.put_stream(&mut reader, Some("text/plain")).is_err());
        // Nothing published: the partial payload is not addressable.
        assert!(store.list("").unwrap().is_empty());
        // And no orphaned sidecar either.
        let metas: Vec<_> = files_under(dir.path())
            .into_iter()
            .filter(|p| p.to_string_lossy().ends_with(META_SUFFIX))
            .collect();
        assert!(metas.is_empty(), "orphaned sidecars: {metas:?}");
    }

    fn files_under(root: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        let mut stack = vec![root.to_path_buf()];
        while let Some(dir) = stack.pop() {
            for entry in fs::read_dir(dir).unwrap() {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    stack.push(path);
                } else {
                    files.push(path);
                }
            }
        }
        files
    }

    #[test]
    fn concurrent_identical_puts() {
        use std::sync::Arc;
        use std::thread;

        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FsObjectStore::open(dir.path()).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.put(b"contended payload").unwrap())
            })
            .collect();

        let ids: Vec<ObjectId> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(ids.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(store.get(&ids[0]).unwrap(), b"contended payload");
    }

    #[test]
    fn reopen_preserves_objects() {
        let dir = tempfile::tempdir().unwrap();
        let id = {
            let store = FsObjectStore::open(dir.path()).unwrap();
            store.put(b"durable").unwrap()
        };
        let store = FsObjectStore::open(dir.path()).unwrap();
        assert_eq!(store.get(&id).unwrap(), b"durable");
    }
}
