use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::sync::RwLock;

use vellum_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::traits::{ObjectStore, DEFAULT_CONTENT_TYPE};

struct Stored {
    payload: Vec<u8>,
    content_type: Option<String>,
}

/// In-memory, HashMap-based object store.
///
/// Intended for tests and embedding. All objects are held in memory behind a
/// `RwLock`. Payloads are cloned on read.
pub struct InMemoryObjectStore {
    objects: RwLock<HashMap<ObjectId, Stored>>,
}

impl InMemoryObjectStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        // Content-addressed entries are immutable once inserted, so the map
        // stays consistent even if a writer panicked mid-call.
        self.objects
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(e: std::sync::PoisonError<T>) -> StoreError {
    StoreError::Unavailable(std::io::Error::other(format!("lock poisoned: {e}")))
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn put(&self, payload: &[u8]) -> StoreResult<ObjectId> {
        let id = vellum_hash::digest(payload);
        let mut map = self.objects.write().map_err(poisoned)?;
        // Idempotent: content-addressing guarantees the same id always maps
        // to the same payload.
        map.entry(id).or_insert_with(|| Stored {
            payload: payload.to_vec(),
            content_type: None,
        });
        Ok(id)
    }

    fn put_stream(
        &self,
        reader: &mut dyn Read,
        content_type: Option<&str>,
    ) -> StoreResult<ObjectId> {
        let mut payload = Vec::new();
        reader.read_to_end(&mut payload)?;
        let id = vellum_hash::digest(&payload);
        let mut map = self.objects.write().map_err(poisoned)?;
        let entry = map.entry(id).or_insert(Stored {
            payload,
            content_type: None,
        });
        if let Some(ct) = content_type {
            entry.content_type = Some(ct.to_string());
        }
        Ok(id)
    }

    fn get(&self, id: &ObjectId) -> StoreResult<Vec<u8>> {
        let map = self.objects.read().map_err(poisoned)?;
        map.get(id)
            .map(|s| s.payload.clone())
            .ok_or(StoreError::NotFound(*id))
    }

    fn get_stream(&self, id: &ObjectId) -> StoreResult<(Box<dyn Read + Send>, String)> {
        let map = self.objects.read().map_err(poisoned)?;
        let stored = map.get(id).ok_or(StoreError::NotFound(*id))?;
        let content_type = stored
            .content_type
            .clone()
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
        Ok((Box::new(Cursor::new(stored.payload.clone())), content_type))
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        let map = self.objects.read().map_err(poisoned)?;
        Ok(map.contains_key(id))
    }

    fn list(&self, prefix: &str) -> StoreResult<Vec<ObjectId>> {
        let map = self.objects.read().map_err(poisoned)?;
        let mut ids: Vec<ObjectId> = map
            .keys()
            .filter(|id| id.to_hex().starts_with(prefix))
            .copied()
            .collect();
        ids.sort();
        Ok(ids)
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryObjectStore")
            .field("object_count", &self.len())
            .finish()
    }
}
