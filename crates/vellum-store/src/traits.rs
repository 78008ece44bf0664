use std::io::Read;

use vellum_types::ObjectId;

use crate::error::StoreResult;

/// Content type reported for streamed objects with no recorded metadata.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Content-addressed object store.
///
/// All implementations must satisfy these invariants:
/// - Objects are immutable once written. Content-addressing guarantees this:
///   the same payload always produces the same id.
/// - `put` is idempotent: writing the same payload twice yields the same id
///   and must not corrupt a concurrent reader of that key.
/// - A partially written object is never visible under its final key.
/// - Concurrent reads are always safe (objects are immutable).
/// - The store never interprets object contents — it is a pure key-value store.
/// - All I/O errors are propagated, never silently ignored.
pub trait ObjectStore: Send + Sync {
    /// Write a whole-buffer payload and return its content-addressed id.
    ///
    /// Small structured records (commits, entity records) are cheap to hold
    /// fully in memory; this is the path for them. If the object already
    /// exists the write is a no-op.
    fn put(&self, payload: &[u8]) -> StoreResult<ObjectId>;

    /// Stream a payload of unknown size into the store.
    ///
    /// The payload is hashed while spooling to a private temporary location,
    /// then published atomically under its computed id (rename, not
    /// copy-then-delete). When `content_type` is given it is recorded as
    /// sidecar metadata and reported back by [`ObjectStore::get_stream`].
    fn put_stream(
        &self,
        reader: &mut dyn Read,
        content_type: Option<&str>,
    ) -> StoreResult<ObjectId>;

    /// Read an object's full payload.
    ///
    /// Fails with [`StoreError::NotFound`] if no object with that id exists.
    ///
    /// [`StoreError::NotFound`]: crate::error::StoreError::NotFound
    fn get(&self, id: &ObjectId) -> StoreResult<Vec<u8>>;

    /// Streaming read: returns a reader over the payload plus its content
    /// type ([`DEFAULT_CONTENT_TYPE`] when no sidecar metadata exists).
    fn get_stream(&self, id: &ObjectId) -> StoreResult<(Box<dyn Read + Send>, String)>;

    /// Check whether an object exists in the store.
    fn exists(&self, id: &ObjectId) -> StoreResult<bool>;

    /// Enumerate stored ids whose hex form starts with `prefix`.
    ///
    /// An empty prefix lists everything. Results are sorted so callers see a
    /// deterministic order.
    fn list(&self, prefix: &str) -> StoreResult<Vec<ObjectId>>;
}
