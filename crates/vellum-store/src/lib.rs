//! Content-addressed object storage for the Vellum repository engine.
//!
//! This crate implements a hash-keyed object store analogous to git's
//! `.git/objects/` directory. Every persisted payload — staged content,
//! entity records, serialized commits — is stored as an immutable object
//! identified by its SHA-256 digest.
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`FsObjectStore`] -- filesystem backend with two-level fan-out directories
//! - [`InMemoryObjectStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written (content-addressing guarantees this).
//! 2. Writes land in a private temp location and are published atomically by
//!    rename — a half-written object is never visible under its final key.
//! 3. Concurrent reads are always safe (objects are immutable).
//! 4. The store never interprets object contents — it is a pure key-value store.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::FsObjectStore;
pub use memory::InMemoryObjectStore;
pub use traits::{ObjectStore, DEFAULT_CONTENT_TYPE};
