//! Commit records and chain traversal for the Vellum repository engine.
//!
//! A commit is an immutable snapshot record: zero or more parent ids, an
//! author label, a creation timestamp, a message, and the flat list of
//! object hashes captured from the staging index at commit time. Commits
//! are persisted through the object store under their own content hash, so
//! identical fields always finalize to the identical commit id.
//!
//! # Key Types
//!
//! - [`Commit`] -- the immutable record
//! - [`CommitDraft`] -- builder for the fields that go into the hash
//! - [`CommitLog`] -- create/get/walk/list over an object store

pub mod commit;
pub mod error;
pub mod log;

pub use commit::{Commit, CommitDraft};
pub use error::{CommitError, CommitResult};
pub use log::CommitLog;
