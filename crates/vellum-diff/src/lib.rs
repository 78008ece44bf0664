//! Set-difference comparison between commits.
//!
//! A diff answers one question: which object hashes does the target commit
//! reference that the base does not, and vice versa. Payload contents are
//! not compared line-by-line; an object that appears in both commits under
//! the same hash is by definition unchanged. For human-facing output each
//! changed entry carries a best-effort JSON preview of the payload.
//!
//! # Key Types
//!
//! - [`DiffEngine`] -- computes diffs over a commit log and object store
//! - [`CommitDiff`] -- the result: added and removed entries
//! - [`DiffEntry`] -- one changed object with an optional preview

pub mod diff;
pub mod error;

pub use diff::{CommitDiff, DiffEngine, DiffEntry};
pub use error::{DiffError, DiffResult};
