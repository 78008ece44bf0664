//! Error types for commit operations.

use vellum_types::ObjectId;

/// Errors that can occur during commit operations.
#[derive(Debug, thiserror::Error)]
pub enum CommitError {
    /// No commit object exists under the given id.
    #[error("commit not found: {0}")]
    NotFound(ObjectId),

    /// An object exists under the id but does not deserialize as a commit.
    #[error("corrupt commit {id}: {reason}")]
    Corrupt { id: ObjectId, reason: String },

    /// The commit record failed to serialize.
    #[error("commit serialization failed: {0}")]
    Serialization(String),

    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] vellum_store::StoreError),
}

/// Convenience alias for commit results.
pub type CommitResult<T> = Result<T, CommitError>;
