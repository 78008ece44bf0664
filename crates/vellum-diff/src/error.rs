//! Error types for diff operations.

use vellum_types::ObjectId;

/// Errors that can occur while computing a diff.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// One of the endpoint commits does not exist.
    #[error("commit not found: {0}")]
    CommitNotFound(ObjectId),

    /// One of the endpoint commits exists but is unreadable.
    #[error("corrupt commit {id}: {reason}")]
    CorruptCommit { id: ObjectId, reason: String },

    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] vellum_store::StoreError),
}

impl From<vellum_commit::CommitError> for DiffError {
    fn from(err: vellum_commit::CommitError) -> Self {
        match err {
            vellum_commit::CommitError::NotFound(id) => DiffError::CommitNotFound(id),
            vellum_commit::CommitError::Corrupt { id, reason } => {
                DiffError::CorruptCommit { id, reason }
            }
            vellum_commit::CommitError::Serialization(reason) => DiffError::CorruptCommit {
                id: ObjectId::zero(),
                reason,
            },
            vellum_commit::CommitError::Store(e) => DiffError::Store(e),
        }
    }
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
