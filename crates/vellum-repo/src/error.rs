//! Error types for repository operations.

use std::path::PathBuf;

use vellum_types::ObjectId;

/// Errors surfaced by the repository facade.
///
/// Component errors are wrapped rather than flattened so callers that need
/// the precise failure (missing vs. corrupt vs. unavailable) can still match
/// on it.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// `init` over a directory that already holds a repository.
    #[error("repository already exists at {0}")]
    AlreadyExists(PathBuf),

    /// `open` on a directory with no repository layout.
    #[error("no repository found at {0}")]
    NotInitialized(PathBuf),

    /// Commit attempted while HEAD points directly at a commit.
    #[error("HEAD is detached; point it at a branch before committing")]
    DetachedHead,

    /// A pushed payload does not deserialize as a commit.
    #[error("pushed payload {id} is not a valid commit: {reason}")]
    InvalidPush { id: ObjectId, reason: String },

    #[error(transparent)]
    Store(#[from] vellum_store::StoreError),

    #[error(transparent)]
    Index(#[from] vellum_index::IndexError),

    #[error(transparent)]
    Refs(#[from] vellum_refs::RefError),

    #[error(transparent)]
    Commit(#[from] vellum_commit::CommitError),

    #[error(transparent)]
    Diff(#[from] vellum_diff::DiffError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for repository results.
pub type RepoResult<T> = Result<T, RepoError>;
