//! Error types for the staging index.

/// Errors that can occur during staging operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The backing medium cannot be read or written.
    #[error("staging storage unavailable: {0}")]
    StorageUnavailable(#[from] std::io::Error),

    /// A persisted staging entry is not a valid object id.
    #[error("corrupt staging entry: {0}")]
    CorruptEntry(String),
}

/// Convenience alias for staging results.
pub type IndexResult<T> = Result<T, IndexError>;
