//! Error types for reference operations.

use thiserror::Error;

/// Errors that can occur during reference operations.
#[derive(Debug, Error)]
pub enum RefError {
    /// The reference is unset — an unborn branch, not a fatal condition.
    #[error("ref not found: {name}")]
    NotFound { name: String },

    /// The ref name contains path traversal or reserved characters.
    #[error("invalid ref name: {name}: {reason}")]
    InvalidRef { name: String, reason: String },

    /// HEAD's target ref is unset (repository has no commits yet).
    #[error("head target is unset: {name}")]
    Empty { name: String },

    /// A ref or HEAD file exists but does not parse.
    #[error("corrupt ref {name}: {reason}")]
    Corrupt { name: String, reason: String },

    /// The backing medium cannot be read or written.
    #[error("ref storage unavailable: {0}")]
    Unavailable(#[from] std::io::Error),
}

/// Convenience alias for ref operations.
pub type RefResult<T> = Result<T, RefError>;
