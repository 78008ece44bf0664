//! Server and API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use vellum_refs::RefError;
use vellum_repo::RepoError;
use vellum_store::StoreError;

/// Errors raised while standing the server up.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

/// A request-scoped failure, rendered as a JSON error body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid object id: {0}")]
    InvalidId(String),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl ApiError {
    /// Map engine failures onto HTTP status codes. Missing things are 404,
    /// caller mistakes are 4xx, storage trouble is 503.
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ApiError::Repo(err) => match err {
                RepoError::AlreadyExists(_) => StatusCode::CONFLICT,
                RepoError::DetachedHead => StatusCode::CONFLICT,
                RepoError::NotInitialized(_) => StatusCode::SERVICE_UNAVAILABLE,
                RepoError::InvalidPush { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                RepoError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
                RepoError::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
                RepoError::Index(vellum_index::IndexError::StorageUnavailable(_)) => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                RepoError::Index(vellum_index::IndexError::CorruptEntry(_)) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                RepoError::Refs(RefError::NotFound { .. }) | RepoError::Refs(RefError::Empty { .. }) => {
                    StatusCode::NOT_FOUND
                }
                RepoError::Refs(RefError::InvalidRef { .. }) => StatusCode::BAD_REQUEST,
                RepoError::Refs(RefError::Corrupt { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
                RepoError::Refs(RefError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
                RepoError::Commit(vellum_commit::CommitError::NotFound(_)) => StatusCode::NOT_FOUND,
                RepoError::Commit(vellum_commit::CommitError::Corrupt { .. }) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                RepoError::Commit(vellum_commit::CommitError::Store(StoreError::NotFound(_))) => {
                    StatusCode::NOT_FOUND
                }
                RepoError::Commit(_) => StatusCode::INTERNAL_SERVER_ERROR,
                RepoError::Diff(vellum_diff::DiffError::CommitNotFound(_)) => StatusCode::NOT_FOUND,
                RepoError::Diff(vellum_diff::DiffError::CorruptCommit { .. }) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                RepoError::Diff(vellum_diff::DiffError::Store(StoreError::NotFound(_))) => {
                    StatusCode::NOT_FOUND
                }
                RepoError::Diff(vellum_diff::DiffError::Store(_)) => StatusCode::SERVICE_UNAVAILABLE,
                RepoError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
