//! Request handlers, one per route.
//!
//! Handlers stay thin: decode the request, call the repository facade, wrap
//! the result. All policy lives below in `vellum-repo`.

use std::io::Read;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::json;
use vellum_repo::{RepoStatus, Repository};
use vellum_types::ObjectId;

use crate::error::{ApiError, ApiResult};
use crate::protocol::{
    CommitListResponse, CommitRequest, CommitSummary, HealthResponse, ObjectListResponse,
    PushResponse, PutResponse, StageRequest,
};

fn parse_id(raw: &str) -> ApiResult<ObjectId> {
    ObjectId::from_hex(raw).map_err(|e| ApiError::InvalidId(e.to_string()))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

pub async fn info() -> Json<serde_json::Value> {
    Json(json!({
        "name": "vellum-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn status(State(repo): State<Arc<Repository>>) -> ApiResult<Json<RepoStatus>> {
    Ok(Json(repo.status()?))
}

// ---- Objects ----

pub async fn put_object(
    State(repo): State<Arc<Repository>>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<PutResponse>)> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    let id = repo.put_object_stream(&mut body.as_ref(), content_type)?;
    Ok((StatusCode::CREATED, Json(PutResponse { id })))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub prefix: String,
}

pub async fn list_objects(
    State(repo): State<Arc<Repository>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ObjectListResponse>> {
    let objects = repo.list_objects(&query.prefix)?;
    Ok(Json(ObjectListResponse { objects }))
}

pub async fn get_object(
    State(repo): State<Arc<Repository>>,
    Path(raw): Path<String>,
) -> ApiResult<Response> {
    let id = parse_id(&raw)?;
    let (mut reader, content_type) = repo.get_object_stream(&id)?;
    let mut payload = Vec::new();
    reader
        .read_to_end(&mut payload)
        .map_err(|e| ApiError::Repo(vellum_repo::RepoError::Io(e)))?;
    Ok(([(header::CONTENT_TYPE, content_type)], payload).into_response())
}

// ---- Staging and commits ----

pub async fn stage(
    State(repo): State<Arc<Repository>>,
    Json(req): Json<StageRequest>,
) -> ApiResult<StatusCode> {
    repo.stage_object(&req.id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn commit(
    State(repo): State<Arc<Repository>>,
    Json(req): Json<CommitRequest>,
) -> ApiResult<(StatusCode, Json<CommitSummary>)> {
    let commit = repo.commit(&req.message, &req.author)?;
    Ok((StatusCode::CREATED, Json(commit.into())))
}

#[derive(Debug, Deserialize)]
pub struct CommitsQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

pub async fn list_commits(
    State(repo): State<Arc<Repository>>,
    Query(query): Query<CommitsQuery>,
) -> ApiResult<Json<CommitListResponse>> {
    let commits = repo
        .list_commits(query.limit, query.offset)?
        .into_iter()
        .map(CommitSummary::from)
        .collect();
    Ok(Json(CommitListResponse { commits }))
}

pub async fn get_commit(
    State(repo): State<Arc<Repository>>,
    Path(raw): Path<String>,
) -> ApiResult<Json<CommitSummary>> {
    let id = parse_id(&raw)?;
    Ok(Json(repo.get_commit(&id)?.into()))
}

// ---- Diff and replication ----

pub async fn diff(
    State(repo): State<Arc<Repository>>,
    Path((from, to)): Path<(String, String)>,
) -> ApiResult<Json<vellum_diff::CommitDiff>> {
    let from = parse_id(&from)?;
    let to = parse_id(&to)?;
    Ok(Json(repo.diff(&from, &to)?))
}

pub async fn push(
    State(repo): State<Arc<Repository>>,
    Path(ref_name): Path<String>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<PushResponse>)> {
    let id = repo.push(&body, &ref_name)?;
    Ok((
        StatusCode::CREATED,
        Json(PushResponse { id, r#ref: ref_name }),
    ))
}
