use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use vellum_repo::Repository;

use crate::handler;

/// Build the axum router with all engine endpoints.
pub fn build_router(repo: Arc<Repository>) -> Router {
    Router::new()
        .route("/v1/health", get(handler::health))
        .route("/v1/info", get(handler::info))
        .route("/v1/status", get(handler::status))
        .route(
            "/v1/objects",
            post(handler::put_object).get(handler::list_objects),
        )
        .route("/v1/objects/:id", get(handler::get_object))
        .route("/v1/stage", post(handler::stage))
        .route("/v1/commit", post(handler::commit))
        .route("/v1/commits", get(handler::list_commits))
        .route("/v1/commits/:id", get(handler::get_commit))
        .route("/v1/diff/:from/:to", get(handler::diff))
        .route("/v1/push/:ref", post(handler::push))
        .layer(TraceLayer::new_for_http())
        .with_state(repo)
}
