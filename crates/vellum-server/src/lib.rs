//! HTTP front end for the Vellum repository engine.
//!
//! Exposes the repository facade under `/v1/...`: object upload/download,
//! staging, commits, history, diff, and push replication. One repository
//! per server process.
//!
//! # Key Types
//!
//! - [`VellumServer`] -- binds a listener and serves the router
//! - [`ServerConfig`] -- bind address and repository root, TOML-loadable
//! - [`ApiError`] -- engine errors mapped onto HTTP status codes

pub mod config;
pub mod error;
pub mod handler;
pub mod protocol;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ApiError, ServerError, ServerResult};
pub use server::VellumServer;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use tower::util::ServiceExt;
    use vellum_repo::Repository;

    use crate::router::build_router;

    fn make_app() -> (Router, Arc<Repository>) {
        let repo = Arc::new(Repository::in_memory().unwrap());
        (build_router(Arc::clone(&repo)), repo)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let (app, _) = make_app();
        let response = app.oneshot(get("/v1/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn info_endpoint() {
        let (app, _) = make_app();
        let response = app.oneshot(get("/v1/info")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["name"], "vellum-server");
    }

    #[tokio::test]
    async fn object_upload_and_download() {
        let (app, _) = make_app();

        let upload = Request::builder()
            .method("POST")
            .uri("/v1/objects")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("hello"))
            .unwrap();
        let response = app.clone().oneshot(upload).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let id = body_json(response).await["id"].as_str().unwrap().to_string();
        assert_eq!(
            id,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );

        let response = app.oneshot(get(&format!("/v1/objects/{id}"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"hello");
    }

    #[tokio::test]
    async fn missing_object_is_404() {
        let (app, _) = make_app();
        let absent = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
        let response = app
            .oneshot(get(&format!("/v1/objects/{absent}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_id_is_400() {
        let (app, _) = make_app();
        let response = app.oneshot(get("/v1/objects/nothex")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn stage_commit_and_list() {
        let (app, repo) = make_app();
        let id = repo.put_object(b"content").unwrap();

        let response = app
            .clone()
            .oneshot(post_json(
                "/v1/stage",
                serde_json::json!({ "id": id.to_hex() }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .clone()
            .oneshot(post_json(
                "/v1/commit",
                serde_json::json!({ "message": "via http", "author": "editor" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let commit = body_json(response).await;
        assert_eq!(commit["message"], "via http");
        assert_eq!(commit["objects"][0], id.to_hex());

        let response = app.oneshot(get("/v1/commits?limit=10")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let listing = body_json(response).await;
        assert_eq!(listing["commits"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn status_endpoint_reflects_state() {
        let (app, repo) = make_app();
        let id = repo.put_object(b"staged").unwrap();
        repo.stage_object(&id).unwrap();

        let response = app.oneshot(get("/v1/status")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let status = body_json(response).await;
        assert_eq!(status["branch"], "main");
        assert_eq!(status["staged"], 1);
        assert_eq!(status["commits"], 0);
    }

    #[tokio::test]
    async fn diff_endpoint() {
        let (app, repo) = make_app();
        let x = repo.put_object(b"x").unwrap();
        repo.stage_object(&x).unwrap();
        let c1 = repo.commit("c1", "a").unwrap();
        let z = repo.put_object(b"z").unwrap();
        repo.stage_object(&z).unwrap();
        let c2 = repo.commit("c2", "a").unwrap();

        let response = app
            .oneshot(get(&format!("/v1/diff/{}/{}", c1.id.to_hex(), c2.id.to_hex())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let diff = body_json(response).await;
        assert_eq!(diff["added"][0]["id"], z.to_hex());
        assert_eq!(diff["removed"][0]["id"], x.to_hex());
    }

    #[tokio::test]
    async fn push_round_trip_and_rejection() {
        let (app, _) = make_app();

        let source = Repository::in_memory().unwrap();
        let commit = source.commit("published", "a").unwrap();
        let payload = source.get_object(&commit.id).unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/push/main")
                    .body(Body::from(payload))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["id"], commit.id.to_hex());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/push/main")
                    .body(Body::from("garbage"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
