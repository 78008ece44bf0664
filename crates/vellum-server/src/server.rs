use std::sync::Arc;

use tokio::net::TcpListener;
use vellum_repo::Repository;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;

/// The Vellum repository server: one repository behind an HTTP API.
pub struct VellumServer {
    config: ServerConfig,
    repo: Arc<Repository>,
}

impl VellumServer {
    pub fn new(config: ServerConfig, repo: Arc<Repository>) -> Self {
        Self { config, repo }
    }

    /// Open (or initialize) the repository named by the config.
    pub fn from_config(config: ServerConfig) -> ServerResult<Self> {
        let repo = match Repository::open(&config.repo_root) {
            Ok(repo) => repo,
            Err(vellum_repo::RepoError::NotInitialized(_)) => {
                Repository::init(&config.repo_root)?
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self::new(config, Arc::new(repo)))
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router without binding, for in-process testing.
    pub fn router(&self) -> axum::Router {
        build_router(Arc::clone(&self.repo))
    }

    /// Bind and serve until the task is cancelled.
    pub async fn serve(self) -> ServerResult<()> {
        let app = build_router(self.repo);
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!("vellum server listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
