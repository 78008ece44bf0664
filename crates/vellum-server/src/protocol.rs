//! Wire DTOs for the HTTP API.
//!
//! Engine types mostly serialize cleanly as-is; the exception is the commit
//! record, whose id is excluded from its own serialization (it *is* the
//! content hash). [`CommitSummary`] re-attaches it for API consumers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vellum_commit::Commit;
use vellum_types::ObjectId;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PutResponse {
    pub id: ObjectId,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ObjectListResponse {
    pub objects: Vec<ObjectId>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StageRequest {
    pub id: ObjectId,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommitRequest {
    pub message: String,
    #[serde(default = "default_author")]
    pub author: String,
}

fn default_author() -> String {
    "anonymous".into()
}

/// A commit as the API renders it, id included.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommitSummary {
    pub id: ObjectId,
    pub parents: Vec<ObjectId>,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub objects: Vec<ObjectId>,
}

impl From<Commit> for CommitSummary {
    fn from(c: Commit) -> Self {
        Self {
            id: c.id,
            parents: c.parents,
            author: c.author,
            timestamp: c.timestamp,
            message: c.message,
            objects: c.objects,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommitListResponse {
    pub commits: Vec<CommitSummary>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PushResponse {
    pub id: ObjectId,
    pub r#ref: String,
}
