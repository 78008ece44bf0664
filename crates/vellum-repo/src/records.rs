//! Structured JSON payloads staged by the front ends.
//!
//! Objects in the store are opaque bytes; these records are the two shapes
//! the CLI and server produce when the user works at a level above raw
//! files. Each carries a `record` discriminant so a reader (and the diff
//! preview) can tell them apart without out-of-band context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vellum_types::ObjectId;

/// A named content entity: the unit a user creates and evolves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Discriminant, always `"entity"`.
    pub record: String,
    /// Stable identity across revisions of the same entity.
    pub entity_id: Uuid,
    pub name: String,
    /// Arbitrary user payload.
    pub body: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl EntityRecord {
    pub fn new(name: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            record: "entity".into(),
            entity_id: Uuid::new_v4(),
            name: name.into(),
            body,
            created_at: Utc::now(),
        }
    }

    /// Serialize for storage. The byte encoding is the identity of the
    /// record, so this must stay deterministic for a given value.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// A note attached to a stored object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    /// Discriminant, always `"annotation"`.
    pub record: String,
    pub annotation_id: Uuid,
    /// Hash of the object being annotated.
    pub target: ObjectId,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

impl AnnotationRecord {
    pub fn new(target: ObjectId, note: impl Into<String>) -> Self {
        Self {
            record: "annotation".into(),
            annotation_id: Uuid::new_v4(),
            target,
            note: note.into(),
            created_at: Utc::now(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
