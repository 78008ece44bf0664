use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vellum_types::ObjectId;

/// An immutable commit record.
///
/// The `id` is the content hash of the serialized record and is therefore
/// excluded from serialization: it is computed after the other fields are
/// encoded and filled in on load. Everything else participates in the hash,
/// so two commits with identical fields are the same commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Content hash of the serialized record. Not part of the hash input.
    #[serde(skip)]
    pub id: ObjectId,
    /// Parent commit ids. Empty for a root commit. History traversal
    /// follows only the first entry.
    pub parents: Vec<ObjectId>,
    /// Author label (no identity verification in scope).
    pub author: String,
    /// Creation timestamp.
    pub timestamp: DateTime<Utc>,
    /// Free-text message.
    pub message: String,
    /// Snapshot of object hashes staged at commit time, in staging order.
    pub objects: Vec<ObjectId>,
}

impl Commit {
    /// Returns `true` if this is a root commit (no parents).
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// The primary parent, when one exists.
    pub fn primary_parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }
}

/// Builder for the fields that go into a commit's hash.
#[derive(Clone, Debug)]
pub struct CommitDraft {
    pub message: String,
    pub author: String,
    pub parents: Vec<ObjectId>,
    pub objects: Vec<ObjectId>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl CommitDraft {
    pub fn new(message: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            author: author.into(),
            parents: Vec::new(),
            objects: Vec::new(),
            timestamp: None,
        }
    }

    pub fn with_parents(mut self, parents: Vec<ObjectId>) -> Self {
        self.parents = parents;
        self
    }

    pub fn with_objects(mut self, objects: Vec<ObjectId>) -> Self {
        self.objects = objects;
        self
    }

    /// Pin the creation timestamp instead of taking the current time.
    /// Identical drafts with identical timestamps finalize to the same id.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}
