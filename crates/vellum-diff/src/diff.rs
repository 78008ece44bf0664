use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use vellum_commit::CommitLog;
use vellum_store::ObjectStore;
use vellum_types::ObjectId;

use crate::error::DiffResult;

/// One object that differs between two commits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiffEntry {
    /// Hash of the changed object.
    pub id: ObjectId,
    /// Parsed payload, present only when the object is readable and its
    /// bytes are valid JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<serde_json::Value>,
}

/// Result of comparing two commits.
///
/// `added` holds objects referenced by the target but not the base;
/// `removed` holds the inverse. Both lists are sorted by hash, so the same
/// pair of commits always produces the same diff.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommitDiff {
    /// Base commit of the comparison.
    pub from: ObjectId,
    /// Target commit of the comparison.
    pub to: ObjectId,
    pub added: Vec<DiffEntry>,
    pub removed: Vec<DiffEntry>,
}

impl CommitDiff {
    /// Returns `true` when the two commits reference identical object sets.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Computes set-difference diffs between commits.
#[derive(Clone)]
pub struct DiffEngine {
    log: CommitLog,
    store: Arc<dyn ObjectStore>,
}

impl DiffEngine {
    pub fn new(log: CommitLog, store: Arc<dyn ObjectStore>) -> Self {
        Self { log, store }
    }

    /// Compare the object sets of two commits.
    ///
    /// Both endpoints must load cleanly; after that the diff is pure set
    /// arithmetic. Duplicate hashes within one commit's object list
    /// collapse, so an object counts at most once per side.
    pub fn diff(&self, from: &ObjectId, to: &ObjectId) -> DiffResult<CommitDiff> {
        let base = self.log.get(from)?;
        let target = self.log.get(to)?;

        let base_set: BTreeSet<ObjectId> = base.objects.into_iter().collect();
        let target_set: BTreeSet<ObjectId> = target.objects.into_iter().collect();

        let added = target_set
            .difference(&base_set)
            .map(|id| self.entry(id))
            .collect();
        let removed = base_set
            .difference(&target_set)
            .map(|id| self.entry(id))
            .collect();

        Ok(CommitDiff {
            from: *from,
            to: *to,
            added,
            removed,
        })
    }

    /// Attach a best-effort preview. A missing object or non-JSON payload
    /// only suppresses the preview, never the entry itself.
    fn entry(&self, id: &ObjectId) -> DiffEntry {
        let preview = match self.store.get(id) {
            Ok(bytes) => serde_json::from_slice(&bytes).ok(),
            Err(e) => {
                tracing::debug!(id = %id.short_hex(), error = %e, "preview unavailable");
                None
            }
        };
        DiffEntry { id: *id, preview }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use vellum_commit::CommitDraft;
    use vellum_store::InMemoryObjectStore;

    use crate::error::DiffError;

    fn make_engine() -> (DiffEngine, Arc<InMemoryObjectStore>, CommitLog) {
        let store = Arc::new(InMemoryObjectStore::new());
        let log = CommitLog::new(Arc::clone(&store) as Arc<dyn ObjectStore>);
        let engine = DiffEngine::new(log.clone(), Arc::clone(&store) as Arc<dyn ObjectStore>);
        (engine, store, log)
    }

    fn commit_with(log: &CommitLog, msg: &str, objects: Vec<ObjectId>) -> ObjectId {
        log.create(
            CommitDraft::new(msg, "tester")
                .with_objects(objects)
                .with_timestamp(Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()),
        )
        .unwrap()
        .id
    }

    #[test]
    fn added_and_removed_are_disjoint_differences() {
        let (engine, store, log) = make_engine();
        let x = store.put(b"x").unwrap();
        let y = store.put(b"y").unwrap();
        let z = store.put(b"z").unwrap();

        let c1 = commit_with(&log, "c1", vec![x, y]);
        let c2 = commit_with(&log, "c2", vec![y, z]);

        let diff = engine.diff(&c1, &c2).unwrap();
        assert_eq!(diff.added.iter().map(|e| e.id).collect::<Vec<_>>(), vec![z]);
        assert_eq!(
            diff.removed.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![x]
        );
    }

    #[test]
    fn superset_commit_only_adds() {
        let (engine, store, log) = make_engine();
        let x = store.put(b"x").unwrap();
        let y = store.put(b"y").unwrap();
        let z = store.put(b"z").unwrap();

        let c1 = commit_with(&log, "c1", vec![x, y]);
        let c2 = commit_with(&log, "c2", vec![x, y, z]);

        let diff = engine.diff(&c1, &c2).unwrap();
        assert_eq!(diff.added.len(), 1);
        assert_eq!(diff.added[0].id, z);
        assert!(diff.removed.is_empty());
    }

    #[test]
    fn diff_against_self_is_empty() {
        let (engine, store, log) = make_engine();
        let x = store.put(b"x").unwrap();
        let c1 = commit_with(&log, "c1", vec![x]);

        let diff = engine.diff(&c1, &c1).unwrap();
        assert!(diff.is_empty());
    }

    #[test]
    fn reversing_endpoints_swaps_sides() {
        let (engine, store, log) = make_engine();
        let x = store.put(b"x").unwrap();
        let z = store.put(b"z").unwrap();

        let c1 = commit_with(&log, "c1", vec![x]);
        let c2 = commit_with(&log, "c2", vec![z]);

        let forward = engine.diff(&c1, &c2).unwrap();
        let backward = engine.diff(&c2, &c1).unwrap();
        assert_eq!(
            forward.added.iter().map(|e| e.id).collect::<Vec<_>>(),
            backward.removed.iter().map(|e| e.id).collect::<Vec<_>>()
        );
        assert_eq!(
            forward.removed.iter().map(|e| e.id).collect::<Vec<_>>(),
            backward.added.iter().map(|e| e.id).collect::<Vec<_>>()
        );
    }

    #[test]
    fn entries_are_sorted_by_hash() {
        let (engine, store, log) = make_engine();
        let mut ids: Vec<ObjectId> = (0..6)
            .map(|i| store.put(format!("payload {i}").as_bytes()).unwrap())
            .collect();

        let c1 = commit_with(&log, "c1", vec![]);
        let c2 = commit_with(&log, "c2", ids.clone());

        let diff = engine.diff(&c1, &c2).unwrap();
        ids.sort();
        assert_eq!(diff.added.iter().map(|e| e.id).collect::<Vec<_>>(), ids);
    }

    #[test]
    fn json_payload_gets_preview() {
        let (engine, store, log) = make_engine();
        let json = store.put(br#"{"title":"welcome","draft":false}"#).unwrap();

        let c1 = commit_with(&log, "c1", vec![]);
        let c2 = commit_with(&log, "c2", vec![json]);

        let diff = engine.diff(&c1, &c2).unwrap();
        let preview = diff.added[0].preview.as_ref().unwrap();
        assert_eq!(preview["title"], "welcome");
        assert_eq!(preview["draft"], false);
    }

    #[test]
    fn binary_payload_has_no_preview_but_keeps_entry() {
        let (engine, store, log) = make_engine();
        let blob = store.put(&[0xff, 0x00, 0x12, 0x80]).unwrap();

        let c1 = commit_with(&log, "c1", vec![]);
        let c2 = commit_with(&log, "c2", vec![blob]);

        let diff = engine.diff(&c1, &c2).unwrap();
        assert_eq!(diff.added.len(), 1);
        assert_eq!(diff.added[0].id, blob);
        assert!(diff.added[0].preview.is_none());
    }

    #[test]
    fn missing_referenced_object_keeps_entry_without_preview() {
        let (engine, _store, log) = make_engine();
        // Referenced by the commit but never written to the store.
        let ghost = vellum_hash::digest(b"never stored");

        let c1 = commit_with(&log, "c1", vec![]);
        let c2 = commit_with(&log, "c2", vec![ghost]);

        let diff = engine.diff(&c1, &c2).unwrap();
        assert_eq!(diff.added.len(), 1);
        assert_eq!(diff.added[0].id, ghost);
        assert!(diff.added[0].preview.is_none());
    }

    #[test]
    fn missing_endpoint_commit_fails() {
        let (engine, _store, log) = make_engine();
        let c1 = commit_with(&log, "c1", vec![]);
        let ghost = vellum_hash::digest(b"no such commit");

        assert!(matches!(
            engine.diff(&c1, &ghost).unwrap_err(),
            DiffError::CommitNotFound(_)
        ));
        assert!(matches!(
            engine.diff(&ghost, &c1).unwrap_err(),
            DiffError::CommitNotFound(_)
        ));
    }

    #[test]
    fn duplicate_hashes_within_a_commit_collapse() {
        let (engine, store, log) = make_engine();
        let x = store.put(b"x").unwrap();

        let c1 = commit_with(&log, "c1", vec![]);
        let c2 = commit_with(&log, "c2", vec![x, x, x]);

        let diff = engine.diff(&c1, &c2).unwrap();
        assert_eq!(diff.added.len(), 1);
    }
}
