//! Commit creation and chain traversal over an object store.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use vellum_store::{ObjectStore, StoreError};
use vellum_types::ObjectId;

use crate::commit::{Commit, CommitDraft};
use crate::error::{CommitError, CommitResult};

/// Creates and reads commits persisted through an [`ObjectStore`].
///
/// The log owns no state of its own: a commit's key is its content hash, so
/// the store *is* the commit database.
#[derive(Clone)]
pub struct CommitLog {
    store: Arc<dyn ObjectStore>,
}

impl CommitLog {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Finalize a draft: serialize, hash, persist, return the populated
    /// commit.
    ///
    /// Content addressing makes this idempotent — re-issuing an identical
    /// draft (same timestamp included) rewrites the same object and yields
    /// the same id.
    pub fn create(&self, draft: CommitDraft) -> CommitResult<Commit> {
        let mut commit = Commit {
            id: ObjectId::zero(),
            parents: draft.parents,
            author: draft.author,
            timestamp: draft.timestamp.unwrap_or_else(Utc::now),
            message: draft.message,
            objects: draft.objects,
        };
        let bytes = serde_json::to_vec(&commit)
            .map_err(|e| CommitError::Serialization(e.to_string()))?;
        commit.id = self.store.put(&bytes)?;
        tracing::debug!(id = %commit.id.short_hex(), objects = commit.objects.len(), "commit finalized");
        Ok(commit)
    }

    /// Load a commit by id.
    ///
    /// Distinguishes a missing object ([`CommitError::NotFound`]) from one
    /// that exists but does not deserialize ([`CommitError::Corrupt`]).
    pub fn get(&self, id: &ObjectId) -> CommitResult<Commit> {
        let bytes = match self.store.get(id) {
            Ok(bytes) => bytes,
            Err(StoreError::NotFound(_)) => return Err(CommitError::NotFound(*id)),
            Err(e) => return Err(e.into()),
        };
        let mut commit: Commit =
            serde_json::from_slice(&bytes).map_err(|e| CommitError::Corrupt {
                id: *id,
                reason: e.to_string(),
            })?;
        commit.id = *id;
        Ok(commit)
    }

    /// Walk the chain from `start` following each commit's primary parent
    /// until a root commit is reached.
    ///
    /// A broken link (missing or corrupt parent) ends the walk silently at
    /// the break point instead of failing the whole call, so a partially
    /// synced mirror can still show what it has. Storage-unavailability
    /// errors still propagate.
    pub fn walk(&self, start: ObjectId) -> CommitResult<Vec<Commit>> {
        let mut commits = Vec::new();
        let mut seen = HashSet::new();
        let mut next = Some(start);

        while let Some(id) = next {
            // Guards against parent loops in hand-crafted or replicated data.
            if !seen.insert(id) {
                break;
            }
            match self.get(&id) {
                Ok(commit) => {
                    next = commit.primary_parent().copied();
                    commits.push(commit);
                }
                Err(CommitError::NotFound(_)) | Err(CommitError::Corrupt { .. }) => {
                    tracing::debug!(id = %id.short_hex(), "chain broken, stopping walk");
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(commits)
    }

    /// Walk from `start`, order most-recent-first by creation timestamp,
    /// then paginate.
    ///
    /// Timestamp ordering can disagree with ancestry under clock skew; that
    /// looseness is accepted. The sort is stable, so equal timestamps keep
    /// child-before-parent walk order.
    pub fn list(&self, start: ObjectId, limit: usize, offset: usize) -> CommitResult<Vec<Commit>> {
        let mut commits = self.walk(start)?;
        commits.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(commits.into_iter().skip(offset).take(limit).collect())
    }
}

impl std::fmt::Debug for CommitLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommitLog").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use vellum_store::InMemoryObjectStore;

    fn make_log() -> CommitLog {
        CommitLog::new(Arc::new(InMemoryObjectStore::new()))
    }

    fn ts(minute: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 10, minute, 0).unwrap()
    }

    /// Build a linear chain of `n` commits and return them oldest-first.
    fn make_chain(log: &CommitLog, n: u32) -> Vec<Commit> {
        let mut commits: Vec<Commit> = Vec::new();
        for i in 0..n {
            let parents = commits.last().map(|c| vec![c.id]).unwrap_or_default();
            let commit = log
                .create(
                    CommitDraft::new(format!("commit {i}"), "tester")
                        .with_parents(parents)
                        .with_timestamp(ts(i)),
                )
                .unwrap();
            commits.push(commit);
        }
        commits
    }

    #[test]
    fn create_and_get_roundtrip() {
        let log = make_log();
        let obj = vellum_hash::digest(b"payload");
        let created = log
            .create(
                CommitDraft::new("first", "alice")
                    .with_objects(vec![obj])
                    .with_timestamp(ts(0)),
            )
            .unwrap();
        assert!(!created.id.is_zero());

        let loaded = log.get(&created.id).unwrap();
        assert_eq!(loaded, created);
        assert_eq!(loaded.objects, vec![obj]);
    }

    #[test]
    fn identical_drafts_yield_identical_ids() {
        let log = make_log();
        let draft = CommitDraft::new("same", "alice")
            .with_objects(vec![vellum_hash::digest(b"x")])
            .with_timestamp(ts(0));
        let c1 = log.create(draft.clone()).unwrap();
        let c2 = log.create(draft).unwrap();
        assert_eq!(c1.id, c2.id);
    }

    #[test]
    fn different_messages_yield_different_ids() {
        let log = make_log();
        let c1 = log
            .create(CommitDraft::new("one", "a").with_timestamp(ts(0)))
            .unwrap();
        let c2 = log
            .create(CommitDraft::new("two", "a").with_timestamp(ts(0)))
            .unwrap();
        assert_ne!(c1.id, c2.id);
    }

    #[test]
    fn get_missing_commit() {
        let log = make_log();
        let id = vellum_hash::digest(b"no such commit");
        assert!(matches!(
            log.get(&id).unwrap_err(),
            CommitError::NotFound(_)
        ));
    }

    #[test]
    fn get_non_commit_object_is_corrupt() {
        let store = Arc::new(InMemoryObjectStore::new());
        let log = CommitLog::new(Arc::clone(&store) as Arc<dyn ObjectStore>);
        let id = store.put(b"just some bytes").unwrap();
        assert!(matches!(
            log.get(&id).unwrap_err(),
            CommitError::Corrupt { .. }
        ));
    }

    #[test]
    fn walk_reaches_root() {
        let log = make_log();
        let chain = make_chain(&log, 4);
        let walked = log.walk(chain.last().unwrap().id).unwrap();
        assert_eq!(walked.len(), 4);
        // Child-first order down to the root.
        assert_eq!(walked[0].message, "commit 3");
        assert_eq!(walked[3].message, "commit 0");
        assert!(walked[3].is_root());
    }

    #[test]
    fn walk_stops_silently_at_broken_link() {
        let store = Arc::new(InMemoryObjectStore::new());
        let log = CommitLog::new(Arc::clone(&store) as Arc<dyn ObjectStore>);

        // Parent id that was never written.
        let missing = vellum_hash::digest(b"deleted out-of-band");
        let child = log
            .create(
                CommitDraft::new("child", "a")
                    .with_parents(vec![missing])
                    .with_timestamp(ts(1)),
            )
            .unwrap();
        let grandchild = log
            .create(
                CommitDraft::new("grandchild", "a")
                    .with_parents(vec![child.id])
                    .with_timestamp(ts(2)),
            )
            .unwrap();

        let walked = log.walk(grandchild.id).unwrap();
        assert_eq!(walked.len(), 2);
        assert_eq!(walked[0].message, "grandchild");
        assert_eq!(walked[1].message, "child");
    }

    #[test]
    fn walk_of_missing_start_is_empty() {
        let log = make_log();
        let walked = log.walk(vellum_hash::digest(b"nothing here")).unwrap();
        assert!(walked.is_empty());
    }

    #[test]
    fn list_orders_most_recent_first() {
        let log = make_log();
        let chain = make_chain(&log, 3);
        let listed = log.list(chain.last().unwrap().id, 10, 0).unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].message, "commit 2");
        assert_eq!(listed[2].message, "commit 0");
    }

    #[test]
    fn list_orders_by_timestamp_not_ancestry() {
        let log = make_log();
        // Child carries an *older* timestamp than its parent (clock skew).
        let parent = log
            .create(CommitDraft::new("parent", "a").with_timestamp(ts(30)))
            .unwrap();
        let child = log
            .create(
                CommitDraft::new("child", "b")
                    .with_parents(vec![parent.id])
                    .with_timestamp(ts(30) - Duration::minutes(5)),
            )
            .unwrap();

        let listed = log.list(child.id, 10, 0).unwrap();
        assert_eq!(listed[0].message, "parent");
        assert_eq!(listed[1].message, "child");
    }

    #[test]
    fn list_paginates_after_ordering() {
        let log = make_log();
        let chain = make_chain(&log, 5);
        let tip = chain.last().unwrap().id;

        let page1 = log.list(tip, 2, 0).unwrap();
        assert_eq!(page1.len(), 2);
        assert_eq!(page1[0].message, "commit 4");

        let page2 = log.list(tip, 2, 2).unwrap();
        assert_eq!(page2.len(), 2);
        assert_eq!(page2[0].message, "commit 2");

        let page3 = log.list(tip, 2, 4).unwrap();
        assert_eq!(page3.len(), 1);
        assert_eq!(page3[0].message, "commit 0");
    }
}
