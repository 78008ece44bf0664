use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use vellum_commit::{Commit, CommitDraft, CommitLog};
use vellum_diff::{CommitDiff, DiffEngine};
use vellum_index::{FsStagingIndex, InMemoryStagingIndex, StagingIndex};
use vellum_refs::{FsRefStore, Head, InMemoryRefStore, RefError, RefStore};
use vellum_store::{FsObjectStore, InMemoryObjectStore, ObjectStore};
use vellum_types::ObjectId;

use crate::error::{RepoError, RepoResult};

/// Directory holding all repository state under a working root.
pub const REPO_DIR: &str = ".vellum";

/// Branch HEAD points at after `init`.
pub const DEFAULT_BRANCH: &str = "main";

/// Snapshot of repository state for `status` output.
#[derive(Clone, Debug, Serialize)]
pub struct RepoStatus {
    /// Current branch name; `None` when HEAD is detached.
    pub branch: Option<String>,
    /// Commit id HEAD resolves to; `None` on an unborn branch.
    pub head: Option<ObjectId>,
    /// Entries in the staging index.
    pub staged: usize,
    /// Commits reachable from HEAD along primary parents.
    pub commits: usize,
    /// Distinct object hashes referenced by those commits.
    pub committed_objects: usize,
    /// All objects in the store, committed or not.
    pub total_objects: usize,
}

/// The repository facade: store + staging index + refs + commit log behind
/// one API.
///
/// All front ends (CLI, HTTP) go through this type; nothing else touches
/// the component crates directly. The facade owns the commit-finalization
/// critical section and nothing else — component backends handle their own
/// durability.
pub struct Repository {
    store: Arc<dyn ObjectStore>,
    index: Arc<dyn StagingIndex>,
    refs: Arc<dyn RefStore>,
    log: CommitLog,
    diff: DiffEngine,
    commit_lock: Mutex<()>,
}

impl Repository {
    /// Create a new repository under `root`.
    ///
    /// Lays out `.vellum/` with the object store, staging index, and refs,
    /// and points HEAD at the unborn `main` branch. Fails with
    /// [`RepoError::AlreadyExists`] if the layout is already present.
    pub fn init(root: impl AsRef<Path>) -> RepoResult<Self> {
        let dir = root.as_ref().join(REPO_DIR);
        if dir.exists() {
            return Err(RepoError::AlreadyExists(dir));
        }
        std::fs::create_dir_all(&dir)?;
        let repo = Self::open_layout(&dir)?;
        repo.refs.set_head(DEFAULT_BRANCH)?;
        tracing::info!(path = %dir.display(), "repository initialized");
        Ok(repo)
    }

    /// Open an existing repository under `root`.
    pub fn open(root: impl AsRef<Path>) -> RepoResult<Self> {
        let dir = root.as_ref().join(REPO_DIR);
        if !dir.is_dir() {
            return Err(RepoError::NotInitialized(dir));
        }
        Self::open_layout(&dir)
    }

    fn open_layout(dir: &Path) -> RepoResult<Self> {
        let store: Arc<dyn ObjectStore> = Arc::new(FsObjectStore::open(dir)?);
        let index: Arc<dyn StagingIndex> = Arc::new(FsStagingIndex::open(dir)?);
        let refs: Arc<dyn RefStore> = Arc::new(FsRefStore::open(dir)?);
        Ok(Self::assemble(store, index, refs))
    }

    /// A fully in-memory repository, for embedding and tests.
    pub fn in_memory() -> RepoResult<Self> {
        let store: Arc<dyn ObjectStore> = Arc::new(InMemoryObjectStore::new());
        let index: Arc<dyn StagingIndex> = Arc::new(InMemoryStagingIndex::new());
        let refs: Arc<dyn RefStore> = Arc::new(InMemoryRefStore::new());
        let repo = Self::assemble(store, index, refs);
        repo.refs.set_head(DEFAULT_BRANCH)?;
        Ok(repo)
    }

    fn assemble(
        store: Arc<dyn ObjectStore>,
        index: Arc<dyn StagingIndex>,
        refs: Arc<dyn RefStore>,
    ) -> Self {
        let log = CommitLog::new(Arc::clone(&store));
        let diff = DiffEngine::new(log.clone(), Arc::clone(&store));
        Self {
            store,
            index,
            refs,
            log,
            diff,
            commit_lock: Mutex::new(()),
        }
    }

    // ---- Object operations ----

    pub fn put_object(&self, payload: &[u8]) -> RepoResult<ObjectId> {
        Ok(self.store.put(payload)?)
    }

    pub fn put_object_stream(
        &self,
        reader: &mut dyn Read,
        content_type: Option<&str>,
    ) -> RepoResult<ObjectId> {
        Ok(self.store.put_stream(reader, content_type)?)
    }

    pub fn get_object(&self, id: &ObjectId) -> RepoResult<Vec<u8>> {
        Ok(self.store.get(id)?)
    }

    /// Open an object for streaming reads, returning its content type.
    pub fn get_object_stream(&self, id: &ObjectId) -> RepoResult<(Box<dyn Read + Send>, String)> {
        Ok(self.store.get_stream(id)?)
    }

    pub fn object_exists(&self, id: &ObjectId) -> RepoResult<bool> {
        Ok(self.store.exists(id)?)
    }

    pub fn list_objects(&self, prefix: &str) -> RepoResult<Vec<ObjectId>> {
        Ok(self.store.list(prefix)?)
    }

    // ---- Staging ----

    /// Queue an object hash for the next commit.
    ///
    /// Deliberately no existence check: staging records intent, and the
    /// object may arrive later (or never — the commit snapshots whatever
    /// was staged).
    pub fn stage_object(&self, id: &ObjectId) -> RepoResult<()> {
        self.index.stage(id)?;
        Ok(())
    }

    /// Current staging sequence, oldest first.
    pub fn staged(&self) -> RepoResult<Vec<ObjectId>> {
        Ok(self.index.read_all()?)
    }

    // ---- Commits ----

    /// Finalize the staging index into a commit on the current branch.
    pub fn commit(&self, message: &str, author: &str) -> RepoResult<Commit> {
        self.commit_inner(message, author, None)
    }

    /// Like [`commit`](Self::commit) with a pinned timestamp, so identical
    /// inputs finalize to the identical commit id.
    pub fn commit_at(
        &self,
        message: &str,
        author: &str,
        timestamp: DateTime<Utc>,
    ) -> RepoResult<Commit> {
        self.commit_inner(message, author, Some(timestamp))
    }

    fn commit_inner(
        &self,
        message: &str,
        author: &str,
        timestamp: Option<DateTime<Utc>>,
    ) -> RepoResult<Commit> {
        // Spans read-index -> create -> advance-ref -> clear-index so two
        // concurrent commits cannot interleave and drop staged entries.
        let _guard = self
            .commit_lock
            .lock()
            .map_err(|e| RepoError::Io(std::io::Error::other(format!("lock poisoned: {e}"))))?;

        let branch = self.current_branch()?;
        let parents = match self.refs.resolve_head() {
            Ok(id) => vec![id],
            Err(RefError::Empty { .. }) => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        let objects = self.index.read_all()?;

        let mut draft = CommitDraft::new(message, author)
            .with_parents(parents)
            .with_objects(objects);
        if let Some(ts) = timestamp {
            draft = draft.with_timestamp(ts);
        }
        let commit = self.log.create(draft)?;

        self.refs.set_ref(&branch, commit.id)?;
        self.index.clear()?;

        tracing::info!(id = %commit.id.short_hex(), branch = %branch, "commit finalized");
        Ok(commit)
    }

    pub fn get_commit(&self, id: &ObjectId) -> RepoResult<Commit> {
        Ok(self.log.get(id)?)
    }

    /// History reachable from HEAD, most recent first, paginated.
    /// Empty on an unborn branch.
    pub fn list_commits(&self, limit: usize, offset: usize) -> RepoResult<Vec<Commit>> {
        match self.head_id()? {
            Some(head) => Ok(self.log.list(head, limit, offset)?),
            None => Ok(Vec::new()),
        }
    }

    // ---- Diff ----

    pub fn diff(&self, from: &ObjectId, to: &ObjectId) -> RepoResult<CommitDiff> {
        Ok(self.diff.diff(from, to)?)
    }

    // ---- Refs ----

    /// The branch HEAD points at; detached HEAD is an error here.
    pub fn current_branch(&self) -> RepoResult<String> {
        match self.refs.head()? {
            Some(Head::Symbolic(name)) => Ok(name),
            Some(Head::Detached(_)) => Err(RepoError::DetachedHead),
            None => Err(RefError::Empty {
                name: "HEAD".into(),
            }
            .into()),
        }
    }

    /// Commit id HEAD resolves to; `None` on an unborn branch.
    pub fn head_id(&self) -> RepoResult<Option<ObjectId>> {
        match self.refs.resolve_head() {
            Ok(id) => Ok(Some(id)),
            Err(RefError::Empty { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Create a branch pointing at the current HEAD commit.
    pub fn create_branch(&self, name: &str) -> RepoResult<()> {
        match self.head_id()? {
            Some(tip) => {
                self.refs.set_ref(name, tip)?;
                Ok(())
            }
            None => Err(RefError::Empty {
                name: "HEAD".into(),
            }
            .into()),
        }
    }

    /// Point HEAD at an existing branch.
    pub fn switch_branch(&self, name: &str) -> RepoResult<()> {
        self.refs.get_ref(name)?;
        self.refs.set_head(name)?;
        Ok(())
    }

    /// All branch names, sorted.
    pub fn branches(&self) -> RepoResult<Vec<String>> {
        Ok(self.refs.list_refs("")?)
    }

    // ---- Replication ----

    /// Accept a serialized commit from a peer and advance `ref_name` to it.
    ///
    /// Trust-on-write: the payload must parse as a commit, nothing more.
    /// The ref moves even if the commit's parents or objects are absent —
    /// history reads degrade gracefully at the gap.
    pub fn push(&self, payload: &[u8], ref_name: &str) -> RepoResult<ObjectId> {
        let id = self.store.put(payload)?;
        if let Err(e) = serde_json::from_slice::<Commit>(payload) {
            return Err(RepoError::InvalidPush {
                id,
                reason: e.to_string(),
            });
        }
        self.refs.set_ref(ref_name, id)?;
        tracing::info!(id = %id.short_hex(), ref_name, "push accepted");
        Ok(id)
    }

    // ---- Status ----

    pub fn status(&self) -> RepoResult<RepoStatus> {
        let branch = self.refs.head()?.and_then(|h| h.branch().map(String::from));
        let head = self.head_id()?;
        let staged = self.index.len()?;

        let (commits, committed_objects) = match head {
            Some(start) => {
                let chain = self.log.walk(start)?;
                let distinct: HashSet<ObjectId> = chain
                    .iter()
                    .flat_map(|c| c.objects.iter().copied())
                    .collect();
                (chain.len(), distinct.len())
            }
            None => (0, 0),
        };
        let total_objects = self.store.list("")?.len();

        Ok(RepoStatus {
            branch,
            head,
            staged,
            commits,
            committed_objects,
            total_objects,
        })
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository").finish()
    }
}
