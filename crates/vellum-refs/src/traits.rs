//! The [`RefStore`] trait defining the reference storage interface.
//!
//! Any backend (in-memory, filesystem, other durable key-value substrates)
//! implements this trait to provide named branch pointers plus HEAD.

use vellum_types::ObjectId;

use crate::error::{RefError, RefResult};
use crate::types::Head;

/// Storage backend for named references.
///
/// Implementations must be thread-safe (`Send + Sync`). Mutations on a given
/// ref are serialized relative to each other; reads may proceed concurrently
/// but always observe a consistent value, never a torn write.
pub trait RefStore: Send + Sync {
    /// Create or idempotently overwrite the pointer `name` -> `target`.
    ///
    /// Fails with [`RefError::InvalidRef`] when the name contains path
    /// traversal or reserved characters.
    fn set_ref(&self, name: &str, target: ObjectId) -> RefResult<()>;

    /// Read the commit id a ref points to.
    ///
    /// Fails with [`RefError::NotFound`] when the ref is unset — an unborn
    /// branch, which callers treat as "no commits yet".
    fn get_ref(&self, name: &str) -> RefResult<ObjectId>;

    /// List ref names starting with `prefix`, sorted. Pass `""` for all.
    fn list_refs(&self, prefix: &str) -> RefResult<Vec<String>>;

    /// Read the current HEAD state. `None` when HEAD has never been set.
    fn head(&self) -> RefResult<Option<Head>>;

    /// Point HEAD at a branch (symbolic ref). The branch may be unborn.
    fn set_head(&self, branch: &str) -> RefResult<()>;

    /// Detach HEAD to point directly at a commit id.
    fn set_head_detached(&self, id: ObjectId) -> RefResult<()>;

    /// Dereference HEAD to a commit id.
    ///
    /// A symbolic HEAD is followed through its branch; fails with
    /// [`RefError::Empty`] when the target ref (or HEAD itself) is unset.
    fn resolve_head(&self) -> RefResult<ObjectId> {
        match self.head()? {
            Some(Head::Symbolic(branch)) => match self.get_ref(&branch) {
                Ok(id) => Ok(id),
                Err(RefError::NotFound { name }) => Err(RefError::Empty { name }),
                Err(e) => Err(e),
            },
            Some(Head::Detached(id)) => Ok(id),
            None => Err(RefError::Empty {
                name: "HEAD".into(),
            }),
        }
    }
}
