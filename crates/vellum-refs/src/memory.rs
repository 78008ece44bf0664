//! In-memory reference store for testing and ephemeral use.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use vellum_types::ObjectId;

use crate::error::{RefError, RefResult};
use crate::names::validate_ref_name;
use crate::traits::RefStore;
use crate::types::Head;

/// An in-memory implementation of [`RefStore`].
///
/// All data lives in a `HashMap` behind a `RwLock`. Data is lost when the
/// store is dropped.
#[derive(Debug, Default)]
pub struct InMemoryRefStore {
    refs: RwLock<HashMap<String, ObjectId>>,
    head: RwLock<Option<Head>>,
}

impl InMemoryRefStore {
    /// Create a new empty ref store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(e: PoisonError<T>) -> RefError {
    RefError::Unavailable(std::io::Error::other(format!("lock poisoned: {e}")))
}

impl RefStore for InMemoryRefStore {
    fn set_ref(&self, name: &str, target: ObjectId) -> RefResult<()> {
        validate_ref_name(name)?;
        let mut refs = self.refs.write().map_err(poisoned)?;
        refs.insert(name.to_string(), target);
        Ok(())
    }

    fn get_ref(&self, name: &str) -> RefResult<ObjectId> {
        validate_ref_name(name)?;
        let refs = self.refs.read().map_err(poisoned)?;
        refs.get(name).copied().ok_or_else(|| RefError::NotFound {
            name: name.to_string(),
        })
    }

    fn list_refs(&self, prefix: &str) -> RefResult<Vec<String>> {
        let refs = self.refs.read().map_err(poisoned)?;
        let mut names: Vec<String> = refs
            .keys()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect();
        names.sort();
        Ok(names)
    }

    fn head(&self) -> RefResult<Option<Head>> {
        Ok(self.head.read().map_err(poisoned)?.clone())
    }

    fn set_head(&self, branch: &str) -> RefResult<()> {
        validate_ref_name(branch)?;
        *self.head.write().map_err(poisoned)? = Some(Head::Symbolic(branch.to_string()));
        Ok(())
    }

    fn set_head_detached(&self, id: ObjectId) -> RefResult<()> {
        *self.head.write().map_err(poisoned)? = Some(Head::Detached(id));
        Ok(())
    }
}
