use std::sync::{Mutex, PoisonError};

use vellum_types::ObjectId;

use crate::error::{IndexError, IndexResult};
use crate::traits::StagingIndex;

/// In-memory staging index for tests and ephemeral use.
#[derive(Debug, Default)]
pub struct InMemoryStagingIndex {
    entries: Mutex<Vec<ObjectId>>,
}

impl InMemoryStagingIndex {
    /// Create a new empty staging index.
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(e: PoisonError<T>) -> IndexError {
    IndexError::StorageUnavailable(std::io::Error::other(format!("lock poisoned: {e}")))
}

impl StagingIndex for InMemoryStagingIndex {
    fn stage(&self, id: &ObjectId) -> IndexResult<()> {
        self.entries.lock().map_err(poisoned)?.push(*id);
        Ok(())
    }

    fn read_all(&self) -> IndexResult<Vec<ObjectId>> {
        Ok(self.entries.lock().map_err(poisoned)?.clone())
    }

    fn clear(&self) -> IndexResult<()> {
        self.entries.lock().map_err(poisoned)?.clear();
        Ok(())
    }
}
