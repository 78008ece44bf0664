use vellum_types::ObjectId;

use crate::error::IndexResult;

/// The staging index: an ordered sequence of object hashes queued for the
/// next commit.
///
/// Implementations must be read-modify-write safe: concurrent `stage` calls
/// must not lose entries, and a failed `stage` must never leave a truncated
/// entry behind. Reads observe a consistent snapshot, never a torn write.
pub trait StagingIndex: Send + Sync {
    /// Append `id` to the staging sequence.
    ///
    /// Duplicates are permitted; insertion order is preserved.
    fn stage(&self, id: &ObjectId) -> IndexResult<()>;

    /// Return the current sequence, unchanged by the read.
    fn read_all(&self) -> IndexResult<Vec<ObjectId>>;

    /// Atomically empty the sequence. Used only by commit finalization.
    fn clear(&self) -> IndexResult<()>;

    /// Number of staged entries.
    fn len(&self) -> IndexResult<usize> {
        Ok(self.read_all()?.len())
    }

    /// Returns `true` if nothing is staged.
    fn is_empty(&self) -> IndexResult<bool> {
        Ok(self.read_all()?.is_empty())
    }
}
