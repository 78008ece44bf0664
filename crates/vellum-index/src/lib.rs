//! Staging index for the Vellum repository engine.
//!
//! The staging index is the ordered, append-only list of object hashes
//! queued for the next commit. It knows nothing about paths or payloads —
//! the object model is flat, so an entry is just a hash referencing a
//! previously written object.
//!
//! Re-staging the same hash is legal and yields a duplicate entry; the
//! index does not deduplicate. The list is cleared atomically when a commit
//! finalizes.
//!
//! # Key Types
//!
//! - [`StagingIndex`] -- the trait backends implement
//! - [`FsStagingIndex`] -- one hex id per line in a `STAGE` file
//! - [`InMemoryStagingIndex`] -- locked Vec for tests and embedding

pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use error::{IndexError, IndexResult};
pub use fs::FsStagingIndex;
pub use memory::InMemoryStagingIndex;
pub use traits::StagingIndex;
