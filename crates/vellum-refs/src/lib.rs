//! Reference management for the Vellum repository engine.
//!
//! References are the human-readable entry points into the commit chain:
//! mutable named pointers (branches) from a name to a commit id, plus the
//! distinguished HEAD pointer selecting the active branch.
//!
//! # Architecture
//!
//! - **Branches** are mutable pointers advanced by commit finalization. A
//!   branch with no commit yet is "unborn" — reading it reports `NotFound`,
//!   which callers treat as "no commits yet", not a fatal error.
//! - **HEAD** is either symbolic (names a branch) or detached (holds a
//!   commit id directly).
//!
//! # Modules
//!
//! - [`error`] — Error types for ref operations
//! - [`types`] — The [`Head`] state
//! - [`traits`] — The [`RefStore`] trait defining the storage interface
//! - [`names`] — Ref name validation (path traversal, reserved characters)
//! - [`fs`] — Filesystem-backed [`FsRefStore`]
//! - [`memory`] — In-memory [`InMemoryRefStore`] for tests

pub mod error;
pub mod fs;
pub mod memory;
pub mod names;
pub mod traits;
pub mod types;

pub use error::{RefError, RefResult};
pub use fs::FsRefStore;
pub use memory::InMemoryRefStore;
pub use names::validate_ref_name;
pub use traits::RefStore;
pub use types::Head;
