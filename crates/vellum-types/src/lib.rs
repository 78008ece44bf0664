//! Foundation types for the Vellum repository engine.
//!
//! Every other Vellum crate depends on `vellum-types`. It intentionally
//! carries no I/O and no policy — just the identifiers the engine is built
//! around.
//!
//! # Key Types
//!
//! - [`ObjectId`] — Content-addressed identifier (SHA-256 digest, hex on the wire)
//! - [`TypeError`] — Parse errors for malformed identifiers

pub mod error;
pub mod object;

pub use error::TypeError;
pub use object::ObjectId;
