//! Content-identity hashing for the Vellum repository engine.
//!
//! A single deterministic function maps a byte payload to its [`ObjectId`]:
//! plain SHA-256, rendered as lowercase hex by the id type. There is no
//! domain separation and no salting — the digest of a payload *is* its
//! identity, so two producers writing the same bytes always converge on the
//! same id.
//!
//! All hashing wraps the `sha2` crate — no custom cryptography.

pub mod hasher;

pub use hasher::{digest, verify, StreamHasher};
