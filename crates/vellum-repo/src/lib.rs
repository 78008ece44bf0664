//! High-level repository facade for the Vellum engine.
//!
//! Composes the object store, staging index, ref store, commit log, and
//! diff engine into one API that the CLI and HTTP server drive. This crate
//! owns the staging lifecycle and the commit-finalization critical section;
//! everything below it is a dumb durable component.
//!
//! # Key Types
//!
//! - [`Repository`] -- the facade (fs-backed or in-memory)
//! - [`RepoStatus`] -- aggregate state for `status` output
//! - [`records::EntityRecord`] / [`records::AnnotationRecord`] -- the
//!   structured payloads front ends stage

pub mod error;
pub mod records;
pub mod repository;

pub use error::{RepoError, RepoResult};
pub use repository::{Repository, RepoStatus, DEFAULT_BRANCH, REPO_DIR};
