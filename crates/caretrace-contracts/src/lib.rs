//! # caretrace-contracts
//!
//! Shared types and contracts for the Caretrace reasoning core.
//!
//! All crates in the workspace import from here. No component logic lives in
//! this crate — only data definitions, closed vocabularies, canonical
//! hashing, the clock seam, and error types.

pub mod canonical;
pub mod catalog;
pub mod clock;
pub mod error;
pub mod evaluation;
pub mod finding;
pub mod identity;
pub mod snapshot;
