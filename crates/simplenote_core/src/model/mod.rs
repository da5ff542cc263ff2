//! Domain model for notes.
//!
//! # Invariants
//! - Every note is identified by its namespaced storage key.
//! - Notes carry no data beyond their text content.

pub mod note;
