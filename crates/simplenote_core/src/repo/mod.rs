//! Key-value storage abstractions and implementations.
//!
//! # Responsibility
//! - Define the storage contract consumed by the note store.
//! - Isolate SQLite query details from note semantics.
//!
//! # Invariants
//! - Every implementation enforces its quota before mutating.

pub mod kv_repo;
pub mod memory_repo;
