//! Note use-case services.
//!
//! # Responsibility
//! - `note_store`: note CRUD and the active-note invariant.
//! - `sidebar`: read-only display projection.
//! - `session`: UI event boundary combining both.

pub mod note_store;
pub mod session;
pub mod sidebar;
