//! Host-UI bridge for SimpleNote.

pub mod api;
