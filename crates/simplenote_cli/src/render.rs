//! Plain-text rendering of notepad views.

use simplenote_core::{NotepadView, SidebarEntry, Warning};

const ACTIVE_MARKER: &str = "*";

/// One sidebar row: marker, timestamp, id, summary.
pub fn sidebar_line(entry: &SidebarEntry) -> String {
    let marker = if entry.is_active { ACTIVE_MARKER } else { " " };
    format!(
        "{marker} {}  {}  {}",
        entry.timestamp_label, entry.id, entry.summary
    )
}

pub fn sidebar(view: &NotepadView) -> String {
    view.sidebar
        .iter()
        .map(sidebar_line)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn warning(warning: &Warning) -> String {
    format!("warning: {warning}")
}
