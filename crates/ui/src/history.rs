//! # History panel view

use askama::Template;
use domains::{HistoryEntry, HistoryKind};

#[derive(Debug, Clone)]
pub struct HistoryItem {
    /// `success`, `error`, `info` or `warning`; doubles as the CSS class.
    pub kind: &'static str,
    pub icon: &'static str,
    pub label: &'static str,
    pub content: String,
    pub timestamp: String,
    pub read: bool,
}

impl HistoryItem {
    pub fn project(entry: &HistoryEntry) -> Self {
        let kind = match entry.kind {
            HistoryKind::Success => "success",
            HistoryKind::Error => "error",
            HistoryKind::Info => "info",
            HistoryKind::Warning => "warning",
        };
        Self {
            kind,
            icon: entry.kind.icon(),
            label: entry.kind.label(),
            content: entry.content.clone(),
            timestamp: entry.timestamp.clone(),
            read: entry.read,
        }
    }
}

#[derive(Template)]
#[template(path = "history.html")]
pub struct HistoryView {
    pub items: Vec<HistoryItem>,
}

impl HistoryView {
    /// Newest first, as stored. Entries keep the read state they had
    /// when the panel was opened.
    pub fn project(entries: &[HistoryEntry]) -> Self {
        Self {
            items: entries.iter().map(HistoryItem::project).collect(),
        }
    }
}
