//! # Notification History
//!
//! A capped, newest-first log of user-facing events, persisted under
//! `historyMessages` independently of the posts.

use std::sync::Arc;

use domains::{display_timestamp, Clock, HistoryEntry, HistoryKind, HISTORY_CAPACITY};
use tracing::{debug, error, warn};

use crate::persistence::{keys, PersistentStore};

pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
    capacity: usize,
    store: PersistentStore,
    clock: Arc<dyn Clock>,
}

impl HistoryLog {
    /// Reads the log once; a missing or malformed blob yields an empty log.
    /// The log always keeps at least the newest entry.
    pub fn load(store: PersistentStore, clock: Arc<dyn Clock>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut entries = match store.load::<Vec<HistoryEntry>>(keys::HISTORY) {
            Ok(Some(entries)) => entries,
            Ok(None) => Vec::new(),
            Err(e) => {
                error!(error = %e, "Failed to load history, starting empty");
                Vec::new()
            }
        };
        entries.truncate(capacity);
        Self {
            entries,
            capacity,
            store,
            clock,
        }
    }

    pub fn with_default_capacity(store: PersistentStore, clock: Arc<dyn Clock>) -> Self {
        Self::load(store, clock, HISTORY_CAPACITY)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.read).count()
    }

    /// Prepends an unread entry and evicts the oldest beyond capacity.
    pub fn record(&mut self, kind: HistoryKind, content: impl Into<String>) -> &HistoryEntry {
        let now = self.clock.now();
        let now_ms = now.timestamp_millis();
        let id = match self.entries.first() {
            Some(newest) if newest.id >= now_ms => newest.id + 1,
            _ => now_ms,
        };
        let entry = HistoryEntry {
            id,
            kind,
            content: content.into(),
            timestamp: display_timestamp(&now),
            read: false,
        };
        debug!(kind = ?entry.kind, content = %entry.content, "Notification recorded");

        self.entries.insert(0, entry);
        self.entries.truncate(self.capacity);
        self.persist();
        &self.entries[0]
    }

    pub fn mark_all_read(&mut self) {
        for entry in &mut self.entries {
            entry.read = true;
        }
        self.persist();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    // A failed write cannot be reported through the log itself.
    fn persist(&self) {
        if let Err(e) = self.store.save(keys::HISTORY, &self.entries) {
            warn!(error = %e, "Failed to save history");
        }
    }
}
