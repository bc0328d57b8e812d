use std::sync::Arc;

use super::{LogEntry, LogStore};

/// Incremental reader for the live log view.
pub struct LiveTail {
    store: Arc<LogStore>,
    cursor: usize,
}

impl LiveTail {
    /// Start at the beginning: the first poll returns the whole history
    pub fn from_start(store: Arc<LogStore>) -> Self {
        Self { store, cursor: 0 }
    }

    /// Start at the current end: only entries appended from now on
    pub fn from_end(store: Arc<LogStore>) -> Self {
        let (_, cursor) = store.read_since_cursor(usize::MAX);
        Self { store, cursor }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Entries appended since the previous poll
    pub fn poll(&mut self) -> Vec<LogEntry> {
        let (entries, cursor) = self.store.read_since_cursor(self.cursor);
        self.cursor = cursor;
        entries
    }
}
