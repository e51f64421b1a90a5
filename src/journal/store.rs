//! In-memory journal store.
//!
//! Entries are kept newest-first in a `VecDeque` behind one mutex. Appends
//! insert at the front and evict from the back once the capacity is exceeded,
//! all under the same lock, so concurrent writers never observe a store larger
//! than its capacity.
//!
//! Entry ids are positional: `id = len + 1` at insertion time. After eviction
//! an id can be handed out again.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::journal::errors::{JournalError, JournalResult};
use crate::timestamp::now;

/// Default number of retained entries.
pub const DEFAULT_JOURNAL_CAPACITY: usize = 500;

/// A single journal note.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Positional id assigned at insertion.
    pub id: usize,
    /// Note text, trimmed.
    pub text: String,
    /// ISO-8601 timestamp, caller-supplied or generated.
    pub timestamp: String,
}

/// Thread-safe bounded journal.
#[derive(Debug)]
pub struct JournalStore {
    capacity: usize,
    entries: Mutex<VecDeque<JournalEntry>>,
}

impl Default for JournalStore {
    fn default() -> Self {
        Self::new(DEFAULT_JOURNAL_CAPACITY)
    }
}

impl JournalStore {
    /// Create an empty store. A zero capacity is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity.min(DEFAULT_JOURNAL_CAPACITY))),
        }
    }

    /// Append a note at the front, evicting the oldest entries past capacity.
    ///
    /// A blank `timestamp` is treated as absent.
    ///
    /// # Errors
    /// Returns [`JournalError::EmptyText`] if `text` is blank; the store is left untouched.
    pub fn append(&self, text: &str, timestamp: Option<&str>) -> JournalResult<JournalEntry> {
        let text = text.trim();
        if text.is_empty() {
            return Err(JournalError::EmptyText);
        }

        let timestamp = timestamp
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map_or_else(now, str::to_string);

        let mut entries = self.lock();
        let entry = JournalEntry {
            id: entries.len() + 1,
            text: text.to_string(),
            timestamp,
        };
        entries.push_front(entry.clone());
        while entries.len() > self.capacity {
            entries.pop_back();
        }
        drop(entries);

        tracing::debug!(id = entry.id, "journal entry appended");
        Ok(entry)
    }

    /// Snapshot of all entries, newest first.
    #[must_use]
    pub fn list(&self) -> Vec<JournalEntry> {
        self.lock().iter().cloned().collect()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Maximum number of retained entries.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<JournalEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
