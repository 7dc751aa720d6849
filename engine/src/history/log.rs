//! Append-only round log with a navigation cursor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundEntry<T> {
    /// 1-based round number within its log
    pub round: u32,
    pub timestamp: DateTime<Utc>,
    pub payload: T,
}

/// Rounds of one category, oldest first.
///
/// The cursor is `None` only while the log is empty. Recording always
/// appends and moves the cursor to the new end; navigating moves the
/// cursor and never adds or drops entries. Deserializing clamps a stored
/// cursor back into range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredLog<T>")]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct RoundLog<T> {
    entries: Vec<RoundEntry<T>>,
    cursor: Option<usize>,
}

#[derive(Deserialize)]
struct StoredLog<T> {
    entries: Vec<RoundEntry<T>>,
    cursor: Option<usize>,
}

impl<T> From<StoredLog<T>> for RoundLog<T> {
    fn from(stored: StoredLog<T>) -> Self {
        let mut log = Self::from_entries(stored.entries);
        if let Some(index) = stored.cursor {
            log.seek(index);
        }
        log
    }
}

impl<T> Default for RoundLog<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
        }
    }
}

impl<T> RoundLog<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a log from stored entries with the cursor on the newest one
    pub fn from_entries(entries: Vec<RoundEntry<T>>) -> Self {
        let cursor = entries.len().checked_sub(1);
        Self { entries, cursor }
    }

    /// Append `payload` as the next round, stamped now
    pub fn record(&mut self, payload: T) -> &RoundEntry<T> {
        self.record_at(payload, Utc::now())
    }

    /// Append `payload` with an explicit timestamp
    pub fn record_at(&mut self, payload: T, timestamp: DateTime<Utc>) -> &RoundEntry<T> {
        let round = self.entries.last().map_or(1, |e| e.round + 1);
        self.entries.push(RoundEntry {
            round,
            timestamp,
            payload,
        });
        let last = self.entries.len() - 1;
        self.cursor = Some(last);
        &self.entries[last]
    }

    /// Move the cursor to the newest round
    pub fn seek_last(&mut self) {
        self.cursor = self.entries.len().checked_sub(1);
    }

    /// Move the cursor to `index`. Returns false, leaving the cursor alone,
    /// when there is no such entry.
    pub fn seek(&mut self, index: usize) -> bool {
        if index >= self.entries.len() {
            return false;
        }
        self.cursor = Some(index);
        true
    }

    /// Step to the previous round. Returns false when already at the first.
    pub fn back(&mut self) -> bool {
        match self.cursor {
            Some(c) if c > 0 => {
                self.cursor = Some(c - 1);
                true
            }
            _ => false,
        }
    }

    /// Step to the next round. Returns false when already at the last.
    pub fn forward(&mut self) -> bool {
        match self.cursor {
            Some(c) if c + 1 < self.entries.len() => {
                self.cursor = Some(c + 1);
                true
            }
            _ => false,
        }
    }

    /// Entry under the cursor
    pub fn current(&self) -> Option<&RoundEntry<T>> {
        self.cursor.and_then(|c| self.entries.get(c))
    }

    /// Most recently recorded entry, wherever the cursor is
    pub fn last(&self) -> Option<&RoundEntry<T>> {
        self.entries.last()
    }

    pub fn entries(&self) -> &[RoundEntry<T>] {
        &self.entries
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_go_back(&self) -> bool {
        matches!(self.cursor, Some(c) if c > 0)
    }

    pub fn can_go_forward(&self) -> bool {
        matches!(self.cursor, Some(c) if c + 1 < self.entries.len())
    }

    /// `k/n` position of the cursor, `None` while empty
    pub fn position_label(&self) -> Option<String> {
        self.cursor
            .map(|c| format!("{}/{}", c + 1, self.entries.len()))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }
}
