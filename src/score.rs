use serde::{Deserialize, Serialize};

/// A finished session's result.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u32,
}

/// Best results seen during this process, highest first.
///
/// Equal scores keep insertion order. The table lives only as long as its
/// owner; nothing is written to disk.
#[derive(Debug, Clone, Serialize)]
pub struct HighScoreTable {
    capacity: usize,
    entries: Vec<HighScoreEntry>,
}

impl HighScoreTable {
    /// Creates an empty table that keeps at most `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::new(),
        }
    }

    /// Adds a result, re-sorts and truncates.
    ///
    /// Returns the 1-based rank the entry landed on, or `None` when it fell
    /// off the end of a full table.
    pub fn record(&mut self, name: impl Into<String>, score: u32) -> Option<usize> {
        // Insert after every entry with an equal or higher score.
        let position = self
            .entries
            .iter()
            .position(|entry| entry.score < score)
            .unwrap_or(self.entries.len());
        if position >= self.capacity {
            return None;
        }

        self.entries.insert(
            position,
            HighScoreEntry {
                name: name.into(),
                score,
            },
        );
        self.entries.truncate(self.capacity);

        Some(position + 1)
    }

    /// Entries from best to worst.
    #[must_use]
    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    #[must_use]
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|entry| entry.score)
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
