//! Bounded, deduplicating command history with a recall cursor.

use std::collections::VecDeque;

/// Direction of a recall step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecallDirection {
    /// Towards older commands (arrow up).
    Older,
    /// Towards newer commands (arrow down).
    Newer,
}

/// Previously submitted commands, most recent first.
///
/// No command appears twice. The cursor is `None` while the operator is
/// not navigating, otherwise an index into the entries.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<String>,
    capacity: usize,
    cursor: Option<usize>,
}

impl History {
    /// Create an empty history holding at most `capacity` commands.
    ///
    /// Storage grows with use; `capacity` is only a bound.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
            cursor: None,
        }
    }

    /// Record a submitted command. Returns false for blank input.
    ///
    /// An existing identical entry is moved to the front, the oldest entry
    /// is dropped past capacity, and the cursor resets.
    pub fn record(&mut self, command: &str) -> bool {
        if command.trim().is_empty() {
            return false;
        }
        self.entries.retain(|c| c != command);
        self.entries.push_front(command.to_string());
        self.entries.truncate(self.capacity);
        self.cursor = None;
        true
    }

    /// Move the cursor and return the entry under it.
    ///
    /// Returns `Some("")` when the cursor moves back past the newest entry,
    /// and `None` only when there is no history at all.
    pub fn recall(&mut self, direction: RecallDirection) -> Option<&str> {
        let last = self.entries.len().checked_sub(1)?;
        self.cursor = match (direction, self.cursor) {
            (RecallDirection::Older, None) => Some(0),
            (RecallDirection::Older, Some(i)) => Some((i + 1).min(last)),
            (RecallDirection::Newer, None) | (RecallDirection::Newer, Some(0)) => None,
            (RecallDirection::Newer, Some(i)) => Some(i - 1),
        };
        match self.cursor {
            Some(i) => self.entries.get(i).map(String::as_str),
            None => Some(""),
        }
    }

    /// Stop navigating.
    pub fn reset_cursor(&mut self) {
        self.cursor = None;
    }

    /// Current cursor position.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Entries, most recent first.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// The most recent command.
    pub fn latest(&self) -> Option<&str> {
        self.entries.front().map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no command was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
