use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a transcript line. Monotonic within a transcript and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LineId(pub u64);

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single displayable line of the session transcript.
///
/// Content may embed the engine's markup subset (`<br>`, `<pre>`, ...);
/// it is passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    /// Position in the transcript's id sequence.
    pub id: LineId,
    /// The text content.
    pub content: String,
    /// Whether this line echoes operator input.
    pub is_input: bool,
}

/// Append-only stream of [`Line`]s with a clear-all reset.
///
/// Clearing drops every line but keeps the id counter, so ids stay unique
/// across the whole session.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    lines: Vec<Line>,
    last_id: u64,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an output line and return its id.
    pub fn push(&mut self, content: impl Into<String>) -> LineId {
        self.push_line(content.into(), false)
    }

    /// Append a line that echoes operator input and return its id.
    pub fn push_input(&mut self, content: impl Into<String>) -> LineId {
        self.push_line(content.into(), true)
    }

    /// Append several output lines in order.
    pub fn extend<I, S>(&mut self, contents: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for content in contents {
            self.push(content);
        }
    }

    fn push_line(&mut self, content: String, is_input: bool) -> LineId {
        self.last_id += 1;
        let id = LineId(self.last_id);
        self.lines.push(Line {
            id,
            content,
            is_input,
        });
        id
    }

    /// Drop every line. The id counter is not reset.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// All lines in append order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Lines appended after the given id (exclusive).
    pub fn since(&self, id: Option<LineId>) -> &[Line] {
        match id {
            None => &self.lines,
            Some(id) => {
                let start = self.lines.partition_point(|l| l.id <= id);
                &self.lines[start..]
            }
        }
    }

    /// The most recently assigned id, if any line was ever appended.
    pub fn last_id(&self) -> Option<LineId> {
        (self.last_id > 0).then_some(LineId(self.last_id))
    }

    /// Number of lines currently held.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the transcript holds no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line contents in order, convenient for assertions and plain output.
    pub fn contents(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.content.as_str()).collect()
    }
}
