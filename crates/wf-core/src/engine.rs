use serde::{Deserialize, Serialize};

use crate::error::EngineResult;

/// The raw output an engine accumulated since the last pull.
///
/// Engines fill exactly one field in practice, but the shape is open: a
/// consumer evaluates the fields in priority order `lines`, `text`,
/// `output`, `message`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRecord {
    /// Pre-split lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<Vec<String>>,
    /// Freeform newline-delimited text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// A markup blob using `<br>` and `<pre>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// A single message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl UpdateRecord {
    /// A record carrying nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A record of pre-split lines.
    pub fn lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: Some(lines.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// A record of freeform text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// A record holding a markup blob.
    pub fn markup(output: impl Into<String>) -> Self {
        Self {
            output: Some(output.into()),
            ..Self::default()
        }
    }

    /// A record holding one message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.lines.is_none() && self.text.is_none() && self.output.is_none() && self.message.is_none()
    }
}

/// The turn-based narrative engine a session drives.
///
/// Implementations are synchronous and must return promptly. The engine's
/// grammar and world model are opaque to the controller; it only sees text
/// in, update records out, and a few state hooks.
pub trait Engine {
    /// Queue operator input for the next turn.
    fn feed(&mut self, input: &str);

    /// Advance one step. Returns whether more work is pending.
    fn step(&mut self) -> bool;

    /// Pull (and clear) the output accumulated since the last pull.
    fn updates(&mut self) -> UpdateRecord;

    /// Name of the current location.
    fn location(&self) -> String;

    /// JSON array of `[index, {question, answers, section, tags}]` pairs.
    fn hints_for_location(&self, location: &str) -> String;

    /// The answer text for a question at a disclosure level.
    fn hint_answer(&self, index: usize, level: usize) -> Option<String>;

    /// Roll back one turn. Returns whether there was anything to undo.
    fn undo(&mut self) -> bool;

    /// Re-apply an undone turn. Returns whether there was anything to redo.
    fn redo(&mut self) -> bool;

    /// Serialize the current state, if the engine can.
    fn save(&mut self) -> Option<String>;

    /// Replace the current state with a serialized one.
    fn restore(&mut self, payload: &str) -> EngineResult<()>;
}
