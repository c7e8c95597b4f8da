use std::cell::RefCell;
use std::collections::BTreeMap;
use std::mem;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::{Engine, UpdateRecord};
use crate::error::{EngineError, EngineResult};

/// A canned reply to one command.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Response {
    /// Output produced by the command.
    #[serde(default)]
    pub output: UpdateRecord,
    /// Location the player ends up in, if the command moves them.
    #[serde(default)]
    pub go: Option<String>,
}

/// One hint question in a script's catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptHint {
    /// The question as shown in the listing.
    pub question: String,
    /// Answers, weakest first.
    pub answers: Vec<String>,
    /// Location the question belongs to.
    pub section: String,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// The JSON document a [`ScriptedEngine`] is built from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Script {
    /// Starting location.
    #[serde(default)]
    pub start: String,
    /// Output queued before the first command.
    #[serde(default)]
    pub intro: UpdateRecord,
    /// Room descriptions, queued after undo, redo, and restore.
    #[serde(default)]
    pub rooms: BTreeMap<String, UpdateRecord>,
    /// Replies keyed by lowercased command.
    #[serde(default)]
    pub responses: BTreeMap<String, Response>,
    /// Reply for commands without an entry.
    #[serde(default)]
    pub fallback: Option<UpdateRecord>,
    /// Hint catalog.
    #[serde(default)]
    pub hints: Vec<ScriptHint>,
    /// Steps reported as pending after each feed.
    #[serde(default = "default_steps")]
    pub steps_per_turn: usize,
}

fn default_steps() -> usize {
    1
}

/// A call made against a [`ScriptedEngine`], recorded in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    /// `feed` with the given input.
    Feed(String),
    /// `step`.
    Step,
    /// `updates`.
    Updates,
    /// `location`.
    Location,
    /// `hints_for_location` with the given location.
    Hints(String),
    /// `hint_answer` for question and level.
    HintAnswer(usize, usize),
    /// `undo`.
    Undo,
    /// `redo`.
    Redo,
    /// `save`.
    Save,
    /// `restore`.
    Restore,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct State {
    location: String,
    turns: u32,
}

/// A deterministic engine that replies from a [`Script`].
///
/// Keeps a snapshot per turn for undo/redo, serializes its state as JSON
/// for save/restore, and records every call so tests can assert on the
/// exact conversation a session had with it.
#[derive(Debug)]
pub struct ScriptedEngine {
    script: Script,
    state: State,
    undo_stack: Vec<State>,
    redo_stack: Vec<State>,
    pending_output: UpdateRecord,
    pending_steps: usize,
    runaway: bool,
    blank_saves: bool,
    calls: RefCell<Vec<EngineCall>>,
}

impl ScriptedEngine {
    /// Create an engine from a script. The intro is queued as the first output.
    pub fn new(script: Script) -> Self {
        let state = State {
            location: script.start.clone(),
            turns: 0,
        };
        let pending_output = script.intro.clone();
        Self {
            script,
            state,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            pending_output,
            pending_steps: 0,
            runaway: false,
            blank_saves: false,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Parse a script from JSON and create an engine from it.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let script: Script = serde_json::from_str(json)?;
        Ok(Self::new(script))
    }

    /// Make `step` report pending work forever.
    pub fn with_runaway_steps(mut self) -> Self {
        self.runaway = true;
        self
    }

    /// Make `save` return an empty payload.
    pub fn with_blank_saves(mut self) -> Self {
        self.blank_saves = true;
        self
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.borrow().clone()
    }

    /// Forget the recorded calls.
    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Number of turns taken in the current timeline.
    pub fn turns(&self) -> u32 {
        self.state.turns
    }

    fn record(&self, call: EngineCall) {
        self.calls.borrow_mut().push(call);
    }

    fn queue_room(&mut self) {
        self.pending_output = self
            .script
            .rooms
            .get(&self.state.location)
            .cloned()
            .unwrap_or_default();
    }
}

impl Engine for ScriptedEngine {
    fn feed(&mut self, input: &str) {
        self.record(EngineCall::Feed(input.to_string()));

        self.undo_stack.push(self.state.clone());
        self.redo_stack.clear();
        self.state.turns += 1;

        let key = input.trim().to_lowercase();
        self.pending_output = match self.script.responses.get(&key) {
            Some(response) => {
                if let Some(destination) = &response.go {
                    self.state.location = destination.clone();
                }
                response.output.clone()
            }
            None if key.is_empty() => UpdateRecord::text("I beg your pardon?\n>"),
            None => {
                debug!(command = %key, "no scripted response, using fallback");
                self.script
                    .fallback
                    .clone()
                    .unwrap_or_else(|| UpdateRecord::text("I don't understand that.\n>"))
            }
        };
        self.pending_steps = self.script.steps_per_turn;
    }

    fn step(&mut self) -> bool {
        self.record(EngineCall::Step);
        if self.runaway {
            return true;
        }
        self.pending_steps = self.pending_steps.saturating_sub(1);
        self.pending_steps > 0
    }

    fn updates(&mut self) -> UpdateRecord {
        self.record(EngineCall::Updates);
        mem::take(&mut self.pending_output)
    }

    fn location(&self) -> String {
        self.record(EngineCall::Location);
        self.state.location.clone()
    }

    fn hints_for_location(&self, location: &str) -> String {
        self.record(EngineCall::Hints(location.to_string()));
        let needle = location.to_lowercase();
        let matches: Vec<(usize, &ScriptHint)> = self
            .script
            .hints
            .iter()
            .enumerate()
            .filter(|(_, h)| {
                h.section.to_lowercase() == needle
                    || h.tags.iter().any(|t| t.to_lowercase().contains(&needle))
            })
            .collect();
        serde_json::to_string(&matches).unwrap_or_else(|_| "[]".to_string())
    }

    fn hint_answer(&self, index: usize, level: usize) -> Option<String> {
        self.record(EngineCall::HintAnswer(index, level));
        let answers = &self.script.hints.get(index)?.answers;
        // Levels past the end clamp to the strongest answer.
        let last = answers.len().checked_sub(1)?;
        answers.get(level.min(last)).cloned()
    }

    fn undo(&mut self) -> bool {
        self.record(EngineCall::Undo);
        match self.undo_stack.pop() {
            Some(previous) => {
                let current = mem::replace(&mut self.state, previous);
                self.redo_stack.push(current);
                self.queue_room();
                true
            }
            None => false,
        }
    }

    fn redo(&mut self) -> bool {
        self.record(EngineCall::Redo);
        match self.redo_stack.pop() {
            Some(next) => {
                let current = mem::replace(&mut self.state, next);
                self.undo_stack.push(current);
                self.queue_room();
                true
            }
            None => false,
        }
    }

    fn save(&mut self) -> Option<String> {
        self.record(EngineCall::Save);
        if self.blank_saves {
            return Some(String::new());
        }
        serde_json::to_string(&self.state).ok()
    }

    fn restore(&mut self, payload: &str) -> EngineResult<()> {
        self.record(EngineCall::Restore);
        let state: State =
            serde_json::from_str(payload).map_err(|e| EngineError::Restore(e.to_string()))?;
        debug!(location = %state.location, turns = state.turns, "state restored");
        self.state = state;
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.queue_room();
        Ok(())
    }
}
