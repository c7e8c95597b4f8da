//! The session orchestrator.
//!
//! [`Session`] owns every piece of per-play state: the transcript, command
//! history, slot gateway, hint disclosure, and hint ledger. Each operation
//! runs to completion on `&mut self`, so a countdown tick can never land in
//! the middle of a turn.

use std::time::Duration;

use tracing::{debug, info, warn};
use wf_core::{Engine, Transcript};

use crate::adapter::EngineAdapter;
use crate::config::SessionConfig;
use crate::error::SessionResult;
use crate::hint::{HintDisclosure, HintLedger, HintPhase, HintView, TimerToken};
use crate::history::{History, RecallDirection};
use crate::output;
use crate::slots::{SlotStore, slot_name_or_generated};
use crate::store::KeyValueStore;

const UNDONE: &str = "[UNDO]";
const REDONE: &str = "[REDO]";
const NOTHING_TO_UNDO: &str = "[Nothing to undo]";
const NOTHING_TO_REDO: &str = "[Nothing to redo]";
const SAVE_FAILED: &str = "[Save failed]";
const LOAD_FAILED: &str = "[Load failed]";
const DELETE_FAILED: &str = "[Delete failed]";

/// Commands that open the hint catalog after the engine has seen them.
const HINT_COMMANDS: [&str; 2] = ["hint", "help"];

/// Whether submitting `input` opens the hint catalog.
pub fn is_hint_command(input: &str) -> bool {
    let lower = input.trim().to_lowercase();
    HINT_COMMANDS.contains(&lower.as_str())
}

/// An interactive play session.
#[derive(Debug)]
pub struct Session<E, S> {
    config: SessionConfig,
    adapter: EngineAdapter<E>,
    transcript: Transcript,
    history: History,
    slots: SlotStore<S>,
    hints: HintDisclosure,
    ledger: HintLedger,
    location: String,
}

impl<E: Engine, S: KeyValueStore> Session<E, S> {
    /// Create a session. Fails only on an invalid config.
    pub fn new(
        config: SessionConfig,
        adapter: EngineAdapter<E>,
        store: S,
    ) -> SessionResult<Self> {
        config.validate()?;
        let slots = SlotStore::new(store, &config);
        let history = History::new(config.history_capacity);
        let hints = HintDisclosure::from_config(&config);
        Ok(Self {
            config,
            adapter,
            transcript: Transcript::new(),
            history,
            slots,
            hints,
            ledger: HintLedger::new(),
            location: String::new(),
        })
    }

    /// Show whatever the engine printed before the first command.
    pub fn start(&mut self) {
        self.drain();
        info!(location = %self.location, "session started");
    }

    /// Submit one line of operator input.
    pub fn submit(&mut self, raw: &str) {
        let command = raw.trim();
        self.transcript.push_input(format!("> {raw}"));

        if self.history.record(command) {
            self.remember(command);
        }

        if is_hint_command(command) {
            let lower = command.to_lowercase();
            self.adapter.feed(&lower);
            self.drain();
            self.open_hints();
            return;
        }

        self.adapter.feed(command);
        self.drain();
    }

    fn remember(&mut self, command: &str) {
        if let Err(e) = self.slots.set_last_command(command) {
            warn!(error = %e, "failed to persist last command");
        }
    }

    /// Step the engine until idle, then collect its output.
    fn drain(&mut self) {
        let ceiling = self.config.drain_ceiling;
        let mut iterations = 0;
        let mut pending = true;
        while pending && iterations < ceiling {
            pending = self.adapter.step();
            iterations += 1;
        }
        if pending {
            debug!(iterations, "drain ceiling reached, treating engine as idle");
        }

        let record = self.adapter.updates();
        let lines = output::process(&record);
        debug!(iterations, lines = lines.len(), "drained engine output");
        self.transcript.extend(lines);
        self.refresh_location();
    }

    fn refresh_location(&mut self) {
        let location = self.adapter.location();
        if location != self.location {
            debug!(%location, "location changed");
            self.location = location;
        }
    }

    /// Roll the engine back one turn.
    pub fn undo(&mut self) -> bool {
        if !self.adapter.undo() {
            self.transcript.push(NOTHING_TO_UNDO);
            return false;
        }
        self.transcript.push(UNDONE);
        self.drain();
        true
    }

    /// Re-apply an undone turn.
    pub fn redo(&mut self) -> bool {
        if !self.adapter.redo() {
            self.transcript.push(NOTHING_TO_REDO);
            return false;
        }
        self.transcript.push(REDONE);
        self.drain();
        true
    }

    /// Save the game under `name`, or a generated name when `name` is blank.
    pub fn save(&mut self, name: &str) -> bool {
        let slot = slot_name_or_generated(name);
        let Some(payload) = self.adapter.save().filter(|p| !p.is_empty()) else {
            warn!(slot = %slot, "engine produced no save payload");
            self.transcript.push(SAVE_FAILED);
            return false;
        };
        if self.slots.write(&slot, &payload).is_err() {
            self.transcript.push(SAVE_FAILED);
            return false;
        }
        info!(slot = %slot, "game saved");
        self.transcript.push(format!("[Game saved to slot: {slot}]"));
        true
    }

    /// Restore the game from slot `name` and replay the last command.
    pub fn load(&mut self, name: &str) -> bool {
        let slot = name.trim();
        let Some(payload) = self.slots.read(slot) else {
            warn!(slot = %slot, "no such save slot");
            self.transcript.push(LOAD_FAILED);
            return false;
        };
        if let Err(e) = self.adapter.restore(&payload) {
            warn!(slot = %slot, error = %e, "restore failed");
            self.transcript.push(LOAD_FAILED);
            return false;
        }
        info!(slot = %slot, "game loaded");
        self.transcript.push(format!("[Game loaded from slot: {slot}]"));
        self.drain();

        if let Some(command) = self.slots.last_command().filter(|c| !c.trim().is_empty()) {
            debug!(%command, "replaying last command");
            self.transcript.push_input(format!("> {command}"));
            self.adapter.feed(&command);
            self.drain();
        }
        true
    }

    /// Delete slot `name`.
    pub fn delete(&mut self, name: &str) -> bool {
        let slot = name.trim();
        if self.slots.delete(slot).is_err() {
            self.transcript.push(DELETE_FAILED);
            return false;
        }
        info!(slot = %slot, "save slot deleted");
        self.transcript.push(format!("[Deleted save slot: {slot}]"));
        true
    }

    /// Saved slot names, sorted.
    pub fn slots(&self) -> Vec<String> {
        self.slots.list()
    }

    /// Drop every transcript line.
    pub fn clear(&mut self) {
        self.transcript.clear();
    }

    /// Step through command history.
    pub fn recall(&mut self, direction: RecallDirection) -> Option<&str> {
        self.history.recall(direction)
    }

    /// Open the hint catalog for the current location.
    ///
    /// Returns false, leaving the hints closed, when no engine is running.
    pub fn open_hints(&mut self) -> bool {
        if !self.adapter.is_ready() {
            debug!("hints requested without an engine");
            return false;
        }
        self.hints.open(&self.location, &self.adapter);
        true
    }

    /// Show the hint question at `position`.
    pub fn select_hint(&mut self, position: usize) -> bool {
        self.hints.select(position, &self.adapter, &mut self.ledger)
    }

    /// Reveal the next answer of the selected question.
    pub fn reveal_next_hint(&mut self) -> bool {
        self.hints.reveal_next(&self.adapter, &mut self.ledger)
    }

    /// Return to the question list.
    pub fn hint_back(&mut self) {
        self.hints.back();
    }

    /// Close the hint catalog.
    pub fn close_hints(&mut self) {
        self.hints.close();
    }

    /// Advance the hint countdown by one tick.
    pub fn tick(&mut self) -> bool {
        self.hints.tick()
    }

    /// Advance the hint countdown by one tick if `token` is current.
    pub fn on_tick(&mut self, token: TimerToken) -> bool {
        self.hints.on_tick(token)
    }

    /// Advance the hint countdown by wall-clock time.
    pub fn advance(&mut self, dt: Duration) -> bool {
        self.hints.advance(dt)
    }

    /// Current hint disclosure state.
    pub fn hint_view(&self) -> HintView {
        self.hints.view()
    }

    /// Current hint phase.
    pub fn hint_phase(&self) -> HintPhase {
        self.hints.phase()
    }

    /// Stop the session, cancelling any running countdown.
    pub fn shutdown(&mut self) {
        self.hints.close();
        info!(
            lines = self.transcript.len(),
            hints_shown = self.ledger.shown(),
            "session closed"
        );
    }

    /// The transcript.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Location reported after the last drain.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Command history.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// The hint ledger.
    pub fn ledger(&self) -> &HintLedger {
        &self.ledger
    }

    /// The most recently submitted command, as persisted.
    pub fn last_command(&self) -> Option<String> {
        self.slots.last_command()
    }

    /// The engine, when one is attached.
    pub fn engine(&self) -> Option<&E> {
        self.adapter.engine()
    }

    /// Session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use wf_core::{EngineCall, LineId, ScriptedEngine};

    const SCRIPT: &str = r#"{
        "start": "Bedroom",
        "intro": {"output": "Bedroom<br>The room is a mess.<br>&gt;"},
        "rooms": {
            "Bedroom": {"text": "Bedroom\nThe room is a mess.\n>"},
            "Front Porch": {"text": "Front Porch\n>"}
        },
        "responses": {
            "south": {"output": {"text": "Front Porch\nA bulldozer approaches.\n>"}, "go": "Front Porch"},
            "north": {"output": {"text": "Bedroom\n>"}, "go": "Bedroom"},
            "stand": {"output": {"lines": ["You get up.", ""]}},
            "hint": {"output": {"message": "[Hints are available.]"}},
            "help": {"output": {"message": "[Hints are available.]"}}
        },
        "hints": [
            {"question": "How do I get up?", "answers": ["Try standing.", "Type STAND."], "section": "Bedroom"},
            {"question": "What about the bulldozer?", "answers": ["Lie down."], "section": "Front Porch", "tags": ["bulldozer"]}
        ]
    }"#;

    type TestSession = Session<ScriptedEngine, MemoryStore>;

    fn engine() -> ScriptedEngine {
        ScriptedEngine::from_json(SCRIPT).unwrap()
    }

    fn session_with(engine: ScriptedEngine, store: MemoryStore) -> TestSession {
        let mut s = Session::new(
            SessionConfig::default(),
            EngineAdapter::attach(engine),
            store,
        )
        .unwrap();
        s.start();
        s.engine().unwrap().clear_calls();
        s
    }

    fn session() -> TestSession {
        session_with(engine(), MemoryStore::new())
    }

    fn calls(s: &TestSession) -> Vec<EngineCall> {
        s.engine().unwrap().calls()
    }

    fn tail(s: &TestSession, n: usize) -> Vec<&str> {
        let contents = s.transcript().contents();
        contents[contents.len().saturating_sub(n)..].to_vec()
    }

    #[test]
    fn start_shows_intro() {
        let s = session();
        assert_eq!(s.transcript().contents(), vec!["Bedroom", "The room is a mess."]);
        assert_eq!(s.location(), "Bedroom");
    }

    #[test]
    fn submit_echoes_feeds_and_drains() {
        let mut s = session();
        s.submit("south");

        assert_eq!(
            tail(&s, 3),
            vec!["> south", "Front Porch", "A bulldozer approaches."]
        );
        let echo = &s.transcript().lines()[2];
        assert!(echo.is_input);
        assert_eq!(s.location(), "Front Porch");
        assert_eq!(s.history().latest(), Some("south"));
        assert_eq!(s.last_command().as_deref(), Some("south"));
        assert_eq!(
            calls(&s),
            vec![
                EngineCall::Feed("south".into()),
                EngineCall::Step,
                EngineCall::Updates,
                EngineCall::Location,
            ]
        );
    }

    #[test]
    fn submit_feeds_trimmed_input_and_echoes_raw() {
        let mut s = session();
        s.submit("  STAND  ");
        assert_eq!(tail(&s, 2), vec![">   STAND  ", "You get up."]);
        assert_eq!(calls(&s)[0], EngineCall::Feed("STAND".into()));
        assert_eq!(s.history().latest(), Some("STAND"));
    }

    #[test]
    fn empty_submit_still_reaches_engine() {
        let mut s = session();
        s.submit("   ");
        assert_eq!(calls(&s)[0], EngineCall::Feed(String::new()));
        assert!(s.history().is_empty());
        assert_eq!(s.last_command(), None);
        assert_eq!(tail(&s, 1), vec!["I beg your pardon?"]);
    }

    #[test]
    fn hint_command_feeds_then_opens_catalog() {
        let mut s = session();
        s.submit("HINT");

        let c = calls(&s);
        assert_eq!(c[0], EngineCall::Feed("hint".into()));
        assert!(c.contains(&EngineCall::Hints("Bedroom".into())));
        assert_eq!(tail(&s, 1), vec!["[Hints are available.]"]);

        let view = s.hint_view();
        assert_eq!(view.phase, HintPhase::Listing);
        assert_eq!(view.location, "Bedroom");
        assert_eq!(view.questions, vec!["How do I get up?"]);
    }

    #[test]
    fn hint_commands_are_case_insensitive() {
        assert!(is_hint_command("Help"));
        assert!(is_hint_command("  HINT "));
        assert!(!is_hint_command("hints"));
        assert!(!is_hint_command("get hint"));
    }

    #[test]
    fn hint_catalog_follows_refreshed_location() {
        let mut s = session();
        s.submit("south");
        s.submit("help");
        assert_eq!(s.hint_view().questions, vec!["What about the bulldozer?"]);
    }

    #[test]
    fn hint_countdown_escalates() {
        let mut s = session();
        s.submit("hint");
        assert!(s.select_hint(0));
        assert_eq!(s.hint_view().answer, "Try standing.");
        assert_eq!(s.hint_view().remaining_secs, Some(5));

        assert!(!s.reveal_next_hint());
        assert!(!s.advance(Duration::from_millis(4950)));
        assert!(s.advance(Duration::from_millis(50)));
        assert_eq!(s.hint_phase(), HintPhase::Ready);

        assert!(s.reveal_next_hint());
        let view = s.hint_view();
        assert_eq!(view.answer, "Type STAND.");
        assert_eq!(view.remaining_secs, Some(10));
        assert_eq!(s.ledger().shown(), 2);
    }

    #[test]
    fn ledger_survives_reopening() {
        let mut s = session();
        s.submit("hint");
        s.select_hint(0);
        s.close_hints();
        s.submit("hint");
        s.select_hint(0);
        assert_eq!(s.ledger().shown(), 1);
        assert_eq!(s.hint_view().remaining_secs, Some(10));
    }

    #[test]
    fn drain_is_capped() {
        let mut s = session_with(engine().with_runaway_steps(), MemoryStore::new());
        s.submit("look");
        let c = calls(&s);
        let steps = c.iter().filter(|c| **c == EngineCall::Step).count();
        let pulls = c.iter().filter(|c| **c == EngineCall::Updates).count();
        assert_eq!(steps, 100);
        assert_eq!(pulls, 1);
    }

    #[test]
    fn drain_ceiling_is_configurable() {
        let config = SessionConfig::default().with_drain_ceiling(3);
        let adapter = EngineAdapter::attach(engine().with_runaway_steps());
        let mut s = Session::new(config, adapter, MemoryStore::new()).unwrap();
        s.submit("look");
        let steps = calls(&s).iter().filter(|c| **c == EngineCall::Step).count();
        assert_eq!(steps, 3);
    }

    #[test]
    fn undo_without_history_queries_nothing() {
        let mut s = session();
        let before = s.transcript().len();
        assert!(!s.undo());
        assert_eq!(s.transcript().len(), before + 1);
        assert_eq!(tail(&s, 1), vec!["[Nothing to undo]"]);
        assert_eq!(calls(&s), vec![EngineCall::Undo]);
    }

    #[test]
    fn undo_and_redo() {
        let mut s = session();
        s.submit("south");

        assert!(s.undo());
        assert_eq!(tail(&s, 3), vec!["[UNDO]", "Bedroom", "The room is a mess."]);
        assert_eq!(s.location(), "Bedroom");

        assert!(s.redo());
        assert_eq!(tail(&s, 2), vec!["[REDO]", "Front Porch"]);
        assert_eq!(s.location(), "Front Porch");

        assert!(!s.redo());
        assert_eq!(tail(&s, 1), vec!["[Nothing to redo]"]);
    }

    #[test]
    fn save_with_blank_payload_never_writes() {
        let mut s = session_with(engine().with_blank_saves(), MemoryStore::new());
        assert!(!s.save("one"));
        assert_eq!(tail(&s, 1), vec!["[Save failed]"]);
        assert!(s.slots().is_empty());
    }

    #[test]
    fn save_lists_slot() {
        let mut s = session();
        assert!(s.save("bedroom"));
        assert_eq!(tail(&s, 1), vec!["[Game saved to slot: bedroom]"]);
        assert_eq!(s.slots(), vec!["bedroom"]);
    }

    #[test]
    fn blank_slot_name_is_generated() {
        let mut s = session();
        assert!(s.save("  "));
        let slots = s.slots();
        assert_eq!(slots.len(), 1);
        assert!(slots[0].starts_with("save_"));
    }

    #[test]
    fn save_over_quota_fails() {
        let mut s = session_with(engine(), MemoryStore::new().with_quota(10));
        assert!(!s.save("one"));
        assert_eq!(tail(&s, 1), vec!["[Save failed]"]);
        assert!(s.slots().is_empty());
    }

    #[test]
    fn load_missing_slot_changes_nothing() {
        let mut s = session();
        let before: Vec<String> = s.transcript().contents().iter().map(|l| l.to_string()).collect();

        assert!(!s.load("nope"));
        let after = s.transcript().contents();
        assert_eq!(after[..before.len()], before[..]);
        assert_eq!(after[before.len()..], ["[Load failed]"]);
        assert_eq!(s.location(), "Bedroom");
        assert!(calls(&s).is_empty());
    }

    #[test]
    fn load_restores_and_replays_last_command() {
        let mut s = session();
        s.submit("south");
        s.save("porch");
        s.submit("north");
        assert_eq!(s.location(), "Bedroom");
        s.engine().unwrap().clear_calls();

        assert!(s.load("porch"));
        assert_eq!(
            tail(&s, 4),
            vec![
                "[Game loaded from slot: porch]",
                "Front Porch",
                "> north",
                "Bedroom",
            ]
        );
        assert!(calls(&s).contains(&EngineCall::Feed("north".into())));
        assert_eq!(s.location(), "Bedroom");
        assert_eq!(s.history().len(), 2);
    }

    #[test]
    fn load_without_last_command_skips_replay() {
        let mut s = session();
        s.save("start");
        assert!(s.load("start"));
        assert_eq!(
            tail(&s, 3),
            vec!["[Game loaded from slot: start]", "Bedroom", "The room is a mess."]
        );
        assert!(!calls(&s).iter().any(|c| matches!(c, EngineCall::Feed(_))));
    }

    #[test]
    fn corrupt_slot_fails_to_load() {
        let mut store = MemoryStore::new();
        store.set_item("wayfarer_save_bad", "not json").unwrap();
        let mut s = session_with(engine(), store);

        assert!(!s.load("bad"));
        assert_eq!(tail(&s, 1), vec!["[Load failed]"]);
        assert_eq!(s.location(), "Bedroom");
    }

    #[test]
    fn delete_removes_slot() {
        let mut s = session();
        s.save("one");
        assert!(s.delete("one"));
        assert_eq!(tail(&s, 1), vec!["[Deleted save slot: one]"]);
        assert!(s.slots().is_empty());
    }

    #[test]
    fn clear_keeps_ids_growing() {
        let mut s = session();
        let last = s.transcript().last_id().unwrap();
        s.clear();
        assert!(s.transcript().is_empty());
        s.submit("stand");
        assert!(s.transcript().lines()[0].id > last);
        assert_eq!(s.transcript().lines()[0].id, LineId(last.0 + 1));
    }

    #[test]
    fn recall_walks_history() {
        let mut s = session();
        s.submit("stand");
        s.submit("south");
        assert_eq!(s.recall(RecallDirection::Older), Some("south"));
        assert_eq!(s.recall(RecallDirection::Older), Some("stand"));
        assert_eq!(s.recall(RecallDirection::Newer), Some("south"));
        assert_eq!(s.recall(RecallDirection::Newer), Some(""));
    }

    #[test]
    fn last_command_failure_is_ignored() {
        let mut s = session_with(engine(), MemoryStore::new().unavailable());
        s.submit("south");
        assert_eq!(s.history().latest(), Some("south"));
        assert_eq!(s.location(), "Front Porch");
    }

    #[test]
    fn uninitialized_engine_is_inert() {
        let mut s: TestSession = Session::new(
            SessionConfig::default(),
            EngineAdapter::uninitialized(),
            MemoryStore::new(),
        )
        .unwrap();
        s.start();
        s.submit("look");
        assert_eq!(s.transcript().contents(), vec!["> look"]);
        assert!(!s.undo());
        assert!(!s.save("x"));
        s.submit("hint");
        assert_eq!(s.hint_phase(), HintPhase::Closed);
        assert!(!s.open_hints());
        assert_eq!(s.hint_phase(), HintPhase::Closed);
        assert!(!s.tick());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let result = Session::new(
            SessionConfig::default().with_history_capacity(0),
            EngineAdapter::attach(engine()),
            MemoryStore::new(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn huge_history_capacity_is_accepted() {
        let mut s = Session::new(
            SessionConfig::default().with_history_capacity(usize::MAX),
            EngineAdapter::attach(engine()),
            MemoryStore::new(),
        )
        .unwrap();
        s.start();
        s.submit("look");
        s.submit("south");
        assert_eq!(s.history().entries().collect::<Vec<_>>(), vec!["south", "look"]);
    }

    #[test]
    fn shutdown_cancels_countdown() {
        let mut s = session();
        s.submit("hint");
        s.select_hint(0);
        s.shutdown();
        assert_eq!(s.hint_phase(), HintPhase::Closed);
        assert!(!s.tick());
    }
}
