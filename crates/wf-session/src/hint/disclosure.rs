//! The hint disclosure state machine.

use std::fmt;
use std::time::Duration;

use tracing::{debug, warn};

use super::HintSource;
use super::catalog::{CatalogEntry, HintCatalog};
use super::countdown::{Countdown, TimerToken};
use super::ledger::HintLedger;
use crate::config::SessionConfig;

/// Where a disclosure is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintPhase {
    /// Not shown.
    Closed,
    /// Showing the question list.
    Listing,
    /// Showing an answer while the countdown runs.
    Revealing,
    /// The countdown elapsed; the next level may be requested.
    Ready,
    /// The strongest answer was reached; nothing more to reveal.
    Exhausted,
}

impl fmt::Display for HintPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HintPhase::Closed => "closed",
            HintPhase::Listing => "listing",
            HintPhase::Revealing => "revealing",
            HintPhase::Ready => "ready",
            HintPhase::Exhausted => "exhausted",
        };
        f.write_str(name)
    }
}

/// Snapshot of a disclosure for presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct HintView {
    /// Lifecycle phase.
    pub phase: HintPhase,
    /// Location the catalog was loaded for.
    pub location: String,
    /// Questions in listing order.
    pub questions: Vec<String>,
    /// The selected question's text.
    pub question: Option<String>,
    /// Current level, zero-based.
    pub level: usize,
    /// Number of levels of the selected question.
    pub levels: usize,
    /// The answer currently shown.
    pub answer: String,
    /// Whether a stronger answer exists.
    pub has_next_level: bool,
    /// Countdown fraction left, 1.0 to 0.0; 0.0 when no countdown runs.
    pub remaining_fraction: f64,
    /// Whole seconds left on the countdown, when one runs.
    pub remaining_secs: Option<u64>,
}

/// Question/answer traversal with a timed reveal of each next level.
///
/// Phases: `Closed` → [`open`](Self::open) → `Listing` →
/// [`select`](Self::select) → `Revealing` → countdown elapses → `Ready` →
/// [`reveal_next`](Self::reveal_next) → `Revealing` or `Exhausted`.
/// [`back`](Self::back) returns to `Listing`, [`close`](Self::close) to
/// `Closed`. Every transition out of `Revealing` drops the running
/// countdown.
#[derive(Debug)]
pub struct HintDisclosure {
    phase: HintPhase,
    catalog: HintCatalog,
    selected: Option<usize>,
    level: usize,
    answer: String,
    countdown: Option<Countdown>,
    next_token: u64,
    base_delay: Duration,
    tick: Duration,
}

impl HintDisclosure {
    /// Create a closed disclosure.
    pub fn new(base_delay: Duration, tick: Duration) -> Self {
        Self {
            phase: HintPhase::Closed,
            catalog: HintCatalog::default(),
            selected: None,
            level: 0,
            answer: String::new(),
            countdown: None,
            next_token: 0,
            base_delay,
            tick,
        }
    }

    /// Create a closed disclosure with the delays from `config`.
    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.hint_base_delay, config.hint_tick)
    }

    /// Load the catalog for `location` and show the question list.
    ///
    /// Always resets to `Listing`, whatever the previous phase.
    pub fn open(&mut self, location: &str, source: &impl HintSource) {
        self.reset_selection();
        self.catalog = HintCatalog::parse(location, &source.hints_for_location(location));
        self.phase = HintPhase::Listing;
        debug!(location, questions = self.catalog.len(), "hint catalog opened");
    }

    /// Show level 0 of the question at `position` and start the countdown.
    ///
    /// Only accepted from `Listing`; a shown question is left with
    /// [`back`](Self::back) first. Returns false otherwise, or when no
    /// question sits at `position`.
    pub fn select(
        &mut self,
        position: usize,
        source: &impl HintSource,
        ledger: &mut HintLedger,
    ) -> bool {
        if self.phase != HintPhase::Listing {
            debug!(phase = %self.phase, position, "hint selection outside the question list");
            return false;
        }
        let Some(entry) = self.catalog.get(position).cloned() else {
            warn!(position, available = self.catalog.len(), "no hint question at position");
            return false;
        };
        self.selected = Some(position);
        self.level = 0;
        self.answer = answer_for(&entry, 0, source);
        self.start_countdown(entry.index, 0, ledger);
        true
    }

    /// Reveal the next level once the countdown elapsed.
    ///
    /// Returns true if a new level is shown. From `Ready` with no stronger
    /// answer left, moves to `Exhausted` and returns false. Ignored in any
    /// other phase.
    pub fn reveal_next(&mut self, source: &impl HintSource, ledger: &mut HintLedger) -> bool {
        if self.phase != HintPhase::Ready {
            return false;
        }
        let Some(entry) = self.selected_entry().cloned() else {
            return false;
        };
        let next = self.level + 1;
        if next < entry.question.answers.len() {
            self.level = next;
            self.answer = answer_for(&entry, next, source);
            self.start_countdown(entry.index, next, ledger);
            true
        } else {
            self.countdown = None;
            self.phase = HintPhase::Exhausted;
            false
        }
    }

    /// Return to the question list, cancelling any countdown.
    pub fn back(&mut self) {
        if self.phase == HintPhase::Closed {
            return;
        }
        self.reset_selection();
        self.phase = HintPhase::Listing;
    }

    /// Close the disclosure, cancelling any countdown.
    pub fn close(&mut self) {
        self.reset_selection();
        self.catalog = HintCatalog::default();
        self.phase = HintPhase::Closed;
    }

    /// Advance the running countdown by one tick. Returns true when this
    /// tick made the next level available.
    pub fn tick(&mut self) -> bool {
        match self.timer_token() {
            Some(token) => self.on_tick(token),
            None => false,
        }
    }

    /// Advance the running countdown by one tick if `token` belongs to it.
    /// Ticks from cancelled countdowns are ignored.
    pub fn on_tick(&mut self, token: TimerToken) -> bool {
        let finished = match self.countdown.as_mut() {
            Some(c) if c.token() == token => c.tick(),
            _ => return false,
        };
        self.finish_if(finished)
    }

    /// Advance the running countdown by wall-clock time.
    pub fn advance(&mut self, dt: Duration) -> bool {
        let finished = match self.countdown.as_mut() {
            Some(c) => c.advance(dt),
            None => return false,
        };
        self.finish_if(finished)
    }

    fn finish_if(&mut self, finished: bool) -> bool {
        if finished && self.phase == HintPhase::Revealing {
            self.countdown = None;
            self.phase = HintPhase::Ready;
            return true;
        }
        false
    }

    fn start_countdown(&mut self, question: usize, level: usize, ledger: &mut HintLedger) {
        // Length uses the count before this view is recorded.
        let total = ledger.next_delay(self.base_delay);
        let fresh = ledger.record(question, level);
        self.next_token += 1;
        let token = TimerToken(self.next_token);
        self.countdown = Some(Countdown::new(token, total, self.tick));
        self.phase = HintPhase::Revealing;
        debug!(
            question,
            level,
            fresh,
            shown = ledger.shown(),
            millis = total.as_millis() as u64,
            "hint countdown started"
        );
    }

    fn reset_selection(&mut self) {
        self.countdown = None;
        self.selected = None;
        self.level = 0;
        self.answer.clear();
    }

    fn selected_entry(&self) -> Option<&CatalogEntry> {
        self.selected.and_then(|p| self.catalog.get(p))
    }

    /// Current phase.
    pub fn phase(&self) -> HintPhase {
        self.phase
    }

    /// Whether the disclosure is showing.
    pub fn is_open(&self) -> bool {
        self.phase != HintPhase::Closed
    }

    /// The loaded catalog.
    pub fn catalog(&self) -> &HintCatalog {
        &self.catalog
    }

    /// The running countdown, if any.
    pub fn countdown(&self) -> Option<&Countdown> {
        self.countdown.as_ref()
    }

    /// Token of the running countdown, for hosts that schedule ticks.
    pub fn timer_token(&self) -> Option<TimerToken> {
        self.countdown.as_ref().map(Countdown::token)
    }

    /// Current level.
    pub fn level(&self) -> usize {
        self.level
    }

    /// The answer currently shown.
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Snapshot for presentation.
    pub fn view(&self) -> HintView {
        let entry = self.selected_entry();
        let levels = entry.map_or(0, |e| e.question.answers.len());
        HintView {
            phase: self.phase,
            location: self.catalog.location().to_string(),
            questions: self
                .catalog
                .entries()
                .iter()
                .map(|e| e.question.question.clone())
                .collect(),
            question: entry.map(|e| e.question.question.clone()),
            level: self.level,
            levels,
            answer: self.answer.clone(),
            has_next_level: entry.is_some() && self.level + 1 < levels,
            remaining_fraction: self
                .countdown
                .as_ref()
                .map_or(0.0, Countdown::remaining_fraction),
            remaining_secs: self.countdown.as_ref().map(Countdown::remaining_secs),
        }
    }
}

/// Answer text from the engine, falling back to the catalog, then to "".
fn answer_for(entry: &CatalogEntry, level: usize, source: &impl HintSource) -> String {
    source
        .hint_answer(entry.index, level)
        .filter(|a| !a.is_empty())
        .or_else(|| entry.question.answers.get(level).cloned())
        .unwrap_or_default()
}
