//! Session-wide record of which hint answers were shown.

use std::collections::BTreeSet;
use std::time::Duration;

/// Which (question, level) pairs the player has seen, and how many.
///
/// The count only grows, and grows at most once per pair. It spans the
/// whole play session, not one question or one opening of the catalog.
#[derive(Debug, Clone, Default)]
pub struct HintLedger {
    revealed: BTreeSet<(usize, usize)>,
    shown: u32,
}

impl HintLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a shown answer. Returns true if the pair was new.
    pub fn record(&mut self, question: usize, level: usize) -> bool {
        let fresh = self.revealed.insert((question, level));
        if fresh {
            self.shown = self.shown.saturating_add(1);
        }
        fresh
    }

    /// Whether a pair was already shown.
    pub fn has_seen(&self, question: usize, level: usize) -> bool {
        self.revealed.contains(&(question, level))
    }

    /// Distinct answers shown so far.
    pub fn shown(&self) -> u32 {
        self.shown
    }

    /// Countdown length for the next answer: `base * 2^shown`, saturating.
    pub fn next_delay(&self, base: Duration) -> Duration {
        base.saturating_mul(2u32.saturating_pow(self.shown))
    }
}
