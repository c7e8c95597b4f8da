//! Timed, escalating hint disclosure.
//!
//! A hint catalog lists questions for the current location; each question
//! has answers of increasing strength. After an answer is shown, a
//! countdown must elapse before the next one can be revealed. The countdown
//! length doubles with every distinct answer the player has seen anywhere
//! in the session, which is tracked by the [`HintLedger`].

pub mod catalog;
pub mod countdown;
pub mod disclosure;
pub mod ledger;

pub use catalog::{CatalogEntry, HintCatalog, HintQuestion};
pub use countdown::{Countdown, TimerToken};
pub use disclosure::{HintDisclosure, HintPhase, HintView};
pub use ledger::HintLedger;

/// Where a disclosure reads its catalog and answers from.
pub trait HintSource {
    /// JSON array of `[index, question]` pairs for a location.
    fn hints_for_location(&self, location: &str) -> String;

    /// Answer text for a question at a level.
    fn hint_answer(&self, index: usize, level: usize) -> Option<String>;
}
