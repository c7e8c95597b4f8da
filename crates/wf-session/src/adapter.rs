//! A fault-tolerant handle to the narrative engine.

use tracing::{debug, warn};
use wf_core::{Engine, EngineError, EngineResult, UpdateRecord};

use crate::hint::HintSource;

/// Wraps an optional [`Engine`].
///
/// Until an engine is attached, or when creating one failed, every call
/// returns a neutral value instead of failing: `false`, `""`, `"[]"`,
/// `None`, or [`EngineError::NotInitialized`].
#[derive(Debug)]
pub struct EngineAdapter<E> {
    engine: Option<E>,
}

impl<E> Default for EngineAdapter<E> {
    fn default() -> Self {
        Self { engine: None }
    }
}

impl<E: Engine> EngineAdapter<E> {
    /// An adapter with no engine.
    pub fn uninitialized() -> Self {
        Self::default()
    }

    /// An adapter around an existing engine.
    pub fn attach(engine: E) -> Self {
        Self {
            engine: Some(engine),
        }
    }

    /// Create the engine with `factory`.
    ///
    /// On failure the error is logged and returned, and the adapter stays
    /// uninitialized.
    pub fn connect<F>(factory: F) -> (Self, EngineResult<()>)
    where
        F: FnOnce() -> EngineResult<E>,
    {
        match factory() {
            Ok(engine) => {
                debug!("engine connected");
                (Self::attach(engine), Ok(()))
            }
            Err(e) => {
                warn!(error = %e, "engine creation failed");
                (Self::uninitialized(), Err(e))
            }
        }
    }

    /// Whether an engine is attached.
    pub fn is_ready(&self) -> bool {
        self.engine.is_some()
    }

    /// The attached engine.
    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    /// Detach and return the engine.
    pub fn take(&mut self) -> Option<E> {
        self.engine.take()
    }

    pub(crate) fn feed(&mut self, input: &str) {
        if let Some(engine) = self.engine.as_mut() {
            engine.feed(input);
        }
    }

    pub(crate) fn step(&mut self) -> bool {
        self.engine.as_mut().is_some_and(|e| e.step())
    }

    pub(crate) fn updates(&mut self) -> UpdateRecord {
        self.engine
            .as_mut()
            .map(|e| e.updates())
            .unwrap_or_default()
    }

    pub(crate) fn location(&self) -> String {
        self.engine.as_ref().map(|e| e.location()).unwrap_or_default()
    }

    pub(crate) fn undo(&mut self) -> bool {
        self.engine.as_mut().is_some_and(|e| e.undo())
    }

    pub(crate) fn redo(&mut self) -> bool {
        self.engine.as_mut().is_some_and(|e| e.redo())
    }

    pub(crate) fn save(&mut self) -> Option<String> {
        self.engine.as_mut().and_then(|e| e.save())
    }

    pub(crate) fn restore(&mut self, payload: &str) -> EngineResult<()> {
        match self.engine.as_mut() {
            Some(engine) => engine.restore(payload),
            None => Err(EngineError::NotInitialized),
        }
    }
}

impl<E: Engine> HintSource for EngineAdapter<E> {
    fn hints_for_location(&self, location: &str) -> String {
        self.engine
            .as_ref()
            .map_or_else(|| "[]".to_string(), |e| e.hints_for_location(location))
    }

    fn hint_answer(&self, index: usize, level: usize) -> Option<String> {
        self.engine.as_ref().and_then(|e| e.hint_answer(index, level))
    }
}
