//! Configuration for a play session.

use std::time::Duration;

use crate::error::{SessionError, SessionResult};

/// Configuration for a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Maximum number of remembered commands.
    pub history_capacity: usize,
    /// Maximum `step` calls per drain before the engine is assumed idle.
    pub drain_ceiling: usize,
    /// Namespace for save slot keys (`<namespace>_<slot>`).
    pub slot_namespace: String,
    /// Key of the last-command cell.
    pub last_command_key: String,
    /// Countdown length for the first hint; doubles per hint shown.
    pub hint_base_delay: Duration,
    /// Countdown tick granularity.
    pub hint_tick: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_capacity: 100,
            drain_ceiling: 100,
            slot_namespace: "wayfarer_save".to_string(),
            last_command_key: "wayfarer_last_command".to_string(),
            hint_base_delay: Duration::from_millis(5000),
            hint_tick: Duration::from_millis(50),
        }
    }
}

impl SessionConfig {
    /// Set the history capacity.
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Set the drain iteration ceiling.
    pub fn with_drain_ceiling(mut self, ceiling: usize) -> Self {
        self.drain_ceiling = ceiling;
        self
    }

    /// Set the slot namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.slot_namespace = namespace.into();
        self
    }

    /// Set the last-command key.
    pub fn with_last_command_key(mut self, key: impl Into<String>) -> Self {
        self.last_command_key = key.into();
        self
    }

    /// Set the base hint delay.
    pub fn with_hint_base_delay(mut self, delay: Duration) -> Self {
        self.hint_base_delay = delay;
        self
    }

    /// Set the countdown tick.
    pub fn with_hint_tick(mut self, tick: Duration) -> Self {
        self.hint_tick = tick;
        self
    }

    /// Key prefix shared by every slot.
    pub fn slot_prefix(&self) -> String {
        format!("{}_", self.slot_namespace)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> SessionResult<()> {
        if self.history_capacity == 0 {
            return Err(SessionError::InvalidConfig(
                "history capacity must be at least 1".to_string(),
            ));
        }
        if self.drain_ceiling == 0 {
            return Err(SessionError::InvalidConfig(
                "drain ceiling must be at least 1".to_string(),
            ));
        }
        if self.hint_tick.is_zero() {
            return Err(SessionError::InvalidConfig(
                "hint tick must be non-zero".to_string(),
            ));
        }
        if self.slot_namespace.trim().is_empty() {
            return Err(SessionError::InvalidConfig(
                "slot namespace must not be empty".to_string(),
            ));
        }
        if self.last_command_key.starts_with(&self.slot_prefix()) {
            return Err(SessionError::InvalidConfig(format!(
                "last-command key '{}' collides with slot prefix '{}'",
                self.last_command_key,
                self.slot_prefix()
            )));
        }
        Ok(())
    }
}
