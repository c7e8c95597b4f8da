//! Host-driven countdown gating the next hint level.

use std::time::Duration;

/// Identifies one started countdown.
///
/// A host that schedules ticks itself hands the token back with every tick;
/// ticks carrying the token of a cancelled countdown are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(pub u64);

/// A countdown advanced in fixed ticks.
///
/// Its total length is fixed when it is created.
#[derive(Debug, Clone)]
pub struct Countdown {
    token: TimerToken,
    total: Duration,
    elapsed: Duration,
    tick: Duration,
    carry: Duration,
}

impl Countdown {
    /// Create a countdown of `total` length advancing by `tick` per tick.
    pub fn new(token: TimerToken, total: Duration, tick: Duration) -> Self {
        Self {
            token,
            total,
            elapsed: Duration::ZERO,
            tick,
            carry: Duration::ZERO,
        }
    }

    /// Advance by one tick. Returns whether the countdown has elapsed.
    pub fn tick(&mut self) -> bool {
        if !self.is_finished() {
            self.elapsed = self.elapsed.saturating_add(self.tick);
        }
        self.is_finished()
    }

    /// Advance by wall-clock time, in whole ticks. The remainder carries
    /// over to the next call.
    pub fn advance(&mut self, dt: Duration) -> bool {
        self.carry = self.carry.saturating_add(dt);
        while self.carry >= self.tick && !self.is_finished() {
            self.carry -= self.tick;
            self.tick();
        }
        self.is_finished()
    }

    /// Whether the full length has elapsed.
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.total
    }

    /// The token this countdown was started with.
    pub fn token(&self) -> TimerToken {
        self.token
    }

    /// Total length.
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Time elapsed so far.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Time left.
    pub fn remaining(&self) -> Duration {
        self.total.saturating_sub(self.elapsed)
    }

    /// Fraction of the length left, from 1.0 down to 0.0.
    pub fn remaining_fraction(&self) -> f64 {
        if self.total.is_zero() {
            return 0.0;
        }
        (self.remaining().as_secs_f64() / self.total.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Whole seconds left, rounded up.
    pub fn remaining_secs(&self) -> u64 {
        self.remaining().as_millis().div_ceil(1000) as u64
    }
}
