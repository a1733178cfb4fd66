//! Quote countdown
//!
//! Counts down once per tick while `Active`. Locking resets the countdown
//! once and stops it; `Expired` is final.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Countdown state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Active,
    Locked,
    Expired,
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Locked => write!(f, "Locked"),
            Self::Expired => write!(f, "Expired"),
        }
    }
}

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still counting; seconds left
    Counting(u32),
    /// This tick ran the countdown out
    Expired,
    /// Locked or already expired; nothing changed
    Idle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteTimer {
    ttl_seconds: u32,
    remaining: u32,
    state: TimerState,
}

impl QuoteTimer {
    /// Start an active countdown
    pub fn new(ttl_seconds: u32) -> Self {
        Self {
            ttl_seconds,
            remaining: ttl_seconds,
            state: TimerState::Active,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Advance the countdown by one second
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != TimerState::Active {
            return TickOutcome::Idle;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.state = TimerState::Expired;
            TickOutcome::Expired
        } else {
            TickOutcome::Counting(self.remaining)
        }
    }

    /// Lock the countdown, resetting it to the full ttl
    ///
    /// Only an active timer can be locked. Returns whether anything changed.
    pub fn lock(&mut self) -> bool {
        if self.state != TimerState::Active {
            return false;
        }
        self.state = TimerState::Locked;
        self.remaining = self.ttl_seconds;
        true
    }
}
