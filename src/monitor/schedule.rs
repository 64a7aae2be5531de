// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Poll interval state machine.

use std::time::Duration;

/// Shortest delay between cycles, and the value after every success.
pub const MIN_DELAY_SECS: u64 = 5;
/// Longest delay while fetches keep failing.
pub const MAX_DELAY_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// Last cycle succeeded.
    Steady,
    /// Last cycle failed; the delay grows by 1.5x (rounded up) per failure.
    Backoff,
}

#[derive(Debug, Clone)]
pub struct PollSchedule {
    state: PollState,
    delay_secs: u64,
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self {
            state: PollState::Steady,
            delay_secs: MIN_DELAY_SECS,
        }
    }
}

impl PollSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Successful cycle: back to steady polling at the floor.
    pub fn on_success(&mut self) -> Duration {
        self.state = PollState::Steady;
        self.delay_secs = MIN_DELAY_SECS;
        self.delay()
    }

    /// Failed cycle: `ceil(delay * 1.5)`, clamped to the floor/ceiling.
    pub fn on_failure(&mut self) -> Duration {
        self.state = PollState::Backoff;
        let grown = (self.delay_secs * 3).div_ceil(2);
        self.delay_secs = grown.clamp(MIN_DELAY_SECS, MAX_DELAY_SECS);
        self.delay()
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn delay_secs(&self) -> u64 {
        self.delay_secs
    }

    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }
}
