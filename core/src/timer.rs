use serde::{Deserialize, Serialize};

/// Highest value the elapsed counter can show.
pub const MAX_ELAPSED_SECS: u16 = 999;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerState {
    #[default]
    Idle,
    Running,
    Stopped,
}

/// Elapsed-seconds counter advanced by an external once-per-second tick.
///
/// `Idle -> Running -> Stopped`, a stopped timer never runs again.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    state: TimerState,
    elapsed_secs: u16,
}

impl Timer {
    pub const fn new() -> Self {
        Self {
            state: TimerState::Idle,
            elapsed_secs: 0,
        }
    }

    pub const fn state(&self) -> TimerState {
        self.state
    }

    pub const fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running)
    }

    pub const fn elapsed_secs(&self) -> u16 {
        self.elapsed_secs
    }

    /// Returns whether the timer actually started.
    pub fn start(&mut self) -> bool {
        if matches!(self.state, TimerState::Idle) {
            self.state = TimerState::Running;
            true
        } else {
            false
        }
    }

    /// Returns whether the displayed value changed.
    pub fn tick(&mut self) -> bool {
        if !self.is_running() || self.elapsed_secs >= MAX_ELAPSED_SECS {
            return false;
        }
        self.elapsed_secs += 1;
        true
    }

    pub fn stop(&mut self) {
        if self.is_running() {
            log::trace!("timer stopped at {}s", self.elapsed_secs);
        }
        self.state = TimerState::Stopped;
    }
}
