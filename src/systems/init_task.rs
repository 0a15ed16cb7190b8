//! Delayed building initialization
//!
//! The scene becomes interactive a fixed delay after startup, giving the data
//! provider time to deliver the unit directory.

use bevy::prelude::*;
use std::time::Duration;

pub const DEFAULT_INIT_DELAY: Duration = Duration::from_secs(2);

/// One-shot countdown that fires the building initialization
#[derive(Resource, Debug)]
pub struct DelayedInit {
    timer: Timer,
    state: InitState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InitState {
    Waiting,
    Fired,
    Cancelled,
}

impl DelayedInit {
    pub fn new(delay: Duration) -> Self {
        Self {
            timer: Timer::new(delay, TimerMode::Once),
            state: InitState::Waiting,
        }
    }

    /// Advance the countdown; true exactly once, on the tick it expires
    pub fn tick(&mut self, delta: Duration) -> bool {
        if self.state != InitState::Waiting {
            return false;
        }

        self.timer.tick(delta);
        if self.timer.duration().is_zero() || self.timer.finished() {
            self.state = InitState::Fired;
            return true;
        }
        false
    }

    pub fn is_pending(&self) -> bool {
        self.state == InitState::Waiting
    }

    pub fn has_fired(&self) -> bool {
        self.state == InitState::Fired
    }

    /// Cancel a pending countdown; returns true if it was still waiting
    pub fn cancel(&mut self) -> bool {
        let interrupted = self.is_pending();
        if interrupted {
            self.state = InitState::Cancelled;
        }
        interrupted
    }

    pub fn remaining(&self) -> Duration {
        self.timer.remaining()
    }
}

impl Default for DelayedInit {
    fn default() -> Self {
        Self::new(DEFAULT_INIT_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_delay() {
        let mut init = DelayedInit::default();
        assert!(!init.tick(Duration::from_millis(1500)));
        assert!(init.is_pending());
        assert!(init.tick(Duration::from_millis(600)));
        assert!(init.has_fired());
        assert!(!init.tick(Duration::from_secs(5)));
    }

    #[test]
    fn test_zero_delay_fires_on_first_tick() {
        let mut init = DelayedInit::new(Duration::ZERO);
        assert!(init.tick(Duration::ZERO));
    }

    #[test]
    fn test_cancelled_countdown_never_fires() {
        let mut init = DelayedInit::default();
        assert!(init.cancel());
        assert!(!init.cancel());
        assert!(!init.tick(Duration::from_secs(10)));
        assert!(!init.has_fired());
    }
}
