//! Countdown state snapshot and its display helpers

use serde::{Deserialize, Serialize};

/// Countdown state for the active goal
///
/// `remaining_seconds` never exceeds `duration_seconds`, and `running` is
/// only true while the engine owns a tick source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub duration_seconds: u64,
    pub remaining_seconds: u64,
    pub running: bool,
}

impl TimerState {
    /// Create a stopped timer with the full duration remaining
    pub fn new(duration_seconds: u64) -> Self {
        Self {
            duration_seconds,
            remaining_seconds: duration_seconds,
            running: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Remaining time as zero-padded `MM:SS`
    pub fn display(&self) -> String {
        let minutes = self.remaining_seconds / 60;
        let seconds = self.remaining_seconds % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }

    /// Elapsed fraction of the goal, in `[0, 1]`
    pub fn progress(&self) -> f64 {
        if self.duration_seconds == 0 {
            return 0.0;
        }
        let elapsed = self.duration_seconds - self.remaining_seconds;
        elapsed as f64 / self.duration_seconds as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_timer_is_stopped_and_full() {
        let timer = TimerState::new(1500);
        assert_eq!(timer.remaining_seconds, 1500);
        assert!(!timer.is_running());
        assert_eq!(timer.display(), "25:00");
        assert_eq!(timer.progress(), 0.0);
    }

    #[test]
    fn display_pads_minutes_and_seconds() {
        let mut timer = TimerState::new(3000);
        timer.remaining_seconds = 65;
        assert_eq!(timer.display(), "01:05");
        timer.remaining_seconds = 0;
        assert_eq!(timer.display(), "00:00");
    }

    #[test]
    fn progress_reaches_one_at_zero() {
        let mut timer = TimerState::new(300);
        timer.remaining_seconds = 150;
        assert_eq!(timer.progress(), 0.5);
        timer.remaining_seconds = 0;
        assert_eq!(timer.progress(), 1.0);
    }
}
