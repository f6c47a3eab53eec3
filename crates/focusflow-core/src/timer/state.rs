//! Focus timer state machine.
//!
//! A plain stopwatch with no internal thread. The controller calls `tick()`
//! once per period while the timer is running.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --toggle--> Running --toggle--> Paused --toggle--> Running
//!   ^                 |                   |
//!   +------reset------+-------reset-------+
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    #[default]
    Idle,
    Running,
    Paused,
}

impl std::fmt::Display for TimerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TimerStatus::Idle => "idle",
            TimerStatus::Running => "running",
            TimerStatus::Paused => "paused",
        };
        f.write_str(name)
    }
}

/// Outcome of a tick taken while running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub elapsed_secs: u64,
    /// True on every `refresh_every`-th second.
    pub refresh_due: bool,
}

/// Process-wide focus stopwatch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusTimer {
    status: TimerStatus,
    elapsed_secs: u64,
}

impl FocusTimer {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start, pause or resume depending on the current state.
    pub fn toggle(&mut self) -> Event {
        let at = Utc::now();
        match self.status {
            TimerStatus::Idle => {
                self.status = TimerStatus::Running;
                Event::TimerStarted { at }
            }
            TimerStatus::Running => {
                self.status = TimerStatus::Paused;
                Event::TimerPaused {
                    elapsed_secs: self.elapsed_secs,
                    at,
                }
            }
            TimerStatus::Paused => {
                self.status = TimerStatus::Running;
                Event::TimerResumed {
                    elapsed_secs: self.elapsed_secs,
                    at,
                }
            }
        }
    }

    /// Back to `Idle` with zero elapsed, from any state.
    pub fn reset(&mut self) -> Event {
        self.status = TimerStatus::Idle;
        self.elapsed_secs = 0;
        Event::TimerReset { at: Utc::now() }
    }

    /// Advance by one second. Does nothing unless running.
    pub fn tick(&mut self, refresh_every: u64) -> Option<Tick> {
        if self.status != TimerStatus::Running {
            return None;
        }
        self.elapsed_secs += 1;
        Some(Tick {
            elapsed_secs: self.elapsed_secs,
            refresh_due: refresh_every > 0 && self.elapsed_secs % refresh_every == 0,
        })
    }
}

pub fn format_elapsed(elapsed_secs: u64) -> String {
    let (mins, secs) = (elapsed_secs / 60, elapsed_secs % 60);
    format!("{mins:02}:{secs:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_cycles_through_states() {
        let mut timer = FocusTimer::new();
        assert_eq!(timer.status(), TimerStatus::Idle);

        assert!(matches!(timer.toggle(), Event::TimerStarted { .. }));
        assert_eq!(timer.status(), TimerStatus::Running);

        assert!(matches!(timer.toggle(), Event::TimerPaused { .. }));
        assert_eq!(timer.status(), TimerStatus::Paused);

        assert!(matches!(timer.toggle(), Event::TimerResumed { .. }));
        assert_eq!(timer.status(), TimerStatus::Running);
    }

    #[test]
    fn ticks_only_count_while_running() {
        let mut timer = FocusTimer::new();
        assert_eq!(timer.tick(60), None);

        timer.toggle();
        for _ in 0..5 {
            timer.tick(60);
        }
        assert_eq!(timer.elapsed_secs(), 5);

        timer.toggle();
        assert_eq!(timer.tick(60), None);
        assert_eq!(timer.elapsed_secs(), 5);

        timer.toggle();
        assert_eq!(
            timer.tick(60),
            Some(Tick {
                elapsed_secs: 6,
                refresh_due: false
            })
        );
    }

    #[test]
    fn refresh_is_due_every_sixtieth_second() {
        let mut timer = FocusTimer::new();
        timer.toggle();
        let due: Vec<u64> = (0..150)
            .filter_map(|_| timer.tick(60))
            .filter(|t| t.refresh_due)
            .map(|t| t.elapsed_secs)
            .collect();
        assert_eq!(due, [60, 120]);
    }

    #[test]
    fn reset_from_any_state() {
        let mut timer = FocusTimer::new();
        timer.reset();
        assert_eq!((timer.status(), timer.elapsed_secs()), (TimerStatus::Idle, 0));

        timer.toggle();
        timer.tick(60);
        timer.reset();
        assert_eq!((timer.status(), timer.elapsed_secs()), (TimerStatus::Idle, 0));

        timer.toggle();
        timer.tick(60);
        timer.toggle();
        timer.reset();
        assert_eq!((timer.status(), timer.elapsed_secs()), (TimerStatus::Idle, 0));
    }

    #[test]
    fn elapsed_display_format() {
        assert_eq!(format_elapsed(0), "00:00");
        assert_eq!(format_elapsed(75), "01:15");
        assert_eq!(format_elapsed(3600), "60:00");
    }
}
