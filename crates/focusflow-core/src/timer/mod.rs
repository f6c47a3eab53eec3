mod controller;
mod state;

pub use controller::{TimerController, TimerSnapshot};
pub use state::{format_elapsed, FocusTimer, Tick, TimerStatus};
