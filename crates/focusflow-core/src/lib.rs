//! # FocusFlow Core Library
//!
//! Session tracking and aggregation engine for the FocusFlow focus coach.
//! The CLI is a thin layer over this crate; every operation a user can
//! perform is available on [`FocusFlow`].
//!
//! ## Architecture
//!
//! - **Focus Timer**: start/pause/reset stopwatch driven by a background
//!   ticker task
//! - **Session Monitor**: tracks the destination being worked on, samples it
//!   for distractions while the timer runs, and records history on close
//! - **History**: per-category rollups of finished sessions
//! - **Notes**: tagged notes with truncated summaries
//! - **Coach**: tips derived from the task list, overridden by distraction
//!   warnings
//!
//! ## Key Components
//!
//! - [`FocusFlow`]: boundary facade
//! - [`TimerController`]: focus timer with its ticker
//! - [`SessionMonitor`]: active session and sampler
//! - [`Classifier`]: destination categories and distraction list
//! - [`Config`]: engine configuration

pub mod classifier;
pub mod coach;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod history;
mod locks;
pub mod notes;
pub mod opener;
pub mod session;
pub mod tasks;
pub mod timer;

pub use classifier::{Classification, Classifier, OTHER_CATEGORY};
pub use coach::{
    suggest, Coach, CyclingPicker, FixedPicker, RandomPicker, Suggestion, TemplatePicker,
};
pub use config::Config;
pub use engine::FocusFlow;
pub use error::{ConfigError, CoreError, Result, ValidationError};
pub use events::{Event, EventBus, EventListener};
pub use history::{CategoryTotals, HistoryAggregator, HistoryEntry, HistorySummary};
pub use notes::{summarize_note, GlobalSummary, Note, NoteId, NoteRepository, TagGroup};
pub use opener::{DestinationOpener, NoopOpener, SystemOpener};
pub use session::{MonitorSettings, SessionInfo, SessionMonitor};
pub use tasks::{Priority, Task, TaskId, TaskStore};
pub use timer::{FocusTimer, TimerController, TimerSnapshot, TimerStatus};
