//! Focus sessions: the destination the user is working on right now.

mod monitor;
mod sampler;

pub use monitor::{MonitorSettings, SessionMonitor};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// The session currently being timed.
#[derive(Debug, Clone)]
pub(crate) struct ActiveSession {
    pub(crate) destination: String,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) generation: u64,
    /// Monotonic start used for elapsed time; wall clock is display only.
    start: Instant,
}

impl ActiveSession {
    pub(crate) fn start(destination: String, generation: u64) -> Self {
        Self {
            destination,
            started_at: Utc::now(),
            generation,
            start: Instant::now(),
        }
    }

    /// Whole seconds since the session opened, rounded down.
    pub(crate) fn elapsed_secs(&self) -> u64 {
        self.start.elapsed().as_secs()
    }

    pub(crate) fn info(&self) -> SessionInfo {
        SessionInfo {
            destination: self.destination.clone(),
            started_at: self.started_at,
            elapsed_secs: self.elapsed_secs(),
        }
    }
}

/// Read-only view of the active session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub destination: String,
    pub started_at: DateTime<Utc>,
    pub elapsed_secs: u64,
}
