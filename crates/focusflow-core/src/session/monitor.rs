use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, RwLock,
};

use chrono::Utc;
use tokio::{
    sync::{watch, Mutex},
    time::Duration,
};
use tracing::info;

use crate::classifier::Classifier;
use crate::events::{Event, EventBus};
use crate::history::{HistoryAggregator, HistoryEntry};
use crate::locks::{read_lock, write_lock};
use crate::opener::{open_quietly, DestinationOpener};
use crate::timer::TimerStatus;

use super::sampler::{self, Sampler, SamplerContext};
use super::{ActiveSession, SessionInfo};

/// Tunables for [`SessionMonitor`].
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub poll_interval: Duration,
    pub default_destination: String,
    pub open_in_viewer: bool,
}

/// Owns the active focus session and its sampler.
///
/// Opening a session always closes the previous one first, so at most one
/// session and one sampler exist at a time. Closing records a history entry.
#[derive(Clone)]
pub struct SessionMonitor {
    active: Arc<RwLock<Option<ActiveSession>>>,
    sampler: Arc<Mutex<Option<Sampler>>>,
    next_generation: Arc<AtomicU64>,
    classifier: Arc<Classifier>,
    history: Arc<RwLock<HistoryAggregator>>,
    opener: Arc<dyn DestinationOpener>,
    bus: EventBus,
    timer_status: watch::Receiver<TimerStatus>,
    settings: MonitorSettings,
}

impl SessionMonitor {
    pub fn new(
        classifier: Arc<Classifier>,
        history: Arc<RwLock<HistoryAggregator>>,
        opener: Arc<dyn DestinationOpener>,
        bus: EventBus,
        timer_status: watch::Receiver<TimerStatus>,
        settings: MonitorSettings,
    ) -> Self {
        Self {
            active: Arc::new(RwLock::new(None)),
            sampler: Arc::new(Mutex::new(None)),
            next_generation: Arc::new(AtomicU64::new(1)),
            classifier,
            history,
            opener,
            bus,
            timer_status,
            settings,
        }
    }

    pub fn active(&self) -> Option<SessionInfo> {
        read_lock(&self.active).as_ref().map(ActiveSession::info)
    }

    /// Close any active session, then start one on `destination`.
    ///
    /// Returns the history entry of the session that was closed, if any. A
    /// blank destination falls back to the configured default.
    pub async fn open_session(&self, destination: &str) -> Option<HistoryEntry> {
        let mut sampler = self.sampler.lock().await;
        if let Some(running) = sampler.take() {
            running.stop().await;
        }

        let closed = self.close_active();

        let destination = match destination.trim() {
            "" => self.settings.default_destination.clone(),
            trimmed => trimmed.to_string(),
        };
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let session = ActiveSession::start(destination, generation);
        *write_lock(&self.active) = Some(session.clone());
        info!("focus session {generation} opened on {}", session.destination);

        if self.settings.open_in_viewer {
            open_quietly(self.opener.as_ref(), &session.destination);
        }

        self.bus.publish(Event::SessionOpened {
            destination: session.destination.clone(),
            at: session.started_at,
        });

        if *self.timer_status.borrow() == TimerStatus::Running {
            *sampler = Some(self.spawn_sampler(&session));
        }

        closed
    }

    /// Close the active session, if any, and record it.
    pub async fn close_session(&self) -> Option<HistoryEntry> {
        let mut sampler = self.sampler.lock().await;
        if let Some(running) = sampler.take() {
            running.stop().await;
        }
        self.close_active()
    }

    /// Start polling the active session if nothing is polling it. Called when
    /// the timer starts running again.
    pub async fn resume_sampling(&self) {
        let mut sampler = self.sampler.lock().await;
        if *self.timer_status.borrow() != TimerStatus::Running {
            return;
        }
        let Some(session) = read_lock(&self.active).clone() else {
            return;
        };

        let current = sampler
            .as_ref()
            .is_some_and(|s| s.generation == session.generation && !s.is_finished());
        if current {
            return;
        }
        if let Some(stale) = sampler.take() {
            stale.stop().await;
        }
        *sampler = Some(self.spawn_sampler(&session));
    }

    /// Stop polling without closing the session. Used when the timer stops.
    pub async fn stop_sampling(&self) {
        if let Some(running) = self.sampler.lock().await.take() {
            running.stop().await;
        }
    }

    pub async fn is_sampling(&self) -> bool {
        self.sampler
            .lock()
            .await
            .as_ref()
            .is_some_and(|s| !s.is_finished())
    }

    fn spawn_sampler(&self, session: &ActiveSession) -> Sampler {
        sampler::spawn(
            session,
            SamplerContext {
                active: self.active.clone(),
                classifier: self.classifier.clone(),
                bus: self.bus.clone(),
                timer_status: self.timer_status.clone(),
                period: self.settings.poll_interval,
            },
        )
    }

    fn close_active(&self) -> Option<HistoryEntry> {
        let session = write_lock(&self.active).take()?;
        let entry = HistoryEntry {
            destination: session.destination.clone(),
            time_spent_secs: session.elapsed_secs(),
            ended_at: Utc::now(),
        };
        info!(
            "focus session {} closed after {}s on {}",
            session.generation, entry.time_spent_secs, entry.destination
        );

        write_lock(&self.history).record_entry(entry.clone());
        self.bus.publish(Event::SessionClosed {
            entry: entry.clone(),
        });
        Some(entry)
    }
}
