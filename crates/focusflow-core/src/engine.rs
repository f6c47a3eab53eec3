//! Engine facade.
//!
//! [`FocusFlow`] wires the components together and exposes the operations a
//! presentation layer calls. Each piece of shared state has its own lock and
//! a single writer path; nothing here holds two locks at once.

use std::sync::{Arc, RwLock};

use tokio::sync::broadcast;
use tokio::time::Duration;

use crate::classifier::Classifier;
use crate::coach::{Coach, CoachListener, RandomPicker, Suggestion, TemplatePicker};
use crate::config::{Config, MAX_PERIOD_SECS};
use crate::error::Result;
use crate::events::{Event, EventBus};
use crate::history::{CategoryTotals, HistoryAggregator, HistoryEntry, HistorySummary};
use crate::locks::{read_lock, write_lock};
use crate::notes::{GlobalSummary, Note, NoteId, NoteRepository};
use crate::opener::{DestinationOpener, SystemOpener};
use crate::session::{MonitorSettings, SessionInfo, SessionMonitor};
use crate::tasks::{Task, TaskId, TaskStore};
use crate::timer::{TimerController, TimerSnapshot, TimerStatus};

pub struct FocusFlow {
    config: Config,
    classifier: Arc<Classifier>,
    tasks: Arc<RwLock<TaskStore>>,
    notes: RwLock<NoteRepository>,
    history: Arc<RwLock<HistoryAggregator>>,
    coach: Arc<RwLock<Coach>>,
    bus: EventBus,
    timer: TimerController,
    monitor: SessionMonitor,
}

impl FocusFlow {
    /// Engine using the system viewer and random tip selection.
    pub fn new(config: Config) -> Self {
        Self::with_collaborators(config, Arc::new(SystemOpener), Arc::new(RandomPicker))
    }

    pub fn with_collaborators(
        config: Config,
        opener: Arc<dyn DestinationOpener>,
        picker: Arc<dyn TemplatePicker>,
    ) -> Self {
        let bus = EventBus::new();
        let classifier = Arc::new(Classifier::from_config(&config.classifier));
        let tasks = Arc::new(RwLock::new(TaskStore::new()));
        let history = Arc::new(RwLock::new(HistoryAggregator::new(classifier.clone())));
        let coach = Arc::new(RwLock::new(Coach::new(picker)));

        bus.add_listener(Arc::new(CoachListener::new(coach.clone(), tasks.clone())));

        let timer = TimerController::new(
            bus.clone(),
            period(config.timer.tick_secs),
            config.timer.refresh_every_ticks,
        );
        let monitor = SessionMonitor::new(
            classifier.clone(),
            history.clone(),
            opener,
            bus.clone(),
            timer.subscribe_status(),
            MonitorSettings {
                poll_interval: period(config.monitor.poll_secs),
                default_destination: config.monitor.default_destination.clone(),
                open_in_viewer: config.monitor.open_in_viewer,
            },
        );

        Self {
            config,
            classifier,
            tasks,
            notes: RwLock::new(NoteRepository::new()),
            history,
            coach,
            bus,
            timer,
            monitor,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Every event the engine publishes from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn add_task(&self, title: &str, priority: u8) -> Result<Task> {
        let task = write_lock(&self.tasks).add_task(title, priority)?;
        self.refresh_suggestion();
        Ok(task)
    }

    pub fn remove_task(&self, id: TaskId) -> Option<Task> {
        let removed = write_lock(&self.tasks).remove_task(id);
        self.refresh_suggestion();
        removed
    }

    /// Finished tasks leave the list the same way removed ones do.
    pub fn complete_task(&self, id: TaskId) -> Option<Task> {
        let done = self.remove_task(id);
        if let Some(task) = &done {
            tracing::info!("task completed: {}", task.title);
        }
        done
    }

    pub fn tasks(&self) -> Vec<Task> {
        read_lock(&self.tasks).list().to_vec()
    }

    // ── Timer ────────────────────────────────────────────────────────

    /// Start, pause or resume the focus timer. Stopping it also ends the
    /// session sampler; starting it resumes sampling of an open session.
    pub async fn start_pause_timer(&self) -> TimerSnapshot {
        let snapshot = self.timer.toggle().await;
        if snapshot.status == TimerStatus::Running {
            self.monitor.resume_sampling().await;
        } else {
            self.monitor.stop_sampling().await;
        }
        snapshot
    }

    pub async fn reset_timer(&self) -> TimerSnapshot {
        let snapshot = self.timer.reset().await;
        self.monitor.stop_sampling().await;
        snapshot
    }

    pub fn timer(&self) -> TimerSnapshot {
        self.timer.snapshot()
    }

    // ── Focus sessions ───────────────────────────────────────────────

    /// Close the current session (if any) and open one on `destination`.
    /// Returns the entry recorded for the closed session.
    pub async fn open_focus_session(&self, destination: &str) -> Option<HistoryEntry> {
        self.monitor.open_session(destination).await
    }

    pub async fn close_focus_session(&self) -> Option<HistoryEntry> {
        self.monitor.close_session().await
    }

    pub fn active_session(&self) -> Option<SessionInfo> {
        self.monitor.active()
    }

    // ── History ──────────────────────────────────────────────────────

    pub fn history_summary(&self) -> HistorySummary {
        read_lock(&self.history).summarize()
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        read_lock(&self.history).entries().to_vec()
    }

    pub fn category_totals(&self) -> CategoryTotals {
        read_lock(&self.history).totals().clone()
    }

    // ── Notes ────────────────────────────────────────────────────────

    pub fn add_note(&self, text: &str, tags: &str) -> Result<Note> {
        write_lock(&self.notes).add_note(text, tags)
    }

    pub fn remove_note(&self, id: NoteId) -> Option<Note> {
        write_lock(&self.notes).remove_note(id)
    }

    pub fn notes(&self) -> Vec<Note> {
        read_lock(&self.notes).list().to_vec()
    }

    pub fn global_summary(&self) -> GlobalSummary {
        read_lock(&self.notes).global_summary()
    }

    // ── Coaching ─────────────────────────────────────────────────────

    pub fn suggestion(&self) -> String {
        self.current_suggestion().to_string()
    }

    pub fn current_suggestion(&self) -> Suggestion {
        read_lock(&self.coach).current().clone()
    }

    /// Stop background activity: close the open session and pause the timer.
    pub async fn shutdown(&self) {
        self.monitor.close_session().await;
        if self.timer.status() == TimerStatus::Running {
            self.timer.toggle().await;
        }
    }

    fn refresh_suggestion(&self) {
        let tasks = self.tasks();
        write_lock(&self.coach).refresh(&tasks);
    }
}

/// Configs built in code skip `Config::validate`, so periods are clamped here.
fn period(secs: u64) -> Duration {
    Duration::from_secs(secs.clamp(1, MAX_PERIOD_SECS))
}
