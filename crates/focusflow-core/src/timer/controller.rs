use std::sync::{Arc, RwLock};

use serde::Serialize;
use tokio::{
    sync::{watch, Mutex},
    task::JoinHandle,
    time::{self, Duration, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::events::{Event, EventBus};
use crate::locks::{read_lock, write_lock};

use super::{format_elapsed, FocusTimer, TimerStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimerSnapshot {
    pub status: TimerStatus,
    pub elapsed_secs: u64,
    pub display: String,
}

impl TimerSnapshot {
    fn of(timer: &FocusTimer) -> Self {
        Self {
            status: timer.status(),
            elapsed_secs: timer.elapsed_secs(),
            display: format_elapsed(timer.elapsed_secs()),
        }
    }
}

struct Ticker {
    handle: JoinHandle<()>,
    cancel_token: CancellationToken,
}

/// Owns the focus timer and its background ticker.
///
/// The ticker is the only writer of `elapsed_secs`; toggle/reset are the only
/// writers of the status, and they run one at a time.
#[derive(Clone)]
pub struct TimerController {
    state: Arc<RwLock<FocusTimer>>,
    status_tx: Arc<watch::Sender<TimerStatus>>,
    ticker: Arc<Mutex<Option<Ticker>>>,
    bus: EventBus,
    tick_interval: Duration,
    refresh_every_ticks: u64,
}

impl TimerController {
    pub fn new(bus: EventBus, tick_interval: Duration, refresh_every_ticks: u64) -> Self {
        let (status_tx, _) = watch::channel(TimerStatus::Idle);
        Self {
            state: Arc::new(RwLock::new(FocusTimer::new())),
            status_tx: Arc::new(status_tx),
            ticker: Arc::new(Mutex::new(None)),
            bus,
            tick_interval,
            refresh_every_ticks,
        }
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::of(&read_lock(&self.state))
    }

    pub fn status(&self) -> TimerStatus {
        read_lock(&self.state).status()
    }

    /// Status feed for activities that must stop when the timer stops.
    pub fn subscribe_status(&self) -> watch::Receiver<TimerStatus> {
        self.status_tx.subscribe()
    }

    /// Start, pause or resume. A running timer gets a fresh ticker; a paused
    /// one has its ticker cancelled and joined before this returns.
    pub async fn toggle(&self) -> TimerSnapshot {
        let mut ticker = self.ticker.lock().await;

        let (event, snapshot) = {
            let mut state = write_lock(&self.state);
            let event = state.toggle();
            (event, TimerSnapshot::of(&state))
        };
        self.status_tx.send_replace(snapshot.status);

        stop_ticker(&mut ticker).await;
        if snapshot.status == TimerStatus::Running {
            *ticker = Some(self.spawn_ticker());
        }

        info!("focus timer {:?} at {}", snapshot.status, snapshot.display);
        self.bus.publish(event);
        snapshot
    }

    /// Zero the timer and return to idle.
    pub async fn reset(&self) -> TimerSnapshot {
        let mut ticker = self.ticker.lock().await;

        let (event, snapshot) = {
            let mut state = write_lock(&self.state);
            let event = state.reset();
            (event, TimerSnapshot::of(&state))
        };
        self.status_tx.send_replace(snapshot.status);

        stop_ticker(&mut ticker).await;

        info!("focus timer reset");
        self.bus.publish(event);
        snapshot
    }

    fn spawn_ticker(&self) -> Ticker {
        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(tick_loop(
            self.state.clone(),
            self.bus.clone(),
            cancel_token.clone(),
            self.tick_interval,
            self.refresh_every_ticks,
        ));
        Ticker {
            handle,
            cancel_token,
        }
    }
}

async fn stop_ticker(slot: &mut Option<Ticker>) {
    if let Some(ticker) = slot.take() {
        ticker.cancel_token.cancel();
        if let Err(err) = ticker.handle.await {
            debug!("focus ticker join failed: {err}");
        }
    }
}

async fn tick_loop(
    state: Arc<RwLock<FocusTimer>>,
    bus: EventBus,
    cancel_token: CancellationToken,
    period: Duration,
    refresh_every: u64,
) {
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                debug!("focus ticker cancelled");
                break;
            }
            _ = interval.tick() => {
                let tick = write_lock(&state).tick(refresh_every);
                let Some(tick) = tick else {
                    debug!("focus timer no longer running; ticker exiting");
                    break;
                };

                bus.publish(Event::TimerTicked {
                    elapsed_secs: tick.elapsed_secs,
                });
                if tick.refresh_due {
                    bus.publish(Event::SuggestionRefreshDue {
                        elapsed_secs: tick.elapsed_secs,
                    });
                }
            }
        }
    }
}
