use std::sync::{Arc, RwLock};

use chrono::Utc;
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, Duration, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::classifier::Classifier;
use crate::events::{Event, EventBus};
use crate::locks::read_lock;
use crate::timer::TimerStatus;

use super::ActiveSession;

/// Handle on the background poll for one session.
pub(crate) struct Sampler {
    pub(crate) generation: u64,
    handle: JoinHandle<()>,
    cancel_token: CancellationToken,
}

impl Sampler {
    pub(crate) fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Cancel and wait for the poll to exit.
    pub(crate) async fn stop(self) {
        self.cancel_token.cancel();
        if let Err(err) = self.handle.await {
            debug!("session sampler join failed: {err}");
        }
    }
}

pub(crate) struct SamplerContext {
    pub(crate) active: Arc<RwLock<Option<ActiveSession>>>,
    pub(crate) classifier: Arc<Classifier>,
    pub(crate) bus: EventBus,
    pub(crate) timer_status: watch::Receiver<TimerStatus>,
    pub(crate) period: Duration,
}

pub(crate) fn spawn(session: &ActiveSession, ctx: SamplerContext) -> Sampler {
    let cancel_token = CancellationToken::new();
    let handle = tokio::spawn(sample_loop(
        session.destination.clone(),
        session.generation,
        ctx,
        cancel_token.clone(),
    ));
    Sampler {
        generation: session.generation,
        handle,
        cancel_token,
    }
}

/// Poll once per period until the session is replaced or closed, or the
/// timer stops running.
async fn sample_loop(
    destination: String,
    generation: u64,
    ctx: SamplerContext,
    cancel_token: CancellationToken,
) {
    let mut ticker = time::interval_at(Instant::now() + ctx.period, ctx.period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                debug!("sampler for {destination} cancelled");
                break;
            }
            _ = ticker.tick() => {
                if *ctx.timer_status.borrow() != TimerStatus::Running {
                    debug!("focus timer stopped; sampler for {destination} exiting");
                    break;
                }
                let still_active = read_lock(&ctx.active)
                    .as_ref()
                    .is_some_and(|s| s.generation == generation);
                if !still_active {
                    debug!("session {generation} ended; sampler exiting");
                    break;
                }

                if ctx.classifier.is_distraction(&destination) {
                    debug!("distraction detected on {destination}");
                    ctx.bus.publish(Event::DistractionDetected {
                        destination: destination.clone(),
                        at: Utc::now(),
                    });
                }
            }
        }
    }
}
