use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::history::HistoryEntry;
use crate::locks::{read_lock, write_lock};

/// Capacity of the broadcast channel handed to subscribers. Slow subscribers
/// miss the oldest events rather than blocking the publishers.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Every state change in the engine produces an Event.
/// Listeners react synchronously; subscribers receive a broadcast copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        at: DateTime<Utc>,
    },
    TimerPaused {
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    TimerTicked {
        elapsed_secs: u64,
    },
    /// Published on every Nth tick so the coach can rotate its tip.
    SuggestionRefreshDue {
        elapsed_secs: u64,
    },
    SessionOpened {
        destination: String,
        at: DateTime<Utc>,
    },
    SessionClosed {
        entry: HistoryEntry,
    },
    /// The sampler saw the active session sitting on a distracting destination.
    DistractionDetected {
        destination: String,
        at: DateTime<Utc>,
    },
}

/// Synchronous consumer of events, invoked on the publishing task.
pub trait EventListener: Send + Sync {
    fn on_event(&self, event: &Event);
}

/// Fan-out point for engine events.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
    listeners: Arc<RwLock<Vec<Arc<dyn EventListener>>>>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            sender,
            listeners: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn add_listener(&self, listener: Arc<dyn EventListener>) {
        write_lock(&self.listeners).push(listener);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: Event) {
        let listeners = read_lock(&self.listeners).clone();
        for listener in &listeners {
            listener.on_event(&event);
        }
        // No subscribers is fine.
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<Event>>);

    impl EventListener for Recorder {
        fn on_event(&self, event: &Event) {
            self.0.lock().unwrap().push(event.clone());
        }
    }

    #[test]
    fn listeners_and_subscribers_both_see_events() {
        let bus = EventBus::new();
        let recorder = Arc::new(Recorder::default());
        bus.add_listener(recorder.clone());
        let mut rx = bus.subscribe();

        bus.publish(Event::TimerTicked { elapsed_secs: 3 });

        assert_eq!(
            *recorder.0.lock().unwrap(),
            [Event::TimerTicked { elapsed_secs: 3 }]
        );
        assert_eq!(rx.try_recv().unwrap(), Event::TimerTicked { elapsed_secs: 3 });
    }

    #[test]
    fn publish_without_subscribers_does_not_fail() {
        let bus = EventBus::new();
        bus.publish(Event::TimerReset { at: Utc::now() });
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let json = serde_json::to_value(Event::SuggestionRefreshDue { elapsed_secs: 60 }).unwrap();
        assert_eq!(json["type"], "suggestion_refresh_due");
        assert_eq!(json["elapsed_secs"], 60);
    }
}
