//! Notifier that records events.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::port::{AlertEvent, Event, Notifier};

/// Keeps every event it is sent. Clones share the same log.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    /// Only the alert events, in arrival order.
    pub fn alerts(&self) -> Vec<AlertEvent> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                Event::ArbitrageAlert(alert) => Some(alert.clone()),
                Event::Digest(_) => None,
            })
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: Event) {
        self.events.lock().push(event);
    }
}
