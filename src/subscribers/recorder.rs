//! In-memory subscriber for tests.

use std::sync::{Arc, Mutex};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Collects every event it receives.
#[derive(Default)]
pub(crate) struct Recorder {
    events: Mutex<Vec<Event>>,
}

impl Recorder {
    pub(crate) fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub(crate) fn kinds(&self) -> Vec<EventKind> {
        self.events().iter().map(|e| e.kind).collect()
    }

    pub(crate) fn splits(&self) -> Vec<u64> {
        self.events()
            .iter()
            .filter(|e| e.is_split())
            .filter_map(|e| e.split)
            .collect()
    }
}

impl Subscribe for Recorder {
    fn on_event(&self, event: &Event) {
        self.events.lock().unwrap().push(event.clone());
    }

    fn name(&self) -> &'static str {
        "recorder"
    }
}
