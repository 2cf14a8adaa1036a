//! # SubscriberSet: fan-out over multiple subscribers
//!
//! [`SubscriberSet`] delivers each [`Event`] to every subscriber in order,
//! inline, and isolates their panics.
//!
//! ## What it guarantees
//! - Subscribers see events in registration order.
//! - A panicking subscriber is logged and skipped; the rest still receive the event
//!   and the outer call is unaffected.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use callvisor::{LogWriter, Subscribe, SubscriberSet};
//!
//! let set = SubscriberSet::new(vec![Arc::new(LogWriter) as Arc<dyn Subscribe>]);
//! assert_eq!(set.len(), 1);
//! ```

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use crate::events::Event;
use crate::subscribers::Subscribe;

/// Composite fan-out over a list of subscribers.
#[derive(Clone, Default)]
pub struct SubscriberSet {
    subs: Vec<Arc<dyn Subscribe>>,
}

impl SubscriberSet {
    /// Creates a new set.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        Self { subs }
    }

    /// Adds one more subscriber.
    pub fn push(&mut self, sub: Arc<dyn Subscribe>) {
        self.subs.push(sub);
    }

    /// Number of subscribers.
    pub fn len(&self) -> usize {
        self.subs.len()
    }

    /// Returns `true` if there are no subscribers.
    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }
}

impl Subscribe for SubscriberSet {
    fn on_event(&self, event: &Event) {
        for s in &self.subs {
            if let Err(panic_err) = catch_unwind(AssertUnwindSafe(|| s.on_event(event))) {
                let info = panic_message(&*panic_err);
                tracing::warn!(subscriber = s.name(), info = %info, "subscriber panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "SubscriberSet"
    }
}

/// Extracts the message of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use crate::subscribers::Recorder;

    struct Panicky;

    impl Subscribe for Panicky {
        fn on_event(&self, _: &Event) {
            panic!("subscriber bug");
        }
    }

    #[test]
    fn test_panic_does_not_stop_fan_out() {
        let rec = Arc::new(Recorder::default());
        let set = SubscriberSet::new(vec![Arc::new(Panicky) as Arc<dyn Subscribe>, rec.clone()]);

        set.on_event(&Event::new(EventKind::Split).with_split(7));

        let seen = rec.events();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].split, Some(7));
    }
}
