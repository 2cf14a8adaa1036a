//! # Diagnostic events emitted by call wrappers.
//!
//! The [`EventKind`] enum classifies the human-facing output of the wrappers:
//! - **Instrumentation**: a timing line (`Measured`) and a numbered run separator (`Split`)
//! - **Suppression**: a swallowed failure trace (`Suppressed`)
//!
//! The [`Event`] struct carries metadata such as timestamp, call name, scaled
//! duration and separator number. Rendering is left to a [`Subscribe`](crate::Subscribe)
//! implementation such as [`LogWriter`](crate::LogWriter).
//!
//! ## Ordering guarantees
//! Each event has a process-wide sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use callvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::Measured)
//!     .with_call("crop")
//!     .with_times(3)
//!     .with_value(146.19, "ms");
//!
//! assert_eq!(ev.kind, EventKind::Measured);
//! assert_eq!(ev.call.as_deref(), Some("crop"));
//! assert_eq!(ev.times, Some(3));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of diagnostic events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A measured outer call finished.
    ///
    /// Sets:
    /// - `call`: display name of the target
    /// - `times`: how many times the target ran
    /// - `value` / `unit`: total duration scaled by the configured factor
    Measured,

    /// A numbered run separator.
    ///
    /// Sets:
    /// - `call`: display name of the target that produced it
    /// - `split`: separator number (0-based, per counter)
    Split,

    /// A target failure was swallowed.
    ///
    /// Sets:
    /// - `call`: display name of the target
    /// - `site`: full site description
    /// - `reason`: error or panic message
    Suppressed,
}

/// Diagnostic event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Display name of the target.
    pub call: Option<Arc<str>>,
    /// Full site description (`name() in file, line N`).
    pub site: Option<Arc<str>>,
    /// Number of target invocations covered by a measurement.
    pub times: Option<u32>,
    /// Scaled measurement.
    pub value: Option<f64>,
    /// Unit label of `value`.
    pub unit: Option<&'static str>,
    /// Separator number.
    pub split: Option<u64>,
    /// Human-readable reason (errors, panic payloads).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            call: None,
            site: None,
            times: None,
            value: None,
            unit: None,
            split: None,
            reason: None,
        }
    }

    /// Attaches the target's display name.
    #[inline]
    pub fn with_call(mut self, call: impl Into<Arc<str>>) -> Self {
        self.call = Some(call.into());
        self
    }

    /// Attaches the full site description.
    #[inline]
    pub fn with_site(mut self, site: impl Into<Arc<str>>) -> Self {
        self.site = Some(site.into());
        self
    }

    /// Attaches the invocation count.
    #[inline]
    pub fn with_times(mut self, times: u32) -> Self {
        self.times = Some(times);
        self
    }

    /// Attaches a scaled measurement and its unit label.
    #[inline]
    pub fn with_value(mut self, value: f64, unit: &'static str) -> Self {
        self.value = Some(value);
        self.unit = Some(unit);
        self
    }

    /// Attaches a separator number.
    #[inline]
    pub fn with_split(mut self, n: u64) -> Self {
        self.split = Some(n);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a measurement event.
    #[inline]
    pub fn measured(call: &str, times: u32, value: f64, unit: &'static str) -> Self {
        Event::new(EventKind::Measured)
            .with_call(call)
            .with_times(times)
            .with_value(value, unit)
    }

    /// Creates a separator event.
    #[inline]
    pub fn split(call: &str, n: u64) -> Self {
        Event::new(EventKind::Split).with_call(call).with_split(n)
    }

    /// Returns `true` for run separators.
    #[inline]
    pub fn is_split(&self) -> bool {
        matches!(self.kind, EventKind::Split)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_is_monotonic() {
        let a = Event::new(EventKind::Split);
        let b = Event::new(EventKind::Split);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_split_helper_sets_number() {
        let ev = Event::split("full_flow", 4);
        assert!(ev.is_split());
        assert_eq!(ev.split, Some(4));
        assert_eq!(ev.call.as_deref(), Some("full_flow"));
    }
}
