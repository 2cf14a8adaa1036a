//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait and built-in implementations
//! for rendering the [`Event`](crate::Event)s produced by wrappers.
//!
//! ## Architecture
//! ```text
//! Measure / Timing / PassExcept ── on_event(&Event) ──► Arc<dyn Subscribe>
//!                                                          │
//!                                              ┌───────────┼───────────┐
//!                                              ▼           ▼           ▼
//!                                          LogWriter  SubscriberSet  Custom
//!                                          (stderr)     (fan-out)
//! ```

mod log;
mod set;
mod subscribe;

#[cfg(test)]
mod recorder;

pub use log::LogWriter;
pub use set::SubscriberSet;
pub(crate) use set::panic_message;
pub use subscribe::Subscribe;

#[cfg(test)]
pub(crate) use recorder::Recorder;

use std::sync::Arc;

/// Subscriber used by wrappers unless one is supplied.
pub(crate) fn default_subscriber() -> Arc<dyn Subscribe> {
    Arc::new(LogWriter)
}
