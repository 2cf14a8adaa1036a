//! Diagnostic events: types emitted by wrappers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//!
//! ## Quick reference
//! - **Publishers**: `Measure`, `Timing` wrappers, `PassExcept`.
//! - **Consumers**: any [`Subscribe`](crate::Subscribe) implementation, called inline
//!   from the wrapper that produced the event.

mod event;

pub use event::{Event, EventKind};
