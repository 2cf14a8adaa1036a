//! Wall-clock instrumentation.
//!
//! ## Contents
//! - [`MeasureOptions`] run count, scale factor, separators, on/off switch
//! - [`Measure`]        time a call, return the target's result
//! - [`MeasureElapsed`] time a call, return the scaled duration
//! - [`Timing`]         stateful instance sharing one separator counter
//!
//! Output is delivered as [`Event`](crate::Event)s (`Measured`, `Split`) to the
//! wrapper's [`Subscribe`](crate::Subscribe), [`LogWriter`](crate::LogWriter) by default.

mod measure;
mod shared;

pub use measure::{Measure, MeasureElapsed, MeasureOptions};
pub use shared::Timing;
