//! # Core subscriber trait
//!
//! `Subscribe` is the extension point for plugging custom event handlers into
//! wrappers that produce diagnostic output. The wrapper calls
//! [`Subscribe::on_event`] inline, in the calling context, right where the
//! original output would have been written.
//!
//! ## Contract
//! - Handlers run synchronously inside the outer call: keep them short.
//! - Handlers must not panic; a [`SubscriberSet`](crate::SubscriberSet) isolates
//!   panics, a bare subscriber does not.
//!
//! ## Example (skeleton)
//! ```rust
//! use callvisor::{Event, EventKind, Subscribe};
//!
//! struct SlowCalls;
//!
//! impl Subscribe for SlowCalls {
//!     fn on_event(&self, ev: &Event) {
//!         if ev.kind == EventKind::Measured && ev.value.unwrap_or(0.0) > 500.0 {
//!             // alert...
//!         }
//!     }
//!     fn name(&self) -> &'static str { "slow-calls" }
//! }
//! ```

use crate::events::Event;

/// Contract for event subscribers.
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single event.
    ///
    /// # Parameters
    /// - `event`: Reference to the event (does not transfer ownership)
    fn on_event(&self, event: &Event);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
