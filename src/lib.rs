//! # callvisor
//!
//! **Callvisor** wraps async calls in composable policies: timing, bounded
//! retry, lifetime run quotas, deadlines, pacing, failure suppression and a
//! once-a-day query cache.
//!
//! Every wrapper implements the same [`Call`] trait as the target it wraps, so
//! wrappers stack in any order and the stack is itself a `Call`. The innermost
//! target's [`Site`] (name and source location) is forwarded through every
//! layer and shows up in errors and log lines.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!        ┌──────────────────────┐
//!        │ CallFn("load_users") │  closure / async fn, A = argument tuple
//!        └──────────┬───────────┘
//!                   ▼
//! ┌──────────────────────────────────────────────────────────────────┐
//! │ Wrappers (each one is a Call<A>)                                 │
//! │  - Timeout     deadline + child CancellationToken                │
//! │  - Retry       N attempts per outer call                         │
//! │  - LimitRun    lifetime quota (atomic)                           │
//! │  - SlowDown    pause after the call                              │
//! │  - Repeat      run N times, keep the last result                 │
//! │  - ReduceQuery memory ─► CSV file ─► target, once per day        │
//! │  - Measure     run × times, report elapsed                       │
//! │  - PassExcept  Err / panic ─► None                               │
//! └──────────┬───────────────────────────────────────┬───────────────┘
//!            │ Result<T, E: From<CallError>>         │ Event
//!            ▼                                       ▼
//!        caller                        Arc<dyn Subscribe> (LogWriter → stderr)
//! ```
//!
//! ### Outer call
//! ```text
//! wrapped.call(args)
//!   ├─► policy before  (quota check, cache lookup, clock start, ...)
//!   ├─► inner.call(args) × 0..N
//!   ├─► policy after   (retry decision, delay, timing line, ...)
//!   └─► Ok(value) | Err(E::from(CallError::...)) | Option / f64
//! ```
//!
//! ## Features
//! | Area                | Description                                                    | Key types / traits                              |
//! |---------------------|----------------------------------------------------------------|-------------------------------------------------|
//! | **Calls**           | Wrap closures and async fns, compose with combinators.        | [`Call`], [`CallFn`], [`CallExt`], [`CallRef`]  |
//! | **Instrumentation** | Time calls, numbered separators, shared counters.              | [`Measure`], [`MeasureElapsed`], [`Timing`]     |
//! | **Resilience**      | Retry, run quota, timeout, slow-down, suppression, repeat.     | [`Retry`], [`LimitRun`], [`Timeout`], ...       |
//! | **Freshness cache** | Query at most once per calendar day, memory + CSV file tiers.  | [`ReduceQuery`], [`Clock`]                      |
//! | **Subscriber API**  | Receive timing lines and suppressed failures as events.        | [`Subscribe`], [`LogWriter`], [`SubscriberSet`] |
//! | **Errors**          | Typed errors for configuration, calls and the cache file.      | [`ConfigError`], [`CallError`], [`CacheError`]  |
//! | **Configuration**   | Shared defaults for `with_defaults` constructors.              | [`Config`]                                      |
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use callvisor::{Call, CallError, CallExt, CallFn, MeasureOptions};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let fetch = CallFn::new("fetch", |id: u32| async move {
//!         if id == 0 {
//!             return Err(CallError::fail("no such id"));
//!         }
//!         Ok(format!("user-{id}"))
//!     })
//!     .timeout(Duration::from_secs(5), "fetch timed out")
//!     .retry(3)?
//!     .measure(MeasureOptions::default())?;
//!
//!     assert_eq!(fetch.call(7).await?, "user-7");
//!     assert!(fetch.call(0).await.is_err());
//!     Ok(())
//! }
//! ```
mod cache;
mod calls;
mod config;
mod error;
mod events;
mod policies;
mod subscribers;
mod timing;

// ---- Public re-exports ----

pub use cache::{Clock, LocalClock, ManualClock, ReduceQuery};
pub use calls::{Call, CallExt, CallFn, CallRef, Site};
pub use config::Config;
pub use error::{CacheError, CallError, ConfigError};
pub use events::{Event, EventKind};
pub use policies::{LimitRun, PassExcept, Repeat, Retry, SlowDown, Timeout, current_token};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
pub use timing::{Measure, MeasureElapsed, MeasureOptions, Timing};
