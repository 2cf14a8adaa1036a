//! Resilience and pacing policies.
//!
//! Every policy wraps an inner [`Call`](crate::Call) and is itself a `Call`, so
//! policies stack in any order. The site of the innermost target is forwarded
//! unchanged through each layer.
//!
//! ## Contents
//! - [`Retry`]      re-invoke on retryable errors, bounded per outer call
//! - [`LimitRun`]   lifetime quota of target runs, shared by all callers
//! - [`Timeout`]    per-call deadline with cooperative cancellation
//! - [`SlowDown`]   fixed pause after every call
//! - [`PassExcept`] failures (errors and panics) become `None`
//! - [`Repeat`]     run the target N times, keep the last result
//!
//! ## Quick wiring
//! ```text
//! CallFn("fetch")
//!   └─► Timeout(2s)        one deadline per attempt
//!        └─► Retry(3)      up to 3 attempts per outer call
//!             └─► LimitRun(10)  at most 10 outer calls, ever
//! ```
//!
//! ## Defaults
//! - [`Config::default()`](crate::Config) → retries=1, timeout=0s (disabled), slow_down=1s.

mod limit;
mod repeat;
mod retry;
mod slow_down;
mod suppress;
mod timeout;

pub use limit::LimitRun;
pub use repeat::Repeat;
pub use retry::Retry;
pub use slow_down::SlowDown;
pub use suppress::PassExcept;
pub use timeout::{Timeout, current_token};
