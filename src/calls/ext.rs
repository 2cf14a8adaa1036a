//! # Combinators.
//!
//! [`CallExt`] puts every wrapper behind a method on any [`Call`], so layers
//! read outermost-last:
//!
//! ```rust
//! use std::time::Duration;
//! use callvisor::{Call, CallError, CallExt, CallFn};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
//! let fetch = CallFn::new("fetch", |id: u32| async move { Ok::<_, CallError>(id * 10) })
//!     .timeout(Duration::from_secs(2), "fetch timed out")
//!     .retry(3)
//!     .unwrap()
//!     .limit_run(Some(100))
//!     .unwrap();
//!
//! assert_eq!(fetch.call(4).await.unwrap(), 40);
//! assert_eq!(fetch.name(), "fetch");
//! # });
//! ```

use std::borrow::Cow;
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::ReduceQuery;
use crate::calls::Call;
use crate::error::ConfigError;
use crate::policies::{LimitRun, PassExcept, Repeat, Retry, SlowDown, Timeout};
use crate::timing::{Measure, MeasureElapsed, MeasureOptions};

/// Wrapper constructors available on every [`Call`].
pub trait CallExt<A: Send + 'static>: Call<A> + Sized {
    /// See [`Retry::new`]; retries every error.
    fn retry<E>(self, attempts: u32) -> Result<Retry<Self, E>, ConfigError> {
        Retry::new(self, attempts)
    }

    /// See [`LimitRun::new`].
    fn limit_run(self, limit: Option<u32>) -> Result<LimitRun<Self>, ConfigError> {
        LimitRun::new(self, limit)
    }

    /// See [`Timeout::new`].
    fn timeout(self, after: Duration, message: impl Into<Cow<'static, str>>) -> Timeout<Self> {
        Timeout::new(self, after, message)
    }

    /// See [`SlowDown::new`].
    fn slow_down(self, delay: Duration) -> SlowDown<Self> {
        SlowDown::new(self, delay)
    }

    /// See [`PassExcept::new`].
    fn pass_except(self, print_exception: bool) -> PassExcept<Self> {
        PassExcept::new(self, print_exception)
    }

    /// See [`Repeat::new`].
    fn repeat(self, times: u32) -> Result<Repeat<Self>, ConfigError> {
        Repeat::new(self, times)
    }

    /// See [`Measure::new`].
    fn measure(self, opts: MeasureOptions) -> Result<Measure<Self>, ConfigError> {
        Measure::new(self, opts)
    }

    /// See [`MeasureElapsed::new`].
    fn measure_elapsed(self, opts: MeasureOptions) -> Result<MeasureElapsed<Self>, ConfigError> {
        MeasureElapsed::new(self, opts)
    }

    /// See [`ReduceQuery::new`].
    fn reduce_query<R>(self, path: impl Into<PathBuf>) -> Result<ReduceQuery<Self, R>, ConfigError> {
        ReduceQuery::new(self, path)
    }
}

impl<A: Send + 'static, C: Call<A>> CallExt<A> for C {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calls::CallFn;
    use crate::error::CallError;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_timeout_inside_retry_gets_a_fresh_deadline_per_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        // First attempt hangs, second one is quick.
        let f = CallFn::new("hangs_once", move |_: ()| {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n == 1 {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                }
                Ok::<_, CallError>(n)
            }
        });
        let wrapped = f
            .timeout(Duration::from_secs(1), "too slow")
            .retry(2)
            .unwrap();

        assert_eq!(wrapped.call(()).await.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_pass_except_outermost_swallows_policy_failures() {
        let f = CallFn::new("do_sth", |_: ()| async { Ok::<_, CallError>("run") });
        let quiet = f.limit_run(Some(1)).unwrap().pass_except(false);

        assert_eq!(quiet.call(()).await, Some("run"));
        assert_eq!(quiet.call(()).await, None);
        assert_eq!(quiet.name(), "do_sth");
    }

    #[tokio::test]
    async fn test_measured_repeat_keeps_last_result() {
        let f = CallFn::new("tick", |n: u32| async move { Ok::<_, CallError>(n + 1) });
        let timed = f
            .repeat(2)
            .unwrap()
            .measure(MeasureOptions::default().active(false))
            .unwrap();

        assert_eq!(timed.call(1).await.unwrap(), 2);
    }
}
