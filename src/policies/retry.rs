//! # Bounded retry.
//!
//! [`Retry`] re-invokes its target while it fails with a *retryable* error, up to
//! a fixed number of attempts per outer call.
//!
//! ## Rules
//! - At most `attempts` target invocations per outer call.
//! - The budget is per outer call; it never carries over to the next one.
//! - A non-retryable error is returned immediately, unchanged.
//! - When the last attempt fails with a retryable error the original error is
//!   discarded and [`CallError::RetriesExhausted`] is returned.
//!
//! ## Flow
//! ```text
//! call(args)
//!   ├─► attempt 1 ─► Ok(v) ─────────────► Ok(v)
//!   │             └► Err(e), retryable ─► attempt 2 ...
//!   │             └► Err(e), other ─────► Err(e)
//!   └─► attempt N ─► Err(e), retryable ─► Err(RetriesExhausted { site, N })
//! ```
//!
//! # Example
//! ```rust
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use std::sync::Arc;
//! use callvisor::{Call, CallError, CallFn, Retry};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let seen = Arc::new(AtomicU32::new(0));
//! let counter = seen.clone();
//! let flaky = CallFn::new("flaky", move |_: ()| {
//!     let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
//!     async move {
//!         if n < 3 { Err(CallError::fail("not yet")) } else { Ok(n) }
//!     }
//! });
//!
//! let retry = Retry::new(flaky, 3).unwrap();
//! assert_eq!(retry.call(()).await.unwrap(), 3);
//! # });
//! ```

use async_trait::async_trait;

use crate::calls::{Call, Site};
use crate::config::Config;
use crate::error::{CallError, ConfigError};

fn any_error<E>(_: &E) -> bool {
    true
}

/// Retry-on-error policy with a fixed attempt budget.
pub struct Retry<W, E> {
    inner: W,
    attempts: u32,
    when: fn(&E) -> bool,
}

impl<W, E> Retry<W, E> {
    /// Retries every error, up to `attempts` invocations per outer call.
    ///
    /// Returns [`ConfigError::ZeroRetries`] if `attempts` is zero.
    pub fn new(inner: W, attempts: u32) -> Result<Self, ConfigError> {
        if attempts == 0 {
            return Err(ConfigError::ZeroRetries);
        }
        Ok(Self {
            inner,
            attempts,
            when: any_error::<E>,
        })
    }

    /// Uses [`Config::retries`] as the budget.
    pub fn with_defaults(inner: W, cfg: &Config) -> Result<Self, ConfigError> {
        Self::new(inner, cfg.retries)
    }

    /// Restricts retries to errors matching `when`; others propagate immediately.
    pub fn when(mut self, when: fn(&E) -> bool) -> Self {
        self.when = when;
        self
    }

    /// Attempt budget per outer call.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

#[async_trait]
impl<A, W, T, E> Call<A> for Retry<W, E>
where
    A: Clone + Send + 'static,
    W: Call<A, Output = Result<T, E>>,
    T: Send + 'static,
    E: From<CallError> + Send + 'static,
{
    type Output = Result<T, E>;

    fn site(&self) -> &Site {
        self.inner.site()
    }

    async fn call(&self, args: A) -> Result<T, E> {
        for attempt in 1..=self.attempts {
            let attempt_args = args.clone();
            match self.inner.call(attempt_args).await {
                Ok(v) => return Ok(v),
                Err(e) if (self.when)(&e) => {
                    tracing::debug!(
                        call = self.inner.name(),
                        attempt,
                        budget = self.attempts,
                        "attempt failed"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        tracing::warn!(call = self.inner.name(), budget = self.attempts, "retries exhausted");
        Err(CallError::RetriesExhausted {
            site: self.inner.site().clone(),
            attempts: self.attempts,
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calls::CallFn;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug)]
    enum JobError {
        Transient,
        Broken,
        Policy(CallError),
    }

    impl From<CallError> for JobError {
        fn from(e: CallError) -> Self {
            JobError::Policy(e)
        }
    }

    /// A target failing the first `failures` invocations, then returning the attempt number.
    fn flaky(
        failures: u32,
        error: fn() -> JobError,
    ) -> (Arc<AtomicU32>, impl Call<(), Output = Result<u32, JobError>>) {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let f = CallFn::new("flaky", move |_: ()| {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move { if n <= failures { Err(error()) } else { Ok(n) } }
        });
        (calls, f)
    }

    #[tokio::test]
    async fn test_succeeds_after_k_failures_with_k_plus_one_calls() {
        let (calls, f) = flaky(2, || JobError::Transient);
        let retry = Retry::new(f, 3).unwrap();

        assert_eq!(retry.call(()).await.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausts_after_exactly_n_calls() {
        let (calls, f) = flaky(10, || JobError::Transient);
        let retry = Retry::new(f, 3).unwrap();

        match retry.call(()).await {
            Err(JobError::Policy(CallError::RetriesExhausted { site, attempts })) => {
                assert_eq!(attempts, 3);
                assert_eq!(site.name(), "flaky");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_matching_error_is_not_retried() {
        let (calls, f) = flaky(10, || JobError::Broken);
        let retry =
            Retry::new(f, 5).unwrap().when(|e: &JobError| matches!(e, JobError::Transient));

        assert!(matches!(retry.call(()).await, Err(JobError::Broken)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_budget_resets_between_outer_calls() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        // Fails on odd invocations, succeeds on even ones.
        let f = CallFn::new("alternating", move |_: ()| {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n % 2 == 1 {
                    Err(CallError::fail("odd"))
                } else {
                    Ok(n)
                }
            }
        });
        let retry = Retry::new(f, 2).unwrap();

        assert_eq!(retry.call(()).await.unwrap(), 2);
        assert_eq!(retry.call(()).await.unwrap(), 4);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_zero_budget_is_rejected() {
        let f = CallFn::new("noop", |_: ()| async { Ok::<(), CallError>(()) });
        let res = Retry::<_, CallError>::new(f, 0);
        assert_eq!(res.err(), Some(ConfigError::ZeroRetries));
    }

    #[test]
    fn test_defaults_take_budget_from_config() {
        let f = CallFn::new("noop", |_: ()| async { Ok::<(), CallError>(()) });
        let cfg = Config {
            retries: 4,
            ..Config::default()
        };
        let retry: Retry<_, CallError> = Retry::with_defaults(f, &cfg).unwrap();
        assert_eq!(retry.attempts(), 4);
    }
}
