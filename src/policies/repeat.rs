//! # Repeated run.
//!
//! [`Repeat`] invokes its target `n` times in sequence with the same arguments
//! and returns the result of the last invocation.
//!
//! ## Rules
//! - An `Err` from any run is returned at once; the remaining runs are skipped.
//! - Values of successful runs other than the last are dropped.

use async_trait::async_trait;

use crate::calls::{Call, Site};
use crate::error::ConfigError;

/// Run-`n`-times policy.
pub struct Repeat<W> {
    inner: W,
    times: u32,
}

impl<W> Repeat<W> {
    /// Returns [`ConfigError::ZeroRepeat`] if `times` is zero.
    pub fn new(inner: W, times: u32) -> Result<Self, ConfigError> {
        if times == 0 {
            return Err(ConfigError::ZeroRepeat);
        }
        Ok(Self { inner, times })
    }

    /// Invocations per outer call.
    pub fn times(&self) -> u32 {
        self.times
    }
}

#[async_trait]
impl<A, W, T, E> Call<A> for Repeat<W>
where
    A: Clone + Send + 'static,
    W: Call<A, Output = Result<T, E>>,
    T: Send + 'static,
    E: Send + 'static,
{
    type Output = Result<T, E>;

    fn site(&self) -> &Site {
        self.inner.site()
    }

    async fn call(&self, args: A) -> Result<T, E> {
        for run in 1..self.times {
            let run_args = args.clone();
            if let Err(e) = self.inner.call(run_args).await {
                tracing::debug!(call = self.inner.name(), run, "repeated run failed");
                return Err(e);
            }
        }
        self.inner.call(args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calls::CallFn;
    use crate::error::CallError;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_returns_last_of_n_runs() {
        let total = Arc::new(AtomicU32::new(10));
        let acc = total.clone();
        let f = CallFn::new("do_sth", move |step: u32| {
            let now = acc.fetch_add(step, Ordering::SeqCst) + step;
            async move { Ok::<_, CallError>(now) }
        });
        let twice = Repeat::new(f, 2).unwrap();

        assert_eq!(twice.call(1).await.unwrap(), 12);
        assert_eq!(total.load(Ordering::SeqCst), 12);
    }

    #[tokio::test]
    async fn test_first_failure_stops_remaining_runs() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let f = CallFn::new("flaky", move |_: ()| {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n == 1 {
                    Err(CallError::fail("first run broke"))
                } else {
                    Ok(n)
                }
            }
        });
        let thrice = Repeat::new(f, 3).unwrap();

        match thrice.call(()).await {
            Err(CallError::Fail { error }) => assert_eq!(error, "first run broke"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_zero_is_rejected() {
        let f = CallFn::new("noop", |_: ()| async { Ok::<(), CallError>(()) });
        assert_eq!(Repeat::new(f, 0).err(), Some(ConfigError::ZeroRepeat));
    }
}
