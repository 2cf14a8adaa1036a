//! # Wall-clock timeout.
//!
//! [`Timeout`] races one outer call against a deadline. When the deadline
//! elapses first the in-flight call is dropped at its current await point, its
//! cancellation token is cancelled and [`CallError::Timeout`] is returned.
//!
//! ## Flow
//! ```text
//! call(args)
//!   ├─► derive child token (from the enclosing call, if any)
//!   ├─► time::timeout(after, scope(child, inner.call(args)))
//!   │       ├─ finished ─► result (timer dropped)
//!   │       └─ elapsed  ─► child.cancel() ─► Err(Timeout { message })
//! ```
//!
//! ## Rules
//! - The deadline is owned by the outer call; it is disarmed on every exit path
//!   (success, target error, timeout), so it never fires against a later call.
//! - Nested timeouts are supported: each wrapper owns its own deadline and the
//!   inner token is a child of the outer one, so cancelling the outer call also
//!   cancels the inner.
//! - Interruption is cooperative: a target that blocks the thread without
//!   yielding cannot be preempted. Work the target spawned should watch
//!   [`current_token`] to stop after a timeout.
//! - `after = 0s` disables the deadline.

use std::borrow::Cow;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::calls::{Call, Site};
use crate::config::Config;
use crate::error::CallError;

tokio::task_local! {
    static CALL_TOKEN: CancellationToken;
}

/// Cancellation token of the innermost enclosing [`Timeout`], if any.
///
/// The token is cancelled when that timeout elapses. Targets that hand work to
/// spawned tasks can clone it and stop the work cooperatively.
///
/// # Example
/// ```
/// use callvisor::current_token;
///
/// // Outside of a timed call there is no token.
/// assert!(current_token().is_none());
/// ```
pub fn current_token() -> Option<CancellationToken> {
    CALL_TOKEN.try_with(|t| t.clone()).ok()
}

/// Deadline policy.
pub struct Timeout<W> {
    inner: W,
    after: Duration,
    message: Cow<'static, str>,
}

impl<W> Timeout<W> {
    /// Fails calls running longer than `after` with `message`.
    pub fn new(inner: W, after: Duration, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            inner,
            after,
            message: message.into(),
        }
    }

    /// Uses [`Config::timeout`] and [`Config::timeout_message`].
    pub fn with_defaults(inner: W, cfg: &Config) -> Self {
        Self::new(
            inner,
            cfg.default_timeout().unwrap_or(Duration::ZERO),
            cfg.timeout_message.clone(),
        )
    }

    /// Configured deadline (`None` = disabled).
    pub fn after(&self) -> Option<Duration> {
        Some(self.after).filter(|d| *d > Duration::ZERO)
    }
}

#[async_trait]
impl<A, W, T, E> Call<A> for Timeout<W>
where
    A: Send + 'static,
    W: Call<A, Output = Result<T, E>>,
    T: Send + 'static,
    E: From<CallError> + Send + 'static,
{
    type Output = Result<T, E>;

    fn site(&self) -> &Site {
        self.inner.site()
    }

    async fn call(&self, args: A) -> Result<T, E> {
        let parent = current_token().unwrap_or_else(CancellationToken::new);
        let child = parent.child_token();
        let scoped = CALL_TOKEN.scope(child.clone(), self.inner.call(args));

        let Some(after) = self.after() else {
            return scoped.await;
        };

        match time::timeout(after, scoped).await {
            Ok(res) => res,
            Err(_elapsed) => {
                child.cancel();
                tracing::warn!(call = self.inner.name(), timeout = ?after, "call timed out");
                Err(CallError::Timeout {
                    message: self.message.to_string(),
                    timeout: after,
                }
                .into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calls::CallFn;
    use std::sync::Arc;
    use tokio::sync::Notify;

    fn sleeper() -> impl Call<Duration, Output = Result<&'static str, CallError>> {
        CallFn::new("sleeper", |d: Duration| async move {
            time::sleep(d).await;
            Ok("done")
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_call_times_out_with_message() {
        let t = Timeout::new(sleeper(), Duration::from_secs(1), "Function call timed out");

        match t.call(Duration::from_millis(1500)).await {
            Err(CallError::Timeout { message, timeout }) => {
                assert_eq!(message, "Function call timed out");
                assert_eq!(timeout, Duration::from_secs(1));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_call_returns_and_leaves_no_residual_deadline() {
        let t = Timeout::new(sleeper(), Duration::from_secs(1), "late");

        assert_eq!(t.call(Duration::from_millis(900)).await.unwrap(), "done");

        // Well past the first call's deadline, an unrelated call is unaffected.
        let plain = sleeper();
        assert_eq!(plain.call(Duration::from_secs(5)).await.unwrap(), "done");
        assert_eq!(t.call(Duration::from_millis(900)).await.unwrap(), "done");
    }

    #[tokio::test(start_paused = true)]
    async fn test_target_error_passes_through() {
        let f = CallFn::new("broken", |_: ()| async { Err::<(), _>(CallError::fail("boom")) });
        let t = Timeout::new(f, Duration::from_secs(1), "late");

        assert!(matches!(t.call(()).await, Err(CallError::Fail { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_token_is_cancelled_on_timeout() {
        let stopped = Arc::new(Notify::new());
        let notify = stopped.clone();
        let f = CallFn::new("spawner", move |_: ()| {
            let notify = notify.clone();
            async move {
                let token = current_token().expect("token inside timed call");
                tokio::spawn(async move {
                    token.cancelled().await;
                    notify.notify_one();
                });
                time::sleep(Duration::from_secs(10)).await;
                Ok::<(), CallError>(())
            }
        });
        let t = Timeout::new(f, Duration::from_secs(1), "late");

        assert!(t.call(()).await.is_err());
        stopped.notified().await;
        assert!(current_token().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_nested_timeouts_attribute_to_the_tighter_deadline() {
        let inner = Timeout::new(sleeper(), Duration::from_secs(1), "inner");
        let outer = Timeout::new(inner, Duration::from_secs(5), "outer");

        match outer.call(Duration::from_secs(2)).await {
            Err(CallError::Timeout { message, .. }) => assert_eq!(message, "inner"),
            other => panic!("unexpected result: {other:?}"),
        }

        let inner = Timeout::new(sleeper(), Duration::from_secs(5), "inner");
        let outer = Timeout::new(inner, Duration::from_secs(1), "outer");
        match outer.call(Duration::from_secs(2)).await {
            Err(CallError::Timeout { message, .. }) => assert_eq!(message, "outer"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_duration_disables_deadline() {
        let t = Timeout::with_defaults(sleeper(), &Config::default());
        assert_eq!(t.after(), None);
        assert_eq!(t.call(Duration::from_secs(60)).await.unwrap(), "done");
    }
}
