//! # Delay after call.
//!
//! [`SlowDown`] runs its target once, then pauses the calling context for a
//! fixed delay before handing back the result. The delay is never skipped,
//! whatever the target returned and however fast it was.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time;

use crate::calls::{Call, Site};
use crate::config::Config;

/// Delay-after-call policy.
pub struct SlowDown<W> {
    inner: W,
    delay: Duration,
}

impl<W> SlowDown<W> {
    /// Pauses for `delay` after every call.
    pub fn new(inner: W, delay: Duration) -> Self {
        Self { inner, delay }
    }

    /// Uses [`Config::slow_down`].
    pub fn with_defaults(inner: W, cfg: &Config) -> Self {
        Self::new(inner, cfg.slow_down)
    }

    /// Configured delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl<A, W> Call<A> for SlowDown<W>
where
    A: Send + 'static,
    W: Call<A>,
{
    type Output = W::Output;

    fn site(&self) -> &Site {
        self.inner.site()
    }

    async fn call(&self, args: A) -> W::Output {
        let out = self.inner.call(args).await;
        time::sleep(self.delay).await;
        out
    }
}
