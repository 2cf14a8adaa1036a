//! # Run quota.
//!
//! [`LimitRun`] allows its target to run at most `limit` times over the whole
//! lifetime of the wrapper. The remaining count is shared by every outer call and
//! never replenishes; once it reaches zero each call fails with
//! [`CallError::QuotaExceeded`] without invoking the target.
//!
//! ## Rules
//! - `limit = None` → unrestricted, no bookkeeping.
//! - `limit = Some(0)` → rejected at construction ([`ConfigError::NonPositiveLimit`]).
//! - The count is decremented **before** the target runs, so a failing target
//!   still consumes quota.
//! - The decrement is an atomic compare-and-swap: concurrent callers sharing one
//!   wrapper never exceed the quota.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use crate::calls::{Call, Site};
use crate::error::{CallError, ConfigError};

/// Call-count limiting policy.
pub struct LimitRun<W> {
    inner: W,
    limit: Option<u32>,
    left: AtomicU32,
}

impl<W> LimitRun<W> {
    /// Creates a quota of `limit` runs (`None` = unlimited).
    ///
    /// # Example
    /// ```
    /// use callvisor::{CallFn, ConfigError, LimitRun};
    ///
    /// let f = CallFn::new("noop", |_: ()| async { Ok::<(), callvisor::CallError>(()) });
    /// assert!(matches!(
    ///     LimitRun::new(f, Some(0)).err(),
    ///     Some(ConfigError::NonPositiveLimit { limit: 0 })
    /// ));
    /// ```
    pub fn new(inner: W, limit: Option<u32>) -> Result<Self, ConfigError> {
        if let Some(0) = limit {
            return Err(ConfigError::NonPositiveLimit { limit: 0 });
        }
        Ok(Self {
            inner,
            limit,
            left: AtomicU32::new(limit.unwrap_or(0)),
        })
    }

    /// Configured quota (`None` = unlimited).
    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    /// Runs left (`None` = unlimited).
    pub fn remaining(&self) -> Option<u32> {
        self.limit.map(|_| self.left.load(Ordering::Acquire))
    }

    /// Takes one run from the quota; `false` once it is used up.
    fn take(&self) -> bool {
        self.left
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl<A, W, T, E> Call<A> for LimitRun<W>
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
        if let Some(limit) = self.limit {
            if !self.take() {
                tracing::warn!(call = self.inner.name(), limit, "run quota exceeded");
                return Err(CallError::QuotaExceeded {
                    site: self.inner.site().clone(),
                    limit,
                }
                .into());
            }
        }
        self.inner.call(args).await
    }
}
