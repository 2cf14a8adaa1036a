//! # Failure suppression.
//!
//! [`PassExcept`] turns every failure of its target into `None`: an `Err`
//! result as well as a panic raised while the call runs. Successful results
//! come back as `Some(value)`.
//!
//! ## Rules
//! - Never fails and never panics on behalf of the target.
//! - With `print_exception` set, each swallowed failure is reported as an
//!   [`EventKind::Suppressed`](crate::EventKind::Suppressed) event (best effort,
//!   purely for humans; nothing else reads it).
//! - A target returning `Option` cannot be told apart from a failure when it
//!   yields `Some(None)` vs `None` unless the caller keeps the outer layer.
//!
//! # Example
//! ```rust
//! use callvisor::{Call, CallError, CallFn, PassExcept};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let f = CallFn::new("do_sth", |_: ()| async { Err::<u8, _>(CallError::fail("boom")) });
//! let quiet = PassExcept::new(f, false);
//! assert_eq!(quiet.call(()).await, None);
//! # });
//! ```

use std::fmt::Display;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;

use crate::calls::{Call, Site};
use crate::events::{Event, EventKind};
use crate::subscribers::{Subscribe, default_subscriber, panic_message};

/// Exception-suppression policy.
pub struct PassExcept<W> {
    inner: W,
    print_exception: bool,
    subscriber: Arc<dyn Subscribe>,
}

impl<W> PassExcept<W> {
    /// Swallows failures; reports them to stderr when `print_exception` is set.
    pub fn new(inner: W, print_exception: bool) -> Self {
        Self {
            inner,
            print_exception,
            subscriber: default_subscriber(),
        }
    }

    /// Sends failure reports to `subscriber` instead of stderr.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscriber = subscriber;
        self
    }

    fn report(&self, site: &Site, reason: String) {
        tracing::debug!(call = site.name(), reason = %reason, "failure suppressed");
        if self.print_exception {
            self.subscriber.on_event(
                &Event::new(EventKind::Suppressed)
                    .with_call(site.name())
                    .with_site(site.to_string())
                    .with_reason(reason),
            );
        }
    }
}

#[async_trait]
impl<A, W, T, E> Call<A> for PassExcept<W>
where
    A: Send + 'static,
    W: Call<A, Output = Result<T, E>>,
    T: Send + 'static,
    E: Display + Send + 'static,
{
    type Output = Option<T>;

    fn site(&self) -> &Site {
        self.inner.site()
    }

    async fn call(&self, args: A) -> Option<T> {
        let site = self.inner.site();
        match AssertUnwindSafe(self.inner.call(args)).catch_unwind().await {
            Ok(Ok(v)) => Some(v),
            Ok(Err(e)) => {
                self.report(site, e.to_string());
                None
            }
            Err(panic_err) => {
                self.report(site, format!("panicked: {}", panic_message(&*panic_err)));
                None
            }
        }
    }
}
