//! # Function-backed call (`CallFn`)
//!
//! [`CallFn`] wraps a closure `F: Fn(A) -> Fut`, producing a fresh future per
//! outer call. The [`Site`] is captured where the closure is wrapped.
//!
//! ## Example
//! ```rust
//! use callvisor::{Call, CallFn};
//!
//! let add = CallFn::new("add", |(a, b): (i32, i32)| async move { a + b });
//! assert_eq!(add.name(), "add");
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! assert_eq!(add.call((2, 3)).await, 5);
//! # });
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::calls::call::Call;
use crate::calls::site::Site;

/// Function-backed call implementation.
pub struct CallFn<F> {
    site: Site,
    f: F,
}

impl<F> CallFn<F> {
    /// Wraps `f` under `name`, recording the caller's source location.
    #[track_caller]
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            site: Site::here(name),
            f,
        }
    }

    /// Wraps `f` with an explicit [`Site`].
    pub fn with_site(site: Site, f: F) -> Self {
        Self { site, f }
    }

    /// Creates the call and returns it as a shared handle.
    #[track_caller]
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self {
            site: Site::here(name),
            f,
        })
    }
}

impl<F> std::fmt::Debug for CallFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallFn").field("site", &self.site).finish()
    }
}

#[async_trait]
impl<A, F, Fut> Call<A> for CallFn<F>
where
    A: Send + 'static,
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future + Send + 'static,
    Fut::Output: Send,
{
    type Output = Fut::Output;

    fn site(&self) -> &Site {
        &self.site
    }

    async fn call(&self, args: A) -> Self::Output {
        (self.f)(args).await
    }
}

/// Wraps a named function as a [`CallFn`], using its identifier as the display name.
///
/// # Example
/// ```
/// use callvisor::{call_fn, Call};
///
/// async fn ping(_: ()) -> &'static str {
///     "pong"
/// }
///
/// let ping = call_fn!(ping);
/// assert_eq!(ping.name(), "ping");
/// ```
#[macro_export]
macro_rules! call_fn {
    ($f:ident) => {
        $crate::CallFn::new(stringify!($f), $f)
    };
}
