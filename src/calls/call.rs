//! # Call abstraction.
//!
//! [`Call`] is the common contract every wrapper in this crate builds on: it
//! receives the arguments of one *outer call*, applies its policy, invokes the
//! inner target zero or more times and returns on its behalf.
//!
//! Multi-argument targets take a tuple, so `A = (u32, String)` stands for a
//! two-argument function. The output type is an associated type; resilience
//! policies require it to be `Result<T, E>` with `E: From<CallError>` so their
//! own failures travel in the target's error type.
//!
//! # Example
//! ```
//! use async_trait::async_trait;
//! use callvisor::{Call, Site};
//!
//! struct Double {
//!     site: Site,
//! }
//!
//! #[async_trait]
//! impl Call<u32> for Double {
//!     type Output = u32;
//!
//!     fn site(&self) -> &Site {
//!         &self.site
//!     }
//!
//!     async fn call(&self, n: u32) -> u32 {
//!         n * 2
//!     }
//! }
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let double = Double { site: Site::here("double") };
//! assert_eq!(double.call(21).await, 42);
//! assert_eq!(double.name(), "double");
//! # });
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::calls::site::Site;

/// Shared handle to a type-erased call.
pub type CallRef<A, O> = Arc<dyn Call<A, Output = O>>;

/// # An invocable unit with a stable identity.
///
/// Implementors must document how many times one outer call invokes the
/// wrapped target; side effects of the target happen in that order.
#[async_trait]
pub trait Call<A: Send + 'static>: Send + Sync + 'static {
    /// Value produced by one outer call.
    type Output: Send;

    /// Identity of the innermost target (wrappers forward it unchanged).
    fn site(&self) -> &Site;

    /// Display name of the innermost target.
    fn name(&self) -> &str {
        self.site().name()
    }

    /// Performs one outer call.
    async fn call(&self, args: A) -> Self::Output;
}

#[async_trait]
impl<A, C> Call<A> for Arc<C>
where
    A: Send + 'static,
    C: Call<A> + ?Sized,
{
    type Output = C::Output;

    fn site(&self) -> &Site {
        (**self).site()
    }

    async fn call(&self, args: A) -> Self::Output {
        (**self).call(args).await
    }
}
