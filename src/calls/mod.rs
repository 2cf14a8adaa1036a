//! Call abstraction, function adapter and combinators.
//!
//! ## Contents
//! - [`Call`]    the contract every wrapper implements
//! - [`CallFn`]  closure adapter (`call_fn!` derives the name from a function)
//! - [`Site`]    target name and source location used in diagnostics
//! - [`CallExt`] wrapper constructors as methods

mod call;
mod call_fn;
mod ext;
mod site;

pub use call::{Call, CallRef};
pub use call_fn::CallFn;
pub use ext::CallExt;
pub use site::Site;
