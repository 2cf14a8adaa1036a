//! Once-a-day query cache.
//!
//! ## Contents
//! - [`ReduceQuery`] two-tier (memory + CSV file) cache keyed on the calendar day
//! - [`Clock`]       source of "today"; [`LocalClock`] by default, [`ManualClock`] for tests and replays
//!
//! ## Quick wiring
//! ```text
//! CallFn("load_users") -> Result<Vec<Row>, E>
//!   └─► ReduceQuery("users.csv")
//!         memory ──► file ──► target   (first fresh tier wins)
//! ```

mod clock;
mod reduce_query;
mod store;

pub use clock::{Clock, LocalClock, ManualClock};
pub use reduce_query::ReduceQuery;
