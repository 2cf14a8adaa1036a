//! # Calendar clock.
//!
//! Freshness is decided per local calendar day. The [`Clock`] trait supplies
//! "today" and converts file timestamps to dates, so day boundaries can be
//! simulated without waiting for midnight.

use std::sync::{Mutex, PoisonError};
use std::time::SystemTime;

use chrono::{DateTime, Days, Local, NaiveDate};

/// Source of calendar dates.
pub trait Clock: Send + Sync + 'static {
    /// Current calendar date.
    fn today(&self) -> NaiveDate;

    /// Calendar date of a filesystem timestamp.
    fn date_of(&self, at: SystemTime) -> NaiveDate {
        DateTime::<Local>::from(at).date_naive()
    }
}

/// Local time zone clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock whose "today" is set by hand.
///
/// File timestamps are still converted with the local time zone, so a file
/// written now looks stale once the clock is advanced by a day.
///
/// # Example
/// ```
/// use callvisor::{Clock, ManualClock};
///
/// let clock = ManualClock::now();
/// let first = clock.today();
/// clock.advance(1);
/// assert_eq!(clock.today(), first.succ_opt().unwrap());
/// ```
#[derive(Debug)]
pub struct ManualClock {
    today: Mutex<NaiveDate>,
}

impl ManualClock {
    /// Starts at `date`.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            today: Mutex::new(date),
        }
    }

    /// Starts at the real local date.
    pub fn now() -> Self {
        Self::new(LocalClock.today())
    }

    /// Jumps to `date`.
    pub fn set(&self, date: NaiveDate) {
        *self.today.lock().unwrap_or_else(PoisonError::into_inner) = date;
    }

    /// Moves forward by `days` calendar days (saturating at the end of the calendar).
    pub fn advance(&self, days: u64) {
        let mut today = self.today.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(next) = today.checked_add_days(Days::new(days)) {
            *today = next;
        }
    }
}

impl Clock for ManualClock {
    fn today(&self) -> NaiveDate {
        *self.today.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
