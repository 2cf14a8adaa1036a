//! # Shared wrapper defaults.
//!
//! Provides [`Config`]: centralized default settings for wrappers.
//!
//! Config is used through the `with_defaults` constructors, e.g.
//! `Retry::with_defaults(inner, &config)` or `Timeout::with_defaults(inner, &config)`.
//!
//! ## Sentinel values
//! - `timeout = 0s` → no timeout (treated as `None` by [`Config::default_timeout`])

use std::time::Duration;

/// Default settings for wrappers.
///
/// ## Field semantics
/// - `retries`: attempts per outer call for [`Retry`](crate::Retry)
/// - `timeout`: deadline for [`Timeout`](crate::Timeout) (`0s` = no deadline)
/// - `timeout_message`: message carried by [`CallError::Timeout`](crate::CallError::Timeout)
/// - `slow_down`: pause after each call for [`SlowDown`](crate::SlowDown)
/// - `factor`: scale applied to measured seconds (`1000.0` = milliseconds)
/// - `times`: target invocations per measured outer call
#[derive(Clone, Debug)]
pub struct Config {
    /// Attempts per outer call for the retry policy.
    pub retries: u32,

    /// Default deadline.
    ///
    /// - `Duration::ZERO` = no timeout
    /// - `> 0` = deadline applied per outer call
    pub timeout: Duration,

    /// Message of the timeout failure.
    pub timeout_message: String,

    /// Delay applied after each call by the slow-down policy.
    pub slow_down: Duration,

    /// Multiplier applied to elapsed seconds before reporting.
    pub factor: f64,

    /// Number of target invocations per measured outer call.
    pub times: u32,
}

impl Config {
    /// Returns the default deadline as an `Option`.
    ///
    /// - `None` → no timeout
    /// - `Some(d)` → deadline applied per outer call
    #[inline]
    pub fn default_timeout(&self) -> Option<Duration> {
        if self.timeout == Duration::ZERO {
            None
        } else {
            Some(self.timeout)
        }
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `retries = 1` (a single attempt)
    /// - `timeout = 0s` (no timeout)
    /// - `timeout_message = "Function call timed out"`
    /// - `slow_down = 1s`
    /// - `factor = 1000.0` (milliseconds)
    /// - `times = 1`
    fn default() -> Self {
        Self {
            retries: 1,
            timeout: Duration::from_secs(0),
            timeout_message: "Function call timed out".to_string(),
            slow_down: Duration::from_secs(1),
            factor: 1000.0,
            times: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_timeout_means_none() {
        assert_eq!(Config::default().default_timeout(), None);

        let cfg = Config {
            timeout: Duration::from_millis(250),
            ..Config::default()
        };
        assert_eq!(cfg.default_timeout(), Some(Duration::from_millis(250)));
    }
}
