//! Error types used by call wrappers.
//!
//! This module defines three error enums:
//!
//! - [`ConfigError`]: malformed policy configuration, returned eagerly when a
//!   wrapper is built (never at call time).
//! - [`CallError`]: failures a wrapper reports on behalf of an outer call.
//! - [`CacheError`]: I/O and codec failures of the freshness cache file.
//!
//! All of them provide helper methods (`as_label`, `as_message`) for logging.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::calls::Site;

/// # Errors produced while configuring a wrapper.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Retry budget must allow at least one attempt.
    #[error("retry budget must be at least 1")]
    ZeroRetries,

    /// Run quota must be positive (use `None` for unlimited).
    #[error("run quota must be positive, got {limit}")]
    NonPositiveLimit {
        /// The rejected quota.
        limit: u32,
    },

    /// Repeat count must be at least 1.
    #[error("repeat count must be at least 1")]
    ZeroRepeat,

    /// Instrumentation must run the target at least once.
    #[error("measured call count must be at least 1")]
    ZeroTimes,

    /// Scale factor must be finite and positive.
    #[error("scale factor must be finite and positive, got {factor}")]
    InvalidFactor {
        /// The rejected factor.
        factor: f64,
    },

    /// A measurement cannot be returned by inactive instrumentation.
    #[error("cannot return a measurement from inactive instrumentation")]
    InactiveMeasurement,

    /// Freshness cache needs a file path.
    #[error("cache file path is empty")]
    EmptyCachePath,
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use callvisor::ConfigError;
    ///
    /// assert_eq!(ConfigError::ZeroRetries.as_label(), "config_zero_retries");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::ZeroRetries => "config_zero_retries",
            ConfigError::NonPositiveLimit { .. } => "config_non_positive_limit",
            ConfigError::ZeroRepeat => "config_zero_repeat",
            ConfigError::ZeroTimes => "config_zero_times",
            ConfigError::InvalidFactor { .. } => "config_invalid_factor",
            ConfigError::InactiveMeasurement => "config_inactive_measurement",
            ConfigError::EmptyCachePath => "config_empty_cache_path",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        self.to_string()
    }
}

/// # Errors produced by the freshness cache file tier.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CacheError {
    /// Reading, writing or inspecting the cache file failed.
    #[error("cache file {path:?}: {source}")]
    Io {
        /// Cache file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The cache file could not be encoded or decoded as delimited text.
    #[error("cache file {path:?} is not valid delimited text: {source}")]
    Csv {
        /// Cache file path.
        path: PathBuf,
        /// Underlying codec error.
        #[source]
        source: csv::Error,
    },
}

impl CacheError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            CacheError::Io { .. } => "cache_io",
            CacheError::Csv { .. } => "cache_csv",
        }
    }

    /// Path of the cache file involved.
    pub fn path(&self) -> &std::path::Path {
        match self {
            CacheError::Io { path, .. } | CacheError::Csv { path, .. } => path,
        }
    }
}

/// # Errors produced by an outer call.
///
/// Policy failures (`RetriesExhausted`, `QuotaExceeded`, `Timeout`, `Cache`) are
/// raised by wrappers; `Fail` is a plain target failure for closures that don't
/// carry their own error type.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CallError {
    /// Every attempt of the retry budget failed with a retryable error.
    #[error("{site} exceeds {attempts} retries")]
    RetriesExhausted {
        /// Wrapped target.
        site: Site,
        /// Attempts made (the configured budget).
        attempts: u32,
    },

    /// The shared run quota is used up.
    #[error("{site} exceeds maximum run of {limit} times")]
    QuotaExceeded {
        /// Wrapped target.
        site: Site,
        /// Configured quota.
        limit: u32,
    },

    /// The call did not finish before its deadline.
    #[error("{message}")]
    Timeout {
        /// Caller-supplied message.
        message: String,
        /// The deadline that elapsed.
        timeout: Duration,
    },

    /// The target failed.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The freshness cache file could not be used.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl CallError {
    /// Shorthand for [`CallError::Fail`].
    pub fn fail(error: impl Into<String>) -> Self {
        CallError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use callvisor::CallError;
    /// use std::time::Duration;
    ///
    /// let err = CallError::Timeout { message: "slow".into(), timeout: Duration::from_secs(1) };
    /// assert_eq!(err.as_label(), "call_timeout");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            CallError::RetriesExhausted { .. } => "call_retries_exhausted",
            CallError::QuotaExceeded { .. } => "call_quota_exceeded",
            CallError::Timeout { .. } => "call_timeout",
            CallError::Fail { .. } => "call_failed",
            CallError::Cache(_) => "call_cache",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            CallError::RetriesExhausted { site, attempts } => {
                format!("retries exhausted: {site} after {attempts} attempts")
            }
            CallError::QuotaExceeded { site, limit } => {
                format!("quota exceeded: {site} limit={limit}")
            }
            CallError::Timeout { message, timeout } => format!("timeout {timeout:?}: {message}"),
            CallError::Fail { error } => format!("error: {error}"),
            CallError::Cache(e) => format!("cache: {e}"),
        }
    }

    /// Indicates whether the error was raised by a wrapper rather than the target.
    ///
    /// # Example
    /// ```
    /// use callvisor::CallError;
    ///
    /// assert!(!CallError::fail("boom").is_policy());
    /// ```
    pub fn is_policy(&self) -> bool {
        !matches!(self, CallError::Fail { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retries_exhausted_names_site_and_budget() {
        let err = CallError::RetriesExhausted {
            site: Site::new("do_sth", "jobs.rs", 9),
            attempts: 3,
        };
        assert_eq!(err.to_string(), "do_sth() in jobs.rs, line 9 exceeds 3 retries");
        assert!(err.is_policy());
    }

    #[test]
    fn test_quota_exceeded_message() {
        let err = CallError::QuotaExceeded {
            site: Site::new("do_sth", "jobs.rs", 9),
            limit: 2,
        };
        assert_eq!(
            err.to_string(),
            "do_sth() in jobs.rs, line 9 exceeds maximum run of 2 times"
        );
        assert_eq!(err.as_label(), "call_quota_exceeded");
    }

    #[test]
    fn test_timeout_displays_caller_message() {
        let err = CallError::Timeout {
            message: "Function call timed out".into(),
            timeout: Duration::from_secs(1),
        };
        assert_eq!(err.to_string(), "Function call timed out");
    }

    #[test]
    fn test_config_labels_are_distinct() {
        let labels = [
            ConfigError::ZeroRetries.as_label(),
            ConfigError::NonPositiveLimit { limit: 0 }.as_label(),
            ConfigError::ZeroRepeat.as_label(),
            ConfigError::ZeroTimes.as_label(),
            ConfigError::InvalidFactor { factor: 0.0 }.as_label(),
            ConfigError::InactiveMeasurement.as_label(),
            ConfigError::EmptyCachePath.as_label(),
        ];
        let mut unique = labels.to_vec();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), labels.len());
    }
}
