//! # Call site identity used in diagnostics.
//!
//! A [`Site`] names the wrapped target and records where it was turned into a
//! [`Call`](crate::Call). Every wrapper forwards the innermost target's site, so
//! errors and log lines always point at the user's function, not at a wrapper.
//!
//! ## Format
//! ```text
//! load_users() in src/jobs.rs, line 42
//! ```

use std::borrow::Cow;
use std::fmt;
use std::panic::Location;

/// Display name plus source location of a wrapped target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Site {
    name: Cow<'static, str>,
    file: &'static str,
    line: u32,
}

impl Site {
    /// Captures the caller's source location under the given name.
    ///
    /// # Example
    /// ```
    /// use callvisor::Site;
    ///
    /// let site = Site::here("load_users");
    /// assert_eq!(site.name(), "load_users");
    /// assert!(site.to_string().starts_with("load_users() in "));
    /// ```
    #[track_caller]
    pub fn here(name: impl Into<Cow<'static, str>>) -> Self {
        let loc = Location::caller();
        Self {
            name: name.into(),
            file: loc.file(),
            line: loc.line(),
        }
    }

    /// Builds a site from explicit parts.
    pub fn new(name: impl Into<Cow<'static, str>>, file: &'static str, line: u32) -> Self {
        Self {
            name: name.into(),
            file,
            line,
        }
    }

    /// Display name of the target.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source file the target was wrapped in.
    pub fn file(&self) -> &'static str {
        self.file
    }

    /// Line the target was wrapped on.
    pub fn line(&self) -> u32 {
        self.line
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}() in {}, line {}", self.name, self.file, self.line)
    }
}
