//! # LogWriter: diagnostic stream printer
//!
//! [`LogWriter`] renders incoming [`Event`]s as text on stderr. It is the
//! default subscriber of every wrapper that produces output.
//!
//! ## Example output
//! ```text
//! Runtime of crop                           146.19160 ms
//! Runtime of x3 remove_text                   3316.30707 ms
//! ######################### 0 ##########################
//! [suppressed] call="do_sth" site="do_sth() in src/jobs.rs, line 12" err="boom"
//! ```

use std::io::Write;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Width of the separator rule.
const SPLIT_WIDTH: usize = 54;

/// Event writer subscriber.
#[derive(Default, Debug, Clone, Copy)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Renders an event as the line written to the diagnostic stream.
    ///
    /// # Example
    /// ```
    /// use callvisor::{Event, LogWriter};
    ///
    /// let line = LogWriter::render(&Event::measured("test", 1, 100.38185, "ms"));
    /// assert_eq!(line, "Runtime of test                           100.38185 ms");
    /// ```
    pub fn render(e: &Event) -> String {
        let call = e.call.as_deref().unwrap_or("unknown");
        match e.kind {
            EventKind::Measured => {
                let prefix = match e.times {
                    Some(n) if n > 1 => format!("x{n} "),
                    _ => String::new(),
                };
                format!(
                    "Runtime of {prefix}{call:<30}{value:>10.5} {unit}",
                    value = e.value.unwrap_or_default(),
                    unit = e.unit.unwrap_or("ms"),
                )
            }
            EventKind::Split => {
                let label = format!(" {} ", e.split.unwrap_or_default());
                format!("{label:#^width$}", width = SPLIT_WIDTH)
            }
            EventKind::Suppressed => format!(
                "[suppressed] call={call:?} site={:?} err={:?}",
                e.site.as_deref().unwrap_or(call),
                e.reason.as_deref().unwrap_or("unknown"),
            ),
        }
    }
}

impl Subscribe for LogWriter {
    fn on_event(&self, e: &Event) {
        let line = Self::render(e);
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_run_has_no_count_prefix() {
        let line = LogWriter::render(&Event::measured("crop", 1, 146.1916, "ms"));
        assert_eq!(line, "Runtime of crop                           146.19160 ms");
    }

    #[test]
    fn test_repeated_run_shows_count() {
        let line = LogWriter::render(&Event::measured("crop", 3, 2.5, "ms"));
        assert!(line.starts_with("Runtime of x3 crop"));
        assert!(line.ends_with("   2.50000 ms"));
    }

    #[test]
    fn test_split_is_centred_rule() {
        let line = LogWriter::render(&Event::split("full_flow", 0));
        assert_eq!(line.chars().count(), SPLIT_WIDTH);
        assert!(line.contains(" 0 "));
        assert!(line.starts_with("#########################"));
        assert!(line.ends_with("#########################"));
    }

    #[test]
    fn test_suppressed_includes_reason() {
        let ev = Event::new(EventKind::Suppressed)
            .with_call("do_sth")
            .with_site("do_sth() in a.rs, line 1")
            .with_reason("boom");
        assert_eq!(
            LogWriter::render(&ev),
            r#"[suppressed] call="do_sth" site="do_sth() in a.rs, line 1" err="boom""#
        );
    }
}
