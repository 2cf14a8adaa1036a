//! # Wall-clock instrumentation.
//!
//! [`Measure`] runs its target `times` times back to back, measures the total
//! elapsed time, reports it and returns the target's last result.
//! [`MeasureElapsed`] does the same but returns the scaled duration instead.
//!
//! ## Flow
//! ```text
//! call(args)
//!   ├─► start = now
//!   ├─► target(args) × times        (results of runs 1..times-1 are dropped)
//!   ├─► elapsed = (now - start) × factor
//!   ├─► [split_before] Split { n }  ─► n += 1
//!   ├─► Measured { call, times, elapsed, unit }
//!   ├─► [split_after]  Split { n }  ─► n += 1
//!   └─► last result | elapsed
//! ```
//!
//! ## Rules
//! - Every run executes even if an earlier one returned an error; only the
//!   last run's output reaches the caller.
//! - The separator counter starts at 0 and belongs to the wrapper; wrappers
//!   handed out by one [`Timing`](crate::Timing) share a single counter.
//! - `active = false` makes [`Measure`] a plain pass-through (no clock, no
//!   events, single run).

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::time::Instant;

use crate::calls::{Call, Site};
use crate::config::Config;
use crate::error::ConfigError;
use crate::events::Event;
use crate::subscribers::{Subscribe, default_subscriber};

/// Instrumentation settings.
///
/// ## Field semantics
/// - `times`: target invocations per outer call (`>= 1`)
/// - `factor`: multiplier applied to elapsed seconds (`1000.0` = milliseconds)
/// - `split_before` / `split_after`: emit a numbered separator around the timing line
/// - `active`: `false` disables instrumentation entirely
#[derive(Clone, Debug, PartialEq)]
pub struct MeasureOptions {
    pub times: u32,
    pub factor: f64,
    pub split_before: bool,
    pub split_after: bool,
    pub active: bool,
}

impl Default for MeasureOptions {
    /// One run, milliseconds, no separators, active.
    fn default() -> Self {
        Self {
            times: 1,
            factor: 1000.0,
            split_before: false,
            split_after: false,
            active: true,
        }
    }
}

impl MeasureOptions {
    /// Takes `times` and `factor` from the shared [`Config`].
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            times: cfg.times,
            factor: cfg.factor,
            ..Self::default()
        }
    }

    /// Sets the number of runs per outer call.
    pub fn times(mut self, times: u32) -> Self {
        self.times = times;
        self
    }

    /// Sets the scale factor.
    pub fn factor(mut self, factor: f64) -> Self {
        self.factor = factor;
        self
    }

    /// Emits a separator before the timing line.
    pub fn split_before(mut self) -> Self {
        self.split_before = true;
        self
    }

    /// Emits a separator after the timing line.
    pub fn split_after(mut self) -> Self {
        self.split_after = true;
        self
    }

    /// Enables or disables instrumentation.
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Checks the options; an inactive configuration is always valid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.active {
            return Ok(());
        }
        if self.times == 0 {
            return Err(ConfigError::ZeroTimes);
        }
        if !self.factor.is_finite() || self.factor <= 0.0 {
            return Err(ConfigError::InvalidFactor {
                factor: self.factor,
            });
        }
        Ok(())
    }

    /// Unit label matching the scale factor.
    pub fn unit(&self) -> &'static str {
        match self.factor {
            f if f == 1.0 => "s",
            f if f == 1e3 => "ms",
            f if f == 1e6 => "us",
            f if f == 1e9 => "ns",
            _ => "units",
        }
    }
}

/// Separator counter, shared by clones.
#[derive(Clone, Debug, Default)]
pub(crate) struct SplitCounter(Arc<AtomicU64>);

impl SplitCounter {
    /// Returns the current number and advances the counter.
    pub(crate) fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }

    /// Separators emitted so far.
    pub(crate) fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Clock, counter and output shared by both measuring wrappers.
struct Meter {
    opts: MeasureOptions,
    splits: SplitCounter,
    subscriber: Arc<dyn Subscribe>,
}

impl Meter {
    /// Runs `inner` `times` times; returns the last output and the scaled duration.
    async fn run<A, W>(&self, inner: &W, args: A) -> (W::Output, f64)
    where
        A: Clone + Send + 'static,
        W: Call<A>,
    {
        let start = Instant::now();
        for _ in 1..self.opts.times {
            let run_args = args.clone();
            let _ = inner.call(run_args).await;
        }
        let out = inner.call(args).await;
        let value = start.elapsed().as_secs_f64() * self.opts.factor;

        let name = inner.name();
        if self.opts.split_before {
            self.subscriber.on_event(&Event::split(name, self.splits.next()));
        }
        self.subscriber.on_event(&Event::measured(
            name,
            self.opts.times,
            value,
            self.opts.unit(),
        ));
        if self.opts.split_after {
            self.subscriber.on_event(&Event::split(name, self.splits.next()));
        }
        (out, value)
    }
}

/// Instrumentation returning the target's result.
///
/// Outputs of all runs but the last are dropped, `Err` included: with
/// `times = 3` a failure in run 1 is not reported if run 3 succeeds. Wrap the
/// target in [`Repeat`](crate::Repeat) first to stop at the first failure.
pub struct Measure<W> {
    inner: W,
    meter: Meter,
}

impl<W> Measure<W> {
    /// Instruments `inner` with its own separator counter.
    ///
    /// # Example
    /// ```rust
    /// use callvisor::{Call, CallFn, Measure, MeasureOptions};
    ///
    /// # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
    /// let f = CallFn::new("test", |_: ()| async { "yay" });
    /// let timed = Measure::new(f, MeasureOptions::default().times(3)).unwrap();
    /// assert_eq!(timed.call(()).await, "yay");
    /// # });
    /// ```
    pub fn new(inner: W, opts: MeasureOptions) -> Result<Self, ConfigError> {
        Self::with_counter(inner, opts, SplitCounter::default())
    }

    /// Uses [`Config::times`] and [`Config::factor`].
    pub fn with_defaults(inner: W, cfg: &Config) -> Result<Self, ConfigError> {
        Self::new(inner, MeasureOptions::from_config(cfg))
    }

    pub(crate) fn with_counter(
        inner: W,
        opts: MeasureOptions,
        splits: SplitCounter,
    ) -> Result<Self, ConfigError> {
        opts.validate()?;
        Ok(Self::from_parts(inner, opts, splits))
    }

    /// Builds the wrapper from options that were already validated.
    pub(crate) fn from_parts(inner: W, opts: MeasureOptions, splits: SplitCounter) -> Self {
        Self {
            inner,
            meter: Meter {
                opts,
                splits,
                subscriber: default_subscriber(),
            },
        }
    }

    /// Sends timing lines and separators to `subscriber` instead of stderr.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.meter.subscriber = subscriber;
        self
    }

    /// Active options.
    pub fn options(&self) -> &MeasureOptions {
        &self.meter.opts
    }

    /// Separators emitted so far by this wrapper's counter.
    pub fn splits(&self) -> u64 {
        self.meter.splits.get()
    }
}

#[async_trait]
impl<A, W> Call<A> for Measure<W>
where
    A: Clone + Send + 'static,
    W: Call<A>,
{
    type Output = W::Output;

    fn site(&self) -> &Site {
        self.inner.site()
    }

    async fn call(&self, args: A) -> W::Output {
        if !self.meter.opts.active {
            return self.inner.call(args).await;
        }
        let (out, _) = self.meter.run(&self.inner, args).await;
        out
    }
}

/// Instrumentation returning the scaled duration.
///
/// The target's own output is dropped after the last run.
pub struct MeasureElapsed<W> {
    inner: W,
    meter: Meter,
}

impl<W> MeasureElapsed<W> {
    /// Instruments `inner`; rejects `active = false` because there would be
    /// nothing to return.
    pub fn new(inner: W, opts: MeasureOptions) -> Result<Self, ConfigError> {
        Self::with_counter(inner, opts, SplitCounter::default())
    }

    pub(crate) fn with_counter(
        inner: W,
        opts: MeasureOptions,
        splits: SplitCounter,
    ) -> Result<Self, ConfigError> {
        if !opts.active {
            return Err(ConfigError::InactiveMeasurement);
        }
        opts.validate()?;
        Ok(Self {
            inner,
            meter: Meter {
                opts,
                splits,
                subscriber: default_subscriber(),
            },
        })
    }

    /// Sends timing lines and separators to `subscriber` instead of stderr.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.meter.subscriber = subscriber;
        self
    }

    /// Active options.
    pub fn options(&self) -> &MeasureOptions {
        &self.meter.opts
    }
}

#[async_trait]
impl<A, W> Call<A> for MeasureElapsed<W>
where
    A: Clone + Send + 'static,
    W: Call<A>,
{
    type Output = f64;

    fn site(&self) -> &Site {
        self.inner.site()
    }

    async fn call(&self, args: A) -> f64 {
        let (_, value) = self.meter.run(&self.inner, args).await;
        value
    }
}
