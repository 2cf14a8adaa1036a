//! # Shared instrumentation.
//!
//! A [`Timing`] instance holds one set of [`MeasureOptions`] and one separator
//! counter. Every wrapper it hands out reports through the same counter, so a
//! pipeline whose stages are timed by one instance prints one continuously
//! numbered sequence of separators.
//!
//! ```text
//! Runtime of crop                           146.19160 ms
//! Runtime of remove_text                   3316.30707 ms
//! Runtime of full_flow                     4403.89156 ms
//! ######################### 0 ##########################
//! Runtime of crop                            72.94130 ms
//! Runtime of remove_text                   1034.61838 ms
//! Runtime of full_flow                     1443.43138 ms
//! ######################### 1 ##########################
//! ```

use std::sync::Arc;

use crate::error::ConfigError;
use crate::subscribers::{Subscribe, default_subscriber};
use crate::timing::measure::{Measure, MeasureElapsed, MeasureOptions, SplitCounter};

/// Instrumentation object sharing one separator counter between wrappers.
pub struct Timing {
    opts: MeasureOptions,
    splits: SplitCounter,
    subscriber: Arc<dyn Subscribe>,
}

impl Timing {
    /// Validates `opts` once for every wrapper this instance will produce.
    pub fn new(opts: MeasureOptions) -> Result<Self, ConfigError> {
        opts.validate()?;
        Ok(Self {
            opts,
            splits: SplitCounter::default(),
            subscriber: default_subscriber(),
        })
    }

    /// Routes the output of every wrapper created afterwards to `subscriber`.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscriber = subscriber;
        self
    }

    /// Instruments `inner`, returning its result.
    pub fn wrap<W>(&self, inner: W) -> Measure<W> {
        Measure::from_parts(inner, self.opts.clone(), self.splits.clone())
            .with_subscriber(self.subscriber.clone())
    }

    /// Instruments `inner`, returning the scaled duration.
    pub fn wrap_elapsed<W>(&self, inner: W) -> Result<MeasureElapsed<W>, ConfigError> {
        Ok(
            MeasureElapsed::with_counter(inner, self.opts.clone(), self.splits.clone())?
                .with_subscriber(self.subscriber.clone()),
        )
    }

    /// Separators emitted so far by all wrappers of this instance.
    pub fn runs(&self) -> u64 {
        self.splits.get()
    }

    /// Shared options.
    pub fn options(&self) -> &MeasureOptions {
        &self.opts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calls::{Call, CallFn};
    use crate::events::EventKind;
    use crate::subscribers::Recorder;
    use std::time::Duration;
    use tokio::time;

    fn stage(name: &'static str, ms: u64) -> impl Call<(), Output = &'static str> {
        CallFn::new(name, move |_: ()| async move {
            time::sleep(Duration::from_millis(ms)).await;
            name
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrappers_share_one_counter() {
        let rec = Recorder::shared();
        let timing = Timing::new(MeasureOptions::default().split_after())
            .unwrap()
            .with_subscriber(rec.clone());

        let crop = timing.wrap(stage("crop", 5));
        let remove_text = timing.wrap(stage("remove_text", 7));

        assert_eq!(crop.call(()).await, "crop");
        assert_eq!(remove_text.call(()).await, "remove_text");
        assert_eq!(crop.call(()).await, "crop");

        assert_eq!(rec.splits(), vec![0, 1, 2]);
        assert_eq!(timing.runs(), 3);

        let names: Vec<_> = rec
            .events()
            .into_iter()
            .filter(|e| e.kind == EventKind::Measured)
            .filter_map(|e| e.call.map(|c| c.to_string()))
            .collect();
        assert_eq!(names, vec!["crop", "remove_text", "crop"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrap_elapsed_returns_duration() {
        let rec = Recorder::shared();
        let timing = Timing::new(MeasureOptions::default().times(2))
            .unwrap()
            .with_subscriber(rec.clone());

        let ms = timing.wrap_elapsed(stage("crop", 50)).unwrap().call(()).await;
        assert!((100.0..110.0).contains(&ms), "ms = {ms}");
        assert_eq!(rec.events()[0].times, Some(2));
    }

    #[tokio::test]
    async fn test_inactive_instance_passes_through() {
        let rec = Recorder::shared();
        let timing = Timing::new(MeasureOptions::default().active(false))
            .unwrap()
            .with_subscriber(rec.clone());

        assert_eq!(timing.wrap(stage("crop", 0)).call(()).await, "crop");
        assert!(rec.events().is_empty());
        assert_eq!(
            timing.wrap_elapsed(stage("crop", 0)).err(),
            Some(ConfigError::InactiveMeasurement)
        );
    }

    #[test]
    fn test_invalid_options_fail_once_at_construction() {
        assert!(matches!(
            Timing::new(MeasureOptions::default().times(0)),
            Err(ConfigError::ZeroTimes)
        ));
    }
}
