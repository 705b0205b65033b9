//! Background CPU load sampler.
//!
//! Once per interval the sampler reads cumulative tick counters, turns the
//! delta since the previous reading into an idle fraction, and publishes
//! `num_cpus * idle_fraction` to the [`CapacityGauge`]. Bad readings never
//! stop the loop: the previous estimate simply stays in place.
//!
//! In the running loop each read happens on the blocking pool, so a slow or
//! stuck source never holds a runtime worker and never delays cancellation.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::core::{CapacityGauge, SamplerError};
use crate::infra::{CpuTickSource, CpuTicks};
use crate::util::Throttle;

/// What one sampling step did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleOutcome {
    /// First successful reading; stored as the baseline, nothing published.
    Baseline,
    /// A new estimate was published.
    Published {
        /// Idle share of all ticks since the previous reading.
        idle_fraction: f64,
        /// Whether this step emitted the high-load warning.
        warned: bool,
    },
    /// No tick progress since the previous reading; estimate kept.
    Stalled,
    /// Counters went backwards; re-baselined, estimate kept.
    CounterReset,
    /// The source failed; estimate and baseline kept.
    ReadFailed,
}

/// Shortest interval the sampler will tick at.
pub const MIN_SAMPLE_INTERVAL: Duration = Duration::from_millis(1);

/// Periodic idle-capacity estimator feeding a shared gauge.
pub struct CpuSampler<T> {
    source: Arc<Mutex<T>>,
    gauge: Arc<CapacityGauge>,
    interval: Duration,
    high_load_idle_fraction: f64,
    warning: Throttle,
    prev: Option<CpuTicks>,
    unsupported_reported: bool,
}

impl<T> CpuSampler<T>
where
    T: CpuTickSource,
{
    /// Sampler publishing to `gauge` every `interval`, warning when the idle
    /// fraction drops below `high_load_idle_fraction` at most once per
    /// `warning_cooldown`. A zero `interval` is raised to
    /// [`MIN_SAMPLE_INTERVAL`].
    pub fn new(
        source: T,
        gauge: Arc<CapacityGauge>,
        interval: Duration,
        high_load_idle_fraction: f64,
        warning_cooldown: Duration,
    ) -> Self {
        Self {
            source: Arc::new(Mutex::new(source)),
            gauge,
            interval: interval.max(MIN_SAMPLE_INTERVAL),
            high_load_idle_fraction,
            warning: Throttle::new(warning_cooldown),
            prev: None,
            unsupported_reported: false,
        }
    }

    /// Read the source once on the calling thread and fold the result into
    /// the gauge.
    pub fn sample(&mut self, now: Instant) -> SampleOutcome {
        let reading = self.source.lock().read();
        self.record(reading, now)
    }

    /// Fold a read result into the gauge.
    pub fn record(&mut self, reading: Result<CpuTicks, SamplerError>, now: Instant) -> SampleOutcome {
        match reading {
            Ok(ticks) => self.observe(ticks, now),
            Err(SamplerError::Unsupported) if !self.unsupported_reported => {
                self.unsupported_reported = true;
                tracing::warn!(
                    "cpu tick counters unavailable; idle estimate stays at 0 and all requests are rejected"
                );
                SampleOutcome::ReadFailed
            }
            Err(e) => {
                tracing::debug!(error = %e, "cpu tick read failed, keeping previous estimate");
                SampleOutcome::ReadFailed
            }
        }
    }

    /// Fold one reading into the gauge.
    pub fn observe(&mut self, current: CpuTicks, now: Instant) -> SampleOutcome {
        let Some(prev) = self.prev else {
            self.prev = Some(current);
            return SampleOutcome::Baseline;
        };

        let (Some(total_delta), Some(idle_delta)) = (
            current.total.checked_sub(prev.total),
            current.idle.checked_sub(prev.idle),
        ) else {
            tracing::debug!(?prev, ?current, "cpu counters went backwards, re-baselining");
            self.prev = Some(current);
            return SampleOutcome::CounterReset;
        };

        if total_delta == 0 {
            tracing::debug!("no cpu tick progress, skipping sample");
            return SampleOutcome::Stalled;
        }

        #[allow(clippy::cast_precision_loss)]
        let idle_fraction = (idle_delta as f64 / total_delta as f64).min(1.0);
        self.gauge.publish_idle_fraction(idle_fraction);
        self.prev = Some(current);

        let mut warned = false;
        if idle_fraction < self.high_load_idle_fraction && self.warning.try_fire(now) {
            tracing::warn!(load = (1.0 - idle_fraction) * 100.0, "high cpu load");
            warned = true;
        }

        SampleOutcome::Published {
            idle_fraction,
            warned,
        }
    }

    /// Run until `cancel` fires. Takes a baseline immediately, then samples
    /// once per interval; exits within one interval of cancellation.
    pub async fn run(mut self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            interval_ms = u64::try_from(self.interval.as_millis()).unwrap_or(u64::MAX),
            num_cpus = self.gauge.num_cpus(),
            "cpu sampler started"
        );

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let source = Arc::clone(&self.source);
            let read = tokio::task::spawn_blocking(move || {
                let mut source = source.lock();
                source.read()
            });
            let reading = tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                joined = read => joined.unwrap_or_else(|e| Err(SamplerError::Task(e.to_string()))),
            };
            self.record(reading, Instant::now());
        }

        tracing::info!("cpu sampler stopped");
    }

    /// Gauge this sampler publishes to.
    pub fn gauge(&self) -> &Arc<CapacityGauge> {
        &self.gauge
    }

    /// Effective tick interval.
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}
