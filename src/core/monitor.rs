//! The capacity monitor: one owning object for the gauge, the ledger and the
//! decision engine, shared by handle with every caller.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::MonitorConfig;
use crate::core::{
    AdmissionDecision, AdmissionEngine, CapacityGauge, CostClass, CpuSampler, PledgeTicket,
    ReservationLedger, Spawn,
};
use crate::infra::CpuTickSource;

/// Admission control for one host.
///
/// ```rust,ignore
/// use cpu_admission::config::MonitorConfig;
/// use cpu_admission::core::{CapacityMonitor, CostClass};
/// use cpu_admission::infra::ProcStatSource;
/// use cpu_admission::runtime::TokioSpawner;
/// use tokio_util::sync::CancellationToken;
///
/// let monitor = CapacityMonitor::new(&MonitorConfig::default(), TokioSpawner::try_current()?);
/// let cancel = CancellationToken::new();
/// let sampler = monitor.start(ProcStatSource::new(), cancel.clone());
///
/// if monitor.can_accept(CostClass::Track) {
///     monitor.accept(CostClass::Track);
///     // start the job
/// }
/// ```
pub struct CapacityMonitor<S> {
    gauge: Arc<CapacityGauge>,
    ledger: ReservationLedger<S>,
    engine: AdmissionEngine,
    config: MonitorConfig,
}

impl<S> CapacityMonitor<S>
where
    S: Spawn,
{
    /// Monitor configured by `config`, scheduling pledge releases on `spawner`.
    ///
    /// The config is assumed valid; use [`crate::builders::build_monitor`] to
    /// validate first. A zero sample interval is still safe to start: the
    /// sampler raises it to [`crate::core::sampler::MIN_SAMPLE_INTERVAL`].
    pub fn new(config: &MonitorConfig, spawner: S) -> Self {
        let gauge = config
            .num_cpus
            .map_or_else(CapacityGauge::for_host, CapacityGauge::new);
        Self {
            gauge: Arc::new(gauge),
            ledger: ReservationLedger::new(config.pledge_hold(), spawner),
            engine: AdmissionEngine::new(config.classes.clone()),
            config: config.clone(),
        }
    }

    /// Start the sampler on the current tokio runtime. It publishes to this
    /// monitor's gauge until `cancel` fires.
    pub fn start<T: CpuTickSource>(&self, source: T, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.sampler(source).run(cancel))
    }

    /// Build a sampler wired to this monitor's gauge without spawning it.
    pub fn sampler<T: CpuTickSource>(&self, source: T) -> CpuSampler<T> {
        CpuSampler::new(
            source,
            Arc::clone(&self.gauge),
            self.config.sample_interval(),
            self.config.high_load_idle_fraction,
            self.config.warning_cooldown(),
        )
    }

    /// Whether a request of `class` fits in the capacity left after pending pledges.
    pub fn can_accept(&self, class: CostClass) -> bool {
        self.engine.can_accept(&self.gauge, &self.ledger, class)
    }

    /// Full decision record for `class`.
    pub fn evaluate(&self, class: CostClass) -> AdmissionDecision {
        self.engine.evaluate(&self.gauge, &self.ledger, class)
    }

    /// Pledge capacity for a request of `class` that is being started.
    pub fn accept(&self, class: CostClass) -> Option<PledgeTicket> {
        self.engine.accept(&self.ledger, class)
    }

    /// [`can_accept`](Self::can_accept) keyed by request variant name.
    /// Unrecognized names are rejected.
    pub fn can_accept_kind(&self, kind: &str) -> bool {
        match CostClass::from_str(kind) {
            Ok(class) => self.can_accept(class),
            Err(e) => {
                tracing::debug!(error = %e, accepted = false, "cpu request");
                false
            }
        }
    }

    /// [`accept`](Self::accept) keyed by request variant name. Unrecognized
    /// names pledge nothing.
    pub fn accept_kind(&self, kind: &str) -> Option<PledgeTicket> {
        CostClass::from_str(kind).ok().and_then(|class| self.accept(class))
    }
}

impl<S> CapacityMonitor<S> {
    /// Host load in percent, `[0, 100]`.
    pub fn load_percent(&self) -> f64 {
        self.gauge.load_percent()
    }

    /// Idle cores as last published by the sampler.
    pub fn idle_cpus(&self) -> f64 {
        self.gauge.idle_cpus()
    }

    /// Cores pledged to recently accepted requests.
    pub fn pending_cpus(&self) -> f64 {
        self.ledger.pending()
    }

    /// Idle minus pending. Negative when over-pledged.
    pub fn available_cpus(&self) -> f64 {
        self.idle_cpus() - self.pending_cpus()
    }

    /// Core count the gauge was sized for.
    pub fn num_cpus(&self) -> f64 {
        self.gauge.num_cpus()
    }

    /// Pledges still waiting for release.
    pub fn outstanding_pledges(&self) -> usize {
        self.ledger.outstanding()
    }

    /// Shared gauge handle.
    pub const fn gauge(&self) -> &Arc<CapacityGauge> {
        &self.gauge
    }

    /// Decision engine in use.
    pub const fn engine(&self) -> &AdmissionEngine {
        &self.engine
    }

    /// Configuration the monitor was built from.
    pub const fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Sampling cadence.
    pub fn sample_interval(&self) -> Duration {
        self.config.sample_interval()
    }
}
