//! Builders for the capacity monitor and its diagnostic profiles.

use std::sync::Arc;

use crate::config::MonitorConfig;
use crate::core::{CapacityMonitor, ConfigError, Spawn};
use crate::profile::{CapacitySnapshot, LoadTraceProfiler, ProfileRegistry};

/// Name the capacity snapshot is registered under.
pub const CAPACITY_PROFILE_NAME: &str = "capacity";

/// Validate `cfg` and build a monitor scheduling pledge releases on `spawner`.
pub fn build_monitor<S>(cfg: &MonitorConfig, spawner: S) -> Result<CapacityMonitor<S>, ConfigError>
where
    S: Spawn,
{
    cfg.validate()?;
    let monitor = CapacityMonitor::new(cfg, spawner);
    tracing::debug!(
        num_cpus = monitor.num_cpus(),
        sample_interval_ms = cfg.sample_interval_ms,
        pledge_hold_ms = cfg.pledge_hold_ms,
        "capacity monitor built"
    );
    Ok(monitor)
}

/// Registry with the `"capacity"` snapshot and a load-trace CPU profiler
/// sampling at the monitor's interval.
pub fn build_profiles<S, P>(monitor: &Arc<CapacityMonitor<S>>, spawner: P) -> ProfileRegistry
where
    S: Spawn + Send + Sync + 'static,
    P: Spawn + Send + Sync + 'static,
{
    let profiler = LoadTraceProfiler::new(
        Arc::clone(monitor.gauge()),
        monitor.sample_interval(),
        spawner,
    );
    ProfileRegistry::new()
        .with_cpu_profiler(Arc::new(profiler))
        .with_snapshot(
            CAPACITY_PROFILE_NAME,
            Arc::new(CapacitySnapshot::new(Arc::clone(monitor))),
        )
}
