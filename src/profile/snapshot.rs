//! The `"capacity"` snapshot profile.

use std::io::Write;
use std::sync::Arc;

use super::SnapshotProfile;
use crate::core::{CapacityMonitor, ProfileError, Spawn};
use crate::runtime::api::load_report;

/// Dumps the monitor's capacity state.
///
/// `debug == 0`: one summary line. `debug == 1`: pretty JSON report.
/// `debug >= 2`: the JSON report with a decision for every class.
pub struct CapacitySnapshot<S> {
    monitor: Arc<CapacityMonitor<S>>,
}

impl<S> CapacitySnapshot<S> {
    /// Snapshot profile over `monitor`.
    pub const fn new(monitor: Arc<CapacityMonitor<S>>) -> Self {
        Self { monitor }
    }
}

impl<S> SnapshotProfile for CapacitySnapshot<S>
where
    S: Spawn + Send + Sync,
{
    fn write_to(&self, out: &mut dyn Write, debug: u32) -> Result<(), ProfileError> {
        let report = load_report(&self.monitor, debug >= 2);
        if debug == 0 {
            writeln!(
                out,
                "load={:.1}% idle={:.2} pending={:.2} available={:.2} num_cpus={} outstanding={}",
                report.load_percent,
                report.idle_cpus,
                report.pending_cpus,
                report.available_cpus,
                report.num_cpus,
                report.outstanding_pledges,
            )?;
        } else {
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
        Ok(())
    }
}
