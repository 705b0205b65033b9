//! Published idle-capacity estimate.

use crate::util::AtomicF64;

/// Idle CPU capacity in whole-core units, written by the sampler and read
/// lock-free by everyone else.
///
/// Starts at zero idle cores, so the host reads as fully loaded until the
/// first sample lands.
#[derive(Debug)]
pub struct CapacityGauge {
    idle_cpus: AtomicF64,
    num_cpus: f64,
}

impl CapacityGauge {
    /// Gauge for a host with `num_cpus` logical cores (at least one).
    pub fn new(num_cpus: usize) -> Self {
        Self {
            idle_cpus: AtomicF64::new(0.0),
            num_cpus: num_cpus.max(1) as f64,
        }
    }

    /// Gauge sized from the host's logical core count.
    pub fn for_host() -> Self {
        Self::new(num_cpus::get())
    }

    /// Current idle-capacity estimate in cores.
    pub fn idle_cpus(&self) -> f64 {
        self.idle_cpus.load()
    }

    /// Core count this gauge was sized for.
    pub const fn num_cpus(&self) -> f64 {
        self.num_cpus
    }

    /// Publish a new estimate from an idle fraction in `[0, 1]`.
    ///
    /// Non-finite fractions are dropped so the previous estimate survives.
    pub fn publish_idle_fraction(&self, idle_fraction: f64) -> bool {
        if !idle_fraction.is_finite() {
            return false;
        }
        self.idle_cpus
            .store(self.num_cpus * idle_fraction.clamp(0.0, 1.0));
        true
    }

    /// Overwrite the estimate directly, in cores.
    pub fn set_idle_cpus(&self, idle: f64) {
        if idle.is_finite() {
            self.idle_cpus.store(idle.clamp(0.0, self.num_cpus));
        }
    }

    /// Share of the host in use, `(num_cpus - idle) / num_cpus * 100`.
    pub fn load_percent(&self) -> f64 {
        ((self.num_cpus - self.idle_cpus()) / self.num_cpus * 100.0).clamp(0.0, 100.0)
    }
}
