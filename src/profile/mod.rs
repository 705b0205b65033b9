//! Operator-triggered diagnostic captures.
//!
//! A [`ProfileRegistry`] holds named snapshot profiles plus an optional CPU
//! profiler bound to the name `"cpu"`. Snapshots are written immediately; the
//! CPU profile runs for a bounded time and can be cancelled, in which case
//! the profiler is stopped on a background thread and the caller returns at
//! once.

mod load_trace;
mod registry;
mod snapshot;

pub use load_trace::LoadTraceProfiler;
pub use registry::{CpuProfiler, ProfileRegistry, SnapshotProfile};
pub use snapshot::CapacitySnapshot;

/// Name that selects the CPU profiler.
pub const CPU_PROFILE_NAME: &str = "cpu";

/// CPU capture length used when the caller passes `0`.
pub const DEFAULT_CPU_TIMEOUT_SECS: u64 = 30;
