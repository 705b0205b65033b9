//! Cumulative CPU tick counters.
//!
//! On Linux the aggregate `cpu` line of `/proc/stat` is read:
//!
//! ```text
//! cpu  user nice system idle iowait irq softirq steal guest guest_nice
//! ```
//!
//! `total` is the sum of the first eight fields. `guest` time is already
//! accounted inside `user`, so it is not added again.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::core::SamplerError;

/// Default location of the kernel CPU statistics.
pub const PROC_STAT: &str = "/proc/stat";

/// One reading of the cumulative idle and total tick counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct CpuTicks {
    /// Ticks spent idle since boot.
    pub idle: u64,
    /// Ticks spent in any state since boot.
    pub total: u64,
}

impl CpuTicks {
    /// Build a snapshot from raw counters.
    pub const fn new(idle: u64, total: u64) -> Self {
        Self { idle, total }
    }
}

/// Source of CPU tick snapshots.
pub trait CpuTickSource: Send + 'static {
    /// Read the current counters.
    fn read(&mut self) -> Result<CpuTicks, SamplerError>;
}

/// Reads `/proc/stat` (or a substitute path with the same format).
#[derive(Debug, Clone)]
pub struct ProcStatSource {
    path: PathBuf,
}

impl ProcStatSource {
    /// Source backed by the kernel's `/proc/stat`.
    pub fn new() -> Self {
        Self::with_path(PROC_STAT)
    }

    /// Source backed by an arbitrary file in `/proc/stat` format.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path this source reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for ProcStatSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuTickSource for ProcStatSource {
    fn read(&mut self) -> Result<CpuTicks, SamplerError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => SamplerError::Unsupported,
            _ => SamplerError::Read {
                path: self.path.display().to_string(),
                source: e,
            },
        })?;
        parse_proc_stat(&content).map_err(|detail| SamplerError::Parse {
            path: self.path.display().to_string(),
            detail,
        })
    }
}

/// Replays a fixed sequence of readings, then keeps returning the last
/// successful one. Used to drive the sampler deterministically.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    readings: VecDeque<Result<CpuTicks, SamplerError>>,
    last: Option<CpuTicks>,
}

impl ScriptedSource {
    /// Source that yields `readings` in order.
    pub fn new(readings: impl IntoIterator<Item = CpuTicks>) -> Self {
        Self {
            readings: readings.into_iter().map(Ok).collect(),
            last: None,
        }
    }

    /// Queue another successful reading.
    pub fn push(&mut self, ticks: CpuTicks) {
        self.readings.push_back(Ok(ticks));
    }

    /// Queue a failed reading.
    pub fn push_failure(&mut self, err: SamplerError) {
        self.readings.push_back(Err(err));
    }
}

impl CpuTickSource for ScriptedSource {
    fn read(&mut self) -> Result<CpuTicks, SamplerError> {
        match self.readings.pop_front() {
            Some(Ok(ticks)) => {
                self.last = Some(ticks);
                Ok(ticks)
            }
            Some(Err(e)) => Err(e),
            None => self.last.ok_or(SamplerError::Unsupported),
        }
    }
}

/// Parses the aggregate `cpu` line out of `/proc/stat` content.
pub fn parse_proc_stat(content: &str) -> Result<CpuTicks, String> {
    let line = content
        .lines()
        .find(|l| l.split_whitespace().next() == Some("cpu"))
        .ok_or_else(|| "no aggregate cpu line".to_string())?;

    let fields = line
        .split_whitespace()
        .skip(1)
        .take(8)
        .map(|f| {
            f.parse::<u64>()
                .map_err(|_| format!("expected integer tick count, got '{f}'"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Kernels before 2.6.11 report only user, nice, system and idle.
    if fields.len() < 4 {
        return Err(format!("expected at least 4 tick fields, got {}", fields.len()));
    }

    Ok(CpuTicks {
        idle: fields[3],
        total: fields.iter().sum(),
    })
}
