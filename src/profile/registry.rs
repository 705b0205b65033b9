//! Profile registry: named snapshot dumps plus the bounded `"cpu"` capture.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::{CPU_PROFILE_NAME, DEFAULT_CPU_TIMEOUT_SECS};
use crate::core::ProfileError;

/// A profile that can be dumped on demand.
pub trait SnapshotProfile: Send + Sync {
    /// Write the current state to `out`. Higher `debug` means more detail.
    fn write_to(&self, out: &mut dyn Write, debug: u32) -> Result<(), ProfileError>;
}

/// A profiler that runs between `start` and `stop`.
pub trait CpuProfiler: Send + Sync + 'static {
    /// Begin a session. Fails with [`ProfileError::AlreadyRunning`] if one is active.
    fn start(&self) -> Result<(), ProfileError>;
    /// End the active session and return its encoded output.
    fn stop(&self) -> Vec<u8>;
}

/// Stops a started CPU profiler when dropped, unless the capture finished
/// normally. The stop runs on the blocking pool so a cancelled or abandoned
/// caller never waits for it.
struct ActiveCapture {
    profiler: Option<Arc<dyn CpuProfiler>>,
}

impl ActiveCapture {
    fn new(profiler: Arc<dyn CpuProfiler>) -> Self {
        Self {
            profiler: Some(profiler),
        }
    }

    /// Stop inline and return the profile.
    fn finish(mut self) -> Vec<u8> {
        self.profiler.take().map(|p| p.stop()).unwrap_or_default()
    }
}

impl Drop for ActiveCapture {
    fn drop(&mut self) {
        let Some(profiler) = self.profiler.take() else {
            return;
        };
        tracing::info!("cpu profile abandoned, stopping in background");
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || {
                    let _ = profiler.stop();
                });
            }
            Err(_) => {
                let _ = profiler.stop();
            }
        }
    }
}

/// Named diagnostic profiles.
#[derive(Default)]
pub struct ProfileRegistry {
    cpu: Option<Arc<dyn CpuProfiler>>,
    snapshots: HashMap<String, Arc<dyn SnapshotProfile>>,
}

impl ProfileRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `profiler` to the `"cpu"` name.
    #[must_use]
    pub fn with_cpu_profiler(mut self, profiler: Arc<dyn CpuProfiler>) -> Self {
        self.cpu = Some(profiler);
        self
    }

    /// Register a snapshot profile under `name`, replacing any previous one.
    #[must_use]
    pub fn with_snapshot(mut self, name: impl Into<String>, profile: Arc<dyn SnapshotProfile>) -> Self {
        self.snapshots.insert(name.into(), profile);
        self
    }

    /// Registered names, sorted, including `"cpu"` if a profiler is bound.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.snapshots.keys().cloned().collect();
        if self.cpu.is_some() {
            names.push(CPU_PROFILE_NAME.to_string());
        }
        names.sort();
        names
    }

    /// Capture the profile called `name`.
    ///
    /// `"cpu"` runs the CPU profiler for `timeout_secs` (0 means
    /// [`DEFAULT_CPU_TIMEOUT_SECS`]) unless `cancel` fires first. Any other
    /// name dumps the matching snapshot at `debug` verbosity.
    pub async fn capture(
        &self,
        name: &str,
        timeout_secs: u64,
        debug: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, ProfileError> {
        if name == CPU_PROFILE_NAME {
            self.capture_cpu(timeout_secs, cancel).await
        } else {
            self.capture_snapshot(name, debug)
        }
    }

    /// Run the CPU profiler for a bounded time.
    pub async fn capture_cpu(
        &self,
        timeout_secs: u64,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, ProfileError> {
        let profiler = self
            .cpu
            .as_ref()
            .ok_or_else(|| ProfileError::NotFound(CPU_PROFILE_NAME.to_string()))?;
        let timeout_secs = if timeout_secs == 0 {
            DEFAULT_CPU_TIMEOUT_SECS
        } else {
            timeout_secs
        };

        profiler.start()?;
        let capture = ActiveCapture::new(Arc::clone(profiler));
        tracing::info!(timeout_secs, "cpu profile started");

        tokio::select! {
            () = cancel.cancelled() => {
                tracing::info!("cpu profile cancelled");
                return Err(ProfileError::Cancelled);
            }
            () = tokio::time::sleep(Duration::from_secs(timeout_secs)) => {}
        }

        let data = capture.finish();
        tracing::info!(bytes = data.len(), "cpu profile finished");
        Ok(data)
    }

    /// Dump a named snapshot.
    pub fn capture_snapshot(&self, name: &str, debug: u32) -> Result<Vec<u8>, ProfileError> {
        let profile = self
            .snapshots
            .get(name)
            .ok_or_else(|| ProfileError::NotFound(name.to_string()))?;
        let mut buf = Vec::new();
        profile.write_to(&mut buf, debug)?;
        Ok(buf)
    }
}
