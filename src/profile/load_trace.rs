//! Built-in `"cpu"` profiler: a load-percent trace sampled from the gauge.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

use super::CpuProfiler;
use crate::core::{CapacityGauge, ProfileError, Spawn};

struct Session {
    id: u64,
    started: Instant,
    samples: Vec<(Duration, f64)>,
}

#[derive(Default)]
struct TraceState {
    next_id: u64,
    active: Option<Session>,
}

/// CPU profiler that records the host load once per interval while a
/// session is active.
///
/// Output is plain text: a header comment, then one `seconds load_percent`
/// line per sample.
pub struct LoadTraceProfiler<S> {
    gauge: Arc<CapacityGauge>,
    interval: Duration,
    spawner: S,
    state: Arc<Mutex<TraceState>>,
}

impl<S> LoadTraceProfiler<S>
where
    S: Spawn,
{
    /// Profiler reading `gauge` every `interval`.
    pub fn new(gauge: Arc<CapacityGauge>, interval: Duration, spawner: S) -> Self {
        Self {
            gauge,
            interval,
            spawner,
            state: Arc::new(Mutex::new(TraceState::default())),
        }
    }

    /// Whether a session is running.
    pub fn is_running(&self) -> bool {
        self.state.lock().active.is_some()
    }
}

impl<S> CpuProfiler for LoadTraceProfiler<S>
where
    S: Spawn + Send + Sync + 'static,
{
    fn start(&self) -> Result<(), ProfileError> {
        let id = {
            let mut state = self.state.lock();
            if state.active.is_some() {
                return Err(ProfileError::AlreadyRunning);
            }
            let id = state.next_id;
            state.next_id += 1;
            state.active = Some(Session {
                id,
                started: Instant::now(),
                samples: Vec::new(),
            });
            id
        };

        let state = Arc::clone(&self.state);
        let gauge = Arc::clone(&self.gauge);
        let interval = self.interval;
        self.spawner.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let mut guard = state.lock();
                match guard.active.as_mut() {
                    Some(session) if session.id == id => {
                        let at = session.started.elapsed();
                        session.samples.push((at, gauge.load_percent()));
                    }
                    _ => break,
                }
            }
        });
        Ok(())
    }

    fn stop(&self) -> Vec<u8> {
        let Some(session) = self.state.lock().active.take() else {
            return Vec::new();
        };

        let mut out = String::new();
        let _ = writeln!(
            out,
            "# cpu load trace: num_cpus={} interval_ms={} samples={}",
            self.gauge.num_cpus(),
            self.interval.as_millis(),
            session.samples.len()
        );
        for (at, load) in &session.samples {
            let _ = writeln!(out, "{:.3} {load:.2}", at.as_secs_f64());
        }
        out.into_bytes()
    }
}
