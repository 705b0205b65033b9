//! Cool-down gate for rate-limited log events.

use std::time::Duration;

use tokio::time::Instant;

/// Lets an event through at most once per `window`.
///
/// Uses `tokio::time::Instant` so paused test clocks drive it.
#[derive(Debug, Clone)]
pub struct Throttle {
    window: Duration,
    last_fired: Option<Instant>,
}

impl Throttle {
    /// Create a throttle with the given cool-down window.
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            last_fired: None,
        }
    }

    /// Returns `true` and arms the cool-down if the window has elapsed since
    /// the last event that got through.
    pub fn try_fire(&mut self, now: Instant) -> bool {
        match self.last_fired {
            Some(last) if now.saturating_duration_since(last) < self.window => false,
            _ => {
                self.last_fired = Some(now);
                true
            }
        }
    }

    /// Configured cool-down window.
    pub const fn window(&self) -> Duration {
        self.window
    }
}
