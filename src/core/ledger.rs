//! Reservation ledger: CPU pledged to accepted requests whose load has not
//! yet shown up in sampled measurements.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use uuid::Uuid;

use crate::util::AtomicF64;

/// Abstraction for spawning background work on a runtime.
pub trait Spawn {
    /// Spawn a detached future.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

/// Receipt for one pledge. The matching release is already scheduled; the
/// ticket is informational and dropping it changes nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PledgeTicket {
    /// Identifier carried by the release log event.
    pub id: Uuid,
    /// Cores pledged.
    pub amount: f64,
    /// When the pledge is released.
    pub release_at: Instant,
}

/// Pending reservation total with self-expiring pledges.
///
/// Every [`pledge`](Self::pledge) adds to the total and schedules exactly one
/// release of the same amount after the hold, so the total never goes
/// negative and returns to its prior value once all holds elapse.
pub struct ReservationLedger<S> {
    pending: Arc<AtomicF64>,
    outstanding: Arc<AtomicUsize>,
    hold: Duration,
    spawner: S,
}

impl<S> ReservationLedger<S>
where
    S: Spawn,
{
    /// Ledger whose pledges are held for `hold` before release.
    pub fn new(hold: Duration, spawner: S) -> Self {
        Self {
            pending: Arc::new(AtomicF64::default()),
            outstanding: Arc::new(AtomicUsize::new(0)),
            hold,
            spawner,
        }
    }

    /// Reserve `amount` cores until the hold elapses.
    ///
    /// Returns `None` without touching the total if `amount` is not a
    /// positive finite number.
    pub fn pledge(&self, amount: f64) -> Option<PledgeTicket> {
        if !amount.is_finite() || amount <= 0.0 {
            tracing::debug!(amount, "ignoring non-positive pledge");
            return None;
        }

        self.pending.fetch_add(amount);
        self.outstanding.fetch_add(1, Ordering::AcqRel);

        let ticket = PledgeTicket {
            id: Uuid::new_v4(),
            amount,
            release_at: Instant::now() + self.hold,
        };

        let pending = Arc::clone(&self.pending);
        let outstanding = Arc::clone(&self.outstanding);
        self.spawner.spawn(async move {
            tokio::time::sleep_until(ticket.release_at).await;
            pending.fetch_sub(ticket.amount);
            outstanding.fetch_sub(1, Ordering::AcqRel);
            tracing::debug!(ticket = %ticket.id, amount = ticket.amount, "pledge released");
        });

        Some(ticket)
    }
}

impl<S> ReservationLedger<S> {
    /// Cores currently pledged.
    pub fn pending(&self) -> f64 {
        self.pending.load()
    }

    /// Pledges whose release has not fired yet.
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::Acquire)
    }

    /// How long each pledge is held.
    pub const fn hold(&self) -> Duration {
        self.hold
    }
}
