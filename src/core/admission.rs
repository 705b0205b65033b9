//! Admission decisions against per-class thresholds.

use serde::{Deserialize, Serialize};

use crate::core::{CapacityGauge, ClassTable, CostClass, PledgeTicket, ReservationLedger, Spawn};

/// Outcome of one admission check, with the inputs it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdmissionDecision {
    /// Class that was evaluated.
    pub class: CostClass,
    /// Whether the request may be started.
    pub accepted: bool,
    /// Idle cores minus pending pledges. May be negative.
    pub available_cpus: f64,
    /// Threshold `available_cpus` had to exceed.
    pub threshold: f64,
    /// Host core count.
    pub num_cpus: f64,
}

/// Stateless decision engine. Holds only the class table; capacity readings
/// come from the gauge and ledger passed to each call.
#[derive(Debug, Clone, Default)]
pub struct AdmissionEngine {
    table: ClassTable,
}

impl AdmissionEngine {
    /// Engine using `table` for thresholds and pledge sizes.
    pub const fn new(table: ClassTable) -> Self {
        Self { table }
    }

    /// Class table in use.
    pub const fn table(&self) -> &ClassTable {
        &self.table
    }

    /// Evaluate `class` without side effects beyond a debug event.
    pub fn evaluate<S>(
        &self,
        gauge: &CapacityGauge,
        ledger: &ReservationLedger<S>,
        class: CostClass,
    ) -> AdmissionDecision {
        let available_cpus = gauge.idle_cpus() - ledger.pending();
        let threshold = self.table.threshold(class);
        let accepted = available_cpus > threshold;

        tracing::debug!(
            %class,
            accepted,
            available_cpus,
            threshold,
            num_cpus = gauge.num_cpus(),
            "cpu request"
        );

        AdmissionDecision {
            class,
            accepted,
            available_cpus,
            threshold,
            num_cpus: gauge.num_cpus(),
        }
    }

    /// `true` iff idle minus pending is strictly greater than the class threshold.
    pub fn can_accept<S>(
        &self,
        gauge: &CapacityGauge,
        ledger: &ReservationLedger<S>,
        class: CostClass,
    ) -> bool {
        self.evaluate(gauge, ledger, class).accepted
    }

    /// Pledge the class's cost. Does not re-check capacity.
    pub fn accept<S: Spawn>(
        &self,
        ledger: &ReservationLedger<S>,
        class: CostClass,
    ) -> Option<PledgeTicket> {
        ledger.pledge(self.table.pledge(class))
    }
}
