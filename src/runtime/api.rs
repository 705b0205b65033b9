//! API-facing request/response models for a host service's intake and
//! telemetry endpoints.

use serde::{Deserialize, Serialize};

use crate::core::{AdmissionDecision, CapacityMonitor, CostClass, Spawn};

/// Admission request, keyed by the job request's variant name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionRequest {
    /// Request variant, e.g. `"web_composite"` or `"TrackComposite"`.
    pub kind: String,
    /// Pledge capacity immediately when accepted.
    #[serde(default)]
    pub reserve: bool,
}

/// Admission response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionResponse {
    /// Whether the request may start.
    pub accepted: bool,
    /// Decision inputs; absent when the kind was not recognized.
    pub decision: Option<AdmissionDecision>,
    /// Whether a pledge was recorded.
    pub reserved: bool,
    /// Rejection reason, if any.
    pub reason: Option<String>,
}

/// Point-in-time capacity report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadReport {
    /// Host load in percent.
    pub load_percent: f64,
    /// Host core count.
    pub num_cpus: f64,
    /// Idle cores from the last sample.
    pub idle_cpus: f64,
    /// Cores pledged to recent acceptances.
    pub pending_cpus: f64,
    /// Idle minus pending.
    pub available_cpus: f64,
    /// Pledges awaiting release.
    pub outstanding_pledges: usize,
    /// Current decision for every class, when requested.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decisions: Vec<AdmissionDecision>,
}

/// Health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    /// Healthy flag.
    pub ok: bool,
    /// Host load in percent.
    pub load_percent: f64,
}

/// Decide a request and, if accepted and `reserve` is set, pledge its capacity.
pub fn admit<S: Spawn>(monitor: &CapacityMonitor<S>, req: &AdmissionRequest) -> AdmissionResponse {
    let class = match req.kind.parse::<CostClass>() {
        Ok(class) => class,
        Err(e) => {
            tracing::debug!(kind = %req.kind, accepted = false, "cpu request");
            return AdmissionResponse {
                accepted: false,
                decision: None,
                reserved: false,
                reason: Some(e.to_string()),
            };
        }
    };

    let decision = monitor.evaluate(class);
    let reserved = decision.accepted && req.reserve && monitor.accept(class).is_some();
    let reason = (!decision.accepted).then(|| {
        format!(
            "insufficient cpu: {:.2} available, more than {:.2} required",
            decision.available_cpus, decision.threshold
        )
    });

    AdmissionResponse {
        accepted: decision.accepted,
        decision: Some(decision),
        reserved,
        reason,
    }
}

/// Build a load report, optionally with a decision for every class.
pub fn load_report<S: Spawn>(monitor: &CapacityMonitor<S>, with_decisions: bool) -> LoadReport {
    let decisions = if with_decisions {
        CostClass::ALL.iter().map(|c| monitor.evaluate(*c)).collect()
    } else {
        Vec::new()
    };
    LoadReport {
        load_percent: monitor.load_percent(),
        num_cpus: monitor.num_cpus(),
        idle_cpus: monitor.idle_cpus(),
        pending_cpus: monitor.pending_cpus(),
        available_cpus: monitor.available_cpus(),
        outstanding_pledges: monitor.outstanding_pledges(),
        decisions,
    }
}

/// Return a health payload.
pub fn health<S>(monitor: &CapacityMonitor<S>) -> Health {
    Health {
        ok: true,
        load_percent: monitor.load_percent(),
    }
}
