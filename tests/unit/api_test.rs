//! Tests for the host-facing API helpers

use cpu_admission::config::MonitorConfig;
use cpu_admission::core::{CapacityMonitor, CostClass};
use cpu_admission::runtime::api::{admit, health, load_report, AdmissionRequest};
use cpu_admission::runtime::TokioSpawner;

fn monitor(num_cpus: usize, idle: f64) -> CapacityMonitor<TokioSpawner> {
    let config = MonitorConfig {
        num_cpus: Some(num_cpus),
        ..MonitorConfig::default()
    };
    let monitor = CapacityMonitor::new(&config, TokioSpawner::try_current().unwrap());
    monitor.gauge().set_idle_cpus(idle);
    monitor
}

fn request(kind: &str, reserve: bool) -> AdmissionRequest {
    AdmissionRequest {
        kind: kind.to_string(),
        reserve,
    }
}

#[tokio::test(start_paused = true)]
async fn test_admit_accepts_and_reserves() {
    let monitor = monitor(8, 5.0);
    let response = admit(&monitor, &request("web_composite", true));
    assert!(response.accepted);
    assert!(response.reserved);
    assert!(response.reason.is_none());
    assert!((monitor.pending_cpus() - 3.0).abs() < f64::EPSILON);
}

#[tokio::test(start_paused = true)]
async fn test_admit_without_reserve_leaves_ledger_alone() {
    let monitor = monitor(8, 5.0);
    let response = admit(&monitor, &request("TrackComposite", false));
    assert!(response.accepted);
    assert!(!response.reserved);
    assert!(monitor.pending_cpus().abs() < f64::EPSILON);
}

#[tokio::test(start_paused = true)]
async fn test_admit_rejects_with_reason() {
    let monitor = monitor(8, 3.0);
    let response = admit(&monitor, &request("web_composite", true));
    assert!(!response.accepted);
    assert!(!response.reserved);
    assert!(response.reason.unwrap().contains("insufficient cpu"));
    assert_eq!(response.decision.map(|d| d.class), Some(CostClass::WebComposite));
}

#[tokio::test(start_paused = true)]
async fn test_admit_unknown_kind() {
    let monitor = monitor(8, 8.0);
    let response = admit(&monitor, &request("room_composite", true));
    assert!(!response.accepted);
    assert!(response.decision.is_none());
    assert_eq!(response.reason.as_deref(), Some("unknown cost class: room_composite"));
    assert!(monitor.pending_cpus().abs() < f64::EPSILON);
}

#[tokio::test(start_paused = true)]
async fn test_request_deserializes_without_reserve() {
    let req: AdmissionRequest = serde_json::from_str(r#"{"kind": "track"}"#).unwrap();
    assert!(!req.reserve);
}

#[tokio::test(start_paused = true)]
async fn test_load_report() {
    let monitor = monitor(4, 1.0);
    monitor.accept(CostClass::Track);

    let report = load_report(&monitor, true);
    assert!((report.load_percent - 75.0).abs() < 1e-9);
    assert!((report.pending_cpus - 1.0).abs() < f64::EPSILON);
    assert!(report.available_cpus.abs() < f64::EPSILON);
    assert_eq!(report.outstanding_pledges, 1);
    assert_eq!(report.decisions.len(), 3);
    assert!(report.decisions.iter().all(|d| !d.accepted));
}

#[tokio::test(start_paused = true)]
async fn test_health() {
    let monitor = monitor(4, 2.0);
    let health = health(&monitor);
    assert!(health.ok);
    assert!((health.load_percent - 50.0).abs() < 1e-9);
}
