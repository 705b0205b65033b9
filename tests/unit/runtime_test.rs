//! Tests for tokio spawner utilities

use std::time::Duration;

use cpu_admission::core::ReservationLedger;
use cpu_admission::runtime::tokio_spawner::TokioSpawner;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_tokio_spawner_runs_pledge_release() {
    let spawner = TokioSpawner::new(tokio::runtime::Handle::current());
    let ledger = ReservationLedger::new(Duration::from_millis(50), spawner);

    let ticket = ledger.pledge(2.0).expect("positive pledge is recorded");
    assert!((ledger.pending() - 2.0).abs() < f64::EPSILON);
    assert_eq!(ledger.outstanding(), 1);

    tokio::time::sleep_until(ticket.release_at + Duration::from_millis(100)).await;
    assert!(ledger.pending().abs() < f64::EPSILON);
    assert_eq!(ledger.outstanding(), 0);
}

#[test]
fn test_tokio_spawner_outside_runtime() {
    assert!(TokioSpawner::try_current().is_err());
}
