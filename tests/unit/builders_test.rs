//! Tests for builder modules

use std::sync::Arc;

use cpu_admission::builders::{build_monitor, build_profiles, CAPACITY_PROFILE_NAME};
use cpu_admission::config::MonitorConfig;
use cpu_admission::core::ConfigError;
use cpu_admission::runtime::TokioSpawner;

#[tokio::test]
async fn test_build_monitor_from_defaults() {
    let config = MonitorConfig {
        num_cpus: Some(8),
        ..MonitorConfig::default()
    };
    let monitor = build_monitor(&config, TokioSpawner::try_current().unwrap()).unwrap();
    assert!((monitor.num_cpus() - 8.0).abs() < f64::EPSILON);
    assert!((monitor.load_percent() - 100.0).abs() < f64::EPSILON);
    assert_eq!(monitor.outstanding_pledges(), 0);
}

#[tokio::test]
async fn test_build_monitor_rejects_invalid_config() {
    let config = MonitorConfig {
        sample_interval_ms: 0,
        ..MonitorConfig::default()
    };
    let result = build_monitor(&config, TokioSpawner::try_current().unwrap());
    assert!(matches!(
        result,
        Err(ConfigError::Invalid { field: "sample_interval_ms", .. })
    ));
}

#[tokio::test]
async fn test_build_profiles_registers_cpu_and_capacity() {
    let spawner = TokioSpawner::try_current().unwrap();
    let monitor = Arc::new(build_monitor(&MonitorConfig::default(), spawner.clone()).unwrap());
    let registry = build_profiles(&monitor, spawner);
    assert_eq!(registry.names(), vec![CAPACITY_PROFILE_NAME, "cpu"]);
}
