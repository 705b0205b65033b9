//! Tests for configuration validation

use cpu_admission::config::MonitorConfig;
use cpu_admission::core::{ClassPolicy, ClassTable, ConfigError, CostClass};

#[test]
fn test_monitor_config_validation() {
    assert!(MonitorConfig::default().validate().is_ok());
}

#[test]
fn test_monitor_config_invalid_interval() {
    let invalid = MonitorConfig {
        sample_interval_ms: 0,
        ..MonitorConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_monitor_config_invalid_cooldown() {
    let invalid = MonitorConfig {
        warning_cooldown_secs: 0,
        ..MonitorConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_monitor_config_hold_shorter_than_interval() {
    let invalid = MonitorConfig {
        sample_interval_ms: 1_000,
        pledge_hold_ms: 500,
        ..MonitorConfig::default()
    };
    assert!(matches!(
        invalid.validate(),
        Err(ConfigError::Invalid { field: "pledge_hold_ms", .. })
    ));
}

#[test]
fn test_monitor_config_invalid_fraction() {
    for fraction in [0.0, 1.0, -0.1, f64::NAN] {
        let invalid = MonitorConfig {
            high_load_idle_fraction: fraction,
            ..MonitorConfig::default()
        };
        assert!(invalid.validate().is_err(), "fraction {fraction} accepted");
    }
}

#[test]
fn test_monitor_config_zero_cpus() {
    let invalid = MonitorConfig {
        num_cpus: Some(0),
        ..MonitorConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_monitor_config_negative_threshold() {
    let invalid = MonitorConfig {
        classes: ClassTable {
            track: ClassPolicy::new(-1.0, 1.0),
            ..ClassTable::default()
        },
        ..MonitorConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_monitor_config_from_json() {
    let json = r#"{
        "sample_interval_ms": 500,
        "warning_cooldown_secs": 30,
        "pledge_hold_ms": 750,
        "num_cpus": 16,
        "classes": {
            "web_composite": { "threshold": 4.0, "pledge": 3.5 }
        }
    }"#;

    let config = MonitorConfig::from_json_str(json).unwrap();
    assert_eq!(config.sample_interval_ms, 500);
    assert_eq!(config.num_cpus, Some(16));
    assert!((config.classes.threshold(CostClass::WebComposite) - 4.0).abs() < f64::EPSILON);
    assert!((config.classes.pledge(CostClass::WebComposite) - 3.5).abs() < f64::EPSILON);
    assert!((config.classes.threshold(CostClass::Track) - 1.0).abs() < f64::EPSILON);
    assert!((config.high_load_idle_fraction - 0.10).abs() < f64::EPSILON);
}

#[test]
fn test_monitor_config_from_json_empty_object() {
    let config = MonitorConfig::from_json_str("{}").unwrap();
    assert_eq!(config, MonitorConfig::default());
}

#[test]
fn test_monitor_config_from_json_malformed() {
    assert!(matches!(
        MonitorConfig::from_json_str("{ not json"),
        Err(ConfigError::Parse(_))
    ));
}
