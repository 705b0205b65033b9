//! Tests for error types

use cpu_admission::core::{ConfigError, CostClassError, ProfileError, SamplerError};

#[test]
fn test_profile_not_found_error() {
    let err = ProfileError::NotFound("heap".to_string());
    assert_eq!(format!("{}", err), "profile not found: heap");
}

#[test]
fn test_profile_cancelled_error() {
    assert_eq!(format!("{}", ProfileError::Cancelled), "profile capture cancelled");
}

#[test]
fn test_profile_already_running_error() {
    assert_eq!(
        format!("{}", ProfileError::AlreadyRunning),
        "cpu profiling already in progress"
    );
}

#[test]
fn test_unknown_cost_class_error() {
    let err = CostClassError::Unknown("room_composite".to_string());
    assert_eq!(format!("{}", err), "unknown cost class: room_composite");
}

#[test]
fn test_sampler_parse_error() {
    let err = SamplerError::Parse {
        path: "/proc/stat".to_string(),
        detail: "no aggregate cpu line".to_string(),
    };
    assert_eq!(
        format!("{}", err),
        "failed to parse /proc/stat: no aggregate cpu line"
    );
}

#[test]
fn test_config_invalid_error() {
    let err = ConfigError::Invalid {
        field: "num_cpus",
        reason: "must be greater than 0".to_string(),
    };
    assert_eq!(format!("{}", err), "invalid num_cpus: must be greater than 0");
}
