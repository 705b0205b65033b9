//! Capacity monitor configuration.

use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::{AppResult, ClassPolicy, ClassTable, ConfigError, CostClass};

/// Default sampling cadence.
pub const DEFAULT_SAMPLE_INTERVAL_MS: u64 = 1_000;
/// Default minimum spacing between "high cpu load" warnings.
pub const DEFAULT_WARNING_COOLDOWN_SECS: u64 = 60;
/// Default time a pledge is held before release.
pub const DEFAULT_PLEDGE_HOLD_MS: u64 = 1_000;
/// Default idle fraction below which the host counts as heavily loaded.
pub const DEFAULT_HIGH_LOAD_IDLE_FRACTION: f64 = 0.10;

/// Prefix for environment overrides read by [`MonitorConfig::from_env`].
pub const ENV_PREFIX: &str = "CPU_ADMISSION_";

/// Monitor configuration. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Sampling cadence in milliseconds.
    pub sample_interval_ms: u64,
    /// Warning cool-down in seconds.
    pub warning_cooldown_secs: u64,
    /// Pledge hold in milliseconds. Must cover at least one sampling interval.
    pub pledge_hold_ms: u64,
    /// Idle fraction below which a warning is emitted.
    pub high_load_idle_fraction: f64,
    /// Core count override; `None` uses the host's logical core count.
    pub num_cpus: Option<usize>,
    /// Per-class thresholds and pledges.
    pub classes: ClassTable,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
            warning_cooldown_secs: DEFAULT_WARNING_COOLDOWN_SECS,
            pledge_hold_ms: DEFAULT_PLEDGE_HOLD_MS,
            high_load_idle_fraction: DEFAULT_HIGH_LOAD_IDLE_FRACTION,
            num_cpus: None,
            classes: ClassTable::default(),
        }
    }
}

impl MonitorConfig {
    /// Sampling cadence.
    pub const fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    /// Warning cool-down.
    pub const fn warning_cooldown(&self) -> Duration {
        Duration::from_secs(self.warning_cooldown_secs)
    }

    /// Pledge hold.
    pub const fn pledge_hold(&self) -> Duration {
        Duration::from_millis(self.pledge_hold_ms)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_interval_ms == 0 {
            return Err(invalid("sample_interval_ms", "must be greater than 0"));
        }
        if self.warning_cooldown_secs == 0 {
            return Err(invalid("warning_cooldown_secs", "must be greater than 0"));
        }
        if self.pledge_hold_ms < self.sample_interval_ms {
            return Err(invalid(
                "pledge_hold_ms",
                format!(
                    "{} is shorter than the sampling interval ({} ms)",
                    self.pledge_hold_ms, self.sample_interval_ms
                ),
            ));
        }
        if !(self.high_load_idle_fraction > 0.0 && self.high_load_idle_fraction < 1.0) {
            return Err(invalid(
                "high_load_idle_fraction",
                format!("{} is outside (0, 1)", self.high_load_idle_fraction),
            ));
        }
        if self.num_cpus == Some(0) {
            return Err(invalid("num_cpus", "must be greater than 0"));
        }
        for class in CostClass::ALL {
            validate_policy(class, self.classes.policy(class))?;
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let cfg: Self =
            serde_json::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load defaults overridden by `CPU_ADMISSION_*` environment variables,
    /// reading a `.env` file first if one exists.
    ///
    /// Recognized: `SAMPLE_INTERVAL_MS`, `WARNING_COOLDOWN_SECS`,
    /// `PLEDGE_HOLD_MS`, `HIGH_LOAD_IDLE_FRACTION`, `NUM_CPUS`.
    pub fn from_env() -> AppResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));
        let mut cfg = Self::default();

        if let Some(v) = get("SAMPLE_INTERVAL_MS") {
            cfg.sample_interval_ms = v.parse().context("parsing SAMPLE_INTERVAL_MS")?;
        }
        if let Some(v) = get("WARNING_COOLDOWN_SECS") {
            cfg.warning_cooldown_secs = v.parse().context("parsing WARNING_COOLDOWN_SECS")?;
        }
        if let Some(v) = get("PLEDGE_HOLD_MS") {
            cfg.pledge_hold_ms = v.parse().context("parsing PLEDGE_HOLD_MS")?;
        }
        if let Some(v) = get("HIGH_LOAD_IDLE_FRACTION") {
            cfg.high_load_idle_fraction =
                v.parse().context("parsing HIGH_LOAD_IDLE_FRACTION")?;
        }
        if let Some(v) = get("NUM_CPUS") {
            cfg.num_cpus = Some(v.parse().context("parsing NUM_CPUS")?);
        }

        cfg.validate()?;
        Ok(cfg)
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn validate_policy(class: CostClass, policy: ClassPolicy) -> Result<(), ConfigError> {
    if !policy.threshold.is_finite() || policy.threshold < 0.0 {
        return Err(invalid(
            "classes",
            format!("{class} threshold {} must be finite and non-negative", policy.threshold),
        ));
    }
    if !policy.pledge.is_finite() || policy.pledge < 0.0 {
        return Err(invalid(
            "classes",
            format!("{class} pledge {} must be finite and non-negative", policy.pledge),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = MonitorConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.sample_interval(), Duration::from_secs(1));
        assert_eq!(cfg.warning_cooldown(), Duration::from_secs(60));
        assert_eq!(cfg.pledge_hold(), Duration::from_secs(1));
    }

    #[test]
    fn test_lookup_overrides() {
        let vars: HashMap<&str, &str> = [
            ("CPU_ADMISSION_SAMPLE_INTERVAL_MS", "500"),
            ("CPU_ADMISSION_NUM_CPUS", "16"),
        ]
        .into_iter()
        .collect();
        let cfg = MonitorConfig::from_lookup(|k| vars.get(k).map(|v| (*v).to_string())).unwrap();
        assert_eq!(cfg.sample_interval_ms, 500);
        assert_eq!(cfg.num_cpus, Some(16));
        assert_eq!(cfg.pledge_hold_ms, DEFAULT_PLEDGE_HOLD_MS);
    }

    #[test]
    fn test_lookup_bad_number() {
        let result = MonitorConfig::from_lookup(|k| {
            (k == "CPU_ADMISSION_PLEDGE_HOLD_MS").then(|| "soon".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_lookup_runs_validation() {
        let result = MonitorConfig::from_lookup(|k| {
            (k == "CPU_ADMISSION_PLEDGE_HOLD_MS").then(|| "10".to_string())
        });
        assert!(result.is_err());
    }
}
