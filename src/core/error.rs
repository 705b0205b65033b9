//! Error types for capacity monitoring and profile capture.

use thiserror::Error;

/// Failures reading CPU tick counters. The sampler recovers from all of these
/// locally by keeping its previous estimate.
#[derive(Debug, Error)]
pub enum SamplerError {
    /// The statistics file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// File that failed.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The statistics file had an unexpected shape.
    #[error("failed to parse {path}: {detail}")]
    Parse {
        /// File that failed.
        path: String,
        /// What was wrong with it.
        detail: String,
    },
    /// The background read task panicked or was cancelled.
    #[error("cpu tick read task failed: {0}")]
    Task(String),
    /// No tick source exists for this platform.
    #[error("cpu tick counters are not available on this platform")]
    Unsupported,
}

/// A request variant that maps to no known cost class.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CostClassError {
    /// Unrecognized request variant name.
    #[error("unknown cost class: {0}")]
    Unknown(String),
}

/// Invalid monitor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A field failed validation.
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
    /// Input could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Diagnostic capture failures, one variant per cause.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// No profile is registered under this name.
    #[error("profile not found: {0}")]
    NotFound(String),
    /// A CPU profile session is already active.
    #[error("cpu profiling already in progress")]
    AlreadyRunning,
    /// The capture was cancelled before it finished.
    #[error("profile capture cancelled")]
    Cancelled,
    /// Writing the profile output failed.
    #[error("failed to write profile: {0}")]
    Write(#[from] std::io::Error),
    /// Encoding the profile output failed.
    #[error("failed to encode profile: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
