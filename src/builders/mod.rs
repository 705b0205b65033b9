//! Builders that assemble monitors and profile registries from configuration.

pub mod monitor_builder;

pub use monitor_builder::{build_monitor, build_profiles, CAPACITY_PROFILE_NAME};
