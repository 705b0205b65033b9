//! Configuration for the capacity monitor.

pub mod monitor;

pub use monitor::MonitorConfig;
