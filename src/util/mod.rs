//! Shared utilities.

pub mod atomic;
pub mod telemetry;
pub mod throttle;

pub use atomic::AtomicF64;
pub use telemetry::{init_tracing, init_tracing_with};
pub use throttle::Throttle;
