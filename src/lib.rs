//! # CPU Admission
//!
//! Capacity-aware admission control for a job-dispatch service.
//!
//! The crate tracks live idle CPU capacity on the local host and decides, per
//! incoming job request, whether there is enough spare capacity to accept it.
//! Capacity already pledged to recently accepted jobs, whose cost has not yet
//! shown up in the OS counters, is subtracted before deciding.
//!
//! ## Components
//!
//! - **Sampler**: a background task reading `/proc/stat` once per interval and
//!   publishing `num_cpus * idle_fraction`. Warns about high load at most once
//!   per cool-down window.
//! - **Capacity gauge**: the published estimate and the derived load percent.
//! - **Reservation ledger**: pledges that release themselves after a hold
//!   slightly longer than one sampling interval.
//! - **Admission engine**: `idle - pending > threshold(class)`.
//!
//! All shared state is two atomic `f64` cells; nothing in the admission path
//! takes a lock or blocks.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cpu_admission::builders::build_monitor;
//! use cpu_admission::config::MonitorConfig;
//! use cpu_admission::core::CostClass;
//! use cpu_admission::infra::ProcStatSource;
//! use cpu_admission::runtime::TokioSpawner;
//! use tokio_util::sync::CancellationToken;
//!
//! let monitor = build_monitor(&MonitorConfig::from_env()?, TokioSpawner::try_current()?)?;
//! let cancel = CancellationToken::new();
//! let sampler = monitor.start(ProcStatSource::new(), cancel.clone());
//!
//! if monitor.can_accept(CostClass::WebComposite) {
//!     monitor.accept(CostClass::WebComposite);
//!     // dispatch the job
//! }
//!
//! cancel.cancel();
//! sampler.await?;
//! ```
//!
//! Admission is local and best-effort: there is no queueing, no cross-node
//! coordination and no fairness between classes. Two concurrent acceptances
//! may together exceed idle capacity by one pledge.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Capacity sampling, pledge accounting and admission decisions.
pub mod core;
/// Configuration models and environment loading.
pub mod config;
/// Builders to construct monitors and profile registries from configuration.
pub mod builders;
/// Host adapters for CPU statistics.
pub mod infra;
/// Diagnostic profile capture.
pub mod profile;
/// Runtime adapters and API surface.
pub mod runtime;
/// Shared utilities.
pub mod util;

pub use crate::config::MonitorConfig;
pub use crate::core::{CapacityMonitor, CostClass};
