//! Capacity sampling, pledge accounting and admission decisions.

pub mod admission;
pub mod class;
pub mod error;
pub mod gauge;
pub mod ledger;
pub mod monitor;
pub mod sampler;

pub use admission::{AdmissionDecision, AdmissionEngine};
pub use class::{ClassPolicy, ClassTable, CostClass};
pub use error::{AppResult, ConfigError, CostClassError, ProfileError, SamplerError};
pub use gauge::CapacityGauge;
pub use ledger::{PledgeTicket, ReservationLedger, Spawn};
pub use monitor::CapacityMonitor;
pub use sampler::{CpuSampler, SampleOutcome};
