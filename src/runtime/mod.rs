//! Runtime adapters and the API surface for host services.

pub mod api;
pub mod tokio_spawner;

pub use api::{admit, health, load_report, AdmissionRequest, AdmissionResponse, Health, LoadReport};
pub use tokio_spawner::TokioSpawner;
