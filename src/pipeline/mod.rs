//! Orchestration: configuration, horizon projection, run summaries.

mod config;
mod horizon;
mod orchestrator;
mod summary;

pub use config::ForecastConfig;
pub use horizon::HorizonProjector;
pub use orchestrator::{ForecastOrchestrator, ForecastRun};
pub use summary::HorizonSummary;
