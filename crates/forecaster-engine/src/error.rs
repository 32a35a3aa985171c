//! Error types for the forecaster-engine crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Dataset error: {0}")]
    Core(#[from] forecaster_core::CoreError),

    #[error("No dataset loaded")]
    NoDataset,

    #[error("Scenario preset not found: {scenario_id}")]
    ScenarioNotFound { scenario_id: String },

    #[error("Computation timeout: exceeded {max_seconds}s limit")]
    Timeout { max_seconds: u64 },

    #[error("Analysis worker failed: {0}")]
    Worker(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
