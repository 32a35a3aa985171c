use thiserror::Error;

/// Top-level error type for dataset loading and configuration.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Dataset parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
