//! Configuration management for the forecaster.
//!
//! Configuration is loaded from (in priority order):
//! 1. Environment variables (`FORECASTER__ENGINE__DEFAULT_K=...`)
//! 2. Config file (`forecaster.toml`, `[engine]` section)
//! 3. Defaults

use serde::Deserialize;

use crate::error::CoreError;

/// Engine defaults and limits.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Minimum hop count used when a request leaves it out.
    #[serde(default = "default_min_depth")]
    pub default_min_depth: usize,

    /// Maximum hop count used when a request leaves it out.
    #[serde(default = "default_max_depth")]
    pub default_max_depth: usize,

    /// Per-start-node result cap used when a request leaves it out.
    #[serde(default = "default_k")]
    pub default_k: usize,

    /// Neighborhood radius used when a request leaves it out.
    #[serde(default = "default_radius")]
    pub default_radius: usize,

    /// Wall-clock limit for a single analysis run.
    #[serde(default = "default_timeout_secs")]
    pub analysis_timeout_secs: u64,

    /// Dataset file to activate at startup.
    #[serde(default)]
    pub dataset_path: Option<String>,
}

fn default_min_depth() -> usize {
    4
}

fn default_max_depth() -> usize {
    7
}

fn default_k() -> usize {
    50
}

fn default_radius() -> usize {
    2
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_min_depth: default_min_depth(),
            default_max_depth: default_max_depth(),
            default_k: default_k(),
            default_radius: default_radius(),
            analysis_timeout_secs: default_timeout_secs(),
            dataset_path: None,
        }
    }
}

impl EngineConfig {
    /// Load the `[engine]` section from `{file_prefix}.toml` (optional) and
    /// `FORECASTER__ENGINE__*` environment variables.
    pub fn load(file_prefix: &str) -> Result<Self, CoreError> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("FORECASTER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| CoreError::Config(e.to_string()))?;

        match cfg.get::<EngineConfig>("engine") {
            Ok(engine) => Ok(engine),
            Err(config::ConfigError::NotFound(_)) => Ok(Self::default()),
            Err(e) => Err(CoreError::Config(e.to_string())),
        }
    }
}
