//! forecaster-core: Shared types, dataset loading, configuration, and error
//! handling for the attack path forecaster.
//!
//! This crate provides the foundational types used by the engine:
//! - Node, edge and privilege types for the privilege graph
//! - Simulation mutations and scenario presets
//! - Dataset materialisation (relation weight defaults)
//! - Configuration management
//! - Common error types

pub mod config;
pub mod dataset;
pub mod error;
pub mod types;

pub use config::EngineConfig;
pub use dataset::{Dataset, DatasetSummary};
pub use error::CoreError;
pub use types::{
    Edge, Mutation, Node, PrivilegeLevel, PrivilegeTier, ScenarioPreset, Subnet,
    WeightTable,
};
