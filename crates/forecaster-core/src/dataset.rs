//! Dataset loading and materialisation.
//!
//! A dataset arrives as JSON (uploaded or read from disk). Materialising it
//! fills every default the engine relies on: edge weights from the relation
//! weight table, empty privilege levels, the fallback weight table itself.

use std::path::Path;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Edge, Mutation, Node, ScenarioPreset, Subnet, WeightTable};

/// Edge as it appears on the wire, where `weight` is optional.
#[derive(Debug, Clone, Deserialize)]
struct RawEdge {
    id: String,
    source: String,
    target: String,
    relation: String,
    #[serde(default)]
    weight: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDataset {
    nodes: Vec<Node>,
    edges: Vec<RawEdge>,
    #[serde(default)]
    weights: Option<WeightTable>,
    #[serde(default)]
    critical_edge_id: Option<String>,
    #[serde(default)]
    subnets: Vec<Subnet>,
    #[serde(default)]
    start_options: Vec<String>,
    #[serde(default)]
    scenario_presets: IndexMap<String, ScenarioPreset>,
}

/// A fully materialised dataset snapshot.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub weights: WeightTable,
    /// The single edge flagged as the most dangerous known relation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical_edge_id: Option<String>,
    pub subnets: Vec<Subnet>,
    pub start_options: Vec<String>,
    pub scenario_presets: IndexMap<String, ScenarioPreset>,
}

impl Dataset {
    /// Parse and materialise a dataset from a JSON string.
    pub fn from_json(raw: &str) -> Result<Self, CoreError> {
        let parsed: RawDataset = serde_json::from_str(raw)?;
        Ok(Self::materialise(parsed))
    }

    /// Parse and materialise a dataset from an already-decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, CoreError> {
        let parsed: RawDataset = serde_json::from_value(value)?;
        Ok(Self::materialise(parsed))
    }

    /// Read a dataset file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let dataset = Self::from_json(&raw)?;
        tracing::info!(
            path = %path.display(),
            nodes = dataset.nodes.len(),
            edges = dataset.edges.len(),
            "Dataset loaded"
        );
        Ok(dataset)
    }

    fn materialise(raw: RawDataset) -> Self {
        let weights = raw.weights.unwrap_or_default();

        let edges = raw
            .edges
            .into_iter()
            .map(|e| {
                let weight = e.weight.unwrap_or_else(|| weights.weight_for(&e.relation));
                Edge {
                    id: e.id,
                    source: e.source,
                    target: e.target,
                    relation: e.relation,
                    weight,
                }
            })
            .collect();

        Self {
            nodes: raw.nodes,
            edges,
            weights,
            critical_edge_id: raw.critical_edge_id.filter(|id| !id.is_empty()),
            subnets: raw.subnets,
            start_options: raw.start_options,
            scenario_presets: raw.scenario_presets,
        }
    }

    /// Whether the dataset carries any nodes at all.
    pub fn is_loaded(&self) -> bool {
        !self.nodes.is_empty()
    }

    /// Look up a scenario preset's mutation batch.
    pub fn scenario_mutations(&self, scenario_id: &str) -> Option<&[Mutation]> {
        self.scenario_presets
            .get(scenario_id)
            .map(|preset| preset.mutations.as_slice())
    }

    /// Summarise this dataset as of `activated_at`.
    pub fn summary(&self, activated_at: DateTime<Utc>) -> DatasetSummary {
        DatasetSummary {
            nodes: self.nodes.len(),
            edges: self.edges.len(),
            subnets: self.subnets.len(),
            scenarios: self.scenario_presets.len(),
            start_options: self.start_options.clone(),
            activated_at,
        }
    }
}

/// Counts and metadata describing the active dataset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    pub nodes: usize,
    pub edges: usize,
    pub subnets: usize,
    pub scenarios: usize,
    pub start_options: Vec<String>,
    pub activated_at: DateTime<Utc>,
}
