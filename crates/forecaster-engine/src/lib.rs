//! forecaster-engine: Attack path analysis for identity privilege graphs.
//!
//! Builds an in-memory multigraph from a dataset snapshot and runs bounded
//! path enumeration with risk scoring, cross-path aggregation, what-if
//! simulation and neighborhood inspection. The active dataset is held behind
//! a hot-swappable handle so analyses always run on a consistent snapshot.

pub mod aggregate;
pub mod algorithms;
pub mod analysis;
pub mod error;
pub mod graph;
pub mod neighbors;
pub mod scoring;
pub mod simulate;
pub mod types;

pub use error::{EngineError, Result};
pub use graph::GraphStore;
pub use types::{
    AnalysisReport, AnalysisRequest, AttackPath, NeighborRequest, Neighborhood, SimulateRequest,
    SimulationReport,
};

use std::io::Read;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;

use forecaster_core::{Dataset, DatasetSummary, EngineConfig, ScenarioPreset, Subnet};

use crate::analysis::AnalysisParams;
use crate::scoring::ScoringConfig;
use crate::types::{GraphStats, GraphView};

/// One immutable dataset snapshot: metadata plus the graph built from it.
#[derive(Debug)]
pub struct ActiveDataset {
    pub dataset: Dataset,
    pub store: GraphStore,
    pub activated_at: DateTime<Utc>,
}

impl ActiveDataset {
    fn build(dataset: Dataset) -> Self {
        let store = GraphStore::from_dataset(&dataset);
        Self {
            dataset,
            store,
            activated_at: Utc::now(),
        }
    }
}

/// The attack path service.
///
/// Readers grab an `Arc` snapshot of the active dataset and work on it
/// without holding the lock; a hot-swap replaces that `Arc` in a single
/// assignment, so in-flight work sees either the old or the new dataset.
pub struct ForecastEngine {
    active: RwLock<Arc<ActiveDataset>>,
    config: EngineConfig,
    scoring_config: ScoringConfig,
}

impl ForecastEngine {
    /// Create an engine with no dataset loaded.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            active: RwLock::new(Arc::new(ActiveDataset::build(Dataset::default()))),
            config,
            scoring_config: ScoringConfig::default(),
        }
    }

    /// Start with `dataset` active.
    pub fn with_dataset(self, dataset: Dataset) -> Self {
        self.swap_dataset(dataset);
        self
    }

    /// Set a custom scoring configuration.
    pub fn with_scoring_config(mut self, config: ScoringConfig) -> Self {
        self.scoring_config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The current dataset snapshot.
    pub fn snapshot(&self) -> Arc<ActiveDataset> {
        let guard = self.active.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Replace the active dataset.
    ///
    /// The new store is built before the write lock is taken.
    pub fn swap_dataset(&self, dataset: Dataset) -> DatasetSummary {
        let next = Arc::new(ActiveDataset::build(dataset));
        let summary = next.dataset.summary(next.activated_at);
        {
            let mut guard = self.active.write().unwrap_or_else(PoisonError::into_inner);
            *guard = next;
        }
        tracing::info!(
            nodes = summary.nodes,
            edges = summary.edges,
            scenarios = summary.scenarios,
            "Dataset activated"
        );
        summary
    }

    /// Read a dataset file and make it active.
    pub fn load_dataset_file(&self, path: impl AsRef<Path>) -> Result<DatasetSummary> {
        let dataset = Dataset::from_path(path)?;
        Ok(self.swap_dataset(dataset))
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot().dataset.is_loaded()
    }

    pub fn dataset_info(&self) -> DatasetSummary {
        let snap = self.snapshot();
        snap.dataset.summary(snap.activated_at)
    }

    /// Full node and edge listing. Fails when no dataset is loaded.
    pub fn graph(&self) -> Result<GraphView> {
        let snap = self.snapshot();
        if !snap.dataset.is_loaded() {
            return Err(EngineError::NoDataset);
        }
        Ok(GraphView {
            nodes: snap.store.nodes().cloned().collect(),
            edges: snap.store.edges().cloned().collect(),
        })
    }

    pub fn graph_stats(&self) -> GraphStats {
        let snap = self.snapshot();
        GraphStats {
            total_nodes: snap.store.node_count(),
            total_edges: snap.store.edge_count(),
            high_value_count: snap.store.high_value_names().count(),
        }
    }

    pub fn subnets(&self) -> Vec<Subnet> {
        self.snapshot().dataset.subnets.clone()
    }

    pub fn start_options(&self) -> Vec<String> {
        self.snapshot().dataset.start_options.clone()
    }

    pub fn scenario_presets(&self) -> IndexMap<String, ScenarioPreset> {
        self.snapshot().dataset.scenario_presets.clone()
    }

    /// Run bounded attack path analysis on the current snapshot.
    pub fn analyze(&self, request: &AnalysisRequest) -> AnalysisReport {
        let params = AnalysisParams::from_request(request, &self.config);
        let snap = self.snapshot();
        let report = analysis::analyze(&snap.store, &params, &self.scoring_config);
        tracing::info!(
            target_node = %params.target,
            paths = report.total_paths,
            global_risk = report.global_risk,
            "Attack paths analyzed"
        );
        report
    }

    /// Run `analyze` on a blocking worker under a wall-clock limit.
    pub async fn analyze_with_timeout(
        &self,
        request: AnalysisRequest,
        limit: Duration,
    ) -> Result<AnalysisReport> {
        let params = AnalysisParams::from_request(&request, &self.config);
        let snap = self.snapshot();
        let scoring_config = self.scoring_config.clone();

        let worker = tokio::task::spawn_blocking(move || {
            analysis::analyze(&snap.store, &params, &scoring_config)
        });

        match tokio::time::timeout(limit, worker).await {
            Ok(Ok(report)) => Ok(report),
            Ok(Err(join_err)) => Err(EngineError::Worker(join_err.to_string())),
            Err(_) => Err(EngineError::Timeout {
                max_seconds: limit.as_secs(),
            }),
        }
    }

    /// Apply a mutation batch to a clone of the current snapshot and compare.
    pub fn simulate(&self, request: &SimulateRequest) -> SimulationReport {
        let params = AnalysisParams::from_request(&request.analysis, &self.config);
        // Baseline and clone both come from this one snapshot.
        let snap = self.snapshot();
        tracing::info!(
            scenario_id = %request.scenario_id,
            mutations = request.mutations.len(),
            "Running simulation"
        );
        simulate::simulate(&snap.store, &params, &request.mutations, &self.scoring_config)
    }

    /// Run a dataset-supplied scenario preset.
    pub fn simulate_preset(
        &self,
        scenario_id: &str,
        analysis: &AnalysisRequest,
    ) -> Result<SimulationReport> {
        let snap = self.snapshot();
        let mutations = snap
            .dataset
            .scenario_mutations(scenario_id)
            .ok_or_else(|| EngineError::ScenarioNotFound {
                scenario_id: scenario_id.to_string(),
            })?;

        let params = AnalysisParams::from_request(analysis, &self.config);
        tracing::info!(scenario_id, mutations = mutations.len(), "Running scenario preset");
        Ok(simulate::simulate(
            &snap.store,
            &params,
            mutations,
            &self.scoring_config,
        ))
    }

    /// Induced subgraph around one node.
    pub fn neighbors(&self, request: &NeighborRequest) -> Neighborhood {
        let radius = request.radius.unwrap_or(self.config.default_radius);
        let snap = self.snapshot();
        neighbors::neighborhood(&snap.store, &request.node_name, radius)
    }
}

/// Read one JSON request from `reader` (stdin for the CLI).
pub fn read_request<T: DeserializeOwned>(mut reader: impl Read) -> Result<T> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    Ok(serde_json::from_str(&input)?)
}

impl Default for ForecastEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
