//! Request and response types for engine operations.

use serde::{Deserialize, Serialize};

use forecaster_core::{Edge, Mutation, Node};

use crate::scoring::ImpactEstimation;

/// Request to analyze attack paths toward one target.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    /// Attacker-controlled start node names, in priority order.
    pub start_nodes: Vec<String>,
    pub target_node: String,
    /// Minimum hop count (default: configured, 4).
    #[serde(default)]
    pub min_depth: Option<usize>,
    /// Maximum hop count (default: configured, 7).
    #[serde(default)]
    pub max_depth: Option<usize>,
    /// Maximum paths per start node (default: configured, 50).
    #[serde(default)]
    pub k: Option<usize>,
}

/// One resolved transition along a path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PathEdge {
    pub edge_id: String,
    pub source: String,
    pub target: String,
    pub relation: String,
    pub weight: u32,
}

/// A scored attack path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttackPath {
    pub path_id: String,
    pub nodes: Vec<String>,
    pub edges: Vec<PathEdge>,
    pub hops: usize,
    pub edge_types: Vec<String>,
    pub sum_weights: u32,
    pub risk: f64,
    pub normalized_score: f64,
    pub impact_estimation: ImpactEstimation,
    pub through_critical: bool,
    pub critical_edges_in_path: Vec<String>,
}

/// How often one edge is traversed across an analysis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CriticalEdgeStat {
    pub edge_id: String,
    pub source: String,
    pub relation: String,
    pub target: String,
    pub traversal_count: usize,
    pub percent_of_paths: f64,
}

/// Complete result of an analysis run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub total_paths: usize,
    pub paths: Vec<AttackPath>,
    pub top5: Vec<AttackPath>,
    pub shortest_hops: usize,
    pub critical_edges: Vec<CriticalEdgeStat>,
    pub global_risk: f64,
}

/// Request to run a what-if simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateRequest {
    #[serde(default)]
    pub scenario_id: String,
    pub mutations: Vec<Mutation>,
    pub analysis: AnalysisRequest,
}

/// Headline numbers of one side of a simulation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub total_paths: usize,
    pub global_risk: f64,
    pub shortest_hops: usize,
    pub high_value_targets_reachable: usize,
    pub path_ids: Vec<String>,
}

/// Before/after comparison.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimulationDelta {
    /// May be negative when mutations open new paths.
    pub path_reduction: i64,
    pub risk_reduction_percent: f64,
    pub eliminated_paths: usize,
}

/// Result of a simulation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    pub before: AnalysisSummary,
    pub after: AnalysisSummary,
    pub delta: SimulationDelta,
}

/// Request for the neighborhood around one node.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighborRequest {
    pub node_name: String,
    #[serde(default)]
    pub radius: Option<usize>,
}

/// Induced subgraph around a node.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Neighborhood {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// Full node and edge listing of the active store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GraphView {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// Statistics about the in-memory graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub high_value_count: usize,
}
