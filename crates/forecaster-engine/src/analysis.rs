//! The `analyze` composition: enumerate → resolve → score → sort → aggregate.

use forecaster_core::EngineConfig;

use crate::aggregate;
use crate::algorithms::{self, DepthBounds};
use crate::graph::GraphStore;
use crate::scoring::{self, ScoringConfig};
use crate::types::{AnalysisReport, AnalysisRequest, AttackPath};

/// Number of paths reported in `top5`.
const TOP_PATHS: usize = 5;
/// Number of edges reported in `critical_edges`.
const TOP_CRITICAL_EDGES: usize = 10;

/// Fully resolved analysis parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisParams {
    pub start_nodes: Vec<String>,
    pub target: String,
    pub bounds: DepthBounds,
}

impl AnalysisParams {
    /// Fill request gaps from the configured defaults.
    pub fn from_request(request: &AnalysisRequest, config: &EngineConfig) -> Self {
        Self {
            start_nodes: request.start_nodes.clone(),
            target: request.target_node.clone(),
            bounds: DepthBounds {
                min_depth: request.min_depth.unwrap_or(config.default_min_depth),
                max_depth: request.max_depth.unwrap_or(config.default_max_depth),
                k: request.k.unwrap_or(config.default_k),
            },
        }
    }
}

/// Enumerate and score every accepted path, sorted by risk descending.
///
/// Ties keep discovery order.
pub fn find_paths(
    graph: &GraphStore,
    params: &AnalysisParams,
    scoring_config: &ScoringConfig,
) -> Vec<AttackPath> {
    let raw_paths =
        algorithms::enumerate_paths(graph, &params.start_nodes, &params.target, params.bounds);

    let mut paths: Vec<AttackPath> = raw_paths
        .into_iter()
        .map(|raw| {
            let hops = raw.hops();
            let resolved = algorithms::resolve_edges(graph, &raw.nodes);
            let score = scoring::compute_path_risk(graph, &raw.nodes, &resolved, scoring_config);
            let critical_edges_in_path = resolved
                .edges
                .iter()
                .filter(|e| graph.critical_edge_id() == Some(e.edge_id.as_str()))
                .map(|e| e.edge_id.clone())
                .collect();

            AttackPath {
                path_id: raw.path_id,
                nodes: raw.nodes,
                edge_types: resolved.relations(),
                hops,
                sum_weights: resolved.sum_weights,
                risk: score.risk,
                normalized_score: score.normalized_score,
                impact_estimation: score.impact,
                through_critical: resolved.through_critical,
                critical_edges_in_path,
                edges: resolved.edges,
            }
        })
        .collect();

    paths.sort_by(|a, b| b.risk.total_cmp(&a.risk));
    paths
}

/// Run a full analysis on one store snapshot.
pub fn analyze(
    graph: &GraphStore,
    params: &AnalysisParams,
    scoring_config: &ScoringConfig,
) -> AnalysisReport {
    let paths = find_paths(graph, params, scoring_config);

    let mut critical_edges = aggregate::critical_edges(&paths);
    critical_edges.truncate(TOP_CRITICAL_EDGES);

    tracing::debug!(
        target_node = %params.target,
        starts = params.start_nodes.len(),
        paths = paths.len(),
        "Analysis complete"
    );

    AnalysisReport {
        total_paths: paths.len(),
        top5: paths.iter().take(TOP_PATHS).cloned().collect(),
        shortest_hops: aggregate::shortest_hops(&paths),
        critical_edges,
        global_risk: aggregate::global_risk(&paths),
        paths,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::{make_edge, make_node, scenario_dataset};
    use crate::scoring::ImpactEstimation;
    use forecaster_core::{Dataset, PrivilegeLevel};

    fn params(starts: &[&str], target: &str, min_depth: usize, max_depth: usize) -> AnalysisParams {
        AnalysisParams {
            start_nodes: starts.iter().map(|s| s.to_string()).collect(),
            target: target.to_string(),
            bounds: DepthBounds {
                min_depth,
                max_depth,
                k: 50,
            },
        }
    }

    #[test]
    fn test_scenario_single_path() {
        let graph = GraphStore::from_dataset(&scenario_dataset());
        let report = analyze(&graph, &params(&["A"], "DC", 1, 5), &ScoringConfig::default());

        assert_eq!(report.total_paths, 1);
        let path = &report.paths[0];
        assert_eq!(path.path_id, "A1");
        assert_eq!(path.nodes, vec!["A", "B", "DC"]);
        assert_eq!(path.hops, 2);
        assert_eq!(path.sum_weights, 15);
        assert!(path.through_critical);
        assert_eq!(path.critical_edges_in_path, vec!["E2".to_string()]);
        assert_eq!(path.edge_types, vec!["X".to_string(), "Y".to_string()]);
        assert!((path.risk - 48.79).abs() < 1e-9);
        assert!((path.normalized_score - 32.5).abs() < 1e-9);
        assert_eq!(path.impact_estimation, ImpactEstimation::Low);

        assert_eq!(report.shortest_hops, 2);
        assert!((report.global_risk - 48.79).abs() < 1e-9);
        assert_eq!(report.top5.len(), 1);
        assert_eq!(report.critical_edges.len(), 2);
        assert_eq!(report.critical_edges[0].percent_of_paths, 100.0);
    }

    #[test]
    fn test_paths_sorted_by_risk_with_stable_ties() {
        // Two starts with structurally identical routes tie on risk.
        let ds = Dataset {
            nodes: vec![
                make_node("u1", PrivilegeLevel::LOW, false),
                make_node("u2", PrivilegeLevel::LOW, false),
                make_node("srv", PrivilegeLevel::SERVICE, false),
                make_node("dc", PrivilegeLevel::DOMAIN_CONTROLLER, true),
            ],
            edges: vec![
                make_edge("a", "u1", "dc", "AdminTo", 7),
                make_edge("b", "u2", "dc", "AdminTo", 7),
                make_edge("c", "u1", "srv", "HasSession", 6),
                make_edge("d", "srv", "dc", "DCSync", 10),
            ],
            ..Dataset::default()
        };
        let graph = GraphStore::from_dataset(&ds);
        let report = analyze(&graph, &params(&["u1", "u2"], "dc", 1, 4), &ScoringConfig::default());

        let ids: Vec<&str> = report.paths.iter().map(|p| p.path_id.as_str()).collect();
        // u1->srv->dc: (16 + 9.5)/sqrt(2)*2 = 36.06; direct: (7 + 6)*2 = 26.0
        assert_eq!(ids, vec!["A2", "A1", "B1"]);
        assert_eq!(report.paths[1].risk, report.paths[2].risk);
        assert!(report.paths.windows(2).all(|w| w[0].risk >= w[1].risk));
    }

    #[test]
    fn test_no_paths_report() {
        let graph = GraphStore::from_dataset(&scenario_dataset());
        let report = analyze(&graph, &params(&["DC"], "A", 1, 5), &ScoringConfig::default());
        assert_eq!(report.total_paths, 0);
        assert_eq!(report.shortest_hops, 0);
        assert_eq!(report.global_risk, 0.0);
        assert!(report.critical_edges.is_empty());
        assert!(report.top5.is_empty());
    }

    #[test]
    fn test_params_from_request_defaults() {
        let request = AnalysisRequest {
            start_nodes: vec!["A".to_string()],
            target_node: "DC".to_string(),
            min_depth: None,
            max_depth: Some(9),
            k: None,
        };
        let p = AnalysisParams::from_request(&request, &EngineConfig::default());
        assert_eq!(p.bounds.min_depth, 4);
        assert_eq!(p.bounds.max_depth, 9);
        assert_eq!(p.bounds.k, 50);
    }

    #[test]
    fn test_analyze_is_idempotent() {
        let graph = GraphStore::from_dataset(&scenario_dataset());
        let p = params(&["A", "B"], "DC", 1, 5);
        let first = analyze(&graph, &p, &ScoringConfig::default());
        let second = analyze(&graph, &p, &ScoringConfig::default());
        assert_eq!(first, second);
    }
}
