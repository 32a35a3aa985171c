//! What-if simulation: clone the store, mutate the clone, re-analyze, diff.

use std::collections::HashSet;

use forecaster_core::Mutation;

use crate::analysis::{self, AnalysisParams};
use crate::graph::GraphStore;
use crate::scoring::{round_to, ScoringConfig};
use crate::types::{AnalysisReport, AnalysisSummary, SimulationDelta, SimulationReport};

/// Weight of an added edge when the mutation does not carry one.
pub const DEFAULT_ADDED_EDGE_WEIGHT: u32 = 5;

/// Tally of a mutation batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationOutcome {
    pub applied: usize,
    pub skipped: usize,
}

/// Apply one mutation. Returns `false` when it referenced something absent.
pub fn apply_mutation(graph: &mut GraphStore, mutation: &Mutation) -> bool {
    match mutation {
        Mutation::RemoveEdge { edge_id } => graph.remove_edge(edge_id),
        Mutation::RemoveNode { node_id } => graph.remove_node(node_id),
        Mutation::AddEdge {
            source,
            target,
            relation,
            weight,
        } => {
            let weight = weight.unwrap_or(DEFAULT_ADDED_EDGE_WEIGHT);
            match graph.add_edge(source, target, relation, weight) {
                Some(edge_id) => {
                    tracing::debug!(edge_id = %edge_id, %source, %target, "Simulated edge added");
                    true
                }
                None => false,
            }
        }
    }
}

/// Apply a batch in order. Not-found mutations are skipped, never rolled back.
pub fn apply_mutations(graph: &mut GraphStore, mutations: &[Mutation]) -> MutationOutcome {
    let mut outcome = MutationOutcome::default();
    for mutation in mutations {
        if apply_mutation(graph, mutation) {
            outcome.applied += 1;
        } else {
            tracing::warn!(?mutation, "Mutation skipped: referenced element not found");
            outcome.skipped += 1;
        }
    }
    outcome
}

/// Run the full before/after protocol against `baseline`.
///
/// `baseline` is never modified; mutations go to a deep clone.
pub fn simulate(
    baseline: &GraphStore,
    params: &AnalysisParams,
    mutations: &[Mutation],
    scoring_config: &ScoringConfig,
) -> SimulationReport {
    let before = analysis::analyze(baseline, params, scoring_config);

    let mut mutated = baseline.clone();
    let outcome = apply_mutations(&mut mutated, mutations);

    let after = analysis::analyze(&mutated, params, scoring_config);

    tracing::info!(
        applied = outcome.applied,
        skipped = outcome.skipped,
        paths_before = before.total_paths,
        paths_after = after.total_paths,
        "Simulation complete"
    );

    // High-value flags come from the baseline; removed nodes cannot appear after.
    let high_value: HashSet<&str> = baseline.high_value_names().collect();

    SimulationReport {
        delta: compute_delta(&before, &after),
        before: summarize(&before, &high_value),
        after: summarize(&after, &high_value),
    }
}

/// Reduce a report to its headline numbers.
pub fn summarize(report: &AnalysisReport, high_value: &HashSet<&str>) -> AnalysisSummary {
    AnalysisSummary {
        total_paths: report.total_paths,
        global_risk: report.global_risk,
        shortest_hops: report.shortest_hops,
        high_value_targets_reachable: high_value_reachable(report, high_value),
        path_ids: report.paths.iter().map(|p| p.path_id.clone()).collect(),
    }
}

/// Distinct high-value nodes appearing in any accepted path.
pub fn high_value_reachable(report: &AnalysisReport, high_value: &HashSet<&str>) -> usize {
    report
        .paths
        .iter()
        .flat_map(|p| p.nodes.iter())
        .filter(|name| high_value.contains(name.as_str()))
        .collect::<HashSet<_>>()
        .len()
}

/// Percentage drop in global risk.
///
/// When the baseline risk is zero but mutations introduce risk, the result
/// is `-after / max(after, 1) * 100`.
pub fn risk_reduction_percent(before: f64, after: f64) -> f64 {
    if before > 0.0 {
        round_to((before - after) / before * 100.0, 1)
    } else if after > 0.0 {
        round_to(-after / after.max(1.0) * 100.0, 1)
    } else {
        0.0
    }
}

/// Compare two analyses. Path identity is the ordered node sequence.
pub fn compute_delta(before: &AnalysisReport, after: &AnalysisReport) -> SimulationDelta {
    let after_seqs: HashSet<&[String]> = after.paths.iter().map(|p| p.nodes.as_slice()).collect();
    let before_seqs: HashSet<&[String]> =
        before.paths.iter().map(|p| p.nodes.as_slice()).collect();
    let eliminated_paths = before_seqs
        .iter()
        .filter(|seq| !after_seqs.contains(*seq))
        .count();

    SimulationDelta {
        path_reduction: before.total_paths as i64 - after.total_paths as i64,
        risk_reduction_percent: risk_reduction_percent(before.global_risk, after.global_risk),
        eliminated_paths,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::DepthBounds;
    use crate::graph::tests::scenario_dataset;

    fn scenario_params() -> AnalysisParams {
        AnalysisParams {
            start_nodes: vec!["A".to_string()],
            target: "DC".to_string(),
            bounds: DepthBounds {
                min_depth: 1,
                max_depth: 5,
                k: 50,
            },
        }
    }

    #[test]
    fn test_removing_critical_edge_eliminates_path() {
        let graph = GraphStore::from_dataset(&scenario_dataset());
        let mutations = vec![Mutation::RemoveEdge {
            edge_id: "E2".to_string(),
        }];

        let report = simulate(&graph, &scenario_params(), &mutations, &ScoringConfig::default());

        assert_eq!(report.before.total_paths, 1);
        assert_eq!(report.after.total_paths, 0);
        assert_eq!(report.delta.eliminated_paths, 1);
        assert_eq!(report.delta.path_reduction, 1);
        assert_eq!(report.delta.risk_reduction_percent, 100.0);
        assert_eq!(report.before.high_value_targets_reachable, 1);
        assert_eq!(report.after.high_value_targets_reachable, 0);
        assert_eq!(report.before.path_ids, vec!["A1".to_string()]);

        // Baseline untouched.
        assert!(graph.edge("E2").is_some());
    }

    #[test]
    fn test_baseline_matches_direct_analysis() {
        let graph = GraphStore::from_dataset(&scenario_dataset());
        let params = scenario_params();
        let direct = analysis::analyze(&graph, &params, &ScoringConfig::default());
        let report = simulate(&graph, &params, &[], &ScoringConfig::default());

        let high_value: HashSet<&str> = graph.high_value_names().collect();
        assert_eq!(report.before, summarize(&direct, &high_value));
        assert_eq!(report.before, report.after);
        assert_eq!(report.delta.eliminated_paths, 0);
        assert_eq!(report.delta.risk_reduction_percent, 0.0);
    }

    #[test]
    fn test_add_edge_opens_new_path() {
        let graph = GraphStore::from_dataset(&scenario_dataset());
        let mutations = vec![Mutation::AddEdge {
            source: "A".to_string(),
            target: "DC".to_string(),
            relation: "DCSync".to_string(),
            weight: None,
        }];

        let report = simulate(&graph, &scenario_params(), &mutations, &ScoringConfig::default());
        assert_eq!(report.after.total_paths, 2);
        assert_eq!(report.delta.path_reduction, -1);
        assert_eq!(report.delta.eliminated_paths, 0);
        assert!(report.delta.risk_reduction_percent < 0.0);
    }

    #[test]
    fn test_missing_targets_are_skipped() {
        let mut graph = GraphStore::from_dataset(&scenario_dataset());
        let outcome = apply_mutations(
            &mut graph,
            &[
                Mutation::RemoveEdge {
                    edge_id: "nope".to_string(),
                },
                Mutation::RemoveNode {
                    node_id: "ghost".to_string(),
                },
                Mutation::AddEdge {
                    source: "A".to_string(),
                    target: "ghost".to_string(),
                    relation: "AdminTo".to_string(),
                    weight: Some(7),
                },
                Mutation::RemoveNode {
                    node_id: "B".to_string(),
                },
            ],
        );
        assert_eq!(outcome, MutationOutcome { applied: 1, skipped: 3 });
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_risk_reduction_percent() {
        assert_eq!(risk_reduction_percent(100.0, 25.0), 75.0);
        assert_eq!(risk_reduction_percent(30.0, 40.0), -33.3);
        assert_eq!(risk_reduction_percent(0.0, 12.5), -100.0);
        assert_eq!(risk_reduction_percent(0.0, 0.5), -50.0);
        assert_eq!(risk_reduction_percent(0.0, 0.0), 0.0);
    }
}
