//! Cross-path statistics: edge traversal frequency, global risk, shortest hop count.

use indexmap::IndexMap;

use crate::scoring::round_to;
use crate::types::{AttackPath, CriticalEdgeStat};

/// Count how many paths traverse each edge.
///
/// Sorted by traversal count descending; ties keep first-seen order.
pub fn critical_edges(paths: &[AttackPath]) -> Vec<CriticalEdgeStat> {
    let total = paths.len();
    if total == 0 {
        return Vec::new();
    }

    let mut counts: IndexMap<&str, CriticalEdgeStat> = IndexMap::new();
    for path in paths {
        for edge in &path.edges {
            counts
                .entry(edge.edge_id.as_str())
                .or_insert_with(|| CriticalEdgeStat {
                    edge_id: edge.edge_id.clone(),
                    source: edge.source.clone(),
                    relation: edge.relation.clone(),
                    target: edge.target.clone(),
                    traversal_count: 0,
                    percent_of_paths: 0.0,
                })
                .traversal_count += 1;
        }
    }

    let mut stats: Vec<CriticalEdgeStat> = counts
        .into_values()
        .map(|mut stat| {
            stat.percent_of_paths = round_to(stat.traversal_count as f64 / total as f64 * 100.0, 1);
            stat
        })
        .collect();
    // `sort_by` is stable, so equal counts stay in insertion order.
    stats.sort_by(|a, b| b.traversal_count.cmp(&a.traversal_count));
    stats
}

/// Sum of path risks, rounded to 2 decimals.
pub fn global_risk(paths: &[AttackPath]) -> f64 {
    round_to(paths.iter().map(|p| p.risk).sum(), 2)
}

/// Minimum hop count across paths, or 0 when there are none.
pub fn shortest_hops(paths: &[AttackPath]) -> usize {
    paths.iter().map(|p| p.hops).min().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ImpactEstimation;
    use crate::types::PathEdge;

    fn edge(id: &str, source: &str, target: &str) -> PathEdge {
        PathEdge {
            edge_id: id.to_string(),
            source: source.to_string(),
            target: target.to_string(),
            relation: "AdminTo".to_string(),
            weight: 7,
        }
    }

    fn path(id: &str, edges: Vec<PathEdge>, risk: f64) -> AttackPath {
        let mut nodes: Vec<String> = edges.iter().map(|e| e.source.clone()).collect();
        if let Some(last) = edges.last() {
            nodes.push(last.target.clone());
        }
        AttackPath {
            path_id: id.to_string(),
            hops: edges.len(),
            nodes,
            edge_types: edges.iter().map(|e| e.relation.clone()).collect(),
            sum_weights: edges.iter().map(|e| e.weight).sum(),
            edges,
            risk,
            normalized_score: 0.0,
            impact_estimation: ImpactEstimation::Low,
            through_critical: false,
            critical_edges_in_path: Vec::new(),
        }
    }

    fn sample() -> Vec<AttackPath> {
        vec![
            path("A1", vec![edge("e1", "a", "b"), edge("e2", "b", "t")], 10.12),
            path("A2", vec![edge("e3", "a", "c"), edge("e4", "c", "t")], 5.5),
            path("B1", vec![edge("e5", "d", "b"), edge("e2", "b", "t")], 2.0),
        ]
    }

    #[test]
    fn test_critical_edges_counts_and_order() {
        let stats = critical_edges(&sample());
        assert_eq!(stats.len(), 5);

        assert_eq!(stats[0].edge_id, "e2");
        assert_eq!(stats[0].traversal_count, 2);
        assert!((stats[0].percent_of_paths - 66.7).abs() < 1e-9);

        // Remaining edges tie at one traversal and keep first-seen order.
        let rest: Vec<&str> = stats[1..].iter().map(|s| s.edge_id.as_str()).collect();
        assert_eq!(rest, vec!["e1", "e3", "e4", "e5"]);
        assert!((stats[1].percent_of_paths - 33.3).abs() < 1e-9);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(critical_edges(&[]).is_empty());
        assert_eq!(global_risk(&[]), 0.0);
        assert_eq!(shortest_hops(&[]), 0);
    }

    #[test]
    fn test_global_risk_and_shortest() {
        let paths = sample();
        assert!((global_risk(&paths) - 17.62).abs() < 1e-9);

        let mut mixed = paths;
        mixed.push(path("C1", vec![edge("e9", "x", "t")], 1.0));
        assert_eq!(shortest_hops(&mixed), 1);
    }
}
