//! Neighborhood computation for focused inspection.
//!
//! Bidirectional BFS from a node: each round adds the successors and
//! predecessors of the current frontier. The result is the induced subgraph
//! on everything visited.

use std::collections::HashSet;

use crate::graph::GraphStore;
use crate::types::Neighborhood;

/// Nodes within `radius` hops of `node_name` (either direction) and every
/// edge between two of them. An unknown node yields an empty neighborhood.
pub fn neighborhood(graph: &GraphStore, node_name: &str, radius: usize) -> Neighborhood {
    if !graph.contains_node(node_name) {
        return Neighborhood::default();
    }

    let mut visited: HashSet<&str> = HashSet::from([node_name]);
    let mut frontier: Vec<&str> = vec![node_name];

    for _ in 0..radius {
        let mut next = Vec::new();
        for &node in &frontier {
            for neighbor in graph
                .successors(node)
                .into_iter()
                .chain(graph.predecessors(node))
            {
                if visited.insert(neighbor) {
                    next.push(neighbor);
                }
            }
        }
        if next.is_empty() {
            break;
        }
        frontier = next;
    }

    Neighborhood {
        nodes: graph
            .nodes()
            .filter(|n| visited.contains(n.name.as_str()))
            .cloned()
            .collect(),
        edges: graph
            .edges()
            .filter(|e| visited.contains(e.source.as_str()) && visited.contains(e.target.as_str()))
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::{make_edge, make_node, scenario_dataset};
    use forecaster_core::{Dataset, PrivilegeLevel};

    fn names(hood: &Neighborhood) -> Vec<&str> {
        hood.nodes.iter().map(|n| n.name.as_str()).collect()
    }

    /// Chain `n0 -> n1 -> n2 -> n3 -> n4` plus `n4 -> n0` back edge.
    fn chain() -> GraphStore {
        let ds = Dataset {
            nodes: (0..5)
                .map(|i| make_node(&format!("n{i}"), PrivilegeLevel::LOW, false))
                .collect(),
            edges: vec![
                make_edge("e01", "n0", "n1", "MemberOf", 3),
                make_edge("e12", "n1", "n2", "MemberOf", 3),
                make_edge("e23", "n2", "n3", "MemberOf", 3),
                make_edge("e34", "n3", "n4", "MemberOf", 3),
                make_edge("e40", "n4", "n0", "MemberOf", 3),
            ],
            ..Dataset::default()
        };
        GraphStore::from_dataset(&ds)
    }

    #[test]
    fn test_scenario_radius_one() {
        let graph = GraphStore::from_dataset(&scenario_dataset());
        let hood = neighborhood(&graph, "B", 1);
        assert_eq!(names(&hood), vec!["A", "B", "DC"]);
        assert_eq!(hood.edges.len(), 2);
    }

    #[test]
    fn test_follows_both_directions() {
        let graph = chain();
        let hood = neighborhood(&graph, "n2", 1);
        assert_eq!(names(&hood), vec!["n1", "n2", "n3"]);
        assert_eq!(hood.edges.len(), 2);
    }

    #[test]
    fn test_radius_two_includes_induced_back_edge() {
        let graph = chain();
        let hood = neighborhood(&graph, "n0", 2);
        // n0 -> n1 -> n2 forward, n0 <- n4 <- n3 backward.
        assert_eq!(names(&hood), vec!["n0", "n1", "n2", "n3", "n4"]);
        assert_eq!(hood.edges.len(), 5);
    }

    #[test]
    fn test_radius_zero_is_just_the_node() {
        let graph = chain();
        let hood = neighborhood(&graph, "n3", 0);
        assert_eq!(names(&hood), vec!["n3"]);
        assert!(hood.edges.is_empty());
    }

    #[test]
    fn test_unknown_node_is_empty() {
        let graph = chain();
        let hood = neighborhood(&graph, "missing", 3);
        assert!(hood.nodes.is_empty());
        assert!(hood.edges.is_empty());
    }
}
