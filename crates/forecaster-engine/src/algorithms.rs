//! Bounded simple-path enumeration and parallel-edge resolution.

use std::collections::HashSet;

use crate::graph::GraphStore;
use crate::types::PathEdge;

/// A discovered path before scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPath {
    /// Display id: group letter(s) of the start node + 1-based ordinal.
    pub path_id: String,
    /// Node names from start to target.
    pub nodes: Vec<String>,
}

impl RawPath {
    pub fn hops(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}

/// Bounds for one enumeration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthBounds {
    pub min_depth: usize,
    pub max_depth: usize,
    /// Maximum accepted paths per start node.
    pub k: usize,
}

/// Letter code for the start node at `index`: A..Z, then AA, AB, ...
pub fn group_label(index: usize) -> String {
    let mut label = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        label.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    label.reverse();
    String::from_utf8_lossy(&label).into_owned()
}

/// Enumerate simple paths from each start node to `target`.
///
/// Start nodes are processed in input order; each gets a group label from
/// its position in `starts` (skipped starts still consume a label). Within a
/// group, paths come out in depth-first discovery order and enumeration
/// stops after `bounds.k` accepted paths. Each parallel edge along a route
/// yields its own path, so one node sequence may appear under several ids.
/// Missing starts or a missing target produce no paths.
pub fn enumerate_paths(
    graph: &GraphStore,
    starts: &[String],
    target: &str,
    bounds: DepthBounds,
) -> Vec<RawPath> {
    let mut all_paths = Vec::new();

    if !graph.contains_node(target) {
        return all_paths;
    }

    for (idx, start) in starts.iter().enumerate() {
        if !graph.contains_node(start) {
            continue;
        }
        let group = group_label(idx);
        let found = simple_paths_from(graph, start, target, bounds);
        all_paths.extend(found.into_iter().enumerate().map(|(ordinal, nodes)| RawPath {
            path_id: format!("{group}{}", ordinal + 1),
            nodes,
        }));
    }

    all_paths
}

/// Depth-first search over outgoing edges, keeping an explicit stack of
/// edge-target iterators so discovery order follows adjacency order.
fn simple_paths_from(
    graph: &GraphStore,
    start: &str,
    target: &str,
    bounds: DepthBounds,
) -> Vec<Vec<String>> {
    let mut paths = Vec::new();
    if bounds.k == 0 || bounds.min_depth > bounds.max_depth {
        return paths;
    }

    if start == target {
        // The zero-hop path is the only simple one: any walk out returns to the start.
        if bounds.min_depth == 0 {
            paths.push(vec![start.to_string()]);
        }
        return paths;
    }

    if bounds.max_depth == 0 {
        return paths;
    }

    let mut path: Vec<&str> = vec![start];
    let mut on_path: HashSet<&str> = HashSet::from([start]);
    let mut stack = vec![graph.edge_targets(start).into_iter()];

    while let Some(children) = stack.last_mut() {
        let Some(child) = children.next() else {
            stack.pop();
            if let Some(done) = path.pop() {
                on_path.remove(done);
            }
            continue;
        };

        if on_path.contains(child) {
            continue;
        }

        // Hop count of the path ending at `child`.
        let hops = path.len();

        if child == target {
            if hops >= bounds.min_depth {
                let mut found: Vec<String> = path.iter().map(|s| s.to_string()).collect();
                found.push(child.to_string());
                paths.push(found);
                if paths.len() >= bounds.k {
                    break;
                }
            }
            continue;
        }

        if hops < bounds.max_depth {
            path.push(child);
            on_path.insert(child);
            stack.push(graph.edge_targets(child).into_iter());
        }
    }

    paths
}

/// Resolved transitions of a path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedEdges {
    pub edges: Vec<PathEdge>,
    pub sum_weights: u32,
    pub through_critical: bool,
}

impl ResolvedEdges {
    /// Relation of each resolved step, in order.
    pub fn relations(&self) -> Vec<String> {
        self.edges.iter().map(|e| e.relation.clone()).collect()
    }
}

/// Pick the representative edge (max weight) for each consecutive node pair.
pub fn resolve_edges(graph: &GraphStore, nodes: &[String]) -> ResolvedEdges {
    let critical = graph.critical_edge_id();
    let mut resolved = ResolvedEdges::default();

    for pair in nodes.windows(2) {
        let Some(best) = graph.best_edge(&pair[0], &pair[1]) else {
            continue;
        };
        resolved.sum_weights += best.weight;
        if critical == Some(best.id.as_str()) {
            resolved.through_critical = true;
        }
        resolved.edges.push(PathEdge {
            edge_id: best.id.clone(),
            source: pair[0].clone(),
            target: pair[1].clone(),
            relation: best.relation.clone(),
            weight: best.weight,
        });
    }

    resolved
}
