//! In-memory privilege graph.
//!
//! A directed multigraph keyed by node name (adjacency) and edge id
//! (multigraph key). Outgoing and incoming adjacency lists hold edge ids and
//! are kept consistent with the edge table on every mutation.

use indexmap::IndexMap;

use forecaster_core::{Dataset, Edge, Node};

/// The in-memory graph store.
///
/// `Clone` is a deep copy: a cloned store shares no mutable state with the
/// original, so simulations can mutate it freely.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    /// Nodes by name, in insertion order.
    nodes: IndexMap<String, Node>,
    /// Edges by id, in insertion order.
    edges: IndexMap<String, Edge>,
    /// `outgoing[name]` = ids of edges whose source is `name`.
    outgoing: IndexMap<String, Vec<String>>,
    /// `incoming[name]` = ids of edges whose target is `name`.
    incoming: IndexMap<String, Vec<String>>,
    critical_edge_id: Option<String>,
}

impl GraphStore {
    /// Build from a materialised dataset.
    ///
    /// Edges whose endpoints are not known nodes, and edges reusing an id,
    /// are skipped so the store never holds a dangling edge.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut store = Self {
            critical_edge_id: dataset.critical_edge_id.clone(),
            ..Self::default()
        };

        for node in &dataset.nodes {
            if !store.add_node(node.clone()) {
                tracing::warn!(node = %node.name, "Duplicate node name ignored");
            }
        }

        for edge in &dataset.edges {
            if !store.insert_edge(edge.clone()) {
                tracing::warn!(
                    edge_id = %edge.id,
                    source = %edge.source,
                    target = %edge.target,
                    "Edge skipped: unknown endpoint or duplicate id"
                );
            }
        }

        store
    }

    /// Add a node. Returns `false` (and changes nothing) if the name exists.
    pub fn add_node(&mut self, node: Node) -> bool {
        if self.nodes.contains_key(&node.name) {
            return false;
        }
        self.outgoing.insert(node.name.clone(), Vec::new());
        self.incoming.insert(node.name.clone(), Vec::new());
        self.nodes.insert(node.name.clone(), node);
        true
    }

    /// Remove a node and every edge touching it. Returns `false` if absent.
    pub fn remove_node(&mut self, name: &str) -> bool {
        if self.nodes.shift_remove(name).is_none() {
            return false;
        }

        let mut touching = self.outgoing.shift_remove(name).unwrap_or_default();
        touching.extend(self.incoming.shift_remove(name).unwrap_or_default());

        for edge_id in touching {
            // Self-loops appear in both lists; the second removal is a no-op.
            self.remove_edge(&edge_id);
        }
        true
    }

    /// Insert an edge with an explicit id.
    ///
    /// Returns `false` if the id is taken or an endpoint is missing.
    pub fn insert_edge(&mut self, edge: Edge) -> bool {
        if self.edges.contains_key(&edge.id)
            || !self.nodes.contains_key(&edge.source)
            || !self.nodes.contains_key(&edge.target)
        {
            return false;
        }

        if let Some(out) = self.outgoing.get_mut(&edge.source) {
            out.push(edge.id.clone());
        }
        if let Some(inc) = self.incoming.get_mut(&edge.target) {
            inc.push(edge.id.clone());
        }
        self.edges.insert(edge.id.clone(), edge);
        true
    }

    /// Add a new edge and return its generated id (`SIM001`, `SIM002`, ...).
    ///
    /// Returns `None` if either endpoint is not in the store.
    pub fn add_edge(
        &mut self,
        source: &str,
        target: &str,
        relation: &str,
        weight: u32,
    ) -> Option<String> {
        if !self.contains_node(source) || !self.contains_node(target) {
            return None;
        }

        let mut seq = self.edges.len() + 1;
        let mut id = format!("SIM{seq:03}");
        while self.edges.contains_key(&id) {
            seq += 1;
            id = format!("SIM{seq:03}");
        }

        let inserted = self.insert_edge(Edge {
            id: id.clone(),
            source: source.to_string(),
            target: target.to_string(),
            relation: relation.to_string(),
            weight,
        });
        inserted.then_some(id)
    }

    /// Remove an edge by id. Returns `false` if absent.
    pub fn remove_edge(&mut self, edge_id: &str) -> bool {
        let Some(edge) = self.edges.shift_remove(edge_id) else {
            return false;
        };

        if let Some(out) = self.outgoing.get_mut(&edge.source) {
            out.retain(|id| id != edge_id);
        }
        if let Some(inc) = self.incoming.get_mut(&edge.target) {
            inc.retain(|id| id != edge_id);
        }
        true
    }

    pub fn contains_node(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    pub fn edge(&self, edge_id: &str) -> Option<&Edge> {
        self.edges.get(edge_id)
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Distinct successor names of `name`, in order of first connecting edge.
    pub fn successors(&self, name: &str) -> Vec<&str> {
        let mut seen = Vec::new();
        for edge in self.outgoing_edges(name) {
            if !seen.contains(&edge.target.as_str()) {
                seen.push(edge.target.as_str());
            }
        }
        seen
    }

    /// Target of every outgoing edge of `name`. Targets come in order of first
    /// connecting edge, with parallel edges repeating their target in place.
    pub fn edge_targets(&self, name: &str) -> Vec<&str> {
        let mut grouped: IndexMap<&str, usize> = IndexMap::new();
        for edge in self.outgoing_edges(name) {
            *grouped.entry(edge.target.as_str()).or_default() += 1;
        }
        grouped
            .into_iter()
            .flat_map(|(target, count)| std::iter::repeat(target).take(count))
            .collect()
    }

    /// Distinct predecessor names of `name`, in order of first connecting edge.
    pub fn predecessors(&self, name: &str) -> Vec<&str> {
        let mut seen = Vec::new();
        for edge in self.incoming_edges(name) {
            if !seen.contains(&edge.source.as_str()) {
                seen.push(edge.source.as_str());
            }
        }
        seen
    }

    fn outgoing_edges<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.outgoing
            .get(name)
            .into_iter()
            .flatten()
            .filter_map(|id| self.edges.get(id))
    }

    fn incoming_edges<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.incoming
            .get(name)
            .into_iter()
            .flatten()
            .filter_map(|id| self.edges.get(id))
    }

    /// The representative edge for `source → target`: the parallel edge with
    /// the highest weight, the earliest one on ties.
    pub fn best_edge(&self, source: &str, target: &str) -> Option<&Edge> {
        self.outgoing_edges(source)
            .filter(|e| e.target == target)
            .fold(None, |best: Option<&Edge>, e| match best {
                Some(b) if b.weight >= e.weight => Some(b),
                _ => Some(e),
            })
    }

    /// The dataset's designated critical edge id, if any.
    pub fn critical_edge_id(&self) -> Option<&str> {
        self.critical_edge_id.as_deref()
    }

    /// Number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Names of all high-value nodes.
    pub fn high_value_names(&self) -> impl Iterator<Item = &str> {
        self.nodes
            .values()
            .filter(|n| n.high_value)
            .map(|n| n.name.as_str())
    }
}
