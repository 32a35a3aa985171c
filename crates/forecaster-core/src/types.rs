//! Core domain types for the privilege graph.
//!
//! Nodes are principals and machines (users, computers, groups); edges are
//! exploitable relations between them. These records are what a dataset
//! provider hands to the engine and what the engine hands back in results.

use std::borrow::Cow;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ── Nodes ─────────────────────────────────────────────────────────

/// A principal or machine in the privilege graph.
///
/// `name` is the adjacency key and must be unique across a dataset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub name: String,
    /// Category tag: "User", "Computer", "Group", ...
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub privilege_level: PrivilegeLevel,
    #[serde(default)]
    pub high_value: bool,
    #[serde(default)]
    pub subnet: String,
}

/// Privilege label of a node, kept exactly as the dataset provider spelled it.
///
/// Scoring goes through [`PrivilegeLevel::tier`]; serialization writes the
/// original label back out unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PrivilegeLevel(Cow<'static, str>);

impl PrivilegeLevel {
    pub const UNSET: Self = Self(Cow::Borrowed(""));
    pub const LOW: Self = Self(Cow::Borrowed("Low"));
    pub const MID_LOW: Self = Self(Cow::Borrowed("Mid-Low"));
    pub const MID: Self = Self(Cow::Borrowed("Mid"));
    pub const MID_HIGH: Self = Self(Cow::Borrowed("Mid-High"));
    pub const SERVICE: Self = Self(Cow::Borrowed("Service"));
    pub const DOMAIN_ADMIN: Self = Self(Cow::Borrowed("Domain-Admin"));
    pub const DOMAIN_CONTROLLER: Self = Self(Cow::Borrowed("Domain-Controller"));

    pub fn new(label: impl Into<String>) -> Self {
        Self(Cow::Owned(label.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn tier(&self) -> PrivilegeTier {
        PrivilegeTier::from_label(&self.0)
    }

    /// Scoring weight of this label's tier.
    pub fn weight(&self) -> f64 {
        self.tier().weight()
    }
}

/// Privilege tier recognised by the scorer. Higher tiers are worth more to
/// an attacker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrivilegeTier {
    Unset,
    Low,
    MidLow,
    Mid,
    MidHigh,
    Service,
    DomainAdmin,
    DomainController,
    Unknown,
}

impl PrivilegeTier {
    /// Classify a label. Dashed and spaced spellings of the domain tiers are
    /// equivalent.
    pub fn from_label(label: &str) -> Self {
        match label {
            "" => Self::Unset,
            "Low" => Self::Low,
            "Mid-Low" => Self::MidLow,
            "Mid" => Self::Mid,
            "Mid-High" => Self::MidHigh,
            "Service" => Self::Service,
            "Domain-Admin" | "Domain Admin" => Self::DomainAdmin,
            "Domain-Controller" | "Domain Controller" => Self::DomainController,
            _ => Self::Unknown,
        }
    }

    /// Scoring weight of this tier (fixed scale).
    pub fn weight(self) -> f64 {
        match self {
            Self::Low => 1.0,
            Self::MidLow => 1.5,
            Self::Mid => 2.0,
            Self::MidHigh => 3.0,
            Self::Service => 3.5,
            Self::DomainAdmin | Self::DomainController => 5.0,
            Self::Unset | Self::Unknown => 1.0,
        }
    }
}

// ── Edges ─────────────────────────────────────────────────────────

/// A directed, exploitable relation between two nodes.
///
/// `id` keys the multigraph: several edges may join the same ordered pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub relation: String,
    pub weight: u32,
}

/// Weight assigned to relations the weight table does not know.
pub const DEFAULT_RELATION_WEIGHT: u32 = 5;

/// Relation name → default edge weight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct WeightTable(pub IndexMap<String, u32>);

impl WeightTable {
    /// Weight for `relation`, or [`DEFAULT_RELATION_WEIGHT`] when unknown.
    pub fn weight_for(&self, relation: &str) -> u32 {
        self.0
            .get(relation)
            .copied()
            .unwrap_or(DEFAULT_RELATION_WEIGHT)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for WeightTable {
    /// The built-in table used when a dataset does not ship its own.
    fn default() -> Self {
        let entries = [
            ("MemberOf", 3),
            ("CanRDP", 5),
            ("HasSession", 6),
            ("AdminTo", 7),
            ("WriteDACL", 8),
            ("GenericAll", 9),
            ("Owns", 8),
            ("ForceChangePassword", 7),
            ("ReadLAPSPassword", 8),
            ("AllExtendedRights", 9),
            ("DCSync", 10),
        ];
        Self(
            entries
                .into_iter()
                .map(|(relation, weight)| (relation.to_string(), weight))
                .collect(),
        )
    }
}

// ── Mutations ─────────────────────────────────────────────────────

/// A structural change applied to a cloned store during simulation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mutation {
    #[serde(rename_all = "camelCase")]
    RemoveEdge { edge_id: String },
    /// `node_id` carries the node *name* (the adjacency key).
    #[serde(rename_all = "camelCase")]
    RemoveNode { node_id: String },
    AddEdge {
        source: String,
        target: String,
        relation: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        weight: Option<u32>,
    },
}

// ── Dataset metadata ──────────────────────────────────────────────

/// A display grouping of nodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subnet {
    pub id: String,
    #[serde(default)]
    pub cidr: String,
    #[serde(default)]
    pub label: String,
}

/// A named, dataset-supplied batch of mutations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScenarioPreset {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub mutations: Vec<Mutation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn privilege_level_accepts_both_spellings() {
        let dashed: PrivilegeLevel = serde_json::from_str("\"Domain-Admin\"").unwrap();
        let spaced: PrivilegeLevel = serde_json::from_str("\"Domain Admin\"").unwrap();
        assert_eq!(dashed.tier(), PrivilegeTier::DomainAdmin);
        assert_eq!(spaced.tier(), PrivilegeTier::DomainAdmin);

        let dc: PrivilegeLevel = serde_json::from_str("\"Domain Controller\"").unwrap();
        assert_eq!(dc.tier(), PrivilegeTier::DomainController);
        assert_eq!(dc.weight(), 5.0);
    }

    #[test]
    fn privilege_level_empty_and_unknown() {
        let empty: PrivilegeLevel = serde_json::from_str("\"\"").unwrap();
        assert_eq!(empty, PrivilegeLevel::UNSET);
        assert_eq!(empty.tier(), PrivilegeTier::Unset);

        let odd: PrivilegeLevel = serde_json::from_str("\"Galactic Overlord\"").unwrap();
        assert_eq!(odd.tier(), PrivilegeTier::Unknown);
        assert_eq!(odd.weight(), 1.0);
    }

    #[test]
    fn privilege_level_keeps_provider_spelling() {
        let json = r#"[
            {"id": "1", "name": "da", "type": "Group", "privilegeLevel": "Domain Admin"},
            {"id": "2", "name": "t0", "type": "User", "privilegeLevel": "Tier0"}
        ]"#;
        let nodes: Vec<Node> = serde_json::from_str(json).unwrap();
        assert_eq!(nodes[0].privilege_level.as_str(), "Domain Admin");
        assert_eq!(nodes[1].privilege_level.as_str(), "Tier0");

        let out = serde_json::to_value(&nodes).unwrap();
        assert_eq!(out[0]["privilegeLevel"], "Domain Admin");
        assert_eq!(out[1]["privilegeLevel"], "Tier0");
    }

    #[test]
    fn privilege_weights() {
        assert_eq!(PrivilegeLevel::LOW.weight(), 1.0);
        assert_eq!(PrivilegeLevel::MID_LOW.weight(), 1.5);
        assert_eq!(PrivilegeLevel::MID.weight(), 2.0);
        assert_eq!(PrivilegeLevel::MID_HIGH.weight(), 3.0);
        assert_eq!(PrivilegeLevel::SERVICE.weight(), 3.5);
        assert_eq!(PrivilegeLevel::DOMAIN_ADMIN.weight(), 5.0);
        assert_eq!(PrivilegeLevel::DOMAIN_CONTROLLER.weight(), 5.0);
        assert_eq!(PrivilegeLevel::UNSET.weight(), 1.0);
        assert_eq!(PrivilegeLevel::new("Tier0").weight(), 1.0);
    }

    #[test]
    fn node_defaults_optional_fields() {
        let node: Node =
            serde_json::from_str(r#"{"id": "1", "name": "alice", "type": "User"}"#).unwrap();
        assert_eq!(node.privilege_level, PrivilegeLevel::UNSET);
        assert!(!node.high_value);
        assert!(node.subnet.is_empty());
    }

    #[test]
    fn default_weight_table() {
        let table = WeightTable::default();
        assert_eq!(table.len(), 11);
        assert_eq!(table.weight_for("MemberOf"), 3);
        assert_eq!(table.weight_for("DCSync"), 10);
        assert_eq!(table.weight_for("SomethingNew"), DEFAULT_RELATION_WEIGHT);
    }

    #[test]
    fn mutation_wire_format() {
        let m: Mutation =
            serde_json::from_str(r#"{"type": "removeEdge", "edgeId": "E7"}"#).unwrap();
        assert_eq!(
            m,
            Mutation::RemoveEdge {
                edge_id: "E7".to_string()
            }
        );

        let m: Mutation = serde_json::from_str(
            r#"{"type": "addEdge", "source": "a", "target": "b", "relation": "AdminTo"}"#,
        )
        .unwrap();
        assert!(matches!(m, Mutation::AddEdge { weight: None, .. }));

        let json = serde_json::to_string(&Mutation::RemoveNode {
            node_id: "WS01".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"removeNode","nodeId":"WS01"}"#);
    }
}
