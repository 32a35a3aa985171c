//! Risk scoring engine for attack paths.
//!
//! Formula:
//! `risk = (Σ edge_weight + Σ privilege_weight) × 1/√hops × asset_mult × edge_bonus`
//! rounded to 2 decimals, then normalized to a 0–100 band.

use serde::{Deserialize, Serialize};

use crate::algorithms::ResolvedEdges;
use crate::graph::GraphStore;

/// Scoring configuration parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    /// Multiplier when any path node is high-value (default 2.0).
    pub high_value_multiplier: f64,
    /// Multiplier when the path crosses the critical edge (default 1.5).
    pub critical_edge_bonus: f64,
    /// Divisor mapping risk onto the normalized band (default 1.5).
    pub normalization_divisor: f64,
    /// Normalized score ceiling (default 100.0).
    pub max_score: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            high_value_multiplier: 2.0,
            critical_edge_bonus: 1.5,
            normalization_divisor: 1.5,
            max_score: 100.0,
        }
    }
}

/// Qualitative impact tier derived from the normalized score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ImpactEstimation {
    Critical,
    High,
    Medium,
    Low,
}

impl ImpactEstimation {
    pub fn from_normalized(score: f64) -> Self {
        if score >= 80.0 {
            Self::Critical
        } else if score >= 60.0 {
            Self::High
        } else if score >= 40.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Score of one path, with the factors that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskAssessment {
    pub edge_risk: f64,
    pub priv_bonus: f64,
    pub length_penalty: f64,
    pub critical_asset_multiplier: f64,
    pub critical_edge_bonus: f64,
    pub risk: f64,
    pub normalized_score: f64,
    pub impact: ImpactEstimation,
}

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Compute the risk of a path.
///
/// Pure: the same nodes, resolved edges and graph context always produce
/// the same assessment. Node names missing from the graph score as
/// unprivileged, non-high-value nodes.
pub fn compute_path_risk(
    graph: &GraphStore,
    nodes: &[String],
    resolved: &ResolvedEdges,
    config: &ScoringConfig,
) -> RiskAssessment {
    let hops = nodes.len().saturating_sub(1);

    let edge_risk = f64::from(resolved.sum_weights);

    let priv_bonus: f64 = nodes
        .iter()
        .map(|name| {
            graph
                .node(name)
                .map(|n| n.privilege_level.weight())
                .unwrap_or(1.0)
        })
        .sum();

    let length_penalty = if hops > 0 {
        1.0 / (hops as f64).sqrt()
    } else {
        1.0
    };

    let touches_high_value = nodes
        .iter()
        .any(|name| graph.node(name).is_some_and(|n| n.high_value));
    let critical_asset_multiplier = if touches_high_value {
        config.high_value_multiplier
    } else {
        1.0
    };

    let critical_edge_bonus = if resolved.through_critical {
        config.critical_edge_bonus
    } else {
        1.0
    };

    let raw = (edge_risk + priv_bonus)
        * length_penalty
        * critical_asset_multiplier
        * critical_edge_bonus;
    let risk = round_to(raw, 2);

    let normalized_score = round_to(risk / config.normalization_divisor, 1).min(config.max_score);

    RiskAssessment {
        edge_risk,
        priv_bonus,
        length_penalty,
        critical_asset_multiplier,
        critical_edge_bonus,
        risk,
        normalized_score,
        impact: ImpactEstimation::from_normalized(normalized_score),
    }
}
