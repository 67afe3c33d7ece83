//! Per-step node classification.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use wattroute_core::{EdgeWeight, GraphStore, NodeId, StepSample};

/// Where a node stands for one step.
///
/// `Unknown` is its own category: a node missing either reading is never
/// treated as balanced and never takes part in routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Surplus,
    Deficit,
    Balanced,
    Unknown,
}

impl NodeStatus {
    pub fn classify(sample: &StepSample) -> Self {
        match (sample.production(), sample.consumption()) {
            (Some(production), Some(consumption)) if production > consumption => {
                NodeStatus::Surplus
            }
            (Some(production), Some(consumption)) if production < consumption => {
                NodeStatus::Deficit
            }
            (Some(_), Some(_)) => NodeStatus::Balanced,
            _ => NodeStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeStatus::Surplus => "surplus",
            NodeStatus::Deficit => "deficit",
            NodeStatus::Balanced => "balanced",
            NodeStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of every node of `graph`; nodes without a sample are `Unknown`.
pub fn classify_nodes<W: EdgeWeight>(
    graph: &GraphStore<W>,
    samples: &HashMap<NodeId, StepSample>,
) -> BTreeMap<NodeId, NodeStatus> {
    graph
        .nodes()
        .map(|node| {
            let status = samples
                .get(&node)
                .map(NodeStatus::classify)
                .unwrap_or(NodeStatus::Unknown);
            (node, status)
        })
        .collect()
}
