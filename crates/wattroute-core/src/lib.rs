//! # wattroute-core: Graph Store and Shared Types
//!
//! Provides the weighted topology that every other wattroute crate reads from,
//! together with the small shared records exchanged between them.
//!
//! ## Design Philosophy
//!
//! Sites (cities, regions, substations) are modeled as nodes of a weighted
//! **directed** graph where an undirected topology is just a directed one in
//! which every edge has a mirror of identical weight:
//! - **Nodes**: opaque string labels, interned into dense [`NodeId`] indices
//! - **Edges**: `source -> target` with a numeric [`EdgeWeight`] cost
//!
//! Interning keeps the algorithms (shortest path, redistribution planning)
//! working on `Copy` indices instead of hashing labels on every comparison.
//!
//! ## Quick Start
//!
//! ```rust
//! use wattroute_core::GraphStore;
//!
//! // Undirected: every connect() also inserts the mirror edge
//! let mut graph: GraphStore<f64> = GraphStore::undirected();
//! graph.connect("Paris", "Lyon", 4.0).unwrap();
//! graph.connect_default("Lyon", "Marseille").unwrap();
//!
//! assert_eq!(graph.weight("Lyon", "Paris"), Some(4.0));
//! assert_eq!(graph.weight("Marseille", "Lyon"), Some(1.0));
//! assert_eq!(graph.weight("Paris", "Marseille"), None);
//! assert_eq!(graph.node_count(), 3);
//! ```
//!
//! ## Modules
//!
//! - [`graph`] - The [`GraphStore`] adjacency relation and label interner
//! - [`weight`] - The [`EdgeWeight`] trait for numeric edge costs
//! - [`sample`] - Per-step production/consumption samples
//! - [`graph_utils`] - Topological summaries and Graphviz export
//! - [`diagnostics`] - Non-fatal data-quality reporting
//! - [`error`] - Error types

use serde::{Deserialize, Serialize};

pub mod diagnostics;
pub mod error;
pub mod graph;
pub mod graph_utils;
pub mod sample;
pub mod weight;

pub use diagnostics::{DiagnosticIssue, Diagnostics, Severity};
pub use error::{GraphError, GraphResult, WattError, WattResult};
pub use graph::GraphStore;
pub use graph_utils::*;
pub use sample::StepSample;
pub use weight::EdgeWeight;

/// Interned node identifier issued by a [`GraphStore`].
///
/// Ids are dense and assigned in first-seen order, so they double as indices
/// into per-node vectors. An id is only meaningful for the store that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    pub fn new(value: usize) -> Self {
        NodeId(value)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Node#{}", self.0)
    }
}
