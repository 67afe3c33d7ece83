//! # wattroute-algo: Routing Algorithms for Surplus Redistribution
//!
//! This crate turns a [`GraphStore`](wattroute_core::GraphStore) topology and a
//! snapshot of per-node production/consumption into routing hints.
//!
//! ## Pipeline
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | Classify each node for a step | [`status`] | [`NodeStatus`] per node |
//! | Pair every surplus node with every deficit node | [`redistribution`] | candidate pairs |
//! | Route each pair over the full topology | [`shortest_path`] | [`Path`] |
//! | Keep the first hop, bound the magnitude | [`redistribution`] | [`RoutingInstruction`]s |
//!
//! Pairs are routed **independently**: no edge capacity is consumed or tracked
//! between pairs. This is a per-pair heuristic for visualising where surplus
//! should head, not a flow solver.
//!
//! ## Site assessment
//!
//! [`assessment`] scores weather sites for wind and solar potential. It shares
//! no state with the router and exists so the same workspace can rank where
//! new production would be best placed.
//!
//! ## Example
//!
//! ```
//! use std::collections::HashMap;
//! use wattroute_algo::{RedistributionPlanner, PlannerConfig};
//! use wattroute_core::{GraphStore, StepSample};
//!
//! let graph = GraphStore::from_adjacency(
//!     vec![("A", vec![("B", 1.0), ("C", 5.0)]), ("B", vec![("C", 2.0)])],
//!     true,
//! )
//! .unwrap();
//!
//! let mut samples = HashMap::new();
//! samples.insert(graph.node_id("A").unwrap(), StepSample::known(10.0, 4.0));
//! samples.insert(graph.node_id("B").unwrap(), StepSample::known(2.0, 9.0));
//!
//! let planner = RedistributionPlanner::new(PlannerConfig::default());
//! let plan = planner.plan_step(&graph, &samples, 0);
//!
//! assert_eq!(plan.instructions.len(), 1);
//! assert_eq!(plan.instructions[0].first_hop, graph.node_id("B").unwrap());
//! ```

pub mod assessment;
pub mod redistribution;
pub mod shortest_path;
pub mod status;

pub use assessment::{assess_site, EnergySource, SiteConditions, SiteScore};
pub use redistribution::{
    resolve_samples, PlannerConfig, PlannerError, RedistributionPlanner, RoutingInstruction,
    StepPlan, DEFAULT_CAP, DEFAULT_SCALE,
};
pub use shortest_path::{find_shortest_path, path_cost, Path, ShortestPathFinder};
pub use status::{classify_nodes, NodeStatus};
