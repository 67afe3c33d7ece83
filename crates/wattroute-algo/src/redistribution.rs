//! Per-step surplus/deficit redistribution planning.
//!
//! For one step the planner:
//!
//! 1. classifies every node of the topology ([`NodeStatus`]);
//! 2. computes each surplus node's `production - consumption`;
//! 3. routes every ordered `(surplus, deficit)` pair over the **full, unmodified**
//!    topology with [`find_shortest_path`](crate::shortest_path::find_shortest_path);
//! 4. turns each route of two or more nodes into a [`RoutingInstruction`] whose
//!    magnitude is `clamp(surplus / scale, 0, cap)`;
//! 5. records pairs without a route and moves on.
//!
//! Pairs never see each other's routes: there are no edge capacities and no
//! conservation of the surplus across deficits. A surplus node with three
//! reachable deficits yields three instructions, each sized from the whole
//! surplus. That is the intended heuristic; do not read the output as a flow
//! solution.
//!
//! With the `parallel` feature pairs are routed on the rayon pool. The graph
//! is only read, and results are collected in pair order either way.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use wattroute_core::{Diagnostics, EdgeWeight, GraphStore, NodeId, StepSample};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::shortest_path::ShortestPathFinder;
use crate::status::{classify_nodes, NodeStatus};

/// Surplus that maps to a magnitude of 1.0 before capping.
pub const DEFAULT_SCALE: f64 = 500.0;
/// Largest magnitude an instruction may carry.
pub const DEFAULT_CAP: f64 = 0.5;

/// Rejected planner settings.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlannerError {
    #[error("scale must be a positive finite number, got {0}")]
    InvalidScale(f64),

    #[error("cap must be a non-negative finite number, got {0}")]
    InvalidCap(f64),
}

/// Constants bounding instruction magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlannerConfig {
    scale: f64,
    cap: f64,
}

impl PlannerConfig {
    pub fn new(scale: f64, cap: f64) -> Result<Self, PlannerError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(PlannerError::InvalidScale(scale));
        }
        if !(cap.is_finite() && cap >= 0.0) {
            return Err(PlannerError::InvalidCap(cap));
        }
        Ok(Self { scale, cap })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn cap(&self) -> f64 {
        self.cap
    }

    /// `clamp(surplus / scale, 0, cap)`.
    pub fn magnitude(&self, surplus: f64) -> f64 {
        let scaled = surplus / self.scale;
        if scaled.is_nan() {
            return 0.0;
        }
        scaled.clamp(0.0, self.cap)
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            cap: DEFAULT_CAP,
        }
    }
}

/// Directed hint: send part of `origin`'s surplus through `first_hop`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoutingInstruction {
    pub origin: NodeId,
    pub first_hop: NodeId,
    /// Deficit node the route was computed for
    pub destination: NodeId,
    pub magnitude: f64,
}

/// Everything the planner derived for one step.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StepPlan {
    pub step: usize,
    pub statuses: BTreeMap<NodeId, NodeStatus>,
    /// Surplus amount of every surplus node
    pub surpluses: BTreeMap<NodeId, f64>,
    pub instructions: Vec<RoutingInstruction>,
    /// `(surplus, deficit)` pairs with no route between them
    pub unrouted: Vec<(NodeId, NodeId)>,
    pub diagnostics: Diagnostics,
}

impl StepPlan {
    pub fn status(&self, node: NodeId) -> NodeStatus {
        self.statuses
            .get(&node)
            .copied()
            .unwrap_or(NodeStatus::Unknown)
    }

    pub fn nodes_with(&self, status: NodeStatus) -> impl Iterator<Item = NodeId> + '_ {
        self.statuses
            .iter()
            .filter(move |(_, s)| **s == status)
            .map(|(node, _)| *node)
    }

    pub fn count(&self, status: NodeStatus) -> usize {
        self.nodes_with(status).count()
    }
}

/// Pure planner: holds only its configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedistributionPlanner {
    config: PlannerConfig,
}

impl RedistributionPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan one step. `samples` maps nodes to their readings for that step;
    /// nodes absent from it are `Unknown`, ids not in `graph` are ignored.
    pub fn plan_step<W: EdgeWeight>(
        &self,
        graph: &GraphStore<W>,
        samples: &HashMap<NodeId, StepSample>,
        step: usize,
    ) -> StepPlan {
        let statuses = classify_nodes(graph, samples);
        let mut diagnostics = Diagnostics::new();

        let mut surpluses = BTreeMap::new();
        let mut deficits = Vec::new();
        for (&node, &status) in &statuses {
            match status {
                NodeStatus::Surplus => {
                    let amount = samples
                        .get(&node)
                        .and_then(StepSample::net)
                        .unwrap_or(0.0)
                        .max(0.0);
                    surpluses.insert(node, amount);
                }
                NodeStatus::Deficit => deficits.push(node),
                NodeStatus::Balanced => {}
                NodeStatus::Unknown => diagnostics.add_warning_with_entity(
                    "data-quality",
                    &format!("incomplete readings at step {step}; node left out of routing"),
                    &graph.display_label(node),
                ),
            }
        }

        let pairs: Vec<(NodeId, f64, NodeId)> = surpluses
            .iter()
            .flat_map(|(&origin, &amount)| {
                deficits
                    .iter()
                    .map(move |&destination| (origin, amount, destination))
            })
            .collect();

        let finder = ShortestPathFinder::new(graph);
        let routed = self.route_pairs(&finder, &pairs);

        let mut instructions = Vec::with_capacity(routed.len());
        let mut unrouted = Vec::new();
        for ((origin, destination), instruction) in routed {
            match instruction {
                Some(instruction) => instructions.push(instruction),
                None => {
                    debug!(
                        origin = %graph.display_label(origin),
                        destination = %graph.display_label(destination),
                        step,
                        "no route between surplus and deficit node"
                    );
                    unrouted.push((origin, destination));
                }
            }
        }

        debug!(
            step,
            surplus_nodes = surpluses.len(),
            deficit_nodes = deficits.len(),
            instructions = instructions.len(),
            unrouted = unrouted.len(),
            "planned redistribution step"
        );

        StepPlan {
            step,
            statuses,
            surpluses,
            instructions,
            unrouted,
            diagnostics,
        }
    }

    #[cfg(feature = "parallel")]
    fn route_pairs<W: EdgeWeight>(
        &self,
        finder: &ShortestPathFinder<'_, W>,
        pairs: &[(NodeId, f64, NodeId)],
    ) -> Vec<((NodeId, NodeId), Option<RoutingInstruction>)> {
        pairs
            .par_iter()
            .map(|&(origin, amount, destination)| {
                (
                    (origin, destination),
                    self.route_pair(finder, origin, amount, destination),
                )
            })
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn route_pairs<W: EdgeWeight>(
        &self,
        finder: &ShortestPathFinder<'_, W>,
        pairs: &[(NodeId, f64, NodeId)],
    ) -> Vec<((NodeId, NodeId), Option<RoutingInstruction>)> {
        pairs
            .iter()
            .map(|&(origin, amount, destination)| {
                (
                    (origin, destination),
                    self.route_pair(finder, origin, amount, destination),
                )
            })
            .collect()
    }

    fn route_pair<W: EdgeWeight>(
        &self,
        finder: &ShortestPathFinder<'_, W>,
        origin: NodeId,
        surplus: f64,
        destination: NodeId,
    ) -> Option<RoutingInstruction> {
        let path = finder.find(origin, destination);
        let first_hop = *path.get(1)?;
        Some(RoutingInstruction {
            origin,
            first_hop,
            destination,
            magnitude: self.config.magnitude(surplus),
        })
    }
}

/// Map labelled samples onto `graph`'s ids.
///
/// Labels that are not nodes of the graph are dropped and reported.
pub fn resolve_samples<'a, W, I>(
    graph: &GraphStore<W>,
    labelled: I,
) -> (HashMap<NodeId, StepSample>, Diagnostics)
where
    W: EdgeWeight,
    I: IntoIterator<Item = (&'a str, StepSample)>,
{
    let mut samples = HashMap::new();
    let mut diagnostics = Diagnostics::new();
    for (label, sample) in labelled {
        match graph.node_id(label) {
            Some(node) => {
                samples.insert(node, sample);
            }
            None => {
                debug!(label, "ignoring readings for label outside the topology");
                diagnostics.add_error_with_entity(
                    "data-quality",
                    "readings for a label that is not a node of the topology",
                    label,
                );
            }
        }
    }
    (samples, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_graph() -> GraphStore<f64> {
        GraphStore::from_adjacency(
            vec![("A", vec![("B", 1.0), ("C", 5.0)]), ("B", vec![("C", 2.0)])],
            true,
        )
        .unwrap()
    }

    fn samples(graph: &GraphStore<f64>, rows: &[(&str, StepSample)]) -> HashMap<NodeId, StepSample> {
        let (samples, _) = resolve_samples(graph, rows.iter().copied());
        samples
    }

    #[test]
    fn surplus_routes_toward_deficit() {
        let graph = chain_graph();
        let data = samples(
            &graph,
            &[
                ("A", StepSample::known(10.0, 4.0)),
                ("B", StepSample::known(2.0, 9.0)),
            ],
        );
        let plan = RedistributionPlanner::default().plan_step(&graph, &data, 0);

        let a = graph.node_id("A").unwrap();
        let b = graph.node_id("B").unwrap();
        let c = graph.node_id("C").unwrap();
        assert_eq!(plan.status(a), NodeStatus::Surplus);
        assert_eq!(plan.status(b), NodeStatus::Deficit);
        assert_eq!(plan.status(c), NodeStatus::Unknown);
        assert_eq!(plan.surpluses[&a], 6.0);

        assert_eq!(plan.instructions.len(), 1);
        let instruction = plan.instructions[0];
        assert_eq!(instruction.origin, a);
        assert_eq!(instruction.first_hop, b);
        assert_eq!(instruction.destination, b);
        assert!((instruction.magnitude - 6.0 / DEFAULT_SCALE).abs() < 1e-12);
    }

    #[test]
    fn first_hop_is_second_node_of_shortest_path() {
        let graph = chain_graph();
        let data = samples(
            &graph,
            &[
                ("A", StepSample::known(100.0, 0.0)),
                ("C", StepSample::known(0.0, 50.0)),
            ],
        );
        let plan = RedistributionPlanner::default().plan_step(&graph, &data, 0);
        assert_eq!(plan.instructions.len(), 1);
        assert_eq!(plan.instructions[0].first_hop, graph.node_id("B").unwrap());
        assert_eq!(plan.instructions[0].destination, graph.node_id("C").unwrap());
    }

    #[test]
    fn unreachable_pairs_emit_nothing() {
        let graph = chain_graph();
        let data = samples(
            &graph,
            &[
                ("C", StepSample::known(10.0, 0.0)),
                ("A", StepSample::known(0.0, 10.0)),
            ],
        );
        let plan = RedistributionPlanner::default().plan_step(&graph, &data, 2);
        assert!(plan.instructions.is_empty());
        assert_eq!(
            plan.unrouted,
            vec![(graph.node_id("C").unwrap(), graph.node_id("A").unwrap())]
        );
        assert_eq!(plan.step, 2);
    }

    #[test]
    fn unknown_and_balanced_nodes_are_never_endpoints() {
        let graph = GraphStore::from_adjacency(
            vec![("A", vec![("B", 1.0)]), ("B", vec![("C", 1.0)])],
            false,
        )
        .unwrap();
        let data = samples(
            &graph,
            &[
                ("A", StepSample::new(Some(50.0), None)),
                ("B", StepSample::known(3.0, 3.0)),
                ("C", StepSample::known(0.0, 5.0)),
            ],
        );
        let plan = RedistributionPlanner::default().plan_step(&graph, &data, 0);
        assert!(plan.instructions.is_empty());
        assert!(plan.unrouted.is_empty());
        assert_eq!(plan.count(NodeStatus::Unknown), 1);
        assert_eq!(plan.count(NodeStatus::Balanced), 1);
        assert_eq!(plan.diagnostics.warning_count(), 1);
    }

    #[test]
    fn pairs_are_routed_independently() {
        let graph = GraphStore::from_adjacency(
            vec![("S", vec![("D1", 1.0), ("D2", 1.0)])],
            false,
        )
        .unwrap();
        let data = samples(
            &graph,
            &[
                ("S", StepSample::known(200.0, 0.0)),
                ("D1", StepSample::known(0.0, 150.0)),
                ("D2", StepSample::known(0.0, 150.0)),
            ],
        );
        let plan = RedistributionPlanner::default().plan_step(&graph, &data, 0);
        assert_eq!(plan.instructions.len(), 2);
        for instruction in &plan.instructions {
            assert!((instruction.magnitude - 0.4).abs() < 1e-12);
        }
    }

    #[test]
    fn magnitude_is_capped() {
        let config = PlannerConfig::default();
        assert_eq!(config.magnitude(1e12), DEFAULT_CAP);
        assert_eq!(config.magnitude(0.0), 0.0);
        assert_eq!(config.magnitude(-5.0), 0.0);
        assert!((config.magnitude(100.0) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn config_validation() {
        assert_eq!(
            PlannerConfig::new(0.0, 0.5),
            Err(PlannerError::InvalidScale(0.0))
        );
        assert!(PlannerConfig::new(f64::NAN, 0.5).is_err());
        assert_eq!(
            PlannerConfig::new(10.0, -1.0),
            Err(PlannerError::InvalidCap(-1.0))
        );
        let config = PlannerConfig::new(10.0, 2.0).unwrap();
        assert_eq!(config.magnitude(15.0), 1.5);
    }

    #[test]
    fn foreign_labels_are_reported() {
        let graph = chain_graph();
        let (resolved, diagnostics) = resolve_samples(
            &graph,
            vec![
                ("A", StepSample::known(1.0, 0.0)),
                ("Atlantis", StepSample::known(1.0, 0.0)),
            ],
        );
        assert_eq!(resolved.len(), 1);
        assert_eq!(diagnostics.error_count(), 1);
    }
}
