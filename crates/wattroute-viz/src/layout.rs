use std::collections::HashMap;

use fdg_sim::{
    force::fruchterman_reingold, ForceGraph, ForceGraphHelper, Simulation, SimulationParameters,
};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use serde::Serialize;
use wattroute_core::{distinct_links, EdgeWeight, GraphStore, NodeId};

#[derive(Debug, Clone, Serialize)]
pub struct LayoutNode {
    pub id: NodeId,
    pub label: String,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct LayoutEdge {
    pub from: NodeId,
    pub to: NodeId,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LayoutResult {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
}

impl LayoutResult {
    /// Coordinates keyed by label, the shape topology documents pin positions in.
    pub fn positions(&self) -> HashMap<String, (f64, f64)> {
        self.nodes
            .iter()
            .map(|node| (node.label.clone(), (f64::from(node.x), f64::from(node.y))))
            .collect()
    }
}

/// Runs a force-directed layout on the provided topology.
///
/// Edge direction and weight are ignored; mirrored links are laid out once.
pub fn layout_graph<W: EdgeWeight>(graph: &GraphStore<W>, iterations: usize) -> LayoutResult {
    if graph.node_count() == 0 {
        return LayoutResult::default();
    }

    let mut force_graph: ForceGraph<NodeId, ()> = ForceGraph::default();
    let mut index_map = HashMap::new();
    for node in graph.nodes() {
        let idx = force_graph.add_force_node(graph.display_label(node), node);
        index_map.insert(node, idx);
    }

    for (from, to, _) in distinct_links(graph) {
        if from == to {
            continue;
        }
        if let (Some(&from), Some(&to)) = (index_map.get(&from), index_map.get(&to)) {
            force_graph.add_edge(from, to, ());
        }
    }

    let mut params = SimulationParameters::default();
    params.set_force(fruchterman_reingold(45.0, 0.95));
    let mut simulation = Simulation::from_graph(force_graph, params);
    for _ in 0..iterations {
        simulation.update(0.02);
    }

    let laid_out = simulation.get_graph();

    let nodes = laid_out
        .node_indices()
        .map(|idx| {
            let node = &laid_out[idx];
            LayoutNode {
                id: node.data,
                label: node.name.clone(),
                x: node.location.x,
                y: node.location.y,
            }
        })
        .collect();

    let edges = laid_out
        .edge_references()
        .map(|edge| LayoutEdge {
            from: laid_out[edge.source()].data,
            to: laid_out[edge.target()].data,
        })
        .collect();

    LayoutResult { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_graph_has_empty_layout() {
        let graph: GraphStore<f64> = GraphStore::directed();
        let layout = layout_graph(&graph, 10);
        assert!(layout.nodes.is_empty());
        assert!(layout.edges.is_empty());
    }

    #[test]
    fn mirrored_links_are_laid_out_once() {
        let graph = GraphStore::from_adjacency(
            vec![("A", vec![("B", 1.0)]), ("B", vec![("C", 1.0), ("B", 3.0)])],
            false,
        )
        .unwrap();
        let layout = layout_graph(&graph, 20);
        assert_eq!(layout.nodes.len(), 3);
        assert_eq!(layout.edges.len(), 2);
        let positions = layout.positions();
        assert!(positions.values().all(|(x, y)| x.is_finite() && y.is_finite()));
        assert!(positions.contains_key("C"));
    }
}
