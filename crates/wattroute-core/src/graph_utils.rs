use crate::{EdgeWeight, GraphStore, NodeId};
use anyhow::{anyhow, Result};
use petgraph::algo::connected_components;

/// Summary statistics produced by `graph stats` (density/degree/weak components).
#[derive(Debug)]
pub struct GraphStats {
    pub node_count: usize,
    /// Distinct links: a mirrored pair in an undirected store counts once.
    pub link_count: usize,
    pub connected_components: usize,
    pub min_out_degree: usize,
    pub avg_out_degree: f64,
    pub max_out_degree: usize,
    pub density: f64,
    pub total_weight: f64,
}

/// Calculates node/link counts, out-degree spread, density and weakly connected components.
pub fn graph_stats<W: EdgeWeight>(graph: &GraphStore<W>) -> Result<GraphStats> {
    let node_count = graph.node_count();
    let link_count = distinct_links(graph).count();
    let degrees: Vec<usize> = graph
        .nodes()
        .map(|node| graph.neighbors(node).count())
        .collect();
    let min_out_degree = *degrees.iter().min().unwrap_or(&0);
    let max_out_degree = *degrees.iter().max().unwrap_or(&0);
    let avg_out_degree = if node_count == 0 {
        0.0
    } else {
        degrees.iter().copied().sum::<usize>() as f64 / node_count as f64
    };
    let pairs = node_count as f64 * (node_count as f64 - 1.0);
    let density = if node_count < 2 {
        0.0
    } else if graph.is_directed() {
        link_count as f64 / pairs
    } else {
        2.0 * link_count as f64 / pairs
    };
    let total_weight = distinct_links(graph).map(|(_, _, w)| w.to_f64()).sum();
    Ok(GraphStats {
        node_count,
        link_count,
        connected_components: connected_components(graph.inner()),
        min_out_degree,
        avg_out_degree,
        max_out_degree,
        density,
        total_weight,
    })
}

/// Export the topology to a DOT string (Graphviz) so external tools can visualize it.
pub fn export_graph<W: EdgeWeight>(graph: &GraphStore<W>, format: &str) -> Result<String> {
    match format.to_ascii_lowercase().as_str() {
        "graphviz" | "dot" => Ok(render_dot(graph)),
        other => Err(anyhow!("unsupported graph export format '{other}'")),
    }
}

fn render_dot<W: EdgeWeight>(graph: &GraphStore<W>) -> String {
    let (keyword, arrow) = if graph.is_directed() {
        ("digraph", "->")
    } else {
        ("graph", "--")
    };
    let mut buffer = String::new();
    buffer.push_str(&format!("{keyword} wattroute {{\n"));
    for node in graph.nodes() {
        let label = sanitize_label(&graph.display_label(node));
        buffer.push_str(&format!("  n{} [label=\"{}\"];\n", node.index(), label));
    }
    for (from, to, weight) in distinct_links(graph) {
        buffer.push_str(&format!(
            "  n{} {arrow} n{} [label=\"{}\"];\n",
            from.index(),
            to.index(),
            weight
        ));
    }
    buffer.push('}');
    buffer
}

/// Edges with mirrored duplicates removed when the store is undirected.
pub fn distinct_links<W: EdgeWeight>(graph: &GraphStore<W>) -> impl Iterator<Item = (NodeId, NodeId, W)> + '_ {
    let directed = graph.is_directed();
    graph
        .edges()
        .filter(move |(from, to, _)| directed || from <= to)
}

/// Escape double quotes for use inside a quoted DOT attribute.
pub fn sanitize_label(label: &str) -> String {
    label.replace('"', "\\\"")
}
