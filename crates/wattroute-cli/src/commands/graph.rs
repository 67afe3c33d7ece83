use std::fs;

use anyhow::Result;
use tracing::{info, warn};
use wattroute_algo::{path_cost, ShortestPathFinder};
use wattroute_cli::{GraphCommands, WattrouteConfig};
use wattroute_core::graph_utils;

#[cfg(feature = "viz")]
use wattroute_viz::layout_graph;

use super::load;

#[cfg_attr(not(feature = "viz"), allow(unused_variables))]
pub fn handle(command: &GraphCommands, config: &WattrouteConfig) -> Result<()> {
    match command {
        GraphCommands::Stats { topology } => {
            let graph = load(topology)?.graph;
            let stats = graph_utils::graph_stats(&graph)?;
            println!("Graph statistics for {}:", topology.topology.display());
            println!("  Nodes         : {}", stats.node_count);
            println!("  Links         : {}", stats.link_count);
            println!("  Directed      : {}", graph.is_directed());
            println!("  Components    : {}", stats.connected_components);
            println!(
                "  Out-degree [min/avg/max]: {}/{:.2}/{}",
                stats.min_out_degree, stats.avg_out_degree, stats.max_out_degree
            );
            println!("  Density       : {:.4}", stats.density);
            println!("  Total weight  : {}", stats.total_weight);
            Ok(())
        }
        GraphCommands::Path { topology, from, to } => {
            let graph = load(topology)?.graph;
            for label in [from, to] {
                if graph.node_id(label).is_none() {
                    warn!("{label:?} is not a node of the topology");
                }
            }
            let finder = ShortestPathFinder::new(&graph);
            let path = finder.find_by_label(from, to);
            if path.is_empty() {
                println!("No path from {from} to {to}");
                return Ok(());
            }
            let route = finder.labels(&path).join(" -> ");
            match path_cost(&graph, &path) {
                Some(cost) => println!("{route} (cost {cost})"),
                None => println!("{route} (cost out of range)"),
            }
            Ok(())
        }
        GraphCommands::Export {
            topology,
            format,
            out,
        } => {
            let graph = load(topology)?.graph;
            let dot = graph_utils::export_graph(&graph, format)?;
            if let Some(path) = out {
                fs::write(path, &dot)?;
                info!("Graph exported to {}", path.display());
            } else {
                println!("{dot}");
            }
            Ok(())
        }
        #[cfg(feature = "viz")]
        GraphCommands::Layout {
            topology,
            iterations,
            out,
        } => {
            let graph = load(topology)?.graph;
            let iterations = iterations.unwrap_or(config.render.layout_iterations);
            let layout = layout_graph(&graph, iterations);
            let payload = serde_json::to_string_pretty(&layout)?;
            if let Some(path) = out {
                fs::write(path, &payload)?;
                info!("Layout written to {}", path.display());
            } else {
                println!("{payload}");
            }
            Ok(())
        }
    }
}
