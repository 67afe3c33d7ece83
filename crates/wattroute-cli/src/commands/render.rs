use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use wattroute_algo::{resolve_samples, RedistributionPlanner};
use wattroute_cli::{TopologyArgs, WattrouteConfig};
use wattroute_io::NodeDataSet;
use wattroute_viz::{layout_graph, render_step};

use super::{load, report};

pub fn handle(
    topology: &TopologyArgs,
    node_data: &Path,
    step: usize,
    iterations: usize,
    out: Option<&Path>,
    config: &WattrouteConfig,
) -> Result<()> {
    let topology = load(topology)?;
    let data = NodeDataSet::load(node_data)
        .with_context(|| format!("loading node data {}", node_data.display()))?;
    let planner = RedistributionPlanner::new(config.planner_config()?);

    let (samples, diagnostics) = resolve_samples(&topology.graph, data.samples_at(step));
    report("node data", &diagnostics);
    let plan = planner.plan_step(&topology.graph, &samples, step);
    report("plan", &plan.diagnostics);

    let mut positions = topology.positions;
    let unplaced = topology
        .graph
        .nodes()
        .filter(|node| !positions.contains_key(&topology.graph.display_label(*node)))
        .count();
    if unplaced > 0 && iterations > 0 {
        info!("Laying out {unplaced} node(s) without positions ({iterations} iterations)");
        for (label, point) in layout_graph(&topology.graph, iterations).positions() {
            positions.entry(label).or_insert(point);
        }
    }

    let dot = render_step(&topology.graph, &plan, &positions);
    if let Some(path) = out {
        fs::write(path, &dot)?;
        info!("Step {step} rendered to {}", path.display());
    } else {
        println!("{dot}");
    }
    Ok(())
}
