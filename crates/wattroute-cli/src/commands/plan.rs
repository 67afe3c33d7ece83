use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tabwriter::TabWriter;
use tracing::{info, warn};
use wattroute_algo::{resolve_samples, NodeStatus, RedistributionPlanner, StepPlan};
use wattroute_cli::{PlanFormat, TopologyArgs, WattrouteConfig};
use wattroute_core::GraphStore;
use wattroute_io::{write_rows, NodeDataSet};

use super::{load, report};

/// One routing instruction with labels instead of ids.
#[derive(Debug, Clone, Serialize)]
pub struct InstructionRow {
    pub step: usize,
    pub origin: String,
    pub first_hop: String,
    pub destination: String,
    pub magnitude: f64,
}

/// Everything printed for one step in JSON mode.
#[derive(Debug, Serialize)]
struct StepReport {
    step: usize,
    statuses: BTreeMap<String, NodeStatus>,
    surpluses: BTreeMap<String, f64>,
    instructions: Vec<InstructionRow>,
    unrouted: Vec<(String, String)>,
}

pub fn handle(
    topology: &TopologyArgs,
    node_data: &Path,
    step: Option<usize>,
    format: PlanFormat,
    out: Option<&Path>,
    config: &WattrouteConfig,
) -> Result<()> {
    let graph = load(topology)?.graph;
    let data = NodeDataSet::load(node_data)
        .with_context(|| format!("loading node data {}", node_data.display()))?;
    let planner = RedistributionPlanner::new(config.planner_config()?);

    let steps: Vec<usize> = match step {
        Some(step) => {
            if step >= data.step_count() {
                warn!(
                    "step {step} is beyond the node data ({} steps); every node is unknown",
                    data.step_count()
                );
            }
            vec![step]
        }
        None => (0..data.step_count()).collect(),
    };

    let mut reports = Vec::with_capacity(steps.len());
    for step in steps {
        let (samples, diagnostics) = resolve_samples(&graph, data.samples_at(step));
        report(&format!("node data, step {step}"), &diagnostics);
        let plan = planner.plan_step(&graph, &samples, step);
        report(&format!("plan, step {step}"), &plan.diagnostics);
        info!(
            "Step {step}: {} surplus, {} deficit, {} unknown, {} instruction(s), {} unrouted pair(s)",
            plan.count(NodeStatus::Surplus),
            plan.count(NodeStatus::Deficit),
            plan.count(NodeStatus::Unknown),
            plan.instructions.len(),
            plan.unrouted.len()
        );
        reports.push(step_report(&graph, &plan));
    }

    match format {
        PlanFormat::Table => print_table(&reports)?,
        PlanFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
    }

    if let Some(path) = out {
        let rows: Vec<&InstructionRow> = reports
            .iter()
            .flat_map(|report| &report.instructions)
            .collect();
        write_rows(&rows, path).with_context(|| format!("writing {}", path.display()))?;
        info!("Wrote {} instruction(s) to {}", rows.len(), path.display());
    }
    Ok(())
}

fn step_report(graph: &GraphStore<f64>, plan: &StepPlan) -> StepReport {
    let label = |node| graph.display_label(node);
    StepReport {
        step: plan.step,
        statuses: plan
            .statuses
            .iter()
            .map(|(node, status)| (label(*node), *status))
            .collect(),
        surpluses: plan
            .surpluses
            .iter()
            .map(|(node, amount)| (label(*node), *amount))
            .collect(),
        instructions: plan
            .instructions
            .iter()
            .map(|instruction| InstructionRow {
                step: plan.step,
                origin: label(instruction.origin),
                first_hop: label(instruction.first_hop),
                destination: label(instruction.destination),
                magnitude: instruction.magnitude,
            })
            .collect(),
        unrouted: plan
            .unrouted
            .iter()
            .map(|(origin, destination)| (label(*origin), label(*destination)))
            .collect(),
    }
}

fn print_table(reports: &[StepReport]) -> Result<()> {
    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "STEP\tORIGIN\tFIRST HOP\tDESTINATION\tMAGNITUDE")?;
    for report in reports {
        for row in &report.instructions {
            writeln!(
                writer,
                "{}\t{}\t{}\t{}\t{:.4}",
                row.step, row.origin, row.first_hop, row.destination, row.magnitude
            )?;
        }
    }
    writer.flush()?;
    Ok(())
}
