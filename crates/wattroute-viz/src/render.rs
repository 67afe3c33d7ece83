//! Graphviz rendering of one planned step.
//!
//! Nodes are filled by status, topology links are drawn thin and grey with
//! their weights, and each routing instruction becomes a yellow arrow from the
//! origin to its first hop. Positions, when known, are pinned with `pos="x,y!"`
//! so `neato -n` reproduces the layout.

use std::collections::HashMap;
use std::fmt::Write;

use wattroute_algo::{NodeStatus, StepPlan};
use wattroute_core::{distinct_links, sanitize_label, EdgeWeight, GraphStore};

pub const SURPLUS_COLOR: &str = "green";
pub const DEFICIT_COLOR: &str = "red";
pub const BALANCED_COLOR: &str = "white";
pub const UNKNOWN_COLOR: &str = "grey";
pub const INSTRUCTION_COLOR: &str = "yellow";

/// Pen width of an instruction arrow with magnitude zero.
const BASE_PENWIDTH: f64 = 1.0;
/// Extra pen width per unit of magnitude.
const PENWIDTH_PER_MAGNITUDE: f64 = 8.0;

pub fn status_color(status: NodeStatus) -> &'static str {
    match status {
        NodeStatus::Surplus => SURPLUS_COLOR,
        NodeStatus::Deficit => DEFICIT_COLOR,
        NodeStatus::Balanced => BALANCED_COLOR,
        NodeStatus::Unknown => UNKNOWN_COLOR,
    }
}

pub fn instruction_penwidth(magnitude: f64) -> f64 {
    BASE_PENWIDTH + PENWIDTH_PER_MAGNITUDE * magnitude.max(0.0)
}

/// DOT text for `plan` drawn over `graph`.
pub fn render_step<W: EdgeWeight>(
    graph: &GraphStore<W>,
    plan: &StepPlan,
    positions: &HashMap<String, (f64, f64)>,
) -> String {
    let mut dot = String::new();
    // Writing into a String cannot fail.
    let _ = write_step(&mut dot, graph, plan, positions);
    dot
}

fn write_step<W: EdgeWeight>(
    dot: &mut String,
    graph: &GraphStore<W>,
    plan: &StepPlan,
    positions: &HashMap<String, (f64, f64)>,
) -> std::fmt::Result {
    writeln!(dot, "digraph wattroute {{")?;
    writeln!(dot, "  graph [label=\"step {}\", labelloc=t];", plan.step)?;
    writeln!(dot, "  node [shape=circle, style=filled, fontsize=10];")?;
    write_legend(dot)?;

    for node in graph.nodes() {
        let label = graph.display_label(node);
        write!(
            dot,
            "  n{} [label=\"{}\", fillcolor=\"{}\"",
            node.index(),
            sanitize_label(&label),
            status_color(plan.status(node))
        )?;
        if let Some((x, y)) = positions.get(&label) {
            write!(dot, ", pos=\"{x},{y}!\"")?;
        }
        writeln!(dot, "];")?;
    }

    let link_dir = if graph.is_directed() { "forward" } else { "none" };
    for (from, to, weight) in distinct_links(graph) {
        writeln!(
            dot,
            "  n{} -> n{} [label=\"{}\", color=\"grey60\", dir={link_dir}];",
            from.index(),
            to.index(),
            weight
        )?;
    }

    for instruction in &plan.instructions {
        writeln!(
            dot,
            "  n{} -> n{} [color=\"{INSTRUCTION_COLOR}\", penwidth={:.2}, tooltip=\"{:.3} toward {}\"];",
            instruction.origin.index(),
            instruction.first_hop.index(),
            instruction_penwidth(instruction.magnitude),
            instruction.magnitude,
            sanitize_label(&graph.display_label(instruction.destination))
        )?;
    }

    dot.push('}');
    dot.push('\n');
    Ok(())
}

fn write_legend(dot: &mut String) -> std::fmt::Result {
    writeln!(dot, "  subgraph cluster_legend {{")?;
    writeln!(dot, "    label=\"Legend\";")?;
    for status in [
        NodeStatus::Surplus,
        NodeStatus::Deficit,
        NodeStatus::Balanced,
        NodeStatus::Unknown,
    ] {
        writeln!(
            dot,
            "    legend_{status} [label=\"{status}\", shape=box, fillcolor=\"{}\"];",
            status_color(status)
        )?;
    }
    writeln!(
        dot,
        "    legend_flow [label=\"surplus flow\", shape=plaintext, style=\"\", fontcolor=\"{INSTRUCTION_COLOR}\"];"
    )?;
    writeln!(dot, "  }}")
}
