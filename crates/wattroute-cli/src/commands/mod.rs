pub mod assess;
pub mod completions;
pub mod graph;
pub mod plan;
#[cfg(feature = "viz")]
pub mod render;

use anyhow::{Context, Result};
use tracing::{error, warn};
use wattroute_cli::TopologyArgs;
use wattroute_core::{Diagnostics, Severity};
use wattroute_io::{load_topology, Topology};

/// Load the topology named on the command line, honouring `--undirected`.
pub fn load(args: &TopologyArgs) -> Result<Topology> {
    let topology = load_topology(&args.topology, args.direction_override())
        .with_context(|| format!("loading topology {}", args.topology.display()))?;
    report("topology", &topology.diagnostics);
    Ok(topology)
}

/// Log a one-line summary of `diagnostics`, then each finding at its severity.
pub fn report(context: &str, diagnostics: &Diagnostics) {
    if !diagnostics.has_issues() {
        return;
    }
    warn!("{context}: {}", diagnostics.summary());
    for issue in &diagnostics.issues {
        match issue.severity {
            Severity::Warning => warn!("  {issue}"),
            Severity::Error => error!("  {issue}"),
        }
    }
}
