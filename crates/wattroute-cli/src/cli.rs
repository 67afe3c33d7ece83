use clap::{ArgGroup, CommandFactory, Parser, Subcommand, ValueEnum, ValueHint};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "wattroute", author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level (overrides the config file)
    #[arg(long, global = true)]
    pub log_level: Option<tracing::Level>,

    /// Path to a TOML config file (default: ~/.wattroute/config.toml)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Topology utilities
    Graph {
        #[command(subcommand)]
        command: GraphCommands,
    },
    /// Plan surplus redistribution for one or more steps
    Plan {
        #[command(flatten)]
        topology: TopologyArgs,
        /// Per-node production/consumption series (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        node_data: PathBuf,
        /// Step to plan
        #[arg(long, default_value_t = 0, conflicts_with = "all_steps")]
        step: usize,
        /// Plan every step present in the node data
        #[arg(long)]
        all_steps: bool,
        /// Stdout format
        #[arg(long, value_enum, default_value_t = PlanFormat::Table)]
        format: PlanFormat,
        /// Also write instruction rows to a file (.csv or .json)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
    },
    /// Render one planned step as Graphviz DOT
    #[cfg(feature = "viz")]
    Render {
        #[command(flatten)]
        topology: TopologyArgs,
        /// Per-node production/consumption series (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        node_data: PathBuf,
        /// Step to render
        #[arg(long, default_value_t = 0)]
        step: usize,
        /// Layout iterations for nodes without pinned positions
        #[arg(long)]
        iterations: Option<usize>,
        /// Write DOT to a file instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
    },
    /// Score weather sites for wind/solar potential
    #[command(group(ArgGroup::new("source").args(["weather", "url"])))]
    Assess {
        /// Weather records (JSON array of sites)
        #[arg(long, value_hint = ValueHint::FilePath)]
        weather: Option<PathBuf>,
        /// Fetch weather records from this URL (default: config `assess.weather_url`)
        #[arg(long, value_hint = ValueHint::Url)]
        url: Option<String>,
        /// City → department/region table (CSV)
        #[arg(long, value_hint = ValueHint::FilePath)]
        cities: PathBuf,
        /// Write rows to a file (.csv or .json) instead of printing a table
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
        /// Write output to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

/// Topology file plus direction override, shared by every loading command.
#[derive(clap::Args, Debug, Clone)]
pub struct TopologyArgs {
    /// Topology document (JSON adjacency)
    #[arg(value_hint = ValueHint::FilePath)]
    pub topology: PathBuf,
    /// Treat the topology as undirected regardless of the document
    #[arg(long)]
    pub undirected: bool,
}

impl TopologyArgs {
    pub fn direction_override(&self) -> Option<bool> {
        self.undirected.then_some(false)
    }
}

#[derive(Subcommand, Debug)]
pub enum GraphCommands {
    /// Graph stats summary
    Stats {
        #[command(flatten)]
        topology: TopologyArgs,
    },
    /// Shortest path between two labelled nodes
    Path {
        #[command(flatten)]
        topology: TopologyArgs,
        /// Start label
        #[arg(long)]
        from: String,
        /// End label
        #[arg(long)]
        to: String,
    },
    /// Export graph to various formats
    Export {
        #[command(flatten)]
        topology: TopologyArgs,
        /// Output format (e.g., graphviz)
        #[arg(long, default_value = "graphviz")]
        format: String,
        /// Optional output file path
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    #[cfg(feature = "viz")]
    /// Compute force-directed layout for visualization
    Layout {
        #[command(flatten)]
        topology: TopologyArgs,
        /// Number of simulation iterations (default: config `render.layout_iterations`)
        #[arg(long)]
        iterations: Option<usize>,
        /// Optional output file path
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum PlanFormat {
    Table,
    Json,
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        build_cli_command().debug_assert();
    }

    #[test]
    fn undirected_flag_overrides_direction() {
        let cli = Cli::parse_from(["wattroute", "graph", "stats", "grid.json", "--undirected"]);
        match cli.command {
            Some(Commands::Graph {
                command: GraphCommands::Stats { topology },
            }) => assert_eq!(topology.direction_override(), Some(false)),
            other => panic!("unexpected parse: {other:?}"),
        }
    }

    #[test]
    fn step_conflicts_with_all_steps() {
        let parsed = Cli::try_parse_from([
            "wattroute", "plan", "grid.json", "data.json", "--step", "2", "--all-steps",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn weather_and_url_are_exclusive() {
        let parsed = Cli::try_parse_from([
            "wattroute", "assess", "--weather", "w.json", "--url", "http://x", "--cities", "c.csv",
        ]);
        assert!(parsed.is_err());
    }
}
