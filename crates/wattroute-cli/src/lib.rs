pub mod cli;
pub mod config;

pub use cli::{build_cli_command, Cli, Commands, GraphCommands, PlanFormat, TopologyArgs};
pub use config::{default_config_path, load_config, WattrouteConfig};
