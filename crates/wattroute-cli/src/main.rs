use clap::Parser;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;
use wattroute_cli::{build_cli_command, load_config, Cli, Commands};

mod commands;

fn main() {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref());
    let configured_level = config
        .as_ref()
        .ok()
        .and_then(|config| config.log_level().ok().flatten());
    let level = cli.log_level.or(configured_level).unwrap_or(Level::INFO);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let config = match config {
        Ok(config) => config,
        Err(err) => {
            error!("Configuration failed: {err:#}");
            std::process::exit(2);
        }
    };
    if let Err(err) = config.log_level() {
        error!("{err:#}");
        std::process::exit(2);
    }

    let (name, result) = match &cli.command {
        Some(Commands::Graph { command }) => ("graph", commands::graph::handle(command, &config)),
        Some(Commands::Plan {
            topology,
            node_data,
            step,
            all_steps,
            format,
            out,
        }) => (
            "plan",
            commands::plan::handle(
                topology,
                node_data,
                (!*all_steps).then_some(*step),
                *format,
                out.as_deref(),
                &config,
            ),
        ),
        #[cfg(feature = "viz")]
        Some(Commands::Render {
            topology,
            node_data,
            step,
            iterations,
            out,
        }) => (
            "render",
            commands::render::handle(
                topology,
                node_data,
                *step,
                iterations.unwrap_or(config.render.layout_iterations),
                out.as_deref(),
                &config,
            ),
        ),
        Some(Commands::Assess {
            weather,
            url,
            cities,
            out,
        }) => (
            "assess",
            commands::assess::handle(
                weather.as_deref(),
                url.as_deref(),
                cities,
                out.as_deref(),
                &config,
            ),
        ),
        Some(Commands::Completions { shell, out }) => (
            "completions",
            commands::completions::handle(*shell, out.as_deref()),
        ),
        None => {
            let mut cmd = build_cli_command();
            ("help", cmd.print_help().map_err(anyhow::Error::from))
        }
    };

    if let Err(err) = result {
        error!("{name} failed: {err:#}");
        std::process::exit(1);
    }
}
