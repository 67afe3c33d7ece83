//! Configuration for the `wattroute` binary.
//!
//! Looked up in order: `--config PATH`, then `~/.wattroute/config.toml`, then
//! built-in defaults. Every section and field is optional.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use wattroute_algo::{PlannerConfig, DEFAULT_CAP, DEFAULT_SCALE};

/// Main wattroute configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct WattrouteConfig {
    /// Magnitude bounds for routing instructions
    #[serde(default)]
    pub planner: PlannerSection,
    /// Rendering options
    #[serde(default)]
    pub render: RenderSection,
    /// Site assessment options
    #[serde(default)]
    pub assess: AssessSection,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlannerSection {
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default = "default_cap")]
    pub cap: f64,
}

impl Default for PlannerSection {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            cap: default_cap(),
        }
    }
}

fn default_scale() -> f64 {
    DEFAULT_SCALE
}

fn default_cap() -> f64 {
    DEFAULT_CAP
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderSection {
    /// Force-directed layout iterations when a topology has no positions
    #[serde(default = "default_layout_iterations")]
    pub layout_iterations: usize,
}

impl Default for RenderSection {
    fn default() -> Self {
        Self {
            layout_iterations: default_layout_iterations(),
        }
    }
}

fn default_layout_iterations() -> usize {
    150
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AssessSection {
    /// Weather API endpoint used when `assess` gets neither --weather nor --url
    #[serde(default)]
    pub weather_url: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LoggingSection {
    /// Log level: trace, debug, info, warn, error
    #[serde(default)]
    pub level: Option<String>,
}

impl WattrouteConfig {
    pub fn planner_config(&self) -> Result<PlannerConfig> {
        PlannerConfig::new(self.planner.scale, self.planner.cap)
            .context("invalid [planner] section")
    }

    /// Configured log level, if any.
    pub fn log_level(&self) -> Result<Option<tracing::Level>> {
        self.logging
            .level
            .as_deref()
            .map(|level| {
                level
                    .parse::<tracing::Level>()
                    .map_err(|_| anyhow!("invalid logging.level {level:?}"))
            })
            .transpose()
    }
}

/// `~/.wattroute/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".wattroute").join("config.toml"))
}

/// Load the configuration.
///
/// An explicit path must exist; the default path is optional.
pub fn load_config(explicit: Option<&Path>) -> Result<WattrouteConfig> {
    match explicit {
        Some(path) => read_config(path),
        None => match default_config_path() {
            Some(path) if path.exists() => read_config(&path),
            _ => Ok(WattrouteConfig::default()),
        },
    }
}

fn read_config(path: &Path) -> Result<WattrouteConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: WattrouteConfig =
        toml::from_str(&contents).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}
