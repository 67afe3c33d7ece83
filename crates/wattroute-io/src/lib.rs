//! # wattroute-io: Input Documents & Output Rows
//!
//! Reads everything the wattroute tools consume and writes what they produce.
//!
//! ## Quick Start: Load a Topology
//!
//! ```rust,no_run
//! use wattroute_io::{load_topology, NodeDataSet};
//!
//! fn main() -> anyhow::Result<()> {
//!     let topology = load_topology("grid.json", None)?;
//!     let data = NodeDataSet::load("node_data.json")?;
//!
//!     println!("Nodes: {}", topology.graph.node_count());
//!     println!("Steps: {}", data.step_count());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Inputs
//!
//! | Document | Format | Module |
//! |----------|--------|--------|
//! | Topology (adjacency + optional positions) | JSON | [`topology`] |
//! | Production/consumption series | JSON | [`node_data`] |
//! | City → department/region table | CSV | [`regions`] |
//! | Weather sites | JSON file or HTTP | [`weather`] |
//!
//! ## Error Handling
//!
//! Fatal problems (unreadable file, invalid JSON, malformed edge weight)
//! return [`WattError`](wattroute_core::WattError). Recoverable findings
//! (negative weights, skipped weather sites) are collected in
//! [`Diagnostics`](wattroute_core::Diagnostics) next to the parsed value.
//!
//! ## Feature Flags
//!
//! - `native-io` (default): remote weather fetch via `ureq`

pub mod exporters;
pub mod node_data;
pub mod regions;
pub mod topology;
pub mod weather;

pub use exporters::{write_csv, write_json, write_rows};
pub use node_data::{NodeDataSet, NodeSeries};
pub use regions::{RegionInfo, RegionLookup};
pub use topology::{load_topology, parse_topology, EdgeSpec, Topology};
pub use weather::{fetch_weather, load_weather, parse_weather, WeatherBatch, WeatherRecord};
