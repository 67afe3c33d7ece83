//! # wattroute-viz: Layout & Rendering
//!
//! - [`layout`] places nodes with a Fruchterman-Reingold simulation for
//!   topologies that carry no coordinates.
//! - [`render`] turns a [`StepPlan`](wattroute_algo::StepPlan) into Graphviz
//!   DOT with status colours, surplus-flow arrows and a legend.

pub mod layout;
pub mod render;

pub use layout::{layout_graph, LayoutEdge, LayoutNode, LayoutResult};
pub use render::{instruction_penwidth, render_step, status_color};
