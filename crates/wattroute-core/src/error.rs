//! Error types for the wattroute workspace
//!
//! [`GraphError`] covers the few conditions the graph store refuses outright.
//! [`WattError`] is the unified error the ingestion layer and other crates
//! return at API boundaries; graph errors convert into it.
//!
//! # Example
//!
//! ```ignore
//! use wattroute_core::{WattError, WattResult};
//!
//! fn plan(path: &str) -> WattResult<()> {
//!     let topology = load_topology(path)?;
//!     let plan = planner.plan_step(&topology.graph, &samples, 0);
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::NodeId;

/// Conditions under which the graph store refuses a mutation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// Weight is not a usable number (NaN or infinite float)
    #[error("malformed weight {weight} on edge {from} -> {to}")]
    MalformedWeight {
        from: String,
        to: String,
        weight: String,
    },

    /// Id was not issued by this store
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
}

/// Convenience type alias for graph store results.
pub type GraphResult<T> = Result<T, GraphError>;

/// Unified error type for wattroute operations.
#[derive(Error, Debug)]
pub enum WattError {
    /// I/O errors (file access)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Topology construction errors
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// Remote fetch errors
    #[error("HTTP error: {0}")]
    Http(String),
}

/// Convenience type alias for Results using WattError.
pub type WattResult<T> = Result<T, WattError>;

impl From<serde_json::Error> for WattError {
    fn from(err: serde_json::Error) -> Self {
        WattError::Parse(err.to_string())
    }
}
