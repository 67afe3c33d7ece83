//! Topology documents.
//!
//! Two shapes are accepted:
//!
//! ```json
//! {"directed": false,
//!  "graph": {"A": {"B": 1.5, "C": {"weight": 4, "kind": "hv"}}},
//!  "positions": {"A": [0.0, 1.0]}}
//! ```
//!
//! or the bare `"graph"` mapping on its own. The wrapper is recognised by a
//! boolean `directed` or by pinned `positions`; anything else is read as a
//! bare mapping. A link value is either a number
//! or an attribute object whose optional `weight` entry is a number (missing
//! means 1). Anything else aborts ingestion with
//! [`GraphError::MalformedWeight`].

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;
use wattroute_core::{Diagnostics, GraphError, GraphStore, WattError, WattResult};

/// A loaded topology plus whatever layout hints the document carried.
#[derive(Debug, Clone)]
pub struct Topology {
    pub graph: GraphStore<f64>,
    /// Pinned `(x, y)` coordinates by label
    pub positions: HashMap<String, (f64, f64)>,
    pub diagnostics: Diagnostics,
}

/// Link value as written in a document, resolved to a number once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeSpec {
    Bare(f64),
    Attributes { weight: Option<f64> },
}

impl EdgeSpec {
    /// Weight used when an attribute object has no `weight` entry.
    pub const DEFAULT_WEIGHT: f64 = 1.0;

    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(EdgeSpec::Bare),
            Value::Object(attributes) => match attributes.get("weight") {
                None => Some(EdgeSpec::Attributes { weight: None }),
                Some(Value::Number(n)) => n
                    .as_f64()
                    .map(|w| EdgeSpec::Attributes { weight: Some(w) }),
                Some(_) => None,
            },
            _ => None,
        }
    }

    pub fn resolve(self) -> f64 {
        match self {
            EdgeSpec::Bare(weight) => weight,
            EdgeSpec::Attributes { weight } => weight.unwrap_or(Self::DEFAULT_WEIGHT),
        }
    }
}

/// Read and parse a topology file.
///
/// `directed` overrides the document's own flag when set.
pub fn load_topology(path: impl AsRef<Path>, directed: Option<bool>) -> WattResult<Topology> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let topology = parse_topology(&text, directed)?;
    debug!(
        path = %path.display(),
        nodes = topology.graph.node_count(),
        edges = topology.graph.edge_count(),
        "loaded topology"
    );
    Ok(topology)
}

pub fn parse_topology(text: &str, directed: Option<bool>) -> WattResult<Topology> {
    let document: Value = serde_json::from_str(text)?;
    let root = document
        .as_object()
        .ok_or_else(|| WattError::Parse("topology document must be a JSON object".into()))?;

    let (adjacency, declared, positions) = if is_wrapped(root) {
        let adjacency = root
            .get("graph")
            .and_then(Value::as_object)
            .ok_or_else(|| WattError::Parse("\"graph\" must be an object".into()))?;
        let declared = match root.get("directed") {
            None => None,
            Some(Value::Bool(flag)) => Some(*flag),
            Some(other) => {
                return Err(WattError::Parse(format!(
                    "\"directed\" must be a boolean, got {other}"
                )))
            }
        };
        (adjacency, declared, root.get("positions"))
    } else {
        (root, None, None)
    };

    let mut diagnostics = Diagnostics::new();
    let mut described = Vec::with_capacity(adjacency.len());
    for (source, links) in adjacency {
        let links = links.as_object().ok_or_else(|| {
            WattError::Parse(format!("links of {source:?} must be an object"))
        })?;
        let mut resolved = Vec::with_capacity(links.len());
        for (target, value) in links {
            let weight = EdgeSpec::from_value(value)
                .map(EdgeSpec::resolve)
                .ok_or_else(|| GraphError::MalformedWeight {
                    from: source.clone(),
                    to: target.clone(),
                    weight: value.to_string(),
                })?;
            if weight < 0.0 {
                diagnostics.add_warning_with_entity(
                    "topology",
                    &format!("negative weight {weight}; shortest paths may be wrong"),
                    &format!("{source} -> {target}"),
                );
            }
            resolved.push((target.as_str(), weight));
        }
        described.push((source.as_str(), resolved));
    }
    let graph = GraphStore::from_adjacency(described, directed.or(declared).unwrap_or(true))?;

    let positions = match positions {
        Some(value) => parse_positions(value, &graph, &mut diagnostics)?,
        None => HashMap::new(),
    };

    Ok(Topology {
        graph,
        positions,
        diagnostics,
    })
}

/// The wrapper form needs an object `graph` plus a value no bare adjacency can
/// hold: a boolean `directed`, or `positions` containing an `[x, y]` array.
/// `{"graph": {...}}` on its own is a bare adjacency with a node named `graph`.
fn is_wrapped(root: &Map<String, Value>) -> bool {
    let known_keys = root
        .keys()
        .all(|key| matches!(key.as_str(), "graph" | "directed" | "positions"));
    let flagged = root.get("directed").is_some_and(Value::is_boolean);
    let pinned = root
        .get("positions")
        .and_then(Value::as_object)
        .is_some_and(|entries| entries.values().any(Value::is_array));
    known_keys && root.get("graph").is_some_and(Value::is_object) && (flagged || pinned)
}

fn parse_positions(
    value: &Value,
    graph: &GraphStore<f64>,
    diagnostics: &mut Diagnostics,
) -> WattResult<HashMap<String, (f64, f64)>> {
    let entries = value
        .as_object()
        .ok_or_else(|| WattError::Parse("\"positions\" must be an object".into()))?;

    let mut positions = HashMap::with_capacity(entries.len());
    for (label, coords) in entries {
        let point = coords
            .as_array()
            .filter(|xy| xy.len() == 2)
            .and_then(|xy| Some((xy[0].as_f64()?, xy[1].as_f64()?)))
            .ok_or_else(|| {
                WattError::Parse(format!("position of {label:?} must be [x, y], got {coords}"))
            })?;
        if graph.node_id(label).is_none() {
            diagnostics.add_warning_with_entity(
                "topology",
                "position given for a label that is not a node",
                label,
            );
            continue;
        }
        positions.insert(label.clone(), point);
    }
    Ok(positions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_adjacency_defaults_to_directed() {
        let topology = parse_topology(r#"{"A": {"B": 1}, "B": {"C": 2}}"#, None).unwrap();
        assert!(topology.graph.is_directed());
        assert_eq!(topology.graph.weight("A", "B"), Some(1.0));
        assert_eq!(topology.graph.weight("B", "A"), None);
        assert_eq!(topology.graph.node_count(), 3);
    }

    #[test]
    fn wrapped_document_with_attribute_bags() {
        let text = r#"{
            "directed": false,
            "graph": {"A": {"B": {"weight": 2.5, "kind": "hv"}, "C": {"kind": "lv"}}},
            "positions": {"A": [0, 0], "B": [1.5, 2]}
        }"#;
        let topology = parse_topology(text, None).unwrap();
        assert!(!topology.graph.is_directed());
        assert_eq!(topology.graph.weight("B", "A"), Some(2.5));
        assert_eq!(topology.graph.weight("C", "A"), Some(1.0));
        assert_eq!(topology.positions["B"], (1.5, 2.0));
    }

    #[test]
    fn undirected_conflict_keeps_first_listed_weight() {
        let text = r#"{"directed": false, "graph": {"A": {"B": 1}, "B": {"A": 2}}}"#;
        let topology = parse_topology(text, None).unwrap();
        assert_eq!(topology.graph.weight("A", "B"), Some(1.0));
        assert_eq!(topology.graph.weight("B", "A"), Some(1.0));
    }

    #[test]
    fn override_beats_document_flag() {
        let text = r#"{"directed": true, "graph": {"A": {"B": 1}}}"#;
        let topology = parse_topology(text, Some(false)).unwrap();
        assert_eq!(topology.graph.weight("B", "A"), Some(1.0));
    }

    #[test]
    fn malformed_weights_are_fatal() {
        for bad in [r#""heavy""#, "true", "null", r#"{"weight": "x"}"#, "[1]"] {
            let text = format!(r#"{{"A": {{"B": {bad}}}}}"#);
            let err = parse_topology(&text, None).unwrap_err();
            assert!(
                matches!(err, WattError::Graph(GraphError::MalformedWeight { .. })),
                "{bad} gave {err}"
            );
        }
    }

    #[test]
    fn node_named_graph_is_not_a_wrapper() {
        let topology =
            parse_topology(r#"{"graph": {"A": 1}, "A": {"graph": 2}}"#, None).unwrap();
        assert_eq!(topology.graph.weight("graph", "A"), Some(1.0));
        assert_eq!(topology.graph.weight("A", "graph"), Some(2.0));
    }

    #[test]
    fn nodes_named_like_wrapper_keys_stay_bare() {
        let text = r#"{
            "graph": {"directed": 1},
            "directed": {"positions": 2},
            "positions": {"graph": 3}
        }"#;
        let topology = parse_topology(text, None).unwrap();
        assert!(topology.positions.is_empty());
        assert_eq!(topology.graph.node_count(), 3);
        assert_eq!(topology.graph.weight("graph", "directed"), Some(1.0));
        assert_eq!(topology.graph.weight("directed", "positions"), Some(2.0));
        assert_eq!(topology.graph.weight("positions", "graph"), Some(3.0));

        let lone = parse_topology(r#"{"graph": {"A": 4}}"#, None).unwrap();
        assert_eq!(lone.graph.weight("graph", "A"), Some(4.0));
    }

    #[test]
    fn negative_weights_and_stray_positions_are_reported() {
        let text = r#"{"graph": {"A": {"B": -1}}, "positions": {"Z": [0, 0]}}"#;
        let topology = parse_topology(text, None).unwrap();
        assert_eq!(topology.diagnostics.warning_count(), 2);
        assert!(topology.positions.is_empty());
    }

    #[test]
    fn edge_spec_resolution() {
        assert_eq!(EdgeSpec::from_value(&Value::from(3)).map(EdgeSpec::resolve), Some(3.0));
        assert_eq!(
            EdgeSpec::from_value(&serde_json::json!({"color": "red"})),
            Some(EdgeSpec::Attributes { weight: None })
        );
        assert_eq!(EdgeSpec::from_value(&Value::Null), None);
    }
}
