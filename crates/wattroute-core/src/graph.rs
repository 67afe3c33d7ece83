//! The weighted topology shared by every wattroute algorithm.
//!
//! [`GraphStore`] owns a directed adjacency relation (`node -> {neighbor -> weight}`)
//! over interned [`NodeId`]s. A store built as *undirected* mirrors every
//! insertion, so for each edge `(a, b, w)` the edge `(b, a, w)` exists for the
//! lifetime of the store.
//!
//! Mutation is single-writer: build the topology once, then share `&GraphStore`
//! across as many read-only queries (and threads) as needed.

use std::collections::{BTreeMap, HashMap};

use petgraph::graphmap::DiGraphMap;

use crate::error::{GraphError, GraphResult};
use crate::weight::EdgeWeight;
use crate::NodeId;

/// Owned adjacency relation between labelled nodes.
#[derive(Debug, Clone)]
pub struct GraphStore<W = f64> {
    graph: DiGraphMap<NodeId, W>,
    labels: Vec<String>,
    index: HashMap<String, NodeId>,
    directed: bool,
}

impl<W: EdgeWeight> GraphStore<W> {
    /// Create an empty store.
    pub fn new(directed: bool) -> Self {
        Self {
            graph: DiGraphMap::new(),
            labels: Vec::new(),
            index: HashMap::new(),
            directed,
        }
    }

    pub fn directed() -> Self {
        Self::new(true)
    }

    pub fn undirected() -> Self {
        Self::new(false)
    }

    /// Build a store from an adjacency description (`source -> [(target, weight)]`).
    ///
    /// Sources with no links are still registered as nodes. The first
    /// malformed weight aborts construction.
    ///
    /// When `directed` is false the description is inserted as given and then
    /// mirrored source by source, in description order. A pair listed in both
    /// directions with different weights therefore ends up with the weight
    /// written under whichever of the two sources comes first.
    pub fn from_adjacency<I, L, S, T>(adjacency: I, directed: bool) -> GraphResult<Self>
    where
        I: IntoIterator<Item = (S, L)>,
        L: IntoIterator<Item = (T, W)>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let mut store = Self::new(directed);
        let mut sources = Vec::new();
        for (source, links) in adjacency {
            let from = store.intern(source.as_ref());
            sources.push(from);
            for (target, weight) in links {
                let to = store.intern(target.as_ref());
                store.check_arc(from, to, weight)?;
                store.graph.add_edge(from, to, weight);
            }
        }
        if !directed {
            for from in sources {
                let links: Vec<(NodeId, W)> = store.neighbors(from).collect();
                for (to, weight) in links {
                    store.graph.add_edge(to, from, weight);
                }
            }
        }
        Ok(store)
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Return the id for `label`, registering it as an isolated node if new.
    pub fn intern(&mut self, label: &str) -> NodeId {
        if let Some(&id) = self.index.get(label) {
            return id;
        }
        let id = NodeId::new(self.labels.len());
        self.labels.push(label.to_string());
        self.index.insert(label.to_string(), id);
        self.graph.add_node(id);
        id
    }

    /// Look up a label without registering it.
    pub fn node_id(&self, label: &str) -> Option<NodeId> {
        self.index.get(label).copied()
    }

    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.labels.get(id.index()).map(String::as_str)
    }

    /// Label for display purposes; ids from another store render as `Node#n`.
    pub fn display_label(&self, id: NodeId) -> String {
        self.label(id)
            .map(str::to_string)
            .unwrap_or_else(|| id.to_string())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.labels.len()
    }

    /// Insert or overwrite the edge `a -> b` (and `b -> a` when undirected).
    pub fn connect(&mut self, a: &str, b: &str, weight: W) -> GraphResult<()> {
        ensure_well_formed(a, b, weight)?;
        let from = self.intern(a);
        let to = self.intern(b);
        self.connect_ids(from, to, weight)
    }

    /// [`connect`](Self::connect) with the default weight of one.
    pub fn connect_default(&mut self, a: &str, b: &str) -> GraphResult<()> {
        self.connect(a, b, W::one())
    }

    /// Insert or overwrite an edge between already-interned nodes.
    pub fn connect_ids(&mut self, from: NodeId, to: NodeId, weight: W) -> GraphResult<()> {
        self.check_arc(from, to, weight)?;
        self.graph.add_edge(from, to, weight);
        if !self.directed {
            self.graph.add_edge(to, from, weight);
        }
        Ok(())
    }

    fn check_arc(&self, from: NodeId, to: NodeId, weight: W) -> GraphResult<()> {
        for id in [from, to] {
            if !self.contains(id) {
                return Err(GraphError::UnknownNode(id));
            }
        }
        if !weight.is_well_formed() {
            return Err(GraphError::MalformedWeight {
                from: self.display_label(from),
                to: self.display_label(to),
                weight: format!("{weight:?}"),
            });
        }
        Ok(())
    }

    /// Outgoing links of `label`, registering it as a node if it was unknown.
    pub fn get(&mut self, label: &str) -> BTreeMap<NodeId, W> {
        let id = self.intern(label);
        self.neighbors(id).collect()
    }

    /// Weight of the edge `a -> b`, if both nodes and the edge exist.
    pub fn weight(&self, a: &str, b: &str) -> Option<W> {
        let from = self.node_id(a)?;
        let to = self.node_id(b)?;
        self.edge_weight(from, to)
    }

    pub fn edge_weight(&self, from: NodeId, to: NodeId) -> Option<W> {
        self.graph.edge_weight(from, to).copied()
    }

    /// Outgoing `(neighbor, weight)` pairs of `id`, in insertion order.
    ///
    /// Read-only counterpart of [`get`](Self::get): an unknown id yields nothing.
    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = (NodeId, W)> + '_ {
        let links = if self.graph.contains_node(id) {
            Some(self.graph.edges(id).map(|(_, to, weight)| (to, *weight)))
        } else {
            None
        };
        links.into_iter().flatten()
    }

    /// Every node that is a source, a destination, or was registered explicitly.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.nodes()
    }

    /// All directed edges as `(from, to, weight)`; mirrored edges appear twice.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, W)> + '_ {
        self.graph
            .all_edges()
            .map(|(from, to, weight)| (from, to, *weight))
    }

    pub(crate) fn inner(&self) -> &DiGraphMap<NodeId, W> {
        &self.graph
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of directed edges (an undirected link counts twice, a self-loop once).
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl<W: EdgeWeight> Default for GraphStore<W> {
    fn default() -> Self {
        Self::directed()
    }
}

fn ensure_well_formed<W: EdgeWeight>(a: &str, b: &str, weight: W) -> GraphResult<()> {
    if weight.is_well_formed() {
        Ok(())
    } else {
        Err(GraphError::MalformedWeight {
            from: a.to_string(),
            to: b.to_string(),
            weight: format!("{weight:?}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(graph: &GraphStore<f64>, label: &str) -> NodeId {
        graph.node_id(label).unwrap()
    }

    #[test]
    fn undirected_connect_mirrors_edge() {
        let mut graph = GraphStore::undirected();
        graph.connect("A", "B", 3.0).unwrap();
        assert_eq!(graph.weight("A", "B"), Some(3.0));
        assert_eq!(graph.weight("B", "A"), Some(3.0));
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn directed_connect_does_not_mirror() {
        let mut graph = GraphStore::directed();
        graph.connect("A", "B", 3.0).unwrap();
        assert_eq!(graph.weight("A", "B"), Some(3.0));
        assert_eq!(graph.weight("B", "A"), None);
    }

    #[test]
    fn reconnect_overwrites_without_duplicating() {
        let mut graph = GraphStore::undirected();
        graph.connect("A", "B", 3.0).unwrap();
        graph.connect("A", "B", 7.5).unwrap();
        assert_eq!(graph.weight("A", "B"), Some(7.5));
        assert_eq!(graph.weight("B", "A"), Some(7.5));
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn construction_mirrors_initial_edges() {
        let graph = GraphStore::from_adjacency(
            vec![("A", vec![("B", 1.0), ("C", 2.0)])],
            false,
        )
        .unwrap();
        assert_eq!(graph.weight("B", "A"), Some(1.0));
        assert_eq!(graph.weight("C", "A"), Some(2.0));
        assert!(!graph.is_directed());
    }

    #[test]
    fn construction_conflict_keeps_earlier_source_weight() {
        let graph = GraphStore::from_adjacency(
            vec![("A", vec![("B", 1.0)]), ("B", vec![("A", 2.0), ("C", 3.0)])],
            false,
        )
        .unwrap();
        assert_eq!(graph.weight("A", "B"), Some(1.0));
        assert_eq!(graph.weight("B", "A"), Some(1.0));
        assert_eq!(graph.weight("C", "B"), Some(3.0));
        assert_eq!(graph.edge_count(), 4);

        let reversed = GraphStore::from_adjacency(
            vec![("B", vec![("A", 2.0)]), ("A", vec![("B", 1.0)])],
            false,
        )
        .unwrap();
        assert_eq!(reversed.weight("A", "B"), Some(2.0));
        assert_eq!(reversed.weight("B", "A"), Some(2.0));
    }

    #[test]
    fn default_weight_is_one() {
        let mut graph: GraphStore<u32> = GraphStore::directed();
        graph.connect_default("A", "B").unwrap();
        assert_eq!(graph.weight("A", "B"), Some(1));
    }

    #[test]
    fn get_unknown_node_registers_it() {
        let mut graph: GraphStore<f64> = GraphStore::directed();
        graph.connect("A", "B", 1.0).unwrap();
        assert!(graph.node_id("Z").is_none());

        let links = graph.get("Z");
        assert!(links.is_empty());
        assert!(graph.node_id("Z").is_some());
        assert_eq!(graph.node_count(), 3);
    }

    #[test]
    fn get_returns_outgoing_links() {
        let mut graph = GraphStore::directed();
        graph.connect("A", "B", 1.0).unwrap();
        graph.connect("A", "C", 5.0).unwrap();
        let links = graph.get("A");
        let b = id(&graph, "B");
        let c = id(&graph, "C");
        assert_eq!(links.len(), 2);
        assert_eq!(links[&b], 1.0);
        assert_eq!(links[&c], 5.0);
    }

    #[test]
    fn nodes_include_sources_and_destinations() {
        let graph =
            GraphStore::from_adjacency(vec![("A", vec![("B", 1.0)]), ("C", vec![])], true)
                .unwrap();
        let mut labels: Vec<_> = graph.nodes().filter_map(|n| graph.label(n)).collect();
        labels.sort();
        assert_eq!(labels, vec!["A", "B", "C"]);
    }

    #[test]
    fn self_loops_are_permitted() {
        let mut graph = GraphStore::undirected();
        graph.connect("A", "A", 2.0).unwrap();
        assert_eq!(graph.weight("A", "A"), Some(2.0));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn malformed_weight_is_rejected_before_mutation() {
        let mut graph = GraphStore::undirected();
        let err = graph.connect("A", "B", f64::NAN).unwrap_err();
        assert!(matches!(err, GraphError::MalformedWeight { .. }));
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn malformed_weight_aborts_construction() {
        let result = GraphStore::from_adjacency(vec![("A", vec![("B", f64::INFINITY)])], true);
        assert!(result.is_err());
    }

    #[test]
    fn foreign_ids_are_rejected() {
        let mut graph: GraphStore<f64> = GraphStore::directed();
        let a = graph.intern("A");
        let err = graph.connect_ids(a, NodeId::new(42), 1.0).unwrap_err();
        assert_eq!(err, GraphError::UnknownNode(NodeId::new(42)));
    }

    #[test]
    fn neighbors_of_unknown_id_is_empty() {
        let graph: GraphStore<f64> = GraphStore::directed();
        assert_eq!(graph.neighbors(NodeId::new(0)).count(), 0);
    }

    #[test]
    fn ids_follow_first_seen_order() {
        let mut graph: GraphStore<f64> = GraphStore::directed();
        graph.connect("B", "A", 1.0).unwrap();
        assert_eq!(graph.node_id("B"), Some(NodeId::new(0)));
        assert_eq!(graph.node_id("A"), Some(NodeId::new(1)));
        assert_eq!(graph.label(NodeId::new(1)), Some("A"));
        assert_eq!(graph.display_label(NodeId::new(5)), "Node#5");
    }
}
