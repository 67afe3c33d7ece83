//! Single-source Dijkstra with early exit.
//!
//! The frontier is a binary min-heap keyed by accumulated cost. Entries are
//! never updated in place: a node may sit in the heap several times and every
//! entry after the first one popped is discarded (lazy deletion). Once the
//! target is finalized the search stops, which is only correct because edge
//! weights are assumed non-negative. That assumption is not checked.
//!
//! Costs accumulate with saturation: a path whose true cost exceeds the
//! weight type's range ranks at the maximum, behind every representable path.
//!
//! Each frontier entry remembers the node it was reached from; the finalized
//! map keeps that predecessor, and the path is rebuilt from the chain when the
//! target is popped. This yields the same path as carrying a prefix in every
//! entry without copying prefixes on each push.
//!
//! # Tie-breaking
//!
//! Equal-cost entries pop in ascending [`NodeId`] order, then ascending
//! predecessor id. Ids follow first-seen order in the topology, so identical
//! inputs always produce the identical path.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use wattroute_core::{EdgeWeight, GraphStore, NodeId};

/// Ordered nodes from start to end, inclusive. Empty means "no route".
pub type Path = Vec<NodeId>;

struct FrontierEntry<W> {
    cost: W,
    node: NodeId,
    via: Option<NodeId>,
}

impl<W: EdgeWeight> PartialEq for FrontierEntry<W> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<W: EdgeWeight> Eq for FrontierEntry<W> {}

impl<W: EdgeWeight> PartialOrd for FrontierEntry<W> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<W: EdgeWeight> Ord for FrontierEntry<W> {
    // BinaryHeap pops the greatest entry, so every comparison is reversed.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_order(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
            .then_with(|| other.via.cmp(&self.via))
    }
}

/// Minimum-cost path from `start` to `end`.
///
/// Returns an empty path when `end` is unreachable or either endpoint is not
/// a node of `graph`, and `[start]` when `start == end`.
pub fn find_shortest_path<W: EdgeWeight>(graph: &GraphStore<W>, start: NodeId, end: NodeId) -> Path {
    if !graph.contains(start) || !graph.contains(end) {
        return Path::new();
    }

    let mut frontier = BinaryHeap::new();
    let mut finalized: HashMap<NodeId, Option<NodeId>> = HashMap::new();
    frontier.push(FrontierEntry {
        cost: W::zero(),
        node: start,
        via: None,
    });

    while let Some(FrontierEntry { cost, node, via }) = frontier.pop() {
        if finalized.contains_key(&node) {
            continue;
        }
        finalized.insert(node, via);

        if node == end {
            return trace_back(&finalized, end);
        }

        for (neighbor, weight) in graph.neighbors(node) {
            if !finalized.contains_key(&neighbor) {
                frontier.push(FrontierEntry {
                    cost: cost.saturating_add(weight),
                    node: neighbor,
                    via: Some(node),
                });
            }
        }
    }

    Path::new()
}

fn trace_back(finalized: &HashMap<NodeId, Option<NodeId>>, end: NodeId) -> Path {
    let mut path = vec![end];
    let mut cursor = finalized.get(&end).copied().flatten();
    while let Some(node) = cursor {
        path.push(node);
        cursor = finalized.get(&node).copied().flatten();
    }
    path.reverse();
    path
}

/// Total weight of `path`, or `None` if it is empty, uses a missing edge, or
/// its total does not fit in `W`.
pub fn path_cost<W: EdgeWeight>(graph: &GraphStore<W>, path: &[NodeId]) -> Option<W> {
    let (&first, _) = path.split_first()?;
    if !graph.contains(first) {
        return None;
    }
    path.windows(2).try_fold(W::zero(), |total, hop| {
        graph
            .edge_weight(hop[0], hop[1])
            .and_then(|w| total.checked_add(w))
    })
}

/// Read-only query handle over one topology snapshot.
///
/// Holds nothing but a shared reference, so a finder can be used from many
/// threads at once.
#[derive(Debug, Clone, Copy)]
pub struct ShortestPathFinder<'g, W> {
    graph: &'g GraphStore<W>,
}

impl<'g, W: EdgeWeight> ShortestPathFinder<'g, W> {
    pub fn new(graph: &'g GraphStore<W>) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &'g GraphStore<W> {
        self.graph
    }

    pub fn find(&self, start: NodeId, end: NodeId) -> Path {
        find_shortest_path(self.graph, start, end)
    }

    /// Like [`find`](Self::find) but by label; unknown labels give an empty path.
    pub fn find_by_label(&self, start: &str, end: &str) -> Path {
        match (self.graph.node_id(start), self.graph.node_id(end)) {
            (Some(start), Some(end)) => self.find(start, end),
            _ => Path::new(),
        }
    }

    pub fn labels(&self, path: &[NodeId]) -> Vec<String> {
        path.iter().map(|&id| self.graph.display_label(id)).collect()
    }
}
