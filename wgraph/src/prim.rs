//! Prim's minimum spanning tree over a [`GraphStore`].
//!
//! Like the shortest-path search this uses the lazy heap: every unvisited neighbor of
//! a newly visited vertex is pushed with its edge weight, duplicates included, and
//! entries for vertices that are already in the tree are dropped when popped.
//! Each heap entry remembers the tree vertex it was pushed from, so the edge that
//! attaches a vertex is known directly instead of being searched for by weight.
use std::fmt;

use serde::Serialize;

use crate::dijkstra::SearchStats;
use crate::error::{Error, Result};
use crate::heap::MinHeap;
use crate::store::GraphStore;
use crate::table::OpenAddressTable;
use crate::Weight;

/// Heap key: `vertex` reached over an edge from the tree vertex `via`.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Reach {
    vertex: String,
    via: String,
}

impl fmt::Display for Reach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (via {})", self.vertex, self.via)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TreeEdge {
    pub from: String,
    pub to: String,
    pub weight: Weight,
}

#[derive(Clone, Debug, Serialize)]
pub struct SpanningTree {
    pub root: String,
    /// Tree edges in the order they were added; `from` is always the vertex already in the tree.
    pub edges: Vec<TreeEdge>,
    pub total_weight: Weight,
    /// Vertices in the order they joined the tree, starting with the root.
    pub visited: Vec<String>,
    pub stats: SearchStats,
}

impl SpanningTree {
    /// Edge endpoints only, as consumed by the overlay writer.
    pub fn edge_pairs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.edges.iter().map(|e| (e.from.as_str(), e.to.as_str()))
    }

    pub fn contains_edge(&self, a: &str, b: &str) -> bool {
        self.edge_pairs().any(|(x, y)| (x == a && y == b) || (x == b && y == a))
    }
}

#[derive(Clone, Debug)]
pub enum TreeOutcome {
    Spanning(SpanningTree),
    Disconnected { root: String, reached: Vec<String>, vertex_count: usize, stats: SearchStats },
}

impl TreeOutcome {
    pub fn spanning(&self) -> Option<&SpanningTree> {
        match self {
            TreeOutcome::Spanning(t) => Some(t),
            TreeOutcome::Disconnected { .. } => None,
        }
    }

    pub fn into_result(self) -> Result<SpanningTree> {
        match self {
            TreeOutcome::Spanning(t) => Ok(t),
            TreeOutcome::Disconnected { root, reached, vertex_count, .. } => {
                Err(Error::Disconnected { root, reached: reached.len(), vertex_count })
            }
        }
    }
}

/// Minimum spanning tree grown from `root`.
/// A graph whose vertices are not all reachable yields [`TreeOutcome::Disconnected`].
pub fn minimum_spanning_tree(g: &GraphStore, root: &str) -> Result<TreeOutcome> {
    if !g.contains_vertex(root) {
        return Err(Error::not_found(root));
    }
    let vertex_count = g.vertex_count();
    tracing::debug!(root, vertices = vertex_count, "prim start");

    let mut visited: Vec<String> = Vec::with_capacity(vertex_count);
    let mut in_tree: OpenAddressTable<()> = OpenAddressTable::with_capacity(2 * vertex_count + 1);
    let mut heap: MinHeap<Reach> = MinHeap::with_capacity(vertex_count);
    let mut edges = Vec::with_capacity(vertex_count.saturating_sub(1));
    let mut total_weight: Weight = 0.0;
    let mut stats = SearchStats::default();

    heap.push(Reach { vertex: root.to_owned(), via: root.to_owned() }, 0.0);
    stats.heap_pushes += 1;

    while visited.len() < vertex_count {
        let Some((Reach { vertex, via }, d)) = heap.pop_min() else {
            tracing::debug!(root, reached = visited.len(), vertex_count, "graph is disconnected");
            return Ok(TreeOutcome::Disconnected {
                root: root.to_owned(),
                reached: visited,
                vertex_count,
                stats,
            });
        };
        if in_tree.contains(&vertex) {
            stats.stale += 1;
            continue;
        }
        in_tree.add(&vertex, ())?;
        stats.settled += 1;
        if vertex != via {
            tracing::trace!(from = %via, to = %vertex, weight = d, "tree edge");
            edges.push(TreeEdge { from: via, to: vertex.clone(), weight: d });
            total_weight += d;
        }
        for (next, &w) in g.neighbors(&vertex)?.iter() {
            stats.edges_scanned += 1;
            if !in_tree.contains(next) {
                heap.push(Reach { vertex: next.to_owned(), via: vertex.clone() }, w);
                stats.heap_pushes += 1;
            }
        }
        tracing::trace!(heap = %heap, "frontier");
        visited.push(vertex);
    }

    tracing::debug!(root, edges = edges.len(), total_weight, ?stats, "prim done");
    Ok(TreeOutcome::Spanning(SpanningTree {
        root: root.to_owned(),
        edges,
        total_weight,
        visited,
        stats,
    }))
}
