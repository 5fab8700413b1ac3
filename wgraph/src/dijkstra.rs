//! Single-pair Dijkstra over a [`GraphStore`].
//! Stale heap entries are skipped on pop by comparing against the best known distance,
//! which stands in for decrease-key. The search stops as soon as the destination settles.
use serde::Serialize;

use crate::error::{Error, Result};
use crate::heap::MinHeap;
use crate::store::GraphStore;
use crate::table::OpenAddressTable;
use crate::{edge_label, Weight};

/// Work counters of one algorithm run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Vertices taken off the heap and expanded.
    pub settled: usize,
    /// Heap entries discarded because a better one had already been handled.
    pub stale: usize,
    pub edges_scanned: usize,
    pub heap_pushes: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct ShortestPath {
    /// Vertices from source to destination, both included.
    pub path: Vec<String>,
    pub distance: Weight,
    /// `"u -> v"` for each path edge, in path order.
    pub edge_weights: OpenAddressTable<Weight>,
    /// Weight of each path edge, `leg_weights[i]` between `path[i]` and `path[i + 1]`.
    pub leg_weights: Vec<Weight>,
    pub stats: SearchStats,
}

impl ShortestPath {
    pub fn source(&self) -> &str {
        self.path.first().map(String::as_str).unwrap_or_default()
    }

    pub fn destination(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or_default()
    }

    /// Path edges as `(from, to, weight)`.
    pub fn legs(&self) -> impl Iterator<Item = (&str, &str, Weight)> + '_ {
        self.path
            .windows(2)
            .zip(&self.leg_weights)
            .map(|(w, &weight)| (w[0].as_str(), w[1].as_str(), weight))
    }
}

#[derive(Clone, Debug)]
pub enum PathOutcome {
    Found(ShortestPath),
    Unreachable { start: String, destination: String, stats: SearchStats },
}

impl PathOutcome {
    pub fn found(&self) -> Option<&ShortestPath> {
        match self {
            PathOutcome::Found(p) => Some(p),
            PathOutcome::Unreachable { .. } => None,
        }
    }

    pub fn into_result(self) -> Result<ShortestPath> {
        match self {
            PathOutcome::Found(p) => Ok(p),
            PathOutcome::Unreachable { start, destination, .. } => {
                Err(Error::Unreachable { start, destination })
            }
        }
    }
}

/// Shortest path from `source` to `destination`.
/// Both vertices must exist (`NotFound` otherwise); no path is a normal
/// [`PathOutcome::Unreachable`].
pub fn shortest_path(g: &GraphStore, source: &str, destination: &str) -> Result<PathOutcome> {
    if !g.contains_vertex(source) {
        return Err(Error::not_found(source));
    }
    if !g.contains_vertex(destination) {
        return Err(Error::not_found(destination));
    }
    if source == destination {
        return Ok(PathOutcome::Found(ShortestPath {
            path: vec![source.to_owned()],
            distance: 0.0,
            edge_weights: OpenAddressTable::new(),
            leg_weights: Vec::new(),
            stats: SearchStats::default(),
        }));
    }
    tracing::debug!(source, destination, vertices = g.vertex_count(), "dijkstra start");
    tracing::trace!(graph = %g, "adjacency");

    let n = g.vertex_count();
    let mut best: OpenAddressTable<Weight> = OpenAddressTable::with_capacity(2 * n + 1);
    for v in g.vertices() {
        best.add(v, Weight::INFINITY)?;
    }
    best.add(source, 0.0)?;
    let mut predecessor: OpenAddressTable<String> = OpenAddressTable::with_capacity(n);
    let mut heap: MinHeap<String> = MinHeap::with_capacity(n);
    heap.push(source.to_owned(), 0.0);
    let mut stats = SearchStats { heap_pushes: 1, ..SearchStats::default() };

    while let Some((u, d)) = heap.pop_min() {
        if d > *best.get(&u)? {
            stats.stale += 1;
            continue;
        }
        stats.settled += 1;
        if u == destination {
            break;
        }
        for (v, &w) in g.neighbors(&u)?.iter() {
            stats.edges_scanned += 1;
            let candidate = d + w;
            let known = best.get_mut(v)?;
            if candidate < *known {
                tracing::trace!(from = %u, to = v, previous = *known, candidate, "relax");
                *known = candidate;
                predecessor.add(v, u.clone())?;
                heap.push(v.to_owned(), candidate);
                stats.heap_pushes += 1;
            }
        }
    }

    let distance = *best.get(destination)?;
    tracing::trace!(distances = %best, predecessors = %predecessor, "dijkstra tables");
    if distance == Weight::INFINITY {
        tracing::debug!(source, destination, ?stats, "destination unreachable");
        return Ok(PathOutcome::Unreachable {
            start: source.to_owned(),
            destination: destination.to_owned(),
            stats,
        });
    }

    let mut hops: Vec<(&str, &str)> = Vec::new();
    let mut cur = destination;
    while cur != source {
        let prev = predecessor.get(cur)?.as_str();
        hops.push((prev, cur));
        cur = prev;
    }
    hops.reverse();

    let mut path = Vec::with_capacity(hops.len() + 1);
    path.push(source.to_owned());
    let mut edge_weights = OpenAddressTable::with_capacity(2 * hops.len() + 1);
    let mut leg_weights = Vec::with_capacity(hops.len());
    for &(from, to) in &hops {
        let w = g.weight(from, to)?;
        edge_weights.add(&edge_label(from, to), w)?;
        leg_weights.push(w);
        path.push(to.to_owned());
    }
    tracing::debug!(source, destination, distance, hops = hops.len(), ?stats, "dijkstra done");
    Ok(PathOutcome::Found(ShortestPath { path, distance, edge_weights, leg_weights, stats }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(edges: &[(&str, &str, Weight)]) -> GraphStore {
        let mut g = GraphStore::new();
        for &(a, b, w) in edges {
            g.add_edge(a, b, w).unwrap();
        }
        g
    }

    #[test]
    fn triangle_prefers_two_hops() {
        let g = build(&[("A", "B", 4.0), ("B", "C", 2.0), ("A", "C", 9.0)]);
        let p = shortest_path(&g, "A", "C").unwrap().into_result().unwrap();
        assert_eq!(p.path, vec!["A", "B", "C"]);
        assert_eq!(p.distance, 6.0);
        assert_eq!(p.source(), "A");
        assert_eq!(p.destination(), "C");
        assert_eq!(*p.edge_weights.get("A -> B").unwrap(), 4.0);
        assert_eq!(*p.edge_weights.get("B -> C").unwrap(), 2.0);
        assert_eq!(p.edge_weights.keys().collect::<Vec<_>>(), vec!["A -> B", "B -> C"]);
        assert_eq!(p.legs().collect::<Vec<_>>(), vec![("A", "B", 4.0), ("B", "C", 2.0)]);
    }

    #[test]
    fn same_source_and_destination() {
        let g = build(&[("A", "B", 4.0)]);
        let p = shortest_path(&g, "B", "B").unwrap().into_result().unwrap();
        assert_eq!(p.path, vec!["B"]);
        assert_eq!(p.distance, 0.0);
        assert!(p.edge_weights.is_empty());
        assert_eq!(p.stats, SearchStats::default());
        assert_eq!(p.legs().count(), 0);
    }

    #[test]
    fn unreachable_is_an_outcome() {
        let g = build(&[("A", "B", 1.0), ("C", "D", 1.0)]);
        let out = shortest_path(&g, "A", "D").unwrap();
        assert!(out.found().is_none());
        match &out {
            PathOutcome::Unreachable { start, destination, stats } => {
                assert_eq!(start, "A");
                assert_eq!(destination, "D");
                assert_eq!(stats.settled, 2);
            }
            PathOutcome::Found(_) => panic!("expected unreachable"),
        }
        let err = out.into_result().unwrap_err();
        assert!(err.is_topology());
        assert!(matches!(err, Error::Unreachable { .. }));
    }

    #[test]
    fn unknown_endpoints() {
        let g = build(&[("A", "B", 1.0)]);
        assert!(matches!(shortest_path(&g, "X", "B"), Err(Error::NotFound { key }) if key == "X"));
        assert!(matches!(shortest_path(&g, "A", "Y"), Err(Error::NotFound { key }) if key == "Y"));
        assert!(matches!(shortest_path(&g, "Z", "Z"), Err(Error::NotFound { .. })));
    }

    #[test]
    fn stale_entries_are_skipped() {
        // A is first reached at 10, then improved to 2 through B; the 10 entry goes stale.
        let g = build(&[("S", "A", 10.0), ("S", "B", 1.0), ("B", "A", 1.0), ("A", "T", 20.0)]);
        let p = shortest_path(&g, "S", "T").unwrap().into_result().unwrap();
        assert_eq!(p.path, vec!["S", "B", "A", "T"]);
        assert_eq!(p.distance, 22.0);
        assert_eq!(p.stats.stale, 1);
        assert_eq!(p.stats.settled, 4);
        assert_eq!(p.stats.heap_pushes, 5);
    }

    #[test]
    fn multi_word_names() {
        let g = build(&[("New York", "Boston", 215.0), ("Boston", "Portland", 107.0), ("New York", "Portland", 400.0)]);
        let p = shortest_path(&g, "New York", "Portland").unwrap().into_result().unwrap();
        assert_eq!(p.path, vec!["New York", "Boston", "Portland"]);
        assert_eq!(p.distance, 322.0);
        assert!(p.edge_weights.contains("New York -> Boston"));
    }

    #[test]
    fn legs_survive_arrows_in_names() {
        let g = build(&[("s", "a -> b", 1.0), ("a -> b", "c", 2.0)]);
        let p = shortest_path(&g, "s", "c").unwrap().into_result().unwrap();
        assert_eq!(p.legs().collect::<Vec<_>>(), vec![("s", "a -> b", 1.0), ("a -> b", "c", 2.0)]);
        assert_eq!(p.leg_weights, vec![1.0, 2.0]);
        assert_eq!(p.edge_weights.len(), 2);
    }

    #[test]
    fn early_exit_leaves_far_vertices_unsettled() {
        let g = build(&[("a", "b", 1.0), ("b", "c", 1.0), ("c", "d", 1.0), ("d", "e", 1.0)]);
        let p = shortest_path(&g, "a", "b").unwrap().into_result().unwrap();
        assert_eq!(p.distance, 1.0);
        assert_eq!(p.stats.settled, 2);
    }
}
