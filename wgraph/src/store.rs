//! Undirected weighted graph keyed by vertex name.
//!
//! Vertex names map through an [`OpenAddressTable`] index to slots of an arena; each
//! arena slot owns that vertex's neighbor table (neighbor name -> edge weight). An
//! undirected edge is stored as two half-edges, one in each endpoint's table.
use std::fmt;

use crate::error::{Error, Result};
use crate::table::OpenAddressTable;
use crate::Weight;

pub type VertexId = usize;

#[derive(Clone, Debug)]
struct Vertex {
    name: String,
    neighbors: OpenAddressTable<Weight>,
}

#[derive(Clone, Debug, Default)]
pub struct GraphStore {
    index: OpenAddressTable<VertexId>,
    /// Removed vertices leave `None`; ids are never reused.
    arena: Vec<Option<Vertex>>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sizes the vertex index so that `vertex_hint` vertices fit without a resize.
    /// Fails with [`Error::Capacity`] when the index would exceed its slot limit.
    pub fn with_capacity(vertex_hint: usize) -> Result<Self> {
        let index = OpenAddressTable::try_with_capacity(index_slots(vertex_hint)?)?;
        Ok(Self { index, arena: Vec::with_capacity(vertex_hint) })
    }

    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        let total = self
            .vertex_count()
            .checked_add(additional)
            .ok_or_else(|| Error::capacity(usize::MAX))?;
        let wanted = index_slots(total)?;
        if wanted > self.index.capacity() {
            self.index.resize(wanted)?;
        }
        self.arena.reserve(additional);
        Ok(())
    }

    pub fn vertex_count(&self) -> usize { self.index.len() }
    pub fn is_empty(&self) -> bool { self.index.is_empty() }

    pub fn contains_vertex(&self, name: &str) -> bool {
        self.index.contains(name)
    }

    /// Vertex names in the order they were first added.
    pub fn vertices(&self) -> impl Iterator<Item = &str> + '_ {
        self.index.keys()
    }

    fn vertex(&self, name: &str) -> Result<&Vertex> {
        let id = *self.index.get(name)?;
        self.arena.get(id).and_then(Option::as_ref).ok_or_else(|| Error::not_found(name))
    }

    fn vertex_mut(&mut self, name: &str) -> Result<&mut Vertex> {
        let id = *self.index.get(name)?;
        self.arena.get_mut(id).and_then(Option::as_mut).ok_or_else(|| Error::not_found(name))
    }

    /// Adds an isolated vertex; existing vertices are left untouched.
    pub fn add_vertex(&mut self, name: &str) -> Result<VertexId> {
        if let Some(&id) = self.index.find(name) {
            return Ok(id);
        }
        let id = self.arena.len();
        self.index.add(name, id)?;
        self.arena.push(Some(Vertex { name: name.to_owned(), neighbors: OpenAddressTable::new() }));
        Ok(id)
    }

    /// Adds the undirected edge `v1 - v2`, creating missing endpoints.
    /// A half-edge that already exists keeps its weight, so repeated edge lines
    /// are ignored and the first weight wins.
    pub fn add_edge(&mut self, v1: &str, v2: &str, weight: Weight) -> Result<()> {
        if !(weight.is_finite() && weight > 0.0) {
            return Err(Error::InvalidWeight { from: v1.to_owned(), to: v2.to_owned(), weight });
        }
        self.add_vertex(v1)?;
        self.add_vertex(v2)?;
        for (from, to) in [(v1, v2), (v2, v1)] {
            let neighbors = &mut self.vertex_mut(from)?.neighbors;
            if !neighbors.contains(to) {
                neighbors.add(to, weight)?;
            }
        }
        Ok(())
    }

    /// Removes both half-edges of `v1 - v2` and returns the weight, if the edge existed.
    pub fn remove_edge(&mut self, v1: &str, v2: &str) -> Result<Option<Weight>> {
        let weight = self.vertex_mut(v1)?.neighbors.remove(v2);
        self.vertex_mut(v2)?.neighbors.remove(v1);
        Ok(weight)
    }

    /// Removes a vertex with all incident edges, returning its neighbor table.
    pub fn remove_vertex(&mut self, name: &str) -> Result<OpenAddressTable<Weight>> {
        let others: Vec<String> = self
            .neighbors(name)?
            .keys()
            .filter(|&other| other != name)
            .map(str::to_owned)
            .collect();
        for other in &others {
            self.vertex_mut(other)?.neighbors.remove(name);
        }
        let id = self.index.remove(name).ok_or_else(|| Error::not_found(name))?;
        let vertex = self
            .arena
            .get_mut(id)
            .and_then(Option::take)
            .ok_or_else(|| Error::not_found(name))?;
        tracing::debug!(vertex = %vertex.name, degree = vertex.neighbors.len(), "removed vertex");
        Ok(vertex.neighbors)
    }

    pub fn neighbors(&self, name: &str) -> Result<&OpenAddressTable<Weight>> {
        Ok(&self.vertex(name)?.neighbors)
    }

    pub fn weight(&self, v1: &str, v2: &str) -> Result<Weight> {
        self.neighbors(v1)?.get(v2).copied()
    }

    /// First neighbor of `name`, in slot order, whose edge weight equals `value` exactly.
    /// A missing vertex and a missing weight both report `name` as not found.
    pub fn vertex_by_distance(&self, name: &str, value: Weight) -> Result<&str> {
        let found = self.neighbors(name)?.iter_slots().find(|&(_, &w)| w == value);
        match found {
            Some((n, _)) => Ok(n),
            None => {
                tracing::trace!(vertex = name, weight = value, "no neighbor at this weight");
                Err(Error::not_found(name))
            }
        }
    }

    /// Every undirected edge once, as `(first endpoint, second endpoint, weight)`,
    /// where the first endpoint is the one added to the store earlier.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, Weight)> + '_ {
        self.index.iter().flat_map(move |(name, &id)| {
            self.arena.get(id).and_then(Option::as_ref).into_iter().flat_map(move |v| {
                v.neighbors.iter().filter_map(move |(n, &w)| {
                    let other = *self.index.find(n)?;
                    (id <= other).then_some((name, n, w))
                })
            })
        })
    }

    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    pub fn total_weight(&self) -> Weight {
        self.edges().map(|(_, _, w)| w).sum()
    }
}

/// Index slots needed to keep `vertices` entries under half load.
fn index_slots(vertices: usize) -> Result<usize> {
    vertices
        .checked_mul(2)
        .and_then(|n| n.checked_add(1))
        .ok_or_else(|| Error::capacity(usize::MAX))
}

impl fmt::Display for GraphStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ ")?;
        for (i, name) in self.vertices().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match self.neighbors(name) {
                Ok(n) => write!(f, "{name} : {n}")?,
                Err(_) => write!(f, "{name} : ?")?,
            }
        }
        write!(f, " }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> GraphStore {
        let mut g = GraphStore::new();
        g.add_edge("A", "B", 4.0).unwrap();
        g.add_edge("B", "C", 2.0).unwrap();
        g.add_edge("A", "C", 9.0).unwrap();
        g
    }

    #[test]
    fn edges_are_symmetric() {
        let g = triangle();
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.vertices().collect::<Vec<_>>(), vec!["A", "B", "C"]);
        assert_eq!(g.weight("A", "B").unwrap(), 4.0);
        assert_eq!(g.weight("B", "A").unwrap(), 4.0);
        assert_eq!(g.weight("C", "A").unwrap(), 9.0);
        assert_eq!(g.neighbors("B").unwrap().keys().collect::<Vec<_>>(), vec!["A", "C"]);
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.total_weight(), 15.0);
    }

    #[test]
    fn duplicate_edge_keeps_first_weight() {
        let mut g = triangle();
        g.add_edge("B", "A", 100.0).unwrap();
        g.add_edge("A", "B", 1.0).unwrap();
        assert_eq!(g.weight("A", "B").unwrap(), 4.0);
        assert_eq!(g.weight("B", "A").unwrap(), 4.0);
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn rejects_bad_weights() {
        let mut g = GraphStore::new();
        for w in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(g.add_edge("a", "b", w), Err(Error::InvalidWeight { .. })));
        }
        assert!(g.is_empty());
    }

    #[test]
    fn missing_vertex_is_not_found() {
        let g = triangle();
        assert!(matches!(g.neighbors("Z"), Err(Error::NotFound { key }) if key == "Z"));
        assert!(matches!(g.weight("A", "Z"), Err(Error::NotFound { .. })));
        assert!(!g.contains_vertex("Z"));
    }

    #[test]
    fn vertex_by_distance_scans_exact_weight() {
        let g = triangle();
        assert_eq!(g.vertex_by_distance("C", 2.0).unwrap(), "B");
        assert_eq!(g.vertex_by_distance("C", 9.0).unwrap(), "A");
        assert!(matches!(g.vertex_by_distance("C", 2.0000001), Err(Error::NotFound { key }) if key == "C"));
        assert!(g.vertex_by_distance("Q", 2.0).is_err());
    }

    #[test]
    fn edges_listed_once_in_vertex_order() {
        let g = triangle();
        let edges: Vec<_> = g.edges().collect();
        assert_eq!(edges, vec![("A", "B", 4.0), ("A", "C", 9.0), ("B", "C", 2.0)]);
    }

    #[test]
    fn remove_edge_and_vertex() {
        let mut g = triangle();
        assert_eq!(g.remove_edge("A", "C").unwrap(), Some(9.0));
        assert_eq!(g.remove_edge("A", "C").unwrap(), None);
        assert!(!g.neighbors("C").unwrap().contains("A"));
        assert_eq!(g.edge_count(), 2);

        let removed = g.remove_vertex("B").unwrap();
        assert_eq!(removed.keys().collect::<Vec<_>>(), vec!["A", "C"]);
        assert_eq!(g.vertex_count(), 2);
        assert!(g.neighbors("A").unwrap().is_empty());
        assert!(g.neighbors("C").unwrap().is_empty());
        assert!(g.neighbors("B").is_err());
        assert_eq!(g.edge_count(), 0);

        // a re-added vertex gets a fresh slot
        g.add_edge("B", "A", 3.0).unwrap();
        assert_eq!(g.vertices().collect::<Vec<_>>(), vec!["A", "C", "B"]);
        assert_eq!(g.weight("A", "B").unwrap(), 3.0);
    }

    #[test]
    fn self_loop_stored_once() {
        let mut g = GraphStore::new();
        g.add_edge("A", "A", 1.0).unwrap();
        assert_eq!(g.vertex_count(), 1);
        assert_eq!(g.neighbors("A").unwrap().len(), 1);
        assert_eq!(g.edges().collect::<Vec<_>>(), vec![("A", "A", 1.0)]);
        assert_eq!(g.remove_vertex("A").unwrap().len(), 1);
    }

    #[test]
    fn many_vertices_and_reserve() {
        let mut g = GraphStore::with_capacity(4).unwrap();
        g.reserve(300).unwrap();
        let cap = g.index.capacity();
        for i in 0..300 {
            g.add_edge(&format!("v{i}"), &format!("v{}", (i + 1) % 300), 1.0 + i as f64).unwrap();
        }
        assert_eq!(g.index.capacity(), cap);
        assert_eq!(g.vertex_count(), 300);
        assert_eq!(g.edge_count(), 300);
        assert_eq!(g.neighbors("v0").unwrap().len(), 2);
    }

    #[test]
    fn oversized_reservations_are_errors() {
        let mut g = triangle();
        let cap = g.index.capacity();
        assert!(matches!(g.reserve(usize::MAX / 2), Err(Error::Capacity { .. })));
        assert!(matches!(g.reserve(usize::MAX), Err(Error::Capacity { requested: usize::MAX, .. })));
        assert_eq!(g.index.capacity(), cap);
        assert_eq!(g.edge_count(), 3);
        assert!(GraphStore::new().reserve(usize::MAX / 2).is_err());

        assert!(matches!(GraphStore::with_capacity(usize::MAX), Err(Error::Capacity { .. })));
        assert!(matches!(GraphStore::with_capacity(crate::table::MAX_CAPACITY), Err(Error::Capacity { .. })));
    }

    #[test]
    fn ids_follow_the_arena() {
        let mut g = GraphStore::new();
        assert_eq!(g.add_vertex("a").unwrap(), 0);
        assert_eq!(g.add_vertex("b").unwrap(), 1);
        assert_eq!(g.add_vertex("a").unwrap(), 0);
        assert_eq!(g.arena.len(), 2);
        assert_eq!(g.index.get("b").copied().unwrap(), 1);
    }

    #[test]
    fn failed_vertex_removal_changes_nothing() {
        let mut g = triangle();
        assert!(matches!(g.remove_vertex("Z"), Err(Error::NotFound { key }) if key == "Z"));
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.edge_count(), 3);

        let removed = g.remove_vertex("A").unwrap();
        assert_eq!(removed.len(), 2);
        assert!(!g.neighbors("B").unwrap().contains("A"));
        assert!(!g.neighbors("C").unwrap().contains("A"));
        assert!(g.remove_vertex("A").is_err());
    }

    #[test]
    fn display() {
        let mut g = GraphStore::new();
        g.add_edge("a", "b", 1.0).unwrap();
        assert_eq!(g.to_string(), "{ a : { b : 1 }, b : { a : 1 } }");
    }
}
