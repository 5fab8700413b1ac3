//! wgraph: weighted graphs on open-addressing hash tables.
//! Vertices are named by strings; each vertex owns a quadratic-probing table of
//! neighbor -> weight. On top of that sit a lazy-deletion binary min-heap and two
//! algorithms: Dijkstra (single-pair shortest path) and Prim (minimum spanning tree).
//! Edge lists come in through [`io::edge_list`], results go out through [`io::dot`].
pub mod dijkstra;
pub mod error;
pub mod gen;
pub mod hash;
pub mod heap;
pub mod io;
pub mod prim;
pub mod store;
pub mod table;

pub use dijkstra::{shortest_path, PathOutcome, SearchStats, ShortestPath};
pub use error::{Error, Result};
pub use heap::MinHeap;
pub use prim::{minimum_spanning_tree, SpanningTree, TreeEdge, TreeOutcome};
pub use store::GraphStore;
pub use table::OpenAddressTable;

pub type Weight = f64;

/// Joins the endpoints in [`edge_label`]; the edge-list reader refuses names containing it.
pub const EDGE_ARROW: &str = "->";

/// Label of the directed edge `from -> to`, as used for path edge weights.
pub fn edge_label(from: &str, to: &str) -> String {
    format!("{from} {EDGE_ARROW} {to}")
}
