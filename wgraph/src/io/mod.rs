//! Text formats around the core: comma separated edge lists in, Graphviz dot out.
pub mod dot;
pub mod edge_list;

pub use dot::{DotStyle, DotWriter};
pub use edge_list::{EdgeLine, EdgeListReader};
