//! # Graphviz output
//!
//! Writes a [`GraphStore`] as a `strict graph` document, optionally with a shortest
//! path or spanning tree drawn on top. A path overlay turns the document into a
//! `strict digraph`: path edges point along the path and every other edge is drawn
//! without an arrowhead.
use std::io::Write;

use crate::dijkstra::ShortestPath;
use crate::prim::SpanningTree;
use crate::store::GraphStore;
use crate::Weight;

/// Colors and fonts of the generated document.
#[derive(Clone, Debug)]
pub struct DotStyle {
    pub graph_font: String,
    pub node_font: String,
    pub edge_font: String,
    pub background: String,
    pub node_border: String,
    pub node_fill: String,
    pub edge_color: String,
    /// Path and tree edges
    pub highlight_edge: String,
    pub path_node_font: String,
    pub path_node_fill: String,
    pub path_label: String,
    pub tree_label: String,
}

impl Default for DotStyle {
    fn default() -> Self {
        Self {
            graph_font: "DejaVu Sans,Arial,sans-serif".into(),
            node_font: "Impact,Arial,sans-serif".into(),
            edge_font: "Comic Sans,Arial,sans-serif".into(),
            background: "gainsboro".into(),
            node_border: "darkgreen".into(),
            node_fill: "darkolivegreen2".into(),
            edge_color: "darkgoldenrod2".into(),
            highlight_edge: "darkcyan".into(),
            path_node_font: "darkorange1".into(),
            path_node_fill: "darkslategrey".into(),
            path_label: "darkmagenta".into(),
            tree_label: "firebrick".into(),
        }
    }
}

/// What to draw on top of the plain graph.
enum Overlay<'a> {
    None,
    Path(&'a ShortestPath),
    Tree(&'a SpanningTree),
}

impl Overlay<'_> {
    fn directed(&self) -> bool {
        matches!(self, Overlay::Path(_))
    }

    fn on_path(&self, vertex: &str) -> bool {
        match self {
            Overlay::Path(p) => p.path.iter().any(|v| v == vertex),
            _ => false,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct DotWriter {
    style: DotStyle,
}

impl DotWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(style: DotStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &DotStyle {
        &self.style
    }

    pub fn write_graph<W: Write>(&self, w: &mut W, g: &GraphStore, title: &str) -> std::io::Result<()> {
        self.write_document(w, g, title, Overlay::None)
    }

    pub fn write_shortest_path<W: Write>(&self, w: &mut W, g: &GraphStore, path: &ShortestPath) -> std::io::Result<()> {
        let title = format!("Shortest Path FROM {} TO {}", path.source(), path.destination());
        self.write_document(w, g, &title, Overlay::Path(path))
    }

    pub fn write_spanning_tree<W: Write>(&self, w: &mut W, g: &GraphStore, tree: &SpanningTree) -> std::io::Result<()> {
        self.write_document(w, g, "Minimum Spanning Tree", Overlay::Tree(tree))
    }

    fn write_document<W: Write>(&self, w: &mut W, g: &GraphStore, title: &str, overlay: Overlay<'_>) -> std::io::Result<()> {
        let s = &self.style;
        let kind = if overlay.directed() { "digraph" } else { "graph" };
        writeln!(w, "strict {kind} main_graph {{")?;
        writeln!(w, "fontname=\"{}\"", s.graph_font)?;
        writeln!(w, "node [fontname=\"{}\"]", s.node_font)?;
        writeln!(w, "edge [fontname=\"{}\"]", s.edge_font)?;
        writeln!(w, "node [style=filled fillcolor=\"cyan\"]")?;
        writeln!(w, "ratio=auto landscape=false bgcolor=\"{}\"", s.background)?;
        writeln!(
            w,
            "subgraph cluster {{\"Full Graph\" [shape=box fontsize=14 label=\"{}\" tooltip=\"All Nodes\"] }}",
            escape(title)
        )?;

        for v in g.vertices() {
            let label = escape(v);
            let extra = if overlay.on_path(v) {
                format!(" fontcolor=\"{}\" fillcolor=\"{}\"", s.path_node_font, s.path_node_fill)
            } else {
                format!(" fillcolor=\"{}\"", s.node_fill)
            };
            writeln!(
                w,
                "{id} [label=\"{label}\" id=\"{id_text}\" fontsize=12 shape=box3d tooltip=\"{label}\" color=\"{border}\"{extra}]",
                id = dot_id(v),
                id_text = escape(&underscored(v)),
                border = s.node_border,
            )?;
        }

        for (a, b, weight) in g.edges() {
            self.write_edge(w, a, b, weight, &overlay)?;
        }
        writeln!(w, "}}")
    }

    fn write_edge<W: Write>(&self, w: &mut W, a: &str, b: &str, weight: Weight, overlay: &Overlay<'_>) -> std::io::Result<()> {
        let s = &self.style;
        let (from, to, extra) = match overlay {
            Overlay::None => (a, b, format!("color=\"{}\"", s.edge_color)),
            Overlay::Path(p) => match p.legs().find(|&(x, y, _)| (x, y) == (a, b) || (x, y) == (b, a)) {
                Some((x, y, _)) => (x, y, format!("color=\"{}\" fontcolor=\"{}\"", s.highlight_edge, s.path_label)),
                None => (a, b, format!("color=\"{}\" arrowsize=0", s.edge_color)),
            },
            Overlay::Tree(t) if t.contains_edge(a, b) => {
                (a, b, format!("color=\"{}\" fontcolor=\"{}\"", s.highlight_edge, s.tree_label))
            }
            Overlay::Tree(_) => (a, b, format!("color=\"{}\"", s.edge_color)),
        };
        let op = if overlay.directed() { "->" } else { "--" };
        let tip = escape(&format!("{from} {op} {to}"));
        writeln!(
            w,
            "{} {op} {} [label=\"{weight}\" weight=60 penwidth=3 {extra} tooltip=\"{tip}\" labeltooltip=\"{tip}\"]",
            dot_id(from),
            dot_id(to),
        )
    }
}

fn underscored(name: &str) -> String {
    name.chars().map(|c| if c.is_whitespace() { '_' } else { c }).collect()
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Quoted node id for a vertex name; whitespace becomes `_`.
pub fn dot_id(name: &str) -> String {
    format!("\"{}\"", escape(&underscored(name)))
}
