//! # Edge lists
//!
//! One undirected edge per line, `VERTEX1, VERTEX2, WEIGHT`. The first separator ends
//! the first vertex name and the last one starts the weight, so the second name may
//! itself contain separators. Names are trimmed and may contain spaces. Blank lines
//! and lines starting with the comment prefix are skipped; CRLF endings are accepted.
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::error::{Error, Result};
use crate::store::GraphStore;
use crate::{Weight, EDGE_ARROW};

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeLine {
    /// 1-based line number in the input
    pub line: usize,
    pub from: String,
    pub to: String,
    pub weight: Weight,
}

#[derive(Debug, Clone)]
pub struct EdgeListReader {
    separator: char,
    comment_prefix: Option<String>,
    /// Expected number of distinct vertices, used to presize the store
    vertex_hint: usize,
}

impl Default for EdgeListReader {
    fn default() -> Self {
        Self { separator: ',', comment_prefix: Some("#".to_string()), vertex_hint: 0 }
    }
}

impl EdgeListReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// `None` disables comment handling.
    pub fn comment_prefix<S: Into<String>>(mut self, prefix: Option<S>) -> Self {
        self.comment_prefix = prefix.map(Into::into);
        self
    }

    pub fn vertex_hint(mut self, vertices: usize) -> Self {
        self.vertex_hint = vertices;
        self
    }

    /// Parses one line; `Ok(None)` for blank and comment lines.
    pub fn parse_line(&self, line: usize, text: &str) -> Result<Option<EdgeLine>> {
        let text = text.trim_end_matches(['\r', '\n']);
        let trimmed = text.trim_start();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if let Some(prefix) = &self.comment_prefix {
            if !prefix.is_empty() && trimmed.starts_with(prefix.as_str()) {
                return Ok(None);
            }
        }
        let fail = |message: String| Error::Parse { line, message };
        let sep = self.separator;

        let (first, rest) = text
            .split_once(sep)
            .ok_or_else(|| fail(format!("no `{sep}` separating the first vertex from the second")))?;
        let (second, weight) = rest
            .rsplit_once(sep)
            .ok_or_else(|| fail(format!("no `{sep}` separating the second vertex from the weight")))?;
        let (from, to) = (first.trim(), second.trim());
        if from.is_empty() {
            return Err(fail("first vertex name is empty".to_string()));
        }
        if to.is_empty() {
            return Err(fail("second vertex name is empty".to_string()));
        }
        // `->` joins the endpoints of path edge labels
        if let Some(name) = [from, to].into_iter().find(|n| n.contains(EDGE_ARROW)) {
            return Err(fail(format!("vertex name `{name}` contains `{EDGE_ARROW}`")));
        }
        let weight_text = weight.trim();
        let weight: Weight = weight_text
            .parse()
            .map_err(|_| fail(format!("weight `{weight_text}` is not a number")))?;
        if !(weight.is_finite() && weight > 0.0) {
            return Err(fail(format!("weight `{weight_text}` must be a positive finite number")));
        }
        Ok(Some(EdgeLine { line, from: from.to_string(), to: to.to_string(), weight }))
    }

    /// Parsed edges of `reader`, one item per non-skipped line.
    pub fn edges<'a, R: BufRead + 'a>(&'a self, reader: R) -> impl Iterator<Item = Result<EdgeLine>> + 'a {
        reader.lines().enumerate().filter_map(move |(i, line)| match line {
            Ok(text) => self.parse_line(i + 1, &text).transpose(),
            Err(e) => Some(Err(e.into())),
        })
    }

    /// Builds a store from every edge in `reader`; the first bad line aborts.
    pub fn read<R: BufRead>(&self, reader: R) -> Result<GraphStore> {
        let mut g = GraphStore::with_capacity(self.vertex_hint)?;
        let mut lines = 0usize;
        for edge in self.edges(reader) {
            let e = edge?;
            g.add_edge(&e.from, &e.to, e.weight)?;
            lines += 1;
        }
        tracing::debug!(lines, vertices = g.vertex_count(), edges = g.edge_count(), "read edge list");
        Ok(g)
    }

    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<GraphStore> {
        self.read(BufReader::new(File::open(path)?))
    }

    pub fn read_str(&self, input: &str) -> Result<GraphStore> {
        self.read(input.as_bytes())
    }
}
