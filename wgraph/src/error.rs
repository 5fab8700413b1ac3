use crate::Weight;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("key `{key}` not found")]
    NotFound { key: String },

    #[error("no path exists between `{start}` and `{destination}`")]
    Unreachable { start: String, destination: String },

    #[error("graph is not connected: {reached} of {vertex_count} vertices reachable from `{root}`")]
    Disconnected {
        root: String,
        reached: usize,
        vertex_count: usize,
    },

    #[error("probe sequence for `{key}` exhausted in a table of capacity {capacity}")]
    TableCorruption { key: String, capacity: usize },

    #[error("requested capacity {requested} exceeds the limit of {limit} slots")]
    Capacity { requested: usize, limit: usize },

    #[error("edge `{from}` - `{to}` has invalid weight {weight}; weights must be finite and positive")]
    InvalidWeight { from: String, to: String, weight: Weight },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn not_found(key: impl Into<String>) -> Self {
        Error::NotFound { key: key.into() }
    }

    /// `requested` is `usize::MAX` when computing the size itself overflowed.
    pub(crate) fn capacity(requested: usize) -> Self {
        Error::Capacity { requested, limit: crate::table::MAX_CAPACITY }
    }

    /// Expected end states of an algorithm run, as opposed to lookup or table failures.
    pub fn is_topology(&self) -> bool {
        matches!(self, Error::Unreachable { .. } | Error::Disconnected { .. })
    }
}
