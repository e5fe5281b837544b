//! Snapshot loading errors.

use std::path::PathBuf;

use crate::graph::GraphError;

/// Errors that can occur while loading graph or trip snapshots.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading the file failed
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON of the expected shape
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The graph data parsed but is inconsistent
    #[error("invalid graph in {path}: {source}")]
    Graph {
        path: PathBuf,
        #[source]
        source: GraphError,
    },

    /// Two trips share an id
    #[error("duplicate trip id {id} in {path}")]
    DuplicateTrip { path: PathBuf, id: String },
}
