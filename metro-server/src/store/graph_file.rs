//! Metro graph files.

use std::path::Path;

use tracing::info;

use super::error::StoreError;
use crate::graph::{GraphDocument, StationGraph};

/// Read and validate a metro data file.
///
/// The file holds `{"stations": {name: {lat, lng, line, neighbors}}}`.
pub async fn load_graph(path: impl AsRef<Path>) -> Result<StationGraph, StoreError> {
    let path = path.as_ref();
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let graph = parse_graph(path, &json)?;
    info!(
        path = %path.display(),
        stations = graph.len(),
        connections = graph.connections().len(),
        "loaded station graph"
    );
    Ok(graph)
}

/// Parse and validate metro data already in memory. `path` is only used to
/// label errors.
pub fn parse_graph(path: &Path, json: &str) -> Result<StationGraph, StoreError> {
    let doc: GraphDocument = serde_json::from_str(json).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    StationGraph::from_document(doc).map_err(|source| StoreError::Graph {
        path: path.to_path_buf(),
        source,
    })
}
