//! In-memory station graph.
//!
//! Stations are keyed by [`StationName`] and stored densely, so the search
//! code works with integer [`StationId`]s and plain vectors. Ids are assigned
//! in name order and every adjacency list is sorted by target id, which makes
//! iteration order (and therefore search tie-breaking) independent of how
//! the input happened to be ordered.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Coordinates, InvalidStationName, InvalidWeight, StationName, Weight};

/// Errors raised while building a graph from raw station records.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    #[error("bad station key: {0}")]
    InvalidStationName(#[source] InvalidStationName),

    #[error("station {station} lists a bad neighbor name: {source}")]
    InvalidNeighborName {
        station: StationName,
        #[source]
        source: InvalidStationName,
    },

    /// Two keys collapse to the same name once trimmed
    #[error("station {0} is defined more than once")]
    DuplicateStation(StationName),

    /// Two neighbor keys of one station collapse to the same name once trimmed
    #[error("station {station} lists neighbor {neighbor} more than once")]
    DuplicateNeighbor {
        station: StationName,
        neighbor: StationName,
    },

    #[error("station {station} lists unknown neighbor {neighbor}")]
    DanglingNeighbor {
        station: StationName,
        neighbor: StationName,
    },

    #[error("edge {from} -> {to} has no weight")]
    MissingWeight { from: StationName, to: StationName },

    #[error("edge {from} -> {to}: {source}")]
    InvalidWeight {
        from: StationName,
        to: StationName,
        #[source]
        source: InvalidWeight,
    },
}

/// Raw station data as it appears in a metro data file.
///
/// Weights are optional here so that a `null` weight surfaces as
/// [`GraphError::MissingWeight`] rather than as a parse failure with no
/// station context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    pub lat: f64,
    pub lng: f64,
    pub line: String,
    #[serde(default)]
    pub neighbors: BTreeMap<String, Option<f64>>,
}

/// A metro data file: `{"stations": {name: record, ...}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub stations: BTreeMap<String, StationRecord>,
}

/// Dense index of a station within one [`StationGraph`].
///
/// Only meaningful for the graph that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationId(pub usize);

/// A directed adjacency entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub to: StationId,
    pub weight: Weight,
}

/// A station and its outgoing edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    name: StationName,
    coordinates: Coordinates,
    line: String,
    edges: Vec<Edge>,
}

impl Station {
    pub fn name(&self) -> &StationName {
        &self.name
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    /// The line (or category) label the station was loaded under.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Outgoing edges, sorted by target id.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }
}

/// One undirected connection, reported once per unordered station pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection<'a> {
    pub a: &'a Station,
    pub b: &'a Station,
    pub weight: Weight,
}

/// A weighted station graph, read-only once built.
///
/// Edges are stored as given. The data is expected to be symmetric (A→B has
/// the same weight as B→A) but the graph does not enforce it.
#[derive(Debug, Clone, Default)]
pub struct StationGraph {
    stations: Vec<Station>,
    index: HashMap<StationName, StationId>,
}

impl StationGraph {
    /// Build and validate a graph from a parsed metro data file.
    ///
    /// Every station key and neighbor name is trimmed. Neighbors must name a
    /// station in the same document, and every weight must be present,
    /// finite and positive; the first violation aborts the build.
    pub fn from_document(doc: GraphDocument) -> Result<Self, GraphError> {
        let mut records: BTreeMap<StationName, StationRecord> = BTreeMap::new();
        for (raw, record) in doc.stations {
            let name = StationName::parse(&raw).map_err(GraphError::InvalidStationName)?;
            if records.contains_key(&name) {
                return Err(GraphError::DuplicateStation(name));
            }
            records.insert(name, record);
        }

        let index: HashMap<StationName, StationId> = records
            .keys()
            .enumerate()
            .map(|(i, name)| (name.clone(), StationId(i)))
            .collect();

        let mut stations = Vec::with_capacity(records.len());
        for (name, record) in records {
            let edges = resolve_edges(&name, &record.neighbors, &index)?;
            stations.push(Station {
                name,
                coordinates: Coordinates::new(record.lat, record.lng),
                line: record.line,
                edges,
            });
        }

        Ok(Self { stations, index })
    }

    /// Number of stations.
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Look up a station id by name. The name is trimmed first.
    pub fn id_of(&self, name: &str) -> Option<StationId> {
        self.index.get(name.trim()).copied()
    }

    /// Look up a station by name. The name is trimmed first.
    pub fn get(&self, name: &str) -> Option<&Station> {
        self.id_of(name).map(|id| &self.stations[id.0])
    }

    /// Returns the station for an id issued by this graph.
    ///
    /// # Panics
    ///
    /// Panics if `id` came from a different, larger graph.
    pub fn station(&self, id: StationId) -> &Station {
        &self.stations[id.0]
    }

    /// All stations, in name order.
    pub fn stations(&self) -> impl Iterator<Item = &Station> {
        self.stations.iter()
    }

    /// Neighbors of a named station with their edge weights.
    pub fn neighbors(&self, name: &str) -> Option<impl Iterator<Item = (&Station, Weight)>> {
        let station = self.get(name)?;
        Some(
            station
                .edges
                .iter()
                .map(|e| (&self.stations[e.to.0], e.weight)),
        )
    }

    /// Weight of the direct edge `from -> to`, if there is one.
    pub fn edge_weight(&self, from: &str, to: &str) -> Option<Weight> {
        let from = self.get(from)?;
        let to = self.id_of(to)?;
        from.edges
            .binary_search_by_key(&to, |e| e.to)
            .ok()
            .map(|i| from.edges[i].weight)
    }

    /// Total weight of a path, or `None` if any station is unknown or any
    /// consecutive pair is not joined by an edge.
    ///
    /// A single-station path weighs zero; an empty one is `None`.
    pub fn path_weight<S: AsRef<str>>(&self, path: &[S]) -> Option<f64> {
        match path {
            [] => None,
            [only] => self.get(only.as_ref()).map(|_| 0.0),
            _ => path.windows(2).try_fold(0.0, |total, pair| {
                let w = self.edge_weight(pair[0].as_ref(), pair[1].as_ref())?;
                Some(total + w.get())
            }),
        }
    }

    /// Every connection once, for drawing the network.
    ///
    /// A pair joined in both directions is reported from the station that
    /// sorts first; a one-directional edge is reported as-is.
    pub fn connections(&self) -> Vec<Connection<'_>> {
        let mut seen: HashSet<(StationId, StationId)> = HashSet::new();
        let mut out = Vec::new();

        for (i, station) in self.stations.iter().enumerate() {
            let from = StationId(i);
            for edge in &station.edges {
                let key = if from < edge.to {
                    (from, edge.to)
                } else {
                    (edge.to, from)
                };
                if seen.insert(key) {
                    out.push(Connection {
                        a: station,
                        b: &self.stations[edge.to.0],
                        weight: edge.weight,
                    });
                }
            }
        }

        out
    }
}

fn resolve_edges(
    station: &StationName,
    neighbors: &BTreeMap<String, Option<f64>>,
    index: &HashMap<StationName, StationId>,
) -> Result<Vec<Edge>, GraphError> {
    let mut edges: Vec<Edge> = Vec::with_capacity(neighbors.len());
    let mut seen: HashSet<StationId> = HashSet::with_capacity(neighbors.len());

    for (raw, weight) in neighbors {
        let neighbor =
            StationName::parse(raw).map_err(|source| GraphError::InvalidNeighborName {
                station: station.clone(),
                source,
            })?;

        let Some(&to) = index.get(&neighbor) else {
            return Err(GraphError::DanglingNeighbor {
                station: station.clone(),
                neighbor,
            });
        };

        if !seen.insert(to) {
            return Err(GraphError::DuplicateNeighbor {
                station: station.clone(),
                neighbor,
            });
        }

        let Some(raw_weight) = *weight else {
            return Err(GraphError::MissingWeight {
                from: station.clone(),
                to: neighbor,
            });
        };

        let is_loop = &neighbor == station;
        let weight = Weight::new(raw_weight).map_err(|source| GraphError::InvalidWeight {
            from: station.clone(),
            to: neighbor,
            source,
        })?;

        // A station is settled before its own edge is relaxed, so a loop can
        // never shorten a route.
        if is_loop {
            debug!(station = %station, "skipping self-loop");
            continue;
        }

        edges.push(Edge { to, weight });
    }

    edges.sort_by_key(|e| e.to);
    Ok(edges)
}

/// Builder for assembling a graph in code.
///
/// Each [`edge`](GraphBuilder::edge) call records the connection in both
/// directions with the same weight. Stations referenced only by an edge are
/// created with zero coordinates and an empty line label.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    doc: GraphDocument,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace the metadata of) a station.
    pub fn station(mut self, name: &str, coordinates: Coordinates, line: &str) -> Self {
        let record = self.record(name);
        record.lat = coordinates.lat;
        record.lng = coordinates.lng;
        record.line = line.to_string();
        self
    }

    /// Add an undirected edge. Re-adding a pair overwrites its weight.
    pub fn edge(mut self, a: &str, b: &str, weight: f64) -> Self {
        self.record(a).neighbors.insert(b.to_string(), Some(weight));
        self.record(b).neighbors.insert(a.to_string(), Some(weight));
        self
    }

    fn record(&mut self, name: &str) -> &mut StationRecord {
        self.doc
            .stations
            .entry(name.to_string())
            .or_insert_with(|| StationRecord {
                lat: 0.0,
                lng: 0.0,
                line: String::new(),
                neighbors: BTreeMap::new(),
            })
    }

    /// Validate and build the graph.
    pub fn build(self) -> Result<StationGraph, GraphError> {
        StationGraph::from_document(self.doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> StationGraph {
        GraphBuilder::new()
            .edge("A", "B", 1.0)
            .edge("B", "C", 2.0)
            .edge("A", "C", 5.0)
            .build()
            .unwrap()
    }

    fn record(neighbors: &[(&str, Option<f64>)]) -> StationRecord {
        StationRecord {
            lat: 28.6,
            lng: 77.2,
            line: "Blue".to_string(),
            neighbors: neighbors
                .iter()
                .map(|(n, w)| (n.to_string(), *w))
                .collect(),
        }
    }

    fn doc(stations: Vec<(&str, StationRecord)>) -> GraphDocument {
        GraphDocument {
            stations: stations
                .into_iter()
                .map(|(n, r)| (n.to_string(), r))
                .collect(),
        }
    }

    #[test]
    fn builder_creates_symmetric_edges() {
        let g = triangle();
        assert_eq!(g.len(), 3);
        assert_eq!(g.edge_weight("A", "B").map(Weight::get), Some(1.0));
        assert_eq!(g.edge_weight("B", "A").map(Weight::get), Some(1.0));
        assert_eq!(g.edge_weight("C", "A").map(Weight::get), Some(5.0));
    }

    #[test]
    fn ids_follow_name_order() {
        let g = GraphBuilder::new()
            .edge("Zeta", "Alpha", 1.0)
            .edge("Mu", "Alpha", 1.0)
            .build()
            .unwrap();

        let names: Vec<&str> = g.stations().map(|s| s.name().as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Mu", "Zeta"]);
        assert_eq!(g.id_of("Alpha"), Some(StationId(0)));
        assert_eq!(g.id_of("Zeta"), Some(StationId(2)));
    }

    #[test]
    fn lookups_trim_but_respect_case() {
        let g = triangle();
        assert!(g.get("  A ").is_some());
        assert!(g.get("a").is_none());
        assert!(g.get("D").is_none());
    }

    #[test]
    fn keys_and_neighbors_are_trimmed() {
        let g = StationGraph::from_document(doc(vec![
            (" Dwarka ", record(&[("Dwarka Mor  ", Some(1.2))])),
            ("Dwarka Mor", record(&[(" Dwarka", Some(1.2))])),
        ]))
        .unwrap();

        assert_eq!(g.edge_weight("Dwarka", "Dwarka Mor").map(Weight::get), Some(1.2));
        assert_eq!(g.edge_weight("Dwarka Mor", "Dwarka").map(Weight::get), Some(1.2));
    }

    #[test]
    fn metadata_is_kept() {
        let g = StationGraph::from_document(doc(vec![("Rajiv Chowk", record(&[]))])).unwrap();
        let s = g.get("Rajiv Chowk").unwrap();
        assert_eq!(s.line(), "Blue");
        assert_eq!(s.coordinates(), Coordinates::new(28.6, 77.2));
        assert!(s.edges().is_empty());
    }

    #[test]
    fn reject_duplicate_after_trim() {
        let err = StationGraph::from_document(doc(vec![
            ("Dwarka", record(&[])),
            ("Dwarka ", record(&[])),
        ]))
        .unwrap_err();
        assert!(matches!(err, GraphError::DuplicateStation(n) if n.as_str() == "Dwarka"));
    }

    #[test]
    fn reject_duplicate_neighbor_after_trim() {
        let err = StationGraph::from_document(doc(vec![
            ("A", record(&[("B", Some(1.0)), ("B ", Some(1.0))])),
            ("B", record(&[])),
        ]))
        .unwrap_err();
        assert!(matches!(err, GraphError::DuplicateNeighbor { .. }));
    }

    #[test]
    fn reject_blank_key() {
        let err = StationGraph::from_document(doc(vec![("  ", record(&[]))])).unwrap_err();
        assert!(matches!(err, GraphError::InvalidStationName(_)));
    }

    #[test]
    fn reject_dangling_neighbor() {
        let err = StationGraph::from_document(doc(vec![("A", record(&[("Nowhere", Some(1.0))]))]))
            .unwrap_err();
        assert_eq!(err.to_string(), "station A lists unknown neighbor Nowhere");
    }

    #[test]
    fn self_loop_is_dropped() {
        let g = StationGraph::from_document(doc(vec![
            ("A", record(&[("A", Some(1.0)), ("B", Some(2.0))])),
            ("B", record(&[("A", Some(2.0))])),
        ]))
        .unwrap();

        assert_eq!(g.edge_weight("A", "A"), None);
        assert_eq!(g.edge_weight("A", "B").map(Weight::get), Some(2.0));
        assert_eq!(g.get("A").unwrap().edges().len(), 1);
        assert_eq!(g.connections().len(), 1);

        let route = crate::graph::shortest_path(&g, "A", "B").unwrap();
        assert_eq!(route.total, 2.0);
        assert_eq!(route.hops(), 1);
        let route = crate::graph::shortest_path(&g, "A", "A").unwrap();
        assert_eq!(route.stations.len(), 1);
    }

    #[test]
    fn self_loop_weight_is_still_validated() {
        let err = StationGraph::from_document(doc(vec![("A", record(&[("A", Some(-1.0))]))]))
            .unwrap_err();
        assert!(matches!(err, GraphError::InvalidWeight { .. }));
    }

    #[test]
    fn reject_missing_weight() {
        let err = StationGraph::from_document(doc(vec![
            ("A", record(&[("B", None)])),
            ("B", record(&[])),
        ]))
        .unwrap_err();
        assert_eq!(err.to_string(), "edge A -> B has no weight");
    }

    #[test]
    fn reject_non_positive_weights() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = GraphBuilder::new().edge("A", "B", bad).build();
            assert!(
                matches!(result, Err(GraphError::InvalidWeight { .. })),
                "weight {bad} should be rejected"
            );
        }
    }

    #[test]
    fn asymmetric_edges_are_kept_as_given() {
        let g = StationGraph::from_document(doc(vec![
            ("A", record(&[("B", Some(1.0))])),
            ("B", record(&[("A", Some(3.0))])),
            ("C", record(&[("A", Some(2.0))])),
        ]))
        .unwrap();

        assert_eq!(g.edge_weight("A", "B").map(Weight::get), Some(1.0));
        assert_eq!(g.edge_weight("B", "A").map(Weight::get), Some(3.0));
        assert!(g.edge_weight("A", "C").is_none());
    }

    #[test]
    fn neighbors_in_id_order() {
        let g = GraphBuilder::new()
            .edge("Hub", "Zed", 1.0)
            .edge("Hub", "Ant", 2.0)
            .edge("Hub", "Mid", 3.0)
            .build()
            .unwrap();

        let names: Vec<&str> = g
            .neighbors("Hub")
            .unwrap()
            .map(|(s, _)| s.name().as_str())
            .collect();
        assert_eq!(names, vec!["Ant", "Mid", "Zed"]);
        assert!(g.neighbors("Nope").is_none());
    }

    #[test]
    fn path_weight_sums_edges() {
        let g = triangle();
        assert_eq!(g.path_weight(&["A", "B", "C"]), Some(3.0));
        assert_eq!(g.path_weight(&["A", "C"]), Some(5.0));
        assert_eq!(g.path_weight(&["B"]), Some(0.0));
    }

    #[test]
    fn path_weight_rejects_broken_paths() {
        let g = GraphBuilder::new()
            .edge("A", "B", 1.0)
            .edge("C", "D", 1.0)
            .build()
            .unwrap();
        assert_eq!(g.path_weight(&["A", "C"]), None);
        assert_eq!(g.path_weight(&["A", "X"]), None);
        assert_eq!(g.path_weight::<&str>(&[]), None);
        assert_eq!(g.path_weight(&["X"]), None);
    }

    #[test]
    fn connections_reported_once() {
        let g = triangle();
        let conns = g.connections();
        assert_eq!(conns.len(), 3);

        let mut pairs: Vec<(String, String, f64)> = conns
            .iter()
            .map(|c| {
                (
                    c.a.name().to_string(),
                    c.b.name().to_string(),
                    c.weight.get(),
                )
            })
            .collect();
        pairs.sort_by(|x, y| x.0.cmp(&y.0).then(x.1.cmp(&y.1)));

        assert_eq!(
            pairs,
            vec![
                ("A".to_string(), "B".to_string(), 1.0),
                ("A".to_string(), "C".to_string(), 5.0),
                ("B".to_string(), "C".to_string(), 2.0),
            ]
        );
    }

    #[test]
    fn empty_graph() {
        let g = StationGraph::from_document(GraphDocument::default()).unwrap();
        assert!(g.is_empty());
        assert!(g.connections().is_empty());
    }

    #[test]
    fn parse_metro_data_json() {
        let json = r#"{
            "stations": {
                "Dwarka Sector 21": {
                    "lat": 28.5523, "lng": 77.0584, "line": "Blue",
                    "neighbors": {"Dwarka Sector 8": 1.06}
                },
                "Dwarka Sector 8": {
                    "lat": 28.5656, "lng": 77.0670, "line": "Blue",
                    "neighbors": {"Dwarka Sector 21": 1.06}
                }
            }
        }"#;
        let doc: GraphDocument = serde_json::from_str(json).unwrap();
        let g = StationGraph::from_document(doc).unwrap();
        assert_eq!(g.len(), 2);
        assert_eq!(
            g.edge_weight("Dwarka Sector 8", "Dwarka Sector 21").map(Weight::get),
            Some(1.06)
        );
    }
}
