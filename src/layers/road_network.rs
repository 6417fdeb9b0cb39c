use petgraph::{
    graph::{EdgeIndex, NodeIndex},
    visit::EdgeRef,
    Directed, Graph,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::error::Error;

/// Lengths at or below zero are raised to this value before they are inverted
/// by the route heuristic.
pub const MIN_EDGE_LENGTH: f64 = 1e-6;

// Layer 1 - Directed graph of the street network that routes are searched on.
// Immutable once handed to an optimizer.
#[derive(Serialize, Deserialize, Clone, Default)]
pub struct RoadNetwork {
    graph: Graph<Node, Link, Directed>,
    /// Maps external node ids to graph indices
    node_map: HashMap<String, NodeIndex>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Node {
    pub id: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Link {
    /// Physical length or traversal cost, as given by the loader
    pub length: f64,
}

impl Link {
    /// Length used by the route heuristic, never below `MIN_EDGE_LENGTH`
    pub fn clamped_length(&self) -> f64 {
        self.length.max(MIN_EDGE_LENGTH)
    }
}

impl RoadNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn print_stats(&self) {
        log::info!("Road network:");
        log::info!("  Nodes: {}", self.graph.node_count());
        log::info!("  Edges: {}", self.graph.edge_count());
    }

    /// Build a network from `(from, to, length)` triples
    pub fn from_edges<I, S>(edges: I) -> Result<RoadNetwork, Error>
    where
        I: IntoIterator<Item = (S, S, f64)>,
        S: AsRef<str>,
    {
        let mut network = RoadNetwork::new();
        for (from, to, length) in edges {
            network.add_edge(from.as_ref(), to.as_ref(), length)?;
        }
        Ok(network)
    }

    /// Add a node, returning the existing index if the id is already known
    pub fn add_node(&mut self, id: &str) -> NodeIndex {
        if let Some(&index) = self.node_map.get(id) {
            return index;
        }
        let index = self.graph.add_node(Node { id: id.to_string() });
        self.node_map.insert(id.to_string(), index);
        index
    }

    /// Add a directed edge. Missing endpoints are created.
    ///
    /// # Errors
    /// - `DuplicateEdge` if the ordered pair already has an edge
    /// - `InvalidLength` if `length` is NaN or infinite
    pub fn add_edge(&mut self, from: &str, to: &str, length: f64) -> Result<EdgeIndex, Error> {
        if !length.is_finite() {
            return Err(Error::InvalidLength {
                from: from.to_string(),
                to: to.to_string(),
                length,
            });
        }
        let u = self.add_node(from);
        let v = self.add_node(to);
        if self.graph.find_edge(u, v).is_some() {
            return Err(Error::DuplicateEdge {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        Ok(self.graph.add_edge(u, v, Link { length }))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node_map.contains_key(id)
    }

    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    pub fn node_id(&self, index: NodeIndex) -> &str {
        &self.graph[index].id
    }

    /// Ids of all nodes reachable over one outgoing edge. Empty for unknown ids.
    pub fn successors(&self, id: &str) -> Vec<&str> {
        match self.index_of(id) {
            Some(index) => self
                .neighbors(index)
                .map(|(next, _)| self.node_id(next))
                .collect(),
            None => vec![],
        }
    }

    /// Outgoing `(target, edge)` pairs of a node
    pub fn neighbors(&self, index: NodeIndex) -> impl Iterator<Item = (NodeIndex, EdgeIndex)> + '_ {
        self.graph.edges(index).map(|e| (e.target(), e.id()))
    }

    pub fn edge_between(&self, from: NodeIndex, to: NodeIndex) -> Option<EdgeIndex> {
        self.graph.find_edge(from, to)
    }

    pub fn link(&self, edge: EdgeIndex) -> &Link {
        &self.graph[edge]
    }

    /// Length of the edge `from -> to`
    pub fn weight(&self, from: &str, to: &str) -> Result<f64, Error> {
        match (self.index_of(from), self.index_of(to)) {
            (Some(u), Some(v)) => self.edge_weight(u, v),
            _ => Err(Error::EdgeNotFound {
                from: from.to_string(),
                to: to.to_string(),
            }),
        }
    }

    pub fn edge_weight(&self, from: NodeIndex, to: NodeIndex) -> Result<f64, Error> {
        self.edge_between(from, to)
            .map(|edge| self.graph[edge].length)
            .ok_or_else(|| Error::EdgeNotFound {
                from: self.node_id(from).to_string(),
                to: self.node_id(to).to_string(),
            })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn edge_indices(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edge_indices()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> RoadNetwork {
        RoadNetwork::from_edges([("a", "b", 1.0), ("b", "c", 2.0), ("a", "c", 5.0)]).unwrap()
    }

    #[test]
    fn successors_follow_edge_direction() {
        let network = triangle();
        let mut next = network.successors("a");
        next.sort();
        assert_eq!(next, vec!["b", "c"]);
        assert!(network.successors("c").is_empty());
        assert!(network.successors("missing").is_empty());
    }

    #[test]
    fn weight_of_missing_edge_is_an_error() {
        let network = triangle();
        assert_eq!(network.weight("b", "c").unwrap(), 2.0);
        assert!(matches!(
            network.weight("c", "a"),
            Err(Error::EdgeNotFound { .. })
        ));
        assert!(matches!(
            network.weight("a", "zzz"),
            Err(Error::EdgeNotFound { .. })
        ));
    }

    #[test]
    fn duplicate_edges_are_rejected() {
        let mut network = triangle();
        assert!(matches!(
            network.add_edge("a", "b", 3.0),
            Err(Error::DuplicateEdge { .. })
        ));
        // reverse direction is a different edge
        assert!(network.add_edge("b", "a", 3.0).is_ok());
        assert_eq!(network.edge_count(), 4);
    }

    #[test]
    fn non_finite_lengths_are_rejected() {
        let mut network = RoadNetwork::new();
        assert!(matches!(
            network.add_edge("a", "b", f64::NAN),
            Err(Error::InvalidLength { .. })
        ));
        assert!(matches!(
            network.add_edge("a", "b", f64::INFINITY),
            Err(Error::InvalidLength { .. })
        ));
    }

    #[test]
    fn degenerate_lengths_are_clamped() {
        let network = RoadNetwork::from_edges([("a", "b", 0.0), ("b", "c", -4.0)]).unwrap();
        for edge in network.edge_indices() {
            assert_eq!(network.link(edge).clamped_length(), MIN_EDGE_LENGTH);
        }
        // the stored length is left untouched
        assert_eq!(network.weight("b", "c").unwrap(), -4.0);
    }

    #[test]
    fn add_node_is_idempotent() {
        let mut network = RoadNetwork::new();
        let a = network.add_node("a");
        assert_eq!(network.add_node("a"), a);
        assert_eq!(network.node_count(), 1);
        assert!(network.contains("a"));
        assert_eq!(network.node_id(a), "a");
    }
}
