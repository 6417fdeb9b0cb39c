use petgraph::graph::{EdgeIndex, NodeIndex};
use rand::{distributions::WeightedIndex, prelude::Distribution, Rng};

use crate::layers::road_network::RoadNetwork;

use super::pheromone::PheromoneTable;

/// Simple path through the network, stored as the visited nodes and the
/// edges between them (`edges.len() == nodes.len() - 1`).
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    nodes: Vec<NodeIndex>,
    edges: Vec<EdgeIndex>,
}

impl Path {
    pub fn start(node: NodeIndex) -> Path {
        Path {
            nodes: vec![node],
            edges: vec![],
        }
    }

    pub fn push(&mut self, node: NodeIndex, edge: EdgeIndex) {
        self.nodes.push(node);
        self.edges.push(edge);
    }

    pub fn first(&self) -> NodeIndex {
        self.nodes[0]
    }

    pub fn last(&self) -> NodeIndex {
        self.nodes[self.nodes.len() - 1]
    }

    pub fn nodes(&self) -> &[NodeIndex] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeIndex] {
        &self.edges
    }

    pub fn hops(&self) -> usize {
        self.edges.len()
    }

    /// External ids of the nodes along the path
    pub fn to_ids(&self, network: &RoadNetwork) -> Vec<String> {
        self.nodes
            .iter()
            .map(|&n| network.node_id(n).to_string())
            .collect()
    }
}

/// A path that reached the destination, with its cost
#[derive(Clone, Debug)]
pub struct AntResult {
    pub path: Path,
    pub cost: f64,
}

/// Build one path from `start` to `end` by a random walk over unvisited
/// successors. Each step picks `next` with probability proportional to
/// `pheromone(edge)^alpha * (1 / length(edge))^beta`.
///
/// Returns `None` when the walk reaches a node with no selectable successor.
/// The walk never revisits a node so it ends after at most `node_count` steps.
/// `rng` is not touched when `start == end`.
pub fn construct<R: Rng + ?Sized>(
    network: &RoadNetwork,
    pheromone: &PheromoneTable,
    start: NodeIndex,
    end: NodeIndex,
    alpha: f64,
    beta: f64,
    rng: &mut R,
) -> Option<Path> {
    let mut path = Path::start(start);
    if start == end {
        return Some(path);
    }

    let mut visited = vec![false; network.node_count()];
    visited[start.index()] = true;
    let mut choices = Vec::new();
    let mut weights = Vec::new();
    let mut current = start;
    while current != end {
        choices.clear();
        weights.clear();
        for (next, edge) in network.neighbors(current) {
            if visited[next.index()] {
                continue;
            }
            let heuristic = 1.0 / network.link(edge).clamped_length();
            choices.push((next, edge));
            weights.push(pheromone.level(edge).powf(alpha) * heuristic.powf(beta));
        }

        if !normalize_weights(&mut weights) {
            log::trace!(
                "Dead end at {} after {} steps",
                network.node_id(current),
                path.hops()
            );
            return None;
        }
        let (next, edge) = match WeightedIndex::new(&weights) {
            Ok(dist) => choices[dist.sample(rng)],
            Err(e) => {
                log::trace!("Cannot sample from {}: {}", network.node_id(current), e);
                return None;
            }
        };
        visited[next.index()] = true;
        path.push(next, edge);
        current = next;
    }
    Some(path)
}

/// Makes the weights safe to sample from. Returns false when their sum is
/// zero, i.e. there is nothing to choose.
///
/// When the sum overflows, weights are rescaled relative to the largest one
/// in log space. Finite weights keep their ratios, but every weight that
/// itself overflowed to infinity ends up with the same value, so whatever
/// separated those edges is lost.
fn normalize_weights(weights: &mut [f64]) -> bool {
    let total: f64 = weights.iter().sum();
    if total == 0.0 || total.is_nan() {
        return false;
    }
    if total.is_finite() {
        return true;
    }
    // ln(inf) = inf, so saturated entries collapse onto the maximum
    let logs: Vec<f64> = weights
        .iter()
        .map(|w| if w.is_finite() { w.ln() } else { f64::MAX.ln() })
        .collect();
    let max = logs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    for (w, l) in weights.iter_mut().zip(logs) {
        *w = (l - max).exp();
    }
    true
}
