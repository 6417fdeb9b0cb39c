//! Shared road networks for the integration tests

#![allow(dead_code)]

use aco_router::layers::road_network::RoadNetwork;
use petgraph::{algo::dijkstra, graph::DiGraph};
use std::collections::HashMap;

/// `S -> A -> B -> E`, the only route from S to E
pub fn chain() -> RoadNetwork {
    RoadNetwork::from_edges([("S", "A", 2.0), ("A", "B", 3.5), ("B", "E", 1.25)]).unwrap()
}

/// Edges of an `n x n` street grid where traffic only flows east and south.
/// Lengths vary so there is a single cheapest route from corner to corner.
pub fn grid_edges(n: usize) -> Vec<(String, String, f64)> {
    let name = |r: usize, c: usize| format!("{}_{}", r, c);
    let mut edges = vec![];
    for r in 0..n {
        for c in 0..n {
            if c + 1 < n {
                edges.push((name(r, c), name(r, c + 1), 1.0 + ((r * 7 + c * 3) % 5) as f64));
            }
            if r + 1 < n {
                edges.push((name(r, c), name(r + 1, c), 1.0 + ((r * 3 + c * 5) % 4) as f64));
            }
        }
    }
    edges
}

pub fn grid(n: usize) -> RoadNetwork {
    RoadNetwork::from_edges(grid_edges(n)).unwrap()
}

/// Exact shortest distance over the same edge list, for comparison
pub fn shortest_cost(edges: &[(String, String, f64)], from: &str, to: &str) -> Option<f64> {
    let mut graph = DiGraph::<&str, f64>::new();
    let mut index = HashMap::new();
    for (u, v, w) in edges {
        let a = *index.entry(u.as_str()).or_insert_with(|| graph.add_node(u.as_str()));
        let b = *index.entry(v.as_str()).or_insert_with(|| graph.add_node(v.as_str()));
        graph.add_edge(a, b, *w);
    }
    let start = *index.get(from)?;
    let goal = *index.get(to)?;
    dijkstra(&graph, start, Some(goal), |e| *e.weight())
        .get(&goal)
        .copied()
}
