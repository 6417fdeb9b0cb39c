use petgraph::graph::{EdgeIndex, NodeIndex};
use rand::{seq::SliceRandom, Rng};

use crate::layers::{error::Error, road_network::RoadNetwork};

use super::{aco::Route, construct::Path, eval::path_cost};

// Reference routers to compare the colony against. Both walk forward without
// revisiting nodes and give up at a dead end.

/// Always take the shortest outgoing edge to an unvisited node
pub fn greedy_route(network: &RoadNetwork, start: &str, end: &str) -> Result<Option<Route>, Error> {
    walk(network, start, end, |choices| {
        choices
            .iter()
            .min_by(|a, b| {
                let la = network.link(a.1).clamped_length();
                let lb = network.link(b.1).clamped_length();
                la.total_cmp(&lb)
            })
            .copied()
    })
}

/// Take a uniformly random unvisited successor at every step
pub fn random_route<R: Rng + ?Sized>(
    network: &RoadNetwork,
    start: &str,
    end: &str,
    rng: &mut R,
) -> Result<Option<Route>, Error> {
    walk(network, start, end, |choices| choices.choose(rng).copied())
}

fn walk<F>(network: &RoadNetwork, start: &str, end: &str, mut pick: F) -> Result<Option<Route>, Error>
where
    F: FnMut(&[(NodeIndex, EdgeIndex)]) -> Option<(NodeIndex, EdgeIndex)>,
{
    let start_index = network
        .index_of(start)
        .ok_or_else(|| Error::InvalidEndpoint(start.to_string()))?;
    let end_index = network
        .index_of(end)
        .ok_or_else(|| Error::InvalidEndpoint(end.to_string()))?;

    let mut visited = vec![false; network.node_count()];
    visited[start_index.index()] = true;
    let mut path = Path::start(start_index);
    let mut choices = Vec::new();
    while path.last() != end_index {
        choices.clear();
        choices.extend(
            network
                .neighbors(path.last())
                .filter(|(next, _)| !visited[next.index()]),
        );
        match pick(&choices) {
            Some((next, edge)) => {
                visited[next.index()] = true;
                path.push(next, edge);
            }
            None => return Ok(None),
        }
    }
    let cost = path_cost(&path, network)?;
    Ok(Some(Route {
        nodes: path.to_ids(network),
        cost,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn greedy_takes_cheapest_first_edge() {
        // greedy is short-sighted: s-a looks cheap but a-e is long
        let network = RoadNetwork::from_edges([
            ("s", "a", 1.0),
            ("a", "e", 10.0),
            ("s", "b", 2.0),
            ("b", "e", 2.0),
        ])
        .unwrap();
        let route = greedy_route(&network, "s", "e").unwrap().unwrap();
        assert_eq!(route.nodes, ["s", "a", "e"]);
        assert_eq!(route.cost, 11.0);
    }

    #[test]
    fn greedy_does_not_loop_on_cycles() {
        let mut network =
            RoadNetwork::from_edges([("s", "a", 1.0), ("a", "s", 1.0), ("a", "b", 5.0)]).unwrap();
        network.add_node("e");
        assert!(greedy_route(&network, "s", "e").unwrap().is_none());
    }

    #[test]
    fn random_reaches_end_on_chain() {
        let network =
            RoadNetwork::from_edges([("s", "a", 1.0), ("a", "b", 1.0), ("b", "e", 1.0)]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let route = random_route(&network, "s", "e", &mut rng).unwrap().unwrap();
        assert_eq!(route.nodes, ["s", "a", "b", "e"]);
        assert_eq!(route.cost, 3.0);
    }

    #[test]
    fn baselines_validate_endpoints() {
        let network = RoadNetwork::from_edges([("s", "e", 1.0)]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            greedy_route(&network, "s", "nowhere"),
            Err(Error::InvalidEndpoint(_))
        ));
        assert!(matches!(
            random_route(&network, "nowhere", "e", &mut rng),
            Err(Error::InvalidEndpoint(_))
        ));
        let route = greedy_route(&network, "s", "s").unwrap().unwrap();
        assert_eq!(route.nodes, ["s"]);
        assert_eq!(route.cost, 0.0);
    }
}
