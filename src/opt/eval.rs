use crate::layers::{error::Error, road_network::RoadNetwork};

use super::construct::Path;

/// Total length of a path, the sum of its edge lengths.
///
/// A single-node path costs 0. Every consecutive pair is looked up again in
/// the network, so a path with a step that is not an edge fails with
/// `EdgeNotFound`.
pub fn path_cost(path: &Path, network: &RoadNetwork) -> Result<f64, Error> {
    let mut cost = 0.0;
    for w in path.nodes().windows(2) {
        cost += network.edge_weight(w[0], w[1])?;
    }
    Ok(cost)
}

/// Same as `path_cost` for a path given by node ids
pub fn route_cost<S: AsRef<str>>(nodes: &[S], network: &RoadNetwork) -> Result<f64, Error> {
    let mut cost = 0.0;
    for w in nodes.windows(2) {
        cost += network.weight(w[0].as_ref(), w[1].as_ref())?;
    }
    Ok(cost)
}
