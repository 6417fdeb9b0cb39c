use petgraph::graph::EdgeIndex;

use crate::layers::road_network::RoadNetwork;

use super::construct::AntResult;

pub const INIT_PHEROMONE: f64 = 1.0;

/// Pheromone level of every edge of a network, indexed by edge id.
///
/// Entries are created once from the network and never added or removed.
/// Levels stay strictly positive: evaporation only scales and deposits are
/// non-negative.
#[derive(Clone, Debug)]
pub struct PheromoneTable {
    levels: Vec<f64>,
}

impl PheromoneTable {
    /// Place `INIT_PHEROMONE` on every edge of the network
    pub fn init(network: &RoadNetwork) -> PheromoneTable {
        PheromoneTable {
            levels: vec![INIT_PHEROMONE; network.edge_count()],
        }
    }

    pub fn level(&self, edge: EdgeIndex) -> f64 {
        self.levels[edge.index()]
    }

    /// Scale every level by `1 - rho`, subnormal results included. Only a
    /// level that would underflow to exactly zero is held at the smallest
    /// positive normal float.
    pub fn evaporate(&mut self, rho: f64) {
        let keep = 1.0 - rho;
        for level in self.levels.iter_mut() {
            let scaled = *level * keep;
            *level = if scaled == 0.0 {
                f64::MIN_POSITIVE
            } else {
                scaled
            };
        }
    }

    pub fn reinforce(&mut self, edge: EdgeIndex, amount: f64) {
        debug_assert!(amount >= 0.0, "negative deposit {}", amount);
        self.levels[edge.index()] += amount;
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EdgeIndex, f64)> + '_ {
        self.levels
            .iter()
            .enumerate()
            .map(|(i, &level)| (EdgeIndex::new(i), level))
    }
}

/// Evaporate-then-deposit rule applied once per iteration
#[derive(Clone, Copy, Debug)]
pub struct UpdatePolicy {
    /// evaporation rate, in [0, 1)
    pub rho: f64,
    /// deposit factor, each edge of a path gets `q / cost`
    pub q: f64,
}

impl UpdatePolicy {
    pub fn new(rho: f64, q: f64) -> Self {
        UpdatePolicy { rho, q }
    }

    /// Pheromone one path leaves on each of its edges. Paths without a
    /// positive cost deposit nothing.
    pub fn deposit(&self, result: &AntResult) -> Option<f64> {
        if result.cost > 0.0 {
            Some(self.q / result.cost)
        } else {
            None
        }
    }

    /// Evaporate the whole table, then reinforce the edges of this
    /// iteration's successful paths. Must only run once all ants of the
    /// iteration have finished reading the table.
    pub fn apply(&self, table: &mut PheromoneTable, successes: &[AntResult]) {
        table.evaporate(self.rho);
        for result in successes {
            let Some(amount) = self.deposit(result) else {
                continue;
            };
            for &edge in result.path.edges() {
                table.reinforce(edge, amount);
            }
        }
    }
}
