use petgraph::graph::NodeIndex;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::{
    path::Path as FsPath,
    time::{Duration, Instant},
};

use crate::layers::{error::Error, road_network::RoadNetwork};

use super::{
    construct::{construct, AntResult, Path},
    eval::path_cost,
    pheromone::{PheromoneTable, UpdatePolicy},
};

// struct to store all the tunable parameters for the ACO algorithm
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcoParams {
    pub num_ants: usize,
    pub num_iterations: usize,
    pub alpha: f64, // pheromone weight
    pub beta: f64,  // heuristic weight
    pub rho: f64,   // pheromone evaporation rate
    pub q: f64,     // pheromone deposit factor
    pub seed: u64,
    /// build the ants of an iteration on the rayon pool
    pub parallel: bool,
    /// wall clock budget in seconds, checked after every iteration
    pub time_limit: Option<f64>,
}

impl Default for AcoParams {
    fn default() -> Self {
        AcoParams {
            num_ants: 10,
            num_iterations: 50,
            alpha: 1.0,
            beta: 3.0,
            rho: 0.5,
            q: 1.0,
            seed: 42,
            parallel: false,
            time_limit: None,
        }
    }
}

impl AcoParams {
    pub fn print_stats(&self) {
        log::info!("ACO parameters:");
        log::info!("  Alpha: {}", self.alpha);
        log::info!("  Beta: {}", self.beta);
        log::info!("  Rho: {}", self.rho);
        log::info!("  Q: {}", self.q);
        log::info!("  Number of ants: {}", self.num_ants);
        log::info!("  Number of iterations: {}", self.num_iterations);
        log::info!("  Seed: {}", self.seed);
        log::info!("  Parallel: {}", self.parallel);
        if let Some(limit) = self.time_limit {
            log::info!("  Time limit: {}s", limit);
        }
    }

    /// Read parameters from a JSON file. Missing fields take their defaults.
    pub fn from_json_file<P: AsRef<FsPath>>(path: P) -> Result<AcoParams, Error> {
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.num_ants == 0 {
            return Err(Error::InvalidParameter("num_ants must be at least 1".into()));
        }
        if !(0.0..1.0).contains(&self.rho) {
            return Err(Error::InvalidParameter(format!(
                "rho must be in [0, 1), got {}",
                self.rho
            )));
        }
        for (name, value) in [("alpha", self.alpha), ("beta", self.beta), ("q", self.q)] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidParameter(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if let Some(limit) = self.time_limit {
            if !limit.is_finite() || limit < 0.0 {
                return Err(Error::InvalidParameter(format!(
                    "time_limit must be a non-negative number of seconds, got {}",
                    limit
                )));
            }
        }
        Ok(())
    }
}

/// A route found by the colony, as external node ids
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub nodes: Vec<String>,
    pub cost: f64,
}

impl Route {
    pub fn hops(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}

/// Outcome and counters of one run
#[derive(Clone, Debug, Default, Serialize)]
pub struct RunReport {
    pub best: Option<Route>,
    /// global best cost after each iteration
    pub best_cost_history: Vec<Option<f64>>,
    pub iterations: usize,
    /// construction attempts, successful or not
    pub attempts: usize,
    pub successes: usize,
    pub dead_ends: usize,
    pub elapsed: Duration,
    /// the time limit ended the run before all iterations ran
    pub stopped_early: bool,
}

impl RunReport {
    pub fn print_stats(&self) {
        log::info!("ACO run:");
        log::info!("  Iterations: {}", self.iterations);
        log::info!("  Attempts: {}", self.attempts);
        log::info!("  Successes: {}", self.successes);
        log::info!("  Dead ends: {}", self.dead_ends);
        log::info!("  Elapsed: {}ms", self.elapsed.as_millis());
        if self.stopped_early {
            log::info!("  Stopped early by time limit");
        }
        match &self.best {
            Some(route) => log::info!("  Best cost: {} ({} hops)", route.cost, route.hops()),
            None => log::info!("  No route found"),
        }
    }
}

/// Ant colony search for a short route between two nodes of a road network.
///
/// Every iteration sends `num_ants` ants from start to end, keeps the
/// cheapest route seen so far, then evaporates the pheromone table and lets
/// the ants that arrived deposit `q / cost` on their edges.
pub struct ColonyOptimizer<'a> {
    network: &'a RoadNetwork,
    params: AcoParams,
    rng: StdRng,
}

impl<'a> ColonyOptimizer<'a> {
    pub fn new(network: &'a RoadNetwork, params: AcoParams) -> Result<Self, Error> {
        params.validate()?;
        let rng = StdRng::seed_from_u64(params.seed);
        Ok(ColonyOptimizer {
            network,
            params,
            rng,
        })
    }

    pub fn params(&self) -> &AcoParams {
        &self.params
    }

    /// Best route from `start` to `end`, `None` if no ant ever arrived
    pub fn run(&mut self, start: &str, end: &str) -> Result<Option<Route>, Error> {
        Ok(self.run_with_report(start, end)?.best)
    }

    /// Run the colony and return the best route with run counters.
    ///
    /// Each call starts from a fresh pheromone table. The seed generator
    /// carries over, so only a new optimizer replays the same seed.
    ///
    /// # Errors
    /// - `InvalidEndpoint` if either node is unknown, before any iteration
    pub fn run_with_report(&mut self, start: &str, end: &str) -> Result<RunReport, Error> {
        let start_index = self
            .network
            .index_of(start)
            .ok_or_else(|| Error::InvalidEndpoint(start.to_string()))?;
        let end_index = self
            .network
            .index_of(end)
            .ok_or_else(|| Error::InvalidEndpoint(end.to_string()))?;

        let started = Instant::now();
        if start_index == end_index {
            // trivial route, the seed generator is left untouched
            return Ok(RunReport {
                best: Some(Route {
                    nodes: vec![start.to_string()],
                    cost: 0.0,
                }),
                elapsed: started.elapsed(),
                ..RunReport::default()
            });
        }

        let time_limit = self.params.time_limit.map(Duration::from_secs_f64);
        let policy = UpdatePolicy::new(self.params.rho, self.params.q);
        let mut pheromone = PheromoneTable::init(self.network);
        let mut best: Option<AntResult> = None;
        let mut report = RunReport::default();

        log::debug!("Searching route from {} to {}", start, end);
        for iteration in 0..self.params.num_iterations {
            // one independent stream per ant keeps results independent of scheduling
            let seeds: Vec<u64> = (0..self.params.num_ants).map(|_| self.rng.gen()).collect();
            let paths = self.construct_all(&pheromone, start_index, end_index, &seeds);

            let mut successes = Vec::with_capacity(paths.len());
            for path in paths.into_iter().flatten() {
                let cost = path_cost(&path, self.network)?;
                successes.push(AntResult { path, cost });
            }
            let dead_ends = seeds.len() - successes.len();
            report.attempts += seeds.len();
            report.successes += successes.len();
            report.dead_ends += dead_ends;

            for result in successes.iter() {
                if best.as_ref().map_or(true, |b| result.cost < b.cost) {
                    log::debug!("  New best route found: {}", result.cost);
                    best = Some(result.clone());
                }
            }

            // all ants are done reading the table at this point
            policy.apply(&mut pheromone, &successes);

            let best_cost = best.as_ref().map(|b| b.cost);
            report.best_cost_history.push(best_cost);
            report.iterations += 1;
            log::debug!(
                "Iteration {}: {} arrived, {} dead ends, best {:?}",
                iteration,
                successes.len(),
                dead_ends,
                best_cost
            );

            if let Some(limit) = time_limit {
                if started.elapsed() >= limit && iteration + 1 < self.params.num_iterations {
                    log::info!(
                        "Time limit reached after {} of {} iterations",
                        iteration + 1,
                        self.params.num_iterations
                    );
                    report.stopped_early = true;
                    break;
                }
            }
        }

        report.best = best.map(|b| Route {
            nodes: b.path.to_ids(self.network),
            cost: b.cost,
        });
        report.elapsed = started.elapsed();
        Ok(report)
    }

    /// Build one path per seed against the same pheromone snapshot.
    /// Results come back in seed order in both modes.
    fn construct_all(
        &self,
        pheromone: &PheromoneTable,
        start: NodeIndex,
        end: NodeIndex,
        seeds: &[u64],
    ) -> Vec<Option<Path>> {
        let (network, alpha, beta) = (self.network, self.params.alpha, self.params.beta);
        let ant = |&seed: &u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            construct(network, pheromone, start, end, alpha, beta, &mut rng)
        };
        if self.params.parallel {
            seeds.par_iter().map(ant).collect()
        } else {
            seeds.iter().map(ant).collect()
        }
    }
}
