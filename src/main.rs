use std::path::PathBuf;

use clap::Parser;

use aco_router::layers::{error::Error, loader};
use aco_router::opt::aco::{AcoParams, ColonyOptimizer};

#[derive(Parser, Debug)]
#[command(author, version, about = "Find a route between two nodes with ant colony optimization", long_about = None)]
struct Args {
    /// CSV edge list with a `from,to,length` header
    #[arg(long)]
    graph: PathBuf,

    /// Binary snapshot of the network, written on first load
    #[arg(long)]
    cache: Option<PathBuf>,

    #[arg(long)]
    from: String,

    #[arg(long)]
    to: String,

    /// JSON file with base ACO parameters, overridden by the flags below
    #[arg(long)]
    params: Option<PathBuf>,

    #[arg(long)]
    ants: Option<usize>,

    #[arg(long)]
    iterations: Option<usize>,

    #[arg(long)]
    alpha: Option<f64>,

    #[arg(long)]
    beta: Option<f64>,

    #[arg(long)]
    rho: Option<f64>,

    #[arg(long)]
    q: Option<f64>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    parallel: bool,

    /// Seconds after which the best route so far is returned
    #[arg(long)]
    time_limit: Option<f64>,

    /// Print the full run report as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    fn aco_params(&self) -> Result<AcoParams, Error> {
        let mut params = match &self.params {
            Some(path) => AcoParams::from_json_file(path)?,
            None => AcoParams::default(),
        };
        if let Some(ants) = self.ants {
            params.num_ants = ants;
        }
        if let Some(iterations) = self.iterations {
            params.num_iterations = iterations;
        }
        if let Some(alpha) = self.alpha {
            params.alpha = alpha;
        }
        if let Some(beta) = self.beta {
            params.beta = beta;
        }
        if let Some(rho) = self.rho {
            params.rho = rho;
        }
        if let Some(q) = self.q {
            params.q = q;
        }
        if let Some(seed) = self.seed {
            params.seed = seed;
        }
        if self.parallel {
            params.parallel = true;
        }
        if self.time_limit.is_some() {
            params.time_limit = self.time_limit;
        }
        Ok(params)
    }
}

fn main() {
    env_logger::init();
    if let Err(e) = run(Args::parse()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Error> {
    log::info!("Loading road network from {}", args.graph.display());
    let network = loader::load(&args.graph, args.cache.as_deref())?;
    network.print_stats();

    let params = args.aco_params()?;
    params.print_stats();

    let mut aco = ColonyOptimizer::new(&network, params)?;
    let report = aco.run_with_report(&args.from, &args.to)?;
    report.print_stats();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    match &report.best {
        Some(route) => {
            println!("Route from {} to {}: {}", args.from, args.to, route.nodes.join(" -> "));
            println!("Cost: {}", route.cost);
        }
        None => println!("No route found from {} to {}", args.from, args.to),
    }
    Ok(())
}
