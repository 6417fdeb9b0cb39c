use std::{path::PathBuf, time::Instant};

use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};

use aco_router::layers::{error::Error, loader};
use aco_router::opt::{
    aco::{AcoParams, ColonyOptimizer, Route},
    baseline::{greedy_route, random_route},
};

/// Compare the colony against the greedy and random routers on one query.
/// Only wall time is reported; all three run in this process, so memory
/// use is not measured per router.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long)]
    graph: PathBuf,

    #[arg(long)]
    cache: Option<PathBuf>,

    #[arg(long)]
    from: String,

    #[arg(long)]
    to: String,

    #[arg(long)]
    params: Option<PathBuf>,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn print_result(name: &str, route: &Option<Route>, elapsed_ms: f64) {
    match route {
        Some(route) => println!(
            "  {:<8} cost {:>12.3}  hops {:>4}  time {:>10.3}ms",
            name,
            route.cost,
            route.hops(),
            elapsed_ms
        ),
        None => println!("  {:<8} no route            time {:>10.3}ms", name, elapsed_ms),
    }
}

fn main() -> Result<(), Error> {
    env_logger::init();
    let args = Args::parse();

    println!("Loading road network from {}", args.graph.display());
    let network = loader::load(&args.graph, args.cache.as_deref())?;
    network.print_stats();

    let mut params = match &args.params {
        Some(path) => AcoParams::from_json_file(path)?,
        None => AcoParams::default(),
    };
    params.seed = args.seed;
    params.print_stats();

    println!("Routing {} -> {}", args.from, args.to);

    let start = Instant::now();
    let mut aco = ColonyOptimizer::new(&network, params)?;
    let aco_route = aco.run(&args.from, &args.to)?;
    print_result("aco", &aco_route, start.elapsed().as_secs_f64() * 1000.0);

    let start = Instant::now();
    let greedy = greedy_route(&network, &args.from, &args.to)?;
    print_result("greedy", &greedy, start.elapsed().as_secs_f64() * 1000.0);

    let start = Instant::now();
    let mut rng = StdRng::seed_from_u64(args.seed);
    let random = random_route(&network, &args.from, &args.to, &mut rng)?;
    print_result("random", &random, start.elapsed().as_secs_f64() * 1000.0);

    Ok(())
}
