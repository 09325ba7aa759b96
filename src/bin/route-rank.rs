//! route-rank - rank airports by weighted PageRank over their routes

use anyhow::{Context, Result};
use clap::Parser;
use route_rank::{
    ingest,
    page_rank::{self, Config, IteratedPageRank, PageRank},
    RouteGraph,
};
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    time::Instant,
};

#[derive(Parser)]
#[command(name = "route-rank")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long)]
    quiet: bool,

    /// Airport listing
    #[arg(long, default_value = "airports.txt")]
    airports: PathBuf,

    /// Route listing
    #[arg(long, default_value = "routes.txt")]
    routes: PathBuf,

    /// Probability of following a route rather than jumping anywhere
    #[arg(long, default_value_t = Config::default().damping)]
    damping: f64,

    /// Stop once the L1 change between iterations drops below this
    #[arg(long, default_value_t = Config::default().tolerance)]
    tolerance: f64,

    #[arg(long, default_value_t = Config::default().max_iterations)]
    max_iterations: usize,

    /// Print only the best N airports
    #[arg(long)]
    top: Option<usize>,

    /// Print the last distribution even if it did not converge
    #[arg(long)]
    allow_unconverged: bool,
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 if cli.quiet => tracing::Level::ERROR,
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut graph = RouteGraph::new();
    ingest::load_airports(&mut graph, open(&cli.airports)?)
        .with_context(|| format!("reading {}", cli.airports.display()))?;
    ingest::load_routes(&mut graph, open(&cli.routes)?)
        .with_context(|| format!("reading {}", cli.routes.display()))?;

    let config = Config {
        damping: cli.damping,
        tolerance: cli.tolerance,
        max_iterations: cli.max_iterations,
    };
    let started = Instant::now();
    let outcome = IteratedPageRank::new(&graph, &config)?.calc();
    let elapsed = started.elapsed();

    let outcome = outcome.accept(cli.allow_unconverged)?;
    page_rank::publish(&mut graph, &outcome);

    let ranked = graph.ranked();
    let limit = cli.top.unwrap_or(ranked.len());
    for airport in ranked.iter().take(limit) {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            airport.code,
            airport.rank_position,
            airport.name,
            airport.rank,
            airport.inbound_routes
        );
    }
    println!("#Iterations: {}", outcome.convergence.iterations);
    println!("Time of PageRank computation: {elapsed:?}");
    Ok(())
}
