/// CLI interface
///
/// Command-line simulation driver and primary entry point. Plays the role of
/// the order entry collaborator: it generates validated random orders, feeds
/// them to the engine sequentially, and reports statistics and book snapshots
/// as JSON. The engine itself never generates or randomizes orders.

use crate::domain::validation::ValidationConfig;
use crate::engine::{EngineStats, MatchingEngine};
use crate::shared::metrics::METRICS;
use crate::shared::protocol::{BookSnapshot, OrderRequest, OrderStatus, Side};
use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Trading simulator configuration
#[derive(Parser, Debug, Clone)]
#[command(name = "matchbook")]
#[command(version = "0.1.0")]
#[command(about = "Order matching engine with a random-flow trading simulator", long_about = None)]
pub struct CliConfig {
    /// Number of orders to generate
    #[arg(short = 'n', long, default_value_t = 10_000)]
    pub orders: u64,

    /// Number of simulated users
    #[arg(short = 'u', long, default_value_t = 100)]
    pub users: u64,

    /// Symbols to trade (comma separated)
    #[arg(
        short = 's',
        long,
        value_delimiter = ',',
        default_value = "AAPL,GOOGL,MSFT,AMZN,TSLA,META,NVDA,JPM"
    )]
    pub symbols: Vec<String>,

    /// Minimum order price in minor units
    #[arg(long, default_value_t = 5_000)]
    pub min_price: u64,

    /// Maximum order price in minor units
    #[arg(long, default_value_t = 50_000)]
    pub max_price: u64,

    /// Minimum order quantity
    #[arg(long, default_value_t = 10)]
    pub min_quantity: u64,

    /// Maximum order quantity
    #[arg(long, default_value_t = 1_000)]
    pub max_quantity: u64,

    /// RNG seed (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Snapshot depth per book side in the report
    #[arg(short = 'd', long, default_value_t = 10)]
    pub depth: usize,

    /// Dump Prometheus metrics after the run
    #[arg(long, default_value_t = false)]
    pub metrics: bool,

    /// Log level
    #[arg(short = 'l', long, default_value = "info", value_parser = ["trace", "debug", "info", "warn", "error"])]
    pub log_level: String,

    /// Only show the configuration, do not run the simulation
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

/// Final simulation report, printed as JSON
#[derive(Debug, Serialize)]
struct SimulationReport {
    seed: u64,
    submitted: u64,
    rejected: u64,
    canceled: u64,
    elapsed_ms: f64,
    stats: EngineStats,
    books: Vec<BookSnapshot>,
}

/// Runs the CLI application
pub fn run() {
    let config = CliConfig::parse();
    init_logging(&config.log_level);

    println!("========================================");
    println!("  matchbook trading simulator v0.1.0");
    println!("========================================");
    println!("orders:       {}", config.orders);
    println!("users:        {}", config.users);
    println!("symbols:      {}", config.symbols.join(","));
    println!("price range:  {}..={} (minor units)", config.min_price, config.max_price);
    println!("qty range:    {}..={}", config.min_quantity, config.max_quantity);
    println!("log level:    {}", config.log_level);
    println!("========================================");

    if config.dry_run {
        println!("\ndry-run mode - not running the simulation");
        return;
    }

    let report = simulate(&config);

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(error) => tracing::error!(%error, "failed to serialize report"),
    }

    if config.metrics {
        print!("{}", METRICS.export());
    }
}

/// Generates random order flow and drives the engine to completion
fn simulate(config: &CliConfig) -> SimulationReport {
    let seed = config.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    tracing::info!(seed, "simulation starting");

    let symbols: Vec<Arc<str>> = config
        .symbols
        .iter()
        .map(|s| Arc::from(s.as_str()))
        .collect();

    let validation = ValidationConfig {
        min_price: config.min_price,
        max_price: config.max_price,
        min_quantity: config.min_quantity,
        max_quantity: config.max_quantity,
        allowed_symbols: symbols.clone(),
    };
    let mut engine = MatchingEngine::with_validation(validation);

    let mut rejected = 0u64;
    let mut canceled = 0u64;
    let mut resting: Vec<u64> = Vec::new();

    let started = Instant::now();
    for i in 0..config.orders {
        let request = OrderRequest {
            user_id: rng.gen_range(1..=config.users),
            symbol: Arc::clone(symbols.choose(&mut rng).expect("symbol list is non-empty")),
            side: if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell },
            price: rng.gen_range(config.min_price..=config.max_price),
            quantity: rng.gen_range(config.min_quantity..=config.max_quantity),
        };

        match engine.submit(request) {
            Ok(submission) => {
                if matches!(
                    submission.order.status,
                    OrderStatus::New | OrderStatus::PartiallyFilled
                ) {
                    resting.push(submission.order.id);
                }
            }
            Err(error) => {
                rejected += 1;
                tracing::warn!(%error, "order rejected");
            }
        }

        // Cancel an occasional resting order to keep the books from only
        // growing; also exercises the tombstone path under real flow.
        if !resting.is_empty() && rng.gen_ratio(1, 50) {
            let idx = rng.gen_range(0..resting.len());
            let order_id = resting.swap_remove(idx);
            if engine.cancel(order_id) {
                canceled += 1;
            }
        }

        if (i + 1) % 10_000 == 0 {
            tracing::info!(
                submitted = i + 1,
                trades = engine.trades_executed(),
                "progress"
            );
        }
    }
    let elapsed = started.elapsed();
    tracing::info!(orders = config.orders, ?elapsed, "simulation finished");

    let books = symbols
        .iter()
        .filter_map(|s| engine.snapshot(s, config.depth))
        .collect();

    SimulationReport {
        seed,
        submitted: config.orders,
        rejected,
        canceled,
        elapsed_ms: elapsed.as_secs_f64() * 1e3,
        stats: engine.stats(),
        books,
    }
}

/// Initializes the logging subscriber
fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
