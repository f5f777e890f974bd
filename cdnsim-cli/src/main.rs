//! cdnsim CLI - Command-line runner
//!
//! This binary wires the simulation service together, runs it for a bounded
//! or unbounded duration, and periodically prints metric reports. It is the
//! observation collaborator: it only reads published snapshots and sends
//! fire-and-forget commands.

use clap::Parser;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use cdnsim::logging::{default_log_dir, default_log_file, init_logging};
use cdnsim::persist::{load_state, save_state};
use cdnsim::service::{SimSnapshot, SimulationConfig, SimulationSystem};
use cdnsim::sim::{CdnEngine, EngineConfig};

#[derive(Parser)]
#[command(name = "cdnsim")]
#[command(about = "Run a simulated CDN and watch its traffic metrics", long_about = None)]
#[command(version = cdnsim::VERSION)]
struct Args {
    /// Stop after this many seconds (runs until Ctrl-C if omitted)
    #[arg(long)]
    duration_secs: Option<u64>,

    /// RNG seed for a reproducible run (entropy-seeded if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Milliseconds between simulated requests
    #[arg(long, default_value = "15000")]
    traffic_interval_ms: u64,

    /// Milliseconds between maintenance rolls
    #[arg(long, default_value = "45000")]
    maintenance_interval_ms: u64,

    /// Milliseconds between content ingestions
    #[arg(long, default_value = "60000")]
    ingest_interval_ms: u64,

    /// Milliseconds between printed reports
    #[arg(long, default_value = "5000")]
    report_interval_ms: u64,

    /// Catalog size that triggers pruning
    #[arg(long, default_value = "100")]
    catalog_ceiling: usize,

    /// Catalog size pruning cuts down to
    #[arg(long, default_value = "80")]
    prune_target: usize,

    /// JSON state file to restore at startup and save on exit
    #[arg(long)]
    state_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let _logging_guard = match init_logging(default_log_dir(), default_log_file()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error initializing logging: {}", e);
            process::exit(1);
        }
    };

    let engine_config = EngineConfig::default()
        .with_catalog_ceiling(args.catalog_ceiling)
        .with_prune_target(args.prune_target);
    let config = SimulationConfig::default()
        .with_traffic_interval(Duration::from_millis(args.traffic_interval_ms))
        .with_maintenance_interval(Duration::from_millis(args.maintenance_interval_ms))
        .with_ingest_interval(Duration::from_millis(args.ingest_interval_ms))
        .with_engine(engine_config.clone());

    let mut engine = match args.seed {
        Some(seed) => CdnEngine::seeded(engine_config, seed),
        None => CdnEngine::new(engine_config),
    };

    // Restore a previous run if a state file was given and exists.
    if let Some(path) = &args.state_file {
        if path.exists() {
            match load_state(path) {
                Ok(state) => {
                    println!("Restoring state from {}", path.display());
                    engine.import_state(state);
                }
                Err(e) => {
                    eprintln!("Error loading state file {}: {}", path.display(), e);
                    process::exit(1);
                }
            }
        }
    }

    let system = match SimulationSystem::with_engine(
        &tokio::runtime::Handle::current(),
        config,
        engine,
    ) {
        Ok(system) => system,
        Err(e) => {
            eprintln!("Error starting simulation: {}", e);
            process::exit(1);
        }
    };

    println!("cdnsim {} - simulated CDN traffic", cdnsim::VERSION);
    println!(
        "  traffic every {}ms, maintenance every {}ms, ingestion every {}ms",
        args.traffic_interval_ms, args.maintenance_interval_ms, args.ingest_interval_ms
    );
    match args.duration_secs {
        Some(secs) => println!("  running for {}s", secs),
        None => println!("  running until Ctrl-C"),
    }
    println!();

    run_report_loop(&system, &args).await;

    let final_snapshot = system.snapshot();
    system.shutdown().await;

    println!();
    println!("Final state:");
    print_report(&final_snapshot);

    if let Some(path) = &args.state_file {
        let state = cdnsim::persist::SimState::new(
            final_snapshot.metrics.clone(),
            final_snapshot.catalog.clone(),
        );
        match save_state(path, &state) {
            Ok(()) => println!("✓ State saved: {}", path.display()),
            Err(e) => {
                eprintln!("Error saving state file {}: {}", path.display(), e);
                process::exit(1);
            }
        }
    }
}

/// Prints reports on an interval until the duration elapses or Ctrl-C.
async fn run_report_loop(system: &SimulationSystem, args: &Args) {
    let mut report = tokio::time::interval(Duration::from_millis(args.report_interval_ms.max(100)));
    report.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    report.tick().await;

    let deadline = args
        .duration_secs
        .map(|secs| tokio::time::Instant::now() + Duration::from_secs(secs));

    loop {
        let sleep_until = async {
            match deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!();
                println!("Interrupted, shutting down...");
                return;
            }
            _ = sleep_until => {
                return;
            }
            _ = report.tick() => {
                print_report(&system.snapshot());
            }
        }
    }
}

/// Prints one human-readable metrics report.
fn print_report(snapshot: &SimSnapshot) {
    let m = &snapshot.metrics;
    let hit_rate = if m.total_requests > 0 {
        m.cache_hits as f64 / m.total_requests as f64 * 100.0
    } else {
        0.0
    };
    let cached_items = snapshot
        .catalog
        .iter()
        .filter(|item| item.cached)
        .count();

    println!(
        "requests {:>6}  hits {:>6}  misses {:>6}  hit rate {:>5.1}%  avg latency {:>7.1}ms  saved {:>9.1}MB  catalog {:>3} ({} cached)",
        m.total_requests,
        m.cache_hits,
        m.cache_misses,
        hit_rate,
        m.avg_latency_ms,
        m.bandwidth_saved_mb,
        snapshot.catalog.len(),
        cached_items,
    );
}
