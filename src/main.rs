//! loadgen binary: parse arguments, open the engine, run the benchmark,
//! print the final statistics.

use std::process;
use std::sync::Arc;

use clap::error::ErrorKind;
use loadgen::cli;
use loadgen::insert::{InsertEngine, InsertOutcome};
use loadgen_core::{Result, RunConfig};
use loadgen_engine::{LmdbEngine, LmdbOptions, StorageEngine};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let matches = match cli::build_cli().try_get_matches() {
        Ok(matches) => matches,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            // Argument validation fails cleanly, before any engine resource
            // is allocated.
            eprintln!("{err}");
            process::exit(1);
        }
    };

    let config = match cli::config_from_matches(&matches) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    };

    if let Err(err) = run(&config) {
        // Engine and thread failures are unrecoverable for a single-shot
        // measurement run.
        eprintln!("fatal: {err}");
        process::abort();
    }
}

fn run(config: &RunConfig) -> Result<()> {
    info!(
        target: "loadgen",
        path = %config.path.display(),
        users = config.num_users,
        rows_per_user = config.rows_per_user,
        rows_per_commit = config.rows_per_commit,
        sync_interval_secs = config.sync_interval_secs,
        seed = config.seed,
        "starting run"
    );

    let options = LmdbOptions {
        map_size: config.map_size,
        // With a sync loop in charge of durability, commits skip the
        // implicit flush.
        no_sync: config.sync_enabled(),
    };
    let engine = Arc::new(LmdbEngine::open(&config.path, &options)?);

    let outcome = InsertEngine::new(Arc::clone(&engine), config.clone()).run()?;
    print_report(engine.as_ref(), config, &outcome)
}

fn print_report<E: StorageEngine>(
    engine: &E,
    config: &RunConfig,
    outcome: &InsertOutcome,
) -> Result<()> {
    let stat = engine.stat()?;
    let file_size = engine.size_on_disk()?;
    let rows = config.total_rows();

    println!("database stats:");
    println!("    page size:      {}", stat.page_size);
    println!("    tree depth:     {}", stat.depth);
    println!("    branch pages:   {}", stat.branch_pages);
    println!("    leaf pages:     {}", stat.leaf_pages);
    println!("    overflow pages: {}", stat.overflow_pages);
    println!("    entries:        {}", stat.entries);
    println!();
    println!("file stats:");
    println!("    file size:      {}", file_size);
    println!("    avg row size:   {}", file_size / rows);
    println!();
    println!("insert stats:");
    println!("    total time:     {:.3}s", outcome.elapsed.as_secs_f64());
    println!("    num rows:       {}", outcome.rows);
    println!("    rows/sec:       {:.3}", outcome.rows_per_sec());
    println!();
    Ok(())
}
