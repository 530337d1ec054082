//! brc CLI
//!
//! Aggregates a `key;value` measurements file and prints
//! `{key=min/mean/max, ...}` to stdout.
//!
//! ## Usage
//!
//! ```bash
//! # Aggregate with automatic worker sizing
//! brc --input measurements.txt
//!
//! # Log dropped records and pipeline progress
//! brc --input measurements.txt --debug
//!
//! # Pin the pool and read size, print counters to stderr
//! brc --input measurements.txt --workers 6 --chunk-size 4194304 --stats
//!
//! # Take sizing from a config file (flags still win)
//! brc --config /etc/brc.yml --input measurements.txt
//! ```

use anyhow::{Context, Result};
use brc_core::ParallelConfig;
use brc_engine::{run, EngineConfig, Summary};
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Optional settings file (`brc.yml`)
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    parallel: ParallelConfig,
}

impl FileConfig {
    fn load(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => Some(config),
                Err(e) => {
                    warn!("Failed to parse {}: {}", path.display(), e);
                    None
                }
            },
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "brc")]
#[command(author, version, about = "Aggregate min/mean/max per key from a key;value file")]
struct Cli {
    /// Path to the input file
    #[arg(short, long)]
    input: PathBuf,

    /// Enable debug logging, including every dropped record
    #[arg(short, long)]
    debug: bool,

    /// Path to brc.yml config file
    #[arg(short, long, default_value = "brc.yml")]
    config: PathBuf,

    /// Number of parser workers (default: CPU cores minus one)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Bytes requested from the input per read
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Chunks that may wait for a worker before the reader blocks
    #[arg(long)]
    queue_capacity: Option<usize>,

    /// Print run counters to stderr after the summary
    #[arg(long)]
    stats: bool,
}

/// Flags override the config file, which overrides defaults
fn resolve_config(cli: &Cli, file: Option<FileConfig>) -> EngineConfig {
    let mut parallel = file.map(|f| f.parallel).unwrap_or_default();
    if let Some(workers) = cli.workers {
        parallel.workers = workers;
    }
    if let Some(size) = cli.chunk_size {
        parallel.chunk_size = size;
    }
    if let Some(capacity) = cli.queue_capacity {
        parallel.queue_capacity = capacity;
    }

    EngineConfig::new(&cli.input)
        .with_debug(cli.debug)
        .with_parallel(parallel)
}

fn print_stats(summary: &Summary) {
    let secs = summary.elapsed.as_secs_f64();
    eprintln!("--- Statistics ---");
    eprintln!("Workers: {}", summary.workers);
    eprintln!("Bytes read: {}", summary.bytes_read);
    eprintln!("Chunks: {}", summary.chunks);
    eprintln!("Records: {}", summary.records);
    eprintln!("Skipped: {}", summary.skipped);
    eprintln!("Keys: {}", summary.table.len());
    eprintln!("Total time: {:.3}s", secs);
    if secs > 0.0 {
        eprintln!("Throughput: {:.0} records/sec", summary.records as f64 / secs);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let file_config = FileConfig::load(&cli.config);
    if file_config.is_some() {
        info!("Using settings from {}", cli.config.display());
    }
    let config = resolve_config(&cli, file_config);

    if !config.input.exists() {
        anyhow::bail!("File not found: {}", config.input.display());
    }

    let summary = run(&config)
        .with_context(|| format!("Failed to aggregate {}", config.input.display()))?;

    println!("{}", summary.render());
    if cli.stats {
        print_stats(&summary);
    }

    Ok(())
}
