//! # Main — CLI Entry Point
//!
//! Parses the command line, initialises logging, and dispatches to the
//! subcommand runners in `cli.rs`.
//!
//! ## Subcommands
//!
//! - `serve`: run the HTTP API until SIGINT/SIGTERM.
//! - `check <N>`: primality of N and the closest prime at or below it.
//! - `search --threads T --until N`: run one session in-process until every
//!   worker's progression has reached N, print the primes up to N, then stop.
//!
//! ## Global Options
//!
//! - `--database-url` / `DATABASE_URL`: PostgreSQL prime store. Without it the
//!   store lives in memory and is lost on exit.
//! - `--max-threads` / `MAX_THREADS_TO_USE`: ceiling on workers per session.
//! - `--report-interval-secs` / `REPORT_INTERVAL_SECS`: progress log period.

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use primefinder::config::{DEFAULT_MAX_THREADS, DEFAULT_REPORT_INTERVAL};
use primefinder::FinderConfig;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(
    name = "primefinder",
    about = "Search for prime numbers concurrently and query what has been covered"
)]
struct Cli {
    /// PostgreSQL connection URL (or set DATABASE_URL env var). In-memory store when unset.
    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    /// Maximum number of workers a single search may use
    #[arg(
        long,
        env = "MAX_THREADS_TO_USE",
        default_value_t = DEFAULT_MAX_THREADS as u64,
        value_parser = clap::value_parser!(u64).range(1..),
        global = true
    )]
    max_threads: u64,

    /// Seconds between progress log lines while a search runs
    #[arg(
        long,
        env = "REPORT_INTERVAL_SECS",
        default_value_t = DEFAULT_REPORT_INTERVAL.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..),
        global = true
    )]
    report_interval_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (start, stop, list, status, health, metrics)
    Serve {
        /// Port to listen on
        #[arg(long, default_value_t = 7001)]
        port: u16,
    },
    /// Test a single number for primality
    Check {
        /// Number to test
        #[arg(allow_negative_numbers = true)]
        number: i64,
    },
    /// Search in-process until every worker has passed a bound, then print the primes up to it
    Search {
        /// Number of concurrent workers
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        threads: i64,
        /// Upper bound of the printed interval
        #[arg(long)]
        until: i64,
    },
}

impl Cli {
    fn finder_config(&self) -> FinderConfig {
        FinderConfig::new(self.max_threads as usize)
            .with_report_interval(Duration::from_secs(self.report_interval_secs))
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // LOG_FORMAT=json for log shippers, human-readable otherwise
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();

    match &cli.command {
        Commands::Serve { port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(cli::run_serve(&cli, *port))
        }
        Commands::Check { number } => cli::run_check(*number),
        Commands::Search { threads, until } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(cli::run_search(&cli, *threads, *until))
        }
    }
}
