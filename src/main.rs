//! Airsift - a polluted-cities aggregation service.
//!
//! Fetches raw pollution measurements from an authenticated upstream API,
//! filters them down to plausible city records, enriches each city with a
//! short description, and serves the result over HTTP or via CLI commands.

pub mod cache;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod enricher;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod server;
pub mod sources;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    init_logging(&config::Config::from_env().logging.level);

    cli::run_command(&args)
}

/// Initialize logging; `RUST_LOG` wins over the configured level.
fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}
