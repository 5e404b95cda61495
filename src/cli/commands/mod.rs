//! CLI command definitions and dispatch.
//!
//! This module provides the command-line interface for airsift.
//! Each subcommand is implemented in its own submodule for maintainability:
//! - `cities`: One-shot fetch of polluted cities to stdout
//! - `serve`: Run the HTTP server
//! - `health`: Probe upstream source reachability

mod cities;
mod health;
mod serve;

use clap::{Parser, Subcommand};
use tokio::runtime::Runtime;

pub use cities::cmd_cities;
pub use health::cmd_health;
pub use serve::cmd_serve;

use crate::config::Config;
use crate::enricher::DescriptionEnricher;
use crate::pipeline::CitiesPipeline;
use crate::sources::{PollutionClient, WikiClient};

/// Airsift CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch polluted cities and print them
    Cities {
        /// Country code (PL, DE, ES or FR); all supported countries when omitted
        #[arg(short, long)]
        country: Option<String>,
        /// Page of upstream results to fetch
        #[arg(long, default_value = "1")]
        page: u32,
        /// Records per page (1-100)
        #[arg(long, default_value = "10")]
        limit: u32,
        /// Print the result as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Run the HTTP server
    Serve {
        /// Bind address, e.g. 0.0.0.0:8080 (overrides BIND_ADDR)
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Check that both upstream sources are reachable
    Health,
}

/// Run the specified CLI command.
///
/// With no subcommand the server is started, so a bare `airsift`
/// behaves like `airsift serve`.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;

    match &cli.command {
        Some(Commands::Cities {
            country,
            page,
            limit,
            json,
        }) => cmd_cities(&rt, country.as_deref(), *page, *limit, *json),
        Some(Commands::Serve { bind }) => cmd_serve(&rt, bind.as_deref()),
        Some(Commands::Health) => cmd_health(&rt),
        None => cmd_serve(&rt, None),
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Assemble the production pipeline from configuration.
pub(crate) fn build_pipeline(
    config: &Config,
) -> anyhow::Result<CitiesPipeline<PollutionClient, WikiClient>> {
    let pollution = PollutionClient::new(&config.pollution)?;
    let wiki = WikiClient::new(&config.wiki)?;
    let enricher = DescriptionEnricher::new(wiki, config.cache.ttl());
    Ok(CitiesPipeline::new(pollution, enricher))
}
