//! Command-line interface for airsift.
//!
//! This module provides CLI commands for fetching polluted cities,
//! running the HTTP server, and checking upstream health.

mod commands;

pub use commands::{Cli, Commands, run_command};
