//! HTTP server command.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::runtime::Runtime;

use super::build_pipeline;
use crate::config::Config;
use crate::server::{self, AppState};

/// Run the HTTP server until ctrl-c
pub fn cmd_serve(rt: &Runtime, bind: Option<&str>) -> anyhow::Result<()> {
    let config = Config::from_env();

    let bind_addr = bind.unwrap_or(&config.server.bind_addr);
    let addr: SocketAddr = match bind_addr.parse() {
        Ok(addr) => addr,
        Err(_) => {
            eprintln!("Error: invalid bind address {:?}", bind_addr);
            eprintln!("Expected host:port, e.g. 0.0.0.0:8080");
            std::process::exit(1);
        }
    };

    let pipeline = build_pipeline(&config)?;
    let state = Arc::new(AppState::new(pipeline));

    rt.block_on(async {
        if let Err(e) = server::serve(addr, state, config.cache.ttl()).await {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    });
    Ok(())
}
