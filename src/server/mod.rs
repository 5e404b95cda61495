//! HTTP surface for the cities service.
//!
//! # Architecture
//!
//! The server is a thin axum layer over [`CitiesPipeline`]:
//!
//! - `cities` - `GET /cities`, the data endpoint
//! - `health` - liveness and readiness endpoints
//!
//! Handlers are generic over the source traits, so tests drive them with
//! the same mocks the pipeline tests use. Application state is shared via
//! an `Extension<Arc<AppState>>`; there are no process-wide singletons.
//!
//! Typed errors cross the boundary as `{error, code}` JSON bodies with
//! the status from [`Error::http_status`], never as a raw backtrace.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::time::Instant;
use tower_http::trace::TraceLayer;

use crate::error::{Error, Result};
use crate::pipeline::CitiesPipeline;
use crate::sources::traits::{PollutionApi, SummaryApi};

pub mod cities;
pub mod health;

/// Shared state handed to every handler.
pub struct AppState<P: PollutionApi, S: SummaryApi> {
    pub pipeline: CitiesPipeline<P, S>,
    pub started_at: Instant,
}

impl<P: PollutionApi, S: SummaryApi> AppState<P, S> {
    pub fn new(pipeline: CitiesPipeline<P, S>) -> Self {
        Self {
            pipeline,
            started_at: Instant::now(),
        }
    }
}

/// Build the application router.
#[tracing::instrument(level = "debug", skip_all)]
pub fn router<P, S>(state: Arc<AppState<P, S>>) -> Router
where
    P: PollutionApi + 'static,
    S: SummaryApi + 'static,
{
    Router::new()
        .route("/cities", get(cities::get_cities::<P, S>))
        .route("/health", get(health::get_health::<P, S>))
        .route("/health/detailed", get(health::get_detailed_health::<P, S>))
        .route("/health/ping", get(health::ping))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}

/// Run the server until ctrl-c.
///
/// Alongside the listener this spawns the cache sweep task, which walks
/// the description cache every `sweep_every` and drops expired entries
/// that no read has touched. A zero `sweep_every` means expiry is off
/// and no sweeper runs.
#[tracing::instrument(level = "info", skip_all)]
pub async fn serve<P, S>(
    addr: SocketAddr,
    state: Arc<AppState<P, S>>,
    sweep_every: Duration,
) -> Result<()>
where
    P: PollutionApi + 'static,
    S: SummaryApi + 'static,
{
    let _sweeper = spawn_sweeper(state.clone(), sweep_every);

    let app = router(state);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind {addr}: {e}")))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::internal(format!("Server error: {e}")))?;

    tracing::info!("server stopped");
    Ok(())
}

/// Spawn the periodic cache sweep task.
///
/// Returns `None` for a zero interval: a zero cache TTL means entries
/// never expire, so there is nothing to sweep (and `tokio::time::interval`
/// rejects a zero period).
fn spawn_sweeper<P, S>(
    state: Arc<AppState<P, S>>,
    every: Duration,
) -> Option<tokio::task::JoinHandle<()>>
where
    P: PollutionApi + 'static,
    S: SummaryApi + 'static,
{
    if every.is_zero() {
        tracing::debug!("cache expiry disabled, not spawning the sweep task");
        return None;
    }
    Some(tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.tick().await; // the first tick fires immediately
        loop {
            interval.tick().await;
            let dropped = state.pipeline.purge_expired_descriptions();
            if dropped > 0 {
                tracing::debug!(dropped, "swept expired descriptions");
            }
        }
    }))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received, draining connections");
}

/// Wire shape of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        // The wire body carries the bare message; the prefixed Display
        // form is for logs.
        let body = ErrorBody {
            error: self.message().to_string(),
            code: self.code(),
        };
        (status, Json(body)).into_response()
    }
}
