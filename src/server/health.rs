//! Liveness and readiness endpoints.
//!
//! `/health` answers from process state alone. `/health/detailed` also
//! probes both upstream sources concurrently and reports per-dependency
//! latency, plus the description cache counters.

use std::future::Future;
use std::sync::Arc;

use axum::{Extension, Json};
use serde::Serialize;
use tokio::time::Instant;

use crate::error::Result;
use crate::server::AppState;
use crate::sources::traits::{PollutionApi, SummaryApi};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct DependencyHealth {
    pub status: &'static str,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CacheHealth {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub expirations: u64,
    pub inserts: u64,
    pub hit_rate: f64,
}

#[derive(Debug, Serialize)]
pub struct DetailedHealthResponse {
    pub status: &'static str,
    /// When this report was taken, RFC 3339
    pub timestamp: String,
    pub uptime_ms: u64,
    pub pollution_api: DependencyHealth,
    pub summary_api: DependencyHealth,
    pub cache: CacheHealth,
}

pub async fn get_health<P, S>(
    Extension(state): Extension<Arc<AppState<P, S>>>,
) -> Json<HealthResponse>
where
    P: PollutionApi + 'static,
    S: SummaryApi + 'static,
{
    Json(HealthResponse {
        status: "ok",
        uptime_ms: uptime_ms(&state),
    })
}

#[tracing::instrument(level = "info", skip_all)]
pub async fn get_detailed_health<P, S>(
    Extension(state): Extension<Arc<AppState<P, S>>>,
) -> Json<DetailedHealthResponse>
where
    P: PollutionApi + 'static,
    S: SummaryApi + 'static,
{
    let (pollution_api, summary_api) = futures::future::join(
        timed_probe(state.pipeline.probe_pollution()),
        timed_probe(state.pipeline.probe_summaries()),
    )
    .await;

    let status = if pollution_api.status == "ok" && summary_api.status == "ok" {
        "ok"
    } else {
        "degraded"
    };

    let stats = state.pipeline.cache_stats();
    Json(DetailedHealthResponse {
        status,
        timestamp: chrono::Utc::now().to_rfc3339(),
        uptime_ms: uptime_ms(&state),
        pollution_api,
        summary_api,
        cache: CacheHealth {
            entries: state.pipeline.cache_len(),
            hits: stats.hits,
            misses: stats.misses,
            expirations: stats.expirations,
            inserts: stats.inserts,
            hit_rate: stats.hit_rate(),
        },
    })
}

pub async fn ping() -> &'static str {
    "pong"
}

fn uptime_ms<P: PollutionApi, S: SummaryApi>(state: &AppState<P, S>) -> u64 {
    state.started_at.elapsed().as_millis() as u64
}

/// Run one probe and fold its outcome and latency into a report entry.
async fn timed_probe(probe: impl Future<Output = Result<()>>) -> DependencyHealth {
    let start = Instant::now();
    match probe.await {
        Ok(()) => DependencyHealth {
            status: "ok",
            latency_ms: start.elapsed().as_millis() as u64,
            error: None,
        },
        Err(err) => DependencyHealth {
            status: "error",
            latency_ms: start.elapsed().as_millis() as u64,
            error: Some(err.to_string()),
        },
    }
}
