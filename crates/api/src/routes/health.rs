use axum::extract::State;
use axum::{routing::get, Json, Router};
use polyfaq_service::StatsSnapshot;
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `"ok"` when both store and cache respond, `"degraded"` otherwise.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    pub store: ComponentHealth,
    pub cache: ComponentHealth,
    /// Read-path counters since process start.
    pub faq_stats: StatsSnapshot,
}

#[derive(Serialize)]
pub struct ComponentHealth {
    pub backend: &'static str,
    pub healthy: bool,
}

/// GET /health -- returns store and cache health plus FAQ read-path counters.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_healthy = match state.store.health_check().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Store health check failed");
            false
        }
    };
    let cache_healthy = match state.cache.health_check().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Cache health check failed");
            false
        }
    };

    let status = if store_healthy && cache_healthy {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        store: ComponentHealth {
            backend: state.store.backend_name(),
            healthy: store_healthy,
        },
        cache: ComponentHealth {
            backend: state.cache.backend_name(),
            healthy: cache_healthy,
        },
        faq_stats: state.faqs.stats(),
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
