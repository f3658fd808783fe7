//! Health and readiness probes.
//!
//! `/healthz` and `/livez` answer as long as the process runs; `/readyz`
//! additionally pings the database and flips to 503 once shutdown drain
//! has started, so the load balancer stops routing traffic before the
//! listener closes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use sqlx::PgPool;

/// Shared state for the health probes.
#[derive(Clone)]
pub struct HealthState {
    /// Database pool to ping for readiness.
    pub pool: PgPool,
    /// Set when graceful shutdown has begun.
    pub shutting_down: Arc<AtomicBool>,
}

async fn database_ok(pool: &PgPool) -> bool {
    sqlx::query("SELECT 1").execute(pool).await.is_ok()
}

/// Detailed health summary.
pub async fn health_handler(State(state): State<HealthState>) -> Json<Value> {
    let database = database_ok(&state.pool).await;
    Json(json!({
        "status": if database { "healthy" } else { "degraded" },
        "version": env!("CARGO_PKG_VERSION"),
        "database": database,
    }))
}

/// Basic liveness: the process is up.
pub async fn healthz_handler() -> &'static str {
    "ok"
}

/// Liveness probe alias.
pub async fn livez_handler() -> &'static str {
    "ok"
}

/// Readiness: serving traffic and able to reach the database.
pub async fn readyz_handler(State(state): State<HealthState>) -> (StatusCode, &'static str) {
    if state.shutting_down.load(Ordering::Acquire) {
        return (StatusCode::SERVICE_UNAVAILABLE, "draining");
    }

    if database_ok(&state.pool).await {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "database unreachable")
    }
}
