//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (ready to serve traffic)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;
use crate::calendar::supported_zones;

/// GET /health/live
///
/// Kubernetes liveness probe.
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Kubernetes readiness probe.
/// Checks that the preference store can be read.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    match check_preferences_health(&state).await {
        true => StatusCode::OK,
        false => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// GET /health
///
/// Full health status with component details.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let preferences_ok = check_preferences_health(&state).await;

    Json(HealthResponse {
        status: if preferences_ok { "healthy" } else { "degraded" }.to_string(),
        preferences: if preferences_ok { "ok" } else { "error" }.to_string(),
        timezones: supported_zones().len(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Probe the preference store with a lookup that matches no user
async fn check_preferences_health(state: &AppState) -> bool {
    match state.preferences.load("__health_check__").await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Preference store health check failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let status = liveness().await;
        assert_eq!(status, StatusCode::OK);
    }
}
