//! Health Check API Handler
//!
//! Reports whether the orchestrator can reach its job store.

use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::service::JobService;

/// GET /health
pub async fn health_check(State(service): State<JobService>) -> impl IntoResponse {
    match service.check_store().await {
        Ok(()) => (StatusCode::OK, "OK"),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "Store unavailable")
        }
    }
}
