use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub services: ServiceHealth,
}

#[derive(Serialize)]
pub struct ServiceHealth {
    pub database: String,
    pub forms_service: String,
}

/// Health check endpoint - public
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    // Check both dependencies in parallel
    let (db_result, forms_result) = tokio::join!(
        sqlx::query("SELECT 1").fetch_one(&state.db),
        state.forms_client.health_check(),
    );

    let db_status = if db_result.is_ok() { "ok" } else { "error" };
    let forms_status = if forms_result.is_ok() { "ok" } else { "error" };

    // DB is critical; the forms service only degrades onboarding
    let status = if db_result.is_ok() && forms_result.is_ok() {
        "healthy"
    } else if db_result.is_ok() {
        "degraded"
    } else {
        "unhealthy"
    };

    let status_code = if status == "unhealthy" {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    (
        status_code,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            services: ServiceHealth {
                database: db_status.to_string(),
                forms_service: forms_status.to_string(),
            },
        }),
    )
}
