//! Onboarding routes
//!
//! A new agency lands on the onboarding flow until its agency form exists.
//! The gate is the existence probe against the forms service.

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::app::AppState;
use crate::auth::RequireAuth;
use crate::services::FormStatus;

#[derive(Debug, Serialize)]
pub struct AgencyFormStatusResponse {
    /// Legacy boolean: true only on confirmed existence. Absence and a
    /// failed check look identical here.
    pub exists: bool,
    /// Three-state outcome for callers that need to tell "confirmed
    /// absent" apart from "check failed".
    pub status: FormStatus,
}

/// GET /onboarding/agency-form
pub async fn agency_form_status(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
) -> Json<AgencyFormStatusResponse> {
    let status = state.forms_client.agency_form_status().await;

    tracing::debug!(
        user_id = %auth.user_id,
        status = ?status,
        "Agency form existence check"
    );

    Json(AgencyFormStatusResponse {
        exists: status == FormStatus::Exists,
        status,
    })
}
