pub mod health;
pub mod itineraries;
pub mod me;
pub mod onboarding;

use axum::{routing::get, routing::post, Router};
use std::sync::Arc;

use crate::app::AppState;

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Public routes
        .route("/health", get(health::health_check))
        // Protected routes
        .route("/me", get(me::get_me))
        // Onboarding
        .route(
            "/onboarding/agency-form",
            get(onboarding::agency_form_status),
        )
        // Itineraries
        .route("/itineraries", post(itineraries::create_itinerary))
        .route("/itineraries", get(itineraries::list_itineraries))
        // PDF version ledger (nested under itineraries)
        .route("/itineraries/:itinerary_id/pdf", get(itineraries::get_pdf_view))
        .route(
            "/itineraries/:itinerary_id/pdf/versions",
            post(itineraries::record_pdf_version),
        )
        .route(
            "/itineraries/:itinerary_id/pdf/versions/:version/activate",
            post(itineraries::activate_pdf_version),
        )
}
