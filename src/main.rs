mod api;
mod app;
mod auth;
mod config;
mod db;
mod domain;
mod error;
mod logging;
mod middleware;
mod routes;
mod services;

use anyhow::Result;

use auth::TokenVerifier;
use services::FormsClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = config::Settings::from_env()?;

    // Initialize logging
    logging::init_logging(&settings.env);

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        "Starting itinero backend"
    );

    // Create database pool and apply migrations
    let pool = db::create_pool(&settings).await?;
    sqlx::migrate!().run(&pool).await?;
    tracing::info!("Database migrations applied");

    // JWT verifier for bearer tokens
    let verifier = TokenVerifier::new(
        &settings.jwt_secret,
        settings.jwt_issuer.clone(),
        settings.jwt_audience.clone(),
    );

    // Client for the agency-forms service
    let forms_client = FormsClient::new(
        &settings.forms_service_url,
        settings.forms_service_timeout_seconds,
    )?;

    // Optionally check the forms service (non-blocking)
    tokio::spawn({
        let forms_client = forms_client.clone();
        async move {
            match forms_client.health_check().await {
                Ok(()) => tracing::info!("Forms service is reachable"),
                Err(e) => tracing::warn!(error = %e, "Forms service check failed - onboarding probe will report check_failed"),
            }
        }
    });

    // Create application state
    let state = app::AppState::new(pool, settings.clone(), verifier, forms_client);

    // Build application
    let app = app::create_app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&settings.server_addr).await?;
    tracing::info!("Listening on {}", settings.server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
