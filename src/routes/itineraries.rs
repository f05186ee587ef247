//! Itinerary routes
//!
//! Minimal owning-entity CRUD plus the PDF version ledger operations. The
//! ledger is append-only: versions are only ever inserted, and the only
//! mutable column is `is_active`, which the activation endpoint swaps in a
//! single UPDATE so no reader observes zero or two active versions.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::pagination::PaginationParams;
use crate::api::pagination::Paginated;
use crate::api::response::DataResponse;
use crate::app::AppState;
use crate::auth::RequireAuth;
use crate::domain::itinerary::{
    CreateItineraryRequest, ItineraryPdfView, ItineraryResponse, ItineraryStatus,
};
use crate::domain::pdf::{
    PdfLedger, PdfLedgerError, PdfUploadResult, PdfVersion, PdfVersionMetadata,
};
use crate::error::ApiError;

/// Database row for itinerary
#[derive(Debug, sqlx::FromRow)]
struct ItineraryRow {
    id: Uuid,
    title: String,
    customer_name: Option<String>,
    destination: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ItineraryRow> for ItineraryResponse {
    fn from(row: ItineraryRow) -> Self {
        let status = match row.status.as_str() {
            "shared" => ItineraryStatus::Shared,
            "confirmed" => ItineraryStatus::Confirmed,
            "archived" => ItineraryStatus::Archived,
            _ => ItineraryStatus::Draft,
        };

        Self {
            id: row.id,
            title: row.title,
            customer_name: row.customer_name,
            destination: row.destination,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Database row for a PDF version
#[derive(Debug, sqlx::FromRow)]
struct PdfVersionRow {
    id: Uuid,
    url: String,
    version: i32,
    is_active: bool,
    created_at: DateTime<Utc>,
    regenerated_at: Option<DateTime<Utc>>,
    edited_data: Option<serde_json::Value>,
}

impl From<PdfVersionRow> for PdfVersion {
    fn from(row: PdfVersionRow) -> Self {
        let metadata = row.regenerated_at.map(|regenerated_at| PdfVersionMetadata {
            regenerated_at,
            edited_data: row.edited_data,
        });

        Self {
            id: row.id,
            url: row.url,
            version: row.version,
            is_active: row.is_active,
            created_at: row.created_at,
            metadata,
        }
    }
}

/// POST /itineraries
///
/// Create an itinerary. Agency staff only.
pub async fn create_itinerary(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateItineraryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_agency_staff()?;

    if req.title.trim().is_empty() {
        return Err(ApiError::bad_request("Itinerary title must not be empty"));
    }

    tracing::info!(
        user_id = %auth.user_id,
        title = %req.title,
        "Creating itinerary"
    );

    let row = sqlx::query_as::<_, ItineraryRow>(
        r#"
        INSERT INTO itineraries (created_by, title, customer_name, destination, status)
        VALUES ($1, $2, $3, $4, 'draft')
        RETURNING id, title, customer_name, destination, status, created_at, updated_at
        "#,
    )
    .bind(auth.user_id)
    .bind(req.title.trim())
    .bind(&req.customer_name)
    .bind(&req.destination)
    .fetch_one(&state.db)
    .await?;

    let response: ItineraryResponse = row.into();
    Ok((StatusCode::CREATED, Json(DataResponse::new(response))))
}

/// GET /itineraries
///
/// List itineraries, newest first.
pub async fn list_itineraries(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_agency_staff()?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM itineraries")
        .fetch_one(&state.db)
        .await?;

    let rows = sqlx::query_as::<_, ItineraryRow>(
        r#"
        SELECT id, title, customer_name, destination, status, created_at, updated_at
        FROM itineraries
        ORDER BY created_at DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(pagination.limit() as i64)
    .bind(pagination.offset() as i64)
    .fetch_all(&state.db)
    .await?;

    let data: Vec<ItineraryResponse> = rows.into_iter().map(Into::into).collect();
    Ok(Json(Paginated::new(data, &pagination, total as u64)))
}

/// GET /itineraries/:itinerary_id/pdf
///
/// Full PDF history for an itinerary plus the derived active-version and
/// last-regeneration fields.
pub async fn get_pdf_view(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(itinerary_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_agency_staff()?;

    ensure_itinerary_exists(&state.db, itinerary_id).await?;

    let ledger = load_ledger(&state.db, itinerary_id).await?;
    Ok(Json(DataResponse::new(ItineraryPdfView::from_ledger(
        itinerary_id,
        &ledger,
    ))))
}

/// Request body for recording a generated/regenerated PDF. The flattened
/// part is the upload pipeline's result shape; `editedData` is the opaque
/// source snapshot present only for edit-triggered regenerations.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPdfVersionRequest {
    #[serde(flatten)]
    pub upload: PdfUploadResult,
    #[serde(default)]
    pub edited_data: Option<serde_json::Value>,
}

/// POST /itineraries/:itinerary_id/pdf/versions
///
/// Record a new PDF version from an upload result. The version number is
/// allocated under a row lock on the parent itinerary so concurrent
/// recorders serialize; failure anywhere rolls the whole record back.
pub async fn record_pdf_version(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(itinerary_id): Path<Uuid>,
    Json(req): Json<RecordPdfVersionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_agency_staff()?;

    tracing::info!(
        user_id = %auth.user_id,
        itinerary_id = %itinerary_id,
        explicit_version = ?req.upload.version,
        regeneration = req.edited_data.is_some(),
        "Recording PDF version"
    );

    let mut tx = state.db.begin().await?;

    // Serializes version allocation for this itinerary.
    let locked: Option<Uuid> =
        sqlx::query_scalar("SELECT id FROM itineraries WHERE id = $1 FOR UPDATE")
            .bind(itinerary_id)
            .fetch_optional(&mut *tx)
            .await?;

    if locked.is_none() {
        return Err(ApiError::not_found("Itinerary not found"));
    }

    // The ledger type owns the append semantics (version defaulting,
    // single-active); the rows below only persist its outcome.
    let mut ledger = load_ledger(&mut *tx, itinerary_id).await?;

    let storage_key = req.upload.key.clone();
    let metadata = req.edited_data.map(|snapshot| PdfVersionMetadata {
        regenerated_at: Utc::now(),
        edited_data: Some(snapshot),
    });

    let created = ledger
        .append(req.upload, metadata)
        .map_err(|e| match e {
            PdfLedgerError::DuplicateVersion(v) => {
                ApiError::conflict(format!("PDF version {v} already recorded"))
            }
            PdfLedgerError::UnknownVersion(v) => {
                ApiError::not_found(format!("PDF version {v} not found for itinerary"))
            }
            PdfLedgerError::InvalidVersion(v) => {
                ApiError::bad_request(format!("PDF version must be positive, got {v}"))
            }
        })?
        .clone();

    if created.is_active {
        sqlx::query(
            "UPDATE itinerary_pdf_versions SET is_active = FALSE WHERE itinerary_id = $1 AND is_active",
        )
        .bind(itinerary_id)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query(
        r#"
        INSERT INTO itinerary_pdf_versions
            (id, itinerary_id, url, storage_key, version, is_active, created_at, regenerated_at, edited_data)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(created.id)
    .bind(itinerary_id)
    .bind(&created.url)
    .bind(&storage_key)
    .bind(created.version)
    .bind(created.is_active)
    .bind(created.created_at)
    .bind(created.metadata.as_ref().map(|m| m.regenerated_at))
    .bind(created.metadata.as_ref().and_then(|m| m.edited_data.clone()))
    .execute(&mut *tx)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            ApiError::conflict(format!("PDF version {} already recorded", created.version))
        }
        _ => ApiError::from(e),
    })?;

    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(created))))
}

/// POST /itineraries/:itinerary_id/pdf/versions/:version/activate
///
/// Make an existing version the canonical one. The flag swap is a single
/// UPDATE over the itinerary's versions, so the deactivation of the prior
/// active version and the activation of the new one are one atomic write.
pub async fn activate_pdf_version(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path((itinerary_id, version)): Path<(Uuid, i32)>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_agency_staff()?;

    tracing::info!(
        user_id = %auth.user_id,
        itinerary_id = %itinerary_id,
        version = version,
        "Activating PDF version"
    );

    let mut tx = state.db.begin().await?;

    ensure_itinerary_exists(&mut *tx, itinerary_id).await?;

    // Validate against the in-memory ledger first: an unknown version is
    // rejected without touching any flag.
    let mut ledger = load_ledger(&mut *tx, itinerary_id).await?;
    ledger.activate(version).map_err(|_| {
        ApiError::not_found(format!("PDF version {version} not found for itinerary"))
    })?;

    // One UPDATE swaps both flags, so no reader ever observes zero or two
    // active versions.
    sqlx::query(
        "UPDATE itinerary_pdf_versions SET is_active = (version = $2) WHERE itinerary_id = $1",
    )
    .bind(itinerary_id)
    .bind(version)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(Json(DataResponse::new(ItineraryPdfView::from_ledger(
        itinerary_id,
        &ledger,
    ))))
}

async fn ensure_itinerary_exists<'e, E>(executor: E, itinerary_id: Uuid) -> Result<(), ApiError>
where
    E: sqlx::PgExecutor<'e>,
{
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM itineraries WHERE id = $1)")
        .bind(itinerary_id)
        .fetch_one(executor)
        .await?;

    if exists {
        Ok(())
    } else {
        Err(ApiError::not_found("Itinerary not found"))
    }
}

async fn load_ledger<'e, E>(executor: E, itinerary_id: Uuid) -> Result<PdfLedger, ApiError>
where
    E: sqlx::PgExecutor<'e>,
{
    let rows = sqlx::query_as::<_, PdfVersionRow>(
        r#"
        SELECT id, url, version, is_active, created_at, regenerated_at, edited_data
        FROM itinerary_pdf_versions
        WHERE itinerary_id = $1
        ORDER BY version ASC
        "#,
    )
    .bind(itinerary_id)
    .fetch_all(executor)
    .await?;

    Ok(PdfLedger::from_history(
        rows.into_iter().map(Into::into).collect(),
    ))
}
