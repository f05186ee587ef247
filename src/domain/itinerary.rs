//! Itinerary domain types
//!
//! The itinerary itself is a thin owning entity here; the interesting state
//! is the PDF version history it owns (see `domain::pdf`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::pdf::{PdfLedger, PdfVersion};

/// Itinerary lifecycle status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ItineraryStatus {
    Draft,
    Shared,
    Confirmed,
    Archived,
}

impl Default for ItineraryStatus {
    fn default() -> Self {
        Self::Draft
    }
}

/// Request DTO for creating an itinerary
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItineraryRequest {
    pub title: String,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
}

/// Response DTO for itinerary
#[derive(Debug, Clone, Serialize)]
pub struct ItineraryResponse {
    pub id: Uuid,
    pub title: String,
    pub customer_name: Option<String>,
    pub destination: Option<String>,
    pub status: ItineraryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Derived itinerary-with-PDF view consumed by the itinerary-viewing UI.
///
/// `active_pdf_version` always references an element of `pdf_versions` with
/// `is_active = true`; `pdf_versions` is ordered by version number.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryPdfView {
    pub itinerary_id: Uuid,
    pub pdf_versions: Vec<PdfVersion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_pdf_version: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_pdf_regenerated_at: Option<DateTime<Utc>>,
}

impl ItineraryPdfView {
    pub fn from_ledger(itinerary_id: Uuid, ledger: &PdfLedger) -> Self {
        Self {
            itinerary_id,
            active_pdf_version: ledger.active().map(|v| v.id),
            last_pdf_regenerated_at: ledger.last_regenerated_at(),
            pdf_versions: ledger.versions().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pdf::PdfUploadResult;

    #[test]
    fn view_points_at_the_active_version() {
        let mut ledger = PdfLedger::new();
        for url in ["v1.pdf", "v2.pdf"] {
            ledger
                .append(
                    PdfUploadResult {
                        url: url.to_string(),
                        key: url.to_string(),
                        version: None,
                        is_active: None,
                    },
                    None,
                )
                .unwrap();
        }
        ledger.activate(1).unwrap();

        let view = ItineraryPdfView::from_ledger(Uuid::new_v4(), &ledger);
        let active = view
            .pdf_versions
            .iter()
            .find(|v| Some(v.id) == view.active_pdf_version)
            .unwrap();
        assert!(active.is_active);
        assert_eq!(active.version, 1);
    }

    #[test]
    fn view_of_empty_ledger_has_no_active_version() {
        let view = ItineraryPdfView::from_ledger(Uuid::new_v4(), &PdfLedger::new());
        assert!(view.pdf_versions.is_empty());
        assert_eq!(view.active_pdf_version, None);
        assert_eq!(view.last_pdf_regenerated_at, None);
    }
}
