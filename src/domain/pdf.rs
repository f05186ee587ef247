//! PDF version ledger types
//!
//! An itinerary owns an append-only history of rendered PDF artifacts. Each
//! generation or edit-triggered regeneration appends a new version; versions
//! are never rewritten or deleted, and at most one version per itinerary is
//! active at any time. `PdfLedger` is the in-memory form of that contract;
//! the storage layer in `routes/itineraries.rs` enforces the same invariants
//! transactionally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One rendered PDF artifact in an itinerary's history.
///
/// Immutable after creation except for `is_active`, which flips to false
/// when a newer version becomes active.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfVersion {
    pub id: Uuid,
    /// Retrieval location of the rendered artifact. Opaque; never parsed.
    pub url: String,
    /// Monotonically increasing per itinerary, starting at 1.
    pub version: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PdfVersionMetadata>,
}

/// Advisory regeneration metadata. `edited_data` is an opaque snapshot of
/// the source data that produced this version, kept for audit only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfVersionMetadata {
    pub regenerated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_data: Option<serde_json::Value>,
}

/// Result of a successful generation/upload, as reported by the rendering
/// pipeline. `key` is the storage-layer addressing token and `url` the
/// retrieval location; they are distinct identifiers even when both resolve
/// to the same artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfUploadResult {
    pub url: String,
    pub key: String,
    #[serde(default)]
    pub version: Option<i32>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PdfLedgerError {
    #[error("pdf version {0} does not exist")]
    UnknownVersion(i32),
    #[error("pdf version {0} already recorded")]
    DuplicateVersion(i32),
    #[error("pdf version {0} is not a positive version number")]
    InvalidVersion(i32),
}

/// Append-only version history for a single itinerary.
#[derive(Debug, Clone, Default)]
pub struct PdfLedger {
    versions: Vec<PdfVersion>,
}

impl PdfLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_history(versions: Vec<PdfVersion>) -> Self {
        Self { versions }
    }

    /// Full ordered history. Insertion order is version order.
    pub fn versions(&self) -> &[PdfVersion] {
        &self.versions
    }

    /// The currently active version, if any. Zero active versions is legal
    /// only before the first generation.
    pub fn active(&self) -> Option<&PdfVersion> {
        self.versions.iter().find(|v| v.is_active)
    }

    /// Timestamp of the most recent regeneration across all versions.
    pub fn last_regenerated_at(&self) -> Option<DateTime<Utc>> {
        self.versions
            .iter()
            .filter_map(|v| v.metadata.as_ref().map(|m| m.regenerated_at))
            .max()
    }

    fn next_version(&self) -> i32 {
        self.versions.iter().map(|v| v.version).max().unwrap_or(0) + 1
    }

    /// Record a new rendering. The version number defaults to
    /// `max(existing) + 1` only when the upload result carries none; an
    /// explicit version is never overwritten and must be at least 1. A new
    /// version becomes active
    /// unless the upload explicitly says otherwise, deactivating the prior
    /// active version in the same operation.
    pub fn append(
        &mut self,
        upload: PdfUploadResult,
        metadata: Option<PdfVersionMetadata>,
    ) -> Result<&PdfVersion, PdfLedgerError> {
        let version = upload.version.unwrap_or_else(|| self.next_version());
        if version < 1 {
            return Err(PdfLedgerError::InvalidVersion(version));
        }
        if self.versions.iter().any(|v| v.version == version) {
            return Err(PdfLedgerError::DuplicateVersion(version));
        }

        let is_active = upload.is_active.unwrap_or(true);
        if is_active {
            for v in &mut self.versions {
                v.is_active = false;
            }
        }

        self.versions.push(PdfVersion {
            id: Uuid::new_v4(),
            url: upload.url,
            version,
            is_active,
            created_at: Utc::now(),
            metadata,
        });

        // Just pushed, so the vec is non-empty.
        Ok(self.versions.last().unwrap())
    }

    /// Activate an existing version, deactivating the prior active one in
    /// the same operation. Unknown versions are rejected without touching
    /// any flag.
    pub fn activate(&mut self, version: i32) -> Result<(), PdfLedgerError> {
        if !self.versions.iter().any(|v| v.version == version) {
            return Err(PdfLedgerError::UnknownVersion(version));
        }
        for v in &mut self.versions {
            v.is_active = v.version == version;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(url: &str) -> PdfUploadResult {
        PdfUploadResult {
            url: url.to_string(),
            key: format!("pdfs/{url}"),
            version: None,
            is_active: None,
        }
    }

    fn active_versions(ledger: &PdfLedger) -> Vec<i32> {
        ledger
            .versions()
            .iter()
            .filter(|v| v.is_active)
            .map(|v| v.version)
            .collect()
    }

    #[test]
    fn append_assigns_monotonic_versions_and_preserves_url() {
        let mut ledger = PdfLedger::new();
        let first = ledger.append(upload("a.pdf"), None).unwrap();
        assert_eq!(first.version, 1);
        assert_eq!(first.url, "a.pdf");

        let second = ledger.append(upload("b.pdf"), None).unwrap();
        assert_eq!(second.version, 2);
        assert_eq!(second.url, "b.pdf");
        assert_eq!(ledger.versions().len(), 2);
    }

    #[test]
    fn explicit_version_is_never_overwritten() {
        let mut ledger = PdfLedger::new();
        let mut up = upload("pinned.pdf");
        up.version = Some(7);
        let v = ledger.append(up, None).unwrap();
        assert_eq!(v.version, 7);

        // Subsequent defaults continue past the explicit number.
        let next = ledger.append(upload("next.pdf"), None).unwrap();
        assert_eq!(next.version, 8);
    }

    #[test]
    fn duplicate_explicit_version_is_rejected() {
        let mut ledger = PdfLedger::new();
        ledger.append(upload("a.pdf"), None).unwrap();
        let mut dup = upload("b.pdf");
        dup.version = Some(1);
        assert_eq!(
            ledger.append(dup, None).unwrap_err(),
            PdfLedgerError::DuplicateVersion(1)
        );
        assert_eq!(ledger.versions().len(), 1);
    }

    #[test]
    fn non_positive_explicit_version_is_rejected() {
        let mut ledger = PdfLedger::new();
        for bad in [0, -1, i32::MIN] {
            let mut up = upload("bad.pdf");
            up.version = Some(bad);
            assert_eq!(
                ledger.append(up, None).unwrap_err(),
                PdfLedgerError::InvalidVersion(bad)
            );
        }
        assert!(ledger.versions().is_empty());
    }

    #[test]
    fn new_version_becomes_active_and_deactivates_prior() {
        let mut ledger = PdfLedger::new();
        ledger.append(upload("a.pdf"), None).unwrap();
        ledger.append(upload("b.pdf"), None).unwrap();
        assert_eq!(active_versions(&ledger), vec![2]);
    }

    #[test]
    fn inactive_upload_leaves_prior_active_untouched() {
        let mut ledger = PdfLedger::new();
        ledger.append(upload("a.pdf"), None).unwrap();
        let mut draft = upload("draft.pdf");
        draft.is_active = Some(false);
        ledger.append(draft, None).unwrap();
        assert_eq!(active_versions(&ledger), vec![1]);
    }

    #[test]
    fn activate_flips_exactly_one_flag() {
        let mut ledger = PdfLedger::new();
        for url in ["a.pdf", "b.pdf", "c.pdf"] {
            ledger.append(upload(url), None).unwrap();
        }
        assert_eq!(active_versions(&ledger), vec![3]);

        ledger.activate(2).unwrap();
        assert_eq!(active_versions(&ledger), vec![2]);

        ledger.activate(1).unwrap();
        assert_eq!(active_versions(&ledger), vec![1]);
    }

    #[test]
    fn activating_unknown_version_changes_nothing() {
        let mut ledger = PdfLedger::new();
        ledger.append(upload("a.pdf"), None).unwrap();
        assert_eq!(
            ledger.activate(9),
            Err(PdfLedgerError::UnknownVersion(9))
        );
        assert_eq!(active_versions(&ledger), vec![1]);
    }

    #[test]
    fn last_regenerated_at_takes_the_max_across_versions() {
        let mut ledger = PdfLedger::new();
        ledger.append(upload("a.pdf"), None).unwrap();
        assert_eq!(ledger.last_regenerated_at(), None);

        let earlier = Utc::now() - chrono::Duration::hours(2);
        let later = Utc::now();
        ledger
            .append(
                upload("b.pdf"),
                Some(PdfVersionMetadata {
                    regenerated_at: earlier,
                    edited_data: None,
                }),
            )
            .unwrap();
        ledger
            .append(
                upload("c.pdf"),
                Some(PdfVersionMetadata {
                    regenerated_at: later,
                    edited_data: Some(serde_json::json!({"days": 5})),
                }),
            )
            .unwrap();
        assert_eq!(ledger.last_regenerated_at(), Some(later));
    }

    #[test]
    fn upload_result_camel_case_wire_shape() {
        let parsed: PdfUploadResult = serde_json::from_str(
            r#"{"url":"https://cdn.example.com/i1-v3.pdf","key":"itineraries/i1/v3","isActive":false}"#,
        )
        .unwrap();
        assert_eq!(parsed.key, "itineraries/i1/v3");
        assert_eq!(parsed.version, None);
        assert_eq!(parsed.is_active, Some(false));
    }
}
