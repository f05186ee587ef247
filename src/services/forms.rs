//! Client for the agency-forms service.
//!
//! The only call this backend makes against it is the onboarding existence
//! probe: a single GET with no retry and no streaming. Failures are not
//! surfaced as errors; the probe resolves to a three-state `FormStatus`,
//! and a boolean wrapper collapses both `NotExists` and `CheckFailed` to
//! `false` for callers that gate onboarding on "no proof of existence".

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Outcome of the agency-form existence probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStatus {
    /// The endpoint answered 2xx with `exists` strictly `true`.
    Exists,
    /// The endpoint answered 2xx with `exists` strictly `false`.
    NotExists,
    /// Non-2xx status, transport failure, malformed payload, or an
    /// `exists` field that is not a boolean.
    CheckFailed,
}

#[derive(Debug, Deserialize)]
struct ExistsPayload {
    exists: serde_json::Value,
}

/// Client for the agency-forms service.
#[derive(Clone)]
pub struct FormsClient {
    client: Client,
    base_url: String,
}

impl FormsClient {
    /// Create a new forms service client.
    pub fn new(base_url: &str, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        tracing::info!(base_url = base_url, "Forms client initialized");

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Probe whether an agency form already exists for the current tenant.
    ///
    /// Total over all failure modes: any error on the way collapses into
    /// `FormStatus::CheckFailed` rather than propagating.
    pub async fn agency_form_status(&self) -> FormStatus {
        let url = format!("{}/api/agencyform", self.base_url);

        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "Agency form probe transport failure");
                return FormStatus::CheckFailed;
            }
        };

        let status = response.status();
        let body = response.bytes().await.unwrap_or_default();
        let outcome = interpret_probe_response(status.is_success(), &body);

        tracing::debug!(http_status = %status, outcome = ?outcome, "Agency form probe");
        outcome
    }

    /// Boolean-compatible wrapper for legacy onboarding callers: `true`
    /// only on confirmed existence. "Confirmed absent" and "check failed"
    /// are deliberately indistinguishable here; callers that need the
    /// difference use `agency_form_status`.
    #[allow(dead_code)]
    pub async fn check_agency_form_exists(&self) -> bool {
        self.agency_form_status().await == FormStatus::Exists
    }

    /// Reachability check used by the health endpoint.
    pub async fn health_check(&self) -> Result<()> {
        let url = format!("{}/api/agencyform", self.base_url);

        self.client
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .context("Forms service unreachable")?
            .error_for_status()
            .context("Forms service unhealthy")?;

        Ok(())
    }
}

/// Map an HTTP outcome onto `FormStatus`. Strict boolean contract: only a
/// successful response whose payload carries `exists` as a JSON boolean
/// produces a definite answer; `"true"` the string is a failed check, not
/// a truthy value.
fn interpret_probe_response(http_success: bool, body: &[u8]) -> FormStatus {
    if !http_success {
        return FormStatus::CheckFailed;
    }

    match serde_json::from_slice::<ExistsPayload>(body) {
        Ok(payload) => match payload.exists {
            serde_json::Value::Bool(true) => FormStatus::Exists,
            serde_json::Value::Bool(false) => FormStatus::NotExists,
            _ => FormStatus::CheckFailed,
        },
        Err(_) => FormStatus::CheckFailed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exists_only_for_strict_boolean_true() {
        assert_eq!(
            interpret_probe_response(true, br#"{"exists": true}"#),
            FormStatus::Exists
        );
        assert_eq!(
            interpret_probe_response(true, br#"{"exists": false}"#),
            FormStatus::NotExists
        );
    }

    #[test]
    fn string_true_is_not_coerced() {
        assert_eq!(
            interpret_probe_response(true, br#"{"exists": "true"}"#),
            FormStatus::CheckFailed
        );
        assert_eq!(
            interpret_probe_response(true, br#"{"exists": 1}"#),
            FormStatus::CheckFailed
        );
        assert_eq!(
            interpret_probe_response(true, br#"{"exists": null}"#),
            FormStatus::CheckFailed
        );
    }

    #[test]
    fn non_success_status_fails_the_check() {
        // Body is irrelevant once the status is non-2xx.
        assert_eq!(
            interpret_probe_response(false, br#"{"exists": true}"#),
            FormStatus::CheckFailed
        );
        assert_eq!(interpret_probe_response(false, b""), FormStatus::CheckFailed);
    }

    #[test]
    fn malformed_payload_fails_the_check() {
        assert_eq!(interpret_probe_response(true, b""), FormStatus::CheckFailed);
        assert_eq!(
            interpret_probe_response(true, b"not json"),
            FormStatus::CheckFailed
        );
        assert_eq!(
            interpret_probe_response(true, br#"{"present": true}"#),
            FormStatus::CheckFailed
        );
    }

    #[tokio::test]
    async fn transport_failure_fails_the_check() {
        // Port 1 is never bound, so the connection is refused outright.
        let client = FormsClient::new("http://127.0.0.1:1", 1).unwrap();
        assert_eq!(client.agency_form_status().await, FormStatus::CheckFailed);
    }

    #[tokio::test]
    async fn boolean_wrapper_collapses_failure_to_false() {
        let client = FormsClient::new("http://127.0.0.1:1", 1).unwrap();
        assert!(!client.check_agency_form_exists().await);
    }
}
