// ── Wire response contract ──
//
// Every response — success or failure — is wrapped in the same envelope:
// `{success, data|null, error: {code, message}|null, timestamp}`. The HTTP
// framework itself lives outside this crate; this module owns the mapping
// from domain results to envelope + status code so every frontend (HTTP
// handler, CLI JSON output) renders identically.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::error::CoreError;
use crate::model::VersionToken;

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// The uniform response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ErrorBody>,
    pub timestamp: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: now(),
        }
    }

    pub fn failure(err: &CoreError) -> Self {
        let (_, code) = status_and_code(err);
        Self {
            success: false,
            data: None,
            error: Some(ErrorBody {
                code: code.to_owned(),
                message: err.to_string(),
            }),
            timestamp: now(),
        }
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// HTTP status and machine-readable code for a domain error.
pub fn status_and_code(err: &CoreError) -> (u16, &'static str) {
    match err {
        CoreError::SiteNotFound { .. } => (404, "SITE_NOT_FOUND"),
        CoreError::ManagerNotFound { .. } => (404, "MANAGER_NOT_FOUND"),
        CoreError::CertificateNotFound { .. } => (404, "CERTIFICATE_NOT_FOUND"),
        CoreError::CertificateUnavailable { .. } => (400, "CERTIFICATE_NOT_AVAILABLE"),
        CoreError::NotAssigned { .. } => (400, "NOT_ASSIGNED"),
        CoreError::Validation { .. } => (400, "VALIDATION_ERROR"),
        CoreError::MissingParams => (400, "MISSING_PARAMS"),
        CoreError::DuplicateId { .. } => (400, "DUPLICATE_ID"),
        CoreError::VersionConflict { .. } => (409, "CONFLICT"),
        CoreError::StoreRead(_) => (500, "FETCH_ERROR"),
        CoreError::StoreWrite { .. } => (500, "STORE_ERROR"),
    }
}

/// Resolve the expected version from the two places a client may put it.
///
/// The `If-Match` header takes precedence over the body's `version` field
/// when both are given; blank values count as absent (the original service
/// treated empty strings as "no expectation").
pub fn resolve_version(
    if_match: Option<&str>,
    body_version: Option<&str>,
) -> Option<VersionToken> {
    let pick = |raw: Option<&str>| {
        raw.map(str::trim)
            .filter(|s| !s.is_empty())
            .map(VersionToken::from)
    };
    pick(if_match).or_else(|| pick(body_version))
}
