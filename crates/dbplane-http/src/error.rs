//! Error types for the dbplane-http crate.

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while talking to a backend API.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The API answered with a non-success status.
    #[error("{}", api_message(.status, .error_code, .detail))]
    Api {
        /// HTTP status code.
        status: u16,
        /// Machine readable error code, e.g. `CLUSTER_NOT_FOUND`.
        error_code: Option<String>,
        /// Human readable detail.
        detail: Option<String>,
    },

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body could not be decoded into the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured base URL is missing or malformed.
    #[error("invalid base URL: {0}")]
    InvalidUrl(String),

    /// The server asked for authentication but no API key pair is configured.
    #[error("missing credentials: set a public and private API key")]
    MissingCredentials,

    /// The `WWW-Authenticate` header could not be understood.
    #[error("invalid digest challenge: {0}")]
    InvalidChallenge(String),
}

impl HttpError {
    /// HTTP status code, if the error came from an API response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Machine readable error code, if the API sent one.
    #[must_use]
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Api { error_code, .. } => error_code.as_deref(),
            _ => None,
        }
    }

    /// Build an [`HttpError::Api`] from a status and a (possibly empty) error body.
    #[must_use]
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
        Self::Api {
            status,
            error_code: parsed.error_code,
            detail: parsed.detail.or(parsed.reason),
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref, clippy::ref_option)]
fn api_message(status: &u16, error_code: &Option<String>, detail: &Option<String>) -> String {
    match (error_code.as_deref(), detail.as_deref()) {
        (Some(code), Some(detail)) => format!("API error {status} ({code}): {detail}"),
        (Some(code), None) => format!("API error {status} ({code})"),
        (None, Some(detail)) => format!("API error {status}: {detail}"),
        (None, None) => format!("API error {status}"),
    }
}

/// Error payload returned by both APIs.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error_code: Option<String>,
    detail: Option<String>,
    reason: Option<String>,
}

/// Result type for HTTP operations.
pub type Result<T> = std::result::Result<T, HttpError>;
