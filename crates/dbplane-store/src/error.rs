//! Error types for the dispatch façade.

use dbplane_http::HttpError;
use thiserror::Error;

use crate::config::Service;
use crate::operation::Operation;

/// Errors returned by façade operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The active deployment mode cannot serve the operation.
    #[error("{operation} is not supported for service {service}")]
    UnsupportedService {
        /// Operation that was requested.
        operation: Operation,
        /// Active deployment mode.
        service: Service,
    },

    /// The backend answered with something the façade cannot represent.
    #[error("{operation}: unexpected response: {reason}")]
    Translation {
        /// Operation that was requested.
        operation: Operation,
        /// What was wrong with the response.
        reason: String,
    },

    /// The backend call failed.
    #[error("{operation}: {source}")]
    Backend {
        /// Operation that was requested.
        operation: Operation,
        /// Error returned by the backend client.
        source: HttpError,
    },
}

impl StoreError {
    /// Attach operation context to a backend error.
    ///
    /// Undecodable responses become [`StoreError::Translation`]; everything
    /// else is kept as [`StoreError::Backend`].
    #[must_use]
    pub fn backend(operation: Operation, source: HttpError) -> Self {
        match source {
            HttpError::Decode(e) => Self::Translation {
                operation,
                reason: e.to_string(),
            },
            source => Self::Backend { operation, source },
        }
    }

    /// A response is missing a field the façade requires.
    #[must_use]
    pub fn missing_field(operation: Operation, field: &str) -> Self {
        Self::Translation {
            operation,
            reason: format!("missing field `{field}`"),
        }
    }

    /// The operation that failed.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        match self {
            Self::UnsupportedService { operation, .. }
            | Self::Translation { operation, .. }
            | Self::Backend { operation, .. } => *operation,
        }
    }

    /// Whether the error is an unsupported operation/mode combination.
    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedService { .. })
    }

    /// HTTP status of a backend API error.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Backend { source, .. } => source.status(),
            _ => None,
        }
    }
}

/// Result type for façade operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Attach operation context to backend client results.
pub(crate) trait Context<T> {
    fn context(self, operation: Operation) -> Result<T>;
}

impl<T> Context<T> for std::result::Result<T, HttpError> {
    fn context(self, operation: Operation) -> Result<T> {
        self.map_err(|e| StoreError::backend(operation, e))
    }
}

/// Require a field the façade shape cannot do without.
pub(crate) fn required<T>(operation: Operation, field: &str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| StoreError::missing_field(operation, field))
}
