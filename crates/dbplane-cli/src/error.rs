//! CLI error types.

use dbplane_store::{ConfigError, StoreError};
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// The configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A backend operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// No `--project-id` flag and no project in the profile.
    #[error("missing project ID: pass --project-id or set project_id in the profile")]
    MissingProjectId,

    /// No `--org-id` flag and no organization in the profile.
    #[error("missing organization ID: pass --org-id or set org_id in the profile")]
    MissingOrgId,

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A watched resource did not reach the expected state in time.
    #[error("timed out waiting for {0}")]
    Timeout(String),

    /// Output formatting error.
    #[error("format error: {0}")]
    Format(String),

    /// Input file could not be parsed.
    #[error("invalid JSON in {path}: {source}")]
    InputFile {
        /// File that was read.
        path: String,
        /// Parse error.
        source: serde_json::Error,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
