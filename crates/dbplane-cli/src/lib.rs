//! # dbplane-cli
//!
//! dbplane command-line interface.
//!
//! Provides commands for:
//! - cloud clusters, database users, access lists, backups and private endpoints
//! - ops-manager / cloud-manager clusters, backups and automation
//! - projects and organization API keys in every deployment mode
//!
//! # Architecture
//!
//! Every command talks to a [`dbplane_store::Store`] built from the active
//! profile. Commands only ask for the capability traits they use, so an
//! operation the deployment mode cannot serve fails before any request.
//!
//! ```text
//! ┌──────────────┐  capability traits  ┌───────────────┐  HTTPS + digest  ┌─────────┐
//! │ dbplane-cli  │────────────────────►│ dbplane-store │─────────────────►│   API   │
//! └──────────────┘                     └───────────────┘                  └─────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod app;
pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use app::App;
pub use cli::{Cli, Commands, Format};
pub use error::CliError;
pub use output::OutputFormat;
