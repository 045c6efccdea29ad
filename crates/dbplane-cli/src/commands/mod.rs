//! CLI command implementations.
//!
//! Each submodule implements one command group:
//! - [`clusters`] - cloud clusters and sample data
//! - [`quick_start`] - cluster, user and access list in one step
//! - [`dbusers`] - database users
//! - [`access_lists`] - project IP access lists
//! - [`regions`] - provider regions and tiers
//! - [`backups`] - snapshots, schedules and backup configurations
//! - [`private_endpoints`] - private endpoint services
//! - [`ops_manager`] - ops-manager clusters and automation
//! - [`projects`] - projects in every deployment mode
//! - [`api_keys`] - organization API keys and their access lists
//! - [`config`] - profile inspection
//!
//! Commands borrow the capability traits they need rather than a concrete
//! store, so tests can drive them with a recording transport.

use std::net::IpAddr;
use std::path::Path;

use dbplane_store::Profile;
use ipnet::IpNet;
use serde::de::DeserializeOwned;

use crate::cli::{EntryArgs, OrgArg, ProjectArg};
use crate::error::CliError;

pub mod access_lists;
pub mod api_keys;
pub mod backups;
pub mod clusters;
pub mod config;
pub mod dbusers;
pub mod ops_manager;
pub mod private_endpoints;
pub mod projects;
pub mod quick_start;
pub mod regions;

pub use access_lists::AccessListCommand;
pub use api_keys::ApiKeyCommand;
pub use backups::BackupCommand;
pub use clusters::ClusterCommand;
pub use config::ConfigCommand;
pub use dbusers::DbUserCommand;
pub use ops_manager::OpsManagerCommand;
pub use private_endpoints::PrivateEndpointCommand;
pub use projects::ProjectCommand;
pub use quick_start::QuickStartCommand;
pub use regions::RegionCommand;

/// Project and organization defaults taken from the active profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scope<'a> {
    project_id: Option<&'a str>,
    org_id: Option<&'a str>,
}

impl<'a> Scope<'a> {
    /// Defaults from a profile.
    #[must_use]
    pub fn from_profile(profile: &'a Profile) -> Self {
        Self {
            project_id: profile.project_id.as_deref(),
            org_id: profile.org_id.as_deref(),
        }
    }

    /// Explicit defaults.
    #[must_use]
    pub const fn new(project_id: Option<&'a str>, org_id: Option<&'a str>) -> Self {
        Self { project_id, org_id }
    }

    /// The project to act on: the flag, else the profile's.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::MissingProjectId`] when neither is set.
    pub fn project<'b>(&self, arg: &'b ProjectArg) -> Result<&'b str, CliError>
    where
        'a: 'b,
    {
        arg.project_id
            .as_deref()
            .or(self.project_id)
            .filter(|id| !id.is_empty())
            .ok_or(CliError::MissingProjectId)
    }

    /// The organization to act on: the flag, else the profile's.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::MissingOrgId`] when neither is set.
    pub fn org<'b>(&self, arg: &'b OrgArg) -> Result<&'b str, CliError>
    where
        'a: 'b,
    {
        arg.org_id
            .as_deref()
            .or(self.org_id)
            .filter(|id| !id.is_empty())
            .ok_or(CliError::MissingOrgId)
    }
}

/// Parse a JSON input file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid JSON for `T`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| CliError::InputFile {
        path: path.display().to_string(),
        source,
    })
}

/// An access list entry given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// Single address.
    Ip(String),
    /// CIDR block.
    Cidr(String),
}

/// Validate `--ip` and `--cidr` flags, keeping their order per kind.
///
/// # Errors
///
/// Returns [`CliError::InvalidArgument`] for a malformed value or when no
/// entry was given.
pub fn entries(args: &EntryArgs) -> Result<Vec<Entry>, CliError> {
    let mut out = Vec::with_capacity(args.ips.len() + args.cidrs.len());
    for ip in &args.ips {
        ip.parse::<IpAddr>()
            .map_err(|_| CliError::InvalidArgument(format!("'{ip}' is not an IP address")))?;
        out.push(Entry::Ip(ip.clone()));
    }
    for cidr in &args.cidrs {
        cidr.parse::<IpNet>()
            .map_err(|_| CliError::InvalidArgument(format!("'{cidr}' is not a CIDR block")))?;
        out.push(Entry::Cidr(cidr.clone()));
    }
    if out.is_empty() {
        return Err(CliError::InvalidArgument(
            "at least one --ip or --cidr is required".to_string(),
        ));
    }
    Ok(out)
}
