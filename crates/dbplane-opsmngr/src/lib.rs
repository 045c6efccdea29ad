//! # dbplane-opsmngr
//!
//! Typed client for the self-hosted management plane public API
//! (`/api/public/v1.0`). Ops-manager and cloud-manager serve the same API,
//! so one client covers both; only the base URL differs.
//!
//! Unlike the cloud-service API, clusters here are addressed by ID and a
//! project's topology is owned by its automation configuration.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api_keys;
mod automation;
mod backup_configs;
mod clusters;
mod projects;
mod snapshots;

use dbplane_http::{ApiRequest, Result, Transport, escape};
use serde::de::DeserializeOwned;
use tracing::trace;

pub use api_keys::{AccessListApiKey, AccessListApiKeyRequest, ApiKey, ApiKeyInput, ApiKeyRole, ApiKeysService};
pub use automation::{AutomationConfig, AutomationService, AutomationStatus, Process, ProcessStatus};
pub use backup_configs::{BackupConfig, BackupConfigsService};
pub use clusters::{AllClusters, AllClustersProject, Cluster, ClusterSummary, Clusters, ClustersService};
pub use projects::{Project, ProjectsService};
pub use snapshots::{ContinuousSnapshot, SnapshotSchedule, SnapshotTimestamp, SnapshotsService};

/// Path prefix of every endpoint.
pub const API_PATH: &str = "/api/public/v1.0";

/// Hosted cloud-manager endpoint used when no base URL is configured.
pub const CLOUD_MANAGER_URL: &str = "https://cloud.mongodb.com/";

/// Ops-manager / cloud-manager API client.
#[derive(Debug, Clone)]
pub struct Client<T> {
    transport: T,
}

impl<T: Transport> Client<T> {
    /// Wrap a transport.
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    /// The underlying transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Clusters of a project and across projects.
    pub const fn clusters(&self) -> ClustersService<'_, T> {
        ClustersService { client: self }
    }

    /// Projects.
    pub const fn projects(&self) -> ProjectsService<'_, T> {
        ProjectsService { client: self }
    }

    /// Continuous backup snapshots and their schedule.
    pub const fn snapshots(&self) -> SnapshotsService<'_, T> {
        SnapshotsService { client: self }
    }

    /// Backup configurations.
    pub const fn backup_configs(&self) -> BackupConfigsService<'_, T> {
        BackupConfigsService { client: self }
    }

    /// Organization API keys and their access lists.
    pub const fn api_keys(&self) -> ApiKeysService<'_, T> {
        ApiKeysService { client: self }
    }

    /// Automation configuration and status.
    pub const fn automation(&self) -> AutomationService<'_, T> {
        AutomationService { client: self }
    }

    async fn send<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R> {
        trace!(method = %request.method, path = %request.path, "opsmngr request");
        let body = self.transport.execute(request).await?;
        dbplane_http::decode(body)
    }

    async fn send_empty(&self, request: ApiRequest) -> Result<()> {
        trace!(method = %request.method, path = %request.path, "opsmngr request");
        self.transport.execute(request).await?;
        Ok(())
    }
}

fn group_path(group_id: &str, rest: &str) -> String {
    format!("{API_PATH}/groups/{}{rest}", escape(group_id))
}

fn org_path(org_id: &str, rest: &str) -> String {
    format!("{API_PATH}/orgs/{}{rest}", escape(org_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("p1", "/clusters", "/api/public/v1.0/groups/p1/clusters" ; "plain")]
    #[test_case("a/b", "", "/api/public/v1.0/groups/a%2Fb" ; "slash escaped")]
    #[test_case("p 1", "/automationStatus", "/api/public/v1.0/groups/p%201/automationStatus" ; "space escaped")]
    fn group_paths(group_id: &str, rest: &str, expected: &str) {
        assert_eq!(group_path(group_id, rest), expected);
    }

    #[test]
    fn org_path_escapes_id() {
        assert_eq!(org_path("o=1", "/groups"), "/api/public/v1.0/orgs/o%3D1/groups");
    }
}
