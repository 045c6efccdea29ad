//! # dbplane-atlas
//!
//! Typed client for the cloud-service administration API
//! (`/api/atlas/v1.0`).
//!
//! The client is generic over a [`Transport`], so the same code runs over
//! [`dbplane_http::HttpTransport`] in production and over an in-memory
//! recording transport in tests. Each resource family has its own service
//! borrowed from the [`Client`]:
//!
//! ```text
//! client.clusters().list("proj1", None)
//! client.projects().create("name", "org1")
//! client.private_endpoints().interface("proj1", "pe1", "vpce-1")
//! ```
//!
//! Models only name the fields the CLI reads or writes; everything else the
//! API returns is kept in each model's `extra` map and rendered unchanged.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod access_lists;
mod api_keys;
mod clusters;
mod database_users;
mod private_endpoints;
mod projects;
mod regions;
mod snapshots;

use dbplane_http::{ApiRequest, Result, Transport, escape};
use serde::de::DeserializeOwned;
use tracing::trace;

pub use access_lists::{AccessListService, ProjectIpAccessList};
pub use api_keys::{AccessListApiKey, AccessListApiKeyRequest, ApiKey, ApiKeyInput, ApiKeyRole, ApiKeysService};
pub use clusters::{Cluster, ClustersService, ConnectionStrings, ProviderSettings, SampleDatasetJob};
pub use database_users::{DatabaseUser, DatabaseUsersService, Role};
pub use private_endpoints::{
    InterfaceEndpointConnection, PrivateEndpointConnection, PrivateEndpointRequest,
    PrivateEndpointsService,
};
pub use projects::{CreateProjectRequest, Project, ProjectsService};
pub use regions::{AvailableRegion, CloudProvider, CloudProviders, InstanceSize, RegionsOptions, RegionsService};
pub use snapshots::{
    CloudProviderSnapshot, ContinuousSnapshot, CreateSnapshotRequest, SnapshotTimestamp,
    SnapshotsService,
};

/// Path prefix of every endpoint.
pub const API_PATH: &str = "/api/atlas/v1.0";

/// Public cloud endpoint used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://cloud.mongodb.com/";

/// Cloud-service API client.
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

    /// Clusters and sample data.
    pub const fn clusters(&self) -> ClustersService<'_, T> {
        ClustersService { client: self }
    }

    /// Projects.
    pub const fn projects(&self) -> ProjectsService<'_, T> {
        ProjectsService { client: self }
    }

    /// Database users.
    pub const fn database_users(&self) -> DatabaseUsersService<'_, T> {
        DatabaseUsersService { client: self }
    }

    /// Project IP access list.
    pub const fn access_lists(&self) -> AccessListService<'_, T> {
        AccessListService { client: self }
    }

    /// Cloud provider regions.
    pub const fn regions(&self) -> RegionsService<'_, T> {
        RegionsService { client: self }
    }

    /// Cloud provider and continuous backup snapshots.
    pub const fn snapshots(&self) -> SnapshotsService<'_, T> {
        SnapshotsService { client: self }
    }

    /// Organization API keys and their access lists.
    pub const fn api_keys(&self) -> ApiKeysService<'_, T> {
        ApiKeysService { client: self }
    }

    /// Private endpoints and interface endpoints.
    pub const fn private_endpoints(&self) -> PrivateEndpointsService<'_, T> {
        PrivateEndpointsService { client: self }
    }

    async fn send<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R> {
        trace!(method = %request.method, path = %request.path, "atlas request");
        let body = self.transport.execute(request).await?;
        dbplane_http::decode(body)
    }

    async fn send_empty(&self, request: ApiRequest) -> Result<()> {
        trace!(method = %request.method, path = %request.path, "atlas request");
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
