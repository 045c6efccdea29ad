//! # dbplane-store
//!
//! Backend selection and capability dispatch for dbplane.
//!
//! A [`Store`] is built from a [`Profile`]. The profile's [`Service`] fixes
//! which backend every call goes to:
//!
//! ```text
//!                 ┌────────────────────────────┐
//!  command ──────►│ Store (capability traits)  │
//!                 │  Operation × Service table │
//!                 └─────────────┬──────────────┘
//!                  supported?   │   no ──► StoreError::UnsupportedService
//!                               ▼
//!            ┌──────────────────┴──────────────────┐
//!            ▼                                     ▼
//!   ┌─────────────────┐                 ┌──────────────────────┐
//!   │  atlas::Client  │  cloud          │  opsmngr::Client     │  ops-manager,
//!   │ /api/atlas/v1.0 │                 │  /api/public/v1.0    │  cloud-manager
//!   └─────────────────┘                 └──────────────────────┘
//! ```
//!
//! Commands depend on the narrow traits they need (for example
//! [`ClusterPauser`]) rather than on `Store` itself, so they can be driven by
//! a fake in tests.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod access_lists;
pub mod api_keys;
pub mod automation;
pub mod backups;
pub mod clusters;
pub mod config;
pub mod connector;
pub mod database_users;
pub mod error;
pub mod operation;
pub mod private_endpoints;
pub mod projects;
pub mod regions;
pub mod store;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use access_lists::{
    ProjectIpAccessListCreator, ProjectIpAccessListDeleter, ProjectIpAccessListDescriber,
    ProjectIpAccessListLister,
};
pub use api_keys::{
    AccessListApiKey, AccessListApiKeyRequest, ApiKey, ApiKeyInput, ApiKeyRole,
    OrganizationApiKeyAccessListCreator, OrganizationApiKeyAccessListDeleter,
    OrganizationApiKeyAccessListLister, OrganizationApiKeyCreator, OrganizationApiKeyDeleter,
    OrganizationApiKeyDescriber, OrganizationApiKeyLister, OrganizationApiKeyUpdater,
};
pub use automation::{AutomationGetter, AutomationStatusDescriber, AutomationUpdater};
pub use backups::{
    BackupConfigGetter, BackupConfigLister, BackupConfigUpdater, ContinuousSnapshot,
    ContinuousSnapshotDescriber, ContinuousSnapshots, ContinuousSnapshotsLister,
    SnapshotScheduleDescriber, SnapshotScheduleUpdater, SnapshotsCreator, SnapshotsDeleter,
    SnapshotsDescriber, SnapshotsLister,
};
pub use clusters::{
    AllClustersLister, AtlasClusterDescriber, AtlasClusterGetterUpdater, AtlasClusterQuickStarter,
    ClusterCreator, ClusterDeleter, ClusterLister, ClusterPauser, ClusterStarter, ClusterUpdater,
    OpsManagerClusterDescriber, ProjectClusters, SampleDataAdder, SampleDataStatusDescriber,
};
pub use config::{ConfigError, ConfigFile, DEFAULT_PROFILE, ENV_PREFIX, Profile, Service};
pub use connector::{Connector, HttpConnector, base_url};
pub use database_users::{
    DatabaseUserCreator, DatabaseUserDeleter, DatabaseUserDescriber, DatabaseUserLister,
};
pub use error::{Result, StoreError};
pub use operation::{Backend, Operation, Support};
pub use private_endpoints::{
    InterfaceEndpointCreator, InterfaceEndpointDeleter, InterfaceEndpointDescriber,
    InterfaceEndpointManager, PrivateEndpointCreator, PrivateEndpointDeleter,
    PrivateEndpointDescriber, PrivateEndpointLister,
};
pub use projects::{
    OrgProjectLister, Project, ProjectCreator, ProjectDeleter, ProjectDescriber, ProjectLister,
    Projects,
};
pub use regions::CloudProviderRegionsLister;
pub use store::{Handle, Store};

pub use dbplane_atlas as atlas;
pub use dbplane_http::{HttpError, ListOptions, Page};
pub use dbplane_opsmngr as opsmngr;
