//! The static dispatch table.
//!
//! Every façade operation is listed once in [`Operation`], and
//! [`Operation::support`] says which deployment modes can serve it. The
//! match is exhaustive, so a new operation cannot be added without deciding
//! where it runs.

use std::fmt;

use serde::Serialize;

use crate::config::Service;

/// Concrete backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    /// Cloud-service API.
    Atlas,
    /// Ops-manager / cloud-manager public API.
    OpsManager,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Atlas => "atlas",
            Self::OpsManager => "ops-manager",
        })
    }
}

/// Which deployment modes can serve an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Support {
    /// Every mode, each through its own backend.
    All,
    /// Only the cloud service.
    Cloud,
    /// Only ops-manager and cloud-manager.
    SelfHosted,
}

/// Every operation the façade exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Operation {
    // clusters
    ProjectClusters,
    AtlasCluster,
    OpsManagerCluster,
    CreateCluster,
    UpdateCluster,
    DeleteCluster,
    PauseCluster,
    StartCluster,
    AddSampleData,
    SampleDataStatus,
    ListAllProjectClusters,
    // projects
    Projects,
    OrgProjects,
    Project,
    CreateProject,
    DeleteProject,
    // database users
    DatabaseUsers,
    DatabaseUser,
    CreateDatabaseUser,
    DeleteDatabaseUser,
    // project IP access list
    ProjectIpAccessLists,
    IpAccessList,
    CreateProjectIpAccessList,
    DeleteProjectIpAccessList,
    // regions
    CloudProviderRegions,
    // cloud provider backups
    CloudProviderSnapshots,
    CloudProviderSnapshot,
    CreateCloudProviderSnapshot,
    DeleteCloudProviderSnapshot,
    // continuous backups
    ContinuousSnapshots,
    ContinuousSnapshot,
    SnapshotSchedule,
    UpdateSnapshotSchedule,
    BackupConfigs,
    BackupConfig,
    UpdateBackupConfig,
    // organization API keys
    OrganizationApiKeys,
    OrganizationApiKey,
    CreateOrganizationApiKey,
    UpdateOrganizationApiKey,
    DeleteOrganizationApiKey,
    OrganizationApiKeyAccessLists,
    CreateOrganizationApiKeyAccessList,
    DeleteOrganizationApiKeyAccessList,
    // private endpoints
    PrivateEndpoints,
    PrivateEndpoint,
    CreatePrivateEndpoint,
    DeletePrivateEndpoint,
    InterfaceEndpoint,
    CreateInterfaceEndpoint,
    DeleteInterfaceEndpoint,
    // automation
    AutomationConfig,
    UpdateAutomationConfig,
    AutomationStatus,
}

impl Operation {
    /// Every operation, in declaration order.
    pub const ALL: &'static [Self] = &[
        Self::ProjectClusters,
        Self::AtlasCluster,
        Self::OpsManagerCluster,
        Self::CreateCluster,
        Self::UpdateCluster,
        Self::DeleteCluster,
        Self::PauseCluster,
        Self::StartCluster,
        Self::AddSampleData,
        Self::SampleDataStatus,
        Self::ListAllProjectClusters,
        Self::Projects,
        Self::OrgProjects,
        Self::Project,
        Self::CreateProject,
        Self::DeleteProject,
        Self::DatabaseUsers,
        Self::DatabaseUser,
        Self::CreateDatabaseUser,
        Self::DeleteDatabaseUser,
        Self::ProjectIpAccessLists,
        Self::IpAccessList,
        Self::CreateProjectIpAccessList,
        Self::DeleteProjectIpAccessList,
        Self::CloudProviderRegions,
        Self::CloudProviderSnapshots,
        Self::CloudProviderSnapshot,
        Self::CreateCloudProviderSnapshot,
        Self::DeleteCloudProviderSnapshot,
        Self::ContinuousSnapshots,
        Self::ContinuousSnapshot,
        Self::SnapshotSchedule,
        Self::UpdateSnapshotSchedule,
        Self::BackupConfigs,
        Self::BackupConfig,
        Self::UpdateBackupConfig,
        Self::OrganizationApiKeys,
        Self::OrganizationApiKey,
        Self::CreateOrganizationApiKey,
        Self::UpdateOrganizationApiKey,
        Self::DeleteOrganizationApiKey,
        Self::OrganizationApiKeyAccessLists,
        Self::CreateOrganizationApiKeyAccessList,
        Self::DeleteOrganizationApiKeyAccessList,
        Self::PrivateEndpoints,
        Self::PrivateEndpoint,
        Self::CreatePrivateEndpoint,
        Self::DeletePrivateEndpoint,
        Self::InterfaceEndpoint,
        Self::CreateInterfaceEndpoint,
        Self::DeleteInterfaceEndpoint,
        Self::AutomationConfig,
        Self::UpdateAutomationConfig,
        Self::AutomationStatus,
    ];

    /// Which deployment modes can serve this operation.
    #[must_use]
    pub const fn support(self) -> Support {
        match self {
            Self::ProjectClusters
            | Self::Projects
            | Self::OrgProjects
            | Self::Project
            | Self::CreateProject
            | Self::DeleteProject
            | Self::ContinuousSnapshots
            | Self::ContinuousSnapshot
            | Self::OrganizationApiKeys
            | Self::OrganizationApiKey
            | Self::CreateOrganizationApiKey
            | Self::UpdateOrganizationApiKey
            | Self::DeleteOrganizationApiKey
            | Self::OrganizationApiKeyAccessLists
            | Self::CreateOrganizationApiKeyAccessList
            | Self::DeleteOrganizationApiKeyAccessList => Support::All,

            Self::AtlasCluster
            | Self::CreateCluster
            | Self::UpdateCluster
            | Self::DeleteCluster
            | Self::PauseCluster
            | Self::StartCluster
            | Self::AddSampleData
            | Self::SampleDataStatus
            | Self::DatabaseUsers
            | Self::DatabaseUser
            | Self::CreateDatabaseUser
            | Self::DeleteDatabaseUser
            | Self::ProjectIpAccessLists
            | Self::IpAccessList
            | Self::CreateProjectIpAccessList
            | Self::DeleteProjectIpAccessList
            | Self::CloudProviderRegions
            | Self::CloudProviderSnapshots
            | Self::CloudProviderSnapshot
            | Self::CreateCloudProviderSnapshot
            | Self::DeleteCloudProviderSnapshot
            | Self::PrivateEndpoints
            | Self::PrivateEndpoint
            | Self::CreatePrivateEndpoint
            | Self::DeletePrivateEndpoint
            | Self::InterfaceEndpoint
            | Self::CreateInterfaceEndpoint
            | Self::DeleteInterfaceEndpoint => Support::Cloud,

            Self::OpsManagerCluster
            | Self::ListAllProjectClusters
            | Self::SnapshotSchedule
            | Self::UpdateSnapshotSchedule
            | Self::BackupConfigs
            | Self::BackupConfig
            | Self::UpdateBackupConfig
            | Self::AutomationConfig
            | Self::UpdateAutomationConfig
            | Self::AutomationStatus => Support::SelfHosted,
        }
    }

    /// The backend that serves this operation in `service`, if any.
    #[must_use]
    pub const fn backend(self, service: Service) -> Option<Backend> {
        match (self.support(), service.backend()) {
            (Support::All, backend) => Some(backend),
            (Support::Cloud, Backend::Atlas) => Some(Backend::Atlas),
            (Support::SelfHosted, Backend::OpsManager) => Some(Backend::OpsManager),
            _ => None,
        }
    }

    /// Whether `service` can serve this operation.
    #[must_use]
    pub const fn is_supported(self, service: Service) -> bool {
        self.backend(service).is_some()
    }

    /// Name used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ProjectClusters => "ProjectClusters",
            Self::AtlasCluster => "AtlasCluster",
            Self::OpsManagerCluster => "OpsManagerCluster",
            Self::CreateCluster => "CreateCluster",
            Self::UpdateCluster => "UpdateCluster",
            Self::DeleteCluster => "DeleteCluster",
            Self::PauseCluster => "PauseCluster",
            Self::StartCluster => "StartCluster",
            Self::AddSampleData => "AddSampleData",
            Self::SampleDataStatus => "SampleDataStatus",
            Self::ListAllProjectClusters => "ListAllProjectClusters",
            Self::Projects => "Projects",
            Self::OrgProjects => "OrgProjects",
            Self::Project => "Project",
            Self::CreateProject => "CreateProject",
            Self::DeleteProject => "DeleteProject",
            Self::DatabaseUsers => "DatabaseUsers",
            Self::DatabaseUser => "DatabaseUser",
            Self::CreateDatabaseUser => "CreateDatabaseUser",
            Self::DeleteDatabaseUser => "DeleteDatabaseUser",
            Self::ProjectIpAccessLists => "ProjectIPAccessLists",
            Self::IpAccessList => "IPAccessList",
            Self::CreateProjectIpAccessList => "CreateProjectIPAccessList",
            Self::DeleteProjectIpAccessList => "DeleteProjectIPAccessList",
            Self::CloudProviderRegions => "CloudProviderRegions",
            Self::CloudProviderSnapshots => "CloudProviderSnapshots",
            Self::CloudProviderSnapshot => "CloudProviderSnapshot",
            Self::CreateCloudProviderSnapshot => "CreateCloudProviderSnapshot",
            Self::DeleteCloudProviderSnapshot => "DeleteCloudProviderSnapshot",
            Self::ContinuousSnapshots => "ContinuousSnapshots",
            Self::ContinuousSnapshot => "ContinuousSnapshot",
            Self::SnapshotSchedule => "SnapshotSchedule",
            Self::UpdateSnapshotSchedule => "UpdateSnapshotSchedule",
            Self::BackupConfigs => "BackupConfigs",
            Self::BackupConfig => "BackupConfig",
            Self::UpdateBackupConfig => "UpdateBackupConfig",
            Self::OrganizationApiKeys => "OrganizationAPIKeys",
            Self::OrganizationApiKey => "OrganizationAPIKey",
            Self::CreateOrganizationApiKey => "CreateOrganizationAPIKey",
            Self::UpdateOrganizationApiKey => "UpdateOrganizationAPIKey",
            Self::DeleteOrganizationApiKey => "DeleteOrganizationAPIKey",
            Self::OrganizationApiKeyAccessLists => "OrganizationAPIKeyAccessLists",
            Self::CreateOrganizationApiKeyAccessList => "CreateOrganizationAPIKeyAccessList",
            Self::DeleteOrganizationApiKeyAccessList => "DeleteOrganizationAPIKeyAccessList",
            Self::PrivateEndpoints => "PrivateEndpoints",
            Self::PrivateEndpoint => "PrivateEndpoint",
            Self::CreatePrivateEndpoint => "CreatePrivateEndpoint",
            Self::DeletePrivateEndpoint => "DeletePrivateEndpoint",
            Self::InterfaceEndpoint => "InterfaceEndpoint",
            Self::CreateInterfaceEndpoint => "CreateInterfaceEndpoint",
            Self::DeleteInterfaceEndpoint => "DeleteInterfaceEndpoint",
            Self::AutomationConfig => "AutomationConfig",
            Self::UpdateAutomationConfig => "UpdateAutomationConfig",
            Self::AutomationStatus => "AutomationStatus",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Operation {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
