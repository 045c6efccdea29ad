//! Shared helpers for the end-to-end tests.

#![allow(dead_code)]

use dbplane_http::testing::RecordingTransport;
use dbplane_store::atlas;
use dbplane_store::opsmngr;
use dbplane_store::testing::FakeConnector;
use dbplane_store::*;

/// A store for `service` with a fresh fake connector.
pub fn fake_store(service: Service, transport: RecordingTransport) -> (Store<FakeConnector>, FakeConnector) {
    let connector = FakeConnector::new(transport);
    let store = Store::with_connector(Profile::new("e2e", service), connector.clone());
    (store, connector)
}

/// Invoke the contract behind `operation` with placeholder arguments,
/// discarding the result value.
pub async fn invoke(store: &Store<FakeConnector>, operation: Operation) -> Result<()> {
    let (p, c, id) = ("p1", "Cluster0", "x1");
    match operation {
        Operation::ProjectClusters => store.project_clusters(p, None).await.map(drop),
        Operation::AtlasCluster => store.atlas_cluster(p, c).await.map(drop),
        Operation::OpsManagerCluster => store.ops_manager_cluster(p, id).await.map(drop),
        Operation::CreateCluster => store.create_cluster(p, &atlas::Cluster::default()).await.map(drop),
        Operation::UpdateCluster => store.update_cluster(p, c, &atlas::Cluster::default()).await.map(drop),
        Operation::DeleteCluster => store.delete_cluster(p, c).await,
        Operation::PauseCluster => store.pause_cluster(p, c).await.map(drop),
        Operation::StartCluster => store.start_cluster(p, c).await.map(drop),
        Operation::AddSampleData => store.add_sample_data(p, c).await.map(drop),
        Operation::SampleDataStatus => store.sample_data_status(p, id).await.map(drop),
        Operation::ListAllProjectClusters => store.list_all_project_clusters().await.map(drop),
        Operation::Projects => store.projects(None).await.map(drop),
        Operation::OrgProjects => store.org_projects("o1", None).await.map(drop),
        Operation::Project => store.project(p).await.map(drop),
        Operation::CreateProject => store.create_project("name", "o1").await.map(drop),
        Operation::DeleteProject => store.delete_project(p).await,
        Operation::DatabaseUsers => store.database_users(p, None).await.map(drop),
        Operation::DatabaseUser => store.database_user("admin", p, "u").await.map(drop),
        Operation::CreateDatabaseUser => store
            .create_database_user(p, &atlas::DatabaseUser::default())
            .await
            .map(drop),
        Operation::DeleteDatabaseUser => store.delete_database_user("admin", p, "u").await,
        Operation::ProjectIpAccessLists => store.project_ip_access_lists(p, None).await.map(drop),
        Operation::IpAccessList => store.ip_access_list(p, "10.0.0.1").await.map(drop),
        Operation::CreateProjectIpAccessList => store
            .create_project_ip_access_list(p, &[atlas::ProjectIpAccessList::default()])
            .await
            .map(drop),
        Operation::DeleteProjectIpAccessList => store.delete_project_ip_access_list(p, "10.0.0.1").await,
        Operation::CloudProviderRegions => store
            .cloud_provider_regions(p, &atlas::RegionsOptions::default())
            .await
            .map(drop),
        Operation::CloudProviderSnapshots => store.cloud_provider_snapshots(p, c, None).await.map(drop),
        Operation::CloudProviderSnapshot => store.cloud_provider_snapshot(p, c, id).await.map(drop),
        Operation::CreateCloudProviderSnapshot => store
            .create_cloud_provider_snapshot(p, c, &atlas::CreateSnapshotRequest::default())
            .await
            .map(drop),
        Operation::DeleteCloudProviderSnapshot => store.delete_cloud_provider_snapshot(p, c, id).await,
        Operation::ContinuousSnapshots => store.continuous_snapshots(p, c, None).await.map(drop),
        Operation::ContinuousSnapshot => store.continuous_snapshot(p, c, id).await.map(drop),
        Operation::SnapshotSchedule => store.snapshot_schedule(p, id).await.map(drop),
        Operation::UpdateSnapshotSchedule => store
            .update_snapshot_schedule(p, id, &opsmngr::SnapshotSchedule::default())
            .await
            .map(drop),
        Operation::BackupConfigs => store.backup_configs(p, None).await.map(drop),
        Operation::BackupConfig => store.backup_config(p, id).await.map(drop),
        Operation::UpdateBackupConfig => store
            .update_backup_config(p, id, &opsmngr::BackupConfig::default())
            .await
            .map(drop),
        Operation::OrganizationApiKeys => store.organization_api_keys("o1", None).await.map(drop),
        Operation::OrganizationApiKey => store.organization_api_key("o1", id).await.map(drop),
        Operation::CreateOrganizationApiKey => store
            .create_organization_api_key("o1", &ApiKeyInput::default())
            .await
            .map(drop),
        Operation::UpdateOrganizationApiKey => store
            .update_organization_api_key("o1", id, &ApiKeyInput::default())
            .await
            .map(drop),
        Operation::DeleteOrganizationApiKey => store.delete_organization_api_key("o1", id).await,
        Operation::OrganizationApiKeyAccessLists => store
            .organization_api_key_access_lists("o1", id, None)
            .await
            .map(drop),
        Operation::CreateOrganizationApiKeyAccessList => store
            .create_organization_api_key_access_list("o1", id, &[AccessListApiKeyRequest::default()])
            .await
            .map(drop),
        Operation::DeleteOrganizationApiKeyAccessList => store
            .delete_organization_api_key_access_list("o1", id, "10.0.0.1")
            .await,
        Operation::PrivateEndpoints => store.private_endpoints(p).await.map(drop),
        Operation::PrivateEndpoint => store.private_endpoint(p, id).await.map(drop),
        Operation::CreatePrivateEndpoint => store
            .create_private_endpoint(p, &atlas::PrivateEndpointRequest::default())
            .await
            .map(drop),
        Operation::DeletePrivateEndpoint => store.delete_private_endpoint(p, id).await,
        Operation::InterfaceEndpoint => store.interface_endpoint(p, id, "vpce-1").await.map(drop),
        Operation::CreateInterfaceEndpoint => store
            .create_interface_endpoint(p, id, "vpce-1")
            .await
            .map(drop),
        Operation::DeleteInterfaceEndpoint => store.delete_interface_endpoint(p, id, "vpce-1").await,
        Operation::AutomationConfig => store.automation_config(p).await.map(drop),
        Operation::UpdateAutomationConfig => store
            .update_automation_config(p, &opsmngr::AutomationConfig::default())
            .await,
        Operation::AutomationStatus => store.automation_status(p).await.map(drop),
    }
}
