//! Backup contracts: cloud provider snapshots, continuous snapshots,
//! snapshot schedules and backup configurations.

use std::future::Future;

use dbplane_atlas as atlas;
use dbplane_http::{ListOptions, Page};
use dbplane_opsmngr as opsmngr;
use serde::Serialize;

use crate::connector::Connector;
use crate::error::{Context, Result};
use crate::operation::Operation;
use crate::store::{Handle, Store};

/// Continuous snapshots, in the shape of the backend that listed them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContinuousSnapshots {
    /// Cloud-service snapshots.
    Atlas(Page<atlas::ContinuousSnapshot>),
    /// Ops-manager snapshots.
    OpsManager(Page<opsmngr::ContinuousSnapshot>),
}

/// One continuous snapshot, in the shape of its backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContinuousSnapshot {
    /// Cloud-service snapshot.
    Atlas(atlas::ContinuousSnapshot),
    /// Ops-manager snapshot.
    OpsManager(opsmngr::ContinuousSnapshot),
}

impl ContinuousSnapshot {
    /// Snapshot ID.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Atlas(s) => &s.id,
            Self::OpsManager(s) => &s.id,
        }
    }

    /// Whether the snapshot finished.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        match self {
            Self::Atlas(s) => s.complete,
            Self::OpsManager(s) => s.complete,
        }
    }
}

/// Lists cloud provider snapshots.
pub trait SnapshotsLister {
    /// List the snapshots of a cluster.
    fn cloud_provider_snapshots(
        &self,
        project_id: &str,
        cluster_name: &str,
        opts: Option<&ListOptions>,
    ) -> impl Future<Output = Result<Page<atlas::CloudProviderSnapshot>>> + Send;
}

/// Describes a cloud provider snapshot.
pub trait SnapshotsDescriber {
    /// Get one snapshot.
    fn cloud_provider_snapshot(
        &self,
        project_id: &str,
        cluster_name: &str,
        snapshot_id: &str,
    ) -> impl Future<Output = Result<atlas::CloudProviderSnapshot>> + Send;
}

/// Takes on-demand cloud provider snapshots.
pub trait SnapshotsCreator {
    /// Take a snapshot.
    fn create_cloud_provider_snapshot(
        &self,
        project_id: &str,
        cluster_name: &str,
        request: &atlas::CreateSnapshotRequest,
    ) -> impl Future<Output = Result<atlas::CloudProviderSnapshot>> + Send;
}

/// Deletes cloud provider snapshots.
pub trait SnapshotsDeleter {
    /// Delete a snapshot.
    fn delete_cloud_provider_snapshot(
        &self,
        project_id: &str,
        cluster_name: &str,
        snapshot_id: &str,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Lists continuous backup snapshots.
pub trait ContinuousSnapshotsLister {
    /// List the snapshots of a cluster; cloud addresses the cluster by name,
    /// ops-manager by ID.
    fn continuous_snapshots(
        &self,
        project_id: &str,
        cluster: &str,
        opts: Option<&ListOptions>,
    ) -> impl Future<Output = Result<ContinuousSnapshots>> + Send;
}

/// Describes a continuous backup snapshot.
pub trait ContinuousSnapshotDescriber {
    /// Get one snapshot.
    fn continuous_snapshot(
        &self,
        project_id: &str,
        cluster: &str,
        snapshot_id: &str,
    ) -> impl Future<Output = Result<ContinuousSnapshot>> + Send;
}

/// Describes a snapshot schedule.
pub trait SnapshotScheduleDescriber {
    /// Get the schedule of a cluster.
    fn snapshot_schedule(
        &self,
        project_id: &str,
        cluster_id: &str,
    ) -> impl Future<Output = Result<opsmngr::SnapshotSchedule>> + Send;
}

/// Updates a snapshot schedule.
pub trait SnapshotScheduleUpdater {
    /// Change the schedule of a cluster.
    fn update_snapshot_schedule(
        &self,
        project_id: &str,
        cluster_id: &str,
        schedule: &opsmngr::SnapshotSchedule,
    ) -> impl Future<Output = Result<opsmngr::SnapshotSchedule>> + Send;
}

/// Lists backup configurations.
pub trait BackupConfigLister {
    /// List the backup configurations of a project.
    fn backup_configs(
        &self,
        project_id: &str,
        opts: Option<&ListOptions>,
    ) -> impl Future<Output = Result<Page<opsmngr::BackupConfig>>> + Send;
}

/// Describes a backup configuration.
pub trait BackupConfigGetter {
    /// Get the backup configuration of a cluster.
    fn backup_config(
        &self,
        project_id: &str,
        cluster_id: &str,
    ) -> impl Future<Output = Result<opsmngr::BackupConfig>> + Send;
}

/// Updates a backup configuration.
pub trait BackupConfigUpdater {
    /// Change the backup configuration of a cluster.
    fn update_backup_config(
        &self,
        project_id: &str,
        cluster_id: &str,
        config: &opsmngr::BackupConfig,
    ) -> impl Future<Output = Result<opsmngr::BackupConfig>> + Send;
}

impl<C: Connector> SnapshotsLister for Store<C> {
    async fn cloud_provider_snapshots(
        &self,
        project_id: &str,
        cluster_name: &str,
        opts: Option<&ListOptions>,
    ) -> Result<Page<atlas::CloudProviderSnapshot>> {
        let op = Operation::CloudProviderSnapshots;
        self.atlas(op)?
            .snapshots()
            .list(project_id, cluster_name, opts)
            .await
            .context(op)
    }
}

impl<C: Connector> SnapshotsDescriber for Store<C> {
    async fn cloud_provider_snapshot(
        &self,
        project_id: &str,
        cluster_name: &str,
        snapshot_id: &str,
    ) -> Result<atlas::CloudProviderSnapshot> {
        let op = Operation::CloudProviderSnapshot;
        self.atlas(op)?
            .snapshots()
            .get(project_id, cluster_name, snapshot_id)
            .await
            .context(op)
    }
}

impl<C: Connector> SnapshotsCreator for Store<C> {
    async fn create_cloud_provider_snapshot(
        &self,
        project_id: &str,
        cluster_name: &str,
        request: &atlas::CreateSnapshotRequest,
    ) -> Result<atlas::CloudProviderSnapshot> {
        let op = Operation::CreateCloudProviderSnapshot;
        self.atlas(op)?
            .snapshots()
            .create(project_id, cluster_name, request)
            .await
            .context(op)
    }
}

impl<C: Connector> SnapshotsDeleter for Store<C> {
    async fn delete_cloud_provider_snapshot(&self, project_id: &str, cluster_name: &str, snapshot_id: &str) -> Result<()> {
        let op = Operation::DeleteCloudProviderSnapshot;
        self.atlas(op)?
            .snapshots()
            .delete(project_id, cluster_name, snapshot_id)
            .await
            .context(op)
    }
}

impl<C: Connector> ContinuousSnapshotsLister for Store<C> {
    async fn continuous_snapshots(
        &self,
        project_id: &str,
        cluster: &str,
        opts: Option<&ListOptions>,
    ) -> Result<ContinuousSnapshots> {
        let op = Operation::ContinuousSnapshots;
        match self.handle(op)? {
            Handle::Atlas(client) => client
                .snapshots()
                .list_continuous(project_id, cluster, opts)
                .await
                .map(ContinuousSnapshots::Atlas),
            Handle::OpsManager(client) => client
                .snapshots()
                .list(project_id, cluster, opts)
                .await
                .map(ContinuousSnapshots::OpsManager),
        }
        .context(op)
    }
}

impl<C: Connector> ContinuousSnapshotDescriber for Store<C> {
    async fn continuous_snapshot(&self, project_id: &str, cluster: &str, snapshot_id: &str) -> Result<ContinuousSnapshot> {
        let op = Operation::ContinuousSnapshot;
        match self.handle(op)? {
            Handle::Atlas(client) => client
                .snapshots()
                .get_continuous(project_id, cluster, snapshot_id)
                .await
                .map(ContinuousSnapshot::Atlas),
            Handle::OpsManager(client) => client
                .snapshots()
                .get(project_id, cluster, snapshot_id)
                .await
                .map(ContinuousSnapshot::OpsManager),
        }
        .context(op)
    }
}

impl<C: Connector> SnapshotScheduleDescriber for Store<C> {
    async fn snapshot_schedule(&self, project_id: &str, cluster_id: &str) -> Result<opsmngr::SnapshotSchedule> {
        let op = Operation::SnapshotSchedule;
        self.ops_manager(op)?
            .snapshots()
            .schedule(project_id, cluster_id)
            .await
            .context(op)
    }
}

impl<C: Connector> SnapshotScheduleUpdater for Store<C> {
    async fn update_snapshot_schedule(
        &self,
        project_id: &str,
        cluster_id: &str,
        schedule: &opsmngr::SnapshotSchedule,
    ) -> Result<opsmngr::SnapshotSchedule> {
        let op = Operation::UpdateSnapshotSchedule;
        self.ops_manager(op)?
            .snapshots()
            .update_schedule(project_id, cluster_id, schedule)
            .await
            .context(op)
    }
}

impl<C: Connector> BackupConfigLister for Store<C> {
    async fn backup_configs(&self, project_id: &str, opts: Option<&ListOptions>) -> Result<Page<opsmngr::BackupConfig>> {
        let op = Operation::BackupConfigs;
        self.ops_manager(op)?
            .backup_configs()
            .list(project_id, opts)
            .await
            .context(op)
    }
}

impl<C: Connector> BackupConfigGetter for Store<C> {
    async fn backup_config(&self, project_id: &str, cluster_id: &str) -> Result<opsmngr::BackupConfig> {
        let op = Operation::BackupConfig;
        self.ops_manager(op)?
            .backup_configs()
            .get(project_id, cluster_id)
            .await
            .context(op)
    }
}

impl<C: Connector> BackupConfigUpdater for Store<C> {
    async fn update_backup_config(
        &self,
        project_id: &str,
        cluster_id: &str,
        config: &opsmngr::BackupConfig,
    ) -> Result<opsmngr::BackupConfig> {
        let op = Operation::UpdateBackupConfig;
        self.ops_manager(op)?
            .backup_configs()
            .update(project_id, cluster_id, config)
            .await
            .context(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Service;
    use crate::testing::store;
    use dbplane_http::Method;
    use dbplane_http::testing::RecordingTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_continuous_snapshots_route_by_service() {
        let transport = RecordingTransport::new()
            .with_response(
                Method::Get,
                "/api/atlas/v1.0/groups/p1/clusters/Cluster0/snapshots/s1",
                json!({"id": "s1", "complete": true}),
            )
            .with_response(
                Method::Get,
                "/api/public/v1.0/groups/p1/clusters/c1/snapshots/s1",
                json!({"id": "s1", "complete": false, "clusterId": "c1"}),
            );

        let cloud = store(Service::Cloud, transport.clone())
            .continuous_snapshot("p1", "Cluster0", "s1")
            .await
            .expect("cloud");
        assert!(matches!(cloud, ContinuousSnapshot::Atlas(_)));
        assert!(cloud.is_complete());

        let om = store(Service::OpsManager, transport)
            .continuous_snapshot("p1", "c1", "s1")
            .await
            .expect("ops manager");
        assert!(matches!(om, ContinuousSnapshot::OpsManager(_)));
        assert_eq!(om.id(), "s1");
    }

    #[tokio::test]
    async fn test_schedule_is_self_hosted_only() {
        let store = store(Service::Cloud, RecordingTransport::new());
        let err = store.snapshot_schedule("p1", "c1").await.expect_err("unsupported");
        assert_eq!(err.to_string(), "SnapshotSchedule is not supported for service cloud");
    }

    #[tokio::test]
    async fn test_update_backup_config_forwards_body() {
        let transport = RecordingTransport::new().with_response(
            Method::Patch,
            "/api/public/v1.0/groups/p1/backupConfigs/c1",
            json!({"groupId": "p1", "clusterId": "c1", "statusName": "STARTED"}),
        );
        let store = store(Service::CloudManager, transport.clone());
        let config = opsmngr::BackupConfig {
            status_name: Some("STARTED".into()),
            ..opsmngr::BackupConfig::default()
        };

        let updated = store.update_backup_config("p1", "c1", &config).await.expect("update");
        assert_eq!(updated.cluster_id.as_deref(), Some("c1"));
        assert_eq!(
            transport.last_request().and_then(|r| r.body),
            Some(json!({"statusName": "STARTED"}))
        );
    }

    #[tokio::test]
    async fn test_create_cloud_snapshot() {
        let transport = RecordingTransport::new().with_response(
            Method::Post,
            "/api/atlas/v1.0/groups/p1/clusters/Cluster0/backup/snapshots",
            json!({"id": "s9", "status": "queued"}),
        );
        let store = store(Service::Cloud, transport);
        let request = atlas::CreateSnapshotRequest {
            description: Some("manual".into()),
            retention_in_days: Some(1),
        };

        let snapshot = store
            .create_cloud_provider_snapshot("p1", "Cluster0", &request)
            .await
            .expect("create");
        assert_eq!(snapshot.id, "s9");
    }
}
