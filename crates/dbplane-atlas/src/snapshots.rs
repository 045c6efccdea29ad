//! Cloud provider snapshots and legacy continuous backup snapshots.

use chrono::{DateTime, Utc};
use dbplane_http::{ApiRequest, ListOptions, Page, Result, Transport, escape};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Client, group_path};

/// A cloud provider snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudProviderSnapshot {
    /// Snapshot ID.
    pub id: String,
    /// When the snapshot was taken.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// When the snapshot is deleted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Server version at snapshot time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mongod_version: Option<String>,
    /// `onDemand` or `scheduled`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_type: Option<String>,
    /// `queued`, `inProgress`, `completed` or `failed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_size_bytes: Option<u64>,
    /// Fields this client does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of an on-demand snapshot request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSnapshotRequest {
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Days to keep the snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention_in_days: Option<u32>,
}

/// A continuous backup snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinuousSnapshot {
    /// Snapshot ID.
    pub id: String,
    /// Cluster the snapshot belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_id: Option<String>,
    /// Owning project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// Whether the snapshot finished.
    #[serde(default)]
    pub complete: bool,
    /// Point in time the snapshot captures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<SnapshotTimestamp>,
    /// Expiry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,
    /// Kept until deleted manually.
    #[serde(default)]
    pub does_not_expire: bool,
    /// Fields this client does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Oplog timestamp of a continuous snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotTimestamp {
    /// Wall-clock time.
    pub date: DateTime<Utc>,
    /// Ordinal within the second.
    #[serde(default)]
    pub increment: u64,
}

/// `/groups/{id}/clusters/{name}/backup/snapshots` and `/groups/{id}/clusters/{name}/snapshots`.
#[derive(Debug)]
pub struct SnapshotsService<'a, T> {
    pub(crate) client: &'a Client<T>,
}

fn cloud_path(group_id: &str, cluster: &str, rest: &str) -> String {
    group_path(group_id, &format!("/clusters/{}/backup/snapshots{rest}", escape(cluster)))
}

fn continuous_path(group_id: &str, cluster: &str, rest: &str) -> String {
    group_path(group_id, &format!("/clusters/{}/snapshots{rest}", escape(cluster)))
}

impl<T: Transport> SnapshotsService<'_, T> {
    /// List the cloud provider snapshots of a cluster.
    pub async fn list(
        &self,
        group_id: &str,
        cluster: &str,
        opts: Option<&ListOptions>,
    ) -> Result<Page<CloudProviderSnapshot>> {
        let request = ApiRequest::get(cloud_path(group_id, cluster, "")).with_list_options(opts);
        self.client.send(request).await
    }

    /// Get one cloud provider snapshot.
    pub async fn get(&self, group_id: &str, cluster: &str, snapshot_id: &str) -> Result<CloudProviderSnapshot> {
        let path = cloud_path(group_id, cluster, &format!("/{}", escape(snapshot_id)));
        self.client.send(ApiRequest::get(path)).await
    }

    /// Take an on-demand snapshot.
    pub async fn create(
        &self,
        group_id: &str,
        cluster: &str,
        request: &CreateSnapshotRequest,
    ) -> Result<CloudProviderSnapshot> {
        let request = ApiRequest::post(cloud_path(group_id, cluster, "")).with_json(request)?;
        self.client.send(request).await
    }

    /// Delete a cloud provider snapshot.
    pub async fn delete(&self, group_id: &str, cluster: &str, snapshot_id: &str) -> Result<()> {
        let path = cloud_path(group_id, cluster, &format!("/{}", escape(snapshot_id)));
        self.client.send_empty(ApiRequest::delete(path)).await
    }

    /// List the continuous backup snapshots of a cluster.
    pub async fn list_continuous(
        &self,
        group_id: &str,
        cluster: &str,
        opts: Option<&ListOptions>,
    ) -> Result<Page<ContinuousSnapshot>> {
        let request = ApiRequest::get(continuous_path(group_id, cluster, "")).with_list_options(opts);
        self.client.send(request).await
    }

    /// Get one continuous backup snapshot.
    pub async fn get_continuous(&self, group_id: &str, cluster: &str, snapshot_id: &str) -> Result<ContinuousSnapshot> {
        let path = continuous_path(group_id, cluster, &format!("/{}", escape(snapshot_id)));
        self.client.send(ApiRequest::get(path)).await
    }
}
