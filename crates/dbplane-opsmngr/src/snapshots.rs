//! Continuous backup snapshots and snapshot schedules.

use chrono::{DateTime, Utc};
use dbplane_http::{ApiRequest, ListOptions, Page, Result, Transport, escape};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Client, group_path};

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
    /// Snapshot may not be consistent across shards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_possibly_inconsistent: Option<bool>,
    /// Fields this client does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Oplog timestamp of a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotTimestamp {
    /// Wall-clock time.
    pub date: DateTime<Utc>,
    /// Ordinal within the second.
    #[serde(default)]
    pub increment: u64,
}

/// When snapshots are taken and how long they are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotSchedule {
    /// Owning project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// Cluster the schedule applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_id: Option<String>,
    /// Hours between snapshots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_interval_hours: Option<u32>,
    /// Days to keep base snapshots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_retention_days: Option<u32>,
    /// Days to keep daily snapshots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_snapshot_retention_days: Option<u32>,
    /// Weeks to keep weekly snapshots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_snapshot_retention_weeks: Option<u32>,
    /// Months to keep monthly snapshots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_snapshot_retention_months: Option<u32>,
    /// Point-in-time restore window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_in_time_window_hours: Option<u32>,
    /// UTC hour of the daily snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_hour_of_day: Option<u32>,
    /// Minute of the daily snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_minute_of_hour: Option<u32>,
    /// Fields this client does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `/groups/{id}/clusters/{id}/snapshots` and `/groups/{id}/backupConfigs/{id}/snapshotSchedule`.
#[derive(Debug)]
pub struct SnapshotsService<'a, T> {
    pub(crate) client: &'a Client<T>,
}

fn snapshots_path(group_id: &str, cluster_id: &str, rest: &str) -> String {
    group_path(group_id, &format!("/clusters/{}/snapshots{rest}", escape(cluster_id)))
}

fn schedule_path(group_id: &str, cluster_id: &str) -> String {
    group_path(
        group_id,
        &format!("/backupConfigs/{}/snapshotSchedule", escape(cluster_id)),
    )
}

impl<T: Transport> SnapshotsService<'_, T> {
    /// List the snapshots of a cluster.
    pub async fn list(
        &self,
        group_id: &str,
        cluster_id: &str,
        opts: Option<&ListOptions>,
    ) -> Result<Page<ContinuousSnapshot>> {
        let request = ApiRequest::get(snapshots_path(group_id, cluster_id, "")).with_list_options(opts);
        self.client.send(request).await
    }

    /// Get one snapshot.
    pub async fn get(&self, group_id: &str, cluster_id: &str, snapshot_id: &str) -> Result<ContinuousSnapshot> {
        let path = snapshots_path(group_id, cluster_id, &format!("/{}", escape(snapshot_id)));
        self.client.send(ApiRequest::get(path)).await
    }

    /// Get the snapshot schedule of a cluster.
    pub async fn schedule(&self, group_id: &str, cluster_id: &str) -> Result<SnapshotSchedule> {
        self.client
            .send(ApiRequest::get(schedule_path(group_id, cluster_id)))
            .await
    }

    /// Change the snapshot schedule; unset fields are left as they are.
    pub async fn update_schedule(
        &self,
        group_id: &str,
        cluster_id: &str,
        schedule: &SnapshotSchedule,
    ) -> Result<SnapshotSchedule> {
        let request = ApiRequest::patch(schedule_path(group_id, cluster_id)).with_json(schedule)?;
        self.client.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbplane_http::Method;
    use dbplane_http::testing::RecordingTransport;
    use serde_json::json;

    #[tokio::test]
    async fn describe_schedule() {
        let transport = RecordingTransport::new().with_response(
            Method::Get,
            "/api/public/v1.0/groups/p1/backupConfigs/c1/snapshotSchedule",
            json!({
                "groupId": "p1",
                "clusterId": "c1",
                "snapshotIntervalHours": 6,
                "snapshotRetentionDays": 2,
                "clusterCheckpointIntervalMin": 15
            }),
        );
        let client = Client::new(transport);

        let schedule = client.snapshots().schedule("p1", "c1").await.expect("get");
        assert_eq!(schedule.snapshot_interval_hours, Some(6));
        assert_eq!(schedule.extra.get("clusterCheckpointIntervalMin"), Some(&json!(15)));
    }

    #[tokio::test]
    async fn update_schedule_sends_only_set_fields() {
        let transport = RecordingTransport::new().with_response(
            Method::Patch,
            "/api/public/v1.0/groups/p1/backupConfigs/c1/snapshotSchedule",
            json!({"groupId": "p1", "clusterId": "c1", "snapshotIntervalHours": 12}),
        );
        let client = Client::new(transport.clone());
        let schedule = SnapshotSchedule {
            snapshot_interval_hours: Some(12),
            ..SnapshotSchedule::default()
        };

        client
            .snapshots()
            .update_schedule("p1", "c1", &schedule)
            .await
            .expect("update");
        assert_eq!(
            transport.last_request().and_then(|r| r.body),
            Some(json!({"snapshotIntervalHours": 12}))
        );
    }

    #[tokio::test]
    async fn snapshots_are_keyed_by_cluster_id() {
        let transport = RecordingTransport::new().with_response(
            Method::Get,
            "/api/public/v1.0/groups/p1/clusters/c1/snapshots/s1",
            json!({"id": "s1", "clusterId": "c1", "complete": true, "isPossiblyInconsistent": false}),
        );
        let client = Client::new(transport);
        let snapshot = client.snapshots().get("p1", "c1", "s1").await.expect("get");
        assert_eq!(snapshot.is_possibly_inconsistent, Some(false));
    }
}
