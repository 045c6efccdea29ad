//! Clusters and sample dataset loading.

use chrono::{DateTime, Utc};
use dbplane_http::{ApiRequest, ListOptions, Page, Result, Transport, escape};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Client, group_path};

/// A cloud cluster.
///
/// Every field is optional so the same type doubles as a partial update:
/// unset fields are left out of the request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    /// Cluster ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Owning project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// Cluster name, unique within the project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `REPLICASET`, `SHARDED` or `GEOSHARDED`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_type: Option<String>,
    /// Storage capacity in GB.
    #[serde(
        default,
        rename = "diskSizeGB",
        skip_serializing_if = "Option::is_none"
    )]
    pub disk_size_gb: Option<f64>,
    /// Major server version, e.g. `4.4`.
    #[serde(
        default,
        rename = "mongoDBMajorVersion",
        skip_serializing_if = "Option::is_none"
    )]
    pub mongodb_major_version: Option<String>,
    /// Exact server version.
    #[serde(
        default,
        rename = "mongoDBVersion",
        skip_serializing_if = "Option::is_none"
    )]
    pub mongodb_version: Option<String>,
    /// Number of shards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_shards: Option<u32>,
    /// Whether the cluster is paused.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused: Option<bool>,
    /// Continuous cloud backup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pit_enabled: Option<bool>,
    /// Cloud provider snapshots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_backup_enabled: Option<bool>,
    /// Provider, region and tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_settings: Option<ProviderSettings>,
    /// Replica set members per shard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_factor: Option<u32>,
    /// Lifecycle state: `IDLE`, `CREATING`, `UPDATING`, `DELETING`, `REPAIRING`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_name: Option<String>,
    /// Connection strings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_strings: Option<ConnectionStrings>,
    /// `mongodb+srv://` address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub srv_address: Option<String>,
    /// Fields this client does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Cluster {
    /// Partial update that only flips the paused flag.
    #[must_use]
    pub fn paused(paused: bool) -> Self {
        Self {
            paused: Some(paused),
            ..Self::default()
        }
    }
}

/// Cloud provider settings of a cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSettings {
    /// `AWS`, `GCP`, `AZURE` or `TENANT`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    /// Provider behind a shared tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backing_provider_name: Option<String>,
    /// Provider region, e.g. `US_EAST_1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_name: Option<String>,
    /// Tier, e.g. `M10`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_size_name: Option<String>,
    /// Fields this client does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Connection strings of a cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStrings {
    /// `mongodb://` connection string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard: Option<String>,
    /// `mongodb+srv://` connection string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_srv: Option<String>,
}

/// A sample dataset load job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleDatasetJob {
    /// Job ID.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Target cluster.
    #[serde(default)]
    pub cluster_name: String,
    /// When the job was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_date: Option<DateTime<Utc>>,
    /// When the job finished.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complete_date: Option<DateTime<Utc>>,
    /// `WORKING`, `FAILED` or `COMPLETED`.
    #[serde(default)]
    pub state: String,
    /// Failure reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl SampleDatasetJob {
    /// Whether the job has stopped running.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.state.as_str(), "COMPLETED" | "FAILED")
    }
}

/// `/groups/{id}/clusters` and `/groups/{id}/sampleDatasetLoad`.
#[derive(Debug)]
pub struct ClustersService<'a, T> {
    pub(crate) client: &'a Client<T>,
}

impl<T: Transport> ClustersService<'_, T> {
    /// List the clusters of a project.
    pub async fn list(&self, group_id: &str, opts: Option<&ListOptions>) -> Result<Vec<Cluster>> {
        let request = ApiRequest::get(group_path(group_id, "/clusters")).with_list_options(opts);
        let page: Page<Cluster> = self.client.send(request).await?;
        Ok(page.results)
    }

    /// Get one cluster by name.
    pub async fn get(&self, group_id: &str, name: &str) -> Result<Cluster> {
        let path = group_path(group_id, &format!("/clusters/{}", escape(name)));
        self.client.send(ApiRequest::get(path)).await
    }

    /// Create a cluster.
    pub async fn create(&self, group_id: &str, cluster: &Cluster) -> Result<Cluster> {
        let request = ApiRequest::post(group_path(group_id, "/clusters")).with_json(cluster)?;
        self.client.send(request).await
    }

    /// Apply a partial update; only the fields set on `cluster` are sent.
    pub async fn update(&self, group_id: &str, name: &str, cluster: &Cluster) -> Result<Cluster> {
        let path = group_path(group_id, &format!("/clusters/{}", escape(name)));
        let request = ApiRequest::patch(path).with_json(cluster)?;
        self.client.send(request).await
    }

    /// Delete a cluster.
    pub async fn delete(&self, group_id: &str, name: &str) -> Result<()> {
        let path = group_path(group_id, &format!("/clusters/{}", escape(name)));
        self.client.send_empty(ApiRequest::delete(path)).await
    }

    /// Start loading the sample dataset into a cluster.
    pub async fn load_sample_data(&self, group_id: &str, cluster_name: &str) -> Result<SampleDatasetJob> {
        let path = group_path(group_id, &format!("/sampleDatasetLoad/{}", escape(cluster_name)));
        self.client.send(ApiRequest::post(path)).await
    }

    /// Poll a sample dataset load job.
    pub async fn sample_data_status(&self, group_id: &str, job_id: &str) -> Result<SampleDatasetJob> {
        let path = group_path(group_id, &format!("/sampleDatasetLoad/{}", escape(job_id)));
        self.client.send(ApiRequest::get(path)).await
    }
}
