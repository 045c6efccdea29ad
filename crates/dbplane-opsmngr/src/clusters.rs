//! Clusters as seen by the monitoring and backup agents.

use dbplane_http::{ApiRequest, ListOptions, Page, Result, Transport, escape};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{API_PATH, Client, group_path};

/// A replica set or sharded cluster discovered in a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    /// Cluster ID.
    pub id: String,
    /// Owning project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,
    /// `REPLICA_SET`, `SHARDED_REPLICA_SET`, `CONFIG_SERVER_REPLICA_SET`...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    /// Replica set name, for replica sets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replica_set_name: Option<String>,
    /// Shard name, for shards of a sharded cluster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shard_name: Option<String>,
    /// Last agent heartbeat.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_heartbeat: Option<String>,
    /// Fields this client does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One page of a project's clusters.
pub type Clusters = Page<Cluster>;

/// Clusters of every project the API key can see.
pub type AllClusters = Page<AllClustersProject>;

/// A project and a summary of its clusters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllClustersProject {
    /// Project ID.
    pub group_id: String,
    /// Project name.
    #[serde(default)]
    pub group_name: String,
    /// Organization ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    /// Organization name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_name: Option<String>,
    /// Clusters in the project.
    #[serde(default)]
    pub clusters: Vec<ClusterSummary>,
    /// Fields this client does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Summary of one cluster across projects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    /// Cluster ID.
    pub cluster_id: String,
    /// Cluster name.
    #[serde(default)]
    pub name: String,
    /// Cluster type.
    #[serde(default, rename = "type")]
    pub kind: String,
    /// Open alerts.
    #[serde(default)]
    pub alert_count: u64,
    /// Number of processes.
    #[serde(default)]
    pub node_count: u64,
    /// Server versions in use.
    #[serde(default)]
    pub versions: Vec<String>,
    /// Fields this client does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `/groups/{id}/clusters` and `/clusters`.
#[derive(Debug)]
pub struct ClustersService<'a, T> {
    pub(crate) client: &'a Client<T>,
}

impl<T: Transport> ClustersService<'_, T> {
    /// List the clusters of a project.
    pub async fn list(&self, group_id: &str, opts: Option<&ListOptions>) -> Result<Clusters> {
        let request = ApiRequest::get(group_path(group_id, "/clusters")).with_list_options(opts);
        self.client.send(request).await
    }

    /// Get one cluster by ID.
    pub async fn get(&self, group_id: &str, cluster_id: &str) -> Result<Cluster> {
        let path = group_path(group_id, &format!("/clusters/{}", escape(cluster_id)));
        self.client.send(ApiRequest::get(path)).await
    }

    /// List clusters across every project.
    pub async fn list_all(&self) -> Result<AllClusters> {
        self.client.send(ApiRequest::get(format!("{API_PATH}/clusters"))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbplane_http::Method;
    use dbplane_http::testing::RecordingTransport;
    use serde_json::json;

    #[tokio::test]
    async fn list_returns_page() {
        let transport = RecordingTransport::new().with_response(
            Method::Get,
            "/api/public/v1.0/groups/p1/clusters",
            json!({
                "results": [{
                    "id": "c1",
                    "groupId": "p1",
                    "clusterName": "rs0",
                    "typeName": "REPLICA_SET",
                    "replicaSetName": "rs0",
                    "lastHeartbeat": "2020-06-01T10:00:00Z"
                }],
                "totalCount": 1
            }),
        );
        let client = Client::new(transport);

        let clusters = client.clusters().list("p1", None).await.expect("list");
        assert_eq!(clusters.total_count, Some(1));
        assert_eq!(clusters.results[0].type_name.as_deref(), Some("REPLICA_SET"));
    }

    #[tokio::test]
    async fn list_all_groups_by_project() {
        let transport = RecordingTransport::new().with_response(
            Method::Get,
            "/api/public/v1.0/clusters",
            json!({
                "results": [{
                    "groupId": "p1",
                    "groupName": "prod",
                    "orgName": "acme",
                    "planType": "Ops Manager",
                    "clusters": [{"clusterId": "c1", "name": "rs0", "type": "replica set", "nodeCount": 3, "versions": ["4.4.1"]}]
                }],
                "totalCount": 1
            }),
        );
        let client = Client::new(transport);

        let all = client.clusters().list_all().await.expect("list");
        let project = &all.results[0];
        assert_eq!(project.group_name, "prod");
        assert_eq!(project.clusters[0].kind, "replica set");
        assert_eq!(project.extra.get("planType"), Some(&json!("Ops Manager")));
    }
}
