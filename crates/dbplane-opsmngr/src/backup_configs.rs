//! Per-cluster backup configuration.

use dbplane_http::{ApiRequest, ListOptions, Page, Result, Transport, escape};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Client, group_path};

/// Backup configuration of one cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupConfig {
    /// Owning project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// Cluster the configuration applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_id: Option<String>,
    /// `INACTIVE`, `PROVISIONING`, `STARTED`, `STOPPED` or `TERMINATING`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_name: Option<String>,
    /// `WIRED_TIGER`, `MEMORY_MAPPED`...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_engine_name: Option<String>,
    /// Whether stored snapshots are encrypted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_enabled: Option<bool>,
    /// Whether the backup agent connects over TLS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_enabled: Option<bool>,
    /// Namespaces excluded from backup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excluded_namespaces: Option<Vec<String>>,
    /// Namespaces included in backup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub included_namespaces: Option<Vec<String>>,
    /// Fields this client does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `/groups/{id}/backupConfigs`.
#[derive(Debug)]
pub struct BackupConfigsService<'a, T> {
    pub(crate) client: &'a Client<T>,
}

impl<T: Transport> BackupConfigsService<'_, T> {
    /// List the backup configurations of a project.
    pub async fn list(&self, group_id: &str, opts: Option<&ListOptions>) -> Result<Page<BackupConfig>> {
        let request = ApiRequest::get(group_path(group_id, "/backupConfigs")).with_list_options(opts);
        self.client.send(request).await
    }

    /// Get the backup configuration of a cluster.
    pub async fn get(&self, group_id: &str, cluster_id: &str) -> Result<BackupConfig> {
        let path = group_path(group_id, &format!("/backupConfigs/{}", escape(cluster_id)));
        self.client.send(ApiRequest::get(path)).await
    }

    /// Change the backup configuration of a cluster.
    pub async fn update(&self, group_id: &str, cluster_id: &str, config: &BackupConfig) -> Result<BackupConfig> {
        let path = group_path(group_id, &format!("/backupConfigs/{}", escape(cluster_id)));
        let request = ApiRequest::patch(path).with_json(config)?;
        self.client.send(request).await
    }
}
