//! Automation configuration and goal-state progress.

use dbplane_http::{ApiRequest, Result, Transport};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Client, group_path};

/// Desired deployment state of a project.
///
/// Only the top-level structure is modelled; the rest round-trips through
/// `extra` so an edited file can be sent back without losing fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationConfig {
    /// Configuration version, bumped on every change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    /// Managed processes.
    #[serde(default)]
    pub processes: Vec<Process>,
    /// Replica set definitions.
    #[serde(default)]
    pub replica_sets: Vec<Value>,
    /// Sharded cluster definitions.
    #[serde(default)]
    pub sharding: Vec<Value>,
    /// Fields this client does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A managed process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    /// Unique process name.
    pub name: String,
    /// Host the process runs on.
    #[serde(default)]
    pub hostname: String,
    /// `mongod` or `mongos`.
    #[serde(default)]
    pub process_type: String,
    /// Server version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Stopped on purpose.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    /// Fields this client does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// How far the agents are from the goal configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationStatus {
    /// Version the agents are working towards.
    pub goal_version: u64,
    /// Per-process progress.
    #[serde(default)]
    pub processes: Vec<ProcessStatus>,
}

impl AutomationStatus {
    /// Whether every process reached the goal version.
    #[must_use]
    pub fn is_goal_reached(&self) -> bool {
        self.processes
            .iter()
            .all(|p| p.last_goal_version_achieved == self.goal_version)
    }
}

/// Progress of one process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessStatus {
    /// Process name.
    pub name: String,
    /// Host the process runs on.
    #[serde(default)]
    pub hostname: String,
    /// Last configuration version the process reached.
    #[serde(default)]
    pub last_goal_version_achieved: u64,
    /// Remaining steps.
    #[serde(default)]
    pub plan: Vec<String>,
}

/// `/groups/{id}/automationConfig` and `/groups/{id}/automationStatus`.
#[derive(Debug)]
pub struct AutomationService<'a, T> {
    pub(crate) client: &'a Client<T>,
}

impl<T: Transport> AutomationService<'_, T> {
    /// Get the automation configuration of a project.
    pub async fn config(&self, group_id: &str) -> Result<AutomationConfig> {
        self.client
            .send(ApiRequest::get(group_path(group_id, "/automationConfig")))
            .await
    }

    /// Replace the automation configuration of a project.
    pub async fn update_config(&self, group_id: &str, config: &AutomationConfig) -> Result<()> {
        let request = ApiRequest::put(group_path(group_id, "/automationConfig")).with_json(config)?;
        self.client.send_empty(request).await
    }

    /// Get the automation progress of a project.
    pub async fn status(&self, group_id: &str) -> Result<AutomationStatus> {
        self.client
            .send(ApiRequest::get(group_path(group_id, "/automationStatus")))
            .await
    }
}
