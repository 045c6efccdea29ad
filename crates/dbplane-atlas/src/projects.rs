//! Projects (called groups by the API).

use chrono::{DateTime, Utc};
use dbplane_http::{ApiRequest, ListOptions, Page, Result, Transport};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{API_PATH, Client, group_path, org_path};

/// A project as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Project ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Project name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Owning organization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    /// Number of clusters in the project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_count: Option<u64>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    /// Fields this client does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of a project creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest<'a> {
    /// Project name.
    pub name: &'a str,
    /// Owning organization.
    pub org_id: &'a str,
}

/// `/groups` and `/orgs/{id}/groups`.
#[derive(Debug)]
pub struct ProjectsService<'a, T> {
    pub(crate) client: &'a Client<T>,
}

impl<T: Transport> ProjectsService<'_, T> {
    /// List every project the API key can see.
    pub async fn list(&self, opts: Option<&ListOptions>) -> Result<Page<Project>> {
        let request = ApiRequest::get(format!("{API_PATH}/groups")).with_list_options(opts);
        self.client.send(request).await
    }

    /// List the projects of one organization.
    pub async fn list_by_org(&self, org_id: &str, opts: Option<&ListOptions>) -> Result<Page<Project>> {
        let request = ApiRequest::get(org_path(org_id, "/groups")).with_list_options(opts);
        self.client.send(request).await
    }

    /// Get one project.
    pub async fn get(&self, group_id: &str) -> Result<Project> {
        self.client.send(ApiRequest::get(group_path(group_id, ""))).await
    }

    /// Create a project in an organization.
    pub async fn create(&self, name: &str, org_id: &str) -> Result<Project> {
        let request = ApiRequest::post(format!("{API_PATH}/groups"))
            .with_json(&CreateProjectRequest { name, org_id })?;
        self.client.send(request).await
    }

    /// Delete a project.
    pub async fn delete(&self, group_id: &str) -> Result<()> {
        self.client.send_empty(ApiRequest::delete(group_path(group_id, ""))).await
    }
}
