//! Project contracts and the backend-neutral project shape.

use std::future::Future;

use chrono::SecondsFormat;
use dbplane_atlas as atlas;
use dbplane_http::{ListOptions, Page};
use dbplane_opsmngr as opsmngr;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::connector::Connector;
use crate::error::{Context, Result, required};
use crate::operation::Operation;
use crate::store::{Handle, Store};

/// A project, whichever backend it lives in.
///
/// Backend-specific fields are kept in `details` and rendered unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Project ID.
    pub id: String,
    /// Project name.
    pub name: String,
    /// Owning organization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    /// Backend-specific fields.
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// A page of projects.
pub type Projects = Page<Project>;

impl Project {
    fn from_atlas(op: Operation, project: atlas::Project) -> Result<Self> {
        let mut details = project.extra;
        if let Some(count) = project.cluster_count {
            details.insert("clusterCount".to_string(), count.into());
        }
        if let Some(created) = project.created {
            details.insert(
                "created".to_string(),
                created.to_rfc3339_opts(SecondsFormat::AutoSi, true).into(),
            );
        }
        Ok(Self {
            id: required(op, "id", project.id)?,
            name: required(op, "name", project.name)?,
            org_id: project.org_id,
            details,
        })
    }

    fn from_ops_manager(op: Operation, project: opsmngr::Project) -> Result<Self> {
        let mut details = project.extra;
        for (key, value) in [
            ("activeAgentCount", project.active_agent_count),
            ("replicaSetCount", project.replica_set_count),
            ("shardCount", project.shard_count),
        ] {
            if let Some(value) = value {
                details.insert(key.to_string(), value.into());
            }
        }
        if !project.tags.is_empty() {
            details.insert("tags".to_string(), project.tags.into());
        }
        Ok(Self {
            id: required(op, "id", project.id)?,
            name: required(op, "name", project.name)?,
            org_id: project.org_id,
            details,
        })
    }
}

/// Lists every visible project.
pub trait ProjectLister {
    /// List projects.
    fn projects(&self, opts: Option<&ListOptions>) -> impl Future<Output = Result<Projects>> + Send;
}

/// Lists the projects of an organization.
pub trait OrgProjectLister {
    /// List the projects of an organization.
    fn org_projects(&self, org_id: &str, opts: Option<&ListOptions>) -> impl Future<Output = Result<Projects>> + Send;
}

/// Describes a project.
pub trait ProjectDescriber {
    /// Get a project.
    fn project(&self, project_id: &str) -> impl Future<Output = Result<Project>> + Send;
}

/// Creates projects.
pub trait ProjectCreator {
    /// Create a project in an organization.
    fn create_project(&self, name: &str, org_id: &str) -> impl Future<Output = Result<Project>> + Send;
}

/// Deletes projects.
pub trait ProjectDeleter {
    /// Delete a project.
    fn delete_project(&self, project_id: &str) -> impl Future<Output = Result<()>> + Send;
}

impl<C: Connector> ProjectLister for Store<C> {
    async fn projects(&self, opts: Option<&ListOptions>) -> Result<Projects> {
        let op = Operation::Projects;
        match self.handle(op)? {
            Handle::Atlas(client) => {
                let page = client.projects().list(opts).await.context(op)?;
                page.try_map(|p| Project::from_atlas(op, p))
            }
            Handle::OpsManager(client) => {
                let page = client.projects().list(opts).await.context(op)?;
                page.try_map(|p| Project::from_ops_manager(op, p))
            }
        }
    }
}

impl<C: Connector> OrgProjectLister for Store<C> {
    async fn org_projects(&self, org_id: &str, opts: Option<&ListOptions>) -> Result<Projects> {
        let op = Operation::OrgProjects;
        match self.handle(op)? {
            Handle::Atlas(client) => {
                let page = client.projects().list_by_org(org_id, opts).await.context(op)?;
                page.try_map(|p| Project::from_atlas(op, p))
            }
            Handle::OpsManager(client) => {
                let page = client.projects().list_by_org(org_id, opts).await.context(op)?;
                page.try_map(|p| Project::from_ops_manager(op, p))
            }
        }
    }
}

impl<C: Connector> ProjectDescriber for Store<C> {
    async fn project(&self, project_id: &str) -> Result<Project> {
        let op = Operation::Project;
        match self.handle(op)? {
            Handle::Atlas(client) => {
                Project::from_atlas(op, client.projects().get(project_id).await.context(op)?)
            }
            Handle::OpsManager(client) => {
                Project::from_ops_manager(op, client.projects().get(project_id).await.context(op)?)
            }
        }
    }
}

impl<C: Connector> ProjectCreator for Store<C> {
    async fn create_project(&self, name: &str, org_id: &str) -> Result<Project> {
        let op = Operation::CreateProject;
        match self.handle(op)? {
            Handle::Atlas(client) => {
                Project::from_atlas(op, client.projects().create(name, org_id).await.context(op)?)
            }
            Handle::OpsManager(client) => Project::from_ops_manager(
                op,
                client.projects().create(name, org_id).await.context(op)?,
            ),
        }
    }
}

impl<C: Connector> ProjectDeleter for Store<C> {
    async fn delete_project(&self, project_id: &str) -> Result<()> {
        let op = Operation::DeleteProject;
        match self.handle(op)? {
            Handle::Atlas(client) => client.projects().delete(project_id).await,
            Handle::OpsManager(client) => client.projects().delete(project_id).await,
        }
        .context(op)
    }
}
