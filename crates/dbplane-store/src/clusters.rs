//! Cluster contracts.

use std::future::Future;

use dbplane_atlas as atlas;
use dbplane_http::ListOptions;
use dbplane_opsmngr as opsmngr;
use serde::Serialize;

use crate::access_lists::ProjectIpAccessListCreator;
use crate::connector::Connector;
use crate::database_users::{DatabaseUserCreator, DatabaseUserDescriber};
use crate::error::{Context, Result};
use crate::operation::Operation;
use crate::regions::CloudProviderRegionsLister;
use crate::store::{Handle, Store};

/// Clusters of a project, in the shape of the backend that listed them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProjectClusters {
    /// Cloud-service clusters.
    Atlas(Vec<atlas::Cluster>),
    /// Ops-manager clusters.
    OpsManager(opsmngr::Clusters),
}

impl ProjectClusters {
    /// Number of clusters on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Atlas(clusters) => clusters.len(),
            Self::OpsManager(clusters) => clusters.results.len(),
        }
    }

    /// Whether the page is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Lists the clusters of a project.
pub trait ClusterLister {
    /// List the clusters of a project.
    fn project_clusters(
        &self,
        project_id: &str,
        opts: Option<&ListOptions>,
    ) -> impl Future<Output = Result<ProjectClusters>> + Send;
}

/// Describes a cloud cluster.
pub trait AtlasClusterDescriber {
    /// Get a cluster by name.
    fn atlas_cluster(&self, project_id: &str, name: &str) -> impl Future<Output = Result<atlas::Cluster>> + Send;
}

/// Describes an ops-manager cluster.
pub trait OpsManagerClusterDescriber {
    /// Get a cluster by ID.
    fn ops_manager_cluster(
        &self,
        project_id: &str,
        cluster_id: &str,
    ) -> impl Future<Output = Result<opsmngr::Cluster>> + Send;
}

/// Creates cloud clusters.
pub trait ClusterCreator {
    /// Create a cluster.
    fn create_cluster(
        &self,
        project_id: &str,
        cluster: &atlas::Cluster,
    ) -> impl Future<Output = Result<atlas::Cluster>> + Send;
}

/// Updates cloud clusters.
pub trait ClusterUpdater {
    /// Apply a partial update.
    fn update_cluster(
        &self,
        project_id: &str,
        name: &str,
        cluster: &atlas::Cluster,
    ) -> impl Future<Output = Result<atlas::Cluster>> + Send;
}

/// Deletes cloud clusters.
pub trait ClusterDeleter {
    /// Delete a cluster.
    fn delete_cluster(&self, project_id: &str, name: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Pauses cloud clusters.
pub trait ClusterPauser {
    /// Pause a cluster.
    fn pause_cluster(&self, project_id: &str, name: &str) -> impl Future<Output = Result<atlas::Cluster>> + Send;
}

/// Resumes paused cloud clusters.
pub trait ClusterStarter {
    /// Resume a cluster.
    fn start_cluster(&self, project_id: &str, name: &str) -> impl Future<Output = Result<atlas::Cluster>> + Send;
}

/// Loads the sample dataset.
pub trait SampleDataAdder {
    /// Start a sample dataset load.
    fn add_sample_data(
        &self,
        project_id: &str,
        cluster_name: &str,
    ) -> impl Future<Output = Result<atlas::SampleDatasetJob>> + Send;
}

/// Reports sample dataset load progress.
pub trait SampleDataStatusDescriber {
    /// Poll a sample dataset load job.
    fn sample_data_status(
        &self,
        project_id: &str,
        job_id: &str,
    ) -> impl Future<Output = Result<atlas::SampleDatasetJob>> + Send;
}

/// Lists clusters across every project.
pub trait AllClustersLister {
    /// List clusters across every project.
    fn list_all_project_clusters(&self) -> impl Future<Output = Result<opsmngr::AllClusters>> + Send;
}

/// Describe then update a cluster.
pub trait AtlasClusterGetterUpdater: AtlasClusterDescriber + ClusterUpdater {}

impl<T: AtlasClusterDescriber + ClusterUpdater> AtlasClusterGetterUpdater for T {}

/// Everything the quick-start flow needs.
pub trait AtlasClusterQuickStarter:
    SampleDataAdder
    + SampleDataStatusDescriber
    + CloudProviderRegionsLister
    + ClusterLister
    + DatabaseUserCreator
    + DatabaseUserDescriber
    + ProjectIpAccessListCreator
    + AtlasClusterDescriber
    + ClusterCreator
{
}

impl<T> AtlasClusterQuickStarter for T where
    T: SampleDataAdder
        + SampleDataStatusDescriber
        + CloudProviderRegionsLister
        + ClusterLister
        + DatabaseUserCreator
        + DatabaseUserDescriber
        + ProjectIpAccessListCreator
        + AtlasClusterDescriber
        + ClusterCreator
{
}

impl<C: Connector> ClusterLister for Store<C> {
    async fn project_clusters(&self, project_id: &str, opts: Option<&ListOptions>) -> Result<ProjectClusters> {
        let op = Operation::ProjectClusters;
        match self.handle(op)? {
            Handle::Atlas(client) => client
                .clusters()
                .list(project_id, opts)
                .await
                .map(ProjectClusters::Atlas),
            Handle::OpsManager(client) => client
                .clusters()
                .list(project_id, opts)
                .await
                .map(ProjectClusters::OpsManager),
        }
        .context(op)
    }
}

impl<C: Connector> AtlasClusterDescriber for Store<C> {
    async fn atlas_cluster(&self, project_id: &str, name: &str) -> Result<atlas::Cluster> {
        let op = Operation::AtlasCluster;
        self.atlas(op)?.clusters().get(project_id, name).await.context(op)
    }
}

impl<C: Connector> OpsManagerClusterDescriber for Store<C> {
    async fn ops_manager_cluster(&self, project_id: &str, cluster_id: &str) -> Result<opsmngr::Cluster> {
        let op = Operation::OpsManagerCluster;
        self.ops_manager(op)?
            .clusters()
            .get(project_id, cluster_id)
            .await
            .context(op)
    }
}

impl<C: Connector> ClusterCreator for Store<C> {
    async fn create_cluster(&self, project_id: &str, cluster: &atlas::Cluster) -> Result<atlas::Cluster> {
        let op = Operation::CreateCluster;
        self.atlas(op)?
            .clusters()
            .create(project_id, cluster)
            .await
            .context(op)
    }
}

impl<C: Connector> ClusterUpdater for Store<C> {
    async fn update_cluster(&self, project_id: &str, name: &str, cluster: &atlas::Cluster) -> Result<atlas::Cluster> {
        let op = Operation::UpdateCluster;
        self.atlas(op)?
            .clusters()
            .update(project_id, name, cluster)
            .await
            .context(op)
    }
}

impl<C: Connector> ClusterDeleter for Store<C> {
    async fn delete_cluster(&self, project_id: &str, name: &str) -> Result<()> {
        let op = Operation::DeleteCluster;
        self.atlas(op)?.clusters().delete(project_id, name).await.context(op)
    }
}

impl<C: Connector> ClusterPauser for Store<C> {
    async fn pause_cluster(&self, project_id: &str, name: &str) -> Result<atlas::Cluster> {
        self.check(Operation::PauseCluster)?;
        self.update_cluster(project_id, name, &atlas::Cluster::paused(true))
            .await
    }
}

impl<C: Connector> ClusterStarter for Store<C> {
    async fn start_cluster(&self, project_id: &str, name: &str) -> Result<atlas::Cluster> {
        self.check(Operation::StartCluster)?;
        self.update_cluster(project_id, name, &atlas::Cluster::paused(false))
            .await
    }
}

impl<C: Connector> SampleDataAdder for Store<C> {
    async fn add_sample_data(&self, project_id: &str, cluster_name: &str) -> Result<atlas::SampleDatasetJob> {
        let op = Operation::AddSampleData;
        self.atlas(op)?
            .clusters()
            .load_sample_data(project_id, cluster_name)
            .await
            .context(op)
    }
}

impl<C: Connector> SampleDataStatusDescriber for Store<C> {
    async fn sample_data_status(&self, project_id: &str, job_id: &str) -> Result<atlas::SampleDatasetJob> {
        let op = Operation::SampleDataStatus;
        self.atlas(op)?
            .clusters()
            .sample_data_status(project_id, job_id)
            .await
            .context(op)
    }
}

impl<C: Connector> AllClustersLister for Store<C> {
    async fn list_all_project_clusters(&self) -> Result<opsmngr::AllClusters> {
        let op = Operation::ListAllProjectClusters;
        self.ops_manager(op)?.clusters().list_all().await.context(op)
    }
}
