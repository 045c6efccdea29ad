//! Cloud cluster command implementation.
//!
//! Provides subcommands for:
//! - Listing, describing, creating, updating and deleting clusters
//! - Pausing and resuming clusters
//! - Loading the sample dataset

use std::io::Write;

use dbplane_store::atlas::{self, ProviderSettings};
use dbplane_store::opsmngr;
use dbplane_store::{
    AtlasClusterGetterUpdater, ClusterCreator, ClusterDeleter, ClusterLister, ClusterPauser,
    ClusterStarter, ProjectClusters, SampleDataAdder, SampleDataStatusDescriber,
};

use super::{Scope, read_json};
use crate::cli::{ClusterCommands, ClusterCreateArgs, ClusterUpdateArgs, SampleDataCommands};
use crate::error::CliError;
use crate::output::{Message, OutputFormat, Row, TableDisplay, cell, write_rows};

/// Cluster command executor.
pub struct ClusterCommand<'a, S> {
    store: &'a S,
    scope: Scope<'a>,
}

impl<'a, S> ClusterCommand<'a, S>
where
    S: ClusterLister
        + AtlasClusterGetterUpdater
        + ClusterCreator
        + ClusterDeleter
        + ClusterPauser
        + ClusterStarter
        + SampleDataAdder
        + SampleDataStatusDescriber
        + Sync,
{
    /// Create a new cluster command.
    #[must_use]
    pub const fn new(store: &'a S, scope: Scope<'a>) -> Self {
        Self { store, scope }
    }

    /// Execute a cluster subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments are invalid or the operation fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &ClusterCommands,
    ) -> Result<(), CliError> {
        match command {
            ClusterCommands::List { project, page } => {
                let project_id = self.scope.project(project)?;
                let clusters = self
                    .store
                    .project_clusters(project_id, page.options().as_ref())
                    .await?;
                format.write(writer, &clusters)?;
            }
            ClusterCommands::Describe { name, project } => {
                let project_id = self.scope.project(project)?;
                let cluster = self.store.atlas_cluster(project_id, name).await?;
                format.write(writer, &cluster)?;
            }
            ClusterCommands::Create(args) => {
                let project_id = self.scope.project(&args.project)?;
                let cluster = create_request(args)?;
                let created = self.store.create_cluster(project_id, &cluster).await?;
                format.write(writer, &created)?;
            }
            ClusterCommands::Update(args) => {
                let project_id = self.scope.project(&args.project)?;
                let cluster = match &args.file {
                    Some(path) => read_json(path)?,
                    None => {
                        check_update_flags(args)?;
                        let current = self.store.atlas_cluster(project_id, &args.name).await?;
                        update_request(args, &current)
                    }
                };
                let updated = self
                    .store
                    .update_cluster(project_id, &args.name, &cluster)
                    .await?;
                format.write(writer, &updated)?;
            }
            ClusterCommands::Delete { name, project } => {
                let project_id = self.scope.project(project)?;
                self.store.delete_cluster(project_id, name).await?;
                format.write(writer, &Message::success(format!("Cluster '{name}' deleted")))?;
            }
            ClusterCommands::Pause { name, project } => {
                let project_id = self.scope.project(project)?;
                let cluster = self.store.pause_cluster(project_id, name).await?;
                format.write(writer, &cluster)?;
            }
            ClusterCommands::Start { name, project } => {
                let project_id = self.scope.project(project)?;
                let cluster = self.store.start_cluster(project_id, name).await?;
                format.write(writer, &cluster)?;
            }
            ClusterCommands::SampleData { command } => match command {
                SampleDataCommands::Load {
                    cluster_name,
                    project,
                } => {
                    let project_id = self.scope.project(project)?;
                    let job = self.store.add_sample_data(project_id, cluster_name).await?;
                    format.write(writer, &job)?;
                }
                SampleDataCommands::Describe { job_id, project } => {
                    let project_id = self.scope.project(project)?;
                    let job = self.store.sample_data_status(project_id, job_id).await?;
                    format.write(writer, &job)?;
                }
            },
        }
        Ok(())
    }
}

/// Build a cluster definition from `create` flags or its input file.
///
/// # Errors
///
/// Returns an error if the input file cannot be read or names another cluster.
pub fn create_request(args: &ClusterCreateArgs) -> Result<atlas::Cluster, CliError> {
    if let Some(path) = &args.file {
        let mut cluster: atlas::Cluster = read_json(path)?;
        match cluster.name.as_deref() {
            None => cluster.name = Some(args.name.clone()),
            Some(name) if name == args.name => {}
            Some(name) => {
                return Err(CliError::InvalidArgument(format!(
                    "cluster name '{}' does not match '{name}' in {}",
                    args.name,
                    path.display()
                )));
            }
        }
        return Ok(cluster);
    }

    if args.members == 0 {
        return Err(CliError::InvalidArgument(
            "--members must be at least 1".to_string(),
        ));
    }

    Ok(atlas::Cluster {
        name: Some(args.name.clone()),
        cluster_type: Some("REPLICASET".to_string()),
        replication_factor: Some(args.members),
        disk_size_gb: args.disk_size_gb,
        mongodb_major_version: args.mdb_version.clone(),
        provider_backup_enabled: args.backup.then_some(true),
        provider_settings: Some(ProviderSettings {
            provider_name: Some(args.provider.to_uppercase()),
            region_name: Some(args.region.to_uppercase()),
            instance_size_name: Some(args.tier.to_uppercase()),
            ..ProviderSettings::default()
        }),
        ..atlas::Cluster::default()
    })
}

fn check_update_flags(args: &ClusterUpdateArgs) -> Result<(), CliError> {
    if args.tier.is_none() && args.disk_size_gb.is_none() && args.mdb_version.is_none() {
        return Err(CliError::InvalidArgument(
            "nothing to update: pass --tier, --disk-size-gb, --mdb-version or --file".to_string(),
        ));
    }
    Ok(())
}

/// Build a partial cluster definition from `update` flags.
///
/// A tier change keeps the provider of `current`, which the API requires
/// alongside `instanceSizeName`.
#[must_use]
pub fn update_request(args: &ClusterUpdateArgs, current: &atlas::Cluster) -> atlas::Cluster {
    let provider = current.provider_settings.as_ref();
    atlas::Cluster {
        disk_size_gb: args.disk_size_gb,
        mongodb_major_version: args.mdb_version.clone(),
        provider_settings: args.tier.as_ref().map(|tier| ProviderSettings {
            provider_name: provider.and_then(|p| p.provider_name.clone()),
            backing_provider_name: provider.and_then(|p| p.backing_provider_name.clone()),
            instance_size_name: Some(tier.to_uppercase()),
            ..ProviderSettings::default()
        }),
        ..atlas::Cluster::default()
    }
}

// ============================================================================
// Output types
// ============================================================================

impl Row for atlas::Cluster {
    const HEADERS: &'static [&'static str] = &["NAME", "TIER", "PROVIDER", "REGION", "VERSION", "STATE"];

    fn cells(&self) -> Vec<String> {
        let settings = self.provider_settings.as_ref();
        let state = if self.paused == Some(true) {
            Some("PAUSED")
        } else {
            self.state_name.as_deref()
        };
        vec![
            cell(self.name.as_deref()),
            cell(settings.and_then(|s| s.instance_size_name.as_deref())),
            cell(settings.and_then(|s| s.provider_name.as_deref())),
            cell(settings.and_then(|s| s.region_name.as_deref())),
            cell(self.mongodb_version.as_deref()),
            cell(state),
        ]
    }
}

impl Row for opsmngr::Cluster {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "TYPE", "REPLICA SET"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            cell(self.cluster_name.as_deref()),
            cell(self.type_name.as_deref()),
            cell(self.replica_set_name.as_deref()),
        ]
    }
}

impl Row for atlas::SampleDatasetJob {
    const HEADERS: &'static [&'static str] = &["ID", "CLUSTER", "STATE", "ERROR"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.cluster_name.clone(),
            self.state.clone(),
            cell(self.error_message.as_deref()),
        ]
    }
}

crate::single_row!(atlas::Cluster, opsmngr::Cluster, atlas::SampleDatasetJob);

impl TableDisplay for ProjectClusters {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        match self {
            Self::Atlas(clusters) => write_rows(writer, clusters),
            Self::OpsManager(page) => page.write_table(writer),
        }
    }
}
