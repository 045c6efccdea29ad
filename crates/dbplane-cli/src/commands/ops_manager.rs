//! Ops-manager cluster and automation command implementation.
//!
//! Backup subcommands of `ops-manager` are served by
//! [`BackupCommand`](super::BackupCommand).

use std::io::Write;

use dbplane_store::opsmngr::{
    AllClusters, AutomationConfig, AutomationStatus, Process, ProcessStatus,
};
use dbplane_store::{
    AllClustersLister, AutomationGetter, AutomationStatusDescriber, AutomationUpdater,
    ClusterLister, OpsManagerClusterDescriber,
};
use serde::Serialize;

use super::{Scope, read_json};
use crate::cli::{AutomationCommands, OmClusterCommands};
use crate::error::CliError;
use crate::output::{Message, OutputFormat, Row, TableDisplay, cell, truncate, write_rows};

/// Ops-manager command executor.
pub struct OpsManagerCommand<'a, S> {
    store: &'a S,
    scope: Scope<'a>,
}

impl<'a, S> OpsManagerCommand<'a, S>
where
    S: ClusterLister
        + OpsManagerClusterDescriber
        + AllClustersLister
        + AutomationGetter
        + AutomationUpdater
        + AutomationStatusDescriber
        + Sync,
{
    /// Create a new ops-manager command.
    #[must_use]
    pub const fn new(store: &'a S, scope: Scope<'a>) -> Self {
        Self { store, scope }
    }

    /// Execute an `ops-manager clusters` subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation fails.
    pub async fn clusters<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &OmClusterCommands,
    ) -> Result<(), CliError> {
        match command {
            OmClusterCommands::List { all: true, .. } => {
                let clusters = self.store.list_all_project_clusters().await?;
                format.write(writer, &AllClustersView(&clusters))?;
            }
            OmClusterCommands::List { project, page, .. } => {
                let project_id = self.scope.project(project)?;
                let clusters = self
                    .store
                    .project_clusters(project_id, page.options().as_ref())
                    .await?;
                format.write(writer, &clusters)?;
            }
            OmClusterCommands::Describe {
                cluster_id,
                project,
            } => {
                let project_id = self.scope.project(project)?;
                let cluster = self.store.ops_manager_cluster(project_id, cluster_id).await?;
                format.write(writer, &cluster)?;
            }
        }
        Ok(())
    }

    /// Execute an `ops-manager automation` subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the input file is invalid or the operation fails.
    pub async fn automation<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &AutomationCommands,
    ) -> Result<(), CliError> {
        match command {
            AutomationCommands::Describe { project } => {
                let project_id = self.scope.project(project)?;
                let config = self.store.automation_config(project_id).await?;
                format.write(writer, &config)?;
            }
            AutomationCommands::Update { file, project } => {
                let project_id = self.scope.project(project)?;
                let config: AutomationConfig = read_json(file)?;
                self.store
                    .update_automation_config(project_id, &config)
                    .await?;
                let msg = Message::success(format!(
                    "Automation configuration published to project {project_id}"
                ));
                format.write(writer, &msg)?;
            }
            AutomationCommands::Status { project } => {
                let project_id = self.scope.project(project)?;
                let status = self.store.automation_status(project_id).await?;
                format.write(writer, &status)?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// Output types
// ============================================================================

/// Every project's clusters, one row per cluster in table form.
#[derive(Serialize)]
#[serde(transparent)]
struct AllClustersView<'a>(&'a AllClusters);

impl TableDisplay for AllClustersView<'_> {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        let rows: Vec<SummaryRow> = self
            .0
            .results
            .iter()
            .flat_map(|project| {
                project.clusters.iter().map(move |c| {
                    SummaryRow(vec![
                        project.group_name.clone(),
                        c.cluster_id.clone(),
                        c.name.clone(),
                        c.kind.clone(),
                        c.node_count.to_string(),
                        c.versions.join(", "),
                    ])
                })
            })
            .collect();
        write_rows(writer, &rows)
    }
}

struct SummaryRow(Vec<String>);

impl Row for SummaryRow {
    const HEADERS: &'static [&'static str] = &["PROJECT", "ID", "NAME", "TYPE", "NODES", "VERSIONS"];

    fn cells(&self) -> Vec<String> {
        self.0.clone()
    }
}

impl Row for Process {
    const HEADERS: &'static [&'static str] = &["NAME", "HOSTNAME", "TYPE", "VERSION", "DISABLED"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.hostname.clone(),
            self.process_type.clone(),
            cell(self.version.as_deref()),
            self.disabled.unwrap_or(false).to_string(),
        ]
    }
}

impl TableDisplay for AutomationConfig {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Version: {}", cell(self.version))?;
        writeln!(
            writer,
            "Replica sets: {}   Sharded clusters: {}",
            self.replica_sets.len(),
            self.sharding.len()
        )?;
        writeln!(writer)?;
        write_rows(writer, &self.processes)
    }
}

impl Row for ProcessStatus {
    const HEADERS: &'static [&'static str] = &["NAME", "HOSTNAME", "GOAL VERSION", "PLAN"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.hostname.clone(),
            self.last_goal_version_achieved.to_string(),
            truncate(&self.plan.join(", "), 60),
        ]
    }
}

impl TableDisplay for AutomationStatus {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        let state = if self.is_goal_reached() {
            "goal reached"
        } else {
            "in progress"
        };
        writeln!(writer, "Goal version: {} ({state})", self.goal_version)?;
        writeln!(writer)?;
        write_rows(writer, &self.processes)
    }
}
