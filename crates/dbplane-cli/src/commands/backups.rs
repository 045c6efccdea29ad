//! Backup command implementation.
//!
//! Provides subcommands for:
//! - Cloud provider snapshots (cloud only)
//! - Continuous backup snapshots (cloud and ops-manager)
//! - Snapshot schedules and backup configurations (ops-manager only)

use std::io::Write;

use dbplane_store::atlas::{self, CloudProviderSnapshot, CreateSnapshotRequest};
use dbplane_store::opsmngr::{self, BackupConfig, SnapshotSchedule};
use dbplane_store::{
    BackupConfigGetter, BackupConfigLister, BackupConfigUpdater, ContinuousSnapshot,
    ContinuousSnapshotDescriber, ContinuousSnapshots, ContinuousSnapshotsLister,
    SnapshotScheduleDescriber, SnapshotScheduleUpdater, SnapshotsCreator, SnapshotsDeleter,
    SnapshotsDescriber, SnapshotsLister,
};

use super::{Scope, read_json};
use crate::cli::{
    AtlasBackupCommands, BackupConfigCommands, ContinuousCommands, OmBackupCommands,
    ScheduleCommands, SnapshotCommands,
};
use crate::error::CliError;
use crate::output::{Message, OutputFormat, Row, TableDisplay, cell, write_rows};

/// Backup command executor.
pub struct BackupCommand<'a, S> {
    store: &'a S,
    scope: Scope<'a>,
}

impl<'a, S> BackupCommand<'a, S>
where
    S: SnapshotsLister
        + SnapshotsDescriber
        + SnapshotsCreator
        + SnapshotsDeleter
        + ContinuousSnapshotsLister
        + ContinuousSnapshotDescriber
        + SnapshotScheduleDescriber
        + SnapshotScheduleUpdater
        + BackupConfigLister
        + BackupConfigGetter
        + BackupConfigUpdater
        + Sync,
{
    /// Create a new backup command.
    #[must_use]
    pub const fn new(store: &'a S, scope: Scope<'a>) -> Self {
        Self { store, scope }
    }

    /// Execute an `atlas backups` subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &AtlasBackupCommands,
    ) -> Result<(), CliError> {
        match command {
            AtlasBackupCommands::Snapshots { command } => {
                self.snapshots(writer, format, command).await
            }
            AtlasBackupCommands::Continuous { command } => {
                self.continuous(writer, format, command).await
            }
        }
    }

    /// Execute an `ops-manager backups` subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments are invalid or the operation fails.
    pub async fn execute_ops_manager<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &OmBackupCommands,
    ) -> Result<(), CliError> {
        match command {
            OmBackupCommands::Snapshots { command } => {
                self.continuous(writer, format, command).await
            }
            OmBackupCommands::Schedule { command } => self.schedule(writer, format, command).await,
            OmBackupCommands::Config { command } => self.config(writer, format, command).await,
        }
    }

    async fn snapshots<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &SnapshotCommands,
    ) -> Result<(), CliError> {
        match command {
            SnapshotCommands::List {
                cluster_name,
                project,
                page,
            } => {
                let project_id = self.scope.project(project)?;
                let snapshots = self
                    .store
                    .cloud_provider_snapshots(project_id, cluster_name, page.options().as_ref())
                    .await?;
                format.write(writer, &snapshots)?;
            }
            SnapshotCommands::Describe {
                cluster_name,
                snapshot_id,
                project,
            } => {
                let project_id = self.scope.project(project)?;
                let snapshot = self
                    .store
                    .cloud_provider_snapshot(project_id, cluster_name, snapshot_id)
                    .await?;
                format.write(writer, &snapshot)?;
            }
            SnapshotCommands::Create {
                cluster_name,
                desc,
                retention,
                project,
            } => {
                let project_id = self.scope.project(project)?;
                if *retention == 0 {
                    return Err(CliError::InvalidArgument(
                        "--retention must be at least 1 day".to_string(),
                    ));
                }
                let request = CreateSnapshotRequest {
                    description: desc.clone(),
                    retention_in_days: Some(*retention),
                };
                let snapshot = self
                    .store
                    .create_cloud_provider_snapshot(project_id, cluster_name, &request)
                    .await?;
                format.write(writer, &snapshot)?;
            }
            SnapshotCommands::Delete {
                cluster_name,
                snapshot_id,
                project,
            } => {
                let project_id = self.scope.project(project)?;
                self.store
                    .delete_cloud_provider_snapshot(project_id, cluster_name, snapshot_id)
                    .await?;
                let msg = Message::success(format!("Snapshot '{snapshot_id}' deleted"));
                format.write(writer, &msg)?;
            }
        }
        Ok(())
    }

    async fn continuous<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &ContinuousCommands,
    ) -> Result<(), CliError> {
        match command {
            ContinuousCommands::List {
                cluster,
                project,
                page,
            } => {
                let project_id = self.scope.project(project)?;
                let snapshots = self
                    .store
                    .continuous_snapshots(project_id, cluster, page.options().as_ref())
                    .await?;
                format.write(writer, &snapshots)?;
            }
            ContinuousCommands::Describe {
                cluster,
                snapshot_id,
                project,
            } => {
                let project_id = self.scope.project(project)?;
                let snapshot = self
                    .store
                    .continuous_snapshot(project_id, cluster, snapshot_id)
                    .await?;
                format.write(writer, &snapshot)?;
            }
        }
        Ok(())
    }

    async fn schedule<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &ScheduleCommands,
    ) -> Result<(), CliError> {
        match command {
            ScheduleCommands::Describe {
                cluster_id,
                project,
            } => {
                let project_id = self.scope.project(project)?;
                let schedule = self.store.snapshot_schedule(project_id, cluster_id).await?;
                format.write(writer, &schedule)?;
            }
            ScheduleCommands::Update {
                cluster_id,
                file,
                project,
            } => {
                let project_id = self.scope.project(project)?;
                let schedule: SnapshotSchedule = read_json(file)?;
                let updated = self
                    .store
                    .update_snapshot_schedule(project_id, cluster_id, &schedule)
                    .await?;
                format.write(writer, &updated)?;
            }
        }
        Ok(())
    }

    async fn config<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &BackupConfigCommands,
    ) -> Result<(), CliError> {
        match command {
            BackupConfigCommands::List { project, page } => {
                let project_id = self.scope.project(project)?;
                let configs = self
                    .store
                    .backup_configs(project_id, page.options().as_ref())
                    .await?;
                format.write(writer, &configs)?;
            }
            BackupConfigCommands::Describe {
                cluster_id,
                project,
            } => {
                let project_id = self.scope.project(project)?;
                let config = self.store.backup_config(project_id, cluster_id).await?;
                format.write(writer, &config)?;
            }
            BackupConfigCommands::Update {
                cluster_id,
                status,
                file,
                project,
            } => {
                let project_id = self.scope.project(project)?;
                let mut config: BackupConfig = match file {
                    Some(path) => read_json(path)?,
                    None => BackupConfig::default(),
                };
                if let Some(status) = status {
                    config.status_name = Some(status.to_uppercase());
                }
                let updated = self
                    .store
                    .update_backup_config(project_id, cluster_id, &config)
                    .await?;
                format.write(writer, &updated)?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// Output types
// ============================================================================

impl Row for CloudProviderSnapshot {
    const HEADERS: &'static [&'static str] = &["ID", "TYPE", "STATUS", "CREATED", "EXPIRES"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            cell(self.snapshot_type.as_deref()),
            cell(self.status.as_deref()),
            cell(self.created_at),
            cell(self.expires_at),
        ]
    }
}

impl Row for atlas::ContinuousSnapshot {
    const HEADERS: &'static [&'static str] = &["ID", "COMPLETE", "CREATED", "EXPIRES"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.complete.to_string(),
            cell(self.created.as_ref().map(|c| c.date)),
            expiry(self.does_not_expire, self.expires),
        ]
    }
}

impl Row for opsmngr::ContinuousSnapshot {
    const HEADERS: &'static [&'static str] = &["ID", "COMPLETE", "CREATED", "EXPIRES"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.complete.to_string(),
            cell(self.created.as_ref().map(|c| c.date)),
            expiry(self.does_not_expire, self.expires),
        ]
    }
}

fn expiry<T: ToString>(never: bool, expires: Option<T>) -> String {
    if never { "never".to_string() } else { cell(expires) }
}

impl Row for SnapshotSchedule {
    const HEADERS: &'static [&'static str] = &[
        "CLUSTER",
        "INTERVAL (H)",
        "RETENTION (D)",
        "DAILY (D)",
        "WEEKLY (W)",
        "MONTHLY (M)",
        "PIT WINDOW (H)",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            cell(self.cluster_id.as_deref()),
            cell(self.snapshot_interval_hours),
            cell(self.snapshot_retention_days),
            cell(self.daily_snapshot_retention_days),
            cell(self.weekly_snapshot_retention_weeks),
            cell(self.monthly_snapshot_retention_months),
            cell(self.point_in_time_window_hours),
        ]
    }
}

impl Row for BackupConfig {
    const HEADERS: &'static [&'static str] = &["CLUSTER", "STATUS", "STORAGE ENGINE", "ENCRYPTED"];

    fn cells(&self) -> Vec<String> {
        vec![
            cell(self.cluster_id.as_deref()),
            cell(self.status_name.as_deref()),
            cell(self.storage_engine_name.as_deref()),
            cell(self.encryption_enabled),
        ]
    }
}

crate::single_row!(
    CloudProviderSnapshot,
    atlas::ContinuousSnapshot,
    opsmngr::ContinuousSnapshot,
    SnapshotSchedule,
    BackupConfig,
);

impl TableDisplay for ContinuousSnapshots {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        match self {
            Self::Atlas(page) => page.write_table(writer),
            Self::OpsManager(page) => page.write_table(writer),
        }
    }
}

impl TableDisplay for ContinuousSnapshot {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        match self {
            Self::Atlas(s) => write_rows(writer, std::slice::from_ref(s)),
            Self::OpsManager(s) => write_rows(writer, std::slice::from_ref(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Format, PageArgs, ProjectArg};
    use dbplane_http::Method;
    use dbplane_http::testing::RecordingTransport;
    use dbplane_store::testing::{FakeConnector, store};
    use dbplane_store::{Service, Store};
    use serde_json::json;
    use std::io::Write as _;
    use tempfile::NamedTempFile;
    use test_case::test_case;

    fn scoped(store: &Store<FakeConnector>) -> BackupCommand<'_, Store<FakeConnector>> {
        BackupCommand::new(store, Scope::new(Some("p1"), None))
    }

    #[tokio::test]
    async fn cloud_snapshot_create_sends_retention() {
        let path = "/api/atlas/v1.0/groups/p1/clusters/Cluster0/backup/snapshots";
        let transport = RecordingTransport::new().with_response(
            Method::Post,
            path,
            json!({"id": "s1", "status": "queued"}),
        );
        let store = store(Service::Cloud, transport.clone());

        let command = AtlasBackupCommands::Snapshots {
            command: SnapshotCommands::Create {
                cluster_name: "Cluster0".to_string(),
                desc: Some("before upgrade".to_string()),
                retention: 7,
                project: ProjectArg::default(),
            },
        };
        let mut out = Vec::new();
        scoped(&store)
            .execute(&mut out, &OutputFormat::default(), &command)
            .await
            .expect("create");

        let body = transport.last_request().and_then(|r| r.body).expect("body");
        assert_eq!(body, json!({"description": "before upgrade", "retentionInDays": 7}));
        assert!(String::from_utf8_lossy(&out).contains("queued"));
    }

    #[test_case(Service::Cloud, "/api/atlas/v1.0/groups/p1/clusters/Cluster0/snapshots" ; "cloud by name")]
    #[test_case(Service::OpsManager, "/api/public/v1.0/groups/p1/clusters/Cluster0/snapshots" ; "ops-manager by id")]
    #[tokio::test]
    async fn continuous_list_routes_by_service(service: Service, path: &str) {
        let transport = RecordingTransport::new().with_response(
            Method::Get,
            path,
            json!({"results": [{"id": "s1", "complete": true, "doesNotExpire": true}], "totalCount": 1}),
        );
        let store = store(service, transport);

        let command = ContinuousCommands::List {
            cluster: "Cluster0".to_string(),
            project: ProjectArg::default(),
            page: PageArgs::default(),
        };
        let mut out = Vec::new();
        scoped(&store)
            .continuous(&mut out, &OutputFormat::default(), &command)
            .await
            .expect("list");
        let out = String::from_utf8(out).expect("utf8");
        assert!(out.contains("s1"));
        assert!(out.contains("never"));
    }

    #[tokio::test]
    async fn schedule_update_reads_file() {
        let path = "/api/public/v1.0/groups/p1/backupConfigs/c1/snapshotSchedule";
        let transport = RecordingTransport::new().with_response(
            Method::Patch,
            path,
            json!({"clusterId": "c1", "snapshotIntervalHours": 6}),
        );
        let store = store(Service::OpsManager, transport.clone());

        let mut file = NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"snapshotIntervalHours": 6}}"#).expect("write");

        let command = OmBackupCommands::Schedule {
            command: ScheduleCommands::Update {
                cluster_id: "c1".to_string(),
                file: file.path().to_path_buf(),
                project: ProjectArg::default(),
            },
        };
        let mut out = Vec::new();
        scoped(&store)
            .execute_ops_manager(&mut out, &OutputFormat::new(Format::Json), &command)
            .await
            .expect("update");

        let request = transport.last_request().expect("sent");
        assert_eq!(request.path, path);
        assert_eq!(request.body, Some(json!({"snapshotIntervalHours": 6})));
    }

    #[tokio::test]
    async fn backup_config_status_flag() {
        let path = "/api/public/v1.0/groups/p1/backupConfigs/c1";
        let transport = RecordingTransport::new().with_response(
            Method::Patch,
            path,
            json!({"clusterId": "c1", "statusName": "STOPPED"}),
        );
        let store = store(Service::CloudManager, transport.clone());

        let command = OmBackupCommands::Config {
            command: BackupConfigCommands::Update {
                cluster_id: "c1".to_string(),
                status: Some("stopped".to_string()),
                file: None,
                project: ProjectArg::default(),
            },
        };
        let mut out = Vec::new();
        scoped(&store)
            .execute_ops_manager(&mut out, &OutputFormat::default(), &command)
            .await
            .expect("update");

        let body = transport.last_request().and_then(|r| r.body).expect("body");
        assert_eq!(body, json!({"statusName": "STOPPED"}));
        assert!(String::from_utf8_lossy(&out).contains("STOPPED"));
    }

    #[tokio::test]
    async fn schedule_on_cloud_is_refused() {
        let transport = RecordingTransport::new();
        let store = store(Service::Cloud, transport.clone());

        let command = OmBackupCommands::Schedule {
            command: ScheduleCommands::Describe {
                cluster_id: "c1".to_string(),
                project: ProjectArg::default(),
            },
        };
        let err = scoped(&store)
            .execute_ops_manager(&mut Vec::new(), &OutputFormat::default(), &command)
            .await
            .expect_err("unsupported");
        assert!(matches!(
            err,
            CliError::Store(ref e) if e.is_unsupported()
        ));
        assert_eq!(transport.request_count(), 0);
    }
}
