//! Quick-start: everything needed to connect to a new cluster in one step.
//!
//! The flow checks that the region offers the tier, refuses to reuse a
//! cluster name, opens the access list, creates the database user unless it
//! already exists and finally creates the cluster. With `--sample-data` it
//! then waits for the cluster to become `IDLE` and loads the sample dataset.

use std::io::Write;
use std::time::Duration;

use dbplane_store::atlas::{self, DatabaseUser, ProviderSettings, RegionsOptions, Role};
use dbplane_store::{AtlasClusterQuickStarter, ProjectClusters};
use serde::Serialize;
use tokio::time::{Instant, sleep};
use tracing::{debug, info};

use super::access_lists::access_list_requests;
use super::{Scope, entries};
use crate::cli::QuickStartArgs;
use crate::error::CliError;
use crate::output::{OutputFormat, TableDisplay};

const AUTH_DB: &str = "admin";
const DEFAULT_ROLE: &str = "readWriteAnyDatabase";
const ACCESS_LIST_COMMENT: &str = "IP added with dbplane quick-start";

/// Quick-start command executor.
pub struct QuickStartCommand<'a, S> {
    store: &'a S,
    scope: Scope<'a>,
}

impl<'a, S: AtlasClusterQuickStarter + Sync> QuickStartCommand<'a, S> {
    /// Create a new quick-start command.
    #[must_use]
    pub const fn new(store: &'a S, scope: Scope<'a>) -> Self {
        Self { store, scope }
    }

    /// Run the quick-start flow.
    ///
    /// # Errors
    ///
    /// Returns an error if a step fails or a wait times out.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        args: &QuickStartArgs,
    ) -> Result<(), CliError> {
        let project_id = self.scope.project(&args.project)?;
        let entries = if args.entries.ips.is_empty() && args.entries.cidrs.is_empty() {
            Vec::new()
        } else {
            entries(&args.entries)?
        };
        let wait = if args.sample_data {
            Some(Wait::new(args.poll_interval, args.timeout)?)
        } else {
            None
        };
        let provider = args.provider.to_uppercase();
        let region = args.region.to_uppercase();
        let tier = args.tier.to_uppercase();

        let regions = self
            .store
            .cloud_provider_regions(
                project_id,
                &RegionsOptions {
                    providers: vec![provider.clone()],
                    tier: Some(tier.clone()),
                },
            )
            .await?;
        if !regions.offers(&provider, &tier, &region) {
            return Err(CliError::InvalidArgument(format!(
                "{provider} does not offer {tier} in {region}"
            )));
        }

        let existing = self.store.project_clusters(project_id, None).await?;
        if let ProjectClusters::Atlas(clusters) = &existing {
            if clusters
                .iter()
                .any(|c| c.name.as_deref() == Some(args.cluster_name.as_str()))
            {
                return Err(CliError::InvalidArgument(format!(
                    "cluster '{}' already exists",
                    args.cluster_name
                )));
            }
        }

        let mut summary = QuickStartSummary {
            project_id: project_id.to_string(),
            cluster_name: args.cluster_name.clone(),
            database_user: args.username.clone(),
            database_user_created: false,
            access_list: Vec::new(),
            state: None,
            connection_string: None,
            sample_data: None,
        };

        if !entries.is_empty() {
            let requests = access_list_requests(&entries, Some(ACCESS_LIST_COMMENT), None);
            self.store
                .create_project_ip_access_list(project_id, &requests)
                .await?;
            summary.access_list = requests
                .into_iter()
                .filter_map(|r| r.cidr_block.or(r.ip_address))
                .collect();
            info!(project_id, entries = summary.access_list.len(), "access list updated");
        }

        summary.database_user_created = self.ensure_database_user(project_id, args).await?;

        let cluster = atlas::Cluster {
            name: Some(args.cluster_name.clone()),
            cluster_type: Some("REPLICASET".to_string()),
            replication_factor: Some(args.members),
            provider_settings: Some(ProviderSettings {
                provider_name: Some(provider),
                region_name: Some(region),
                instance_size_name: Some(tier),
                ..ProviderSettings::default()
            }),
            ..atlas::Cluster::default()
        };
        let created = self.store.create_cluster(project_id, &cluster).await?;
        info!(project_id, cluster = %args.cluster_name, "cluster creation started");
        summary.state = created.state_name;

        if let Some(wait) = &wait {
            let cluster = self.wait_for_idle(project_id, &args.cluster_name, wait).await?;
            summary.state = cluster.state_name;
            summary.connection_string = cluster
                .connection_strings
                .and_then(|c| c.standard_srv.or(c.standard));

            let job = self.store.add_sample_data(project_id, &args.cluster_name).await?;
            let job = self.wait_for_sample_data(project_id, job, wait).await?;
            summary.sample_data = Some(job.state);
        }

        format.write(writer, &summary)?;
        Ok(())
    }

    /// Create the database user unless it already exists.
    async fn ensure_database_user(
        &self,
        project_id: &str,
        args: &QuickStartArgs,
    ) -> Result<bool, CliError> {
        match self
            .store
            .database_user(AUTH_DB, project_id, &args.username)
            .await
        {
            Ok(_) => {
                debug!(username = %args.username, "database user exists, keeping it");
                Ok(false)
            }
            Err(e) if e.status() == Some(404) => {
                let user = DatabaseUser {
                    database_name: AUTH_DB.to_string(),
                    username: args.username.clone(),
                    password: Some(args.password.clone()),
                    roles: vec![Role {
                        role_name: DEFAULT_ROLE.to_string(),
                        database_name: AUTH_DB.to_string(),
                        collection_name: None,
                    }],
                    ..DatabaseUser::default()
                };
                self.store.create_database_user(project_id, &user).await?;
                Ok(true)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn wait_for_idle(
        &self,
        project_id: &str,
        name: &str,
        wait: &Wait,
    ) -> Result<atlas::Cluster, CliError> {
        loop {
            let cluster = self.store.atlas_cluster(project_id, name).await?;
            if cluster.state_name.as_deref() == Some("IDLE") {
                return Ok(cluster);
            }
            debug!(cluster = name, state = ?cluster.state_name, "waiting for cluster");
            wait.tick(|| format!("cluster '{name}' to become IDLE")).await?;
        }
    }

    async fn wait_for_sample_data(
        &self,
        project_id: &str,
        mut job: atlas::SampleDatasetJob,
        wait: &Wait,
    ) -> Result<atlas::SampleDatasetJob, CliError> {
        while !job.is_finished() {
            debug!(job = %job.id, state = %job.state, "waiting for sample data");
            wait.tick(|| format!("sample data job '{}'", job.id)).await?;
            job = self.store.sample_data_status(project_id, &job.id).await?;
        }
        if job.state == "FAILED" {
            return Err(CliError::InvalidArgument(format!(
                "sample data load failed: {}",
                job.error_message.as_deref().unwrap_or("no reason given")
            )));
        }
        Ok(job)
    }
}

/// Poll interval and deadline shared by every wait of one run.
///
/// The deadline is fixed when the run starts, before anything is created.
#[derive(Debug)]
struct Wait {
    interval: Duration,
    deadline: Instant,
}

impl Wait {
    fn new(interval_secs: u64, timeout_secs: u64) -> Result<Self, CliError> {
        let deadline = Instant::now()
            .checked_add(Duration::from_secs(timeout_secs))
            .ok_or_else(|| CliError::InvalidArgument(format!("timeout of {timeout_secs}s is too large")))?;
        Ok(Self {
            interval: Duration::from_secs(interval_secs),
            deadline,
        })
    }

    async fn tick(&self, what: impl FnOnce() -> String) -> Result<(), CliError> {
        if Instant::now() >= self.deadline {
            return Err(CliError::Timeout(what()));
        }
        sleep(self.interval).await;
        Ok(())
    }
}

// ============================================================================
// Output types
// ============================================================================

/// What quick-start set up.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickStartSummary {
    /// Project the resources live in.
    pub project_id: String,
    /// Cluster name.
    pub cluster_name: String,
    /// Database user name.
    pub database_user: String,
    /// Whether the user was created by this run.
    pub database_user_created: bool,
    /// Access list entries added.
    pub access_list: Vec<String>,
    /// Last known cluster state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Connection string, once the cluster is ready.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_string: Option<String>,
    /// Final sample data job state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_data: Option<String>,
}

impl TableDisplay for QuickStartSummary {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(
            writer,
            "✓ Cluster '{}' is being created in project {}",
            self.cluster_name, self.project_id
        )?;
        if self.database_user_created {
            writeln!(writer, "✓ Database user '{}' created", self.database_user)?;
        } else {
            writeln!(writer, "  Database user '{}' already existed", self.database_user)?;
        }
        if !self.access_list.is_empty() {
            writeln!(writer, "✓ Access list: {}", self.access_list.join(", "))?;
        }
        if let Some(state) = &self.state {
            writeln!(writer, "  State: {state}")?;
        }
        if let Some(conn) = &self.connection_string {
            writeln!(writer, "  Connect with: {conn}")?;
        }
        if let Some(sample) = &self.sample_data {
            writeln!(writer, "✓ Sample data: {sample}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{EntryArgs, Format, ProjectArg};
    use dbplane_http::Method;
    use dbplane_http::testing::RecordingTransport;
    use dbplane_store::Service;
    use dbplane_store::testing::store;
    use serde_json::{Value, json};

    const GROUP: &str = "/api/atlas/v1.0/groups/p1";

    fn args(sample_data: bool) -> QuickStartArgs {
        QuickStartArgs {
            cluster_name: "Cluster0".to_string(),
            provider: "AWS".to_string(),
            region: "US_EAST_1".to_string(),
            tier: "M10".to_string(),
            members: 3,
            username: "app".to_string(),
            password: "s3cret".to_string(),
            entries: EntryArgs {
                ips: vec!["10.0.0.1".to_string()],
                cidrs: vec![],
            },
            sample_data,
            poll_interval: 0,
            timeout: 5,
            project: ProjectArg {
                project_id: Some("p1".to_string()),
            },
        }
    }

    fn regions() -> Value {
        json!({"results": [{
            "provider": "AWS",
            "instanceSizes": [{"name": "M10", "availableRegions": [{"name": "US_EAST_1"}]}]
        }]})
    }

    fn happy_transport() -> RecordingTransport {
        RecordingTransport::new()
            .with_response(Method::Get, format!("{GROUP}/clusters/provider/regions"), regions())
            .with_response(Method::Get, format!("{GROUP}/clusters"), json!({"results": []}))
            .with_response(Method::Post, format!("{GROUP}/accessList"), json!({"results": []}))
            .with_response(Method::Post, format!("{GROUP}/databaseUsers"), json!({"username": "app"}))
            .with_response(
                Method::Post,
                format!("{GROUP}/clusters"),
                json!({"name": "Cluster0", "stateName": "CREATING"}),
            )
    }

    async fn run(transport: RecordingTransport, args: &QuickStartArgs) -> Result<Value, CliError> {
        let store = store(Service::Cloud, transport);
        let cmd = QuickStartCommand::new(&store, Scope::default());
        let mut out = Vec::new();
        cmd.execute(&mut out, &OutputFormat::new(Format::Json), args)
            .await?;
        Ok(serde_json::from_slice(&out).expect("json"))
    }

    #[tokio::test]
    async fn creates_access_list_user_and_cluster() {
        let transport = happy_transport();
        let summary = run(transport.clone(), &args(false)).await.expect("quick start");

        assert_eq!(summary["databaseUserCreated"], json!(true));
        assert_eq!(summary["accessList"], json!(["10.0.0.1"]));
        assert_eq!(summary["state"], json!("CREATING"));

        let posts: Vec<String> = transport
            .requests()
            .into_iter()
            .filter(|r| r.method == Method::Post)
            .map(|r| r.path)
            .collect();
        assert_eq!(
            posts,
            vec![
                format!("{GROUP}/accessList"),
                format!("{GROUP}/databaseUsers"),
                format!("{GROUP}/clusters"),
            ]
        );
    }

    #[tokio::test]
    async fn keeps_existing_user() {
        let transport = happy_transport().with_response(
            Method::Get,
            format!("{GROUP}/databaseUsers/admin/app"),
            json!({"username": "app", "databaseName": "admin"}),
        );
        let summary = run(transport.clone(), &args(false)).await.expect("quick start");

        assert_eq!(summary["databaseUserCreated"], json!(false));
        assert!(
            !transport
                .requests()
                .iter()
                .any(|r| r.method == Method::Post && r.path.ends_with("/databaseUsers"))
        );
    }

    #[tokio::test]
    async fn rejects_region_without_tier() {
        let transport = happy_transport();
        let mut args = args(false);
        args.region = "EU_WEST_3".to_string();

        let err = run(transport.clone(), &args).await.expect_err("region");
        assert!(err.to_string().contains("EU_WEST_3"));
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn rejects_existing_cluster_name() {
        let transport = happy_transport().with_response(
            Method::Get,
            format!("{GROUP}/clusters"),
            json!({"results": [{"name": "Cluster0"}]}),
        );
        let err = run(transport.clone(), &args(false)).await.expect_err("exists");
        assert!(err.to_string().contains("already exists"));
        assert!(transport.requests().iter().all(|r| r.method == Method::Get));
    }

    #[tokio::test]
    async fn waits_and_loads_sample_data() {
        let transport = happy_transport()
            .with_response(
                Method::Get,
                format!("{GROUP}/clusters/Cluster0"),
                json!({
                    "name": "Cluster0",
                    "stateName": "IDLE",
                    "connectionStrings": {"standardSrv": "mongodb+srv://cluster0.example.net"}
                }),
            )
            .with_response(
                Method::Post,
                format!("{GROUP}/sampleDatasetLoad/Cluster0"),
                json!({"_id": "job1", "clusterName": "Cluster0", "state": "WORKING"}),
            )
            .with_response(
                Method::Get,
                format!("{GROUP}/sampleDatasetLoad/job1"),
                json!({"_id": "job1", "clusterName": "Cluster0", "state": "COMPLETED"}),
            );

        let summary = run(transport, &args(true)).await.expect("quick start");
        assert_eq!(summary["sampleData"], json!("COMPLETED"));
        assert_eq!(summary["state"], json!("IDLE"));
        assert_eq!(
            summary["connectionString"],
            json!("mongodb+srv://cluster0.example.net")
        );
    }

    #[tokio::test]
    async fn failed_sample_data_is_an_error() {
        let transport = happy_transport()
            .with_response(
                Method::Get,
                format!("{GROUP}/clusters/Cluster0"),
                json!({"name": "Cluster0", "stateName": "IDLE"}),
            )
            .with_response(
                Method::Post,
                format!("{GROUP}/sampleDatasetLoad/Cluster0"),
                json!({"_id": "job1", "state": "FAILED", "errorMessage": "disk full"}),
            );

        let err = run(transport, &args(true)).await.expect_err("failed");
        assert!(err.to_string().contains("disk full"));
    }

    #[tokio::test]
    async fn times_out_waiting_for_idle() {
        let transport = happy_transport().with_response(
            Method::Get,
            format!("{GROUP}/clusters/Cluster0"),
            json!({"name": "Cluster0", "stateName": "CREATING"}),
        );
        let mut args = args(true);
        args.timeout = 0;

        let err = run(transport, &args).await.expect_err("timeout");
        assert!(matches!(err, CliError::Timeout(_)));
    }

    #[test]
    fn huge_timeout_is_rejected() {
        assert!(matches!(
            Wait::new(10, u64::MAX),
            Err(CliError::InvalidArgument(_))
        ));
        assert!(Wait::new(10, 1800).is_ok());
    }

    #[tokio::test]
    async fn huge_timeout_fails_before_creating_anything() {
        let transport = happy_transport();
        let mut args = args(true);
        args.timeout = u64::MAX;

        let store = store(Service::Cloud, transport.clone());
        let cmd = QuickStartCommand::new(&store, Scope::default());
        let err = cmd
            .execute(&mut Vec::new(), &OutputFormat::default(), &args)
            .await
            .expect_err("too large");
        assert!(matches!(err, CliError::InvalidArgument(_)));
        assert_eq!(transport.request_count(), 0);
    }
}
