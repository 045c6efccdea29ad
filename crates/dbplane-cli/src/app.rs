//! Top-level dispatch from parsed arguments to command executors.

use std::io::Write;

use dbplane_store::{ConfigFile, Connector, Store};
use tracing::debug;

use crate::cli::{AtlasCommands, Commands, IamCommands, OpsManagerCommands, OrganizationCommands};
use crate::commands::{
    AccessListCommand, ApiKeyCommand, BackupCommand, ClusterCommand, ConfigCommand,
    DbUserCommand, OpsManagerCommand, PrivateEndpointCommand, ProjectCommand, QuickStartCommand,
    RegionCommand, Scope,
};
use crate::error::CliError;
use crate::output::OutputFormat;

/// Everything a command run needs: the store, the loaded configuration and
/// the output format.
pub struct App<'a, C: Connector> {
    store: &'a Store<C>,
    config: &'a ConfigFile,
    format: OutputFormat,
}

impl<'a, C: Connector> App<'a, C> {
    /// Create an app over `store`.
    #[must_use]
    pub const fn new(store: &'a Store<C>, config: &'a ConfigFile, format: OutputFormat) -> Self {
        Self {
            store,
            config,
            format,
        }
    }

    fn scope(&self) -> Scope<'a> {
        Scope::from_profile(self.store.profile())
    }

    /// Run one command, writing its output to `out`.
    ///
    /// # Errors
    ///
    /// Returns the command's error.
    pub async fn run<W: Write>(&self, out: &mut W, command: &Commands) -> Result<(), CliError> {
        debug!(service = %self.store.profile().service(), profile = %self.store.profile().name, "running command");
        match command {
            Commands::Atlas { command } => self.atlas(out, command).await,
            Commands::OpsManager { command } => self.ops_manager(out, command).await,
            Commands::Iam { command } => self.iam(out, command).await,
            Commands::Config { command } => {
                ConfigCommand::new(self.config, self.store.profile()).execute(out, &self.format, command)
            }
        }
    }

    async fn atlas<W: Write>(&self, out: &mut W, command: &AtlasCommands) -> Result<(), CliError> {
        let (store, scope, format) = (self.store, self.scope(), &self.format);
        match command {
            AtlasCommands::Clusters { command } => {
                ClusterCommand::new(store, scope).execute(out, format, command).await
            }
            AtlasCommands::QuickStart(args) => {
                QuickStartCommand::new(store, scope).execute(out, format, args).await
            }
            AtlasCommands::Dbusers { command } => {
                DbUserCommand::new(store, scope).execute(out, format, command).await
            }
            AtlasCommands::AccessLists { command } => {
                AccessListCommand::new(store, scope).execute(out, format, command).await
            }
            AtlasCommands::Regions { command } => {
                RegionCommand::new(store, scope).execute(out, format, command).await
            }
            AtlasCommands::Backups { command } => {
                BackupCommand::new(store, scope).execute(out, format, command).await
            }
            AtlasCommands::PrivateEndpoints { command } => {
                PrivateEndpointCommand::new(store, scope).execute(out, format, command).await
            }
        }
    }

    async fn ops_manager<W: Write>(
        &self,
        out: &mut W,
        command: &OpsManagerCommands,
    ) -> Result<(), CliError> {
        let (store, scope, format) = (self.store, self.scope(), &self.format);
        match command {
            OpsManagerCommands::Clusters { command } => {
                OpsManagerCommand::new(store, scope).clusters(out, format, command).await
            }
            OpsManagerCommands::Backups { command } => {
                BackupCommand::new(store, scope)
                    .execute_ops_manager(out, format, command)
                    .await
            }
            OpsManagerCommands::Automation { command } => {
                OpsManagerCommand::new(store, scope).automation(out, format, command).await
            }
        }
    }

    async fn iam<W: Write>(&self, out: &mut W, command: &IamCommands) -> Result<(), CliError> {
        let (store, scope, format) = (self.store, self.scope(), &self.format);
        match command {
            IamCommands::Projects { command } => {
                ProjectCommand::new(store, scope).execute(out, format, command).await
            }
            IamCommands::Organizations {
                command: OrganizationCommands::Apikeys { command },
            } => ApiKeyCommand::new(store, scope).execute(out, format, command).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;
    use dbplane_http::Method;
    use dbplane_http::testing::RecordingTransport;
    use dbplane_store::testing::FakeConnector;
    use dbplane_store::{Profile, Service};
    use serde_json::json;

    fn app_store(service: Service, transport: RecordingTransport) -> Store<FakeConnector> {
        let mut profile = Profile::new("test", service);
        profile.project_id = Some("p1".to_string());
        profile.org_id = Some("o1".to_string());
        Store::with_connector(profile, FakeConnector::new(transport))
    }

    async fn run(store: &Store<FakeConnector>, args: &[&str]) -> Result<String, CliError> {
        let cli = Cli::try_parse_from(std::iter::once("dbplane").chain(args.iter().copied()))
            .map_err(|e| CliError::InvalidArgument(e.to_string()))?;
        let config = ConfigFile::default();
        let app = App::new(store, &config, OutputFormat::default());
        let mut out = Vec::new();
        app.run(&mut out, &cli.command).await?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    #[tokio::test]
    async fn pause_uses_profile_project() {
        let path = "/api/atlas/v1.0/groups/p1/clusters/Cluster0";
        let transport = RecordingTransport::new().with_response(
            Method::Patch,
            path,
            json!({"name": "Cluster0", "paused": true, "stateName": "IDLE"}),
        );
        let store = app_store(Service::Cloud, transport.clone());

        let out = run(&store, &["atlas", "clusters", "pause", "Cluster0"])
            .await
            .expect("pause");
        assert!(out.contains("Cluster0"));
        let request = transport.last_request().expect("request sent");
        assert_eq!(request.method, Method::Patch);
        assert_eq!(request.body, Some(json!({"paused": true})));
    }

    #[tokio::test]
    async fn ops_manager_refuses_cloud_only_command() {
        let transport = RecordingTransport::new();
        let store = app_store(Service::OpsManager, transport.clone());

        let err = run(&store, &["atlas", "dbusers", "list"])
            .await
            .expect_err("unsupported");
        assert!(
            err.to_string()
                .contains("is not supported for service ops-manager")
        );
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn cloud_manager_alias_reaches_automation() {
        let transport = RecordingTransport::new().with_response(
            Method::Get,
            "/api/public/v1.0/groups/p1/automationStatus",
            json!({"goalVersion": 4, "processes": [
                {"hostname": "h1", "name": "rs0_0", "lastGoalVersionAchieved": 4}
            ]}),
        );
        let store = app_store(Service::CloudManager, transport);

        let out = run(&store, &["cloud-manager", "automation", "status"])
            .await
            .expect("status");
        assert!(out.contains("Goal version: 4"));
    }

    #[tokio::test]
    async fn projects_list_in_every_mode() {
        for (service, path) in [
            (Service::Cloud, "/api/atlas/v1.0/groups"),
            (Service::OpsManager, "/api/public/v1.0/groups"),
        ] {
            let transport = RecordingTransport::new().with_response(
                Method::Get,
                path,
                json!({"results": [{"id": "p1", "name": "prod", "orgId": "o1"}], "totalCount": 1}),
            );
            let store = app_store(service, transport);
            let out = run(&store, &["iam", "projects", "list"])
                .await
                .expect("list");
            assert!(out.contains("prod"), "{service}: {out}");
        }
    }

    #[tokio::test]
    async fn config_describe_needs_no_backend() {
        let connector = FakeConnector::new(RecordingTransport::new());
        let store = Store::with_connector(Profile::new("default", Service::Cloud), connector.clone());

        let out = run(&store, &["config", "describe"]).await.expect("describe");
        assert!(out.contains("default"));
        assert_eq!(connector.connect_count(), 0);
    }
}
