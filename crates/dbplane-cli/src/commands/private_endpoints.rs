//! Private endpoint command implementation.

use std::io::Write;

use dbplane_store::atlas::{
    InterfaceEndpointConnection, PrivateEndpointConnection, PrivateEndpointRequest,
};
use dbplane_store::{
    InterfaceEndpointManager, PrivateEndpointCreator, PrivateEndpointDeleter,
    PrivateEndpointDescriber, PrivateEndpointLister,
};

use super::Scope;
use crate::cli::{InterfaceCommands, PrivateEndpointCommands};
use crate::error::CliError;
use crate::output::{Message, OutputFormat, Row, cell};

/// Private endpoint command executor.
pub struct PrivateEndpointCommand<'a, S> {
    store: &'a S,
    scope: Scope<'a>,
}

impl<'a, S> PrivateEndpointCommand<'a, S>
where
    S: PrivateEndpointLister
        + PrivateEndpointDescriber
        + PrivateEndpointCreator
        + PrivateEndpointDeleter
        + InterfaceEndpointManager
        + Sync,
{
    /// Create a new private endpoint command.
    #[must_use]
    pub const fn new(store: &'a S, scope: Scope<'a>) -> Self {
        Self { store, scope }
    }

    /// Execute a private endpoint subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &PrivateEndpointCommands,
    ) -> Result<(), CliError> {
        match command {
            PrivateEndpointCommands::List { project } => {
                let project_id = self.scope.project(project)?;
                let endpoints = self.store.private_endpoints(project_id).await?;
                format.write(writer, &endpoints)?;
            }
            PrivateEndpointCommands::Describe {
                endpoint_id,
                project,
            } => {
                let project_id = self.scope.project(project)?;
                let endpoint = self.store.private_endpoint(project_id, endpoint_id).await?;
                format.write(writer, &endpoint)?;
            }
            PrivateEndpointCommands::Create {
                provider,
                region,
                project,
            } => {
                let project_id = self.scope.project(project)?;
                let request = PrivateEndpointRequest {
                    provider_name: provider.to_uppercase(),
                    region: region.clone(),
                };
                let endpoint = self.store.create_private_endpoint(project_id, &request).await?;
                format.write(writer, &endpoint)?;
            }
            PrivateEndpointCommands::Delete {
                endpoint_id,
                project,
            } => {
                let project_id = self.scope.project(project)?;
                self.store
                    .delete_private_endpoint(project_id, endpoint_id)
                    .await?;
                let msg = Message::success(format!("Private endpoint '{endpoint_id}' deleted"));
                format.write(writer, &msg)?;
            }
            PrivateEndpointCommands::Interfaces { command } => {
                self.interfaces(writer, format, command).await?;
            }
        }
        Ok(())
    }

    async fn interfaces<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &InterfaceCommands,
    ) -> Result<(), CliError> {
        match command {
            InterfaceCommands::Describe {
                endpoint_id,
                interface_id,
                project,
            } => {
                let project_id = self.scope.project(project)?;
                let interface = self
                    .store
                    .interface_endpoint(project_id, endpoint_id, interface_id)
                    .await?;
                format.write(writer, &interface)?;
            }
            InterfaceCommands::Create {
                endpoint_id,
                interface_id,
                project,
            } => {
                let project_id = self.scope.project(project)?;
                let interface = self
                    .store
                    .create_interface_endpoint(project_id, endpoint_id, interface_id)
                    .await?;
                format.write(writer, &interface)?;
            }
            InterfaceCommands::Delete {
                endpoint_id,
                interface_id,
                project,
            } => {
                let project_id = self.scope.project(project)?;
                self.store
                    .delete_interface_endpoint(project_id, endpoint_id, interface_id)
                    .await?;
                let msg = Message::success(format!(
                    "Interface endpoint '{interface_id}' detached from '{endpoint_id}'"
                ));
                format.write(writer, &msg)?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// Output types
// ============================================================================

impl Row for PrivateEndpointConnection {
    const HEADERS: &'static [&'static str] = &["ID", "PROVIDER", "REGION", "STATUS", "INTERFACES"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            cell(self.provider_name.as_deref()),
            cell(self.region.as_deref()),
            cell(self.status.as_deref()),
            self.interface_endpoints.len().to_string(),
        ]
    }
}

impl Row for InterfaceEndpointConnection {
    const HEADERS: &'static [&'static str] = &["INTERFACE ENDPOINT", "STATUS", "ERROR"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.interface_endpoint_id.clone(),
            cell(self.connection_status.as_deref()),
            cell(self.error_message.as_deref()),
        ]
    }
}

crate::single_row!(PrivateEndpointConnection, InterfaceEndpointConnection);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ProjectArg;
    use dbplane_http::Method;
    use dbplane_http::testing::RecordingTransport;
    use dbplane_store::Service;
    use dbplane_store::testing::store;
    use serde_json::json;

    const ENDPOINTS: &str = "/api/atlas/v1.0/groups/p1/privateEndpoint";

    #[tokio::test]
    async fn list_counts_interfaces() {
        let transport = RecordingTransport::new().with_response(
            Method::Get,
            ENDPOINTS,
            json!([{
                "id": "pe1",
                "providerName": "AWS",
                "region": "us-east-1",
                "status": "AVAILABLE",
                "interfaceEndpoints": ["vpce-1", "vpce-2"]
            }]),
        );
        let store = store(Service::Cloud, transport);
        let cmd = PrivateEndpointCommand::new(&store, Scope::new(Some("p1"), None));

        let command = PrivateEndpointCommands::List {
            project: ProjectArg::default(),
        };
        let mut out = Vec::new();
        cmd.execute(&mut out, &OutputFormat::default(), &command)
            .await
            .expect("list");
        let out = String::from_utf8(out).expect("utf8");
        let row = out.lines().nth(1).expect("one row");
        assert!(row.starts_with("pe1"));
        assert!(row.ends_with('2'));
    }

    #[tokio::test]
    async fn interface_create_posts_id() {
        let transport = RecordingTransport::new().with_response(
            Method::Post,
            format!("{ENDPOINTS}/pe1/interfaceEndpoints"),
            json!({"interfaceEndpointId": "vpce-1", "connectionStatus": "PENDING"}),
        );
        let store = store(Service::Cloud, transport.clone());
        let cmd = PrivateEndpointCommand::new(&store, Scope::new(Some("p1"), None));

        let command = PrivateEndpointCommands::Interfaces {
            command: InterfaceCommands::Create {
                endpoint_id: "pe1".to_string(),
                interface_id: "vpce-1".to_string(),
                project: ProjectArg::default(),
            },
        };
        cmd.execute(&mut Vec::new(), &OutputFormat::default(), &command)
            .await
            .expect("create");
        let body = transport.last_request().and_then(|r| r.body).expect("body");
        assert_eq!(body, json!({"interfaceEndpointId": "vpce-1"}));
    }

    #[tokio::test]
    async fn refused_on_ops_manager() {
        let transport = RecordingTransport::new();
        let store = store(Service::OpsManager, transport.clone());
        let cmd = PrivateEndpointCommand::new(&store, Scope::new(Some("p1"), None));

        let command = PrivateEndpointCommands::List {
            project: ProjectArg::default(),
        };
        let err = cmd
            .execute(&mut Vec::new(), &OutputFormat::default(), &command)
            .await
            .expect_err("unsupported");
        assert!(err.to_string().contains("not supported"));
        assert_eq!(transport.request_count(), 0);
    }
}
