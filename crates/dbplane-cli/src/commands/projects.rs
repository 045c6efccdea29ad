//! Project command implementation.

use std::io::Write;

use dbplane_store::{
    OrgProjectLister, Project, ProjectCreator, ProjectDeleter, ProjectDescriber, ProjectLister,
};

use super::Scope;
use crate::cli::ProjectCommands;
use crate::error::CliError;
use crate::output::{Message, OutputFormat, Row, cell};

/// Project command executor.
pub struct ProjectCommand<'a, S> {
    store: &'a S,
    scope: Scope<'a>,
}

impl<'a, S> ProjectCommand<'a, S>
where
    S: ProjectLister + OrgProjectLister + ProjectDescriber + ProjectCreator + ProjectDeleter + Sync,
{
    /// Create a new project command.
    #[must_use]
    pub const fn new(store: &'a S, scope: Scope<'a>) -> Self {
        Self { store, scope }
    }

    /// Execute a project subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &ProjectCommands,
    ) -> Result<(), CliError> {
        match command {
            // Only an explicit --org-id narrows the listing; the profile's
            // organization does not.
            ProjectCommands::List { org_id, page } => {
                let opts = page.options();
                let projects = match org_id {
                    Some(org_id) => self.store.org_projects(org_id, opts.as_ref()).await?,
                    None => self.store.projects(opts.as_ref()).await?,
                };
                format.write(writer, &projects)?;
            }
            ProjectCommands::Describe { project_id } => {
                let project = self.store.project(project_id).await?;
                format.write(writer, &project)?;
            }
            ProjectCommands::Create { name, org } => {
                let org_id = self.scope.org(org)?;
                let project = self.store.create_project(name, org_id).await?;
                format.write(writer, &project)?;
            }
            ProjectCommands::Delete { project_id } => {
                self.store.delete_project(project_id).await?;
                let msg = Message::success(format!("Project '{project_id}' deleted"));
                format.write(writer, &msg)?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// Output types
// ============================================================================

impl Row for Project {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "ORG ID"];

    fn cells(&self) -> Vec<String> {
        vec![self.id.clone(), self.name.clone(), cell(self.org_id.as_deref())]
    }
}

crate::single_row!(Project);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Format, OrgArg, PageArgs};
    use dbplane_http::Method;
    use dbplane_http::testing::RecordingTransport;
    use dbplane_store::Service;
    use dbplane_store::testing::store;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(Service::Cloud, "/api/atlas/v1.0/groups" ; "cloud")]
    #[test_case(Service::OpsManager, "/api/public/v1.0/groups" ; "ops-manager")]
    #[test_case(Service::CloudManager, "/api/public/v1.0/groups" ; "cloud-manager")]
    #[tokio::test]
    async fn list_in_every_service(service: Service, path: &str) {
        let transport = RecordingTransport::new().with_response(
            Method::Get,
            path,
            json!({"results": [{"id": "p1", "name": "prod", "orgId": "o1"}], "totalCount": 3}),
        );
        let store = store(service, transport);
        let cmd = ProjectCommand::new(&store, Scope::new(None, Some("profile-org")));

        let command = ProjectCommands::List {
            org_id: None,
            page: PageArgs::default(),
        };
        let mut out = Vec::new();
        cmd.execute(&mut out, &OutputFormat::default(), &command)
            .await
            .expect("list");
        let out = String::from_utf8(out).expect("utf8");
        assert!(out.contains("prod"));
        assert!(out.contains("Showing 1 of 3"));
    }

    #[tokio::test]
    async fn org_flag_selects_org_listing() {
        let transport = RecordingTransport::new().with_response(
            Method::Get,
            "/api/atlas/v1.0/orgs/o1/groups",
            json!({"results": []}),
        );
        let store = store(Service::Cloud, transport.clone());
        let cmd = ProjectCommand::new(&store, Scope::default());

        let command = ProjectCommands::List {
            org_id: Some("o1".to_string()),
            page: PageArgs::default(),
        };
        cmd.execute(&mut Vec::new(), &OutputFormat::default(), &command)
            .await
            .expect("list");
        assert_eq!(
            transport.last_request().map(|r| r.path).as_deref(),
            Some("/api/atlas/v1.0/orgs/o1/groups")
        );
    }

    #[tokio::test]
    async fn create_uses_profile_org() {
        let transport = RecordingTransport::new().with_response(
            Method::Post,
            "/api/public/v1.0/groups",
            json!({"id": "p9", "name": "new", "orgId": "o1", "activeAgentCount": 0}),
        );
        let store = store(Service::OpsManager, transport.clone());
        let cmd = ProjectCommand::new(&store, Scope::new(None, Some("o1")));

        let command = ProjectCommands::Create {
            name: "new".to_string(),
            org: OrgArg::default(),
        };
        let mut out = Vec::new();
        cmd.execute(&mut out, &OutputFormat::new(Format::Json), &command)
            .await
            .expect("create");

        let body = transport.last_request().and_then(|r| r.body).expect("body");
        assert_eq!(body["orgId"], json!("o1"));
        let out: serde_json::Value = serde_json::from_slice(&out).expect("json");
        assert_eq!(out["id"], json!("p9"));
        assert_eq!(out["activeAgentCount"], json!(0));
    }

    #[tokio::test]
    async fn create_without_org_fails_before_request() {
        let transport = RecordingTransport::new();
        let store = store(Service::Cloud, transport.clone());
        let cmd = ProjectCommand::new(&store, Scope::default());

        let command = ProjectCommands::Create {
            name: "new".to_string(),
            org: OrgArg::default(),
        };
        let err = cmd
            .execute(&mut Vec::new(), &OutputFormat::default(), &command)
            .await
            .expect_err("no org");
        assert!(matches!(err, CliError::MissingOrgId));
        assert_eq!(transport.request_count(), 0);
    }
}
