//! Organization API key command implementation.
//!
//! Provides subcommands for:
//! - Listing, describing, creating, updating and deleting API keys
//! - Managing the access list of an API key

use std::io::Write;

use dbplane_store::{
    AccessListApiKey, AccessListApiKeyRequest, ApiKey, ApiKeyInput,
    OrganizationApiKeyAccessListCreator, OrganizationApiKeyAccessListDeleter,
    OrganizationApiKeyAccessListLister, OrganizationApiKeyCreator, OrganizationApiKeyDeleter,
    OrganizationApiKeyDescriber, OrganizationApiKeyLister, OrganizationApiKeyUpdater,
};

use super::{Entry, Scope, entries};
use crate::cli::{ApiKeyAccessListCommands, ApiKeyCommands};
use crate::error::CliError;
use crate::output::{Message, OutputFormat, Row, TableDisplay, cell, write_rows};

/// API key command executor.
pub struct ApiKeyCommand<'a, S> {
    store: &'a S,
    scope: Scope<'a>,
}

impl<'a, S> ApiKeyCommand<'a, S>
where
    S: OrganizationApiKeyLister
        + OrganizationApiKeyDescriber
        + OrganizationApiKeyCreator
        + OrganizationApiKeyUpdater
        + OrganizationApiKeyDeleter
        + OrganizationApiKeyAccessListLister
        + OrganizationApiKeyAccessListCreator
        + OrganizationApiKeyAccessListDeleter
        + Sync,
{
    /// Create a new API key command.
    #[must_use]
    pub const fn new(store: &'a S, scope: Scope<'a>) -> Self {
        Self { store, scope }
    }

    /// Execute an API key subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments are invalid or the operation fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &ApiKeyCommands,
    ) -> Result<(), CliError> {
        match command {
            ApiKeyCommands::List { org, page } => {
                let org_id = self.scope.org(org)?;
                let keys = self
                    .store
                    .organization_api_keys(org_id, page.options().as_ref())
                    .await?;
                format.write(writer, &keys)?;
            }
            ApiKeyCommands::Describe { key_id, org } => {
                let org_id = self.scope.org(org)?;
                let key = self.store.organization_api_key(org_id, key_id).await?;
                format.write(writer, &key)?;
            }
            ApiKeyCommands::Create { desc, roles, org } => {
                let org_id = self.scope.org(org)?;
                let input = ApiKeyInput {
                    desc: Some(desc.clone()),
                    roles: roles.clone(),
                };
                let key = self.store.create_organization_api_key(org_id, &input).await?;
                format.write(writer, &CreatedKey(key))?;
            }
            ApiKeyCommands::Update {
                key_id,
                desc,
                roles,
                org,
            } => {
                let org_id = self.scope.org(org)?;
                if desc.is_none() && roles.is_empty() {
                    return Err(CliError::InvalidArgument(
                        "nothing to update: pass --desc or --role".to_string(),
                    ));
                }
                let input = ApiKeyInput {
                    desc: desc.clone(),
                    roles: roles.clone(),
                };
                let key = self
                    .store
                    .update_organization_api_key(org_id, key_id, &input)
                    .await?;
                format.write(writer, &key)?;
            }
            ApiKeyCommands::Delete { key_id, org } => {
                let org_id = self.scope.org(org)?;
                self.store.delete_organization_api_key(org_id, key_id).await?;
                format.write(writer, &Message::success(format!("API key '{key_id}' deleted")))?;
            }
            ApiKeyCommands::AccessLists { command } => {
                self.access_lists(writer, format, command).await?;
            }
        }
        Ok(())
    }

    async fn access_lists<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &ApiKeyAccessListCommands,
    ) -> Result<(), CliError> {
        match command {
            ApiKeyAccessListCommands::List { key_id, org, page } => {
                let org_id = self.scope.org(org)?;
                let entries = self
                    .store
                    .organization_api_key_access_lists(org_id, key_id, page.options().as_ref())
                    .await?;
                format.write(writer, &entries)?;
            }
            ApiKeyAccessListCommands::Create {
                key_id,
                entries: args,
                org,
            } => {
                let org_id = self.scope.org(org)?;
                let requests: Vec<AccessListApiKeyRequest> = entries(args)?
                    .into_iter()
                    .map(|entry| match entry {
                        Entry::Ip(ip) => AccessListApiKeyRequest {
                            ip_address: Some(ip),
                            cidr_block: None,
                        },
                        Entry::Cidr(cidr) => AccessListApiKeyRequest {
                            ip_address: None,
                            cidr_block: Some(cidr),
                        },
                    })
                    .collect();
                let list = self
                    .store
                    .create_organization_api_key_access_list(org_id, key_id, &requests)
                    .await?;
                format.write(writer, &list)?;
            }
            ApiKeyAccessListCommands::Delete { key_id, entry, org } => {
                let org_id = self.scope.org(org)?;
                self.store
                    .delete_organization_api_key_access_list(org_id, key_id, entry)
                    .await?;
                let msg = Message::success(format!("Entry '{entry}' removed from API key '{key_id}'"));
                format.write(writer, &msg)?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// Output types
// ============================================================================

impl Row for ApiKey {
    const HEADERS: &'static [&'static str] = &["ID", "PUBLIC KEY", "DESCRIPTION", "ROLES"];

    fn cells(&self) -> Vec<String> {
        let roles = self
            .roles
            .iter()
            .map(|r| r.role_name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        vec![
            self.id.clone(),
            self.public_key.clone(),
            cell(self.desc.as_deref()),
            roles,
        ]
    }
}

impl Row for AccessListApiKey {
    const HEADERS: &'static [&'static str] = &["CIDR BLOCK", "CREATED", "LAST USED", "COUNT"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.cidr_block.clone(),
            cell(self.created.as_deref()),
            cell(self.last_used.as_deref()),
            cell(self.count),
        ]
    }
}

crate::single_row!(ApiKey);

/// A freshly created key; the private half is shown this once.
#[derive(serde::Serialize)]
#[serde(transparent)]
struct CreatedKey(ApiKey);

impl TableDisplay for CreatedKey {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        write_rows(writer, std::slice::from_ref(&self.0))?;
        if let Some(private_key) = &self.0.private_key {
            writeln!(writer)?;
            writeln!(writer, "Private key: {private_key}")?;
            writeln!(writer, "Store it now, it will not be shown again.")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{EntryArgs, OrgArg};
    use dbplane_http::Method;
    use dbplane_http::testing::RecordingTransport;
    use dbplane_store::Service;
    use dbplane_store::testing::store;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(Service::Cloud, "/api/atlas/v1.0/orgs/o1/apiKeys" ; "cloud")]
    #[test_case(Service::OpsManager, "/api/public/v1.0/orgs/o1/apiKeys" ; "ops-manager")]
    #[tokio::test]
    async fn create_shows_private_key_once(service: Service, path: &str) {
        let transport = RecordingTransport::new().with_response(
            Method::Post,
            path,
            json!({
                "id": "k1",
                "publicKey": "abcdefgh",
                "privateKey": "11111111-2222-3333-4444-555555555555",
                "desc": "ci",
                "roles": [{"roleName": "ORG_MEMBER", "orgId": "o1"}]
            }),
        );
        let store = store(service, transport.clone());
        let cmd = ApiKeyCommand::new(&store, Scope::new(None, Some("o1")));

        let command = ApiKeyCommands::Create {
            desc: "ci".to_string(),
            roles: vec!["ORG_MEMBER".to_string()],
            org: OrgArg::default(),
        };
        let mut out = Vec::new();
        cmd.execute(&mut out, &OutputFormat::default(), &command)
            .await
            .expect("create");

        let body = transport.last_request().and_then(|r| r.body).expect("body");
        assert_eq!(body, json!({"desc": "ci", "roles": ["ORG_MEMBER"]}));
        let out = String::from_utf8(out).expect("utf8");
        assert!(out.contains("ORG_MEMBER"));
        assert!(out.contains("Private key: 11111111-2222-3333-4444-555555555555"));
    }

    #[tokio::test]
    async fn update_needs_a_change() {
        let transport = RecordingTransport::new();
        let store = store(Service::Cloud, transport.clone());
        let cmd = ApiKeyCommand::new(&store, Scope::new(None, Some("o1")));

        let command = ApiKeyCommands::Update {
            key_id: "k1".to_string(),
            desc: None,
            roles: vec![],
            org: OrgArg::default(),
        };
        let err = cmd
            .execute(&mut Vec::new(), &OutputFormat::default(), &command)
            .await
            .expect_err("nothing to update");
        assert!(matches!(err, CliError::InvalidArgument(_)));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn access_list_create_sends_ips_and_cidrs() {
        let path = "/api/public/v1.0/orgs/o1/apiKeys/k1/accessList";
        let transport = RecordingTransport::new().with_response(
            Method::Post,
            path,
            json!({"results": [
                {"cidrBlock": "10.0.0.1/32", "ipAddress": "10.0.0.1"},
                {"cidrBlock": "192.168.0.0/16"}
            ], "totalCount": 2}),
        );
        let store = store(Service::CloudManager, transport.clone());
        let cmd = ApiKeyCommand::new(&store, Scope::default());

        let command = ApiKeyCommands::AccessLists {
            command: ApiKeyAccessListCommands::Create {
                key_id: "k1".to_string(),
                entries: EntryArgs {
                    ips: vec!["10.0.0.1".to_string()],
                    cidrs: vec!["192.168.0.0/16".to_string()],
                },
                org: OrgArg {
                    org_id: Some("o1".to_string()),
                },
            },
        };
        let mut out = Vec::new();
        cmd.execute(&mut out, &OutputFormat::default(), &command)
            .await
            .expect("create");

        let body = transport.last_request().and_then(|r| r.body).expect("body");
        assert_eq!(
            body,
            json!([{"ipAddress": "10.0.0.1"}, {"cidrBlock": "192.168.0.0/16"}])
        );
        let out = String::from_utf8(out).expect("utf8");
        assert!(out.contains("192.168.0.0/16"));
    }

    #[tokio::test]
    async fn missing_org_fails_before_request() {
        let transport = RecordingTransport::new();
        let store = store(Service::Cloud, transport.clone());
        let cmd = ApiKeyCommand::new(&store, Scope::default());

        let command = ApiKeyCommands::List {
            org: OrgArg::default(),
            page: crate::cli::PageArgs::default(),
        };
        let err = cmd
            .execute(&mut Vec::new(), &OutputFormat::default(), &command)
            .await
            .expect_err("no org");
        assert!(err.to_string().contains("missing organization ID"));
        assert_eq!(transport.request_count(), 0);
    }
}
