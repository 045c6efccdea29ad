//! Organization API key contracts and the backend-neutral key shapes.
//!
//! Both backends serve keys with the same wire models
//! ([`dbplane_http::api_keys`]); the façade types below are what callers see
//! in every mode. Fields the façade does not model are kept in `details`.

use std::future::Future;

use dbplane_http::api_keys as wire;
use dbplane_http::{ListOptions, Page};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::connector::Connector;
use crate::error::{Context, Result, required};
use crate::operation::Operation;
use crate::store::{Handle, Store};

/// A programmatic API key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    /// Key ID.
    pub id: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    /// Roles granted to the key.
    pub roles: Vec<ApiKeyRole>,
    /// Public half of the key pair.
    pub public_key: String,
    /// Private half, only present right after creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    /// Backend-specific fields.
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// A role granted to an API key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyRole {
    /// Role name.
    pub role_name: String,
    /// Organization scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    /// Project scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

/// Description and roles for a new or updated key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyInput {
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    /// Role names.
    #[serde(default)]
    pub roles: Vec<String>,
}

/// An API key access list entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessListApiKey {
    /// CIDR block; a single address is reported as a `/32` or `/128`.
    pub cidr_block: String,
    /// Single address, when the entry was added as one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// Requests made from this entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    /// When the entry was added.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    /// Last request time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used: Option<String>,
    /// Address of the last request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_address: Option<String>,
    /// Backend-specific fields.
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// One entry to add to an API key access list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessListApiKeyRequest {
    /// Single address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// CIDR block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidr_block: Option<String>,
}

fn api_key(op: Operation, key: wire::ApiKey) -> Result<ApiKey> {
    Ok(ApiKey {
        id: required(op, "id", key.id)?,
        desc: key.desc,
        roles: key
            .roles
            .into_iter()
            .map(|role| ApiKeyRole {
                role_name: role.role_name,
                org_id: role.org_id,
                group_id: role.group_id,
            })
            .collect(),
        public_key: required(op, "publicKey", key.public_key)?,
        private_key: key.private_key,
        details: key.extra,
    })
}

fn access_entry(op: Operation, entry: wire::AccessListApiKey) -> Result<AccessListApiKey> {
    Ok(AccessListApiKey {
        cidr_block: required(op, "cidrBlock", entry.cidr_block)?,
        ip_address: entry.ip_address,
        count: entry.count,
        created: entry.created,
        last_used: entry.last_used,
        last_used_address: entry.last_used_address,
        details: entry.extra,
    })
}

fn wire_input(input: &ApiKeyInput) -> wire::ApiKeyInput {
    wire::ApiKeyInput {
        desc: input.desc.clone(),
        roles: input.roles.clone(),
    }
}

fn wire_requests(entries: &[AccessListApiKeyRequest]) -> Vec<wire::AccessListApiKeyRequest> {
    entries
        .iter()
        .map(|entry| wire::AccessListApiKeyRequest {
            ip_address: entry.ip_address.clone(),
            cidr_block: entry.cidr_block.clone(),
        })
        .collect()
}

/// Lists the API keys of an organization.
pub trait OrganizationApiKeyLister {
    /// List keys.
    fn organization_api_keys(
        &self,
        org_id: &str,
        opts: Option<&ListOptions>,
    ) -> impl Future<Output = Result<Page<ApiKey>>> + Send;
}

/// Describes an API key.
pub trait OrganizationApiKeyDescriber {
    /// Get a key.
    fn organization_api_key(&self, org_id: &str, key_id: &str) -> impl Future<Output = Result<ApiKey>> + Send;
}

/// Creates API keys.
pub trait OrganizationApiKeyCreator {
    /// Create a key; the result carries the private key.
    fn create_organization_api_key(
        &self,
        org_id: &str,
        input: &ApiKeyInput,
    ) -> impl Future<Output = Result<ApiKey>> + Send;
}

/// Updates API keys.
pub trait OrganizationApiKeyUpdater {
    /// Change the description or roles of a key.
    fn update_organization_api_key(
        &self,
        org_id: &str,
        key_id: &str,
        input: &ApiKeyInput,
    ) -> impl Future<Output = Result<ApiKey>> + Send;
}

/// Deletes API keys.
pub trait OrganizationApiKeyDeleter {
    /// Delete a key.
    fn delete_organization_api_key(&self, org_id: &str, key_id: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Lists the access list of an API key.
pub trait OrganizationApiKeyAccessListLister {
    /// List entries.
    fn organization_api_key_access_lists(
        &self,
        org_id: &str,
        key_id: &str,
        opts: Option<&ListOptions>,
    ) -> impl Future<Output = Result<Page<AccessListApiKey>>> + Send;
}

/// Adds API key access list entries.
pub trait OrganizationApiKeyAccessListCreator {
    /// Add entries; returns the resulting access list.
    fn create_organization_api_key_access_list(
        &self,
        org_id: &str,
        key_id: &str,
        entries: &[AccessListApiKeyRequest],
    ) -> impl Future<Output = Result<Page<AccessListApiKey>>> + Send;
}

/// Removes API key access list entries.
pub trait OrganizationApiKeyAccessListDeleter {
    /// Remove one entry, an address or CIDR block.
    fn delete_organization_api_key_access_list(
        &self,
        org_id: &str,
        key_id: &str,
        entry: &str,
    ) -> impl Future<Output = Result<()>> + Send;
}

impl<C: Connector> OrganizationApiKeyLister for Store<C> {
    async fn organization_api_keys(&self, org_id: &str, opts: Option<&ListOptions>) -> Result<Page<ApiKey>> {
        let op = Operation::OrganizationApiKeys;
        match self.handle(op)? {
            Handle::Atlas(client) => {
                let page = client.api_keys().list(org_id, opts).await.context(op)?;
                page.try_map(|k| api_key(op, k))
            }
            Handle::OpsManager(client) => {
                let page = client.api_keys().list(org_id, opts).await.context(op)?;
                page.try_map(|k| api_key(op, k))
            }
        }
    }
}

impl<C: Connector> OrganizationApiKeyDescriber for Store<C> {
    async fn organization_api_key(&self, org_id: &str, key_id: &str) -> Result<ApiKey> {
        let op = Operation::OrganizationApiKey;
        match self.handle(op)? {
            Handle::Atlas(client) => api_key(op, client.api_keys().get(org_id, key_id).await.context(op)?),
            Handle::OpsManager(client) => api_key(op, client.api_keys().get(org_id, key_id).await.context(op)?),
        }
    }
}

impl<C: Connector> OrganizationApiKeyCreator for Store<C> {
    async fn create_organization_api_key(&self, org_id: &str, input: &ApiKeyInput) -> Result<ApiKey> {
        let op = Operation::CreateOrganizationApiKey;
        match self.handle(op)? {
            Handle::Atlas(client) => {
                let key = client.api_keys().create(org_id, &wire_input(input)).await.context(op)?;
                api_key(op, key)
            }
            Handle::OpsManager(client) => {
                let key = client.api_keys().create(org_id, &wire_input(input)).await.context(op)?;
                api_key(op, key)
            }
        }
    }
}

impl<C: Connector> OrganizationApiKeyUpdater for Store<C> {
    async fn update_organization_api_key(&self, org_id: &str, key_id: &str, input: &ApiKeyInput) -> Result<ApiKey> {
        let op = Operation::UpdateOrganizationApiKey;
        match self.handle(op)? {
            Handle::Atlas(client) => {
                let key = client
                    .api_keys()
                    .update(org_id, key_id, &wire_input(input))
                    .await
                    .context(op)?;
                api_key(op, key)
            }
            Handle::OpsManager(client) => {
                let key = client
                    .api_keys()
                    .update(org_id, key_id, &wire_input(input))
                    .await
                    .context(op)?;
                api_key(op, key)
            }
        }
    }
}

impl<C: Connector> OrganizationApiKeyDeleter for Store<C> {
    async fn delete_organization_api_key(&self, org_id: &str, key_id: &str) -> Result<()> {
        let op = Operation::DeleteOrganizationApiKey;
        match self.handle(op)? {
            Handle::Atlas(client) => client.api_keys().delete(org_id, key_id).await,
            Handle::OpsManager(client) => client.api_keys().delete(org_id, key_id).await,
        }
        .context(op)
    }
}

impl<C: Connector> OrganizationApiKeyAccessListLister for Store<C> {
    async fn organization_api_key_access_lists(
        &self,
        org_id: &str,
        key_id: &str,
        opts: Option<&ListOptions>,
    ) -> Result<Page<AccessListApiKey>> {
        let op = Operation::OrganizationApiKeyAccessLists;
        match self.handle(op)? {
            Handle::Atlas(client) => {
                let page = client.api_keys().access_list(org_id, key_id, opts).await.context(op)?;
                page.try_map(|e| access_entry(op, e))
            }
            Handle::OpsManager(client) => {
                let page = client.api_keys().access_list(org_id, key_id, opts).await.context(op)?;
                page.try_map(|e| access_entry(op, e))
            }
        }
    }
}

impl<C: Connector> OrganizationApiKeyAccessListCreator for Store<C> {
    async fn create_organization_api_key_access_list(
        &self,
        org_id: &str,
        key_id: &str,
        entries: &[AccessListApiKeyRequest],
    ) -> Result<Page<AccessListApiKey>> {
        let op = Operation::CreateOrganizationApiKeyAccessList;
        match self.handle(op)? {
            Handle::Atlas(client) => {
                let page = client
                    .api_keys()
                    .create_access_list(org_id, key_id, &wire_requests(entries))
                    .await
                    .context(op)?;
                page.try_map(|e| access_entry(op, e))
            }
            Handle::OpsManager(client) => {
                let page = client
                    .api_keys()
                    .create_access_list(org_id, key_id, &wire_requests(entries))
                    .await
                    .context(op)?;
                page.try_map(|e| access_entry(op, e))
            }
        }
    }
}

impl<C: Connector> OrganizationApiKeyAccessListDeleter for Store<C> {
    async fn delete_organization_api_key_access_list(&self, org_id: &str, key_id: &str, entry: &str) -> Result<()> {
        let op = Operation::DeleteOrganizationApiKeyAccessList;
        match self.handle(op)? {
            Handle::Atlas(client) => client.api_keys().delete_access_list(org_id, key_id, entry).await,
            Handle::OpsManager(client) => client.api_keys().delete_access_list(org_id, key_id, entry).await,
        }
        .context(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Service;
    use crate::error::StoreError;
    use crate::testing::store;
    use dbplane_http::Method;
    use dbplane_http::testing::RecordingTransport;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(Service::Cloud, "/api/atlas/v1.0/orgs/o1/apiKeys" ; "cloud")]
    #[test_case(Service::OpsManager, "/api/public/v1.0/orgs/o1/apiKeys" ; "ops manager")]
    #[test_case(Service::CloudManager, "/api/public/v1.0/orgs/o1/apiKeys" ; "cloud manager")]
    #[tokio::test]
    async fn test_list_keys_translates(service: Service, path: &str) {
        let transport = RecordingTransport::new().with_response(
            Method::Get,
            path,
            json!({
                "results": [{
                    "id": "k1",
                    "desc": "ci",
                    "publicKey": "abcd",
                    "roles": [{"roleName": "ORG_MEMBER", "orgId": "o1"}],
                    "links": []
                }],
                "totalCount": 1
            }),
        );
        let store = store(service, transport);

        let page = store.organization_api_keys("o1", None).await.expect("list");
        assert_eq!(page.total_count, Some(1));
        assert_eq!(
            page.results,
            vec![ApiKey {
                id: "k1".into(),
                desc: Some("ci".into()),
                roles: vec![ApiKeyRole {
                    role_name: "ORG_MEMBER".into(),
                    org_id: Some("o1".into()),
                    group_id: None,
                }],
                public_key: "abcd".into(),
                private_key: None,
                details: Map::from_iter([("links".to_string(), json!([]))]),
            }]
        );
    }

    #[test_case(Service::Cloud, "/api/atlas/v1.0/orgs/o1/apiKeys/k1" ; "cloud")]
    #[test_case(Service::OpsManager, "/api/public/v1.0/orgs/o1/apiKeys/k1" ; "ops manager")]
    #[tokio::test]
    async fn test_unmodelled_key_fields_survive(service: Service, path: &str) {
        let native = json!({
            "id": "k1",
            "links": [{"rel": "self"}],
            "orgId": "o1",
            "publicKey": "abcd",
            "roles": []
        });
        let transport = RecordingTransport::new().with_response(Method::Get, path, native.clone());
        let store = store(service, transport);

        let key = store.organization_api_key("o1", "k1").await.expect("describe");
        assert_eq!(key.details.get("orgId"), Some(&json!("o1")));
        assert_eq!(serde_json::to_value(&key).expect("serialize"), native);
    }

    #[tokio::test]
    async fn test_access_list_entry_keeps_links() {
        let transport = RecordingTransport::new().with_response(
            Method::Get,
            "/api/atlas/v1.0/orgs/o1/apiKeys/k1/accessList",
            json!({
                "results": [{"cidrBlock": "10.0.0.0/8", "links": [{"rel": "self"}]}],
                "totalCount": 1
            }),
        );
        let store = store(Service::Cloud, transport);

        let page = store
            .organization_api_key_access_lists("o1", "k1", None)
            .await
            .expect("list");
        assert_eq!(page.results[0].details.get("links"), Some(&json!([{"rel": "self"}])));
    }

    #[tokio::test]
    async fn test_key_without_public_key_is_translation_error() {
        let transport = RecordingTransport::new().with_response(
            Method::Get,
            "/api/public/v1.0/orgs/o1/apiKeys/k1",
            json!({"id": "k1", "roles": []}),
        );
        let store = store(Service::OpsManager, transport);

        let err = store.organization_api_key("o1", "k1").await.expect_err("no public key");
        assert!(matches!(err, StoreError::Translation { .. }));
        assert!(err.to_string().contains("publicKey"));
    }

    #[tokio::test]
    async fn test_create_sends_role_names() {
        let transport = RecordingTransport::new().with_response(
            Method::Post,
            "/api/atlas/v1.0/orgs/o1/apiKeys",
            json!({"id": "k2", "publicKey": "pub", "privateKey": "priv", "roles": []}),
        );
        let store = store(Service::Cloud, transport.clone());
        let input = ApiKeyInput {
            desc: Some("deploy".into()),
            roles: vec!["ORG_OWNER".into()],
        };

        let key = store.create_organization_api_key("o1", &input).await.expect("create");
        assert_eq!(key.private_key.as_deref(), Some("priv"));
        assert_eq!(
            transport.last_request().and_then(|r| r.body),
            Some(json!({"desc": "deploy", "roles": ["ORG_OWNER"]}))
        );
    }

    #[tokio::test]
    async fn test_access_list_entry_is_escaped() {
        let transport = RecordingTransport::new().with_response(
            Method::Delete,
            "/api/public/v1.0/orgs/o1/apiKeys/k1/accessList/10.0.0.0%2F8",
            serde_json::Value::Null,
        );
        let store = store(Service::CloudManager, transport.clone());

        store
            .delete_organization_api_key_access_list("o1", "k1", "10.0.0.0/8")
            .await
            .expect("delete");
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_create_access_list_translates_entries() {
        let transport = RecordingTransport::new().with_response(
            Method::Post,
            "/api/atlas/v1.0/orgs/o1/apiKeys/k1/accessList",
            json!({"results": [{"ipAddress": "1.2.3.4", "cidrBlock": "1.2.3.4/32"}], "totalCount": 1}),
        );
        let store = store(Service::Cloud, transport);
        let entries = [AccessListApiKeyRequest {
            ip_address: Some("1.2.3.4".into()),
            cidr_block: None,
        }];

        let page = store
            .create_organization_api_key_access_list("o1", "k1", &entries)
            .await
            .expect("create");
        assert_eq!(page.results[0].cidr_block, "1.2.3.4/32");
    }
}
