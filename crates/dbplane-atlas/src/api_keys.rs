//! Organization API keys and their access lists.

pub use dbplane_http::api_keys::{
    AccessListApiKey, AccessListApiKeyRequest, ApiKey, ApiKeyInput, ApiKeyRole,
};
use dbplane_http::{ApiRequest, ListOptions, Page, Result, Transport, escape};

use crate::{Client, org_path};

/// `/orgs/{id}/apiKeys`.
#[derive(Debug)]
pub struct ApiKeysService<'a, T> {
    pub(crate) client: &'a Client<T>,
}

fn key_path(org_id: &str, key_id: &str, rest: &str) -> String {
    org_path(org_id, &format!("/apiKeys/{}{rest}", escape(key_id)))
}

impl<T: Transport> ApiKeysService<'_, T> {
    /// List the API keys of an organization.
    pub async fn list(&self, org_id: &str, opts: Option<&ListOptions>) -> Result<Page<ApiKey>> {
        let request = ApiRequest::get(org_path(org_id, "/apiKeys")).with_list_options(opts);
        self.client.send(request).await
    }

    /// Get one API key.
    pub async fn get(&self, org_id: &str, key_id: &str) -> Result<ApiKey> {
        self.client.send(ApiRequest::get(key_path(org_id, key_id, ""))).await
    }

    /// Create an API key.
    pub async fn create(&self, org_id: &str, input: &ApiKeyInput) -> Result<ApiKey> {
        let request = ApiRequest::post(org_path(org_id, "/apiKeys")).with_json(input)?;
        self.client.send(request).await
    }

    /// Update the description and roles of an API key.
    pub async fn update(&self, org_id: &str, key_id: &str, input: &ApiKeyInput) -> Result<ApiKey> {
        let request = ApiRequest::patch(key_path(org_id, key_id, "")).with_json(input)?;
        self.client.send(request).await
    }

    /// Delete an API key.
    pub async fn delete(&self, org_id: &str, key_id: &str) -> Result<()> {
        self.client.send_empty(ApiRequest::delete(key_path(org_id, key_id, ""))).await
    }

    /// List the access list of an API key.
    pub async fn access_list(
        &self,
        org_id: &str,
        key_id: &str,
        opts: Option<&ListOptions>,
    ) -> Result<Page<AccessListApiKey>> {
        let request = ApiRequest::get(key_path(org_id, key_id, "/accessList")).with_list_options(opts);
        self.client.send(request).await
    }

    /// Add access list entries; the API answers with the whole list.
    pub async fn create_access_list(
        &self,
        org_id: &str,
        key_id: &str,
        entries: &[AccessListApiKeyRequest],
    ) -> Result<Page<AccessListApiKey>> {
        let request = ApiRequest::post(key_path(org_id, key_id, "/accessList")).with_json(entries)?;
        self.client.send(request).await
    }

    /// Remove one access list entry.
    pub async fn delete_access_list(&self, org_id: &str, key_id: &str, entry: &str) -> Result<()> {
        let path = key_path(org_id, key_id, &format!("/accessList/{}", escape(entry)));
        self.client.send_empty(ApiRequest::delete(path)).await
    }
}
