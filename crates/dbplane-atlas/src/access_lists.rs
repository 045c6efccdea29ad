//! Project IP access list.

use dbplane_http::{ApiRequest, ListOptions, Page, Result, Transport, escape};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Client, group_path};

/// One entry of a project IP access list.
///
/// Exactly one of `cidr_block`, `ip_address` or `aws_security_group` is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectIpAccessList {
    /// Owning project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// CIDR block, e.g. `10.0.0.0/24`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidr_block: Option<String>,
    /// Single address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// AWS security group ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_security_group: Option<String>,
    /// Free-form comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Expiry for temporary entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_after_date: Option<String>,
    /// Fields this client does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProjectIpAccessList {
    /// The value identifying this entry in URLs.
    #[must_use]
    pub fn entry(&self) -> Option<&str> {
        self.cidr_block
            .as_deref()
            .or(self.ip_address.as_deref())
            .or(self.aws_security_group.as_deref())
    }
}

/// `/groups/{id}/accessList`.
#[derive(Debug)]
pub struct AccessListService<'a, T> {
    pub(crate) client: &'a Client<T>,
}

impl<T: Transport> AccessListService<'_, T> {
    /// List the entries of a project.
    pub async fn list(&self, group_id: &str, opts: Option<&ListOptions>) -> Result<Page<ProjectIpAccessList>> {
        let request = ApiRequest::get(group_path(group_id, "/accessList")).with_list_options(opts);
        self.client.send(request).await
    }

    /// Get one entry by address, CIDR block or security group.
    pub async fn get(&self, group_id: &str, entry: &str) -> Result<ProjectIpAccessList> {
        let path = group_path(group_id, &format!("/accessList/{}", escape(entry)));
        self.client.send(ApiRequest::get(path)).await
    }

    /// Add entries; the API answers with the whole list.
    pub async fn create(
        &self,
        group_id: &str,
        entries: &[ProjectIpAccessList],
    ) -> Result<Page<ProjectIpAccessList>> {
        let request = ApiRequest::post(group_path(group_id, "/accessList")).with_json(entries)?;
        self.client.send(request).await
    }

    /// Remove one entry.
    pub async fn delete(&self, group_id: &str, entry: &str) -> Result<()> {
        let path = group_path(group_id, &format!("/accessList/{}", escape(entry)));
        self.client.send_empty(ApiRequest::delete(path)).await
    }
}
