//! Project IP access list contracts.

use std::future::Future;

use dbplane_atlas::ProjectIpAccessList;
use dbplane_http::{ListOptions, Page};

use crate::connector::Connector;
use crate::error::{Context, Result};
use crate::operation::Operation;
use crate::store::Store;

/// Lists a project's IP access list.
pub trait ProjectIpAccessListLister {
    /// List access list entries.
    fn project_ip_access_lists(
        &self,
        project_id: &str,
        opts: Option<&ListOptions>,
    ) -> impl Future<Output = Result<Page<ProjectIpAccessList>>> + Send;
}

/// Describes one access list entry.
pub trait ProjectIpAccessListDescriber {
    /// Get an entry by address, CIDR block or security group.
    fn ip_access_list(&self, project_id: &str, entry: &str) -> impl Future<Output = Result<ProjectIpAccessList>> + Send;
}

/// Adds access list entries.
pub trait ProjectIpAccessListCreator {
    /// Add entries; returns the whole list.
    fn create_project_ip_access_list(
        &self,
        project_id: &str,
        entries: &[ProjectIpAccessList],
    ) -> impl Future<Output = Result<Page<ProjectIpAccessList>>> + Send;
}

/// Removes access list entries.
pub trait ProjectIpAccessListDeleter {
    /// Remove one entry.
    fn delete_project_ip_access_list(&self, project_id: &str, entry: &str) -> impl Future<Output = Result<()>> + Send;
}

impl<C: Connector> ProjectIpAccessListLister for Store<C> {
    async fn project_ip_access_lists(
        &self,
        project_id: &str,
        opts: Option<&ListOptions>,
    ) -> Result<Page<ProjectIpAccessList>> {
        let op = Operation::ProjectIpAccessLists;
        self.atlas(op)?
            .access_lists()
            .list(project_id, opts)
            .await
            .context(op)
    }
}

impl<C: Connector> ProjectIpAccessListDescriber for Store<C> {
    async fn ip_access_list(&self, project_id: &str, entry: &str) -> Result<ProjectIpAccessList> {
        let op = Operation::IpAccessList;
        self.atlas(op)?
            .access_lists()
            .get(project_id, entry)
            .await
            .context(op)
    }
}

impl<C: Connector> ProjectIpAccessListCreator for Store<C> {
    async fn create_project_ip_access_list(
        &self,
        project_id: &str,
        entries: &[ProjectIpAccessList],
    ) -> Result<Page<ProjectIpAccessList>> {
        let op = Operation::CreateProjectIpAccessList;
        self.atlas(op)?
            .access_lists()
            .create(project_id, entries)
            .await
            .context(op)
    }
}

impl<C: Connector> ProjectIpAccessListDeleter for Store<C> {
    async fn delete_project_ip_access_list(&self, project_id: &str, entry: &str) -> Result<()> {
        let op = Operation::DeleteProjectIpAccessList;
        self.atlas(op)?
            .access_lists()
            .delete(project_id, entry)
            .await
            .context(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Service;
    use crate::testing::store;
    use dbplane_http::Method;
    use dbplane_http::testing::RecordingTransport;
    use serde_json::{Value, json};

    #[tokio::test]
    async fn test_delete_cidr_entry() {
        let transport = RecordingTransport::new().with_response(
            Method::Delete,
            "/api/atlas/v1.0/groups/p1/accessList/10.0.0.0%2F8",
            Value::Null,
        );
        let store = store(Service::Cloud, transport.clone());

        store
            .delete_project_ip_access_list("p1", "10.0.0.0/8")
            .await
            .expect("delete");
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_list_entries() {
        let transport = RecordingTransport::new().with_response(
            Method::Get,
            "/api/atlas/v1.0/groups/p1/accessList",
            json!({"results": [{"ipAddress": "1.2.3.4", "cidrBlock": "1.2.3.4/32", "comment": "vpn"}], "totalCount": 1}),
        );
        let store = store(Service::Cloud, transport);

        let page = store.project_ip_access_lists("p1", None).await.expect("list");
        assert_eq!(page.results[0].comment.as_deref(), Some("vpn"));
    }
}
