//! Private endpoint and interface endpoint contracts (cloud only).

use std::future::Future;

use dbplane_atlas as atlas;

use crate::connector::Connector;
use crate::error::{Context, Result};
use crate::operation::Operation;
use crate::store::Store;

/// Lists private endpoint services.
pub trait PrivateEndpointLister {
    /// List the private endpoint services of a project.
    fn private_endpoints(
        &self,
        project_id: &str,
    ) -> impl Future<Output = Result<Vec<atlas::PrivateEndpointConnection>>> + Send;
}

/// Describes a private endpoint service.
pub trait PrivateEndpointDescriber {
    /// Get one service.
    fn private_endpoint(
        &self,
        project_id: &str,
        endpoint_id: &str,
    ) -> impl Future<Output = Result<atlas::PrivateEndpointConnection>> + Send;
}

/// Creates private endpoint services.
pub trait PrivateEndpointCreator {
    /// Create a service in a provider region.
    fn create_private_endpoint(
        &self,
        project_id: &str,
        request: &atlas::PrivateEndpointRequest,
    ) -> impl Future<Output = Result<atlas::PrivateEndpointConnection>> + Send;
}

/// Deletes private endpoint services.
pub trait PrivateEndpointDeleter {
    /// Delete a service.
    fn delete_private_endpoint(&self, project_id: &str, endpoint_id: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Describes an interface endpoint.
pub trait InterfaceEndpointDescriber {
    /// Get one interface endpoint of a service.
    fn interface_endpoint(
        &self,
        project_id: &str,
        endpoint_id: &str,
        interface_id: &str,
    ) -> impl Future<Output = Result<atlas::InterfaceEndpointConnection>> + Send;
}

/// Attaches interface endpoints.
pub trait InterfaceEndpointCreator {
    /// Attach a provider-side interface endpoint to a service.
    fn create_interface_endpoint(
        &self,
        project_id: &str,
        endpoint_id: &str,
        interface_id: &str,
    ) -> impl Future<Output = Result<atlas::InterfaceEndpointConnection>> + Send;
}

/// Detaches interface endpoints.
pub trait InterfaceEndpointDeleter {
    /// Detach an interface endpoint.
    fn delete_interface_endpoint(
        &self,
        project_id: &str,
        endpoint_id: &str,
        interface_id: &str,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Everything the interface endpoint commands need.
pub trait InterfaceEndpointManager:
    InterfaceEndpointDescriber + InterfaceEndpointCreator + InterfaceEndpointDeleter
{
}

impl<T> InterfaceEndpointManager for T where
    T: InterfaceEndpointDescriber + InterfaceEndpointCreator + InterfaceEndpointDeleter
{
}

impl<C: Connector> PrivateEndpointLister for Store<C> {
    async fn private_endpoints(&self, project_id: &str) -> Result<Vec<atlas::PrivateEndpointConnection>> {
        let op = Operation::PrivateEndpoints;
        self.atlas(op)?.private_endpoints().list(project_id).await.context(op)
    }
}

impl<C: Connector> PrivateEndpointDescriber for Store<C> {
    async fn private_endpoint(&self, project_id: &str, endpoint_id: &str) -> Result<atlas::PrivateEndpointConnection> {
        let op = Operation::PrivateEndpoint;
        self.atlas(op)?
            .private_endpoints()
            .get(project_id, endpoint_id)
            .await
            .context(op)
    }
}

impl<C: Connector> PrivateEndpointCreator for Store<C> {
    async fn create_private_endpoint(
        &self,
        project_id: &str,
        request: &atlas::PrivateEndpointRequest,
    ) -> Result<atlas::PrivateEndpointConnection> {
        let op = Operation::CreatePrivateEndpoint;
        self.atlas(op)?
            .private_endpoints()
            .create(project_id, request)
            .await
            .context(op)
    }
}

impl<C: Connector> PrivateEndpointDeleter for Store<C> {
    async fn delete_private_endpoint(&self, project_id: &str, endpoint_id: &str) -> Result<()> {
        let op = Operation::DeletePrivateEndpoint;
        self.atlas(op)?
            .private_endpoints()
            .delete(project_id, endpoint_id)
            .await
            .context(op)
    }
}

impl<C: Connector> InterfaceEndpointDescriber for Store<C> {
    async fn interface_endpoint(
        &self,
        project_id: &str,
        endpoint_id: &str,
        interface_id: &str,
    ) -> Result<atlas::InterfaceEndpointConnection> {
        let op = Operation::InterfaceEndpoint;
        self.atlas(op)?
            .private_endpoints()
            .interface(project_id, endpoint_id, interface_id)
            .await
            .context(op)
    }
}

impl<C: Connector> InterfaceEndpointCreator for Store<C> {
    async fn create_interface_endpoint(
        &self,
        project_id: &str,
        endpoint_id: &str,
        interface_id: &str,
    ) -> Result<atlas::InterfaceEndpointConnection> {
        let op = Operation::CreateInterfaceEndpoint;
        self.atlas(op)?
            .private_endpoints()
            .create_interface(project_id, endpoint_id, interface_id)
            .await
            .context(op)
    }
}

impl<C: Connector> InterfaceEndpointDeleter for Store<C> {
    async fn delete_interface_endpoint(&self, project_id: &str, endpoint_id: &str, interface_id: &str) -> Result<()> {
        let op = Operation::DeleteInterfaceEndpoint;
        self.atlas(op)?
            .private_endpoints()
            .delete_interface(project_id, endpoint_id, interface_id)
            .await
            .context(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Profile, Service};
    use crate::testing::{FakeConnector, store};
    use dbplane_http::Method;
    use dbplane_http::testing::RecordingTransport;
    use serde_json::json;

    async fn attach<M: InterfaceEndpointManager>(manager: &M) -> Result<atlas::InterfaceEndpointConnection> {
        manager.create_interface_endpoint("p1", "e1", "vpce-1").await
    }

    #[tokio::test]
    async fn test_manager_attaches_interface() {
        let transport = RecordingTransport::new().with_response(
            Method::Post,
            "/api/atlas/v1.0/groups/p1/privateEndpoint/e1/interfaceEndpoints",
            json!({"interfaceEndpointId": "vpce-1", "connectionStatus": "PENDING"}),
        );
        let store = store(Service::Cloud, transport.clone());

        let interface = attach(&store).await.expect("attach");
        assert_eq!(interface.connection_status.as_deref(), Some("PENDING"));
        assert_eq!(
            transport.last_request().and_then(|r| r.body),
            Some(json!({"interfaceEndpointId": "vpce-1"}))
        );
    }

    #[tokio::test]
    async fn test_private_endpoints_unsupported_off_cloud() {
        let fake = FakeConnector::new(RecordingTransport::new());
        let store = Store::with_connector(Profile::new("om", Service::OpsManager), fake.clone());

        let err = store.private_endpoints("p1").await.expect_err("cloud only");
        assert!(err.is_unsupported());
        assert_eq!(fake.connect_count(), 0);
    }

    #[tokio::test]
    async fn test_list_private_endpoints() {
        let transport = RecordingTransport::new().with_response(
            Method::Get,
            "/api/atlas/v1.0/groups/p1/privateEndpoint",
            json!([{"id": "e1", "providerName": "AWS", "region": "us-east-1", "status": "AVAILABLE"}]),
        );
        let store = store(Service::Cloud, transport);

        let endpoints = store.private_endpoints("p1").await.expect("list");
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].status.as_deref(), Some("AVAILABLE"));
    }
}
