//! Private endpoint services and their interface endpoints.

use dbplane_http::{ApiRequest, Result, Transport, escape};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Client, group_path};

/// A private endpoint service in one provider region.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateEndpointConnection {
    /// Endpoint service ID.
    pub id: String,
    /// Cloud provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    /// Provider region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Provider-side service name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_service_name: Option<String>,
    /// Interface endpoints attached to the service.
    #[serde(default)]
    pub interface_endpoints: Vec<String>,
    /// `INITIATING`, `WAITING_FOR_USER`, `FAILED`, `DELETING` or `AVAILABLE`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Failure reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Fields this client does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of a private endpoint creation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateEndpointRequest {
    /// Cloud provider.
    pub provider_name: String,
    /// Provider region.
    pub region: String,
}

/// An interface endpoint attached to a private endpoint service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceEndpointConnection {
    /// Provider-side interface endpoint ID.
    pub interface_endpoint_id: String,
    /// `NONE`, `PENDING_ACCEPTANCE`, `PENDING`, `AVAILABLE`, `REJECTED` or `DELETING`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_status: Option<String>,
    /// Whether deletion was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_requested: Option<bool>,
    /// Failure reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Fields this client does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InterfaceEndpointRequest<'a> {
    interface_endpoint_id: &'a str,
}

/// `/groups/{id}/privateEndpoint`.
#[derive(Debug)]
pub struct PrivateEndpointsService<'a, T> {
    pub(crate) client: &'a Client<T>,
}

fn endpoint_path(group_id: &str, endpoint_id: &str, rest: &str) -> String {
    group_path(group_id, &format!("/privateEndpoint/{}{rest}", escape(endpoint_id)))
}

impl<T: Transport> PrivateEndpointsService<'_, T> {
    /// List the private endpoint services of a project.
    pub async fn list(&self, group_id: &str) -> Result<Vec<PrivateEndpointConnection>> {
        self.client
            .send(ApiRequest::get(group_path(group_id, "/privateEndpoint")))
            .await
    }

    /// Get one private endpoint service.
    pub async fn get(&self, group_id: &str, endpoint_id: &str) -> Result<PrivateEndpointConnection> {
        self.client
            .send(ApiRequest::get(endpoint_path(group_id, endpoint_id, "")))
            .await
    }

    /// Create a private endpoint service.
    pub async fn create(&self, group_id: &str, request: &PrivateEndpointRequest) -> Result<PrivateEndpointConnection> {
        let request = ApiRequest::post(group_path(group_id, "/privateEndpoint")).with_json(request)?;
        self.client.send(request).await
    }

    /// Delete a private endpoint service.
    pub async fn delete(&self, group_id: &str, endpoint_id: &str) -> Result<()> {
        self.client
            .send_empty(ApiRequest::delete(endpoint_path(group_id, endpoint_id, "")))
            .await
    }

    /// Get one interface endpoint.
    pub async fn interface(
        &self,
        group_id: &str,
        endpoint_id: &str,
        interface_id: &str,
    ) -> Result<InterfaceEndpointConnection> {
        let path = endpoint_path(
            group_id,
            endpoint_id,
            &format!("/interfaceEndpoints/{}", escape(interface_id)),
        );
        self.client.send(ApiRequest::get(path)).await
    }

    /// Attach an interface endpoint to a private endpoint service.
    pub async fn create_interface(
        &self,
        group_id: &str,
        endpoint_id: &str,
        interface_id: &str,
    ) -> Result<InterfaceEndpointConnection> {
        let request = ApiRequest::post(endpoint_path(group_id, endpoint_id, "/interfaceEndpoints"))
            .with_json(&InterfaceEndpointRequest {
                interface_endpoint_id: interface_id,
            })?;
        self.client.send(request).await
    }

    /// Detach an interface endpoint.
    pub async fn delete_interface(&self, group_id: &str, endpoint_id: &str, interface_id: &str) -> Result<()> {
        let path = endpoint_path(
            group_id,
            endpoint_id,
            &format!("/interfaceEndpoints/{}", escape(interface_id)),
        );
        self.client.send_empty(ApiRequest::delete(path)).await
    }
}
