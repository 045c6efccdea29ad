//! Building transports for backend client handles.

use dbplane_http::{HttpError, HttpTransport, Transport};
use tracing::debug;

use crate::config::{Profile, Service};
use crate::operation::Backend;

/// Builds the transport a backend client handle runs on.
///
/// The store calls this at most once, on the first supported operation.
pub trait Connector: Send + Sync {
    /// Transport handed to the backend client.
    type Transport: Transport;

    /// Build a transport for `backend` from the profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile does not describe a usable endpoint.
    fn connect(&self, backend: Backend, profile: &Profile) -> Result<Self::Transport, HttpError>;
}

/// Connects over HTTPS with digest authentication.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpConnector;

impl Connector for HttpConnector {
    type Transport = HttpTransport;

    fn connect(&self, backend: Backend, profile: &Profile) -> Result<HttpTransport, HttpError> {
        let base_url = base_url(profile)?;
        debug!(%backend, %base_url, authenticated = profile.credentials().is_some(), "connecting");
        HttpTransport::new(base_url, profile.credentials())
    }
}

/// Base URL for the profile's service.
///
/// An explicit `base_url` always wins. Otherwise cloud and cloud-manager use
/// the public endpoint and ops-manager requires `ops_manager_url`.
///
/// # Errors
///
/// Returns [`HttpError::InvalidUrl`] for an ops-manager profile without a URL.
pub fn base_url(profile: &Profile) -> Result<&str, HttpError> {
    if let Some(url) = profile.base_url.as_deref() {
        return Ok(url);
    }
    match profile.service {
        Service::Cloud => Ok(dbplane_atlas::DEFAULT_BASE_URL),
        Service::CloudManager => Ok(dbplane_opsmngr::CLOUD_MANAGER_URL),
        Service::OpsManager => profile.ops_manager_url.as_deref().ok_or_else(|| {
            HttpError::InvalidUrl("ops_manager_url is required for service ops-manager".to_string())
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Service::Cloud, None, None, Some("https://cloud.mongodb.com/") ; "cloud default")]
    #[test_case(Service::CloudManager, None, None, Some("https://cloud.mongodb.com/") ; "cloud manager default")]
    #[test_case(Service::OpsManager, Some("https://om:8443/"), None, Some("https://om:8443/") ; "ops manager url")]
    #[test_case(Service::OpsManager, None, None, None ; "ops manager without url")]
    #[test_case(Service::Cloud, None, Some("http://localhost:9000/"), Some("http://localhost:9000/") ; "override")]
    #[test_case(Service::OpsManager, Some("https://om/"), Some("http://proxy/"), Some("http://proxy/") ; "override wins")]
    fn resolve_base_url(service: Service, om: Option<&str>, base: Option<&str>, expected: Option<&str>) {
        let profile = Profile {
            ops_manager_url: om.map(str::to_string),
            base_url: base.map(str::to_string),
            ..Profile::new("test", service)
        };
        assert_eq!(base_url(&profile).ok(), expected);
    }

    #[test]
    fn http_connector_builds_transport() {
        let profile = Profile {
            public_api_key: Some("pub".into()),
            private_api_key: Some("priv".into()),
            ops_manager_url: Some("https://om.internal:8443".into()),
            ..Profile::new("test", Service::OpsManager)
        };
        let transport = HttpConnector
            .connect(Backend::OpsManager, &profile)
            .expect("valid profile");
        assert_eq!(transport.base_url().as_str(), "https://om.internal:8443/");
    }

    #[test]
    fn http_connector_requires_ops_manager_url() {
        let profile = Profile::new("test", Service::OpsManager);
        let err = HttpConnector
            .connect(Backend::OpsManager, &profile)
            .expect_err("no url");
        assert!(matches!(err, HttpError::InvalidUrl(_)));
    }
}
