//! Test doubles for code built on the store.

use std::sync::Arc;

use dbplane_http::HttpError;
use dbplane_http::testing::RecordingTransport;
use parking_lot::Mutex;

use crate::config::{Profile, Service};
use crate::connector::Connector;
use crate::operation::Backend;
use crate::store::Store;

/// Connector that hands out a shared [`RecordingTransport`] and remembers
/// every connection attempt.
#[derive(Debug, Clone, Default)]
pub struct FakeConnector {
    transport: RecordingTransport,
    connects: Arc<Mutex<Vec<Backend>>>,
    failure: Option<String>,
}

impl FakeConnector {
    /// Connect every backend to `transport`.
    #[must_use]
    pub fn new(transport: RecordingTransport) -> Self {
        Self {
            transport,
            ..Self::default()
        }
    }

    /// A connector whose every attempt fails with `reason`.
    #[must_use]
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::default()
        }
    }

    /// The transport handed to backend clients.
    #[must_use]
    pub const fn transport(&self) -> &RecordingTransport {
        &self.transport
    }

    /// Number of connection attempts.
    #[must_use]
    pub fn connect_count(&self) -> usize {
        self.connects.lock().len()
    }

    /// Backends connected to, in order.
    #[must_use]
    pub fn connected_backends(&self) -> Vec<Backend> {
        self.connects.lock().clone()
    }
}

impl Connector for FakeConnector {
    type Transport = RecordingTransport;

    fn connect(&self, backend: Backend, _profile: &Profile) -> Result<RecordingTransport, HttpError> {
        self.connects.lock().push(backend);
        match &self.failure {
            Some(reason) => Err(HttpError::InvalidUrl(reason.clone())),
            None => Ok(self.transport.clone()),
        }
    }
}

/// A store for `service` backed by `transport`.
#[must_use]
pub fn store(service: Service, transport: RecordingTransport) -> Store<FakeConnector> {
    Store::with_connector(Profile::new("test", service), FakeConnector::new(transport))
}
