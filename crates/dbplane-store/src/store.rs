//! The dispatch façade.

use dbplane_atlas as atlas;
use dbplane_http::HttpError;
use dbplane_opsmngr as opsmngr;
use once_cell::sync::OnceCell;
use tracing::debug;

use crate::config::{Profile, Service};
use crate::connector::{Connector, HttpConnector};
use crate::error::{Result, StoreError};
use crate::operation::{Backend, Operation};

/// A constructed backend client.
#[derive(Debug)]
pub enum Handle<T> {
    /// Cloud-service client.
    Atlas(atlas::Client<T>),
    /// Ops-manager / cloud-manager client.
    OpsManager(opsmngr::Client<T>),
}

impl<T> Handle<T> {
    /// The backend this handle talks to.
    pub const fn backend(&self) -> Backend {
        match self {
            Self::Atlas(_) => Backend::Atlas,
            Self::OpsManager(_) => Backend::OpsManager,
        }
    }
}

/// Routes every capability contract to the backend of the active profile.
///
/// The service is fixed when the store is built. The backend client handle
/// is built on the first supported call and reused afterwards; unsupported
/// calls fail without building it.
pub struct Store<C: Connector = HttpConnector> {
    profile: Profile,
    connector: C,
    handle: OnceCell<Handle<C::Transport>>,
}

impl<C: Connector> std::fmt::Debug for Store<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("profile", &self.profile)
            .field("connected", &self.handle.get().map(Handle::backend))
            .finish_non_exhaustive()
    }
}

impl Store {
    /// A store that talks HTTPS to the profile's endpoint.
    #[must_use]
    pub fn new(profile: Profile) -> Self {
        Self::with_connector(profile, HttpConnector)
    }
}

impl<C: Connector> Store<C> {
    /// A store using a custom connector.
    pub fn with_connector(profile: Profile, connector: C) -> Self {
        Self {
            profile,
            connector,
            handle: OnceCell::new(),
        }
    }

    /// The active profile.
    pub const fn profile(&self) -> &Profile {
        &self.profile
    }

    /// The active deployment mode.
    pub const fn service(&self) -> Service {
        self.profile.service
    }

    /// The connector.
    pub const fn connector(&self) -> &C {
        &self.connector
    }

    /// Whether the active mode can serve `operation`.
    pub const fn supports(&self, operation: Operation) -> bool {
        operation.is_supported(self.profile.service)
    }

    /// Fail with [`StoreError::UnsupportedService`] unless `operation` can run.
    pub(crate) fn check(&self, operation: Operation) -> Result<Backend> {
        let service = self.profile.service;
        operation
            .backend(service)
            .ok_or(StoreError::UnsupportedService { operation, service })
    }

    /// Look `operation` up in the dispatch table and return the handle for
    /// its backend, building it on first use.
    pub(crate) fn handle(&self, operation: Operation) -> Result<&Handle<C::Transport>> {
        let backend = self.check(operation)?;
        debug!(%operation, service = %self.profile.service, "dispatching");

        self.handle
            .get_or_try_init(|| {
                let transport = self.connector.connect(backend, &self.profile)?;
                debug!(%backend, profile = %self.profile.name, "backend client constructed");
                Ok::<_, HttpError>(match backend {
                    Backend::Atlas => Handle::Atlas(atlas::Client::new(transport)),
                    Backend::OpsManager => Handle::OpsManager(opsmngr::Client::new(transport)),
                })
            })
            .map_err(|source| StoreError::Backend { operation, source })
    }

    /// The cloud-service client, for cloud-only operations.
    pub(crate) fn atlas(&self, operation: Operation) -> Result<&atlas::Client<C::Transport>> {
        match self.handle(operation)? {
            Handle::Atlas(client) => Ok(client),
            Handle::OpsManager(_) => Err(self.unsupported(operation)),
        }
    }

    /// The ops-manager client, for self-hosted-only operations.
    pub(crate) fn ops_manager(&self, operation: Operation) -> Result<&opsmngr::Client<C::Transport>> {
        match self.handle(operation)? {
            Handle::OpsManager(client) => Ok(client),
            Handle::Atlas(_) => Err(self.unsupported(operation)),
        }
    }

    fn unsupported(&self, operation: Operation) -> StoreError {
        StoreError::UnsupportedService {
            operation,
            service: self.profile.service,
        }
    }
}
