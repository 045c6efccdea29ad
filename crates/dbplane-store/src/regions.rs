//! Cloud provider region contract.

use std::future::Future;

use dbplane_atlas::{CloudProviders, RegionsOptions};

use crate::connector::Connector;
use crate::error::{Context, Result};
use crate::operation::Operation;
use crate::store::Store;

/// Lists the provider regions available to a project.
pub trait CloudProviderRegionsLister {
    /// List providers, tiers and regions.
    fn cloud_provider_regions(
        &self,
        project_id: &str,
        opts: &RegionsOptions,
    ) -> impl Future<Output = Result<CloudProviders>> + Send;
}

impl<C: Connector> CloudProviderRegionsLister for Store<C> {
    async fn cloud_provider_regions(&self, project_id: &str, opts: &RegionsOptions) -> Result<CloudProviders> {
        let op = Operation::CloudProviderRegions;
        self.atlas(op)?.regions().list(project_id, opts).await.context(op)
    }
}
