//! Automation contracts (self-hosted only).

use std::future::Future;

use dbplane_opsmngr as opsmngr;

use crate::connector::Connector;
use crate::error::{Context, Result};
use crate::operation::Operation;
use crate::store::Store;

/// Reads the automation configuration of a project.
pub trait AutomationGetter {
    /// Get the configuration.
    fn automation_config(&self, project_id: &str) -> impl Future<Output = Result<opsmngr::AutomationConfig>> + Send;
}

/// Replaces the automation configuration of a project.
pub trait AutomationUpdater {
    /// Publish a new configuration; agents converge on it asynchronously.
    fn update_automation_config(
        &self,
        project_id: &str,
        config: &opsmngr::AutomationConfig,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Reports automation progress.
pub trait AutomationStatusDescriber {
    /// Goal version and per-process progress.
    fn automation_status(&self, project_id: &str) -> impl Future<Output = Result<opsmngr::AutomationStatus>> + Send;
}

impl<C: Connector> AutomationGetter for Store<C> {
    async fn automation_config(&self, project_id: &str) -> Result<opsmngr::AutomationConfig> {
        let op = Operation::AutomationConfig;
        self.ops_manager(op)?.automation().config(project_id).await.context(op)
    }
}

impl<C: Connector> AutomationUpdater for Store<C> {
    async fn update_automation_config(&self, project_id: &str, config: &opsmngr::AutomationConfig) -> Result<()> {
        let op = Operation::UpdateAutomationConfig;
        self.ops_manager(op)?
            .automation()
            .update_config(project_id, config)
            .await
            .context(op)
    }
}

impl<C: Connector> AutomationStatusDescriber for Store<C> {
    async fn automation_status(&self, project_id: &str) -> Result<opsmngr::AutomationStatus> {
        let op = Operation::AutomationStatus;
        self.ops_manager(op)?.automation().status(project_id).await.context(op)
    }
}
