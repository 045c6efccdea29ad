//! Project IP access list command implementation.

use std::io::Write;

use dbplane_store::atlas::ProjectIpAccessList;
use dbplane_store::{
    ProjectIpAccessListCreator, ProjectIpAccessListDeleter, ProjectIpAccessListDescriber,
    ProjectIpAccessListLister,
};

use super::{Entry, Scope, entries};
use crate::cli::AccessListCommands;
use crate::error::CliError;
use crate::output::{Message, OutputFormat, Row, cell};

/// Access list command executor.
pub struct AccessListCommand<'a, S> {
    store: &'a S,
    scope: Scope<'a>,
}

impl<'a, S> AccessListCommand<'a, S>
where
    S: ProjectIpAccessListLister
        + ProjectIpAccessListDescriber
        + ProjectIpAccessListCreator
        + ProjectIpAccessListDeleter
        + Sync,
{
    /// Create a new access list command.
    #[must_use]
    pub const fn new(store: &'a S, scope: Scope<'a>) -> Self {
        Self { store, scope }
    }

    /// Execute an access list subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments are invalid or the operation fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &AccessListCommands,
    ) -> Result<(), CliError> {
        match command {
            AccessListCommands::List { project, page } => {
                let project_id = self.scope.project(project)?;
                let list = self
                    .store
                    .project_ip_access_lists(project_id, page.options().as_ref())
                    .await?;
                format.write(writer, &list)?;
            }
            AccessListCommands::Describe { entry, project } => {
                let project_id = self.scope.project(project)?;
                let entry = self.store.ip_access_list(project_id, entry).await?;
                format.write(writer, &entry)?;
            }
            AccessListCommands::Create {
                entries: args,
                comment,
                delete_after,
                project,
            } => {
                let project_id = self.scope.project(project)?;
                let requests = access_list_requests(
                    &entries(args)?,
                    comment.as_deref(),
                    delete_after.as_deref(),
                );
                let list = self
                    .store
                    .create_project_ip_access_list(project_id, &requests)
                    .await?;
                format.write(writer, &list)?;
            }
            AccessListCommands::Delete { entry, project } => {
                let project_id = self.scope.project(project)?;
                self.store
                    .delete_project_ip_access_list(project_id, entry)
                    .await?;
                let msg = Message::success(format!("Access list entry '{entry}' deleted"));
                format.write(writer, &msg)?;
            }
        }
        Ok(())
    }
}

/// Turn validated entries into request bodies.
#[must_use]
pub fn access_list_requests(
    entries: &[Entry],
    comment: Option<&str>,
    delete_after: Option<&str>,
) -> Vec<ProjectIpAccessList> {
    entries
        .iter()
        .map(|entry| {
            let (ip_address, cidr_block) = match entry {
                Entry::Ip(ip) => (Some(ip.clone()), None),
                Entry::Cidr(cidr) => (None, Some(cidr.clone())),
            };
            ProjectIpAccessList {
                ip_address,
                cidr_block,
                comment: comment.map(str::to_string),
                delete_after_date: delete_after.map(str::to_string),
                ..ProjectIpAccessList::default()
            }
        })
        .collect()
}

// ============================================================================
// Output types
// ============================================================================

impl Row for ProjectIpAccessList {
    const HEADERS: &'static [&'static str] = &["ENTRY", "COMMENT", "DELETE AFTER"];

    fn cells(&self) -> Vec<String> {
        let entry = self
            .cidr_block
            .as_deref()
            .or(self.ip_address.as_deref())
            .or(self.aws_security_group.as_deref());
        vec![
            cell(entry),
            cell(self.comment.as_deref()),
            cell(self.delete_after_date.as_deref()),
        ]
    }
}

crate::single_row!(ProjectIpAccessList);
