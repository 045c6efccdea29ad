//! Database user command implementation.

use std::io::Write;

use dbplane_store::atlas::{DatabaseUser, Role};
use dbplane_store::{
    DatabaseUserCreator, DatabaseUserDeleter, DatabaseUserDescriber, DatabaseUserLister,
};

use super::Scope;
use crate::cli::DbUserCommands;
use crate::error::CliError;
use crate::output::{Message, OutputFormat, Row};

/// Database user command executor.
pub struct DbUserCommand<'a, S> {
    store: &'a S,
    scope: Scope<'a>,
}

impl<'a, S> DbUserCommand<'a, S>
where
    S: DatabaseUserLister
        + DatabaseUserDescriber
        + DatabaseUserCreator
        + DatabaseUserDeleter
        + Sync,
{
    /// Create a new database user command.
    #[must_use]
    pub const fn new(store: &'a S, scope: Scope<'a>) -> Self {
        Self { store, scope }
    }

    /// Execute a database user subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments are invalid or the operation fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &DbUserCommands,
    ) -> Result<(), CliError> {
        match command {
            DbUserCommands::List { project, page } => {
                let project_id = self.scope.project(project)?;
                let users = self
                    .store
                    .database_users(project_id, page.options().as_ref())
                    .await?;
                format.write(writer, &users)?;
            }
            DbUserCommands::Describe {
                username,
                auth_db,
                project,
            } => {
                let project_id = self.scope.project(project)?;
                let user = self.store.database_user(auth_db, project_id, username).await?;
                format.write(writer, &user)?;
            }
            DbUserCommands::Create {
                username,
                password,
                roles,
                auth_db,
                delete_after,
                project,
            } => {
                let project_id = self.scope.project(project)?;
                let roles = roles
                    .iter()
                    .map(|r| parse_role(r))
                    .collect::<Result<Vec<_>, _>>()?;
                let user = DatabaseUser {
                    database_name: auth_db.clone(),
                    username: username.clone(),
                    password: Some(password.clone()),
                    group_id: Some(project_id.to_string()),
                    roles,
                    delete_after_date: delete_after.clone(),
                    ..DatabaseUser::default()
                };
                let created = self.store.create_database_user(project_id, &user).await?;
                format.write(writer, &created)?;
            }
            DbUserCommands::Delete {
                username,
                auth_db,
                project,
            } => {
                let project_id = self.scope.project(project)?;
                self.store
                    .delete_database_user(auth_db, project_id, username)
                    .await?;
                let msg = Message::success(format!("Database user '{username}' deleted"));
                format.write(writer, &msg)?;
            }
        }
        Ok(())
    }
}

/// Parse `role[@db[.collection]]`; the database defaults to `admin`.
///
/// # Errors
///
/// Returns [`CliError::InvalidArgument`] for an empty role or database.
pub fn parse_role(input: &str) -> Result<Role, CliError> {
    let mut role = Role::parse(input);
    if role.role_name.is_empty() || role.database_name.is_empty() {
        return Err(CliError::InvalidArgument(format!(
            "invalid role '{input}': expected role[@db[.collection]]"
        )));
    }
    role.collection_name = role.collection_name.filter(|c| !c.is_empty());
    Ok(role)
}

// ============================================================================
// Output types
// ============================================================================

impl Row for DatabaseUser {
    const HEADERS: &'static [&'static str] = &["USERNAME", "DATABASE", "ROLES"];

    fn cells(&self) -> Vec<String> {
        let roles = self
            .roles
            .iter()
            .map(|r| match &r.collection_name {
                Some(c) => format!("{}@{}.{c}", r.role_name, r.database_name),
                None => format!("{}@{}", r.role_name, r.database_name),
            })
            .collect::<Vec<_>>()
            .join(", ");
        vec![self.username.clone(), self.database_name.clone(), roles]
    }
}

crate::single_row!(DatabaseUser);
