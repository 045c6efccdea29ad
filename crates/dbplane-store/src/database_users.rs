//! Database user contracts.

use std::future::Future;

use dbplane_atlas::DatabaseUser;
use dbplane_http::{ListOptions, Page};

use crate::connector::Connector;
use crate::error::{Context, Result};
use crate::operation::Operation;
use crate::store::Store;

/// Lists database users.
pub trait DatabaseUserLister {
    /// List the database users of a project.
    fn database_users(
        &self,
        project_id: &str,
        opts: Option<&ListOptions>,
    ) -> impl Future<Output = Result<Page<DatabaseUser>>> + Send;
}

/// Describes a database user.
pub trait DatabaseUserDescriber {
    /// Get a user from its authentication database.
    fn database_user(
        &self,
        auth_db: &str,
        project_id: &str,
        username: &str,
    ) -> impl Future<Output = Result<DatabaseUser>> + Send;
}

/// Creates database users.
pub trait DatabaseUserCreator {
    /// Create a database user.
    fn create_database_user(
        &self,
        project_id: &str,
        user: &DatabaseUser,
    ) -> impl Future<Output = Result<DatabaseUser>> + Send;
}

/// Deletes database users.
pub trait DatabaseUserDeleter {
    /// Delete a database user.
    fn delete_database_user(
        &self,
        auth_db: &str,
        project_id: &str,
        username: &str,
    ) -> impl Future<Output = Result<()>> + Send;
}

impl<C: Connector> DatabaseUserLister for Store<C> {
    async fn database_users(&self, project_id: &str, opts: Option<&ListOptions>) -> Result<Page<DatabaseUser>> {
        let op = Operation::DatabaseUsers;
        self.atlas(op)?
            .database_users()
            .list(project_id, opts)
            .await
            .context(op)
    }
}

impl<C: Connector> DatabaseUserDescriber for Store<C> {
    async fn database_user(&self, auth_db: &str, project_id: &str, username: &str) -> Result<DatabaseUser> {
        let op = Operation::DatabaseUser;
        self.atlas(op)?
            .database_users()
            .get(auth_db, project_id, username)
            .await
            .context(op)
    }
}

impl<C: Connector> DatabaseUserCreator for Store<C> {
    async fn create_database_user(&self, project_id: &str, user: &DatabaseUser) -> Result<DatabaseUser> {
        let op = Operation::CreateDatabaseUser;
        self.atlas(op)?
            .database_users()
            .create(project_id, user)
            .await
            .context(op)
    }
}

impl<C: Connector> DatabaseUserDeleter for Store<C> {
    async fn delete_database_user(&self, auth_db: &str, project_id: &str, username: &str) -> Result<()> {
        let op = Operation::DeleteDatabaseUser;
        self.atlas(op)?
            .database_users()
            .delete(auth_db, project_id, username)
            .await
            .context(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Service;
    use crate::testing::store;
    use dbplane_atlas::Role;
    use dbplane_http::Method;
    use dbplane_http::testing::RecordingTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_forwards_user() {
        let transport = RecordingTransport::new().with_response(
            Method::Post,
            "/api/atlas/v1.0/groups/p1/databaseUsers",
            json!({"databaseName": "admin", "username": "app", "roles": [{"roleName": "read", "databaseName": "sales"}]}),
        );
        let store = store(Service::Cloud, transport.clone());
        let user = DatabaseUser {
            database_name: "admin".into(),
            username: "app".into(),
            password: Some("pw".into()),
            roles: vec![Role::parse("read@sales")],
            ..DatabaseUser::default()
        };

        let created = store.create_database_user("p1", &user).await.expect("create");
        assert_eq!(created.roles, user.roles);
        let body = transport.last_request().and_then(|r| r.body).expect("body");
        assert_eq!(body["password"], json!("pw"));
    }

    #[tokio::test]
    async fn test_unsupported_on_ops_manager() {
        let store = store(Service::OpsManager, RecordingTransport::new());
        let err = store
            .delete_database_user("admin", "p1", "app")
            .await
            .expect_err("cloud only");
        assert!(err.is_unsupported());
        assert_eq!(store.connector().transport().request_count(), 0);
    }
}
