//! Database users.

use dbplane_http::{ApiRequest, ListOptions, Page, Result, Transport, escape};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Client, group_path};

/// A database user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseUser {
    /// Authentication database, `admin` for password users.
    #[serde(default)]
    pub database_name: String,
    /// User name.
    pub username: String,
    /// Password; only sent on creation, never returned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Owning project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// Granted roles.
    #[serde(default)]
    pub roles: Vec<Role>,
    /// Expiry for temporary users.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_after_date: Option<String>,
    /// Fields this client does not model (LDAP, X.509, AWS IAM settings).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A role granted to a database user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    /// Role name, e.g. `readWriteAnyDatabase`.
    pub role_name: String,
    /// Database the role applies to.
    pub database_name: String,
    /// Collection the role applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_name: Option<String>,
}

impl Role {
    /// Parse `role[@db[.collection]]`; the database defaults to `admin`.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let (role_name, rest) = input.split_once('@').unwrap_or((input, "admin"));
        let (database_name, collection_name) = match rest.split_once('.') {
            Some((db, coll)) => (db, Some(coll.to_string())),
            None => (rest, None),
        };
        Self {
            role_name: role_name.to_string(),
            database_name: database_name.to_string(),
            collection_name,
        }
    }
}

/// `/groups/{id}/databaseUsers`.
#[derive(Debug)]
pub struct DatabaseUsersService<'a, T> {
    pub(crate) client: &'a Client<T>,
}

impl<T: Transport> DatabaseUsersService<'_, T> {
    /// List the database users of a project.
    pub async fn list(&self, group_id: &str, opts: Option<&ListOptions>) -> Result<Page<DatabaseUser>> {
        let request = ApiRequest::get(group_path(group_id, "/databaseUsers")).with_list_options(opts);
        self.client.send(request).await
    }

    /// Get one user from its authentication database.
    pub async fn get(&self, database: &str, group_id: &str, username: &str) -> Result<DatabaseUser> {
        let path = group_path(
            group_id,
            &format!("/databaseUsers/{}/{}", escape(database), escape(username)),
        );
        self.client.send(ApiRequest::get(path)).await
    }

    /// Create a database user.
    pub async fn create(&self, group_id: &str, user: &DatabaseUser) -> Result<DatabaseUser> {
        let request = ApiRequest::post(group_path(group_id, "/databaseUsers")).with_json(user)?;
        self.client.send(request).await
    }

    /// Delete a database user.
    pub async fn delete(&self, database: &str, group_id: &str, username: &str) -> Result<()> {
        let path = group_path(
            group_id,
            &format!("/databaseUsers/{}/{}", escape(database), escape(username)),
        );
        self.client.send_empty(ApiRequest::delete(path)).await
    }
}
