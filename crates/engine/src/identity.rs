//! Identity lookup: confirms a user identifier belongs to an existing user.
//!
//! Two implementations are provided:
//!
//! - [`UserTable`] reads the local `users` table.
//! - [`HttpIdentity`] asks a remote user service over HTTP.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, EntityTrait};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine, users, util::require_name};

/// Basic profile returned by a successful lookup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Pure query: never mutates the user directory.
#[async_trait]
pub trait IdentityLookup: Send + Sync {
    /// `Ok(None)` means the user does not exist; `Err` means the lookup
    /// itself failed.
    async fn resolve_user(&self, user_id: &str) -> ResultEngine<Option<UserProfile>>;
}

/// Identity lookup backed by the `users` table.
#[derive(Clone, Debug)]
pub struct UserTable {
    database: DatabaseConnection,
}

impl UserTable {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }

    /// Adds a user to the local directory.
    ///
    /// Fails with [`EngineError::Conflict`] when the id is already taken.
    pub async fn register(&self, user_id: &str, name: &str) -> ResultEngine<UserProfile> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(EngineError::Validation(
                "user id must not be empty".to_string(),
            ));
        }
        let name = require_name(name.trim(), "user")?;

        if self.resolve_user(user_id).await?.is_some() {
            return Err(EngineError::Conflict(format!(
                "user '{user_id}' already exists"
            )));
        }

        users::ActiveModel {
            id: ActiveValue::Set(user_id.to_string()),
            name: ActiveValue::Set(name.clone()),
        }
        .insert(&self.database)
        .await?;

        tracing::info!(user_id, "user registered");
        Ok(UserProfile {
            id: user_id.to_string(),
            name: Some(name),
        })
    }
}

#[async_trait]
impl IdentityLookup for UserTable {
    async fn resolve_user(&self, user_id: &str) -> ResultEngine<Option<UserProfile>> {
        let model = users::Entity::find_by_id(user_id.to_string())
            .one(&self.database)
            .await?;
        Ok(model.map(|m| UserProfile {
            id: m.id,
            name: Some(m.name),
        }))
    }
}

/// Identity lookup against a remote user service.
///
/// `GET {base_url}/users/{id}` answers `200` with a [`UserProfile`] body or
/// `404` when the user does not exist. Any other outcome is a lookup failure.
#[derive(Clone, Debug)]
pub struct HttpIdentity {
    client: Client,
    base_url: Url,
}

impl HttpIdentity {
    pub fn new(client: Client, base_url: &str) -> ResultEngine<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| EngineError::Identity(format!("invalid url '{base_url}': {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(EngineError::Identity(format!(
                "invalid url '{base_url}': cannot be a base"
            )));
        }
        Ok(Self { client, base_url })
    }

    fn user_url(&self, user_id: &str) -> ResultEngine<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| EngineError::Identity("identity url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["users", user_id]);
        Ok(url)
    }
}

#[async_trait]
impl IdentityLookup for HttpIdentity {
    async fn resolve_user(&self, user_id: &str) -> ResultEngine<Option<UserProfile>> {
        let resp = self
            .client
            .get(self.user_url(user_id)?)
            .send()
            .await
            .map_err(|err| EngineError::Identity(format!("network error: {err}")))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(EngineError::Identity(format!(
                "user service answered {status}"
            )));
        }
        resp.json::<UserProfile>()
            .await
            .map(Some)
            .map_err(|err| EngineError::Identity(format!("invalid user payload: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_url_escapes_and_joins() {
        let identity = HttpIdentity::new(Client::new(), "http://users.local/api/").unwrap();
        assert_eq!(
            identity.user_url("u1").unwrap().as_str(),
            "http://users.local/api/users/u1"
        );
        assert_eq!(
            identity.user_url("a/b").unwrap().as_str(),
            "http://users.local/api/users/a%2Fb"
        );
    }

    #[test]
    fn rejects_non_base_urls() {
        assert!(HttpIdentity::new(Client::new(), "not a url").is_err());
        assert!(HttpIdentity::new(Client::new(), "mailto:ops@example.com").is_err());
    }
}
