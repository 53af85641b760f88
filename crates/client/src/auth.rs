//! Logged-in user session, persisted across runs.

use common::UserId;
use serde::{Deserialize, Serialize};
use storage::{DurableStorage, DurableStorageExt, StorageError};

use crate::api::{Credentials, StorefrontApi};
use crate::error::{ClientError, Result};

/// Storage key for the bearer token (stored as the raw string).
pub const TOKEN_STORAGE_KEY: &str = "token";

/// Storage key for the user profile (stored as JSON).
pub const USER_STORAGE_KEY: &str = "user";

/// A storefront user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "id_usuario")]
    pub id: UserId,

    #[serde(rename = "nombre")]
    pub name: String,

    pub email: String,

    #[serde(rename = "telefono", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(rename = "id_rol", default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<i64>,

    #[serde(rename = "rol", default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone)]
struct Session {
    token: String,
    user: User,
}

/// The current user's session, backed by durable storage.
///
/// A session exists only when both the token and the user are stored and the
/// user parses.
pub struct AuthSession<S: DurableStorage> {
    storage: S,
    current: Option<Session>,
}

impl<S: DurableStorage> AuthSession<S> {
    /// Restores the stored session.
    ///
    /// A stored user that no longer parses logs the session out. Any other
    /// read failure starts logged out for this run but keeps the stored
    /// session.
    #[tracing::instrument(skip(storage))]
    pub fn restore(storage: S) -> Self {
        let mut session = Self {
            storage,
            current: None,
        };

        match session.read_stored() {
            Ok(current) => session.current = current,
            Err(ClientError::Storage(error @ StorageError::Serialization(_))) => {
                tracing::warn!(%error, "stored user is unreadable, logging out");
                if let Err(error) = session.clear_stored() {
                    tracing::warn!(%error, "failed to remove stored session");
                }
            }
            Err(error) => {
                tracing::warn!(%error, "failed to read stored session");
            }
        }

        session
    }

    fn read_stored(&self) -> Result<Option<Session>> {
        let Some(token) = self.storage.get(TOKEN_STORAGE_KEY)? else {
            return Ok(None);
        };
        let Some(user) = self.storage.get_json::<User>(USER_STORAGE_KEY)? else {
            return Ok(None);
        };
        Ok(Some(Session { token, user }))
    }

    fn clear_stored(&self) -> Result<()> {
        self.storage.remove(TOKEN_STORAGE_KEY)?;
        self.storage.remove(USER_STORAGE_KEY)?;
        Ok(())
    }

    /// Logs in and stores the session.
    #[tracing::instrument(skip(self, api, password))]
    pub async fn login<A: StorefrontApi + ?Sized>(
        &mut self,
        api: &A,
        email: &str,
        password: &str,
    ) -> Result<&User> {
        let response = api.login(&Credentials::new(email, password)).await?;

        self.storage.set(TOKEN_STORAGE_KEY, &response.access_token)?;
        self.storage.set_json(USER_STORAGE_KEY, &response.user)?;
        tracing::info!(user_id = %response.user.id, "logged in");

        let session = self.current.insert(Session {
            token: response.access_token,
            user: response.user,
        });
        Ok(&session.user)
    }

    /// Ends the session and removes it from storage.
    #[tracing::instrument(skip(self))]
    pub fn logout(&mut self) -> Result<()> {
        self.current = None;
        self.clear_stored()?;
        tracing::info!("logged out");
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.token.as_str())
    }

    pub fn user(&self) -> Option<&User> {
        self.current.as_ref().map(|s| &s.user)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}
