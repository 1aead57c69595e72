use crate::core::error::StorageError;
use crate::session::storage::{SessionStorage, AUTH_TOKEN_KEY, CURRENT_USER_KEY};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use tracing::warn;

/// The signed-in user as persisted at login
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Remaining fields of the record, kept verbatim
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CurrentUser {
    /// Display name, if one is present and non-empty
    pub fn display_name(&self) -> Option<&str> {
        self.full_name.as_deref().filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Default)]
struct SessionData {
    token: Option<String>,
    user: CurrentUser,
}

/// Session token and current user, shared by everything that talks to the portal
#[derive(Debug, Default)]
pub struct SessionContext {
    data: RwLock<SessionData>,
}

impl SessionContext {
    pub fn new(token: Option<String>, user: CurrentUser) -> Self {
        Self {
            data: RwLock::new(SessionData {
                token: token.filter(|t| !t.is_empty()),
                user,
            }),
        }
    }

    /// Read the persisted session once.
    ///
    /// A user record that fails to parse is treated as empty.
    pub fn load(storage: &dyn SessionStorage) -> Result<Self, StorageError> {
        let token = storage.get(AUTH_TOKEN_KEY)?;

        let user = match storage.get(CURRENT_USER_KEY)? {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "Stored current user is not valid JSON, ignoring");
                CurrentUser::default()
            }),
            None => CurrentUser::default(),
        };

        Ok(Self::new(token, user))
    }

    pub fn token(&self) -> Option<String> {
        self.data.read().ok().and_then(|data| data.token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn user(&self) -> CurrentUser {
        self.data
            .read()
            .map(|data| data.user.clone())
            .unwrap_or_default()
    }

    /// Persist and adopt a new session
    pub fn store(
        &self,
        storage: &dyn SessionStorage,
        token: &str,
        user: CurrentUser,
    ) -> Result<(), StorageError> {
        let user_json = serde_json::to_string(&user)?;
        storage.set(AUTH_TOKEN_KEY, token)?;
        storage.set(CURRENT_USER_KEY, &user_json)?;

        let mut data = self.data.write().map_err(|_| StorageError::Poisoned)?;
        data.token = Some(token.to_string()).filter(|t| !t.is_empty());
        data.user = user;
        Ok(())
    }

    /// Forget the session in memory and in storage.
    ///
    /// The in-memory state is always cleared, even if storage fails.
    pub fn clear(&self, storage: &dyn SessionStorage) -> Result<(), StorageError> {
        if let Ok(mut data) = self.data.write() {
            *data = SessionData::default();
        }

        let token_result = storage.remove(AUTH_TOKEN_KEY);
        let user_result = storage.remove(CURRENT_USER_KEY);
        token_result.and(user_result)
    }
}
