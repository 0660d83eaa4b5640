//! Bearer token and user record persistence
//!
//! The token and the user record live under two independent keys of the
//! persistence medium (see [`AuthConfig`]). Nothing here validates the token:
//! its presence is the only authentication signal, so a revoked or expired
//! token still reads as authenticated until it is removed.
//!
//! A store built without a medium (server-side rendering, tests of the
//! logged-out path) answers every read with `None` and ignores every write.

use crate::config::AuthConfig;
use athena_core::KeyValueStore;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::rc::Rc;

/// Handle to the persisted credential
///
/// Clones share the same medium. Writes are last-write-wins and the two keys
/// are never updated atomically.
#[derive(Clone, Default)]
pub struct CredentialStore {
    storage: Option<Rc<dyn KeyValueStore>>,
}

impl CredentialStore {
    /// Credential store backed by `storage`
    pub fn new(storage: impl KeyValueStore + 'static) -> Self {
        Self::from_shared(Rc::new(storage))
    }

    /// Credential store backed by an already shared medium
    pub fn from_shared(storage: Rc<dyn KeyValueStore>) -> Self {
        Self {
            storage: Some(storage),
        }
    }

    /// Credential store with no persistence medium
    pub fn unavailable() -> Self {
        Self { storage: None }
    }

    /// Credential store over `window.localStorage`
    ///
    /// Falls back to [`CredentialStore::unavailable`] when there is no window
    /// or storage is disabled.
    #[cfg(target_arch = "wasm32")]
    pub fn browser() -> Self {
        match crate::storage::BrowserStorage::local() {
            Some(storage) => Self::new(storage),
            None => Self::unavailable(),
        }
    }

    /// Whether a persistence medium is attached
    pub fn is_available(&self) -> bool {
        self.storage.is_some()
    }

    /// The stored token, if any
    pub fn get_token(&self) -> Option<String> {
        self.storage.as_ref()?.get_item(AuthConfig::TOKEN_KEY)
    }

    /// Store `token`, replacing any previous one
    pub fn set_token(&self, token: &str) {
        let Some(storage) = &self.storage else {
            return;
        };
        storage.set_item(AuthConfig::TOKEN_KEY, token);
        tracing::debug!("auth token stored");
    }

    /// Clear the token and the user record
    ///
    /// The two keys are removed one after the other; an observer in between
    /// sees the user record without a token.
    pub fn remove_token(&self) {
        let Some(storage) = &self.storage else {
            return;
        };
        storage.remove_item(AuthConfig::TOKEN_KEY);
        storage.remove_item(AuthConfig::USER_KEY);
        tracing::debug!("auth token and user record cleared");
    }

    /// Whether a token is stored
    pub fn is_authenticated(&self) -> bool {
        self.get_token().is_some()
    }

    /// The stored user record as untyped JSON
    ///
    /// # Errors
    ///
    /// Returns the parse error if the stored record is not valid JSON
    pub fn get_user(&self) -> Result<Option<serde_json::Value>, serde_json::Error> {
        self.get_user_as()
    }

    /// The stored user record deserialized into `T`
    ///
    /// An empty stored value counts as no record.
    ///
    /// # Errors
    ///
    /// Returns the parse error if the stored record does not deserialize
    pub fn get_user_as<T: DeserializeOwned>(&self) -> Result<Option<T>, serde_json::Error> {
        let Some(raw) = self
            .storage
            .as_ref()
            .and_then(|storage| storage.get_item(AuthConfig::USER_KEY))
            .filter(|raw| !raw.is_empty())
        else {
            return Ok(None);
        };
        serde_json::from_str(&raw).map(Some)
    }

    /// Store `user` as JSON, replacing any previous record
    ///
    /// # Errors
    ///
    /// Returns the serialization error if `user` cannot be encoded; nothing
    /// is written in that case
    pub fn set_user<T: Serialize + ?Sized>(&self, user: &T) -> Result<(), serde_json::Error> {
        let Some(storage) = &self.storage else {
            return Ok(());
        };
        let serialized = serde_json::to_string(user)?;
        storage.set_item(AuthConfig::USER_KEY, &serialized);
        Ok(())
    }
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore")
            .field("available", &self.is_available())
            .finish_non_exhaustive()
    }
}
