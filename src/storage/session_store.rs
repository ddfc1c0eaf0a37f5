//! Session store: persists the signed-in identity under a fixed key.

use crate::domain::session::Session;
use crate::storage::kv::{KeyValueStorage, StorageError};
use tracing::debug;

/// Key the session is stored under unless configured otherwise.
pub const DEFAULT_SESSION_KEY: &str = "user";

/// Reads and writes the serialized [`Session`] in a [`KeyValueStorage`].
///
/// `save` followed by `load` yields an equal session; after `clear`, `load`
/// yields `None`.
#[derive(Debug)]
pub struct SessionStore<S> {
    storage: S,
    key: String,
}

impl<S: KeyValueStorage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_SESSION_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn load(&self) -> Result<Option<Session>, StorageError> {
        match self.storage.get_item(&self.key)? {
            Some(raw) => {
                let session: Session = serde_json::from_str(&raw)?;
                debug!(username = %session.username, "loaded persisted session");
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    pub fn save(&mut self, session: &Session) -> Result<(), StorageError> {
        let raw = serde_json::to_string(session)?;
        self.storage.set_item(&self.key, &raw)?;
        debug!(username = %session.username, "persisted session");
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.storage.remove_item(&self.key)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}
