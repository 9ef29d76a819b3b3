//! `localStorage` backend for the configuration records.
use crate::dom;
use lootwheel_core::ConfigStorage;
use thiserror::Error;
use web_sys::Storage;

#[derive(Debug, Error)]
pub enum WebStorageError {
    #[error("localStorage unavailable: {0}")]
    Unavailable(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Configuration records kept in the browser's `localStorage`.
#[derive(Debug, Clone)]
pub struct LocalStorageBackend {
    storage: Storage,
}

impl LocalStorageBackend {
    /// Open the page's `localStorage`.
    ///
    /// # Errors
    /// Returns an error when storage is disabled or there is no window.
    pub fn open() -> Result<Self, WebStorageError> {
        dom::local_storage()
            .map(|storage| Self { storage })
            .map_err(|err| WebStorageError::Unavailable(dom::js_error_message(&err)))
    }

    /// Drop a record, ignoring failures.
    pub fn clear(&self, key: &str) {
        if let Err(err) = self.storage.remove_item(key) {
            log::warn!("failed to remove {key}: {}", dom::js_error_message(&err));
        }
    }
}

impl ConfigStorage for LocalStorageBackend {
    type Error = WebStorageError;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        self.storage
            .get_item(key)
            .map_err(|err| WebStorageError::Storage(dom::js_error_message(&err)))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.storage
            .set_item(key, value)
            .map_err(|err| WebStorageError::Storage(dom::js_error_message(&err)))
    }
}
