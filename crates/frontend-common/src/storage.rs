//! Browser-backed persistence medium

use athena_core::KeyValueStore;
use web_sys::Storage;

/// [`KeyValueStore`] over `window.localStorage`
///
/// Storage calls can throw (quota exceeded, storage disabled by privacy
/// settings). Those faults are logged and reported as absence or as a
/// dropped write.
#[derive(Clone)]
pub struct BrowserStorage {
    storage: Storage,
}

impl BrowserStorage {
    /// `window.localStorage`, or `None` outside a browser window
    pub fn local() -> Option<Self> {
        let window = web_sys::window()?;
        match window.local_storage() {
            Ok(storage) => storage.map(|storage| Self { storage }),
            Err(err) => {
                tracing::warn!(error = ?err, "localStorage is not accessible");
                None
            }
        }
    }
}

impl KeyValueStore for BrowserStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key, error = ?err, "storage read failed");
                None
            }
        }
    }

    fn set_item(&self, key: &str, value: &str) {
        if let Err(err) = self.storage.set_item(key, value) {
            tracing::warn!(key, error = ?err, "storage write failed");
        }
    }

    fn remove_item(&self, key: &str) {
        if let Err(err) = self.storage.remove_item(key) {
            tracing::warn!(key, error = ?err, "storage remove failed");
        }
    }
}
