/// Preference storage backed by the extension's localStorage

use crate::preferences::{MemoryStore, PreferenceStore, StoreError};
use web_sys::Storage;

/// `window.localStorage` of the extension origin
pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    pub fn open() -> Result<LocalStorage, StoreError> {
        let window = web_sys::window()
            .ok_or_else(|| StoreError::Unavailable("no window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| StoreError::Unavailable("localStorage is disabled".to_string()))?;

        Ok(LocalStorage { storage })
    }
}

impl PreferenceStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StoreError::Write {
                key: key.to_string(),
                message: format!("{:?}", e),
            })
    }
}

/// localStorage when the page has one, memory otherwise
pub enum HostStore {
    Local(LocalStorage),
    Memory(MemoryStore),
}

impl HostStore {
    pub fn open() -> HostStore {
        match LocalStorage::open() {
            Ok(storage) => HostStore::Local(storage),
            Err(e) => {
                log::warn!("Preferences will not persist: {}", e);
                HostStore::Memory(MemoryStore::new())
            }
        }
    }
}

impl PreferenceStore for HostStore {
    fn get(&self, key: &str) -> Option<String> {
        match self {
            HostStore::Local(storage) => storage.get(key),
            HostStore::Memory(storage) => storage.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        match self {
            HostStore::Local(storage) => storage.set(key, value),
            HostStore::Memory(storage) => storage.set(key, value),
        }
    }
}
