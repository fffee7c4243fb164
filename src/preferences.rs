/// User preferences persisted as string key-value pairs
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

pub const KEY_SHOW_INFO: &str = "showInfo";
pub const KEY_HAS_TIMEOUT: &str = "hasTimeout";
pub const KEY_TIMEOUT: &str = "timeout";

pub const DEFAULT_TIMEOUT_SECS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("failed to write {key}: {message}")]
    Write { key: String, message: String },
}

/// Key-value persistence provided by the host
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Store kept in memory, used when the host has no storage and in tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Typed view of the three stored preference keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    /// Show info pages instead of following short links
    pub show_info: bool,
    /// Close success notifications after `timeout_secs`
    pub has_timeout: bool,
    pub timeout_secs: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            show_info: true,
            has_timeout: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Preferences {
    /// Read preferences, falling back to defaults for absent keys
    ///
    /// `showInfo` is on unless stored as "false"; `hasTimeout` is on only when
    /// stored as "true". An unparseable timeout reads as 0.
    pub fn load(store: &impl PreferenceStore) -> Preferences {
        let defaults = Preferences::default();

        let show_info = store
            .get(KEY_SHOW_INFO)
            .map_or(defaults.show_info, |v| v != "false");
        let has_timeout = store
            .get(KEY_HAS_TIMEOUT)
            .map_or(defaults.has_timeout, |v| v == "true");
        let timeout_secs = store
            .get(KEY_TIMEOUT)
            .map_or(defaults.timeout_secs, |v| v.trim().parse().unwrap_or(0));

        Preferences {
            show_info,
            has_timeout,
            timeout_secs,
        }
    }

    /// Read preferences, writing defaults for any key not stored yet
    pub fn load_or_init(store: &mut impl PreferenceStore) -> Result<Preferences, StoreError> {
        let defaults = Preferences::default();
        for (key, value) in defaults.entries() {
            if store.get(key).is_none() {
                store.set(key, &value)?;
            }
        }
        Ok(Preferences::load(&*store))
    }

    pub fn save(&self, store: &mut impl PreferenceStore) -> Result<(), StoreError> {
        for (key, value) in self.entries() {
            store.set(key, &value)?;
        }
        Ok(())
    }

    /// How long a success notification stays up, if it closes by itself
    pub fn notification_timeout(&self) -> Option<Duration> {
        if self.has_timeout && self.timeout_secs > 0 {
            Some(Duration::from_secs(u64::from(self.timeout_secs)))
        } else {
            None
        }
    }

    fn entries(&self) -> [(&'static str, String); 3] {
        [
            (KEY_SHOW_INFO, self.show_info.to_string()),
            (KEY_HAS_TIMEOUT, self.has_timeout.to_string()),
            (KEY_TIMEOUT, self.timeout_secs.to_string()),
        ]
    }
}
