use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::errors::CoreError;

use super::traits::RecordStore;

/// Device-local string-keyed store scoped to one origin.
///
/// Values are kept as JSON text, the way a browser's local storage keeps
/// them. Reads and writes are synchronous; there is no change
/// notification and no coordination between two stores opened on the
/// same file.
///
/// When opened with a path (native only) the whole map is rewritten to
/// that file after every write.
pub struct LocalStore {
    origin: String,
    entries: Mutex<HashMap<String, String>>,
    #[cfg(not(target_arch = "wasm32"))]
    path: Option<PathBuf>,
}

impl LocalStore {
    /// An empty store that lives only as long as this value.
    pub fn in_memory(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            entries: Mutex::new(HashMap::new()),
            #[cfg(not(target_arch = "wasm32"))]
            path: None,
        }
    }

    /// Open the store persisted at `path`. A missing file starts empty; an
    /// unreadable one is logged and also starts empty.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open(origin: impl Into<String>, path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                log::warn!("local store {} is unreadable, starting empty: {e}", path.display());
                HashMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            origin: origin.into(),
            entries: Mutex::new(entries),
            path: Some(path),
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Raw stored text for `key`.
    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    /// Parsed value for `key`, or `default` when absent or unparsable.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.get_raw(key) {
            Some(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                log::warn!("{}: unreadable value for '{key}', using default: {e}", self.origin);
                default
            }),
            None => default,
        }
    }

    /// Serialize and store `value` under `key`.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CoreError> {
        let text = serde_json::to_string(value)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize '{key}': {e}")))?;
        self.set_raw(key, text)
    }

    /// Remove `key`. Returns whether it was present.
    pub fn remove(&self, key: &str) -> Result<bool, CoreError> {
        let mut entries = self.lock();
        let Some(old) = entries.remove(key) else {
            return Ok(false);
        };
        if let Err(e) = self.flush(&entries) {
            entries.insert(key.to_string(), old);
            return Err(CoreError::WriteFailed(e.to_string()));
        }
        Ok(true)
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.lock().keys().cloned().collect();
        keys.sort();
        keys
    }

    fn set_raw(&self, key: &str, text: String) -> Result<(), CoreError> {
        let mut entries = self.lock();
        let previous = entries.insert(key.to_string(), text);
        if let Err(e) = self.flush(&entries) {
            // Keep memory and disk in agreement.
            match previous {
                Some(old) => entries.insert(key.to_string(), old),
                None => entries.remove(key),
            };
            return Err(CoreError::WriteFailed(e.to_string()));
        }
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn flush(&self, entries: &HashMap<String, String>) -> Result<(), CoreError> {
        if let Some(path) = &self.path {
            let text = serde_json::to_string(entries)
                .map_err(|e| CoreError::Serialization(e.to_string()))?;
            std::fs::write(path, text)?;
        }
        Ok(())
    }

    #[cfg(target_arch = "wasm32")]
    fn flush(&self, _entries: &HashMap<String, String>) -> Result<(), CoreError> {
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for LocalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStore")
            .field("origin", &self.origin)
            .field("keys", &self.lock().len())
            .finish()
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl RecordStore for LocalStore {
    fn name(&self) -> &str {
        "local"
    }

    async fn read_value(&self, key: &str) -> Result<Option<Value>, CoreError> {
        match self.get_raw(key) {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    async fn write_value(&self, key: &str, value: Value) -> Result<(), CoreError> {
        self.set_raw(key, value.to_string())
    }
}
