use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::CoreError;

use super::traits::RecordStore;

/// Result of reading a record. Every variant carries a usable value; only
/// `Found` carries the stored one.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome<T> {
    /// The stored record
    Found(T),
    /// Nothing stored under the key; the default
    Missing(T),
    /// The record could not be read or parsed; the default
    Unreadable(T),
    /// The store needs an authenticated user; the default
    NeedsSignIn(T),
}

impl<T> ReadOutcome<T> {
    pub fn into_value(self) -> T {
        match self {
            ReadOutcome::Found(v)
            | ReadOutcome::Missing(v)
            | ReadOutcome::Unreadable(v)
            | ReadOutcome::NeedsSignIn(v) => v,
        }
    }

    pub fn value(&self) -> &T {
        match self {
            ReadOutcome::Found(v)
            | ReadOutcome::Missing(v)
            | ReadOutcome::Unreadable(v)
            | ReadOutcome::NeedsSignIn(v) => v,
        }
    }

    pub fn needs_sign_in(&self) -> bool {
        matches!(self, ReadOutcome::NeedsSignIn(_))
    }
}

/// Read the record at `key`, falling back to `default`.
///
/// Read and parse failures are logged and swallowed; they never reach the
/// caller as errors.
pub async fn read_record<T: DeserializeOwned>(
    store: &dyn RecordStore,
    key: &str,
    default: T,
) -> ReadOutcome<T> {
    match store.read_value(key).await {
        Ok(Some(value)) => match serde_json::from_value(value) {
            Ok(parsed) => ReadOutcome::Found(parsed),
            Err(e) => {
                log::warn!("{}: unreadable record '{key}', using default: {e}", store.name());
                ReadOutcome::Unreadable(default)
            }
        },
        Ok(None) => ReadOutcome::Missing(default),
        Err(CoreError::NotAuthenticated) => ReadOutcome::NeedsSignIn(default),
        Err(e) => {
            log::warn!("{}: failed to read '{key}', using default: {e}", store.name());
            ReadOutcome::Unreadable(default)
        }
    }
}

/// Serialize `value` and write it to `key`. Failures propagate.
pub async fn write_record<T: Serialize + ?Sized>(
    store: &dyn RecordStore,
    key: &str,
    value: &T,
) -> Result<(), CoreError> {
    let json = serde_json::to_value(value)
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize '{key}': {e}")))?;
    store.write_value(key, json).await?;
    log::debug!("{}: wrote '{key}'", store.name());
    Ok(())
}

/// Parse a pushed value the same way `read_record` parses a stored one.
pub fn parse_record<T: DeserializeOwned>(key: &str, value: &serde_json::Value, default: T) -> T {
    match T::deserialize(value) {
        Ok(parsed) => parsed,
        Err(e) => {
            log::warn!("unreadable pushed record '{key}', using default: {e}");
            default
        }
    }
}
