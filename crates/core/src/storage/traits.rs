use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::CoreError;

use super::subscription::{Callback, Subscription};

/// A key-value store of whole records, encoded as JSON values.
///
/// Two implementations exist: `LocalStore` (synchronous, device-local, no
/// push) and `CloudStore` (per-user documents with live subscriptions).
/// Callers normally go through `storage::record` rather than these raw
/// methods, because that layer applies the default-on-failure policy.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait RecordStore: Send + Sync {
    /// Human-readable name of this backend (for logs).
    fn name(&self) -> &str;

    /// Read the record at `key`. `Ok(None)` when it was never written.
    async fn read_value(&self, key: &str) -> Result<Option<Value>, CoreError>;

    /// Replace the record at `key`.
    async fn write_value(&self, key: &str, value: Value) -> Result<(), CoreError>;

    /// Register for pushed changes to `key`. Backends without push
    /// support return `None`; their consumers re-read after every write.
    fn subscribe(&self, _key: &str, _on_change: Callback<Value>) -> Option<Subscription> {
        None
    }
}

/// A stored cloud document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub data: Value,
    /// Assigned by the server on every commit
    pub updated_at: DateTime<Utc>,
    pub user_id: String,
}

/// The fields a client sends with a merged write. The server adds
/// `updatedAt`.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentWrite {
    pub data: Value,
    pub user_id: String,
}

/// Seam to the cloud document database. The wire protocol lives behind
/// this trait; `MemoryDocumentBackend` is the in-process implementation.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait DocumentBackend: Send + Sync {
    fn name(&self) -> &str;

    async fn get_document(&self, collection: &str, id: &str)
        -> Result<Option<Document>, CoreError>;

    /// Merge `write` into the document, creating it if absent. Fields of
    /// the stored document that `write` does not mention are kept.
    async fn merge_document(
        &self,
        collection: &str,
        id: &str,
        write: DocumentWrite,
    ) -> Result<Document, CoreError>;

    /// Listen to every commit of the document, in commit order.
    fn listen(&self, collection: &str, id: &str, on_change: Callback<Document>) -> Subscription;
}
