use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::errors::CoreError;
use crate::models::settings::CloudConfig;

use super::auth::AuthSession;
use super::subscription::{Callback, Subscription};
use super::traits::{Document, DocumentBackend, DocumentWrite, RecordStore};

/// Per-user record store backed by a cloud document database.
///
/// Each record key maps to the document `<user-id>_<key>` in the
/// configured collection, with body `{ data, updatedAt, userId }`. Writes
/// are merged into the document. Subscribers receive every commit, local
/// or remote; the last one delivered is the current value.
///
/// Nothing works without a signed-in identity: reads and writes return
/// `CoreError::NotAuthenticated` and `subscribe` returns `None`.
pub struct CloudStore {
    config: CloudConfig,
    auth: AuthSession,
    backend: Arc<dyn DocumentBackend>,
}

impl CloudStore {
    pub fn new(config: CloudConfig, auth: AuthSession, backend: Arc<dyn DocumentBackend>) -> Self {
        Self {
            config,
            auth,
            backend,
        }
    }

    pub fn auth(&self) -> &AuthSession {
        &self.auth
    }

    pub fn collection(&self) -> &str {
        &self.config.collection
    }

    /// Document id for `key` under the signed-in user.
    pub fn document_id(&self, key: &str) -> Result<String, CoreError> {
        let identity = self.auth.identity().ok_or(CoreError::NotAuthenticated)?;
        Ok(format!("{}_{key}", identity.user_id))
    }
}

impl std::fmt::Debug for CloudStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudStore")
            .field("collection", &self.config.collection)
            .field("backend", &self.backend.name())
            .field("signed_in", &self.auth.is_signed_in())
            .finish()
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl RecordStore for CloudStore {
    fn name(&self) -> &str {
        "cloud"
    }

    async fn read_value(&self, key: &str) -> Result<Option<Value>, CoreError> {
        let id = self.document_id(key)?;
        let document = self.backend.get_document(&self.config.collection, &id).await?;
        Ok(document.map(|d| d.data))
    }

    async fn write_value(&self, key: &str, value: Value) -> Result<(), CoreError> {
        let identity = self.auth.identity().ok_or(CoreError::NotAuthenticated)?;
        let id = format!("{}_{key}", identity.user_id);
        let write = DocumentWrite {
            data: value,
            user_id: identity.user_id,
        };

        self.backend
            .merge_document(&self.config.collection, &id, write)
            .await
            .map_err(|e| match e {
                CoreError::WriteFailed(_) | CoreError::NotAuthenticated => e,
                other => CoreError::WriteFailed(other.to_string()),
            })?;
        Ok(())
    }

    fn subscribe(&self, key: &str, on_change: Callback<Value>) -> Option<Subscription> {
        let id = self.document_id(key).ok()?;
        Some(self.backend.listen(
            &self.config.collection,
            &id,
            Arc::new(move |document: &Document| on_change(&document.data)),
        ))
    }
}
