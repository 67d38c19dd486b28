use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::errors::CoreError;

use super::subscription::{Callback, Listeners, Subscription};
use super::traits::{Document, DocumentBackend, DocumentWrite};

type DocKey = (String, String);

#[derive(Default)]
struct Collections {
    documents: HashMap<DocKey, Map<String, Value>>,
    listeners: HashMap<DocKey, Listeners<Document>>,
    last_commit: Option<DateTime<Utc>>,
}

/// In-process document database.
///
/// Behaves like the hosted store from a client's point of view: merged
/// writes, server-assigned `updatedAt`, and listeners that receive every
/// commit in commit order (plus the current document on registration).
#[derive(Default)]
pub struct MemoryDocumentBackend {
    inner: Mutex<Collections>,
}

impl MemoryDocumentBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document_count(&self) -> usize {
        self.lock().documents.len()
    }

    /// Store raw fields as another client would have written them. Does
    /// not notify listeners.
    pub fn seed_document(&self, collection: &str, id: &str, fields: Map<String, Value>) {
        self.lock()
            .documents
            .insert((collection.to_string(), id.to_string()), fields);
    }

    /// Raw stored fields, including any a client never wrote.
    pub fn raw_document(&self, collection: &str, id: &str) -> Option<Map<String, Value>> {
        self.lock()
            .documents
            .get(&(collection.to_string(), id.to_string()))
            .cloned()
    }

    /// Server time, strictly increasing across commits.
    fn server_time(collections: &mut Collections) -> DateTime<Utc> {
        let mut now = Utc::now();
        if let Some(last) = collections.last_commit {
            if now <= last {
                now = last + chrono::Duration::microseconds(1);
            }
        }
        collections.last_commit = Some(now);
        now
    }

    fn lock(&self) -> MutexGuard<'_, Collections> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn to_document(fields: &Map<String, Value>) -> Result<Document, CoreError> {
    serde_json::from_value(Value::Object(fields.clone()))
        .map_err(|e| CoreError::Deserialization(format!("Malformed document: {e}")))
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl DocumentBackend for MemoryDocumentBackend {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, CoreError> {
        self.lock()
            .documents
            .get(&(collection.to_string(), id.to_string()))
            .map(to_document)
            .transpose()
    }

    async fn merge_document(
        &self,
        collection: &str,
        id: &str,
        write: DocumentWrite,
    ) -> Result<Document, CoreError> {
        let key = (collection.to_string(), id.to_string());

        let (document, listeners) = {
            let mut collections = self.lock();
            let updated_at = Self::server_time(&mut collections);

            let fields = collections.documents.entry(key.clone()).or_default();
            fields.insert("data".into(), write.data);
            fields.insert("userId".into(), Value::String(write.user_id));
            fields.insert("updatedAt".into(), serde_json::to_value(updated_at)?);
            let document = to_document(fields)?;

            (document, collections.listeners.get(&key).cloned())
        };

        // Listeners run after the lock is released, in commit order.
        if let Some(listeners) = listeners {
            listeners.notify(&document);
        }

        Ok(document)
    }

    fn listen(&self, collection: &str, id: &str, on_change: Callback<Document>) -> Subscription {
        let key = (collection.to_string(), id.to_string());

        let (subscription, current) = {
            let mut collections = self.lock();
            let listeners = collections.listeners.entry(key.clone()).or_default();
            let subscription = listeners.add(on_change.clone());
            let current = collections.documents.get(&key).map(to_document);
            (subscription, current)
        };

        match current {
            Some(Ok(document)) => on_change(&document),
            Some(Err(e)) => log::warn!("initial document for {collection}/{id} unreadable: {e}"),
            None => {}
        }

        subscription
    }
}
