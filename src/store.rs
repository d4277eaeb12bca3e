//! # Document Store Abstraction
//!
//! The store seam for the service: named collections of schema-validated
//! documents with three operations — insert, field-equality query, and count.
//! Backends implement [`DocumentStore`]; handlers share one backend through
//! `Arc<dyn DocumentStore>`, read-only after startup.
//!
//! Failures surface immediately as [`StoreError`]; no operation retries.
//! Query ordering is backend-defined and not part of the contract.

use std::collections::HashMap;
use std::sync::Mutex;

use axum::async_trait;
use chrono::Utc;

use crate::{DocumentFields, DocumentId, Filter, StoreError, StoredDocument};

/// The document store interface shared by all backends.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persists one document and returns its store-assigned identifier.
    async fn insert(
        &self,
        collection: &str,
        fields: DocumentFields,
    ) -> Result<DocumentId, StoreError>;

    /// Returns the documents of a collection matching a field-equality
    /// filter. An empty filter returns every document.
    async fn query(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Vec<StoredDocument>, StoreError>;

    /// Counts the documents of a collection matching a filter.
    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError>;

    /// Lists the names of the collections that currently hold documents.
    async fn collection_names(&self) -> Result<Vec<String>, StoreError>;
}

/// In-memory backend: collections held in a `Mutex<HashMap>`.
///
/// Serves as the default backend when no DATABASE_URL is configured and as
/// the test backend. Documents are kept in insertion order.
pub struct InMemoryDocumentStore {
    collections: Mutex<HashMap<String, Vec<StoredDocument>>>,
}

impl InMemoryDocumentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            collections: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert(
        &self,
        collection: &str,
        fields: DocumentFields,
    ) -> Result<DocumentId, StoreError> {
        let id = DocumentId::random().map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let doc = StoredDocument {
            id,
            created_at: Utc::now(),
            fields,
        };

        let mut collections = self.collections.lock().unwrap();
        collections.entry(collection.to_string()).or_default().push(doc);
        Ok(id)
    }

    async fn query(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        let collections = self.collections.lock().unwrap();
        let docs = collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| d.matches(filter)).cloned().collect())
            .unwrap_or_default();
        Ok(docs)
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        let collections = self.collections.lock().unwrap();
        let count = collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| d.matches(filter)).count())
            .unwrap_or(0);
        Ok(count as u64)
    }

    async fn collection_names(&self) -> Result<Vec<String>, StoreError> {
        let collections = self.collections.lock().unwrap();
        let mut names: Vec<String> = collections
            .iter()
            .filter(|(_, docs)| !docs.is_empty())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        Ok(names)
    }
}
