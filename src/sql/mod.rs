//! PostgreSQL backend for the document store.
//!
//! Documents from every collection live in a single `documents` table with a
//! JSONB `fields` column; field-equality filters map onto JSONB containment.

use axum::async_trait;
use sqlx::PgPool;

use crate::{DocumentFields, DocumentId, DocumentStore, Filter, StoreError, StoredDocument};

/// Document operations against the `documents` table.
pub mod document;

/// PostgreSQL-backed [`DocumentStore`].
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Wraps an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Runs the embedded migrations, creating the `documents` table if needed.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(
        &self,
        collection: &str,
        fields: DocumentFields,
    ) -> Result<DocumentId, StoreError> {
        document::insert(&self.pool, collection, fields).await
    }

    async fn query(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        document::query(&self.pool, collection, filter).await
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        document::count(&self.pool, collection, filter).await
    }

    async fn collection_names(&self) -> Result<Vec<String>, StoreError> {
        document::collection_names(&self.pool).await
    }
}
