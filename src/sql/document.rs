//! Document operations for the PostgreSQL backend.
//!
//! Queries are bound at runtime so the crate builds without a live database.
//! Fields are stored in their transport-safe JSON form; identifiers and the
//! insertion timestamp live in their own typed columns, so documents read
//! back with `id` and `created_at` statically distinguished.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::PgPool;

use crate::{
    DocumentFields, DocumentId, FieldValue, Filter, StoreError, StoredDocument, serialize_value,
};

fn fields_to_json(fields: &DocumentFields) -> Value {
    let mut map = Map::new();
    for (name, value) in fields {
        map.insert(name.clone(), serialize_value(value));
    }
    Value::Object(map)
}

fn filter_to_json(filter: &Filter) -> Value {
    let mut map = Map::new();
    for (name, value) in filter {
        map.insert(name.clone(), value.clone());
    }
    Value::Object(map)
}

fn document_from_row(
    id: String,
    created_at: DateTime<Utc>,
    fields: Value,
) -> Result<StoredDocument, StoreError> {
    let id = DocumentId::from_str(&id)
        .map_err(|e| StoreError::Serialization(format!("bad document id {}: {}", id, e)))?;
    let fields = match fields {
        Value::Object(map) => map
            .into_iter()
            .map(|(name, value)| (name, FieldValue::Json(value)))
            .collect(),
        other => {
            return Err(StoreError::Serialization(format!(
                "fields column holds non-object JSON: {}",
                other
            )));
        }
    };
    Ok(StoredDocument {
        id,
        created_at,
        fields,
    })
}

/// Inserts one document and returns its store-assigned identifier.
pub async fn insert(
    pool: &PgPool,
    collection: &str,
    fields: DocumentFields,
) -> Result<DocumentId, StoreError> {
    let id = DocumentId::random().map_err(|e| StoreError::Unavailable(e.to_string()))?;

    sqlx::query(
        r#"
        INSERT INTO documents (id, collection, fields)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(id.to_string())
    .bind(collection)
    .bind(fields_to_json(&fields))
    .execute(pool)
    .await?;

    Ok(id)
}

/// Returns the documents of a collection matching a field-equality filter.
pub async fn query(
    pool: &PgPool,
    collection: &str,
    filter: &Filter,
) -> Result<Vec<StoredDocument>, StoreError> {
    let rows: Vec<(String, DateTime<Utc>, Value)> = sqlx::query_as(
        r#"
        SELECT id, created_at, fields
        FROM documents
        WHERE collection = $1 AND fields @> $2
        ORDER BY created_at
        "#,
    )
    .bind(collection)
    .bind(filter_to_json(filter))
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|(id, created_at, fields)| document_from_row(id, created_at, fields))
        .collect()
}

/// Counts the documents of a collection matching a filter.
pub async fn count(pool: &PgPool, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
    let (count,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
        FROM documents
        WHERE collection = $1 AND fields @> $2
        "#,
    )
    .bind(collection)
    .bind(filter_to_json(filter))
    .fetch_one(pool)
    .await?;

    Ok(count as u64)
}

/// Lists the collections that currently hold documents.
pub async fn collection_names(pool: &PgPool) -> Result<Vec<String>, StoreError> {
    let rows: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT DISTINCT collection
        FROM documents
        ORDER BY collection
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|(name,)| name).collect())
}
