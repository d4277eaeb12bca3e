//! Liveness and store-connectivity endpoints.
//!
//! The `/test` endpoint never fails: every sub-check degrades to a
//! descriptive status string, and error causes are truncated to 50
//! characters before they reach the response.

use axum::extract::State;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::router::AppState;

/// Maximum length of an error cause echoed by the diagnostic endpoint.
const CAUSE_LIMIT: usize = 50;

/// Maximum number of collection names echoed by the diagnostic endpoint.
const COLLECTION_LIMIT: usize = 10;

/// The connectivity report returned by `/test`.
#[derive(Debug, Serialize, Deserialize)]
pub struct DiagnosticsResponse {
    /// Whether the HTTP process itself is up (always "✅ Running").
    pub backend: String,
    /// The document store's status, degraded to a descriptive string.
    pub database: String,
    /// Whether DATABASE_URL is present in the environment.
    pub database_url: String,
    /// Whether DATABASE_NAME is present in the environment.
    pub database_name: String,
    /// "Connected" or "Not Connected".
    pub connection_status: String,
    /// Up to ten collection names, when the store answers.
    pub collections: Vec<String>,
}

fn truncate_cause(message: &str) -> String {
    message.chars().take(CAUSE_LIMIT).collect()
}

fn env_presence(name: &str) -> String {
    if std::env::var(name).is_ok() {
        "✅ Set".to_string()
    } else {
        "❌ Not Set".to_string()
    }
}

pub(crate) async fn read_root() -> Json<Value> {
    Json(json!({"message": "Mobile Repair Assistant Backend Running"}))
}

pub(crate) async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

pub(crate) async fn test_store(State(state): State<AppState>) -> Json<DiagnosticsResponse> {
    let mut response = DiagnosticsResponse {
        backend: "✅ Running".to_string(),
        database: "⚠️  Available but not initialized".to_string(),
        database_url: env_presence("DATABASE_URL"),
        database_name: env_presence("DATABASE_NAME"),
        connection_status: "Not Connected".to_string(),
        collections: Vec::new(),
    };

    if let Some(store) = &state.store {
        response.database = "✅ Available".to_string();
        response.connection_status = "Connected".to_string();

        match store.collection_names().await {
            Ok(mut collections) => {
                collections.truncate(COLLECTION_LIMIT);
                response.collections = collections;
                response.database = "✅ Connected & Working".to_string();
            }
            Err(e) => {
                response.database =
                    format!("⚠️  Connected but Error: {}", truncate_cause(&e.to_string()));
            }
        }
    }

    Json(response)
}
