use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use crate::{DocumentStore, category, diagnostics, guide, seed, service_request};

/// Per-request dependencies: the shared store handle, if one was configured.
///
/// The handle is initialized once at startup and never mutated afterwards.
/// `None` models a process that was started without any store; read
/// endpoints then return empty sequences while write endpoints fail.
#[derive(Clone)]
pub struct AppState {
    /// The shared document store, if configured.
    pub store: Option<Arc<dyn DocumentStore>>,
}

impl AppState {
    /// State backed by a configured store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store: Some(store) }
    }

    /// State for a process with no store at all.
    pub fn unconfigured() -> Self {
        Self { store: None }
    }
}

/// Builds the full application router.
///
/// CORS is wide open: the API serves a browser frontend from any origin.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(diagnostics::read_root))
        .route("/api/health", get(diagnostics::health))
        .route("/test", get(diagnostics::test_store))
        .route("/api/categories", get(category::list_categories))
        .route("/api/guides", get(guide::list_guides))
        .route(
            "/api/requests",
            post(service_request::create_service_request),
        )
        .route("/api/seed", post(seed::seed_sample_data))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
