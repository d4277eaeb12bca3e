//! # Repairdesk: Backend for a Mobile Repair Assistance App
//!
//! Repairdesk is a small REST service over a document store. It serves a
//! fixed taxonomy of mobile issue categories, step-by-step solution guides,
//! and accepts user-submitted service requests; a one-shot seeding routine
//! populates baseline reference data when the collections are empty.
//!
//! ## Core Concepts
//!
//! ### Documents
//! Records are schema-validated documents grouped into named collections
//! (`issuecategory`, `solutionguide`, `servicerequest`). The store assigns
//! each document a random 16-byte identifier (rendered as 32 hex characters)
//! and an insertion timestamp.
//!
//! ### Tagged fields
//! Stored fields are tagged by declared type ([`FieldValue`]): identifiers,
//! timestamps, lists, and plain JSON are statically distinguished, so the
//! transport serializer dispatches on the declared variant instead of
//! sniffing runtime types — and serializing already-serialized data is a
//! guaranteed no-op.
//!
//! ### Validation
//! Incoming records are validated field by field before any store
//! interaction; a failure enumerates every violated constraint rather than
//! stopping at the first.
//!
//! ### Seeding
//! `POST /api/seed` inserts the fixed category and guide sets, but only into
//! collections that are empty. Repeated calls are no-ops while the data is
//! intact.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ HTTP API Layer (Axum routes)            │
//! ├─────────────────────────────────────────┤
//! │ Record Validation (schema module)       │
//! ├─────────────────────────────────────────┤
//! │ Document Store (trait-based abstraction)│
//! ├─────────────────────────────────────────┤
//! │ Backends (in-memory / PostgreSQL JSONB) │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use repairdesk::{AppState, InMemoryDocumentStore, create_router, seed_reference_data};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let store = Arc::new(InMemoryDocumentStore::new());
//!
//! // Populate baseline data, then serve it.
//! let outcome = seed_reference_data(store.as_ref()).await.unwrap();
//! assert_eq!(outcome.categories_inserted, 4);
//!
//! let app = create_router(AppState::new(store));
//! # drop(app);
//! # });
//! ```

#![deny(missing_docs)]

mod category;
mod diagnostics;
mod document;
mod errors;
mod guide;
mod router;
mod schema;
mod seed;
mod serialize;
mod service_request;
mod store;

/// HTTP client utilities for interacting with repairdesk services.
pub mod http_utils;

/// PostgreSQL backend for the document store.
pub mod sql;

pub use category::{CATEGORY_COLLECTION, IssueCategory};
pub use diagnostics::DiagnosticsResponse;
pub use document::{
    DocumentFields, DocumentId, DocumentIdParseError, FieldValue, Filter, StoredDocument,
};
pub use errors::StoreError;
pub use guide::{GUIDE_COLLECTION, SolutionGuide, SolutionStep};
pub use router::{AppState, create_router};
pub use schema::{
    FieldViolation, ValidationError, bool_or, expect_object, non_negative_number, number_in_range,
    optional_string, required_email, required_string, string_list,
};
pub use seed::{SeedOutcome, seed_categories, seed_guides, seed_reference_data};
pub use serialize::{serialize_document, serialize_value};
pub use service_request::{
    CreateServiceRequestResponse, SERVICE_REQUEST_COLLECTION, ServiceRequest,
};
pub use store::{DocumentStore, InMemoryDocumentStore};
