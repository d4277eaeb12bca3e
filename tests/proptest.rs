use std::sync::Arc;

use axum_test::TestServer;
use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use serde_json::{Value, json};

use repairdesk::{
    AppState, DocumentId, DocumentStore, FieldValue, Filter, InMemoryDocumentStore,
    SERVICE_REQUEST_COLLECTION, create_router, serialize_value,
};

/// Test infrastructure for property testing the repairdesk API
struct ApiTestServer {
    server: TestServer,
    store: Arc<InMemoryDocumentStore>,
}

impl ApiTestServer {
    /// Create a new test server with a fresh in-memory document store
    fn new() -> Self {
        let store = Arc::new(InMemoryDocumentStore::new());
        let server = TestServer::new(create_router(AppState::new(store.clone()))).unwrap();
        Self { server, store }
    }
}

mod strategies {
    use super::*;
    use proptest::collection::{hash_map, vec};
    use proptest::option;
    use proptest::string::string_regex;

    /// Strategy for arbitrary transport-safe JSON values
    pub fn json_value_strategy() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| json!(n)),
            string_regex("[a-zA-Z0-9 :+._-]{0,24}").unwrap().prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 32, 4, |inner| {
            prop_oneof![
                vec(inner.clone(), 0..4).prop_map(Value::Array),
                hash_map(string_regex("[a-z_]{1,8}").unwrap(), inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    /// Strategy for arbitrary tagged field values, including nested lists
    pub fn field_value_strategy() -> impl Strategy<Value = FieldValue> {
        let leaf = prop_oneof![
            any::<[u8; 16]>().prop_map(|bytes| FieldValue::Id(DocumentId::new(bytes))),
            (0i64..4_000_000_000i64)
                .prop_map(|secs| FieldValue::Timestamp(Utc.timestamp_opt(secs, 0).unwrap())),
            json_value_strategy().prop_map(FieldValue::Json),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            vec(inner, 0..4).prop_map(FieldValue::List).boxed()
        })
    }

    /// Strategy for valid service request payloads
    pub fn service_request_strategy() -> impl Strategy<Value = Value> {
        let name = string_regex("[A-Za-z][A-Za-z ]{0,19}").unwrap();
        let email = (
            string_regex("[a-z0-9]{1,10}").unwrap(),
            string_regex("[a-z0-9]{1,10}").unwrap(),
            string_regex("[a-z]{2,4}").unwrap(),
        )
            .prop_map(|(local, domain, tld)| format!("{}@{}.{}", local, domain, tld));
        let phone = option::of(string_regex("[0-9]{7,12}").unwrap());
        let description = option::of(string_regex("[A-Za-z0-9 .,]{0,40}").unwrap());

        (name, email, phone, description, any::<bool>()).prop_map(
            |(name, email, phone, issue_description, urgent)| {
                json!({
                    "name": name,
                    "email": email,
                    "phone": phone,
                    "issue_description": issue_description,
                    "urgent": urgent,
                })
            },
        )
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Plain JSON fields pass through serialization unchanged.
    #[test]
    fn serialization_is_identity_on_plain_json(value in strategies::json_value_strategy()) {
        prop_assert_eq!(serialize_value(&FieldValue::Json(value.clone())), value);
    }

    /// Serializing twice yields the same output as serializing once, for any
    /// field value, identifiers and timestamps included.
    #[test]
    fn serialization_is_idempotent(field in strategies::field_value_strategy()) {
        let once = serialize_value(&field);
        let twice = serialize_value(&FieldValue::Json(once.clone()));
        prop_assert_eq!(once, twice);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(10))]

    /// Every valid service request yields a non-empty id and a record that
    /// is retrievable through the store's native read path.
    #[test]
    fn service_request_roundtrip(payload in strategies::service_request_strategy()) {
        tokio::runtime::Runtime::new().unwrap().block_on(async {
            let t = ApiTestServer::new();

            let response = t.server.post("/api/requests").json(&payload).await;
            response.assert_status_ok();

            let body: Value = response.json();
            let id = body["id"].as_str().unwrap_or_default().to_string();
            assert!(!id.is_empty());

            let mut filter = Filter::new();
            filter.insert("email".to_string(), payload["email"].clone());
            let docs = t.store.query(SERVICE_REQUEST_COLLECTION, &filter).await.unwrap();
            assert_eq!(docs.len(), 1);
            assert_eq!(docs[0].id.to_string(), id);

            let serialized = repairdesk::serialize_document(&docs[0]);
            assert_eq!(serialized.get("name"), payload.get("name"));
            assert_eq!(serialized.get("urgent"), payload.get("urgent"));
        })
    }
}
