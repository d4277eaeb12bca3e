//! # Seed Data
//!
//! One-shot bootstrap that makes the API usable without manual data entry.
//! Each reference collection is seeded only when it is empty, so repeated
//! calls are no-ops while the data is intact. The emptiness check is
//! existence-of-any-record, not exact-match dedup: deleting seed rows by
//! hand and re-seeding will duplicate the survivors' semantics.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::category::CATEGORY_COLLECTION;
use crate::guide::GUIDE_COLLECTION;
use crate::router::AppState;
use crate::{DocumentStore, Filter, IssueCategory, SolutionGuide, SolutionStep, StoreError};

/// How many records each seeding pass inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedOutcome {
    /// Categories inserted (0 when the collection was already populated).
    pub categories_inserted: usize,
    /// Guides inserted (0 when the collection was already populated).
    pub guides_inserted: usize,
}

fn category(key: &str, title: &str, description: &str, icon: &str) -> IssueCategory {
    IssueCategory {
        key: key.to_string(),
        title: title.to_string(),
        description: Some(description.to_string()),
        icon: Some(icon.to_string()),
    }
}

/// The fixed category seed set, in insertion order.
pub fn seed_categories() -> Vec<IssueCategory> {
    vec![
        category(
            "icloud",
            "iCloud/Activation Lock",
            "Help with activation lock and iCloud lock issues",
            "cloud",
        ),
        category(
            "frp",
            "FRP (Factory Reset Protection)",
            "Google account lock/FRP bypass help",
            "shield",
        ),
        category(
            "screen-lock",
            "Screen/Pin/Pattern Lock",
            "Forgotten screen lock resolutions",
            "lock",
        ),
        category(
            "bootloop",
            "Bootloop/No Boot",
            "Device stuck on boot logo or not starting",
            "refresh",
        ),
    ]
}

fn step(title: &str, details: &str) -> SolutionStep {
    SolutionStep {
        title: title.to_string(),
        details: details.to_string(),
    }
}

/// The fixed guide seed set; every guide references a seeded category key.
pub fn seed_guides() -> Vec<SolutionGuide> {
    vec![
        SolutionGuide {
            title: "Check Activation Lock Status".to_string(),
            category_key: "icloud".to_string(),
            devices: vec!["iPhone 8+".to_string(), "iPad (2018+)".to_string()],
            summary: Some("Verify activation lock status and prepare ownership proof".to_string()),
            steps: vec![
                step(
                    "Find IMEI/Serial",
                    "From the SIM tray or box. If device is on, go to Settings > General > About.",
                ),
                step(
                    "Check Online",
                    "Use Apple's support to check coverage and activation lock status.",
                ),
                step(
                    "Contact Original Owner",
                    "Request remote removal via iCloud.com > Find My.",
                ),
            ],
            difficulty: Some("medium".to_string()),
        },
        SolutionGuide {
            title: "FRP Removal Preparation".to_string(),
            category_key: "frp".to_string(),
            devices: vec!["Samsung Galaxy S9+".to_string(), "Pixel 3+".to_string()],
            summary: Some(
                "Collect details and follow safe FRP bypass preparation steps".to_string(),
            ),
            steps: vec![
                step(
                    "Know the Patch Level",
                    "Find the Android security patch level to choose a compatible method.",
                ),
                step(
                    "Network Ready",
                    "Ensure stable Wi‑Fi; some steps require SIM with PIN.",
                ),
                step(
                    "OTG/PC Tools",
                    "Have a USB cable and a computer ready for ADB-based methods.",
                ),
            ],
            difficulty: Some("hard".to_string()),
        },
        SolutionGuide {
            title: "Forgot Screen PIN on Android".to_string(),
            category_key: "screen-lock".to_string(),
            devices: vec!["Android 8+".to_string()],
            summary: Some("Try non-destructive options before reset".to_string()),
            steps: vec![
                step(
                    "Find My Device Unlock",
                    "If enabled, use google.com/android/find to attempt unlock or reset.",
                ),
                step(
                    "OEM Account Unlock",
                    "Some vendors allow remote unlock after verification.",
                ),
                step(
                    "Backup then Reset",
                    "If nothing works, use recovery mode to factory reset (will erase data).",
                ),
            ],
            difficulty: Some("easy".to_string()),
        },
    ]
}

/// Seeds the category and guide collections if, and only if, they are empty.
///
/// The two collections are checked independently. The leading `count` call
/// surfaces a store outage before anything is written; a failure partway
/// through leaves already-inserted records in place.
pub async fn seed_reference_data(store: &dyn DocumentStore) -> Result<SeedOutcome, StoreError> {
    let mut outcome = SeedOutcome {
        categories_inserted: 0,
        guides_inserted: 0,
    };

    if store.count(CATEGORY_COLLECTION, &Filter::new()).await? == 0 {
        for category in seed_categories() {
            store
                .insert(CATEGORY_COLLECTION, category.into_fields())
                .await?;
            outcome.categories_inserted += 1;
        }
    }

    if store.count(GUIDE_COLLECTION, &Filter::new()).await? == 0 {
        for guide in seed_guides() {
            store.insert(GUIDE_COLLECTION, guide.into_fields()).await?;
            outcome.guides_inserted += 1;
        }
    }

    Ok(outcome)
}

pub(crate) async fn seed_sample_data(
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let Some(store) = &state.store else {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "Database not available"})),
        ));
    };

    seed_reference_data(store.as_ref()).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": e.to_string()})),
        )
    })?;

    Ok(Json(json!({"message": "Seed complete"})))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryDocumentStore;
    use std::collections::HashSet;

    #[test]
    fn seed_set_shapes() {
        let categories = seed_categories();
        let keys: Vec<_> = categories.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["icloud", "frp", "screen-lock", "bootloop"]);

        let category_keys: HashSet<_> = keys.into_iter().collect();
        let guides = seed_guides();
        assert_eq!(guides.len(), 3);
        for guide in &guides {
            assert!(category_keys.contains(guide.category_key.as_str()));
            assert!(!guide.steps.is_empty());
        }
    }

    #[tokio::test]
    async fn seeds_empty_collections() {
        let store = InMemoryDocumentStore::new();
        let outcome = seed_reference_data(&store).await.unwrap();

        assert_eq!(outcome.categories_inserted, 4);
        assert_eq!(outcome.guides_inserted, 3);
        assert_eq!(store.count(CATEGORY_COLLECTION, &Filter::new()).await.unwrap(), 4);
        assert_eq!(store.count(GUIDE_COLLECTION, &Filter::new()).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn reseeding_is_a_noop() {
        let store = InMemoryDocumentStore::new();
        seed_reference_data(&store).await.unwrap();
        let outcome = seed_reference_data(&store).await.unwrap();

        assert_eq!(outcome.categories_inserted, 0);
        assert_eq!(outcome.guides_inserted, 0);
        assert_eq!(store.count(CATEGORY_COLLECTION, &Filter::new()).await.unwrap(), 4);
        assert_eq!(store.count(GUIDE_COLLECTION, &Filter::new()).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn collections_are_seeded_independently() {
        let store = InMemoryDocumentStore::new();
        // Pre-populate only the categories; guides must still be seeded.
        store
            .insert(
                CATEGORY_COLLECTION,
                seed_categories().remove(0).into_fields(),
            )
            .await
            .unwrap();

        let outcome = seed_reference_data(&store).await.unwrap();
        assert_eq!(outcome.categories_inserted, 0);
        assert_eq!(outcome.guides_inserted, 3);
        assert_eq!(store.count(CATEGORY_COLLECTION, &Filter::new()).await.unwrap(), 1);
    }
}
