//! Issue categories: the fixed taxonomy of mobile repair problems.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::router::AppState;
use crate::schema::{ValidationError, expect_object, optional_string, required_string};
use crate::{DocumentFields, FieldValue, Filter, serialize_document};

/// The collection that holds issue categories.
pub const CATEGORY_COLLECTION: &str = "issuecategory";

/// A category of mobile issue, such as iCloud lock or FRP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCategory {
    /// Unique key identifier, e.g. "icloud" or "screen-lock".
    pub key: String,
    /// Human readable title.
    pub title: String,
    /// Short description of the category.
    pub description: Option<String>,
    /// Icon name for UI hints.
    pub icon: Option<String>,
}

impl IssueCategory {
    /// Validates a JSON mapping into a category, enumerating every violated
    /// field constraint.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let map = expect_object(value)?;
        let mut violations = Vec::new();

        let key = required_string(map, "key", &mut violations);
        let title = required_string(map, "title", &mut violations);
        let description = optional_string(map, "description", &mut violations);
        let icon = optional_string(map, "icon", &mut violations);

        match (key, title) {
            (Some(key), Some(title)) if violations.is_empty() => Ok(IssueCategory {
                key,
                title,
                description,
                icon,
            }),
            _ => Err(ValidationError::new(violations)),
        }
    }

    /// Converts the category into tagged store fields.
    pub fn into_fields(self) -> DocumentFields {
        vec![
            ("key".to_string(), FieldValue::from(self.key)),
            ("title".to_string(), FieldValue::from(self.title)),
            (
                "description".to_string(),
                FieldValue::Json(self.description.map_or(Value::Null, Value::String)),
            ),
            (
                "icon".to_string(),
                FieldValue::Json(self.icon.map_or(Value::Null, Value::String)),
            ),
        ]
    }
}

pub(crate) async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Map<String, Value>>>, (StatusCode, &'static str)> {
    // Reads degrade softly when no store was configured.
    let Some(store) = &state.store else {
        return Ok(Json(Vec::new()));
    };

    let docs = store
        .query(CATEGORY_COLLECTION, &Filter::new())
        .await
        .map_err(|_e| (StatusCode::INTERNAL_SERVER_ERROR, "failed to list categories"))?;

    Ok(Json(docs.iter().map(serialize_document).collect()))
}
