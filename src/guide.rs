//! Solution guides: step-by-step troubleshooting instructions per category.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::router::AppState;
use crate::schema::{
    FieldViolation, ValidationError, expect_object, optional_string, required_string, string_list,
};
use crate::{DocumentFields, FieldValue, Filter, serialize_document};

/// The collection that holds solution guides.
pub const GUIDE_COLLECTION: &str = "solutionguide";

/// One step of a solution guide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionStep {
    /// Short name of the step.
    pub title: String,
    /// What to actually do.
    pub details: String,
}

/// A troubleshooting guide for one issue category.
///
/// `category_key` references an [`crate::IssueCategory`] by key. The
/// reference is not validated at write time; a dangling key is possible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionGuide {
    /// Guide title.
    pub title: String,
    /// Key of the category this guide belongs to.
    pub category_key: String,
    /// Supported devices or OS versions.
    pub devices: Vec<String>,
    /// One-line summary.
    pub summary: Option<String>,
    /// Ordered steps to follow.
    pub steps: Vec<SolutionStep>,
    /// Informally one of "easy", "medium", "hard".
    pub difficulty: Option<String>,
}

fn steps_from_value(
    map: &Map<String, Value>,
    out: &mut Vec<FieldViolation>,
) -> Vec<SolutionStep> {
    let items = match map.get("steps") {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(items)) => items,
        Some(_) => {
            out.push(FieldViolation::new("steps", "expected a list of steps"));
            return Vec::new();
        }
    };

    let mut steps = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let Some(step) = item.as_object() else {
            out.push(FieldViolation::new(
                "steps",
                format!("element {} must be an object", index),
            ));
            continue;
        };
        let mut step_violations = Vec::new();
        let title = required_string(step, "title", &mut step_violations);
        let details = required_string(step, "details", &mut step_violations);
        match (title, details) {
            (Some(title), Some(details)) if step_violations.is_empty() => {
                steps.push(SolutionStep { title, details });
            }
            _ => {
                for v in step_violations {
                    out.push(FieldViolation::new(
                        "steps",
                        format!("element {}: {}: {}", index, v.field, v.message),
                    ));
                }
            }
        }
    }
    steps
}

impl SolutionGuide {
    /// Validates a JSON mapping into a guide, enumerating every violated
    /// field constraint.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let map = expect_object(value)?;
        let mut violations = Vec::new();

        let title = required_string(map, "title", &mut violations);
        let category_key = required_string(map, "category_key", &mut violations);
        let devices = string_list(map, "devices", &mut violations);
        let summary = optional_string(map, "summary", &mut violations);
        let steps = steps_from_value(map, &mut violations);
        let difficulty = optional_string(map, "difficulty", &mut violations);

        match (title, category_key) {
            (Some(title), Some(category_key)) if violations.is_empty() => Ok(SolutionGuide {
                title,
                category_key,
                devices,
                summary,
                steps,
                difficulty,
            }),
            _ => Err(ValidationError::new(violations)),
        }
    }

    /// Converts the guide into tagged store fields.
    pub fn into_fields(self) -> DocumentFields {
        let devices = FieldValue::List(
            self.devices
                .into_iter()
                .map(|d| FieldValue::Json(Value::String(d)))
                .collect(),
        );
        let steps = FieldValue::List(
            self.steps
                .into_iter()
                .map(|s| FieldValue::Json(json!({"title": s.title, "details": s.details})))
                .collect(),
        );
        vec![
            ("title".to_string(), FieldValue::from(self.title)),
            (
                "category_key".to_string(),
                FieldValue::from(self.category_key),
            ),
            ("devices".to_string(), devices),
            (
                "summary".to_string(),
                FieldValue::Json(self.summary.map_or(Value::Null, Value::String)),
            ),
            ("steps".to_string(), steps),
            (
                "difficulty".to_string(),
                FieldValue::Json(self.difficulty.map_or(Value::Null, Value::String)),
            ),
        ]
    }
}

/// Query parameters accepted by the guide listing endpoint.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct GuideListQuery {
    pub(crate) category_key: Option<String>,
}

pub(crate) async fn list_guides(
    State(state): State<AppState>,
    Query(params): Query<GuideListQuery>,
) -> Result<Json<Vec<Map<String, Value>>>, (StatusCode, &'static str)> {
    let Some(store) = &state.store else {
        return Ok(Json(Vec::new()));
    };

    // An empty category_key is treated the same as an absent one.
    let mut filter = Filter::new();
    if let Some(category_key) = params.category_key.filter(|k| !k.is_empty()) {
        filter.insert("category_key".to_string(), Value::String(category_key));
    }

    let docs = store
        .query(GUIDE_COLLECTION, &filter)
        .await
        .map_err(|_e| (StatusCode::INTERNAL_SERVER_ERROR, "failed to list guides"))?;

    Ok(Json(docs.iter().map(serialize_document).collect()))
}
