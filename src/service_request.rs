//! Service requests: user-submitted pleas for help with a device.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::router::AppState;
use crate::schema::{
    ValidationError, bool_or, expect_object, optional_string, required_email, required_string,
};
use crate::{DocumentFields, FieldValue};

/// The collection that holds service requests.
pub const SERVICE_REQUEST_COLLECTION: &str = "servicerequest";

/// A user-submitted help request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRequest {
    /// Requester's name.
    pub name: String,
    /// Contact email, validated as a well-formed address.
    pub email: String,
    /// Optional phone number.
    pub phone: Option<String>,
    /// Device make/model, free-form.
    pub device_model: Option<String>,
    /// Key of the issue category the requester picked, if any.
    pub issue_category: Option<String>,
    /// Free-form description of the problem.
    pub issue_description: Option<String>,
    /// Whether the requester flagged the issue as urgent.
    pub urgent: bool,
}

impl ServiceRequest {
    /// Validates a JSON mapping into a service request, enumerating every
    /// violated field constraint.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let map = expect_object(value)?;
        let mut violations = Vec::new();

        let name = required_string(map, "name", &mut violations);
        let email = required_email(map, "email", &mut violations);
        let phone = optional_string(map, "phone", &mut violations);
        let device_model = optional_string(map, "device_model", &mut violations);
        let issue_category = optional_string(map, "issue_category", &mut violations);
        let issue_description = optional_string(map, "issue_description", &mut violations);
        let urgent = bool_or(map, "urgent", false, &mut violations);

        match (name, email) {
            (Some(name), Some(email)) if violations.is_empty() => Ok(ServiceRequest {
                name,
                email,
                phone,
                device_model,
                issue_category,
                issue_description,
                urgent,
            }),
            _ => Err(ValidationError::new(violations)),
        }
    }

    /// Converts the request into tagged store fields.
    pub fn into_fields(self) -> DocumentFields {
        fn opt(value: Option<String>) -> FieldValue {
            FieldValue::Json(value.map_or(Value::Null, Value::String))
        }
        vec![
            ("name".to_string(), FieldValue::from(self.name)),
            ("email".to_string(), FieldValue::from(self.email)),
            ("phone".to_string(), opt(self.phone)),
            ("device_model".to_string(), opt(self.device_model)),
            ("issue_category".to_string(), opt(self.issue_category)),
            ("issue_description".to_string(), opt(self.issue_description)),
            ("urgent".to_string(), FieldValue::from(self.urgent)),
        ]
    }
}

/// Response returned after a service request is stored.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateServiceRequestResponse {
    /// The store-assigned identifier of the new request.
    pub id: String,
    /// Human-readable confirmation.
    pub message: String,
}

pub(crate) async fn create_service_request(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<CreateServiceRequestResponse>, (StatusCode, Json<Value>)> {
    // Validation happens strictly before any store interaction.
    let request = ServiceRequest::from_value(&body).map_err(|err| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": err.violations})),
        )
    })?;

    let Some(store) = &state.store else {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "Database not available"})),
        ));
    };

    let id = store
        .insert(SERVICE_REQUEST_COLLECTION, request.into_fields())
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"detail": e.to_string()})),
            )
        })?;

    Ok(Json(CreateServiceRequestResponse {
        id: id.to_string(),
        message: "Request submitted successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_value_minimal_request() {
        let request = ServiceRequest::from_value(&json!({
            "name": "Ada",
            "email": "ada@example.com",
        }))
        .unwrap();

        assert_eq!(request.name, "Ada");
        assert_eq!(request.email, "ada@example.com");
        assert!(!request.urgent);
        assert_eq!(request.phone, None);
    }

    #[test]
    fn malformed_email_is_rejected() {
        let err = ServiceRequest::from_value(&json!({
            "name": "Ada",
            "email": "not-an-email",
        }))
        .unwrap_err();

        assert_eq!(err.violations.len(), 1);
        assert_eq!(err.violations[0].field, "email");
    }

    #[test]
    fn every_violation_is_reported() {
        let err = ServiceRequest::from_value(&json!({
            "email": "nope",
            "phone": 5551234,
            "urgent": "very",
        }))
        .unwrap_err();

        let fields: Vec<_> = err.violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "email", "phone", "urgent"]);
    }

    #[test]
    fn into_fields_covers_all_attributes() {
        let request = ServiceRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            device_model: Some("Pixel 3".to_string()),
            issue_category: Some("frp".to_string()),
            issue_description: None,
            urgent: true,
        };

        let fields = request.into_fields();
        let names: Vec<_> = fields.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "name",
                "email",
                "phone",
                "device_model",
                "issue_category",
                "issue_description",
                "urgent"
            ]
        );
        assert_eq!(fields[6].1, FieldValue::from(true));
    }
}
