// HTTP API Error Types
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::database::models::EntityKind;
use crate::database::store::StoreError;
use crate::observer::Operation;
use crate::services::guard::PersistenceError;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },
    InvalidJson(String),
    /// Write rejected by a constraint or an unclassified store failure
    PersistenceFailed {
        message: String,
        code: &'static str,
        field_errors: Option<HashMap<String, String>>,
    },

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

const RETRY_ADVICE: &str = "Try again, and if the problem persists see your system administrator.";

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::ValidationError { .. } => 400,
            ApiError::InvalidJson(_) => 400,
            ApiError::PersistenceFailed { .. } => 400,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::InternalServerError(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::ValidationError { message, .. } => message,
            ApiError::InvalidJson(msg) => msg,
            ApiError::PersistenceFailed { message, .. } => message,
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::InvalidJson(_) => "INVALID_JSON",
            ApiError::PersistenceFailed { code, .. } => *code,
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    pub fn field_errors(&self) -> Option<&HashMap<String, String>> {
        match self {
            ApiError::ValidationError { field_errors, .. }
            | ApiError::PersistenceFailed { field_errors, .. } => field_errors.as_ref(),
            _ => None,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        let mut response = json!({
            "error": true,
            "message": self.message(),
            "code": self.error_code()
        });

        if let Some(field_errors) = self.field_errors() {
            response["field_errors"] = json!(field_errors);
        }

        response
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation_error(
        message: impl Into<String>,
        field_errors: Option<HashMap<String, String>>,
    ) -> Self {
        ApiError::ValidationError {
            message: message.into(),
            field_errors,
        }
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        ApiError::InvalidJson(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }

    /// 404 for a read of a missing record
    pub fn record_not_found(kind: EntityKind) -> Self {
        ApiError::not_found(format!(
            "Error: {} record not found, Please try again. If the issue persists, contact your Administrator.",
            kind
        ))
    }

    /// Body id on a PUT differs from the path id
    pub fn id_mismatch(kind: EntityKind) -> Self {
        let mut field_errors = HashMap::new();
        field_errors.insert("id".to_string(), "Must match the id in the URL".to_string());
        ApiError::validation_error(format!("Error: ID does not match {}", kind), Some(field_errors))
    }
}

// Convert other error types to ApiError
impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound(kind) => {
                ApiError::not_found(format!("Delete Error: {} has already been removed.", kind))
            }
            PersistenceError::ConcurrencyRemoved(kind) => {
                ApiError::conflict(format!("Concurrency Error: {} has been Removed.", kind))
            }
            PersistenceError::ConcurrencyModified(kind) => ApiError::conflict(format!(
                "Concurrency Error: {} has been updated by another user.  Back out and try editing the record again.",
                kind
            )),
            PersistenceError::UniqueViolation { kind, field } => {
                let mut field_errors = HashMap::new();
                field_errors.insert(field.to_string(), format!("This {} is already in use", field));
                ApiError::PersistenceFailed {
                    message: format!("Unable to save: Duplicate {} Code number.", kind),
                    code: "DUPLICATE_CODE",
                    field_errors: Some(field_errors),
                }
            }
            PersistenceError::ReferentialIntegrity(kind) => ApiError::PersistenceFailed {
                message: format!(
                    "Delete Error: Remember, you cannot delete a {} that has Athletes assigned.",
                    kind
                ),
                code: "REFERENTIAL_INTEGRITY",
                field_errors: None,
            },
            PersistenceError::MissingReference { kind, parent } => {
                let field = match parent {
                    EntityKind::Contingent => "contingentID",
                    _ => "sportID",
                };
                let mut field_errors = HashMap::new();
                field_errors.insert(field.to_string(), format!("No {} exists with this id", parent));
                ApiError::PersistenceFailed {
                    message: format!("Unable to save {}: the selected {} does not exist.", kind, parent),
                    code: "MISSING_REFERENCE",
                    field_errors: Some(field_errors),
                }
            }
            PersistenceError::Unknown { kind, operation, detail } => {
                tracing::error!("Unclassified {:?} {} failure: {}", operation, kind, detail);
                let message = match operation {
                    Operation::Delete => format!("Delete Error: Unable to delete {}. {}", kind, RETRY_ADVICE),
                    _ => format!("Unable to save changes to the database. {}", RETRY_ADVICE),
                };
                ApiError::PersistenceFailed {
                    message,
                    code: "PERSISTENCE_ERROR",
                    field_errors: None,
                }
            }
        }
    }
}

/// Read-path store failures
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        tracing::error!("Store read failed: {}", err);
        ApiError::internal_server_error("An error occurred while processing your request")
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::invalid_json(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concurrency_outcomes_are_conflicts() {
        let removed = ApiError::from(PersistenceError::ConcurrencyRemoved(EntityKind::Sport));
        assert_eq!(removed.status_code(), 409);
        assert_eq!(removed.message(), "Concurrency Error: Sport has been Removed.");

        let modified = ApiError::from(PersistenceError::ConcurrencyModified(EntityKind::Athlete));
        assert_eq!(modified.status_code(), 409);
        assert!(modified.message().contains("Athlete has been updated by another user"));
    }

    #[test]
    fn unique_violation_names_the_field() {
        let err = ApiError::from(PersistenceError::UniqueViolation {
            kind: EntityKind::Athlete,
            field: "athleteCode",
        });
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.message(), "Unable to save: Duplicate Athlete Code number.");
        assert!(err.field_errors().unwrap().contains_key("athleteCode"));
        assert_eq!(err.to_json()["code"], "DUPLICATE_CODE");
    }

    #[test]
    fn referential_violation_is_bad_request() {
        let err = ApiError::from(PersistenceError::ReferentialIntegrity(EntityKind::Contingent));
        assert_eq!(err.status_code(), 400);
        assert_eq!(
            err.message(),
            "Delete Error: Remember, you cannot delete a Contingent that has Athletes assigned."
        );
    }

    #[test]
    fn unknown_failures_use_generic_messages() {
        let save = ApiError::from(PersistenceError::Unknown {
            kind: EntityKind::Sport,
            operation: Operation::Update,
            detail: "connection reset".to_string(),
        });
        assert_eq!(save.status_code(), 400);
        assert!(save.message().starts_with("Unable to save changes to the database."));
        assert!(!save.message().contains("connection reset"));

        let delete = ApiError::from(PersistenceError::Unknown {
            kind: EntityKind::Sport,
            operation: Operation::Delete,
            detail: "timeout".to_string(),
        });
        assert!(delete.message().starts_with("Delete Error: Unable to delete Sport."));
    }

    #[test]
    fn validation_body_carries_field_errors() {
        let mut fields = HashMap::new();
        fields.insert("code".to_string(), "Code is required.".to_string());
        let body = ApiError::validation_error("Invalid Sport", Some(fields)).to_json();
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["field_errors"]["code"], "Code is required.");
    }
}
