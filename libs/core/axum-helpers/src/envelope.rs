//! Uniform success/error wrapper returned by every endpoint.
//!
//! ```json
//! {
//!   "success": false,
//!   "message": "Email 'a@b.com' is already in use",
//!   "data": null,
//!   "timestamp": "2025-03-01T09:00:00Z",
//!   "requestId": "6f1c2b1e-...",
//!   "error": { "code": "VALIDATION_ERROR", "message": "Email 'a@b.com' is already in use" }
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ErrorCode;

/// Response envelope. `data` is always present in the JSON, `null` when empty.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    pub timestamp: DateTime<Utc>,
    pub request_id: Option<String>,
    #[serde(default)]
    pub error: Option<ErrorDetails>,
}

/// Payload type for envelopes that never carry data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NoData;

/// Machine-readable failure description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    pub message: String,
    /// Per-field request validation failures
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: Option<T>, request_id: Option<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            timestamp: Utc::now(),
            request_id,
            error: None,
        }
    }

    pub fn failure(error: ErrorDetails, request_id: Option<String>) -> Self {
        Self {
            success: false,
            message: error.message.clone(),
            data: None,
            timestamp: Utc::now(),
            request_id,
            error: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_success_envelope_shape() {
        let envelope = ApiResponse::success("User retrieved", Some(json!({"id": 1})), Some("r-1".into()));
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["success"], json!(true));
        assert_eq!(value["message"], json!("User retrieved"));
        assert_eq!(value["data"], json!({"id": 1}));
        assert_eq!(value["requestId"], json!("r-1"));
        assert_eq!(value["error"], Value::Null);
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_empty_data_serializes_as_null() {
        let envelope = ApiResponse::<NoData>::success("User deleted", None, None);
        let value = serde_json::to_value(&envelope).unwrap();

        assert!(value.as_object().unwrap().contains_key("data"));
        assert_eq!(value["data"], Value::Null);
    }

    #[test]
    fn test_failure_copies_error_message() {
        let envelope = ApiResponse::<NoData>::failure(
            ErrorDetails {
                code: ErrorCode::ValidationError,
                message: "Invalid parent user specified".into(),
                details: vec![],
            },
            Some("r-2".into()),
        );
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["success"], json!(false));
        assert_eq!(value["message"], json!("Invalid parent user specified"));
        assert_eq!(value["error"]["code"], json!("VALIDATION_ERROR"));
        assert!(value["error"].get("details").is_none());
    }
}
