pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use validator::ValidationErrors;

use crate::envelope::{ApiResponse, ErrorDetails, FieldError, NoData};

/// Application error type that renders as an error envelope.
///
/// This is the single place where failures become HTTP responses. Domain
/// crates convert their own error enums into `AppError` at the handler
/// boundary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Invalid UUID: {0}")]
    InvalidUuid(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Request Timeout")]
    RequestTimeout,

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::JsonExtractorRejection(_)
            | Self::ValidationError(_)
            | Self::InvalidUuid(_)
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            Self::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::JsonExtractorRejection(_) | Self::ValidationError(_) | Self::BadRequest(_) => {
                ErrorCode::ValidationError
            }
            Self::InvalidUuid(_) => ErrorCode::InvalidUuid,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::MethodNotAllowed => ErrorCode::MethodNotAllowed,
            Self::RequestTimeout => ErrorCode::RequestTimeout,
            Self::InternalServerError(_) => ErrorCode::InternalError,
            Self::ServiceUnavailable(_) => ErrorCode::ServiceUnavailable,
        }
    }

    /// Logs the failure and builds the status and envelope for it.
    ///
    /// 5xx details go to the log only; the caller sees the generic message
    /// of the error code.
    pub fn into_envelope(self, request_id: Option<String>) -> (StatusCode, ApiResponse<NoData>) {
        let status = self.status();
        let code = self.error_code();
        let rid = request_id.as_deref().unwrap_or("-");

        let (message, details) = match self {
            Self::JsonExtractorRejection(e) => {
                tracing::warn!(error_code = code.code(), request_id = rid, "JSON extraction error: {}", e);
                (e.body_text(), Vec::new())
            }
            Self::ValidationError(e) => {
                tracing::info!(error_code = code.code(), request_id = rid, "Validation error: {}", e);
                (code.default_message().to_string(), field_errors(&e))
            }
            Self::InvalidUuid(raw) => {
                tracing::info!(error_code = code.code(), request_id = rid, value = %raw, "Invalid UUID");
                (format!("{}: '{}'", code.default_message(), raw), Vec::new())
            }
            Self::BadRequest(msg) => {
                tracing::info!(error_code = code.code(), request_id = rid, "Bad request: {}", msg);
                (msg, Vec::new())
            }
            Self::NotFound(msg) => {
                tracing::info!(error_code = code.code(), request_id = rid, "Not found: {}", msg);
                (msg, Vec::new())
            }
            Self::MethodNotAllowed => {
                tracing::info!(error_code = code.code(), request_id = rid, "Method not allowed");
                (code.default_message().to_string(), Vec::new())
            }
            Self::RequestTimeout => {
                tracing::warn!(error_code = code.code(), request_id = rid, "Request timed out");
                (code.default_message().to_string(), Vec::new())
            }
            Self::InternalServerError(msg) => {
                tracing::error!(error_code = code.code(), request_id = rid, "Internal server error: {}", msg);
                (code.default_message().to_string(), Vec::new())
            }
            Self::ServiceUnavailable(msg) => {
                tracing::warn!(error_code = code.code(), request_id = rid, "Service unavailable: {}", msg);
                (code.default_message().to_string(), Vec::new())
            }
        };

        let envelope = ApiResponse::failure(
            ErrorDetails {
                code,
                message,
                details,
            },
            request_id,
        );

        (status, envelope)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.into_envelope(None);
        (status, Json(body)).into_response()
    }
}

/// Flattens validator output into `{field, message}` pairs, sorted by field.
///
/// Field names are reported in camelCase to match the JSON bodies.
fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = camel_case(&field);
            errs.iter().map(move |err| FieldError {
                field: field.clone(),
                message: err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("invalid value ({})", err.code)),
            })
        })
        .collect();

    out.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    out
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use validator::ValidationError;

    #[test]
    fn test_business_rule_maps_to_validation_error() {
        let (status, body) = AppError::BadRequest("Invalid parent user specified".into())
            .into_envelope(Some("req-1".into()));

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.success);
        assert_eq!(body.message, "Invalid parent user specified");
        assert_eq!(body.request_id.as_deref(), Some("req-1"));

        let error = body.error.unwrap();
        assert_eq!(error.code, ErrorCode::ValidationError);
        assert_eq!(error.message, "Invalid parent user specified");
    }

    #[test]
    fn test_not_found_keeps_message() {
        let (status, body) = AppError::NotFound("User not found".into()).into_envelope(None);

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error.unwrap().code, ErrorCode::NotFound);
        assert_eq!(body.message, "User not found");
    }

    #[test]
    fn test_internal_error_hides_details() {
        let (status, body) =
            AppError::InternalServerError("connection refused at 10.0.0.3".into()).into_envelope(None);

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, "An internal server error occurred");
        assert!(!body.message.contains("10.0.0.3"));
        assert_eq!(body.error.unwrap().code, ErrorCode::InternalError);
    }

    #[test]
    fn test_invalid_uuid() {
        let (status, body) = AppError::InvalidUuid("not-a-uuid".into()).into_envelope(None);

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error.unwrap().code, ErrorCode::InvalidUuid);
        assert!(body.message.contains("not-a-uuid"));
    }

    #[test]
    fn test_validation_errors_become_field_details() {
        let mut errors = ValidationErrors::new();
        let mut past = ValidationError::new("past_date");
        past.message = Some(Cow::Borrowed("Birth date must be in the past"));
        errors.add("birth_date", past);
        errors.add("email", ValidationError::new("email"));

        let (status, body) = AppError::ValidationError(errors).into_envelope(None);
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let details = body.error.unwrap().details;
        assert_eq!(details.len(), 2);
        assert_eq!(details[0].field, "birthDate");
        assert_eq!(details[0].message, "Birth date must be in the past");
        assert_eq!(details[1].field, "email");
        assert_eq!(details[1].message, "invalid value (email)");
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("birth_date"), "birthDate");
        assert_eq!(camel_case("parent_id"), "parentId");
        assert_eq!(camel_case("email"), "email");
        assert_eq!(camel_case("__all__"), "all");
    }
}
