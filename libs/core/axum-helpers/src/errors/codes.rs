//! Machine-readable codes carried in `error.code` of the response envelope.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! assert_eq!(ErrorCode::InvalidUuid.as_str(), "INVALID_UUID");
//! assert_eq!(ErrorCode::InvalidUuid.code(), 1002);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request body or business rule validation failed
    ValidationError,

    /// Malformed UUID in a path parameter
    InvalidUuid,

    /// Requested resource was not found
    NotFound,

    /// Route exists but not for this HTTP method
    MethodNotAllowed,

    /// The handler did not finish within `REQUEST_TIMEOUT_SECS`
    RequestTimeout,

    /// Unexpected server-side failure; details are only logged
    InternalError,

    /// A dependency such as the database is unreachable
    ServiceUnavailable,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidUuid => "INVALID_UUID",
            Self::NotFound => "NOT_FOUND",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::RequestTimeout => "REQUEST_TIMEOUT",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }

    /// Integer code used as the `error_code` field in structured logs.
    ///
    /// 1000-1999 are client errors, 5000-5999 server errors.
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidUuid => 1002,
            Self::NotFound => 1004,
            Self::MethodNotAllowed => 1005,
            Self::RequestTimeout => 1008,
            Self::InternalError => 5001,
            Self::ServiceUnavailable => 5003,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidUuid => "Invalid UUID format",
            Self::NotFound => "Resource not found",
            Self::MethodNotAllowed => "The HTTP method is not allowed for this resource",
            Self::RequestTimeout => "The request took too long to complete",
            Self::InternalError => "An internal server error occurred",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ErrorCode; 7] = [
        ErrorCode::ValidationError,
        ErrorCode::InvalidUuid,
        ErrorCode::NotFound,
        ErrorCode::MethodNotAllowed,
        ErrorCode::RequestTimeout,
        ErrorCode::InternalError,
        ErrorCode::ServiceUnavailable,
    ];

    #[test]
    fn test_client_and_server_ranges() {
        for code in ALL {
            let server_side = matches!(code, ErrorCode::InternalError | ErrorCode::ServiceUnavailable);
            assert_eq!(code.code() >= 5000, server_side, "{code}");
        }
    }

    #[test]
    fn test_internal_message_hides_details() {
        assert_eq!(
            ErrorCode::InternalError.default_message(),
            "An internal server error occurred"
        );
    }

    #[test]
    fn test_wire_form_matches_as_str() {
        for code in ALL {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.as_str()));
            assert_eq!(serde_json::from_str::<ErrorCode>(&json).unwrap(), code);
        }
    }
}
