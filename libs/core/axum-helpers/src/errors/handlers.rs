use crate::request_id::{ApiFailure, RequestId};

use super::AppError;

/// Router fallback for unknown paths.
pub async fn not_found(request_id: RequestId) -> ApiFailure {
    request_id.fail(AppError::NotFound(
        "The requested resource was not found".to_string(),
    ))
}

/// Fallback for known paths hit with an unsupported method.
pub async fn method_not_allowed(request_id: RequestId) -> ApiFailure {
    request_id.fail(AppError::MethodNotAllowed)
}
