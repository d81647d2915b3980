//! Reusable OpenAPI error responses, all in envelope form.

use crate::envelope::{ApiResponse, NoData};
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "An internal server error occurred",
        "data": null,
        "timestamp": "2025-03-01T09:00:00Z",
        "requestId": "0b9f5c0e-8d1c-4a4e-9a43-2f1f6f0a7c11",
        "error": {"code": "INTERNAL_ERROR", "message": "An internal server error occurred"}
    })
)]
pub struct InternalServerErrorResponse(pub ApiResponse<NoData>);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Validation Error",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "Request validation failed",
        "data": null,
        "timestamp": "2025-03-01T09:00:00Z",
        "requestId": "0b9f5c0e-8d1c-4a4e-9a43-2f1f6f0a7c11",
        "error": {
            "code": "VALIDATION_ERROR",
            "message": "Request validation failed",
            "details": [{"field": "email", "message": "Email must be a valid address"}]
        }
    })
)]
pub struct BadRequestValidationResponse(pub ApiResponse<NoData>);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Invalid UUID",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "Invalid UUID format: 'abc'",
        "data": null,
        "timestamp": "2025-03-01T09:00:00Z",
        "requestId": "0b9f5c0e-8d1c-4a4e-9a43-2f1f6f0a7c11",
        "error": {"code": "INVALID_UUID", "message": "Invalid UUID format: 'abc'"}
    })
)]
pub struct BadRequestUuidResponse(pub ApiResponse<NoData>);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "User not found",
        "data": null,
        "timestamp": "2025-03-01T09:00:00Z",
        "requestId": "0b9f5c0e-8d1c-4a4e-9a43-2f1f6f0a7c11",
        "error": {"code": "NOT_FOUND", "message": "User not found"}
    })
)]
pub struct NotFoundResponse(pub ApiResponse<NoData>);

#[derive(ToResponse)]
#[response(
    description = "Service Unavailable",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "Service is temporarily unavailable",
        "data": null,
        "timestamp": "2025-03-01T09:00:00Z",
        "requestId": null,
        "error": {"code": "SERVICE_UNAVAILABLE", "message": "Service is temporarily unavailable"}
    })
)]
pub struct ServiceUnavailableResponse(pub ApiResponse<NoData>);
