//! # Axum Helpers
//!
//! Shared HTTP plumbing for the allowance services.
//!
//! - **[`envelope`]**: the `{success, message, data, timestamp, requestId, error}` wrapper
//! - **[`errors`]**: `AppError`, error codes and OpenAPI error responses
//! - **[`request_id`]**: `x-request-id` middleware, the `RequestId` extractor
//! - **[`extractors`]**: `UuidPath`, `ValidatedJson`
//! - **[`http`]**: CORS and security headers
//! - **[`server`]**: router assembly, health checks, graceful shutdown
//!
//! Handlers take a [`RequestId`] and answer with either
//! [`RequestId::respond`] or an [`ApiFailure`] built with [`RequestId::fail`]:
//!
//! ```ignore
//! async fn get_user(
//!     request_id: RequestId,
//!     UuidPath(id): UuidPath,
//! ) -> Result<impl IntoResponse, ApiFailure> {
//!     let user = service.get(id).await.map_err(|e| request_id.fail(e))?;
//!     Ok(request_id.respond("User retrieved", user))
//! }
//! ```

pub mod envelope;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod request_id;
pub mod server;

pub use envelope::{ApiResponse, ErrorDetails, FieldError, NoData};
pub use errors::{AppError, ErrorCode};
pub use extractors::{UuidPath, ValidatedJson};
pub use request_id::{ApiFailure, REQUEST_ID_HEADER, RequestId};
pub use server::{
    HealthCheckFuture, HealthResponse, ReadyResponse, ShutdownCoordinator,
    create_production_app, create_router, health_router, run_health_checks,
};
