//! UUID path parameter extractor.

use crate::errors::AppError;
use crate::request_id::{ApiFailure, RequestId};
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use uuid::Uuid;

/// Single UUID path parameter.
///
/// A malformed value is rejected with `400 INVALID_UUID` in envelope form.
///
/// ```ignore
/// async fn get_user(UuidPath(id): UuidPath) -> String {
///     format!("User ID: {}", id)
/// }
///
/// let app = Router::new().route("/users/{id}", get(get_user));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UuidPath(pub Uuid);

impl<S> FromRequestParts<S> for UuidPath
where
    S: Send + Sync,
{
    type Rejection = ApiFailure;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let request_id = RequestId::from_parts(parts);

        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| request_id.fail(AppError::BadRequest(e.body_text())))?;

        Uuid::parse_str(&raw)
            .map(UuidPath)
            .map_err(|_| request_id.fail(AppError::InvalidUuid(raw)))
    }
}
