//! JSON extractor with validation through the `validator` crate.

use crate::errors::AppError;
use crate::request_id::{ApiFailure, RequestId};
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body that has passed `Validate::validate`.
///
/// Parse failures and rule violations are both rejected with
/// `400 VALIDATION_ERROR`; rule violations list the offending fields in
/// `error.details`.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct CreateUser {
///     #[validate(length(min = 1, max = 100))]
///     name: String,
///     #[validate(email)]
///     email: String,
/// }
///
/// async fn create_user(ValidatedJson(payload): ValidatedJson<CreateUser>) -> String {
///     format!("Creating user: {}", payload.name)
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiFailure;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();
        let request_id = RequestId::from_parts(&mut parts);
        let req = Request::from_parts(parts, body);

        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| request_id.fail(e))?;

        data.validate().map_err(|e| request_id.fail(e))?;

        Ok(ValidatedJson(data))
    }
}
