use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User ID '{0}' not found")]
    NotFound(Uuid),

    #[error("Email '{0}' is already in use")]
    DuplicateEmail(String),

    #[error("Invalid parent user specified")]
    InvalidParent,

    #[error("ParentId cannot be set for parent users")]
    ParentIdNotAllowed,

    #[error("ParentId is required for child users")]
    ParentIdRequired,

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl UserError {
    /// Business-rule failures the caller can fix by changing the request.
    pub fn is_rule_violation(&self) -> bool {
        matches!(
            self,
            Self::DuplicateEmail(_)
                | Self::InvalidParent
                | Self::ParentIdNotAllowed
                | Self::ParentIdRequired
                | Self::Validation(_)
        )
    }
}

/// Single catch point between the domain and HTTP.
impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => AppError::NotFound(err.to_string()),
            e if e.is_rule_violation() => AppError::BadRequest(e.to_string()),
            UserError::Database(e) => AppError::InternalServerError(format!("Database error: {}", e)),
            other => AppError::InternalServerError(other.to_string()),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
