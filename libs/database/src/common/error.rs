use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Driver-level failure surfaced by SeaORM
    #[cfg(feature = "postgres")]
    #[error(transparent)]
    Orm(#[from] sea_orm::DbErr),

    /// The readiness check could not reach the database
    #[error("Database unreachable: {0}")]
    Unreachable(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
