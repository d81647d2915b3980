use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use super::PostgresConfig;
use crate::common::{RetryConfig, retry_with_backoff};

/// Opens a pool for `config`, retrying refused connections per `retry`.
///
/// ```ignore
/// use database::common::RetryConfig;
/// use database::postgres::{PostgresConfig, connect};
///
/// let db = connect(&PostgresConfig::new("postgresql://allowance@localhost/allowance"), RetryConfig::default()).await?;
/// ```
pub async fn connect(config: &PostgresConfig, retry: RetryConfig) -> Result<DatabaseConnection, DbErr> {
    let options = config.connect_options();

    let db = retry_with_backoff(|| Database::connect(options.clone()), retry).await?;
    info!(max_connections = config.max_connections, "PostgreSQL pool ready");
    Ok(db)
}

/// Applies every pending migration of `M`, logging under `app_name`.
pub async fn run_migrations<M: MigratorTrait>(
    db: &DatabaseConnection,
    app_name: &str,
) -> Result<(), DbErr> {
    info!(app = app_name, "Applying database migrations");
    M::up(db, None).await?;
    info!(app = app_name, "Schema up to date");
    Ok(())
}
