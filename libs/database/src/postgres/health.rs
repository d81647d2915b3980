use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use std::time::Instant;
use tracing::debug;

use crate::common::DatabaseError;

/// Round-trips a trivial query through the pool. Backs `/ready`.
pub async fn check_health(db: &DatabaseConnection) -> Result<(), DatabaseError> {
    let started = Instant::now();
    let ping = Statement::from_string(db.get_database_backend(), "SELECT 1");

    db.query_one_raw(ping)
        .await
        .map_err(|e| DatabaseError::Unreachable(e.to_string()))?;

    debug!(latency_ms = started.elapsed().as_millis() as u64, "Database ping ok");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, Value};
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_ping_ok_when_row_comes_back() {
        let row: BTreeMap<&str, Value> = BTreeMap::from([("?column?", 1i32.into())]);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row]])
            .into_connection();

        assert!(check_health(&db).await.is_ok());
    }

    #[tokio::test]
    async fn test_ping_failure_is_unreachable() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset by peer".to_string())])
            .into_connection();

        let err = check_health(&db).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Unreachable(ref reason) if reason.contains("connection reset")));
        assert!(err.to_string().starts_with("Database unreachable"));
    }
}
