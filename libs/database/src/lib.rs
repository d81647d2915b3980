//! Database connectivity for the users service.
//!
//! # Features
//!
//! - `postgres` (default): PostgreSQL through SeaORM, migrations runner, health check
//! - `config`: `core_config::FromEnv` for [`postgres::PostgresConfig`] and [`common::RetryConfig`]
//!
//! # Example
//!
//! ```ignore
//! use database::common::RetryConfig;
//! use database::postgres::{self, PostgresConfig};
//! use migration::Migrator;
//!
//! let db = postgres::connect(&PostgresConfig::from_env()?, RetryConfig::from_env()?).await?;
//! postgres::run_migrations::<Migrator>(&db, "users_api").await?;
//! postgres::check_health(&db).await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult};
