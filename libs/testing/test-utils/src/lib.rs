//! Fixtures shared by the allowance test suites.
//!
//! - [`TestDatabase`]: throwaway migrated Postgres container (feature `postgres`)
//! - [`TestDataBuilder`]: per-test household data that never collides across tests
//! - [`assertions`]: panicking helpers with contextual messages
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn creates_a_parent() {
//!     let db = TestDatabase::new().await;
//!     let data = TestDataBuilder::from_test_name("creates_a_parent");
//!     let email = data.email("parent");
//! }
//! ```

pub mod assertions;
mod data;

#[cfg(feature = "postgres")]
mod postgres;

pub use data::TestDataBuilder;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;
