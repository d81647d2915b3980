//! Household users: parents and their children.
//!
//! Requests flow `handlers` -> [`UserService`] -> [`UserRepository`]. The
//! service owns the email and parent/child rules; repositories own storage
//! and enforce email uniqueness among active users themselves, so a lost
//! race still surfaces as [`UserError::DuplicateEmail`].
//!
//! Two repositories ship: [`InMemoryUserRepository`] for tests and local
//! runs, and [`PgUserRepository`] backed by the `users` and
//! `user_profiles` tables.
//!
//! ```rust,no_run
//! use domain_users::{InMemoryUserRepository, UserService, handlers};
//!
//! let service = UserService::new(InMemoryUserRepository::new());
//! let router: axum::Router = axum::Router::new().nest("/v1/users", handlers::router(service));
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use models::{
    CreateUserRequest, NewUser, Role, UpdateUserRequest, UpsertProfile, User, UserDto,
    UserProfile, UserProfileDto,
};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
