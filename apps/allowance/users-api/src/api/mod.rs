use axum::Router;
use domain_users::{UserRepository, UserService, handlers};

pub mod health;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix is added by `create_router`.
pub fn routes<R: UserRepository + 'static>(users: UserService<R>) -> Router {
    Router::new().nest("/v1/users", handlers::router(users))
}

/// Router with the `/ready` endpoint, merged next to the stateless app router.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
