//! HTTP middleware: CORS, security headers and the timeout/panic guard.

pub mod cors;
pub mod guard;
pub mod security;

pub use cors::{
    CORS_ALLOWED_ORIGIN, cors_layer_for, create_cors_layer, create_permissive_cors_layer,
};
pub use guard::request_guard;
pub use security::security_headers;
