use axum_helpers::{HealthResponse, ReadyResponse};
use domain_users::handlers::USERS_BASE_PATH;
use utoipa::OpenApi;

/// Combined OpenAPI document served at `/api-docs/openapi.json`
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Allowance Users API",
        description = "Parents and children of a household"
    ),
    paths(crate::api::health::ready_handler),
    components(schemas(HealthResponse, ReadyResponse)),
    nest(
        (path = USERS_BASE_PATH, api = domain_users::ApiDoc)
    ),
    tags(
        (name = "health", description = "Liveness and readiness checks")
    )
)]
pub struct ApiDoc;
