use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    ApiFailure, ApiResponse, AppError, NoData, RequestId, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::models::{CreateUserRequest, Role, UpdateUserRequest, UserDto, UserProfileDto};
use crate::repository::UserRepository;
use crate::service::UserService;

pub const USERS_TAG: &str = "users";

/// Public prefix the router is mounted under, used for `Location`.
pub const USERS_BASE_PATH: &str = "/api/v1/users";

/// OpenAPI documentation for the Users API
#[derive(OpenApi)]
#[openapi(
    paths(get_user, create_user, update_user, get_children, delete_user),
    components(
        schemas(UserDto, UserProfileDto, Role, CreateUserRequest, UpdateUserRequest, NoData),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = USERS_TAG, description = "Household parents and children")
    )
)]
pub struct ApiDoc;

type SharedService<R> = State<Arc<UserService<R>>>;

/// Create the users router. Mounted by the app at `/api/v1/users`.
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", post(create_user))
        .route(
            "/{userId}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/parent/{parentId}/children", get(get_children))
        .with_state(shared_service)
}

/// Get an active user with profile, parent and children
#[utoipa::path(
    get,
    path = "/{userId}",
    tag = USERS_TAG,
    params(
        ("userId" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User retrieved", body = ApiResponse<UserDto>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user<R: UserRepository>(
    request_id: RequestId,
    State(service): SharedService<R>,
    UuidPath(id): UuidPath,
) -> Result<impl IntoResponse, ApiFailure> {
    let user = service
        .get_user(id)
        .await
        .map_err(|e| request_id.fail(e))?
        .ok_or_else(|| request_id.fail(AppError::NotFound("User not found".to_string())))?;

    Ok(request_id.respond("User retrieved", user))
}

/// Create a parent or child
#[utoipa::path(
    post,
    path = "",
    tag = USERS_TAG,
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserDto>,
            headers(("Location" = String, description = "URL of the new user"))),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_user<R: UserRepository>(
    request_id: RequestId,
    State(service): SharedService<R>,
    ValidatedJson(input): ValidatedJson<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiFailure> {
    let user = service
        .create_user(input)
        .await
        .map_err(|e| request_id.fail(e))?;

    let location = format!("{}/{}", USERS_BASE_PATH, user.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        request_id.respond("User created", user),
    ))
}

/// Update name, email and birth date
#[utoipa::path(
    put,
    path = "/{userId}",
    tag = USERS_TAG,
    params(
        ("userId" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserDto>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_user<R: UserRepository>(
    request_id: RequestId,
    State(service): SharedService<R>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiFailure> {
    let user = service
        .update_user(id, input)
        .await
        .map_err(|e| request_id.fail(e))?;

    Ok(request_id.respond("User updated", user))
}

/// Active children of a parent, ordered by name
#[utoipa::path(
    get,
    path = "/parent/{parentId}/children",
    tag = USERS_TAG,
    params(
        ("parentId" = Uuid, Path, description = "Parent user ID")
    ),
    responses(
        (status = 200, description = "Children retrieved", body = ApiResponse<Vec<UserDto>>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_children<R: UserRepository>(
    request_id: RequestId,
    State(service): SharedService<R>,
    UuidPath(parent_id): UuidPath,
) -> Result<impl IntoResponse, ApiFailure> {
    let children = service
        .get_children(parent_id)
        .await
        .map_err(|e| request_id.fail(e))?;

    Ok(request_id.respond("Children retrieved", children))
}

/// Deactivate a user
#[utoipa::path(
    delete,
    path = "/{userId}",
    tag = USERS_TAG,
    params(
        ("userId" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = ApiResponse<NoData>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_user<R: UserRepository>(
    request_id: RequestId,
    State(service): SharedService<R>,
    UuidPath(id): UuidPath,
) -> Result<impl IntoResponse, ApiFailure> {
    service
        .delete_user(id)
        .await
        .map_err(|e| request_id.fail(e))?;

    Ok(request_id.respond_empty("User deleted"))
}
