use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::Duration;
use http::header;

use crate::api::models::{CreateUserRequest, ErrorResponse, LoginRequest, UpdateUserRequest};
use crate::auth::jwt::TokenService;
use crate::core::errors::UserServiceError;
use crate::core::interactors::auth::{AuthInteractor, Token};
use crate::core::interactors::users::{
    CreateUserInput, UpdateUserInput, UserCreateInteractor, UserDeleteInteractor, UserGetInteractor,
    UserGetOutput, UserOutput, UserUpdateInteractor,
};
use crate::repository::UserRepository;
use crate::repository::in_memory::InMemoryUserRepository;

/// One interactor per use-case, all sharing the same repository handle.
/// Built once at startup and cloned into handlers via `State`.
pub struct AppState<R: UserRepository> {
    pub get: UserGetInteractor<R>,
    pub create: UserCreateInteractor<R>,
    pub update: UserUpdateInteractor<R>,
    pub delete: UserDeleteInteractor<R>,
    pub auth: AuthInteractor<R>,
}

impl<R: UserRepository> AppState<R> {
    pub fn new(repository: Arc<R>, tokens: TokenService, token_ttl: Duration) -> Self {
        AppState {
            get: UserGetInteractor::new(repository.clone()),
            create: UserCreateInteractor::new(repository.clone()),
            update: UserUpdateInteractor::new(repository.clone()),
            delete: UserDeleteInteractor::new(repository.clone()),
            auth: AuthInteractor::new(repository, tokens, token_ttl),
        }
    }
}

type Service = Arc<AppState<InMemoryUserRepository>>;

// Newtype wrapper for UserServiceError to implement IntoResponse
pub struct ApiError(UserServiceError);

impl From<UserServiceError> for ApiError {
    fn from(err: UserServiceError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message) = match self.0 {
            UserServiceError::NotFound(detail) => (StatusCode::NOT_FOUND, format!("User not found: {}", detail)),
            // Accepted but unconfirmed: the write landed, the verification
            // read did not. No body, matching the empty-response contract.
            UserServiceError::UnverifiedWrite(_) => {
                return StatusCode::NO_CONTENT.into_response();
            }
            UserServiceError::Duplicate(detail) => {
                (StatusCode::CONFLICT, format!("User or email already exists: {}", detail))
            }
            UserServiceError::Validation(field_error) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Invalid input for {}: {}", field_error.field, field_error.description),
            ),
            UserServiceError::InvalidCredentials => {
                return (
                    StatusCode::UNAUTHORIZED,
                    [(header::WWW_AUTHENTICATE, "Bearer")],
                    Json(ErrorResponse {
                        error: "Incorrect username or password".to_string(),
                    }),
                )
                    .into_response();
            }
            UserServiceError::TokenInvalid(_) | UserServiceError::TokenExpired => {
                return (
                    StatusCode::UNAUTHORIZED,
                    [(header::WWW_AUTHENTICATE, "Bearer")],
                    Json(ErrorResponse {
                        error: "Could not validate credentials".to_string(),
                    }),
                )
                    .into_response();
            }
            UserServiceError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal server error: {}", msg),
            ),
        };
        (status, Json(ErrorResponse { error: error_message })).into_response()
    }
}

// Define API routes
pub fn api_routes(service: Service) -> Router {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/me", get(current_user))
        .route("/users/{id}", get(get_user).put(update_user).delete(delete_user))
        .route("/login", axum::routing::post(login))
        .with_state(service)
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "All users", body = Vec<UserOutput>),
        (status = 404, description = "No users exist", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn list_users(State(service): State<Service>) -> Result<Json<Vec<UserOutput>>, ApiError> {
    match service.get.handle(None).await? {
        UserGetOutput::Many(users) => Ok(Json(users)),
        UserGetOutput::One(_) => Err(ApiError(UserServiceError::Internal(
            "unexpected single-user result for list request".to_string(),
        ))),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User id, >= 1")),
    responses(
        (status = 200, description = "The user", body = UserOutput),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Invalid id", body = ErrorResponse)
    )
)]
pub(crate) async fn get_user(State(service): State<Service>, Path(id): Path<i64>) -> Result<Json<UserOutput>, ApiError> {
    match service.get.handle(Some(id)).await? {
        UserGetOutput::One(user) => Ok(Json(user)),
        UserGetOutput::Many(_) => Err(ApiError(UserServiceError::Internal(
            "unexpected list result for single-user request".to_string(),
        ))),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "User the bearer token was issued for", body = UserOutput),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse)
    )
)]
pub(crate) async fn current_user(
    State(service): State<Service>,
    headers: http::HeaderMap,
) -> Result<Json<UserOutput>, ApiError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| UserServiceError::TokenInvalid("missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| UserServiceError::TokenInvalid("invalid Authorization header".to_string()))?;

    let subject = service.auth.resolve_subject(token)?;
    let id: i64 = subject
        .parse()
        .map_err(|_| UserServiceError::TokenInvalid(format!("malformed subject: {}", subject)))?;

    match service.get.handle(Some(id)).await {
        Ok(UserGetOutput::One(user)) => Ok(Json(user)),
        // The token may outlive its account; a missing subject is an auth
        // failure here, not a 404.
        Err(UserServiceError::NotFound(_)) => {
            Err(ApiError(UserServiceError::TokenInvalid("unknown subject".to_string())))
        }
        Err(e) => Err(ApiError(e)),
        Ok(UserGetOutput::Many(_)) => Err(ApiError(UserServiceError::Internal(
            "unexpected list result for single-user request".to_string(),
        ))),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserOutput),
        (status = 204, description = "User created, but data fetch failed"),
        (status = 409, description = "Name or email already exists", body = ErrorResponse),
        (status = 422, description = "Invalid field", body = ErrorResponse)
    )
)]
pub(crate) async fn create_user(
    State(service): State<Service>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserOutput>), ApiError> {
    let user = service
        .create
        .handle(CreateUserInput {
            name: req.name,
            password: req.password,
            email: req.email,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User id, >= 1")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserOutput),
        (status = 204, description = "User updated, but data fetch failed"),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Name or email already exists", body = ErrorResponse),
        (status = 422, description = "Invalid or empty change-set", body = ErrorResponse)
    )
)]
pub(crate) async fn update_user(
    State(service): State<Service>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserOutput>, ApiError> {
    let user = service
        .update
        .handle(
            id,
            UpdateUserInput {
                name: req.name,
                password: req.password,
                email: req.email,
            },
        )
        .await?;
    Ok(Json(user))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User id, >= 1")),
    responses(
        (status = 200, description = "Pre-deletion snapshot", body = UserOutput),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub(crate) async fn delete_user(State(service): State<Service>, Path(id): Path<i64>) -> Result<Json<UserOutput>, ApiError> {
    let user = service.delete.handle(id).await?;
    Ok(Json(user))
}

#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = Token),
        (status = 401, description = "Incorrect username or password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn login(State(service): State<Service>, Json(req): Json<LoginRequest>) -> Result<Json<Token>, ApiError> {
    let token = service.auth.handle(&req.username, &req.password).await?;
    Ok(Json(token))
}
