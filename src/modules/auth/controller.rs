use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use eduplatform_core::AppError;
use eduplatform_models::auth::{AuthResponse, CurrentUser, LoginDto, RegisterDto};

use crate::middleware::auth::AuthUser;
use crate::modules::auth::service::AuthService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Body of every error response.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

/// Register a student or instructor account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterDto,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid data, duplicate email or bad instructorId", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterDto>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let response = AuthService::register(&state.db, &state.jwt_config, dto).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Missing fields", body = ErrorResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginDto>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = AuthService::login(&state.db, &state.jwt_config, dto).await?;
    Ok(Json(response))
}

/// Explains how to log in when the endpoint is opened in a browser
#[utoipa::path(
    get,
    path = "/api/auth/login",
    responses(
        (status = 405, description = "Login requires POST", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn login_usage() -> AppError {
    AppError::method_not_allowed(
        "Use POST /api/auth/login with { email, password } to authenticate.",
    )
}

/// Profile of the authenticated user
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = CurrentUser),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse),
        (status = 404, description = "User no longer exists", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = []),
        ("x_auth_token" = [])
    ),
    tag = "Authentication"
)]
#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<CurrentUser>, AppError> {
    let user = AuthService::current_user(&state.db, auth_user.user_id()?).await?;
    Ok(Json(user))
}
