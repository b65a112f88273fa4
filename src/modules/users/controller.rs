use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;
use uuid::Uuid;

use eduplatform_core::AppError;
use eduplatform_models::MessageResponse;
use eduplatform_models::users::{
    AdminResetPasswordDto, ChangePasswordDto, InstructorSummary, PasswordResetResponse,
    StudentSummary, UserSummary,
};

use crate::middleware::auth::AuthUser;
use crate::middleware::role::{RequireAdmin, RequireInstructor};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// List every user (admin)
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All users, newest first", body = Vec<UserSummary>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("x_auth_token" = [])),
    tag = "Users"
)]
#[instrument(skip(state, _admin))]
pub async fn list_users(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    let users = UserService::list_users(&state.db).await?;
    Ok(Json(users))
}

/// Instructors a student can pick when registering
#[utoipa::path(
    get,
    path = "/api/users/instructors",
    responses(
        (status = 200, description = "Instructors ordered by name", body = Vec<InstructorSummary>)
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn list_instructors(
    State(state): State<AppState>,
) -> Result<Json<Vec<InstructorSummary>>, AppError> {
    let instructors = UserService::list_instructors(&state.db).await?;
    Ok(Json(instructors))
}

/// Students mapped to the calling instructor
#[utoipa::path(
    get,
    path = "/api/users/students",
    responses(
        (status = 200, description = "Students of the caller", body = Vec<StudentSummary>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("x_auth_token" = [])),
    tag = "Users"
)]
#[instrument(skip(state, instructor))]
pub async fn list_my_students(
    State(state): State<AppState>,
    RequireInstructor(instructor): RequireInstructor,
) -> Result<Json<Vec<StudentSummary>>, AppError> {
    let students = UserService::list_students_of(&state.db, instructor.user_id()?).await?;
    Ok(Json(students))
}

/// Set a new password for any user (admin)
#[utoipa::path(
    post,
    path = "/api/users/{id}/reset-password",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = AdminResetPasswordDto,
    responses(
        (status = 200, description = "Password reset", body = PasswordResetResponse),
        (status = 400, description = "Password too short", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("x_auth_token" = [])),
    tag = "Users"
)]
#[instrument(skip(state, _admin, dto))]
pub async fn reset_password(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<AdminResetPasswordDto>,
) -> Result<Json<PasswordResetResponse>, AppError> {
    let id = UserService::reset_password(&state.db, id, &dto.new_password).await?;
    Ok(Json(PasswordResetResponse {
        message: "Password reset".to_string(),
        id,
    }))
}

/// Change the caller's own password
#[utoipa::path(
    post,
    path = "/api/users/change-password",
    request_body = ChangePasswordDto,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Wrong current password or weak new password", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("x_auth_token" = [])),
    tag = "Users"
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<ChangePasswordDto>,
) -> Result<Json<MessageResponse>, AppError> {
    UserService::change_password(
        &state.db,
        auth_user.user_id()?,
        &dto.current_password,
        &dto.new_password,
    )
    .await?;
    Ok(Json(MessageResponse::new("Password changed")))
}
