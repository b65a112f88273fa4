use anyhow::anyhow;
use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use eduplatform_core::{AppError, PageParams, Paginated, UploadPolicy};
use eduplatform_models::assignments::{
    Assignment, AssignmentAdminView, AssignmentWithInstructor, CreateAssignmentForm,
    parse_due_date,
};
use eduplatform_models::submissions::SubmissionWithStudent;

use crate::middleware::role::{
    RequireAdmin, RequireAnyRole, RequireInstructor, RequireInstructorOrAdmin,
};
use crate::modules::assignments::service::{AssignmentService, NewAssignment};
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::upload::UploadForm;
use crate::validator::validate_form;

/// Create an assignment with an optional attachment
#[utoipa::path(
    post,
    path = "/api/assignments",
    request_body(content = CreateAssignmentForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Assignment created", body = Assignment),
        (status = 400, description = "Missing fields, bad date or rejected attachment", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Only instructors can create assignments", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("x_auth_token" = [])),
    tag = "Assignments"
)]
#[instrument(skip(state, instructor, multipart))]
pub async fn create_assignment(
    State(state): State<AppState>,
    RequireInstructor(instructor): RequireInstructor,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Assignment>), AppError> {
    let mut form = UploadForm::read(multipart, "attachment", UploadPolicy::DOCUMENTS).await?;

    let fields = CreateAssignmentForm {
        title: form.text("title").unwrap_or_default().to_string(),
        description: form.text("description").unwrap_or_default().to_string(),
        due_date: form.text("dueDate").unwrap_or_default().to_string(),
    };
    validate_form(&fields)?;

    let due_date = parse_due_date(&fields.due_date)
        .ok_or_else(|| AppError::bad_request(anyhow!("dueDate must be a valid date")))?;

    let input = NewAssignment {
        title: fields.title,
        description: fields.description,
        due_date,
        attachment: form.file.take(),
    };

    let assignment = AssignmentService::create_assignment(
        &state.db,
        state.storage.as_ref(),
        instructor.user_id()?,
        input,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(assignment)))
}

/// Paginated assignments ordered by due date
#[utoipa::path(
    get,
    path = "/api/assignments",
    params(PageParams),
    responses(
        (status = 200, description = "Page of assignments", body = Paginated<AssignmentWithInstructor>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("x_auth_token" = [])),
    tag = "Assignments"
)]
#[instrument(skip(state, _user))]
pub async fn list_assignments(
    State(state): State<AppState>,
    _user: RequireAnyRole,
    Query(params): Query<PageParams>,
) -> Result<Json<Paginated<AssignmentWithInstructor>>, AppError> {
    let page = AssignmentService::list_assignments(&state.db, &params).await?;
    Ok(Json(page))
}

/// Assignments created by the calling instructor
#[utoipa::path(
    get,
    path = "/api/assignments/my-assignments",
    responses(
        (status = 200, description = "Own assignments, newest first", body = Vec<Assignment>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("x_auth_token" = [])),
    tag = "Assignments"
)]
#[instrument(skip(state, instructor))]
pub async fn my_assignments(
    State(state): State<AppState>,
    RequireInstructor(instructor): RequireInstructor,
) -> Result<Json<Vec<Assignment>>, AppError> {
    let assignments =
        AssignmentService::list_for_instructor(&state.db, instructor.user_id()?).await?;
    Ok(Json(assignments))
}

/// Every assignment with its instructor and submission count (admin)
#[utoipa::path(
    get,
    path = "/api/assignments/all",
    responses(
        (status = 200, description = "All assignments, newest first", body = Vec<AssignmentAdminView>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("x_auth_token" = [])),
    tag = "Assignments"
)]
#[instrument(skip(state, _admin))]
pub async fn all_assignments(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<Vec<AssignmentAdminView>>, AppError> {
    let assignments = AssignmentService::list_all_with_counts(&state.db).await?;
    Ok(Json(assignments))
}

/// Submissions received for an assignment
#[utoipa::path(
    get,
    path = "/api/assignments/{id}/submissions",
    params(("id" = Uuid, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Submissions, oldest first", body = Vec<SubmissionWithStudent>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the owning instructor", body = ErrorResponse),
        (status = 404, description = "Assignment not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("x_auth_token" = [])),
    tag = "Assignments"
)]
#[instrument(skip(state, viewer))]
pub async fn assignment_submissions(
    State(state): State<AppState>,
    RequireInstructorOrAdmin(viewer): RequireInstructorOrAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<SubmissionWithStudent>>, AppError> {
    let submissions =
        AssignmentService::submissions_for_assignment(&state.db, id, &viewer).await?;
    Ok(Json(submissions))
}
