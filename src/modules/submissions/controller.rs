use anyhow::anyhow;
use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use eduplatform_core::{AppError, PageParams, Paginated, UploadPolicy};
use eduplatform_models::submissions::{GradeSubmissionDto, Submission, SubmissionAdminView};

use crate::middleware::role::{RequireAdmin, RequireInstructor, RequireStudent};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::submissions::service::SubmissionService;
use crate::state::AppState;
use crate::utils::upload::UploadForm;
use crate::validator::ValidatedJson;

/// Multipart body of a submission, for the API docs.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionUpload {
    pub assignment_id: Uuid,
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// Submit (or resubmit) a file for an assignment
#[utoipa::path(
    post,
    path = "/api/submissions",
    request_body(content = SubmissionUpload, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Submission stored", body = Submission),
        (status = 400, description = "Missing file, rejected file or already graded", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Only students can submit", body = ErrorResponse),
        (status = 404, description = "Assignment not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("x_auth_token" = [])),
    tag = "Submissions"
)]
#[instrument(skip(state, student, multipart))]
pub async fn create_submission(
    State(state): State<AppState>,
    RequireStudent(student): RequireStudent,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Submission>), AppError> {
    let form = UploadForm::read(multipart, "file", UploadPolicy::DOCUMENTS).await?;

    let file = form
        .file
        .as_ref()
        .ok_or_else(|| AppError::bad_request(anyhow!("Please upload a file")))?;

    let assignment_id = form
        .require_text("assignmentId", "assignmentId is required")?
        .parse::<Uuid>()
        .map_err(|_| AppError::bad_request(anyhow!("Invalid assignmentId")))?;

    let submission = SubmissionService::submit(
        &state.db,
        state.storage.as_ref(),
        assignment_id,
        student.user_id()?,
        file,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(submission)))
}

/// The calling student's submissions, newest first
#[utoipa::path(
    get,
    path = "/api/submissions/me",
    params(PageParams),
    responses(
        (status = 200, description = "Page of own submissions", body = Paginated<Submission>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("x_auth_token" = [])),
    tag = "Submissions"
)]
#[instrument(skip(state, student))]
pub async fn my_submissions(
    State(state): State<AppState>,
    RequireStudent(student): RequireStudent,
    Query(params): Query<PageParams>,
) -> Result<Json<Paginated<Submission>>, AppError> {
    let page = SubmissionService::list_for_student(&state.db, student.user_id()?, &params).await?;
    Ok(Json(page))
}

/// Grade a submission of one of the caller's assignments
#[utoipa::path(
    put,
    path = "/api/submissions/{id}/grade",
    params(("id" = Uuid, Path, description = "Submission ID")),
    request_body = GradeSubmissionDto,
    responses(
        (status = 200, description = "Graded submission", body = Submission),
        (status = 400, description = "Invalid marks", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the assignment's instructor", body = ErrorResponse),
        (status = 404, description = "Submission not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("x_auth_token" = [])),
    tag = "Submissions"
)]
#[instrument(skip(state, instructor, dto))]
pub async fn grade_submission(
    State(state): State<AppState>,
    RequireInstructor(instructor): RequireInstructor,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<GradeSubmissionDto>,
) -> Result<Json<Submission>, AppError> {
    let submission = SubmissionService::grade(&state.db, id, instructor.user_id()?, dto).await?;
    Ok(Json(submission))
}

/// Every submission with student name and assignment title (admin)
#[utoipa::path(
    get,
    path = "/api/submissions/all",
    params(PageParams),
    responses(
        (status = 200, description = "Page of submissions", body = Paginated<SubmissionAdminView>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("x_auth_token" = [])),
    tag = "Submissions"
)]
#[instrument(skip(state, _admin))]
pub async fn all_submissions(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(params): Query<PageParams>,
) -> Result<Json<Paginated<SubmissionAdminView>>, AppError> {
    let page = SubmissionService::list_all(&state.db, &params).await?;
    Ok(Json(page))
}
