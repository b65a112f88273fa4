use anyhow::{Context, anyhow};
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use eduplatform_auth::Role;
use eduplatform_core::{AppError, FileStorage, PageParams, Paginated};
use eduplatform_models::assignments::{
    Assignment, AssignmentAdminRow, AssignmentAdminView, AssignmentInstructorRow,
    AssignmentWithInstructor,
};
use eduplatform_models::submissions::{SubmissionStudentRow, SubmissionWithStudent};

use crate::metrics::track_assignment_created;
use crate::middleware::auth::AuthUser;
use crate::utils::upload::{UploadedFile, timestamped_key};

const ASSIGNMENT_COLUMNS: &str =
    "a.id, a.title, a.description, a.due_date, a.instructor_id, a.attachment_url, a.created_at";

const SUBMISSION_COLUMNS: &str = "s.id, s.assignment_id, s.student_id, s.file_path, s.status, \
     s.marks, s.feedback, s.submitted_at, s.graded_at";

/// Validated input for a new assignment.
#[derive(Debug)]
pub struct NewAssignment {
    pub title: String,
    pub description: String,
    pub due_date: chrono::DateTime<chrono::Utc>,
    pub attachment: Option<UploadedFile>,
}

pub struct AssignmentService;

impl AssignmentService {
    #[instrument(skip(db, storage, input), fields(title = %input.title))]
    pub async fn create_assignment(
        db: &PgPool,
        storage: &dyn FileStorage,
        instructor_id: Uuid,
        input: NewAssignment,
    ) -> Result<Assignment, AppError> {
        let stored_key = match &input.attachment {
            Some(file) => {
                let key = timestamped_key("assignments", &file.file_name);
                Some(file.store(storage, &key, "assignment").await?)
            }
            None => None,
        };

        let attachment_url = stored_key
            .as_deref()
            .map(|key| storage.public_path(key))
            .transpose()?;

        let inserted = sqlx::query_as::<_, Assignment>(
            "INSERT INTO assignments (title, description, due_date, instructor_id, attachment_url)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, title, description, due_date, instructor_id, attachment_url, created_at",
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.due_date)
        .bind(instructor_id)
        .bind(&attachment_url)
        .fetch_one(db)
        .await
        .context("Failed to insert assignment")
        .map_err(AppError::database);

        let assignment = match inserted {
            Ok(assignment) => assignment,
            Err(err) => {
                if let Some(key) = stored_key.as_deref() {
                    if let Err(e) = storage.delete(key).await {
                        warn!(%key, error = %e, "Failed to remove orphaned attachment");
                    }
                }
                return Err(err);
            }
        };

        info!(assignment_id = %assignment.id, %instructor_id, "Assignment created");
        track_assignment_created();

        Ok(assignment)
    }

    /// Every assignment, soonest due first.
    #[instrument(skip(db))]
    pub async fn list_assignments(
        db: &PgPool,
        params: &PageParams,
    ) -> Result<Paginated<AssignmentWithInstructor>, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM assignments")
            .fetch_one(db)
            .await
            .context("Failed to count assignments")
            .map_err(AppError::database)?;

        let rows = sqlx::query_as::<_, AssignmentInstructorRow>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS}, u.name AS instructor_name
             FROM assignments a
             JOIN users u ON u.id = a.instructor_id
             ORDER BY a.due_date ASC, a.id ASC
             LIMIT $1 OFFSET $2"
        ))
        .bind(params.page_size())
        .bind(params.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch assignments")
        .map_err(AppError::database)?;

        let items = rows.into_iter().map(Into::into).collect();
        Ok(Paginated::new(items, params, total))
    }

    #[instrument(skip(db))]
    pub async fn list_for_instructor(
        db: &PgPool,
        instructor_id: Uuid,
    ) -> Result<Vec<Assignment>, AppError> {
        sqlx::query_as::<_, Assignment>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM assignments a
             WHERE a.instructor_id = $1
             ORDER BY a.created_at DESC"
        ))
        .bind(instructor_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch instructor assignments")
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn list_all_with_counts(db: &PgPool) -> Result<Vec<AssignmentAdminView>, AppError> {
        let rows = sqlx::query_as::<_, AssignmentAdminRow>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS}, u.name AS instructor_name,
                    COUNT(s.id) AS submission_count
             FROM assignments a
             JOIN users u ON u.id = a.instructor_id
             LEFT JOIN submissions s ON s.assignment_id = a.id
             GROUP BY a.id, u.name
             ORDER BY a.created_at DESC"
        ))
        .fetch_all(db)
        .await
        .context("Failed to fetch assignments with submission counts")
        .map_err(AppError::database)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Submissions for one assignment, visible to admins and the owning
    /// instructor.
    #[instrument(skip(db, viewer))]
    pub async fn submissions_for_assignment(
        db: &PgPool,
        assignment_id: Uuid,
        viewer: &AuthUser,
    ) -> Result<Vec<SubmissionWithStudent>, AppError> {
        let owner = sqlx::query_scalar::<_, Uuid>(
            "SELECT instructor_id FROM assignments WHERE id = $1",
        )
        .bind(assignment_id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch assignment owner")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("Assignment not found")))?;

        let permitted = match viewer.role() {
            Role::Admin => true,
            Role::Instructor => viewer.user_id()? == owner,
            Role::Student => false,
        };
        if !permitted {
            return Err(AppError::forbidden(
                "User not authorized to view these submissions",
            ));
        }

        let rows = sqlx::query_as::<_, SubmissionStudentRow>(&format!(
            "SELECT {SUBMISSION_COLUMNS}, u.name AS student_name, u.email AS student_email
             FROM submissions s
             JOIN users u ON u.id = s.student_id
             WHERE s.assignment_id = $1
             ORDER BY s.submitted_at ASC"
        ))
        .bind(assignment_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch submissions for assignment")
        .map_err(AppError::database)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
