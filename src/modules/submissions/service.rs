use anyhow::{Context, anyhow};
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use eduplatform_core::{AppError, FileStorage, PageParams, Paginated};
use eduplatform_models::submissions::{
    GradeSubmissionDto, Submission, SubmissionAdminRow, SubmissionAdminView, SubmissionStatus,
};

use crate::metrics::{track_submission_graded, track_submission_received};
use crate::utils::upload::{UploadedFile, timestamped_key};

pub const ALREADY_GRADED: &str =
    "This assignment has already been graded. Resubmission is not allowed.";

const SUBMISSION_COLUMNS: &str = "id, assignment_id, student_id, file_path, status, marks, \
     feedback, submitted_at, graded_at";

#[derive(Debug, sqlx::FromRow)]
struct ExistingSubmission {
    file_path: String,
    status: SubmissionStatus,
}

pub struct SubmissionService;

impl SubmissionService {
    /// Stores the file and creates or replaces the student's submission.
    ///
    /// An ungraded submission is replaced (status back to SUBMITTED, marks
    /// and feedback cleared). A graded one is never touched: the upsert's
    /// `WHERE` guard makes that check atomic with the write.
    #[instrument(skip(db, storage, file), fields(file_name = %file.file_name))]
    pub async fn submit(
        db: &PgPool,
        storage: &dyn FileStorage,
        assignment_id: Uuid,
        student_id: Uuid,
        file: &UploadedFile,
    ) -> Result<Submission, AppError> {
        let assignment_exists =
            sqlx::query_scalar::<_, Uuid>("SELECT id FROM assignments WHERE id = $1")
                .bind(assignment_id)
                .fetch_optional(db)
                .await
                .context("Failed to look up assignment")
                .map_err(AppError::database)?
                .is_some();

        if !assignment_exists {
            return Err(AppError::not_found(anyhow!("Assignment not found")));
        }

        let existing = sqlx::query_as::<_, ExistingSubmission>(
            "SELECT file_path, status FROM submissions
             WHERE assignment_id = $1 AND student_id = $2",
        )
        .bind(assignment_id)
        .bind(student_id)
        .fetch_optional(db)
        .await
        .context("Failed to look up existing submission")
        .map_err(AppError::database)?;

        if existing
            .as_ref()
            .is_some_and(|s| s.status == SubmissionStatus::Graded)
        {
            return Err(AppError::bad_request(anyhow!(ALREADY_GRADED)));
        }

        let key = timestamped_key("submissions", &file.file_name);
        let key = file.store(storage, &key, "submission").await?;

        let upserted = sqlx::query_as::<_, Submission>(&format!(
            "INSERT INTO submissions (assignment_id, student_id, file_path)
             VALUES ($1, $2, $3)
             ON CONFLICT (assignment_id, student_id) DO UPDATE
                SET file_path = EXCLUDED.file_path,
                    status = 'SUBMITTED',
                    marks = NULL,
                    feedback = NULL,
                    graded_at = NULL,
                    submitted_at = NOW()
                WHERE submissions.status <> 'GRADED'
             RETURNING {SUBMISSION_COLUMNS}"
        ))
        .bind(assignment_id)
        .bind(student_id)
        .bind(&key)
        .fetch_optional(db)
        .await
        .context("Failed to upsert submission")
        .map_err(AppError::database);

        let submission = match upserted {
            Ok(Some(submission)) => submission,
            Ok(None) => {
                // graded between the check and the write
                Self::discard_file(storage, &key).await;
                return Err(AppError::bad_request(anyhow!(ALREADY_GRADED)));
            }
            Err(err) => {
                Self::discard_file(storage, &key).await;
                return Err(err);
            }
        };

        let resubmission = existing.is_some();
        if let Some(previous) = existing.filter(|s| s.file_path != key) {
            Self::discard_file(storage, &previous.file_path).await;
        }

        info!(
            submission_id = %submission.id,
            %assignment_id,
            %student_id,
            resubmission,
            "Submission received"
        );
        track_submission_received(resubmission);

        Ok(submission)
    }

    async fn discard_file(storage: &dyn FileStorage, key: &str) {
        if let Err(e) = storage.delete(key).await {
            warn!(%key, error = %e, "Failed to remove submission file");
        }
    }

    #[instrument(skip(db))]
    pub async fn list_for_student(
        db: &PgPool,
        student_id: Uuid,
        params: &PageParams,
    ) -> Result<Paginated<Submission>, AppError> {
        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM submissions WHERE student_id = $1")
                .bind(student_id)
                .fetch_one(db)
                .await
                .context("Failed to count student submissions")
                .map_err(AppError::database)?;

        let items = sqlx::query_as::<_, Submission>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions
             WHERE student_id = $1
             ORDER BY submitted_at DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(student_id)
        .bind(params.page_size())
        .bind(params.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch student submissions")
        .map_err(AppError::database)?;

        Ok(Paginated::new(items, params, total))
    }

    /// Grades a submission of one of the instructor's own assignments.
    #[instrument(skip(db, dto))]
    pub async fn grade(
        db: &PgPool,
        submission_id: Uuid,
        instructor_id: Uuid,
        dto: GradeSubmissionDto,
    ) -> Result<Submission, AppError> {
        let owner = sqlx::query_scalar::<_, Uuid>(
            "SELECT a.instructor_id FROM submissions s
             JOIN assignments a ON a.id = s.assignment_id
             WHERE s.id = $1",
        )
        .bind(submission_id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch submission")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("Submission not found")))?;

        if owner != instructor_id {
            return Err(AppError::forbidden(
                "You are not authorized to grade this submission",
            ));
        }

        let submission = sqlx::query_as::<_, Submission>(&format!(
            "UPDATE submissions
             SET marks = $1, feedback = $2, status = 'GRADED', graded_at = NOW()
             WHERE id = $3
             RETURNING {SUBMISSION_COLUMNS}"
        ))
        .bind(dto.marks)
        .bind(&dto.feedback)
        .bind(submission_id)
        .fetch_optional(db)
        .await
        .context("Failed to grade submission")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("Submission not found")))?;

        info!(%submission_id, marks = dto.marks, "Submission graded");
        track_submission_graded();

        Ok(submission)
    }

    #[instrument(skip(db))]
    pub async fn list_all(
        db: &PgPool,
        params: &PageParams,
    ) -> Result<Paginated<SubmissionAdminView>, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM submissions")
            .fetch_one(db)
            .await
            .context("Failed to count submissions")
            .map_err(AppError::database)?;

        let rows = sqlx::query_as::<_, SubmissionAdminRow>(
            "SELECT s.id, s.assignment_id, s.student_id, s.file_path, s.status, s.marks,
                    s.feedback, s.submitted_at, s.graded_at,
                    u.name AS student_name, a.title AS assignment_title
             FROM submissions s
             JOIN users u ON u.id = s.student_id
             JOIN assignments a ON a.id = s.assignment_id
             ORDER BY s.submitted_at DESC
             LIMIT $1 OFFSET $2",
        )
        .bind(params.page_size())
        .bind(params.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch submissions")
        .map_err(AppError::database)?;

        let items = rows.into_iter().map(Into::into).collect();
        Ok(Paginated::new(items, params, total))
    }
}
