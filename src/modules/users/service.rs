use anyhow::{Context, anyhow};
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use eduplatform_core::{AppError, hash_password, verify_password};
use eduplatform_models::users::{InstructorSummary, StudentSummary, UserSummary};

/// Shortest password accepted by the change and reset flows.
pub const MIN_PASSWORD_LEN: usize = 6;

pub struct UserService;

impl UserService {
    #[instrument(skip(db))]
    pub async fn list_users(db: &PgPool) -> Result<Vec<UserSummary>, AppError> {
        sqlx::query_as::<_, UserSummary>(
            "SELECT id, name, email, role, created_at FROM users ORDER BY created_at DESC",
        )
        .fetch_all(db)
        .await
        .context("Failed to fetch users")
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn list_instructors(db: &PgPool) -> Result<Vec<InstructorSummary>, AppError> {
        sqlx::query_as::<_, InstructorSummary>(
            "SELECT id, name, email FROM users WHERE role = 'INSTRUCTOR' ORDER BY name ASC",
        )
        .fetch_all(db)
        .await
        .context("Failed to fetch instructors")
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn list_students_of(
        db: &PgPool,
        instructor_id: Uuid,
    ) -> Result<Vec<StudentSummary>, AppError> {
        sqlx::query_as::<_, StudentSummary>(
            "SELECT id, name, email, created_at FROM users
             WHERE role = 'STUDENT' AND instructor_id = $1
             ORDER BY created_at DESC",
        )
        .bind(instructor_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch students for instructor")
        .map_err(AppError::database)
    }

    #[instrument(skip(db, new_password))]
    pub async fn reset_password(
        db: &PgPool,
        user_id: Uuid,
        new_password: &str,
    ) -> Result<Uuid, AppError> {
        let hashed = hash_password(new_password)?;

        let updated = sqlx::query_scalar::<_, Uuid>(
            "UPDATE users SET password = $1 WHERE id = $2 RETURNING id",
        )
        .bind(&hashed)
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("Failed to reset password")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("User not found")))?;

        info!(user_id = %updated, "Password reset by admin");
        Ok(updated)
    }

    #[instrument(skip(db, current_password, new_password))]
    pub async fn change_password(
        db: &PgPool,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let stored = sqlx::query_scalar::<_, String>("SELECT password FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch user password")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))?;

        if !verify_password(current_password, &stored)? {
            return Err(AppError::bad_request(anyhow!(
                "Current password is incorrect"
            )));
        }

        if new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::bad_request(anyhow!(
                "newPassword must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let hashed = hash_password(new_password)?;
        sqlx::query("UPDATE users SET password = $1 WHERE id = $2")
            .bind(&hashed)
            .bind(user_id)
            .execute(db)
            .await
            .context("Failed to update password")
            .map_err(AppError::database)?;

        info!(%user_id, "Password changed");
        Ok(())
    }
}
