use anyhow::{Context, anyhow};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use eduplatform_core::{AppError, FileStorage};
use eduplatform_models::login_screens::{LoginScreenImage, NewLoginScreenImage};

use crate::utils::upload::{UploadedFile, random_key};

const IMAGE_COLUMNS: &str = "id, name, description, image_url, is_active, created_at";

pub struct LoginScreenService;

impl LoginScreenService {
    #[instrument(skip(db))]
    pub async fn list(db: &PgPool) -> Result<Vec<LoginScreenImage>, AppError> {
        sqlx::query_as::<_, LoginScreenImage>(&format!(
            "SELECT {IMAGE_COLUMNS} FROM login_screen_images ORDER BY created_at DESC"
        ))
        .fetch_all(db)
        .await
        .context("Failed to fetch login screen images")
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn active(db: &PgPool) -> Result<Option<LoginScreenImage>, AppError> {
        sqlx::query_as::<_, LoginScreenImage>(&format!(
            "SELECT {IMAGE_COLUMNS} FROM login_screen_images WHERE is_active LIMIT 1"
        ))
        .fetch_optional(db)
        .await
        .context("Failed to fetch active login screen image")
        .map_err(AppError::database)
    }

    /// Serializes every writer that moves the active flag. Readers are not
    /// blocked.
    async fn lock_images(tx: &mut Transaction<'_, Postgres>) -> Result<(), AppError> {
        sqlx::query("LOCK TABLE login_screen_images IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut **tx)
            .await
            .context("Failed to lock login screen images")
            .map_err(AppError::database)?;
        Ok(())
    }

    async fn deactivate_all(tx: &mut Transaction<'_, Postgres>) -> Result<(), AppError> {
        sqlx::query("UPDATE login_screen_images SET is_active = FALSE WHERE is_active")
            .execute(&mut **tx)
            .await
            .context("Failed to deactivate login screen images")
            .map_err(AppError::database)?;
        Ok(())
    }

    /// Stores the image and makes it the only active one.
    #[instrument(skip(db, storage, file, meta), fields(name = %meta.name))]
    pub async fn create(
        db: &PgPool,
        storage: &dyn FileStorage,
        file: &UploadedFile,
        meta: NewLoginScreenImage,
    ) -> Result<LoginScreenImage, AppError> {
        let key = random_key("login-screens", &file.file_name);
        let key = file.store(storage, &key, "login_screen").await?;
        let image_url = storage.public_path(&key)?;

        let created = async {
            let mut tx = db
                .begin()
                .await
                .context("Failed to begin transaction")
                .map_err(AppError::database)?;

            Self::lock_images(&mut tx).await?;
            Self::deactivate_all(&mut tx).await?;

            let image = sqlx::query_as::<_, LoginScreenImage>(&format!(
                "INSERT INTO login_screen_images (name, description, image_url, is_active)
                 VALUES ($1, $2, $3, TRUE)
                 RETURNING {IMAGE_COLUMNS}"
            ))
            .bind(&meta.name)
            .bind(&meta.description)
            .bind(&image_url)
            .fetch_one(&mut *tx)
            .await
            .context("Failed to insert login screen image")
            .map_err(AppError::database)?;

            tx.commit()
                .await
                .context("Failed to commit login screen image")
                .map_err(AppError::database)?;

            Ok::<_, AppError>(image)
        }
        .await;

        match created {
            Ok(image) => {
                info!(image_id = %image.id, "Login screen image uploaded");
                Ok(image)
            }
            Err(err) => {
                if let Err(e) = storage.delete(&key).await {
                    warn!(%key, error = %e, "Failed to remove orphaned image");
                }
                Err(err)
            }
        }
    }

    #[instrument(skip(db))]
    pub async fn activate(db: &PgPool, id: Uuid) -> Result<LoginScreenImage, AppError> {
        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        Self::lock_images(&mut tx).await?;

        let exists = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM login_screen_images WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to look up login screen image")
        .map_err(AppError::database)?
        .is_some();

        if !exists {
            return Err(AppError::not_found(anyhow!("Image not found")));
        }

        Self::deactivate_all(&mut tx).await?;

        let image = sqlx::query_as::<_, LoginScreenImage>(&format!(
            "UPDATE login_screen_images SET is_active = TRUE WHERE id = $1
             RETURNING {IMAGE_COLUMNS}"
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to activate login screen image")
        .map_err(AppError::database)?;

        tx.commit()
            .await
            .context("Failed to commit activation")
            .map_err(AppError::database)?;

        info!(image_id = %id, "Login screen image activated");
        Ok(image)
    }

    /// Deletes the row and its file. When the active image goes, the newest
    /// remaining one takes over.
    #[instrument(skip(db, storage))]
    pub async fn delete(db: &PgPool, storage: &dyn FileStorage, id: Uuid) -> Result<(), AppError> {
        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        Self::lock_images(&mut tx).await?;

        let image = sqlx::query_as::<_, LoginScreenImage>(&format!(
            "DELETE FROM login_screen_images WHERE id = $1 RETURNING {IMAGE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to delete login screen image")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("Image not found")))?;

        if image.is_active {
            sqlx::query(
                "UPDATE login_screen_images SET is_active = TRUE
                 WHERE id = (SELECT id FROM login_screen_images ORDER BY created_at DESC LIMIT 1)",
            )
            .execute(&mut *tx)
            .await
            .context("Failed to activate replacement image")
            .map_err(AppError::database)?;
        }

        tx.commit()
            .await
            .context("Failed to commit deletion")
            .map_err(AppError::database)?;

        match storage.key_from_public_path(&image.image_url) {
            Some(key) => {
                if let Err(e) = storage.delete(key).await {
                    warn!(%key, error = %e, "Failed to remove image file");
                }
            }
            None => warn!(url = %image.image_url, "Image URL is not in local storage"),
        }

        info!(image_id = %id, was_active = image.is_active, "Login screen image deleted");
        Ok(())
    }
}
