use anyhow::{Context, anyhow};
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use eduplatform_core::{AppError, FileStorage, normalize_color};
use eduplatform_models::settings::{AppSetting, DEFAULT_APP_NAME, SettingsPatch, UpdateSettingsDto};

use crate::utils::upload::{UploadedFile, random_key};

const SETTING_COLUMNS: &str =
    "id, name, logo_url, theme_primary_color, footer_text, footer_color, updated_at";

/// Turns a request body into column values.
///
/// A blank name is ignored, footer text is kept verbatim, colors must
/// normalize. Fails when nothing is left to write.
pub fn build_patch(dto: UpdateSettingsDto) -> Result<SettingsPatch, AppError> {
    let color = |raw: Option<String>, field: &str| -> Result<Option<String>, AppError> {
        raw.map(|value| {
            normalize_color(&value).ok_or_else(|| {
                AppError::bad_request(anyhow!("Invalid color format for {field}"))
            })
        })
        .transpose()
    };

    let patch = SettingsPatch {
        name: dto
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
        theme_primary_color: color(dto.theme_primary_color, "themePrimaryColor")?,
        footer_text: dto.footer_text,
        footer_color: color(dto.footer_color, "footerColor")?,
    };

    if patch.is_empty() {
        return Err(AppError::bad_request(anyhow!("No valid fields to update")));
    }

    Ok(patch)
}

pub struct SettingsService;

impl SettingsService {
    /// The settings row, created with defaults on first access.
    #[instrument(skip(db))]
    pub async fn get_or_create(db: &PgPool) -> Result<AppSetting, AppError> {
        let select = format!("SELECT {SETTING_COLUMNS} FROM app_settings LIMIT 1");

        let existing = sqlx::query_as::<_, AppSetting>(&select)
            .fetch_optional(db)
            .await
            .context("Failed to fetch settings")
            .map_err(AppError::database)?;

        if let Some(setting) = existing {
            return Ok(setting);
        }

        // concurrent first reads race here; the singleton index keeps one row
        sqlx::query("INSERT INTO app_settings (name) VALUES ($1) ON CONFLICT DO NOTHING")
            .bind(DEFAULT_APP_NAME)
            .execute(db)
            .await
            .context("Failed to create default settings")
            .map_err(AppError::database)?;

        info!("Default settings created");

        sqlx::query_as::<_, AppSetting>(&select)
            .fetch_one(db)
            .await
            .context("Failed to fetch settings after creation")
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn update(db: &PgPool, patch: SettingsPatch) -> Result<AppSetting, AppError> {
        let current = Self::get_or_create(db).await?;

        let updated = sqlx::query_as::<_, AppSetting>(&format!(
            "UPDATE app_settings
             SET name = COALESCE($1, name),
                 theme_primary_color = COALESCE($2, theme_primary_color),
                 footer_text = COALESCE($3, footer_text),
                 footer_color = COALESCE($4, footer_color),
                 updated_at = NOW()
             WHERE id = $5
             RETURNING {SETTING_COLUMNS}"
        ))
        .bind(&patch.name)
        .bind(&patch.theme_primary_color)
        .bind(&patch.footer_text)
        .bind(&patch.footer_color)
        .bind(current.id)
        .fetch_one(db)
        .await
        .context("Failed to update settings")
        .map_err(AppError::database)?;

        info!("Settings updated");
        Ok(updated)
    }

    /// Stores a new logo and points the settings at it. The previous logo
    /// file is removed when it lives in our storage.
    #[instrument(skip(db, storage, file), fields(file_name = %file.file_name))]
    pub async fn replace_logo(
        db: &PgPool,
        storage: &dyn FileStorage,
        file: &UploadedFile,
    ) -> Result<AppSetting, AppError> {
        let current = Self::get_or_create(db).await?;

        let key = random_key("logos", &file.file_name);
        let key = file.store(storage, &key, "logo").await?;
        let logo_url = storage.public_path(&key)?;

        let updated = sqlx::query_as::<_, AppSetting>(&format!(
            "UPDATE app_settings SET logo_url = $1, updated_at = NOW()
             WHERE id = $2
             RETURNING {SETTING_COLUMNS}"
        ))
        .bind(&logo_url)
        .bind(current.id)
        .fetch_one(db)
        .await
        .context("Failed to store logo URL")
        .map_err(AppError::database)?;

        if let Some(old_key) = current
            .logo_url
            .as_deref()
            .and_then(|url| storage.key_from_public_path(url))
        {
            if let Err(e) = storage.delete(old_key).await {
                warn!(key = %old_key, error = %e, "Failed to remove previous logo");
            }
        }

        info!(%logo_url, "Logo replaced");
        Ok(updated)
    }
}
