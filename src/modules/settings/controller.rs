use anyhow::anyhow;
use axum::{
    Json,
    extract::{Multipart, State},
    http::HeaderMap,
};
use serde::Deserialize;
use tracing::instrument;
use utoipa::ToSchema;

use eduplatform_core::{AppError, UploadPolicy};
use eduplatform_models::settings::{AppSetting, UpdateSettingsDto};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::settings::service::{SettingsService, build_patch};
use crate::state::AppState;
use crate::utils::upload::UploadForm;
use crate::utils::url::{absolutize, request_origin};
use crate::validator::ValidatedJson;

/// Multipart body of a logo upload, for the API docs.
#[derive(Deserialize, ToSchema)]
pub struct LogoUpload {
    #[schema(value_type = String, format = Binary)]
    pub logo: Vec<u8>,
}

fn with_absolute_logo(mut setting: AppSetting, headers: &HeaderMap) -> AppSetting {
    let origin = request_origin(headers);
    setting.logo_url = setting
        .logo_url
        .map(|url| absolutize(origin.as_deref(), &url));
    setting
}

/// Current branding settings
#[utoipa::path(
    get,
    path = "/api/settings",
    responses(
        (status = 200, description = "Settings with an absolute logo URL", body = AppSetting)
    ),
    tag = "Settings"
)]
#[instrument(skip(state, headers))]
pub async fn get_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<AppSetting>, AppError> {
    let setting = SettingsService::get_or_create(&state.db).await?;
    Ok(Json(with_absolute_logo(setting, &headers)))
}

/// Update name, colors or footer text (admin)
#[utoipa::path(
    put,
    path = "/api/settings",
    request_body = UpdateSettingsDto,
    responses(
        (status = 200, description = "Updated settings", body = AppSetting),
        (status = 400, description = "Invalid color or nothing to update", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("x_auth_token" = [])),
    tag = "Settings"
)]
#[instrument(skip(state, dto))]
pub async fn update_settings(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<UpdateSettingsDto>,
) -> Result<Json<AppSetting>, AppError> {
    let patch = build_patch(dto)?;
    let setting = SettingsService::update(&state.db, patch).await?;
    Ok(Json(setting))
}

/// Upload or replace the logo (admin)
#[utoipa::path(
    post,
    path = "/api/settings/logo",
    request_body(content = LogoUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Settings with the new logo", body = AppSetting),
        (status = 400, description = "Missing or rejected image", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("x_auth_token" = [])),
    tag = "Settings"
)]
#[instrument(skip(state, headers, multipart))]
pub async fn upload_logo(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<AppSetting>, AppError> {
    let form = UploadForm::read(multipart, "logo", UploadPolicy::IMAGES).await?;
    let file = form
        .file
        .as_ref()
        .ok_or_else(|| AppError::bad_request(anyhow!("Logo file is required")))?;

    let setting = SettingsService::replace_logo(&state.db, state.storage.as_ref(), file).await?;
    Ok(Json(with_absolute_logo(setting, &headers)))
}
