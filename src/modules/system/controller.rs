use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use utoipa::ToSchema;

use eduplatform_core::file_storage::{base_name, extension};
use eduplatform_core::{AppError, StorageError};
use eduplatform_models::MessageResponse;

use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;

pub const BANNER: &str = "EDU_Platform API is running...";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub time: DateTime<Utc>,
}

pub async fn banner() -> &'static str {
    BANNER
}

/// Top-level endpoint groups
#[utoipa::path(
    get,
    path = "/api",
    responses((status = 200, description = "Endpoint listing", body = MessageResponse)),
    tag = "System"
)]
pub async fn api_index() -> Json<MessageResponse> {
    Json(MessageResponse::new(
        "EduPlatform API - available endpoints: /auth, /assignments, /submissions, /users",
    ))
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "System"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        time: Utc::now(),
    })
}

fn content_type_for(file_name: &str) -> &'static str {
    match extension(file_name)
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some(".pdf") => "application/pdf",
        Some(".doc") => "application/msword",
        Some(".docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some(".txt") => "text/plain; charset=utf-8",
        Some(".zip") => "application/zip",
        Some(".png") => "image/png",
        Some(".jpg" | ".jpeg") => "image/jpeg",
        Some(".gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Download a submitted file as an attachment
#[utoipa::path(
    get,
    path = "/api/download/submissions/{filename}",
    params(("filename" = String, Path, description = "Stored file name; directories are ignored")),
    responses(
        (status = 200, description = "File contents", content_type = "application/octet-stream"),
        (status = 404, description = "File not found", body = ErrorResponse)
    ),
    tag = "System"
)]
#[instrument(skip(state))]
pub async fn download_submission(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let not_found = || AppError::not_found(anyhow::anyhow!("File not found"));

    let name = base_name(&filename).ok_or_else(not_found)?;
    let key = format!("submissions/{name}");

    let bytes = match state.storage.read(&key).await {
        Ok(bytes) => bytes,
        Err(StorageError::NotFound | StorageError::InvalidKey(_)) => {
            debug!(%key, "Requested submission file does not exist");
            return Err(not_found());
        }
        Err(e) => return Err(e.into()),
    };

    let disposition = format!("attachment; filename=\"{}\"", name.replace('"', ""));

    Ok((
        [
            (header::CONTENT_TYPE, content_type_for(name).to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}
