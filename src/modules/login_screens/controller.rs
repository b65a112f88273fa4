use anyhow::anyhow;
use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode},
};
use serde::Deserialize;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use eduplatform_core::{AppError, UploadPolicy};
use eduplatform_models::login_screens::{LoginScreenImage, NewLoginScreenImage};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::login_screens::service::LoginScreenService;
use crate::state::AppState;
use crate::utils::upload::UploadForm;
use crate::utils::url::{absolutize, request_origin};

/// Multipart body of an image upload, for the API docs.
#[derive(Deserialize, ToSchema)]
pub struct LoginScreenUpload {
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

fn with_absolute_url(mut image: LoginScreenImage, origin: Option<&str>) -> LoginScreenImage {
    image.image_url = absolutize(origin, &image.image_url);
    image
}

/// All login-screen images, newest first
#[utoipa::path(
    get,
    path = "/api/login-screen-images",
    responses(
        (status = 200, description = "Images with absolute URLs", body = Vec<LoginScreenImage>)
    ),
    tag = "Login Screen Images"
)]
#[instrument(skip(state, headers))]
pub async fn list_images(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<LoginScreenImage>>, AppError> {
    let origin = request_origin(&headers);
    let images = LoginScreenService::list(&state.db)
        .await?
        .into_iter()
        .map(|image| with_absolute_url(image, origin.as_deref()))
        .collect();
    Ok(Json(images))
}

/// The active image, or `null`
#[utoipa::path(
    get,
    path = "/api/login-screen-images/active",
    responses(
        (status = 200, description = "Active image or null", body = Option<LoginScreenImage>)
    ),
    tag = "Login Screen Images"
)]
#[instrument(skip(state, headers))]
pub async fn active_image(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Option<LoginScreenImage>>, AppError> {
    let origin = request_origin(&headers);
    let image = LoginScreenService::active(&state.db)
        .await?
        .map(|image| with_absolute_url(image, origin.as_deref()));
    Ok(Json(image))
}

/// Upload an image and make it active (admin)
#[utoipa::path(
    post,
    path = "/api/login-screen-images",
    request_body(content = LoginScreenUpload, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Image stored and activated", body = LoginScreenImage),
        (status = 400, description = "Missing name or rejected image", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("x_auth_token" = [])),
    tag = "Login Screen Images"
)]
#[instrument(skip(state, headers, multipart))]
pub async fn upload_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<(StatusCode, Json<LoginScreenImage>), AppError> {
    let form = UploadForm::read(multipart, "image", UploadPolicy::IMAGES).await?;
    let file = form
        .file
        .as_ref()
        .ok_or_else(|| AppError::bad_request(anyhow!("No image file provided")))?;

    let meta = NewLoginScreenImage {
        name: form.require_text("name", "name is required")?,
        description: form.text("description").unwrap_or_default().to_string(),
    };

    let image = LoginScreenService::create(&state.db, state.storage.as_ref(), file, meta).await?;
    let origin = request_origin(&headers);
    Ok((
        StatusCode::CREATED,
        Json(with_absolute_url(image, origin.as_deref())),
    ))
}

/// Make one image the only active one (admin)
#[utoipa::path(
    patch,
    path = "/api/login-screen-images/{id}/activate",
    params(("id" = Uuid, Path, description = "Image ID")),
    responses(
        (status = 200, description = "Activated image", body = LoginScreenImage),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Image not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("x_auth_token" = [])),
    tag = "Login Screen Images"
)]
#[instrument(skip(state))]
pub async fn activate_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LoginScreenImage>, AppError> {
    let image = LoginScreenService::activate(&state.db, id).await?;
    Ok(Json(image))
}

/// Delete an image and its file (admin)
#[utoipa::path(
    delete,
    path = "/api/login-screen-images/{id}",
    params(("id" = Uuid, Path, description = "Image ID")),
    responses(
        (status = 204, description = "Image deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Image not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("x_auth_token" = [])),
    tag = "Login Screen Images"
)]
#[instrument(skip(state))]
pub async fn delete_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    LoginScreenService::delete(&state.db, state.storage.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
