use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::images::GenerateImageRequest;

use super::error::ApiError;
use super::models::{GenerateImageBody, SaveGeneratedBody};
use crate::infra::http::AdminState;

pub async fn list_images(State(state): State<AdminState>) -> Result<impl IntoResponse, ApiError> {
    let images = state.images.list().await?;
    Ok(Json(images))
}

pub async fn generate_image(
    State(state): State<AdminState>,
    Json(payload): Json<GenerateImageBody>,
) -> Result<impl IntoResponse, ApiError> {
    let generated = state
        .images
        .generate(GenerateImageRequest {
            prompt: payload.prompt,
            model: payload.model,
            size: payload.size,
        })
        .await?;

    Ok(Json(generated))
}

pub async fn save_generated_image(
    State(state): State<AdminState>,
    Json(payload): Json<SaveGeneratedBody>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .images
        .save_generated(&payload.url, &payload.prompt)
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn upload_image(
    State(state): State<AdminState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut filename = None;
    let mut data: Option<bytes::Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::bad_request("invalid multipart payload", Some(err.to_string())))?
    {
        if field.name() == Some("file") {
            filename = field.file_name().map(|s| s.to_string());
            data = Some(field.bytes().await.map_err(|err| {
                ApiError::bad_request("failed to read upload", Some(err.to_string()))
            })?);
            break;
        }
    }

    let filename = filename.ok_or_else(|| ApiError::bad_request("missing file", None))?;
    let data = data.ok_or_else(|| ApiError::bad_request("missing file", None))?;

    let record = state.images.upload(&filename, data).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn delete_image(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.images.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
