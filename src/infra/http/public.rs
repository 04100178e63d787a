//! Public read surface consumed by the site's page renderer.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use uuid::Uuid;

use crate::application::repos::{MediaStoreError, PostListScope};
use crate::domain::entities::PostRecord;

use super::PublicState;
use super::admin::error::ApiError;

#[derive(Debug, Serialize)]
pub struct PublicPost {
    #[serde(flatten)]
    pub record: PostRecord,
    pub html: String,
}

/// All visible posts, newest publish first. Read failures degrade to an empty
/// listing rather than an error page.
pub async fn list_posts(State(state): State<PublicState>) -> Json<Vec<PostRecord>> {
    match state.posts.list(PostListScope::Public).await {
        Ok(posts) => Json(posts),
        Err(err) => {
            tracing::error!(target = "atelier::http::public", error = %err, "post listing failed");
            Json(Vec::new())
        }
    }
}

/// Single-post view: the record plus its rendered body. "Not found" is a
/// normal outcome here, not a failure.
pub async fn get_post(
    State(state): State<PublicState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PublicPost>, ApiError> {
    let post = state
        .posts
        .find(id)
        .await
        .map_err(|err| {
            tracing::error!(target = "atelier::http::public", error = %err, "post fetch failed");
            ApiError::from(err)
        })?
        .ok_or_else(|| ApiError::not_found("post not found"))?;

    let rendered = state
        .renderer
        .render(&post.content_markdown, post.cover_image.as_deref());

    Ok(Json(PublicPost {
        record: post,
        html: rendered.html,
    }))
}

pub async fn serve_media(
    State(state): State<PublicState>,
    Path(filename): Path<String>,
) -> Response {
    match state.media.read(&filename).await {
        Ok(bytes) => {
            let mime = mime_guess::from_path(&filename).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.as_ref().to_string())],
                bytes,
            )
                .into_response()
        }
        Err(MediaStoreError::NotFound | MediaStoreError::InvalidKey) => {
            StatusCode::NOT_FOUND.into_response()
        }
        Err(err) => {
            tracing::error!(target = "atelier::http::public", error = %err, "media read failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
