use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::posts::{CreatePostCommand, UpdatePostCommand};
use crate::application::repos::PostListScope;

use super::error::ApiError;
use super::middleware::AdminPrincipal;
use super::models::{PostCreateRequest, PostUpdateRequest};
use crate::infra::http::AdminState;

pub async fn list_posts(State(state): State<AdminState>) -> Result<impl IntoResponse, ApiError> {
    let posts = state.posts.list(PostListScope::Admin).await?;
    Ok(Json(posts))
}

pub async fn get_post(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state.posts.get(id).await?;
    Ok(Json(post))
}

pub async fn create_post(
    State(state): State<AdminState>,
    Extension(principal): Extension<AdminPrincipal>,
    Json(payload): Json<PostCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let command = CreatePostCommand {
        title: payload.title,
        excerpt: payload.excerpt,
        content_markdown: payload.content_markdown,
        cover_image: payload.cover_image,
        tags: payload.tags.into_tags(),
        author: payload.author,
        published: payload.published,
    };

    let post = state.posts.create(command).await?;
    tracing::info!(
        target = "atelier::http::admin",
        actor = %principal.session.email,
        id = %post.id,
        "post created via admin api"
    );
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn update_post(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PostUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let command = UpdatePostCommand {
        id,
        title: payload.title,
        excerpt: payload.excerpt,
        content_markdown: payload.content_markdown,
        cover_image: payload.cover_image,
        tags: payload.tags.into_tags(),
        author: payload.author,
        published: payload.published,
    };

    let post = state.posts.update(command).await?;
    Ok(Json(post))
}

pub async fn toggle_publish(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state.posts.toggle_publish(id).await?;
    Ok(Json(post))
}

pub async fn delete_post(
    State(state): State<AdminState>,
    Extension(principal): Extension<AdminPrincipal>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.posts.delete(id).await?;
    tracing::info!(
        target = "atelier::http::admin",
        actor = %principal.session.email,
        id = %id,
        "post deleted via admin api"
    );
    Ok(StatusCode::NO_CONTENT)
}

pub async fn preview_post(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let preview = state.posts.preview(id).await?;
    Ok(Json(preview))
}
