//! Post lifecycle management: create, edit, publish toggling, deletion, and
//! preview rendering.

use std::sync::Arc;

use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::render::RenderService;
use crate::application::repos::{
    CreatePostParams, PostListScope, PostsRepo, PostsWriteRepo, RepoError, UpdatePostParams,
    UpdatePublishStateParams,
};
use crate::domain::entities::PostRecord;
use crate::domain::posts::{DEFAULT_AUTHOR, format_publish_date};
use crate::domain::types::PublishState;

#[derive(Debug, Error)]
pub enum PostError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    #[error("post not found")]
    NotFound,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct CreatePostCommand {
    pub title: String,
    pub excerpt: String,
    pub content_markdown: String,
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub author: Option<String>,
    /// `None` defers to the configured default.
    pub published: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct UpdatePostCommand {
    pub id: Uuid,
    pub title: String,
    pub excerpt: String,
    pub content_markdown: String,
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub author: Option<String>,
    pub published: bool,
}

/// A post decorated for preview: rendered body plus display metadata.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PostPreview {
    pub title: String,
    pub author: String,
    pub tags: Vec<String>,
    pub cover_image: Option<String>,
    pub published_label: String,
    pub html: String,
}

pub struct PostService {
    reader: Arc<dyn PostsRepo>,
    writer: Arc<dyn PostsWriteRepo>,
    renderer: Arc<RenderService>,
    default_publish: bool,
}

impl PostService {
    pub fn new(
        reader: Arc<dyn PostsRepo>,
        writer: Arc<dyn PostsWriteRepo>,
        renderer: Arc<RenderService>,
        default_publish: bool,
    ) -> Self {
        Self {
            reader,
            writer,
            renderer,
            default_publish,
        }
    }

    pub async fn create(&self, command: CreatePostCommand) -> Result<PostRecord, PostError> {
        ensure_non_empty(&command.title, "title")?;
        ensure_non_empty(&command.excerpt, "excerpt")?;

        let params = CreatePostParams {
            title: command.title,
            excerpt: command.excerpt,
            content_markdown: command.content_markdown,
            cover_image: command.cover_image,
            tags: command.tags,
            author: resolve_author(command.author),
            published: command.published.unwrap_or(self.default_publish),
        };

        let post = self.writer.create_post(params).await?;
        tracing::info!(target = "atelier::posts", id = %post.id, title = %post.title, "post created");
        Ok(post)
    }

    pub async fn update(&self, command: UpdatePostCommand) -> Result<PostRecord, PostError> {
        ensure_non_empty(&command.title, "title")?;
        ensure_non_empty(&command.excerpt, "excerpt")?;

        let params = UpdatePostParams {
            id: command.id,
            title: command.title,
            excerpt: command.excerpt,
            content_markdown: command.content_markdown,
            cover_image: command.cover_image,
            tags: command.tags,
            author: resolve_author(command.author),
            published: command.published,
        };

        self.writer.update_post(params).await.map_err(not_found)
    }

    /// Flip the publish flag. Entering `Published` re-stamps the publish
    /// timestamp; leaving it keeps the old timestamp on the draft.
    pub async fn toggle_publish(&self, id: Uuid) -> Result<PostRecord, PostError> {
        let post = self.get(id).await?;

        let params = match post.publish_state {
            PublishState::Draft { .. } => UpdatePublishStateParams {
                id,
                published: true,
                published_at: Some(OffsetDateTime::now_utc()),
            },
            PublishState::Published { .. } => UpdatePublishStateParams {
                id,
                published: false,
                published_at: None,
            },
        };

        let post = self.writer.update_publish_state(params).await.map_err(not_found)?;
        tracing::info!(
            target = "atelier::posts",
            id = %post.id,
            published = post.publish_state.is_published(),
            "publish state toggled"
        );
        Ok(post)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), PostError> {
        self.writer.delete_post(id).await?;
        tracing::info!(target = "atelier::posts", id = %id, "post deleted");
        Ok(())
    }

    pub async fn list(&self, scope: PostListScope) -> Result<Vec<PostRecord>, PostError> {
        Ok(self.reader.list_posts(scope).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<PostRecord, PostError> {
        self.reader
            .find_by_id(id)
            .await?
            .ok_or(PostError::NotFound)
    }

    /// Absence of a post is a valid terminal state for viewers, not an error.
    pub async fn find(&self, id: Uuid) -> Result<Option<PostRecord>, PostError> {
        Ok(self.reader.find_by_id(id).await?)
    }

    pub async fn preview(&self, id: Uuid) -> Result<PostPreview, PostError> {
        let post = self.get(id).await?;
        Ok(self.render_preview(&post))
    }

    pub fn render_preview(&self, post: &PostRecord) -> PostPreview {
        let rendered = self
            .renderer
            .render(&post.content_markdown, post.cover_image.as_deref());

        let published_label = match post.publish_state {
            PublishState::Published { at } => format_publish_date(at),
            PublishState::Draft { .. } => "Draft".to_string(),
        };

        PostPreview {
            title: post.title.clone(),
            author: post.author.clone(),
            tags: post.tags.clone(),
            cover_image: post.cover_image.clone(),
            published_label,
            html: rendered.html,
        }
    }
}

fn resolve_author(author: Option<String>) -> String {
    match author {
        Some(name) if !name.trim().is_empty() => name,
        _ => DEFAULT_AUTHOR.to_string(),
    }
}

fn ensure_non_empty(value: &str, field: &'static str) -> Result<(), PostError> {
    if value.trim().is_empty() {
        return Err(PostError::EmptyField(field));
    }
    Ok(())
}

fn not_found(err: RepoError) -> PostError {
    match err {
        RepoError::NotFound => PostError::NotFound,
        other => PostError::Repo(other),
    }
}
