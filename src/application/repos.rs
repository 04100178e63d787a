//! Persistence adapter traits: document-store repositories and the media
//! (object) store.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::entities::{ImageRecord, PostRecord};
use crate::domain::types::ImageSource;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Visibility scope for post listings. The public scope hides only posts
/// whose stored flag is explicitly `false`; rows without the flag stay
/// visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostListScope {
    Public,
    Admin,
}

#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub title: String,
    pub excerpt: String,
    pub content_markdown: String,
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub author: String,
    pub published: bool,
}

/// Full-field overwrite; the publish timestamp is deliberately absent, only
/// [`UpdatePublishStateParams`] may touch it.
#[derive(Debug, Clone)]
pub struct UpdatePostParams {
    pub id: Uuid,
    pub title: String,
    pub excerpt: String,
    pub content_markdown: String,
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub author: String,
    pub published: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct UpdatePublishStateParams {
    pub id: Uuid,
    pub published: bool,
    /// `Some` re-stamps the publish timestamp; `None` leaves the stored value
    /// untouched.
    pub published_at: Option<OffsetDateTime>,
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    async fn list_posts(&self, scope: PostListScope) -> Result<Vec<PostRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError>;
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError>;

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError>;

    async fn update_publish_state(
        &self,
        params: UpdatePublishStateParams,
    ) -> Result<PostRecord, RepoError>;

    async fn delete_post(&self, id: Uuid) -> Result<(), RepoError>;
}

#[derive(Debug, Clone)]
pub struct NewImageParams {
    pub url: String,
    pub filename: String,
    pub prompt: Option<String>,
    pub source: ImageSource,
}

#[async_trait]
pub trait ImagesRepo: Send + Sync {
    async fn list_images(&self) -> Result<Vec<ImageRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ImageRecord>, RepoError>;
}

#[async_trait]
pub trait ImagesWriteRepo: Send + Sync {
    async fn create_image(&self, params: NewImageParams) -> Result<ImageRecord, RepoError>;

    async fn delete_image(&self, id: Uuid) -> Result<(), RepoError>;
}

#[derive(Debug, Error)]
pub enum MediaStoreError {
    #[error("object not found")]
    NotFound,
    #[error("invalid object key")]
    InvalidKey,
    #[error("storage i/o failure: {0}")]
    Io(String),
}

/// Blob storage addressed by library filename. Keys resolve to stable
/// download URLs; deletion distinguishes "already gone" from real failures so
/// callers can decide how much cleanup to attempt.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn put(&self, filename: &str, bytes: Bytes) -> Result<(), MediaStoreError>;

    async fn read(&self, filename: &str) -> Result<Bytes, MediaStoreError>;

    async fn delete(&self, filename: &str) -> Result<(), MediaStoreError>;

    fn download_url(&self, filename: &str) -> String;
}
