//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::types::{ImageSource, PublishState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostRecord {
    pub id: Uuid,
    pub title: String,
    pub excerpt: String,
    pub content_markdown: String,
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub author: String,
    pub publish_state: PublishState,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageRecord {
    pub id: Uuid,
    pub url: String,
    /// Object-store key; derived once at upload time and reused for deletion.
    pub filename: String,
    pub prompt: Option<String>,
    pub source: ImageSource,
    pub created_at: OffsetDateTime,
}
