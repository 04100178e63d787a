//! Request payloads for the admin API. Records serialize directly as
//! responses.

use serde::Deserialize;

use crate::domain::posts::parse_tags;
use crate::domain::types::{ImageModel, ImageSize};

/// Tags arrive either as an already-split list or as the classic
/// comma-separated form field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagsField {
    List(Vec<String>),
    Csv(String),
}

impl TagsField {
    pub fn into_tags(self) -> Vec<String> {
        match self {
            TagsField::List(tags) => tags,
            TagsField::Csv(raw) => parse_tags(&raw),
        }
    }
}

impl Default for TagsField {
    fn default() -> Self {
        TagsField::List(Vec::new())
    }
}

#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, serde::Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub expires_at: time::OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct PostCreateRequest {
    pub title: String,
    pub excerpt: String,
    #[serde(default)]
    pub content_markdown: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub tags: TagsField,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub published: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct PostUpdateRequest {
    pub title: String,
    pub excerpt: String,
    #[serde(default)]
    pub content_markdown: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub tags: TagsField,
    #[serde(default)]
    pub author: Option<String>,
    pub published: bool,
}

#[derive(Debug, Deserialize)]
pub struct GenerateImageBody {
    pub prompt: String,
    pub model: ImageModel,
    pub size: ImageSize,
}

#[derive(Debug, Deserialize)]
pub struct SaveGeneratedBody {
    pub url: String,
    pub prompt: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_field_accepts_both_shapes() {
        let csv: TagsField = serde_json::from_str(r#""a, ,b,""#).expect("csv");
        assert_eq!(csv.into_tags(), vec!["a", "b"]);

        let list: TagsField = serde_json::from_str(r#"["x","y"]"#).expect("list");
        assert_eq!(list.into_tags(), vec!["x", "y"]);
    }

    #[test]
    fn create_request_defaults_optional_fields() {
        let request: PostCreateRequest =
            serde_json::from_str(r#"{"title":"T","excerpt":"E"}"#).expect("payload");
        assert!(request.content_markdown.is_empty());
        assert!(request.tags.into_tags().is_empty());
        assert!(request.published.is_none());
    }
}
