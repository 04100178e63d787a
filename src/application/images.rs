//! Image library management: generation, persistence, upload, deletion.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{
    ImagesRepo, ImagesWriteRepo, MediaStore, MediaStoreError, NewImageParams, RepoError,
};
use crate::domain::entities::ImageRecord;
use crate::domain::images::{library_filename, name_from_url};
use crate::domain::types::{ImageModel, ImageSize, ImageSource};

#[derive(Debug, Error)]
pub enum ImageGenError {
    #[error("image API returned status {status}: {message}")]
    Api { status: u16, message: String },
    #[error("http transport failure: {0}")]
    Http(String),
    #[error("image API returned no results")]
    EmptyResponse,
}

#[derive(Debug, Clone)]
pub struct GenerateImageRequest {
    pub prompt: String,
    pub model: ImageModel,
    pub size: ImageSize,
}

/// Result of a generation call: a transient upstream URL, held in memory
/// until the editor decides to save it to the library.
#[derive(Debug, Clone, serde::Serialize)]
pub struct GeneratedImage {
    pub url: String,
    pub prompt: String,
    pub model: ImageModel,
    pub size: ImageSize,
}

/// External image-generation API. One synchronous call per request; no retry.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, request: &GenerateImageRequest)
    -> Result<GeneratedImage, ImageGenError>;

    /// Re-fetch image bytes from a transient generation URL.
    async fn download(&self, url: &str) -> Result<Bytes, ImageGenError>;
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("prompt must not be empty")]
    EmptyPrompt,
    #[error("image not found")]
    NotFound,
    #[error("image generation failed: {0}")]
    Generate(ImageGenError),
    #[error(
        "could not fetch the generated image ({0}); the source URL may have expired, generate it again and retry"
    )]
    SourceFetch(ImageGenError),
    #[error("media storage failure: {0}")]
    Media(MediaStoreError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

pub struct ImageService {
    reader: Arc<dyn ImagesRepo>,
    writer: Arc<dyn ImagesWriteRepo>,
    media: Arc<dyn MediaStore>,
    generator: Arc<dyn ImageGenerator>,
}

impl ImageService {
    pub fn new(
        reader: Arc<dyn ImagesRepo>,
        writer: Arc<dyn ImagesWriteRepo>,
        media: Arc<dyn MediaStore>,
        generator: Arc<dyn ImageGenerator>,
    ) -> Self {
        Self {
            reader,
            writer,
            media,
            generator,
        }
    }

    /// Call the external API. Validation happens before any network traffic;
    /// nothing is persisted on success or failure.
    pub async fn generate(
        &self,
        request: GenerateImageRequest,
    ) -> Result<GeneratedImage, ImageError> {
        if request.prompt.trim().is_empty() {
            return Err(ImageError::EmptyPrompt);
        }

        self.generator
            .generate(&request)
            .await
            .map_err(ImageError::Generate)
    }

    /// Persist a previously generated image: fetch the bytes, upload them
    /// under a timestamp-derived filename, then create the record. Nothing is
    /// persisted unless every step succeeds.
    pub async fn save_generated(
        &self,
        url: &str,
        prompt: &str,
    ) -> Result<ImageRecord, ImageError> {
        let bytes = self
            .generator
            .download(url)
            .await
            .map_err(ImageError::SourceFetch)?;

        self.persist(name_from_url(url), bytes, Some(prompt.to_string()), ImageSource::Generated)
            .await
    }

    pub async fn upload(
        &self,
        original_name: &str,
        bytes: Bytes,
    ) -> Result<ImageRecord, ImageError> {
        self.persist(original_name, bytes, None, ImageSource::Uploaded)
            .await
    }

    /// Delete blob first, then record. A missing blob is tolerated; any other
    /// storage failure aborts so the record keeps pointing at the blob.
    pub async fn delete(&self, id: Uuid) -> Result<(), ImageError> {
        let record = self
            .reader
            .find_by_id(id)
            .await?
            .ok_or(ImageError::NotFound)?;

        match self.media.delete(&record.filename).await {
            Ok(()) | Err(MediaStoreError::NotFound) => {}
            Err(err) => return Err(ImageError::Media(err)),
        }

        self.writer.delete_image(id).await?;
        tracing::info!(target = "atelier::images", id = %id, filename = %record.filename, "image deleted");
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<ImageRecord>, ImageError> {
        Ok(self.reader.list_images().await?)
    }

    async fn persist(
        &self,
        original_name: &str,
        bytes: Bytes,
        prompt: Option<String>,
        source: ImageSource,
    ) -> Result<ImageRecord, ImageError> {
        let filename = library_filename(original_name, OffsetDateTime::now_utc());

        self.media
            .put(&filename, bytes)
            .await
            .map_err(ImageError::Media)?;

        let record = self
            .writer
            .create_image(NewImageParams {
                url: self.media.download_url(&filename),
                filename: filename.clone(),
                prompt,
                source,
            })
            .await?;

        tracing::info!(target = "atelier::images", id = %record.id, filename = %filename, source = source.as_str(), "image saved");
        Ok(record)
    }
}
