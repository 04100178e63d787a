//! In-memory fakes shared by the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use time::OffsetDateTime;
use uuid::Uuid;

use atelier::application::images::{
    GenerateImageRequest, GeneratedImage, ImageGenError, ImageGenerator,
};
use atelier::application::repos::{
    CreatePostParams, ImagesRepo, ImagesWriteRepo, MediaStore, MediaStoreError, NewImageParams,
    PostListScope, PostsRepo, PostsWriteRepo, RepoError, UpdatePostParams,
    UpdatePublishStateParams,
};
use atelier::domain::entities::{ImageRecord, PostRecord};
use atelier::domain::types::{ImageSource, PublishState};

/// Raw post row as the document store keeps it, so the same
/// absent-means-visible resolution as the real repository applies.
#[derive(Debug, Clone)]
pub struct StoredPost {
    pub id: Uuid,
    pub title: String,
    pub excerpt: String,
    pub content_markdown: String,
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub author: String,
    pub published: Option<bool>,
    pub published_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl StoredPost {
    fn to_record(&self) -> PostRecord {
        PostRecord {
            id: self.id,
            title: self.title.clone(),
            excerpt: self.excerpt.clone(),
            content_markdown: self.content_markdown.clone(),
            cover_image: self.cover_image.clone(),
            tags: self.tags.clone(),
            author: self.author.clone(),
            publish_state: PublishState::resolve(
                self.published,
                self.published_at,
                self.created_at,
            ),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Default)]
pub struct MemoryContent {
    pub posts: Mutex<HashMap<Uuid, StoredPost>>,
    pub images: Mutex<HashMap<Uuid, ImageRecord>>,
}

impl MemoryContent {
    /// Insert a row directly, bypassing the service layer, the way legacy
    /// tooling wrote documents.
    pub fn seed_post(
        &self,
        title: &str,
        published: Option<bool>,
        published_at: Option<OffsetDateTime>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();
        self.posts.lock().expect("lock").insert(
            id,
            StoredPost {
                id,
                title: title.to_string(),
                excerpt: format!("{title} excerpt"),
                content_markdown: String::new(),
                cover_image: None,
                tags: Vec::new(),
                author: "Atelier Studio".to_string(),
                published,
                published_at,
                created_at: now,
                updated_at: now,
            },
        );
        id
    }
}

#[async_trait]
impl PostsRepo for MemoryContent {
    async fn list_posts(&self, scope: PostListScope) -> Result<Vec<PostRecord>, RepoError> {
        let posts = self.posts.lock().expect("lock");
        let mut rows: Vec<&StoredPost> = posts
            .values()
            .filter(|row| match scope {
                PostListScope::Public => row.published != Some(false),
                PostListScope::Admin => true,
            })
            .collect();

        rows.sort_by(|a, b| b.published_at.cmp(&a.published_at).then(b.id.cmp(&a.id)));
        Ok(rows.into_iter().map(StoredPost::to_record).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError> {
        let posts = self.posts.lock().expect("lock");
        Ok(posts.get(&id).map(StoredPost::to_record))
    }
}

#[async_trait]
impl PostsWriteRepo for MemoryContent {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();
        let row = StoredPost {
            id,
            title: params.title,
            excerpt: params.excerpt,
            content_markdown: params.content_markdown,
            cover_image: params.cover_image,
            tags: params.tags,
            author: params.author,
            published: Some(params.published),
            published_at: Some(now),
            created_at: now,
            updated_at: now,
        };
        let record = row.to_record();
        self.posts.lock().expect("lock").insert(id, row);
        Ok(record)
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let mut posts = self.posts.lock().expect("lock");
        let row = posts.get_mut(&params.id).ok_or(RepoError::NotFound)?;

        row.title = params.title;
        row.excerpt = params.excerpt;
        row.content_markdown = params.content_markdown;
        row.cover_image = params.cover_image;
        row.tags = params.tags;
        row.author = params.author;
        row.published = Some(params.published);
        row.updated_at = OffsetDateTime::now_utc();

        Ok(row.to_record())
    }

    async fn update_publish_state(
        &self,
        params: UpdatePublishStateParams,
    ) -> Result<PostRecord, RepoError> {
        let mut posts = self.posts.lock().expect("lock");
        let row = posts.get_mut(&params.id).ok_or(RepoError::NotFound)?;

        row.published = Some(params.published);
        if let Some(at) = params.published_at {
            row.published_at = Some(at);
        }
        row.updated_at = OffsetDateTime::now_utc();

        Ok(row.to_record())
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), RepoError> {
        self.posts.lock().expect("lock").remove(&id);
        Ok(())
    }
}

#[async_trait]
impl ImagesRepo for MemoryContent {
    async fn list_images(&self) -> Result<Vec<ImageRecord>, RepoError> {
        let images = self.images.lock().expect("lock");
        let mut records: Vec<ImageRecord> = images.values().cloned().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(records)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ImageRecord>, RepoError> {
        Ok(self.images.lock().expect("lock").get(&id).cloned())
    }
}

#[async_trait]
impl ImagesWriteRepo for MemoryContent {
    async fn create_image(&self, params: NewImageParams) -> Result<ImageRecord, RepoError> {
        let record = ImageRecord {
            id: Uuid::new_v4(),
            url: params.url,
            filename: params.filename,
            prompt: params.prompt,
            source: params.source,
            created_at: OffsetDateTime::now_utc(),
        };
        self.images
            .lock()
            .expect("lock")
            .insert(record.id, record.clone());
        Ok(record)
    }

    async fn delete_image(&self, id: Uuid) -> Result<(), RepoError> {
        self.images.lock().expect("lock").remove(&id);
        Ok(())
    }
}

/// Media store fake with a switchable delete failure.
#[derive(Default)]
pub struct MemoryMediaStore {
    pub objects: Mutex<HashMap<String, Bytes>>,
    pub fail_delete: AtomicBool,
}

impl MemoryMediaStore {
    pub fn contains(&self, filename: &str) -> bool {
        self.objects.lock().expect("lock").contains_key(filename)
    }
}

#[async_trait]
impl MediaStore for MemoryMediaStore {
    async fn put(&self, filename: &str, bytes: Bytes) -> Result<(), MediaStoreError> {
        self.objects
            .lock()
            .expect("lock")
            .insert(filename.to_string(), bytes);
        Ok(())
    }

    async fn read(&self, filename: &str) -> Result<Bytes, MediaStoreError> {
        self.objects
            .lock()
            .expect("lock")
            .get(filename)
            .cloned()
            .ok_or(MediaStoreError::NotFound)
    }

    async fn delete(&self, filename: &str) -> Result<(), MediaStoreError> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(MediaStoreError::Io("storage backend offline".into()));
        }
        self.objects
            .lock()
            .expect("lock")
            .remove(filename)
            .map(|_| ())
            .ok_or(MediaStoreError::NotFound)
    }

    fn download_url(&self, filename: &str) -> String {
        format!("http://media.test/st_blog/library/{filename}")
    }
}

/// Image generator fake that counts invocations.
pub struct StubGenerator {
    pub generate_calls: AtomicUsize,
    pub download_calls: AtomicUsize,
    pub url: String,
    pub fail_download: AtomicBool,
}

impl Default for StubGenerator {
    fn default() -> Self {
        Self {
            generate_calls: AtomicUsize::new(0),
            download_calls: AtomicUsize::new(0),
            url: "https://upstream.test/out/generated-1.png".to_string(),
            fail_download: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl ImageGenerator for StubGenerator {
    async fn generate(
        &self,
        request: &GenerateImageRequest,
    ) -> Result<GeneratedImage, ImageGenError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        Ok(GeneratedImage {
            url: self.url.clone(),
            prompt: request.prompt.clone(),
            model: request.model,
            size: request.size,
        })
    }

    async fn download(&self, _url: &str) -> Result<Bytes, ImageGenError> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_download.load(Ordering::SeqCst) {
            return Err(ImageGenError::Api {
                status: 410,
                message: "gone".into(),
            });
        }
        Ok(Bytes::from_static(b"png-bytes"))
    }
}

pub fn source_is_generated(record: &ImageRecord) -> bool {
    record.source == ImageSource::Generated
}
