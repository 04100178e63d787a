use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{
    CreatePostParams, PostListScope, PostsRepo, PostsWriteRepo, RepoError, UpdatePostParams,
    UpdatePublishStateParams,
};
use crate::domain::entities::PostRecord;
use crate::domain::types::PublishState;

use super::{PostgresRepositories, map_sqlx_error};

const POST_COLUMNS: &str = "id, title, excerpt, content_markdown, cover_image, tags, author, \
     published, published_at, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    title: String,
    excerpt: String,
    content_markdown: String,
    cover_image: Option<String>,
    tags: Vec<String>,
    author: String,
    published: Option<bool>,
    published_at: Option<OffsetDateTime>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<PostRow> for PostRecord {
    fn from(row: PostRow) -> Self {
        // The "absent means visible" rule is applied exactly here.
        let publish_state =
            PublishState::resolve(row.published, row.published_at, row.created_at);
        Self {
            id: row.id,
            title: row.title,
            excerpt: row.excerpt,
            content_markdown: row.content_markdown,
            cover_image: row.cover_image,
            tags: row.tags,
            author: row.author,
            publish_state,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn list_posts(&self, scope: PostListScope) -> Result<Vec<PostRecord>, RepoError> {
        let visibility = match scope {
            PostListScope::Public => " WHERE published IS DISTINCT FROM FALSE",
            PostListScope::Admin => "",
        };
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM st_blog_posts{visibility} \
             ORDER BY published_at DESC NULLS LAST, id DESC"
        );

        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(PostRecord::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM st_blog_posts WHERE id = $1");
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(PostRecord::from))
    }
}

#[async_trait]
impl PostsWriteRepo for PostgresRepositories {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();
        let sql = format!(
            "INSERT INTO st_blog_posts \
                 (id, title, excerpt, content_markdown, cover_image, tags, author, \
                  published, published_at, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10) \
             RETURNING {POST_COLUMNS}"
        );

        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .bind(&params.title)
            .bind(&params.excerpt)
            .bind(&params.content_markdown)
            .bind(&params.cover_image)
            .bind(&params.tags)
            .bind(&params.author)
            .bind(params.published)
            .bind(now)
            .bind(now)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(PostRecord::from(row))
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let now = OffsetDateTime::now_utc();
        let sql = format!(
            "UPDATE st_blog_posts \
                SET title = $2, excerpt = $3, content_markdown = $4, cover_image = $5, \
                    tags = $6, author = $7, published = $8, updated_at = $9 \
              WHERE id = $1 \
             RETURNING {POST_COLUMNS}"
        );

        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(params.id)
            .bind(&params.title)
            .bind(&params.excerpt)
            .bind(&params.content_markdown)
            .bind(&params.cover_image)
            .bind(&params.tags)
            .bind(&params.author)
            .bind(params.published)
            .bind(now)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        row.map(PostRecord::from).ok_or(RepoError::NotFound)
    }

    async fn update_publish_state(
        &self,
        params: UpdatePublishStateParams,
    ) -> Result<PostRecord, RepoError> {
        let sql = format!(
            "UPDATE st_blog_posts \
                SET published = $2, \
                    published_at = COALESCE($3, published_at), \
                    updated_at = $4 \
              WHERE id = $1 \
             RETURNING {POST_COLUMNS}"
        );

        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(params.id)
            .bind(params.published)
            .bind(params.published_at)
            .bind(OffsetDateTime::now_utc())
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        row.map(PostRecord::from).ok_or(RepoError::NotFound)
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), RepoError> {
        // Deleting an already-deleted post is a no-op.
        sqlx::query("DELETE FROM st_blog_posts WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }
}
