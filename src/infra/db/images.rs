use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{
    ImagesRepo, ImagesWriteRepo, NewImageParams, RepoError,
};
use crate::domain::entities::ImageRecord;
use crate::domain::types::ImageSource;

use super::{PostgresRepositories, map_sqlx_error};

const IMAGE_COLUMNS: &str = "id, url, filename, prompt, source, created_at";

#[derive(sqlx::FromRow)]
struct ImageRow {
    id: Uuid,
    url: String,
    filename: String,
    prompt: Option<String>,
    source: String,
    created_at: OffsetDateTime,
}

impl TryFrom<ImageRow> for ImageRecord {
    type Error = RepoError;

    fn try_from(row: ImageRow) -> Result<Self, Self::Error> {
        let source = ImageSource::try_from(row.source.as_str()).map_err(|()| {
            RepoError::from_persistence(format!("unknown image source `{}`", row.source))
        })?;
        Ok(Self {
            id: row.id,
            url: row.url,
            filename: row.filename,
            prompt: row.prompt,
            source,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl ImagesRepo for PostgresRepositories {
    async fn list_images(&self) -> Result<Vec<ImageRecord>, RepoError> {
        let sql = format!(
            "SELECT {IMAGE_COLUMNS} FROM st_blog_images ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, ImageRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        rows.into_iter().map(ImageRecord::try_from).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ImageRecord>, RepoError> {
        let sql = format!("SELECT {IMAGE_COLUMNS} FROM st_blog_images WHERE id = $1");
        let row = sqlx::query_as::<_, ImageRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        row.map(ImageRecord::try_from).transpose()
    }
}

#[async_trait]
impl ImagesWriteRepo for PostgresRepositories {
    async fn create_image(&self, params: NewImageParams) -> Result<ImageRecord, RepoError> {
        let id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();
        let sql = format!(
            "INSERT INTO st_blog_images (id, url, filename, prompt, source, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {IMAGE_COLUMNS}"
        );

        let row = sqlx::query_as::<_, ImageRow>(&sql)
            .bind(id)
            .bind(&params.url)
            .bind(&params.filename)
            .bind(&params.prompt)
            .bind(params.source.as_str())
            .bind(now)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        ImageRecord::try_from(row)
    }

    async fn delete_image(&self, id: Uuid) -> Result<(), RepoError> {
        sqlx::query("DELETE FROM st_blog_images WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }
}
