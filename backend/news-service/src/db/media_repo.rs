use anyhow::{Context, Result};
use sqlx::{PgPool, Row};

use super::MEDIA_ITEM_COLUMNS;
use crate::models::{Media, MediaListItem, NewMedia, PageRequest};
use crate::repository::MediaRepository;

const MEDIA_COLUMNS: &str = r#"
    id, registration_number, name, email, editor_first_name, editor_last_name, password_hash
"#;

#[derive(Clone)]
pub struct PgMediaRepository {
    pool: PgPool,
}

impl PgMediaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_by_text(&self, column: &str, value: &str) -> Result<Option<Media>, sqlx::Error> {
        let sql = format!("SELECT {} FROM media WHERE {} = $1", MEDIA_COLUMNS, column);
        sqlx::query_as::<_, Media>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_by_number(&self, column: &str, value: i64) -> Result<Option<Media>, sqlx::Error> {
        let sql = format!("SELECT {} FROM media WHERE {} = $1", MEDIA_COLUMNS, column);
        sqlx::query_as::<_, Media>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
    }
}

#[async_trait::async_trait]
impl MediaRepository for PgMediaRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Media>> {
        self.find_by_number("id", id)
            .await
            .context("MediaRepository::find_by_id")
    }

    async fn find_by_registration_number(
        &self,
        registration_number: i64,
    ) -> Result<Option<Media>> {
        self.find_by_number("registration_number", registration_number)
            .await
            .context("MediaRepository::find_by_registration_number")
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Media>> {
        self.find_by_text("name", name)
            .await
            .context("MediaRepository::find_by_name")
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Media>> {
        self.find_by_text("email", email)
            .await
            .context("MediaRepository::find_by_email")
    }

    async fn create(&self, media: &NewMedia) -> Result<Media> {
        let sql = format!(
            r#"
            INSERT INTO media (
                registration_number, name, email, editor_first_name, editor_last_name, password_hash
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            MEDIA_COLUMNS
        );
        sqlx::query_as::<_, Media>(&sql)
            .bind(media.registration_number)
            .bind(&media.name)
            .bind(&media.email)
            .bind(&media.editor.first_name)
            .bind(&media.editor.last_name)
            .bind(&media.password_hash)
            .fetch_one(&self.pool)
            .await
            .context("MediaRepository::create")
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<MediaListItem>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM media m
            ORDER BY m.id
            LIMIT $1 OFFSET $2
            "#,
            MEDIA_ITEM_COLUMNS
        );
        sqlx::query_as::<_, MediaListItem>(&sql)
            .bind(page.limit)
            .bind(page.offset_or_zero())
            .fetch_all(&self.pool)
            .await
            .context("MediaRepository::list")
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM media")
            .fetch_one(&self.pool)
            .await
            .context("MediaRepository::count")?;

        Ok(row.get::<i64, _>("count"))
    }
}
