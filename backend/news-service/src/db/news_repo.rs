use anyhow::{anyhow, Context, Result};
use sqlx::{PgExecutor, PgPool, Postgres, Row, Transaction};

use super::{feed_repo, news_item_columns};
use crate::models::{News, NewsDraft, NewsListItem, PageRequest};
use crate::repository::{NewsRepository, PublishTransaction};

#[derive(Clone)]
pub struct PgNewsRepository {
    pool: PgPool,
}

impl PgNewsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Insert a news row for the draft's media, resolving its registration number.
/// Returns `None` when the media does not exist.
pub(crate) async fn insert_news<'e, E>(
    executor: E,
    draft: &NewsDraft,
) -> Result<Option<News>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, News>(
        r#"
        INSERT INTO news (media_registration_number, title, text)
        SELECT m.registration_number, $2, $3
        FROM media m
        WHERE m.id = $1
        RETURNING id, media_registration_number, title, text,
                  FLOOR(EXTRACT(EPOCH FROM created_at))::BIGINT AS created_at
        "#,
    )
    .bind(draft.media_id)
    .bind(&draft.title)
    .bind(&draft.text)
    .fetch_optional(executor)
    .await
}

#[async_trait::async_trait]
impl NewsRepository for PgNewsRepository {
    async fn begin(&self) -> Result<Box<dyn PublishTransaction>> {
        let tx = self
            .pool
            .begin()
            .await
            .context("NewsRepository::begin")?;

        Ok(Box::new(PgPublishTransaction { tx: Some(tx) }))
    }

    async fn find_by_id(&self, news_id: i64, viewer: Option<i64>) -> Result<Option<NewsListItem>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM news n
            INNER JOIN media m ON m.registration_number = n.media_registration_number
            WHERE n.id = $1
            "#,
            news_item_columns(2)
        );
        sqlx::query_as::<_, NewsListItem>(&sql)
            .bind(news_id)
            .bind(viewer)
            .fetch_optional(&self.pool)
            .await
            .context("NewsRepository::find_by_id")
    }

    async fn list_by_media(
        &self,
        media_id: i64,
        viewer: Option<i64>,
        page: PageRequest,
    ) -> Result<Vec<NewsListItem>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM news n
            INNER JOIN media m ON m.registration_number = n.media_registration_number
            WHERE m.id = $1
            ORDER BY n.created_at ASC, n.id ASC
            LIMIT $3 OFFSET $4
            "#,
            news_item_columns(2)
        );
        sqlx::query_as::<_, NewsListItem>(&sql)
            .bind(media_id)
            .bind(viewer)
            .bind(page.limit)
            .bind(page.offset_or_zero())
            .fetch_all(&self.pool)
            .await
            .context("NewsRepository::list_by_media")
    }

    async fn count_by_media(&self, media_id: i64) -> Result<i64> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS count
            FROM news n
            INNER JOIN media m ON m.registration_number = n.media_registration_number
            WHERE m.id = $1
            "#,
        )
        .bind(media_id)
        .fetch_one(&self.pool)
        .await
        .context("NewsRepository::count_by_media")?;

        Ok(row.get::<i64, _>("count"))
    }
}

/// Transaction-backed publish handle. Rolls back on drop unless committed.
pub struct PgPublishTransaction {
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgPublishTransaction {
    fn tx(&mut self) -> Result<&mut Transaction<'static, Postgres>> {
        self.tx
            .as_mut()
            .ok_or_else(|| anyhow!("publish transaction already committed"))
    }
}

#[async_trait::async_trait]
impl PublishTransaction for PgPublishTransaction {
    async fn insert_news(&mut self, draft: &NewsDraft) -> Result<Option<News>> {
        let tx = self.tx()?;
        insert_news(&mut **tx, draft)
            .await
            .context("NewsRepository::insert_news")
    }

    async fn fan_out(&mut self, news_id: i64) -> Result<u64> {
        let tx = self.tx()?;
        feed_repo::fan_out(&mut **tx, news_id)
            .await
            .context("FeedRepository::fan_out")
    }

    async fn commit(&mut self) -> Result<()> {
        let tx = self
            .tx
            .take()
            .ok_or_else(|| anyhow!("publish transaction already committed"))?;
        tx.commit().await.context("NewsRepository::commit")
    }
}
