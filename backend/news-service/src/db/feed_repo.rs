use anyhow::{Context, Result};
use sqlx::{PgExecutor, PgPool, Row};

use super::{news_item_columns, CREATED_AT_EPOCH};
use crate::models::{FeedQuery, NewsListItem};
use crate::repository::FeedRepository;

#[derive(Clone)]
pub struct PgFeedRepository {
    pool: PgPool,
}

impl PgFeedRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Write one feed row per current subscriber of the news' media.
pub(crate) async fn fan_out<'e, E>(executor: E, news_id: i64) -> Result<u64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO feed (news_id, user_id)
        SELECT n.id, s.user_id
        FROM news n
        INNER JOIN media m ON m.registration_number = n.media_registration_number
        INNER JOIN subscriptions s ON s.media_id = m.id
        WHERE n.id = $1
        "#,
    )
    .bind(news_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

#[async_trait::async_trait]
impl FeedRepository for PgFeedRepository {
    async fn list_for_user(&self, user_id: i64, query: &FeedQuery) -> Result<Vec<NewsListItem>> {
        let sql = format!(
            r#"
            SELECT {columns}
            FROM feed fd
            INNER JOIN news n ON n.id = fd.news_id
            INNER JOIN media m ON m.registration_number = n.media_registration_number
            WHERE fd.user_id = $1
              AND ($2::BIGINT IS NULL OR {created_at} >= $2::BIGINT)
            ORDER BY n.created_at ASC, n.id ASC
            LIMIT $3 OFFSET $4
            "#,
            columns = news_item_columns(1),
            created_at = CREATED_AT_EPOCH,
        );
        let page = query.page();
        sqlx::query_as::<_, NewsListItem>(&sql)
            .bind(user_id)
            .bind(query.since)
            .bind(page.limit)
            .bind(page.offset_or_zero())
            .fetch_all(&self.pool)
            .await
            .context("FeedRepository::list_for_user")
    }

    async fn count_for_user(&self, user_id: i64, since: Option<i64>) -> Result<i64> {
        let sql = format!(
            r#"
            SELECT COUNT(*) AS count
            FROM feed fd
            INNER JOIN news n ON n.id = fd.news_id
            WHERE fd.user_id = $1
              AND ($2::BIGINT IS NULL OR {} >= $2::BIGINT)
            "#,
            CREATED_AT_EPOCH
        );
        let row = sqlx::query(&sql)
            .bind(user_id)
            .bind(since)
            .fetch_one(&self.pool)
            .await
            .context("FeedRepository::count_for_user")?;

        Ok(row.get::<i64, _>("count"))
    }
}
