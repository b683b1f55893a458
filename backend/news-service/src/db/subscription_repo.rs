use anyhow::{Context, Result};
use sqlx::{PgPool, Row};
use tracing::debug;

use super::{toggle_membership, MEDIA_ITEM_COLUMNS};
use crate::models::{MediaListItem, PageRequest};
use crate::repository::SubscriptionRepository;

#[derive(Clone)]
pub struct PgSubscriptionRepository {
    pool: PgPool,
}

impl PgSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    async fn exists(&self, media_id: i64, user_id: i64) -> Result<bool> {
        let row = sqlx::query(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM subscriptions WHERE media_id = $1 AND user_id = $2
            ) AS present
            "#,
        )
        .bind(media_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .context("SubscriptionRepository::exists")?;

        Ok(row.get::<bool, _>("present"))
    }

    async fn toggle(&self, media_id: i64, user_id: i64) -> Result<bool> {
        let present = toggle_membership(
            &self.pool,
            user_id,
            "DELETE FROM subscriptions WHERE media_id = $1 AND user_id = $2",
            "INSERT INTO subscriptions (media_id, user_id) VALUES ($1, $2)",
            media_id,
            user_id,
        )
        .await
        .context("SubscriptionRepository::toggle")?;

        debug!(media_id, user_id, present, "Subscription toggled");
        Ok(present)
    }

    async fn list_for_user(&self, user_id: i64, page: PageRequest) -> Result<Vec<MediaListItem>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM subscriptions sub
            INNER JOIN media m ON m.id = sub.media_id
            WHERE sub.user_id = $1
            ORDER BY m.id
            LIMIT $2 OFFSET $3
            "#,
            MEDIA_ITEM_COLUMNS
        );
        sqlx::query_as::<_, MediaListItem>(&sql)
            .bind(user_id)
            .bind(page.limit)
            .bind(page.offset_or_zero())
            .fetch_all(&self.pool)
            .await
            .context("SubscriptionRepository::list_for_user")
    }

    async fn count_for_user(&self, user_id: i64) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM subscriptions WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .context("SubscriptionRepository::count_for_user")?;

        Ok(row.get::<i64, _>("count"))
    }
}
