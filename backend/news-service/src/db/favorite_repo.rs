use anyhow::{Context, Result};
use sqlx::{PgPool, Row};
use tracing::debug;

use super::{news_item_columns, toggle_membership};
use crate::models::{NewsListItem, PageRequest};
use crate::repository::FavoriteRepository;

#[derive(Clone)]
pub struct PgFavoriteRepository {
    pool: PgPool,
}

impl PgFavoriteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl FavoriteRepository for PgFavoriteRepository {
    async fn exists(&self, user_id: i64, news_id: i64) -> Result<bool> {
        let row = sqlx::query(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM favorites WHERE user_id = $1 AND news_id = $2
            ) AS present
            "#,
        )
        .bind(user_id)
        .bind(news_id)
        .fetch_one(&self.pool)
        .await
        .context("FavoriteRepository::exists")?;

        Ok(row.get::<bool, _>("present"))
    }

    async fn toggle(&self, user_id: i64, news_id: i64) -> Result<bool> {
        let present = toggle_membership(
            &self.pool,
            user_id,
            "DELETE FROM favorites WHERE user_id = $1 AND news_id = $2",
            "INSERT INTO favorites (user_id, news_id) VALUES ($1, $2)",
            user_id,
            news_id,
        )
        .await
        .context("FavoriteRepository::toggle")?;

        debug!(user_id, news_id, present, "Favorite toggled");
        Ok(present)
    }

    async fn list_for_user(&self, user_id: i64, page: PageRequest) -> Result<Vec<NewsListItem>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM favorites fav
            INNER JOIN news n ON n.id = fav.news_id
            INNER JOIN media m ON m.registration_number = n.media_registration_number
            WHERE fav.user_id = $1
            ORDER BY n.created_at ASC, n.id ASC
            LIMIT $2 OFFSET $3
            "#,
            news_item_columns(1)
        );
        sqlx::query_as::<_, NewsListItem>(&sql)
            .bind(user_id)
            .bind(page.limit)
            .bind(page.offset_or_zero())
            .fetch_all(&self.pool)
            .await
            .context("FavoriteRepository::list_for_user")
    }

    async fn count_for_user(&self, user_id: i64) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM favorites WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .context("FavoriteRepository::count_for_user")?;

        Ok(row.get::<i64, _>("count"))
    }
}
