/// PostgreSQL implementations of the repository traits
pub mod favorite_repo;
pub mod feed_repo;
pub mod media_repo;
pub mod news_repo;
pub mod subscription_repo;
pub mod user_repo;

pub use favorite_repo::PgFavoriteRepository;
pub use feed_repo::PgFeedRepository;
pub use media_repo::PgMediaRepository;
pub use news_repo::{PgNewsRepository, PgPublishTransaction};
pub use subscription_repo::PgSubscriptionRepository;
pub use user_repo::PgUserRepository;

use sqlx::migrate::Migrator;
use sqlx::PgPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Release time in whole epoch seconds.
pub(crate) const CREATED_AT_EPOCH: &str = "FLOOR(EXTRACT(EPOCH FROM n.created_at))::BIGINT";

/// Select list producing a `NewsListItem` from `news n JOIN media m`.
/// `viewer_param` is the bind position holding the viewing user id (or NULL).
pub(crate) fn news_item_columns(viewer_param: u8) -> String {
    format!(
        r#"
        n.id,
        m.id AS media_id,
        m.registration_number AS media_registration_number,
        m.name AS media_name,
        m.email AS media_email,
        m.editor_first_name AS media_editor_first_name,
        m.editor_last_name AS media_editor_last_name,
        (SELECT COUNT(*) FROM subscriptions s WHERE s.media_id = m.id) AS media_subscription_count,
        n.title,
        n.text,
        EXISTS (
            SELECT 1 FROM favorites f WHERE f.user_id = ${viewer} AND f.news_id = n.id
        ) AS is_favorite,
        {created_at} AS created_at
        "#,
        viewer = viewer_param,
        created_at = CREATED_AT_EPOCH,
    )
}

/// Select list producing a `MediaListItem` from `media m`.
pub(crate) const MEDIA_ITEM_COLUMNS: &str = r#"
    m.id,
    m.registration_number,
    m.name,
    m.email,
    m.editor_first_name,
    m.editor_last_name,
    (SELECT COUNT(*) FROM subscriptions s WHERE s.media_id = m.id) AS subscription_count
"#;

/// Flip a membership row keyed by `(first, second)` and report whether it is
/// present afterwards.
///
/// The owning user row is held `FOR NO KEY UPDATE` until commit, so toggles
/// by the same user run one after another and each observes the last one's
/// result. Foreign key checks only take `KEY SHARE` and are not blocked.
pub(crate) async fn toggle_membership(
    pool: &PgPool,
    user_id: i64,
    delete_sql: &str,
    insert_sql: &str,
    first: i64,
    second: i64,
) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT 1 FROM users WHERE id = $1 FOR NO KEY UPDATE")
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

    let removed = sqlx::query(delete_sql)
        .bind(first)
        .bind(second)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if removed == 0 {
        sqlx::query(insert_sql)
            .bind(first)
            .bind(second)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(removed == 0)
}
