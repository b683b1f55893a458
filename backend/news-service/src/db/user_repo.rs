use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::models::{NewUser, User};
use crate::repository::UserRepository;

const USER_COLUMNS: &str = "id, login, password_hash, name, email";

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_where(&self, predicate: &str, value: &str) -> Result<Option<User>, sqlx::Error> {
        let sql = format!("SELECT {} FROM users WHERE {} = $1", USER_COLUMNS, predicate);
        sqlx::query_as::<_, User>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
    }
}

#[async_trait::async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("UserRepository::find_by_id")
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<User>> {
        self.find_where("login", login)
            .await
            .context("UserRepository::find_by_login")
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.find_where("email", email)
            .await
            .context("UserRepository::find_by_email")
    }

    async fn create(&self, user: &NewUser) -> Result<User> {
        let sql = format!(
            r#"
            INSERT INTO users (login, password_hash, name, email)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&user.login)
            .bind(&user.password_hash)
            .bind(&user.name)
            .bind(&user.email)
            .fetch_one(&self.pool)
            .await
            .context("UserRepository::create")
    }
}
