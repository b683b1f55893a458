use anyhow::Context;
use std::sync::Arc;
use tracing::info;

use crate::error::{unique_violation, AppError, Result};
use crate::metrics::news::record_login;
use crate::models::{
    LoginUserRequest, MediaListItem, NewUser, Page, PageRequest, RegisterUserRequest, User,
};
use crate::repository::{SubscriptionRepository, UserRepository};
use crate::security::{hash_password, verify_password};
use crate::validators::validate_request;

pub const LOGIN_TAKEN: &str = "Login is already taken";
pub const EMAIL_TAKEN: &str = "Email is already taken";
pub const USER_NOT_FOUND: &str = "User not found";
pub const WRONG_PASSWORD: &str = "Wrong password";

/// Reader accounts: registration, login, session refresh, subscriptions
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
    ) -> Self {
        Self {
            users,
            subscriptions,
        }
    }

    pub async fn register(&self, req: RegisterUserRequest) -> Result<User> {
        validate_request(&req)?;

        if self
            .users
            .find_by_login(&req.login)
            .await
            .context("UserService::register")?
            .is_some()
        {
            return Err(AppError::Conflict(LOGIN_TAKEN.to_string()));
        }

        if self
            .users
            .find_by_email(&req.email)
            .await
            .context("UserService::register")?
            .is_some()
        {
            return Err(AppError::Conflict(EMAIL_TAKEN.to_string()));
        }

        let new_user = NewUser {
            password_hash: hash_password(&req.password).context("UserService::register")?,
            login: req.login,
            name: req.name,
            email: req.email,
        };

        match self.users.create(&new_user).await {
            Ok(user) => {
                info!(user_id = user.id, login = %user.login, "User registered");
                Ok(user)
            }
            Err(err) => match unique_violation(&err) {
                Some(constraint) if constraint.contains("email") => {
                    Err(AppError::Conflict(EMAIL_TAKEN.to_string()))
                }
                Some(_) => Err(AppError::Conflict(LOGIN_TAKEN.to_string())),
                None => Err(err.context("UserService::register").into()),
            },
        }
    }

    pub async fn login(&self, req: LoginUserRequest) -> Result<User> {
        let user = self
            .users
            .find_by_login(&req.login)
            .await
            .context("UserService::login")?
            .ok_or_else(|| {
                record_login("user", "unknown");
                AppError::NotFound(USER_NOT_FOUND.to_string())
            })?;

        if !verify_password(&req.password, &user.password_hash).context("UserService::login")? {
            record_login("user", "wrong_password");
            return Err(AppError::Unauthorized(WRONG_PASSWORD.to_string()));
        }

        record_login("user", "success");
        Ok(user)
    }

    /// Re-fetch the user behind a session.
    pub async fn authenticate(&self, user_id: i64) -> Result<User> {
        self.users
            .find_by_id(user_id)
            .await
            .context("UserService::authenticate")?
            .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.to_string()))
    }

    pub async fn subscription_list(
        &self,
        user_id: i64,
        page: PageRequest,
    ) -> Result<Page<MediaListItem>> {
        validate_request(&page)?;

        let items = self
            .subscriptions
            .list_for_user(user_id, page)
            .await
            .context("UserService::subscription_list")?;
        let total = self
            .subscriptions
            .count_for_user(user_id)
            .await
            .context("UserService::subscription_list")?;

        Ok(Page { total, items })
    }
}
