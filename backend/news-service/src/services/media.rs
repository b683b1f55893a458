use anyhow::Context;
use std::sync::Arc;
use tracing::info;

use crate::error::{unique_violation, AppError, Result};
use crate::metrics::news::{record_login, record_toggle};
use crate::models::{
    LoginMediaRequest, Media, MediaListItem, NewMedia, NewsListItem, Page, PageRequest,
    RegisterMediaRequest, SubscriptionState,
};
use crate::repository::{MediaRepository, NewsRepository, SubscriptionRepository};
use crate::security::{hash_password, verify_password};
use crate::validators::validate_request;

use super::users::WRONG_PASSWORD;

pub const MEDIA_EMAIL_TAKEN: &str = "Email is already taken";
pub const MEDIA_NAME_TAKEN: &str = "Name is already taken";
pub const REGISTRATION_NUMBER_TAKEN: &str = "Registration number is already taken";
pub const MEDIA_NOT_FOUND: &str = "Media not found";

/// Media accounts, the media directory and subscriptions to media
#[derive(Clone)]
pub struct MediaService {
    media: Arc<dyn MediaRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    news: Arc<dyn NewsRepository>,
}

impl MediaService {
    pub fn new(
        media: Arc<dyn MediaRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        news: Arc<dyn NewsRepository>,
    ) -> Self {
        Self {
            media,
            subscriptions,
            news,
        }
    }

    pub async fn register(&self, req: RegisterMediaRequest) -> Result<Media> {
        validate_request(&req)?;

        if self
            .media
            .find_by_email(&req.email)
            .await
            .context("MediaService::register")?
            .is_some()
        {
            return Err(AppError::Conflict(MEDIA_EMAIL_TAKEN.to_string()));
        }

        if self
            .media
            .find_by_name(&req.name)
            .await
            .context("MediaService::register")?
            .is_some()
        {
            return Err(AppError::Conflict(MEDIA_NAME_TAKEN.to_string()));
        }

        if self
            .media
            .find_by_registration_number(req.registration_number)
            .await
            .context("MediaService::register")?
            .is_some()
        {
            return Err(AppError::Conflict(REGISTRATION_NUMBER_TAKEN.to_string()));
        }

        let new_media = NewMedia {
            password_hash: hash_password(&req.password).context("MediaService::register")?,
            registration_number: req.registration_number,
            name: req.name,
            email: req.email,
            editor: req.editor,
        };

        match self.media.create(&new_media).await {
            Ok(media) => {
                info!(
                    media_id = media.id,
                    registration_number = media.registration_number,
                    "Media registered"
                );
                Ok(media)
            }
            Err(err) => match unique_violation(&err) {
                Some(constraint) if constraint.contains("email") => {
                    Err(AppError::Conflict(MEDIA_EMAIL_TAKEN.to_string()))
                }
                Some(constraint) if constraint.contains("name") => {
                    Err(AppError::Conflict(MEDIA_NAME_TAKEN.to_string()))
                }
                Some(_) => Err(AppError::Conflict(REGISTRATION_NUMBER_TAKEN.to_string())),
                None => Err(err.context("MediaService::register").into()),
            },
        }
    }

    pub async fn login(&self, req: LoginMediaRequest) -> Result<Media> {
        let media = self
            .media
            .find_by_registration_number(req.registration_number)
            .await
            .context("MediaService::login")?
            .ok_or_else(|| {
                record_login("media", "unknown");
                AppError::NotFound(MEDIA_NOT_FOUND.to_string())
            })?;

        if !verify_password(&req.password, &media.password_hash).context("MediaService::login")? {
            record_login("media", "wrong_password");
            return Err(AppError::Unauthorized(WRONG_PASSWORD.to_string()));
        }

        record_login("media", "success");
        Ok(media)
    }

    pub async fn authenticate(&self, media_id: i64) -> Result<Media> {
        self.media
            .find_by_id(media_id)
            .await
            .context("MediaService::authenticate")?
            .ok_or_else(|| AppError::NotFound(MEDIA_NOT_FOUND.to_string()))
    }

    pub async fn list(&self, page: PageRequest) -> Result<Page<MediaListItem>> {
        validate_request(&page)?;

        let items = self.media.list(page).await.context("MediaService::list")?;
        let total = self.media.count().await.context("MediaService::list")?;

        Ok(Page { total, items })
    }

    pub async fn toggle_subscription(
        &self,
        media_id: i64,
        user_id: i64,
    ) -> Result<SubscriptionState> {
        if self
            .media
            .find_by_id(media_id)
            .await
            .context("MediaService::toggle_subscription")?
            .is_none()
        {
            return Err(AppError::NotFound(MEDIA_NOT_FOUND.to_string()));
        }

        let is_subscribed = self
            .subscriptions
            .toggle(media_id, user_id)
            .await
            .context("MediaService::toggle_subscription")?;

        record_toggle("subscription", is_subscribed);
        info!(media_id, user_id, is_subscribed, "Subscription toggled");

        Ok(SubscriptionState { is_subscribed })
    }

    /// News of one media, with `isFavorite` computed for `viewer`.
    pub async fn news_list(
        &self,
        media_id: i64,
        viewer: Option<i64>,
        page: PageRequest,
    ) -> Result<Page<NewsListItem>> {
        validate_request(&page)?;

        let items = self
            .news
            .list_by_media(media_id, viewer, page)
            .await
            .context("MediaService::news_list")?;
        let total = self
            .news
            .count_by_media(media_id)
            .await
            .context("MediaService::news_list")?;

        Ok(Page { total, items })
    }
}
