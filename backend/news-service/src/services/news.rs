use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::metrics::news::{record_publication, record_toggle, record_upload};
use crate::models::{
    CreateNewsRequest, FavoriteState, News, NewsDraft, NewsListItem, Page, PageRequest,
};
use crate::repository::{FavoriteRepository, NewsRepository};
use crate::storage::{BlobKind, MediaBlobs};
use crate::validators::validate_request;

use super::media::MEDIA_NOT_FOUND;

pub const NEWS_NOT_FOUND: &str = "News not found";
pub const FILE_NOT_FOUND: &str = "File not found";
pub const INSUFFICIENT_PERMISSIONS: &str = "Insufficient permissions for this operation";

/// Publication, single-news reads, favorites and attachments
#[derive(Clone)]
pub struct NewsService {
    news: Arc<dyn NewsRepository>,
    favorites: Arc<dyn FavoriteRepository>,
    blobs: MediaBlobs,
}

impl NewsService {
    pub fn new(
        news: Arc<dyn NewsRepository>,
        favorites: Arc<dyn FavoriteRepository>,
        blobs: MediaBlobs,
    ) -> Self {
        Self {
            news,
            favorites,
            blobs,
        }
    }

    /// Publish news for `media_id` and deliver it to the feed of every current
    /// subscriber. Both writes commit together or not at all.
    pub async fn create(&self, media_id: i64, req: CreateNewsRequest) -> Result<News> {
        validate_request(&req)?;

        let draft = NewsDraft {
            media_id,
            title: req.title,
            text: req.text,
        };

        let mut tx = self.news.begin().await.context("NewsService::create")?;

        let news = tx
            .insert_news(&draft)
            .await
            .context("NewsService::create")?
            .ok_or_else(|| AppError::NotFound(MEDIA_NOT_FOUND.to_string()))?;

        let delivered = tx
            .fan_out(news.id)
            .await
            .context("NewsService::create")?;

        tx.commit().await.context("NewsService::create")?;

        record_publication(delivered);
        info!(
            news_id = news.id,
            media_id,
            subscribers = delivered,
            "News published"
        );

        Ok(news)
    }

    pub async fn get(&self, news_id: i64, viewer: Option<i64>) -> Result<NewsListItem> {
        self.news
            .find_by_id(news_id, viewer)
            .await
            .context("NewsService::get")?
            .ok_or_else(|| AppError::NotFound(NEWS_NOT_FOUND.to_string()))
    }

    pub async fn toggle_favorite(&self, user_id: i64, news_id: i64) -> Result<FavoriteState> {
        if self
            .news
            .find_by_id(news_id, None)
            .await
            .context("NewsService::toggle_favorite")?
            .is_none()
        {
            return Err(AppError::NotFound(NEWS_NOT_FOUND.to_string()));
        }

        let is_favorite = self
            .favorites
            .toggle(user_id, news_id)
            .await
            .context("NewsService::toggle_favorite")?;

        record_toggle("favorite", is_favorite);
        info!(user_id, news_id, is_favorite, "Favorite toggled");

        Ok(FavoriteState { is_favorite })
    }

    pub async fn favorite_list(&self, user_id: i64, page: PageRequest) -> Result<Page<NewsListItem>> {
        validate_request(&page)?;

        let items = self
            .favorites
            .list_for_user(user_id, page)
            .await
            .context("NewsService::favorite_list")?;
        let total = self
            .favorites
            .count_for_user(user_id)
            .await
            .context("NewsService::favorite_list")?;

        Ok(Page { total, items })
    }

    /// Replace the `kind` attachment of a news item. Only the media that
    /// published the news may do so; otherwise the stored blob is untouched.
    pub async fn put_attachment(
        &self,
        kind: BlobKind,
        news_id: i64,
        media_id: i64,
        data: &[u8],
    ) -> Result<()> {
        let news = self
            .news
            .find_by_id(news_id, None)
            .await
            .context("NewsService::put_attachment")?
            .ok_or_else(|| AppError::NotFound(NEWS_NOT_FOUND.to_string()))?;

        if news.media.id != media_id {
            record_upload(kind.as_str(), "forbidden");
            warn!(
                news_id,
                media_id,
                owner_id = news.media.id,
                kind = kind.as_str(),
                "Attachment upload rejected for non-owner"
            );
            return Err(AppError::Unauthorized(INSUFFICIENT_PERMISSIONS.to_string()));
        }

        if let Err(err) = self
            .blobs
            .store_for(kind)
            .store(&kind.key_for(news_id), data)
            .await
        {
            record_upload(kind.as_str(), "error");
            return Err(err.context("NewsService::put_attachment").into());
        }

        record_upload(kind.as_str(), "stored");
        info!(news_id, kind = kind.as_str(), bytes = data.len(), "Attachment stored");
        Ok(())
    }

    pub async fn get_attachment(&self, kind: BlobKind, news_id: i64) -> Result<Vec<u8>> {
        if self
            .news
            .find_by_id(news_id, None)
            .await
            .context("NewsService::get_attachment")?
            .is_none()
        {
            return Err(AppError::NotFound(NEWS_NOT_FOUND.to_string()));
        }

        self.blobs
            .store_for(kind)
            .get(&kind.key_for(news_id))
            .await
            .context("NewsService::get_attachment")?
            .ok_or_else(|| AppError::NotFound(FILE_NOT_FOUND.to_string()))
    }
}
