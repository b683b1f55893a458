/// Storage seams for news-service.
///
/// One trait per entity. The Postgres implementations live in `crate::db`;
/// tests substitute in-memory implementations.
use anyhow::Result;

use crate::models::{
    FeedQuery, Media, MediaListItem, NewMedia, NewUser, News, NewsDraft, NewsListItem,
    PageRequest, User,
};

#[async_trait::async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;

    async fn find_by_login(&self, login: &str) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Insert a user. Fails with a unique violation if login or email exist.
    async fn create(&self, user: &NewUser) -> Result<User>;
}

#[async_trait::async_trait]
pub trait MediaRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Media>>;

    async fn find_by_registration_number(&self, registration_number: i64)
        -> Result<Option<Media>>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Media>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Media>>;

    async fn create(&self, media: &NewMedia) -> Result<Media>;

    /// All media ordered by id, with subscriber counts
    async fn list(&self, page: PageRequest) -> Result<Vec<MediaListItem>>;

    async fn count(&self) -> Result<i64>;
}

#[async_trait::async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn exists(&self, media_id: i64, user_id: i64) -> Result<bool>;

    /// Flip membership of the pair. Returns the membership after the call.
    /// Concurrent toggles of one pair serialize, so each call flips once.
    async fn toggle(&self, media_id: i64, user_id: i64) -> Result<bool>;

    /// Media the user is subscribed to, ordered by media id
    async fn list_for_user(&self, user_id: i64, page: PageRequest) -> Result<Vec<MediaListItem>>;

    async fn count_for_user(&self, user_id: i64) -> Result<i64>;
}

#[async_trait::async_trait]
pub trait NewsRepository: Send + Sync {
    /// Open the publish unit of work.
    async fn begin(&self) -> Result<Box<dyn PublishTransaction>>;

    async fn find_by_id(&self, news_id: i64, viewer: Option<i64>) -> Result<Option<NewsListItem>>;

    /// News of one media by release time ascending
    async fn list_by_media(
        &self,
        media_id: i64,
        viewer: Option<i64>,
        page: PageRequest,
    ) -> Result<Vec<NewsListItem>>;

    async fn count_by_media(&self, media_id: i64) -> Result<i64>;
}

/// Publication unit of work. Dropping the handle without `commit` discards
/// everything written through it.
#[async_trait::async_trait]
pub trait PublishTransaction: Send {
    /// Insert the news row. `None` when the draft's media does not exist.
    async fn insert_news(&mut self, draft: &NewsDraft) -> Result<Option<News>>;

    /// Add the news to the feed of every current subscriber of its media.
    /// Returns the number of feed rows written.
    async fn fan_out(&mut self, news_id: i64) -> Result<u64>;

    async fn commit(&mut self) -> Result<()>;
}

#[async_trait::async_trait]
pub trait FeedRepository: Send + Sync {
    /// Feed items by release time ascending, ties broken by news id
    async fn list_for_user(&self, user_id: i64, query: &FeedQuery) -> Result<Vec<NewsListItem>>;

    async fn count_for_user(&self, user_id: i64, since: Option<i64>) -> Result<i64>;
}

#[async_trait::async_trait]
pub trait FavoriteRepository: Send + Sync {
    async fn exists(&self, user_id: i64, news_id: i64) -> Result<bool>;

    /// Flip membership of the pair. Returns the membership after the call.
    /// Concurrent toggles of one pair serialize, so each call flips once.
    async fn toggle(&self, user_id: i64, news_id: i64) -> Result<bool>;

    /// Favorited news by release time ascending
    async fn list_for_user(&self, user_id: i64, page: PageRequest) -> Result<Vec<NewsListItem>>;

    async fn count_for_user(&self, user_id: i64) -> Result<i64>;
}
