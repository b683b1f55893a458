use anyhow::Context;
use std::sync::Arc;

use crate::error::Result;
use crate::models::{FeedQuery, NewsListItem, Page};
use crate::repository::FeedRepository;
use crate::validators::validate_request;

/// Reads of the per-user feed materialized at publication time
#[derive(Clone)]
pub struct FeedService {
    feed: Arc<dyn FeedRepository>,
}

impl FeedService {
    pub fn new(feed: Arc<dyn FeedRepository>) -> Self {
        Self { feed }
    }

    /// Feed page plus the total for the same `since` filter. The two reads
    /// are independent and may disagree under concurrent publication.
    pub async fn get_feed(&self, user_id: i64, query: FeedQuery) -> Result<Page<NewsListItem>> {
        validate_request(&query)?;

        let items = self
            .feed
            .list_for_user(user_id, &query)
            .await
            .context("FeedService::get_feed")?;
        let total = self
            .feed
            .count_for_user(user_id, query.since)
            .await
            .context("FeedService::get_feed")?;

        Ok(Page { total, items })
    }
}
