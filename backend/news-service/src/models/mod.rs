/// Data models for news-service
///
/// - `user`: reader accounts
/// - `media`: publishing outlets and their editors
/// - `news`: articles and the joined list item used by every news listing
///
/// Pagination types shared by all listings live here.
pub mod media;
pub mod news;
pub mod user;

pub use media::*;
pub use news::*;
pub use user::*;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validators::OrderedValidation;

/// One page of a listing plus the unpaginated total.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub total: i64,
    pub items: Vec<T>,
}

/// `limit` / `offset` query parameters. Absent limit means no limit.
#[derive(Debug, Clone, Copy, Default, Deserialize, Validate)]
pub struct PageRequest {
    #[validate(range(min = 0, message = "Limit must not be negative"))]
    pub limit: Option<i64>,
    #[validate(range(min = 0, message = "Offset must not be negative"))]
    pub offset: Option<i64>,
}

impl OrderedValidation for PageRequest {
    const FIELD_ORDER: &'static [&'static str] = &["limit", "offset"];
}

impl PageRequest {
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self { limit, offset }
    }

    /// Offset with the absent case resolved to zero.
    pub fn offset_or_zero(&self) -> i64 {
        self.offset.unwrap_or(0)
    }
}

/// Feed query: an optional release-time lower bound plus pagination.
#[derive(Debug, Clone, Copy, Default, Deserialize, Validate)]
pub struct FeedQuery {
    /// Epoch seconds; only news released at or after this instant
    pub since: Option<i64>,
    #[validate(range(min = 0, message = "Limit must not be negative"))]
    pub limit: Option<i64>,
    #[validate(range(min = 0, message = "Offset must not be negative"))]
    pub offset: Option<i64>,
}

impl OrderedValidation for FeedQuery {
    const FIELD_ORDER: &'static [&'static str] = &["limit", "offset"];
}

impl FeedQuery {
    pub fn page(&self) -> PageRequest {
        PageRequest::new(self.limit, self.offset)
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionState {
    pub is_subscribed: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteState {
    pub is_favorite: bool,
}
