/// Personal listings of the signed-in reader
use actix_web::{web, HttpResponse};

use super::ok;
use crate::error::Result;
use crate::middleware::UserSession;
use crate::models::{FeedQuery, PageRequest};
use crate::AppState;

/// News delivered to the reader's feed, oldest first
///
/// Query: `since` (epoch seconds), `limit`, `offset`
pub async fn get_feed(
    state: web::Data<AppState>,
    session: UserSession,
    query: web::Query<FeedQuery>,
) -> Result<HttpResponse> {
    let page = state.feed.get_feed(session.0, query.into_inner()).await?;
    Ok(ok(page))
}

pub async fn favorite_list(
    state: web::Data<AppState>,
    session: UserSession,
    query: web::Query<PageRequest>,
) -> Result<HttpResponse> {
    let page = state
        .news
        .favorite_list(session.0, query.into_inner())
        .await?;

    Ok(ok(page))
}
