/// Media account and directory handlers
use actix_web::{web, HttpResponse};

use super::{ok, DataResponse};
use crate::error::Result;
use crate::middleware::{
    MediaSession, OptionalUserSession, Principal, SessionManager, UserSession,
};
use crate::models::{LoginMediaRequest, PageRequest, RegisterMediaRequest};
use crate::AppState;

pub async fn register(
    state: web::Data<AppState>,
    sessions: web::Data<SessionManager>,
    req: web::Json<RegisterMediaRequest>,
) -> Result<HttpResponse> {
    let media = state.media.register(req.into_inner()).await?;
    let cookie = sessions.issue(Principal::Media, media.id)?;

    Ok(HttpResponse::Created()
        .cookie(cookie)
        .json(DataResponse { data: media }))
}

pub async fn login(
    state: web::Data<AppState>,
    sessions: web::Data<SessionManager>,
    req: web::Json<LoginMediaRequest>,
) -> Result<HttpResponse> {
    let media = state.media.login(req.into_inner()).await?;
    let cookie = sessions.issue(Principal::Media, media.id)?;

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(DataResponse { data: media }))
}

pub async fn logout(sessions: web::Data<SessionManager>) -> HttpResponse {
    HttpResponse::NoContent()
        .cookie(sessions.removal(Principal::Media))
        .finish()
}

pub async fn authenticate(
    state: web::Data<AppState>,
    sessions: web::Data<SessionManager>,
    session: MediaSession,
) -> Result<HttpResponse> {
    let media = state.media.authenticate(session.0).await?;
    let cookie = sessions.issue(Principal::Media, media.id)?;

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(DataResponse { data: media }))
}

/// Every media outlet with its subscriber count
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<PageRequest>,
) -> Result<HttpResponse> {
    let page = state.media.list(query.into_inner()).await?;
    Ok(ok(page))
}

pub async fn news_list(
    state: web::Data<AppState>,
    media_id: web::Path<i64>,
    viewer: OptionalUserSession,
    query: web::Query<PageRequest>,
) -> Result<HttpResponse> {
    let page = state
        .media
        .news_list(media_id.into_inner(), viewer.0, query.into_inner())
        .await?;

    Ok(ok(page))
}

pub async fn toggle_subscription(
    state: web::Data<AppState>,
    media_id: web::Path<i64>,
    session: UserSession,
) -> Result<HttpResponse> {
    let result = state
        .media
        .toggle_subscription(media_id.into_inner(), session.0)
        .await?;

    Ok(ok(result))
}
