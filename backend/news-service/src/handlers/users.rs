/// Reader account handlers
use actix_web::{web, HttpResponse};

use super::{ok, DataResponse};
use crate::error::Result;
use crate::middleware::{Principal, SessionManager, UserSession};
use crate::models::{LoginUserRequest, PageRequest, RegisterUserRequest};
use crate::AppState;

/// Register a reader and open a session (201)
pub async fn register(
    state: web::Data<AppState>,
    sessions: web::Data<SessionManager>,
    req: web::Json<RegisterUserRequest>,
) -> Result<HttpResponse> {
    let user = state.users.register(req.into_inner()).await?;
    let cookie = sessions.issue(Principal::User, user.id)?;

    Ok(HttpResponse::Created()
        .cookie(cookie)
        .json(DataResponse { data: user }))
}

pub async fn login(
    state: web::Data<AppState>,
    sessions: web::Data<SessionManager>,
    req: web::Json<LoginUserRequest>,
) -> Result<HttpResponse> {
    let user = state.users.login(req.into_inner()).await?;
    let cookie = sessions.issue(Principal::User, user.id)?;

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(DataResponse { data: user }))
}

pub async fn logout(sessions: web::Data<SessionManager>) -> HttpResponse {
    HttpResponse::NoContent()
        .cookie(sessions.removal(Principal::User))
        .finish()
}

/// Return the signed-in reader and refresh the session cookie
pub async fn authenticate(
    state: web::Data<AppState>,
    sessions: web::Data<SessionManager>,
    session: UserSession,
) -> Result<HttpResponse> {
    let user = state.users.authenticate(session.0).await?;
    let cookie = sessions.issue(Principal::User, user.id)?;

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(DataResponse { data: user }))
}

pub async fn subscription_list(
    state: web::Data<AppState>,
    user_id: web::Path<i64>,
    query: web::Query<PageRequest>,
) -> Result<HttpResponse> {
    let page = state
        .users
        .subscription_list(user_id.into_inner(), query.into_inner())
        .await?;

    Ok(ok(page))
}
