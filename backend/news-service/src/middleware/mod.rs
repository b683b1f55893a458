/// Request extractors for cookie-backed sessions
///
/// A session is a private (encrypted and authenticated) cookie holding the
/// numeric id of the signed-in user or media account. Handlers declare the
/// principal they need by taking `UserSession`, `MediaSession` or
/// `OptionalUserSession` as an argument.
pub mod session;

pub use session::{Principal, SessionManager};

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use anyhow::anyhow;
use std::future::{ready, Ready};

use crate::error::AppError;

pub const AUTHORIZATION_REQUIRED: &str = "Authorization is required for this operation";

/// Signed-in reader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserSession(pub i64);

/// Signed-in media account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaSession(pub i64);

/// Reader if one is signed in; anonymous requests are allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionalUserSession(pub Option<i64>);

fn session_id(req: &HttpRequest, principal: Principal) -> Result<Option<i64>, AppError> {
    let manager = req
        .app_data::<web::Data<SessionManager>>()
        .ok_or_else(|| AppError::Internal(anyhow!("SessionManager is not registered")))?;
    Ok(manager.read(req, principal))
}

fn required(req: &HttpRequest, principal: Principal) -> Result<i64, AppError> {
    session_id(req, principal)?
        .ok_or_else(|| AppError::Unauthorized(AUTHORIZATION_REQUIRED.to_string()))
}

impl FromRequest for UserSession {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(required(req, Principal::User).map(UserSession))
    }
}

impl FromRequest for MediaSession {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(required(req, Principal::Media).map(MediaSession))
    }
}

impl FromRequest for OptionalUserSession {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(session_id(req, Principal::User).map(OptionalUserSession))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Key;
    use actix_web::test::TestRequest;

    fn manager() -> SessionManager {
        SessionManager::new(Key::generate(), false)
    }

    #[actix_web::test]
    async fn user_session_reads_encrypted_cookie() {
        let manager = manager();
        let cookie = manager.issue(Principal::User, 42).unwrap();

        let req = TestRequest::default()
            .app_data(web::Data::new(manager))
            .cookie(cookie)
            .to_http_request();

        let session = UserSession::extract(&req).await.unwrap();
        assert_eq!(session, UserSession(42));
    }

    #[actix_web::test]
    async fn missing_cookie_is_unauthorized() {
        let req = TestRequest::default()
            .app_data(web::Data::new(manager()))
            .to_http_request();

        let err = MediaSession::extract(&req).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));

        let anonymous = OptionalUserSession::extract(&req).await.unwrap();
        assert_eq!(anonymous, OptionalUserSession(None));
    }

    #[actix_web::test]
    async fn user_cookie_does_not_grant_media_session() {
        let manager = manager();
        let cookie = manager.issue(Principal::User, 7).unwrap();

        let req = TestRequest::default()
            .app_data(web::Data::new(manager))
            .cookie(cookie)
            .to_http_request();

        assert!(MediaSession::extract(&req).await.is_err());
    }
}
