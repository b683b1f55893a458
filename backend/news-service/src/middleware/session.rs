use actix_web::cookie::{time::Duration, Cookie, CookieJar, Key, SameSite};
use actix_web::HttpRequest;
use anyhow::{anyhow, Result};

/// Session lifetime
pub const SESSION_TTL_DAYS: i64 = 30;

/// Kind of account a session belongs to; each has its own cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Principal {
    User,
    Media,
}

impl Principal {
    pub fn cookie_name(self) -> &'static str {
        match self {
            Principal::User => "user_session",
            Principal::Media => "media_session",
        }
    }
}

/// Issues, reads and clears private session cookies.
#[derive(Clone)]
pub struct SessionManager {
    key: Key,
    secure: bool,
}

impl SessionManager {
    pub fn new(key: Key, secure: bool) -> Self {
        Self { key, secure }
    }

    /// Encrypted cookie carrying `id` for `principal`.
    pub fn issue(&self, principal: Principal, id: i64) -> Result<Cookie<'static>> {
        let cookie = Cookie::build(principal.cookie_name(), id.to_string())
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(Duration::days(SESSION_TTL_DAYS))
            .finish();

        let mut jar = CookieJar::new();
        jar.private_mut(&self.key).add(cookie);
        jar.get(principal.cookie_name())
            .cloned()
            .ok_or_else(|| anyhow!("encrypted {} cookie missing", principal.cookie_name()))
    }

    /// Cookie instructing the client to drop the session.
    pub fn removal(&self, principal: Principal) -> Cookie<'static> {
        let mut cookie = Cookie::build(principal.cookie_name(), "")
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .finish();
        cookie.make_removal();
        cookie
    }

    /// Id carried by the request's session cookie. Missing, tampered or
    /// foreign cookies all read as no session.
    pub fn read(&self, req: &HttpRequest, principal: Principal) -> Option<i64> {
        let cookie = req.cookie(principal.cookie_name())?;
        let jar = CookieJar::new();
        match jar.private(&self.key).decrypt(cookie) {
            Some(plain) => plain.value().parse().ok(),
            None => {
                tracing::debug!(
                    cookie = principal.cookie_name(),
                    "Rejected undecryptable session cookie"
                );
                None
            }
        }
    }
}
