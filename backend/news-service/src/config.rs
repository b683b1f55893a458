/// Configuration management for News Service
///
/// Everything is read from environment variables (a `.env` file is loaded
/// first by `main`). Invalid values abort startup.
use actix_web::cookie::Key;
use db_pool::DbConfig;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Minimum length of `SESSION_SECRET` accepted for key derivation
pub const MIN_SESSION_SECRET_BYTES: usize = 32;

const DEFAULT_CORS_ORIGINS: &str =
    "http://localhost:3000,http://127.0.0.1:3000,http://0.0.0.0:3000";

/// 4 GiB
const DEFAULT_MAX_UPLOAD_BYTES: u64 = 4 * 1024 * 1024 * 1024;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub cors: CorsConfig,
    pub database: DbConfig,
    pub session: SessionConfig,
    pub storage: StorageConfig,
}

/// Application settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }
}

/// CORS configuration
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

impl CorsConfig {
    pub fn origins(&self) -> impl Iterator<Item = &str> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
    }
}

/// Session cookie settings
#[derive(Clone)]
pub struct SessionConfig {
    /// Master secret the cookie key is derived from
    pub secret: Option<String>,
    /// Set the `Secure` attribute on session cookies
    pub secure_cookies: bool,
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .field("secure_cookies", &self.secure_cookies)
            .finish()
    }
}

impl SessionConfig {
    /// Cookie key derived from the secret, or a random per-process key when
    /// no secret is configured (sessions then die with the process).
    pub fn key(&self) -> Key {
        match &self.secret {
            Some(secret) => Key::derive_from(secret.as_bytes()),
            None => {
                tracing::warn!(
                    "SESSION_SECRET not set; using a random key, sessions will not survive restarts"
                );
                Key::generate()
            }
        }
    }
}

/// Attachment storage settings
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root directory holding `audio/`, `image/` and `video/`
    pub root: PathBuf,
    /// Upper bound on a single upload body
    pub max_upload_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app = AppConfig {
            env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            host: std::env::var("NEWS_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_env_or("NEWS_SERVICE_PORT", 8000)?,
        };

        let cors = {
            let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                Ok(value) => value,
                Err(_) => DEFAULT_CORS_ORIGINS.to_string(),
            };
            CorsConfig { allowed_origins }
        };

        let session = SessionConfig {
            secret: std::env::var("SESSION_SECRET")
                .ok()
                .filter(|value| !value.is_empty()),
            secure_cookies: parse_env_or("SESSION_COOKIE_SECURE", app.is_production())?,
        };

        let storage = StorageConfig {
            root: std::env::var("MEDIA_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            max_upload_bytes: upload_limit(parse_env_or(
                "MAX_UPLOAD_BYTES",
                DEFAULT_MAX_UPLOAD_BYTES,
            )?),
        };

        let config = Config {
            database: DbConfig::from_env("news-service")?,
            app,
            cors,
            session,
            storage,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the service cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        let production = self.app.is_production();

        if production && self.cors.origins().any(|origin| origin == "*") {
            return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
        }

        match &self.session.secret {
            Some(secret) if secret.len() < MIN_SESSION_SECRET_BYTES => {
                return Err(format!(
                    "SESSION_SECRET must be at least {} bytes",
                    MIN_SESSION_SECRET_BYTES
                ));
            }
            None if production => {
                return Err("SESSION_SECRET must be set in production".to_string());
            }
            _ => {}
        }

        if self.storage.max_upload_bytes == 0 {
            return Err("MAX_UPLOAD_BYTES must be greater than zero".to_string());
        }

        Ok(())
    }
}

/// Clamp a byte count to what the target can address.
fn upload_limit(bytes: u64) -> usize {
    usize::try_from(bytes).unwrap_or(usize::MAX)
}

fn parse_env_or<T>(key: &str, default: T) -> Result<T, String>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .trim()
            .parse()
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e)),
        Err(_) => Ok(default),
    }
}
