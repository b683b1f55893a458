/// Error types for News Service
///
/// Domain failures carry a client-facing message. Everything else is an
/// `Internal` error holding the full `anyhow` context chain, which is logged
/// once when the response is rendered and never sent to the client.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;
use thiserror::Error;

/// Result type for news-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found
    #[error("{0}")]
    NotFound(String),

    /// Duplicate resource
    #[error("{0}")]
    Conflict(String),

    /// Missing session, wrong password or foreign resource
    #[error("{0}")]
    Unauthorized(String),

    /// Malformed or invalid input
    #[error("{0}")]
    BadRequest(String),

    /// Store, storage or programming failure
    #[error(transparent)]
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: ErrorMessage<'a>,
}

#[derive(Serialize)]
struct ErrorMessage<'a> {
    message: &'a str,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Internal(err) => {
                tracing::error!(error = %format!("{:#}", err), "Request failed");
                "Internal server error"
            }
            AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::Unauthorized(msg)
            | AppError::BadRequest(msg) => msg.as_str(),
        };

        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: ErrorMessage { message },
        })
    }
}

/// Name of the unique constraint a PostgreSQL insert violated, if the error
/// chain contains one. Empty when the server did not report a name.
pub fn unique_violation(err: &anyhow::Error) -> Option<String> {
    err.chain().find_map(|cause| match cause.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            Some(db_err.constraint().unwrap_or_default().to_string())
        }
        _ => None,
    })
}
