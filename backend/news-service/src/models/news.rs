use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use validator::Validate;

use super::{Editor, MediaListItem};
use crate::validators::OrderedValidation;

/// Published article. `created_at` is epoch seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct News {
    pub id: i64,
    pub media_registration_number: i64,
    pub title: String,
    pub text: String,
    pub created_at: i64,
}

/// Article joined with its media and the viewer's favorite flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsListItem {
    pub id: i64,
    pub media: MediaListItem,
    pub title: String,
    pub text: String,
    pub is_favorite: bool,
    pub created_at: i64,
}

/// Media columns are expected with a `media_` prefix.
impl<'r> FromRow<'r, PgRow> for NewsListItem {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            media: MediaListItem {
                id: row.try_get("media_id")?,
                registration_number: row.try_get("media_registration_number")?,
                name: row.try_get("media_name")?,
                email: row.try_get("media_email")?,
                editor: Editor {
                    first_name: row.try_get("media_editor_first_name")?,
                    last_name: row.try_get("media_editor_last_name")?,
                },
                subscription_count: row.try_get("media_subscription_count")?,
            },
            title: row.try_get("title")?,
            text: row.try_get("text")?,
            is_favorite: row.try_get("is_favorite")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// News row to insert on behalf of a media account.
#[derive(Debug, Clone)]
pub struct NewsDraft {
    pub media_id: i64,
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNewsRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "Text must not be empty"))]
    pub text: String,
}

impl OrderedValidation for CreateNewsRequest {
    const FIELD_ORDER: &'static [&'static str] = &["title", "text"];
}
