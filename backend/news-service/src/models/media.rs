use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validators::OrderedValidation;

/// Editor-in-chief of a media outlet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Editor {
    #[sqlx(rename = "editor_first_name")]
    #[validate(length(max = 16, message = "Editor first name must be at most 16 characters"))]
    pub first_name: String,
    #[sqlx(rename = "editor_last_name")]
    #[validate(length(max = 16, message = "Editor last name must be at most 16 characters"))]
    pub last_name: String,
}

/// Registered media outlet
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: i64,
    pub registration_number: i64,
    pub name: String,
    pub email: String,
    #[sqlx(flatten)]
    pub editor: Editor,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Media as shown in listings: no credentials, plus its subscriber count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MediaListItem {
    pub id: i64,
    pub registration_number: i64,
    pub name: String,
    pub email: String,
    #[sqlx(flatten)]
    pub editor: Editor,
    pub subscription_count: i64,
}

#[derive(Debug, Clone)]
pub struct NewMedia {
    pub registration_number: i64,
    pub name: String,
    pub email: String,
    pub editor: Editor,
    pub password_hash: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterMediaRequest {
    pub registration_number: i64,
    #[validate(length(max = 32, message = "Name must be at most 32 characters"))]
    pub name: String,
    #[validate(length(max = 16, message = "Email must be at most 16 characters"))]
    pub email: String,
    #[validate(nested)]
    pub editor: Editor,
    #[validate(length(max = 32, message = "Password must be at most 32 characters"))]
    pub password: String,
}

impl OrderedValidation for RegisterMediaRequest {
    const FIELD_ORDER: &'static [&'static str] = &[
        "name",
        "email",
        "editor.first_name",
        "editor.last_name",
        "password",
    ];
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginMediaRequest {
    pub registration_number: i64,
    pub password: String,
}
