use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validators::OrderedValidation;

/// Reader account
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub login: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub email: String,
}

/// Row to insert; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub login: String,
    pub password_hash: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    #[validate(length(max = 32, message = "Login must be at most 32 characters"))]
    pub login: String,
    #[validate(length(max = 32, message = "Password must be at most 32 characters"))]
    pub password: String,
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: String,
    #[validate(length(max = 16, message = "Email must be at most 16 characters"))]
    pub email: String,
}

impl OrderedValidation for RegisterUserRequest {
    const FIELD_ORDER: &'static [&'static str] = &["login", "password", "name", "email"];
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUserRequest {
    pub login: String,
    pub password: String,
}
