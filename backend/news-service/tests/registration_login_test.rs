//! Registration and login of readers and media accounts

mod common;

use common::{media_request, user_request, TestContext};
use news_service::error::AppError;
use news_service::models::{LoginMediaRequest, LoginUserRequest};
use news_service::repository::{MediaRepository, UserRepository};
use news_service::services::media::{
    MEDIA_EMAIL_TAKEN, MEDIA_NAME_TAKEN, MEDIA_NOT_FOUND, REGISTRATION_NUMBER_TAKEN,
};
use news_service::services::users::{EMAIL_TAKEN, LOGIN_TAKEN, USER_NOT_FOUND, WRONG_PASSWORD};

fn assert_conflict(err: AppError, expected: &str) {
    match err {
        AppError::Conflict(msg) => assert_eq!(msg, expected),
        other => panic!("expected Conflict({}), got {:?}", expected, other),
    }
}

#[tokio::test]
async fn test_register_user_returns_entity_without_password() {
    let ctx = TestContext::new();

    let user = ctx.register_user("bob").await;

    assert_eq!(user.login, "bob");
    assert_eq!(user.email, "bob@x.io");
    assert_ne!(user.password_hash, "pw");

    let json = serde_json::to_value(&user).unwrap();
    assert!(json.get("passwordHash").is_none());
    assert!(json.get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_user_with_taken_login_conflicts() {
    let ctx = TestContext::new();
    ctx.register_user("bob").await;

    let mut req = user_request("bob");
    req.email = "other@x.io".to_string();
    let err = ctx.state.users.register(req).await.unwrap_err();

    assert_conflict(err, LOGIN_TAKEN);
    assert!(UserRepository::find_by_email(&ctx.store, "other@x.io")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_register_user_with_taken_email_conflicts() {
    let ctx = TestContext::new();
    ctx.register_user("bob").await;

    let mut req = user_request("alice");
    req.email = "bob@x.io".to_string();
    let err = ctx.state.users.register(req).await.unwrap_err();

    assert_conflict(err, EMAIL_TAKEN);
    assert!(UserRepository::find_by_login(&ctx.store, "alice")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_register_user_reports_first_invalid_field() {
    let ctx = TestContext::new();

    let mut req = user_request("bob");
    req.password = "p".repeat(33);
    req.email = "much-too-long-address@x.io".to_string();
    let err = ctx.state.users.register(req).await.unwrap_err();

    match err {
        AppError::BadRequest(msg) => assert_eq!(msg, "Password must be at most 32 characters"),
        other => panic!("expected BadRequest, got {:?}", other),
    }
}

#[tokio::test]
async fn test_register_media_conflicts_per_field() {
    let ctx = TestContext::new();
    ctx.register_media(7, "Daily").await;

    let mut same_email = media_request(8, "Weekly");
    same_email.email = "7@news.io".to_string();
    assert_conflict(
        ctx.state.media.register(same_email).await.unwrap_err(),
        MEDIA_EMAIL_TAKEN,
    );

    let same_name = media_request(8, "Daily");
    assert_conflict(
        ctx.state.media.register(same_name).await.unwrap_err(),
        MEDIA_NAME_TAKEN,
    );

    let mut same_number = media_request(7, "Weekly");
    same_number.email = "weekly@news.io".to_string();
    assert_conflict(
        ctx.state.media.register(same_number).await.unwrap_err(),
        REGISTRATION_NUMBER_TAKEN,
    );

    assert_eq!(ctx.store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_register_media_validates_nested_editor() {
    let ctx = TestContext::new();

    let mut req = media_request(7, "Daily");
    req.editor.last_name = "L".repeat(17);
    let err = ctx.state.media.register(req).await.unwrap_err();

    match err {
        AppError::BadRequest(msg) => {
            assert_eq!(msg, "Editor last name must be at most 16 characters")
        }
        other => panic!("expected BadRequest, got {:?}", other),
    }
    assert!(ctx
        .store
        .find_by_registration_number(7)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_user_login_outcomes() {
    let ctx = TestContext::new();
    let bob = ctx.register_user("bob").await;

    let user = ctx
        .state
        .users
        .login(LoginUserRequest {
            login: "bob".to_string(),
            password: "pw".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(user.id, bob.id);

    let err = ctx
        .state
        .users
        .login(LoginUserRequest {
            login: "bob".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(ref msg) if msg == WRONG_PASSWORD));

    let err = ctx
        .state
        .users
        .login(LoginUserRequest {
            login: "nobody".to_string(),
            password: "pw".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref msg) if msg == USER_NOT_FOUND));
}

#[tokio::test]
async fn test_media_login_outcomes() {
    let ctx = TestContext::new();
    let daily = ctx.register_media(7, "Daily").await;

    let media = ctx
        .state
        .media
        .login(LoginMediaRequest {
            registration_number: 7,
            password: "pw".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(media.id, daily.id);

    let err = ctx
        .state
        .media
        .login(LoginMediaRequest {
            registration_number: 7,
            password: "nope".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(ref msg) if msg == WRONG_PASSWORD));

    let err = ctx
        .state
        .media
        .login(LoginMediaRequest {
            registration_number: 99,
            password: "pw".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref msg) if msg == MEDIA_NOT_FOUND));
}

#[tokio::test]
async fn test_authenticate_unknown_ids() {
    let ctx = TestContext::new();

    assert!(matches!(
        ctx.state.users.authenticate(42).await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(matches!(
        ctx.state.media.authenticate(42).await.unwrap_err(),
        AppError::NotFound(_)
    ));
}
