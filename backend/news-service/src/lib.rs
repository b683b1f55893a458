/// News Service Library
///
/// Users follow media outlets and read a feed of their news; media accounts
/// publish news with audio, image and video attachments.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and route table
/// - `services`: business logic layer
/// - `repository`: storage traits, `db`: their PostgreSQL implementations
/// - `storage`: attachment blob stores
/// - `middleware`: cookie session extractors
/// - `models`: data structures and request payloads
/// - `config`, `error`, `metrics`, `security`, `validators`: ambient concerns
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod security;
pub mod services;
pub mod storage;
pub mod validators;

pub use config::Config;
pub use error::{AppError, Result};

use sqlx::PgPool;
use std::sync::Arc;

use crate::repository::{
    FavoriteRepository, FeedRepository, MediaRepository, NewsRepository, SubscriptionRepository,
    UserRepository,
};
use crate::services::{FeedService, MediaService, NewsService, UserService};
use crate::storage::MediaBlobs;

/// Repository implementations the services are built from
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub media: Arc<dyn MediaRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    pub news: Arc<dyn NewsRepository>,
    pub feed: Arc<dyn FeedRepository>,
    pub favorites: Arc<dyn FavoriteRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(db::PgUserRepository::new(pool.clone())),
            media: Arc::new(db::PgMediaRepository::new(pool.clone())),
            subscriptions: Arc::new(db::PgSubscriptionRepository::new(pool.clone())),
            news: Arc::new(db::PgNewsRepository::new(pool.clone())),
            feed: Arc::new(db::PgFeedRepository::new(pool.clone())),
            favorites: Arc::new(db::PgFavoriteRepository::new(pool)),
        }
    }
}

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub media: MediaService,
    pub news: NewsService,
    pub feed: FeedService,
}

impl AppState {
    pub fn new(repos: Repositories, blobs: MediaBlobs) -> Self {
        Self {
            users: UserService::new(repos.users.clone(), repos.subscriptions.clone()),
            media: MediaService::new(
                repos.media.clone(),
                repos.subscriptions.clone(),
                repos.news.clone(),
            ),
            news: NewsService::new(repos.news.clone(), repos.favorites.clone(), blobs),
            feed: FeedService::new(repos.feed),
        }
    }
}
