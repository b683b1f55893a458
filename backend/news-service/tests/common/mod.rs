//! In-memory repositories and blob stores for news-service tests
//!
//! One shared `MemoryStore` implements every repository trait so tests can
//! wire services without PostgreSQL and inspect committed state directly.
#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use news_service::models::{
    Editor, FeedQuery, Media, MediaListItem, NewMedia, NewUser, News, NewsDraft, NewsListItem,
    PageRequest, RegisterMediaRequest, RegisterUserRequest, User,
};
use news_service::repository::{
    FavoriteRepository, FeedRepository, MediaRepository, NewsRepository, PublishTransaction,
    SubscriptionRepository, UserRepository,
};
use news_service::storage::{BlobStore, MediaBlobs};
use news_service::{AppState, Repositories};

#[derive(Debug, Clone)]
struct StoredNews {
    id: i64,
    media_id: i64,
    registration_number: i64,
    title: String,
    text: String,
    created_at: i64,
}

#[derive(Default)]
struct State {
    users: Vec<User>,
    media: Vec<Media>,
    news: Vec<StoredNews>,
    /// (media_id, user_id)
    subscriptions: BTreeSet<(i64, i64)>,
    /// (user_id, news_id)
    favorites: BTreeSet<(i64, i64)>,
    /// (user_id, news_id)
    feed: BTreeSet<(i64, i64)>,
    next_user_id: i64,
    next_media_id: i64,
    next_news_id: i64,
    clock: i64,
    fail_fan_out: bool,
}

impl State {
    fn media_item(&self, media: &Media) -> MediaListItem {
        MediaListItem {
            id: media.id,
            registration_number: media.registration_number,
            name: media.name.clone(),
            email: media.email.clone(),
            editor: media.editor.clone(),
            subscription_count: self
                .subscriptions
                .iter()
                .filter(|(media_id, _)| *media_id == media.id)
                .count() as i64,
        }
    }

    fn news_item(&self, news: &StoredNews, viewer: Option<i64>) -> Option<NewsListItem> {
        let media = self.media.iter().find(|m| m.id == news.media_id)?;
        Some(NewsListItem {
            id: news.id,
            media: self.media_item(media),
            title: news.title.clone(),
            text: news.text.clone(),
            is_favorite: viewer
                .map(|user_id| self.favorites.contains(&(user_id, news.id)))
                .unwrap_or(false),
            created_at: news.created_at,
        })
    }

    /// News matching `filter`, oldest first, ties by id
    fn sorted_news(&self, filter: impl Fn(&StoredNews) -> bool) -> Vec<StoredNews> {
        let mut news: Vec<StoredNews> = self.news.iter().filter(|n| filter(n)).cloned().collect();
        news.sort_by_key(|n| (n.created_at, n.id));
        news
    }
}

fn paginate<T>(items: Vec<T>, page: PageRequest) -> Vec<T> {
    let offset = page.offset_or_zero().max(0) as usize;
    let iter = items.into_iter().skip(offset);
    match page.limit {
        Some(limit) => iter.take(limit.max(0) as usize).collect(),
        None => iter.collect(),
    }
}

/// Shared in-memory backing store for every repository trait
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Release time (epoch seconds) stamped on the next published news
    pub fn set_clock(&self, epoch: i64) {
        self.state.lock().unwrap().clock = epoch;
    }

    /// Make the next fan-out step fail, aborting the publication
    pub fn fail_fan_out(&self, fail: bool) {
        self.state.lock().unwrap().fail_fan_out = fail;
    }

    pub fn news_count(&self) -> usize {
        self.state.lock().unwrap().news.len()
    }

    pub fn feed_rows(&self) -> Vec<(i64, i64)> {
        self.state.lock().unwrap().feed.iter().copied().collect()
    }

    pub fn repositories(&self) -> Repositories {
        Repositories {
            users: Arc::new(self.clone()),
            media: Arc::new(self.clone()),
            subscriptions: Arc::new(self.clone()),
            news: Arc::new(self.clone()),
            feed: Arc::new(self.clone()),
            favorites: Arc::new(self.clone()),
        }
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<User>> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.login == login).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, user: &NewUser) -> Result<User> {
        let mut state = self.state.lock().unwrap();
        if state
            .users
            .iter()
            .any(|u| u.login == user.login || u.email == user.email)
        {
            return Err(anyhow!("duplicate user"));
        }
        state.next_user_id += 1;
        let created = User {
            id: state.next_user_id,
            login: user.login.clone(),
            password_hash: user.password_hash.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
        };
        state.users.push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl MediaRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Media>> {
        let state = self.state.lock().unwrap();
        Ok(state.media.iter().find(|m| m.id == id).cloned())
    }

    async fn find_by_registration_number(
        &self,
        registration_number: i64,
    ) -> Result<Option<Media>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .media
            .iter()
            .find(|m| m.registration_number == registration_number)
            .cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Media>> {
        let state = self.state.lock().unwrap();
        Ok(state.media.iter().find(|m| m.name == name).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Media>> {
        let state = self.state.lock().unwrap();
        Ok(state.media.iter().find(|m| m.email == email).cloned())
    }

    async fn create(&self, media: &NewMedia) -> Result<Media> {
        let mut state = self.state.lock().unwrap();
        if state.media.iter().any(|m| {
            m.registration_number == media.registration_number
                || m.name == media.name
                || m.email == media.email
        }) {
            return Err(anyhow!("duplicate media"));
        }
        state.next_media_id += 1;
        let created = Media {
            id: state.next_media_id,
            registration_number: media.registration_number,
            name: media.name.clone(),
            email: media.email.clone(),
            editor: media.editor.clone(),
            password_hash: media.password_hash.clone(),
        };
        state.media.push(created.clone());
        Ok(created)
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<MediaListItem>> {
        let state = self.state.lock().unwrap();
        let mut items: Vec<MediaListItem> =
            state.media.iter().map(|m| state.media_item(m)).collect();
        items.sort_by_key(|m| m.id);
        Ok(paginate(items, page))
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.state.lock().unwrap().media.len() as i64)
    }
}

#[async_trait]
impl SubscriptionRepository for MemoryStore {
    async fn exists(&self, media_id: i64, user_id: i64) -> Result<bool> {
        let state = self.state.lock().unwrap();
        Ok(state.subscriptions.contains(&(media_id, user_id)))
    }

    async fn toggle(&self, media_id: i64, user_id: i64) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        if state.subscriptions.remove(&(media_id, user_id)) {
            Ok(false)
        } else {
            state.subscriptions.insert((media_id, user_id));
            Ok(true)
        }
    }

    async fn list_for_user(&self, user_id: i64, page: PageRequest) -> Result<Vec<MediaListItem>> {
        let state = self.state.lock().unwrap();
        let mut items: Vec<MediaListItem> = state
            .media
            .iter()
            .filter(|m| state.subscriptions.contains(&(m.id, user_id)))
            .map(|m| state.media_item(m))
            .collect();
        items.sort_by_key(|m| m.id);
        Ok(paginate(items, page))
    }

    async fn count_for_user(&self, user_id: i64) -> Result<i64> {
        let state = self.state.lock().unwrap();
        Ok(state
            .subscriptions
            .iter()
            .filter(|(_, subscriber)| *subscriber == user_id)
            .count() as i64)
    }
}

#[async_trait]
impl NewsRepository for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn PublishTransaction>> {
        Ok(Box::new(MemoryPublishTransaction {
            store: self.clone(),
            news: None,
            feed: Vec::new(),
        }))
    }

    async fn find_by_id(&self, news_id: i64, viewer: Option<i64>) -> Result<Option<NewsListItem>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .news
            .iter()
            .find(|n| n.id == news_id)
            .and_then(|n| state.news_item(n, viewer)))
    }

    async fn list_by_media(
        &self,
        media_id: i64,
        viewer: Option<i64>,
        page: PageRequest,
    ) -> Result<Vec<NewsListItem>> {
        let state = self.state.lock().unwrap();
        let items: Vec<NewsListItem> = state
            .sorted_news(|n| n.media_id == media_id)
            .iter()
            .filter_map(|n| state.news_item(n, viewer))
            .collect();
        Ok(paginate(items, page))
    }

    async fn count_by_media(&self, media_id: i64) -> Result<i64> {
        let state = self.state.lock().unwrap();
        Ok(state.news.iter().filter(|n| n.media_id == media_id).count() as i64)
    }
}

/// Staged publication; nothing reaches the store before `commit`.
pub struct MemoryPublishTransaction {
    store: MemoryStore,
    news: Option<StoredNews>,
    feed: Vec<(i64, i64)>,
}

#[async_trait]
impl PublishTransaction for MemoryPublishTransaction {
    async fn insert_news(&mut self, draft: &NewsDraft) -> Result<Option<News>> {
        let mut state = self.store.state.lock().unwrap();
        let Some(media) = state.media.iter().find(|m| m.id == draft.media_id).cloned() else {
            return Ok(None);
        };
        state.next_news_id += 1;
        let stored = StoredNews {
            id: state.next_news_id,
            media_id: media.id,
            registration_number: media.registration_number,
            title: draft.title.clone(),
            text: draft.text.clone(),
            created_at: state.clock,
        };
        let news = News {
            id: stored.id,
            media_registration_number: stored.registration_number,
            title: stored.title.clone(),
            text: stored.text.clone(),
            created_at: stored.created_at,
        };
        self.news = Some(stored);
        Ok(Some(news))
    }

    async fn fan_out(&mut self, news_id: i64) -> Result<u64> {
        let state = self.store.state.lock().unwrap();
        if state.fail_fan_out {
            return Err(anyhow!("feed insert failed"));
        }
        let media_id = self
            .news
            .as_ref()
            .filter(|n| n.id == news_id)
            .map(|n| n.media_id)
            .ok_or_else(|| anyhow!("news {} is not part of this transaction", news_id))?;
        self.feed = state
            .subscriptions
            .iter()
            .filter(|(media, _)| *media == media_id)
            .map(|(_, user_id)| (*user_id, news_id))
            .collect();
        Ok(self.feed.len() as u64)
    }

    async fn commit(&mut self) -> Result<()> {
        let mut state = self.store.state.lock().unwrap();
        if let Some(news) = self.news.take() {
            state.news.push(news);
        }
        state.feed.extend(self.feed.drain(..));
        Ok(())
    }
}

#[async_trait]
impl FeedRepository for MemoryStore {
    async fn list_for_user(&self, user_id: i64, query: &FeedQuery) -> Result<Vec<NewsListItem>> {
        let state = self.state.lock().unwrap();
        let items: Vec<NewsListItem> = state
            .sorted_news(|n| {
                state.feed.contains(&(user_id, n.id))
                    && query.since.map_or(true, |since| n.created_at >= since)
            })
            .iter()
            .filter_map(|n| state.news_item(n, Some(user_id)))
            .collect();
        Ok(paginate(items, query.page()))
    }

    async fn count_for_user(&self, user_id: i64, since: Option<i64>) -> Result<i64> {
        let state = self.state.lock().unwrap();
        Ok(state
            .news
            .iter()
            .filter(|n| {
                state.feed.contains(&(user_id, n.id))
                    && since.map_or(true, |since| n.created_at >= since)
            })
            .count() as i64)
    }
}

#[async_trait]
impl FavoriteRepository for MemoryStore {
    async fn exists(&self, user_id: i64, news_id: i64) -> Result<bool> {
        let state = self.state.lock().unwrap();
        Ok(state.favorites.contains(&(user_id, news_id)))
    }

    async fn toggle(&self, user_id: i64, news_id: i64) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        if state.favorites.remove(&(user_id, news_id)) {
            Ok(false)
        } else {
            state.favorites.insert((user_id, news_id));
            Ok(true)
        }
    }

    async fn list_for_user(&self, user_id: i64, page: PageRequest) -> Result<Vec<NewsListItem>> {
        let state = self.state.lock().unwrap();
        let items: Vec<NewsListItem> = state
            .sorted_news(|n| state.favorites.contains(&(user_id, n.id)))
            .iter()
            .filter_map(|n| state.news_item(n, Some(user_id)))
            .collect();
        Ok(paginate(items, page))
    }

    async fn count_for_user(&self, user_id: i64) -> Result<i64> {
        let state = self.state.lock().unwrap();
        Ok(state
            .favorites
            .iter()
            .filter(|(user, _)| *user == user_id)
            .count() as i64)
    }
}

/// Blob store kept in a map
#[derive(Clone, Default)]
pub struct MemoryBlobStore {
    blobs: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryBlobStore {
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.blobs.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn store(&self, key: &str, data: &[u8]) -> Result<()> {
        self.blobs
            .lock()
            .unwrap()
            .insert(key.to_string(), data.to_vec());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.blobs.lock().unwrap().get(key).cloned())
    }
}

/// Store, blob stores and the services built on them
pub struct TestContext {
    pub store: MemoryStore,
    pub audio: MemoryBlobStore,
    pub image: MemoryBlobStore,
    pub video: MemoryBlobStore,
    pub state: AppState,
}

impl TestContext {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let audio = MemoryBlobStore::default();
        let image = MemoryBlobStore::default();
        let video = MemoryBlobStore::default();
        let blobs = MediaBlobs::new(
            Arc::new(audio.clone()),
            Arc::new(image.clone()),
            Arc::new(video.clone()),
        );
        let state = AppState::new(store.repositories(), blobs);

        Self {
            store,
            audio,
            image,
            video,
            state,
        }
    }

    pub async fn register_user(&self, login: &str) -> User {
        self.state
            .users
            .register(user_request(login))
            .await
            .expect("user registration should succeed")
    }

    pub async fn register_media(&self, registration_number: i64, name: &str) -> Media {
        self.state
            .media
            .register(media_request(registration_number, name))
            .await
            .expect("media registration should succeed")
    }
}

pub fn user_request(login: &str) -> RegisterUserRequest {
    RegisterUserRequest {
        login: login.to_string(),
        password: "pw".to_string(),
        name: format!("{} reader", login),
        email: format!("{}@x.io", login),
    }
}

pub fn media_request(registration_number: i64, name: &str) -> RegisterMediaRequest {
    RegisterMediaRequest {
        registration_number,
        name: name.to_string(),
        email: format!("{}@news.io", registration_number),
        editor: Editor {
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
        },
        password: "pw".to_string(),
    }
}
