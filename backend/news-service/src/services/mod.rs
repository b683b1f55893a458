/// Business logic layer for news-service
///
/// Services enforce uniqueness, ownership and validation on top of the
/// repository traits and translate missing rows into domain errors.
pub mod feed;
pub mod media;
pub mod news;
pub mod users;

pub use feed::FeedService;
pub use media::MediaService;
pub use news::NewsService;
pub use users::UserService;
