/// HTTP handlers for news-service
///
/// - `users`: reader registration, login, sessions, subscriptions
/// - `media`: media registration, login, directory, subscription toggle
/// - `news`: publication, single news, favorites toggle, attachments
/// - `feed`: personal feed and favorites listing
///
/// Successful responses wrap their payload as `{"data": ...}`.
pub mod feed;
pub mod media;
pub mod news;
pub mod users;

use actix_multipart::form::MultipartFormConfig;
use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

pub(crate) fn ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(DataResponse { data })
}

/// Extractor configuration turning malformed input into the JSON error envelope.
fn extractor_configs(cfg: &mut web::ServiceConfig, upload_limit: usize) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        MultipartFormConfig::default()
            .total_limit(upload_limit)
            .memory_limit(upload_limit)
            .error_handler(|err, _| AppError::BadRequest(err.to_string()).into()),
    );
}

/// Route table under `/api`. `upload_limit` bounds attachment bodies.
pub fn routes(upload_limit: usize) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        extractor_configs(cfg, upload_limit);

        cfg.service(
            web::scope("/api")
                .service(
                    web::scope("/users")
                        .route("/register", web::post().to(users::register))
                        .route("/login", web::post().to(users::login))
                        .route("/logout", web::post().to(users::logout))
                        .route("/authenticate", web::post().to(users::authenticate))
                        .route(
                            "/{user_id}/subscriptions",
                            web::get().to(users::subscription_list),
                        ),
                )
                .service(
                    web::scope("/media")
                        .route("", web::get().to(media::list))
                        .route("/register", web::post().to(media::register))
                        .route("/login", web::post().to(media::login))
                        .route("/logout", web::post().to(media::logout))
                        .route("/authenticate", web::post().to(media::authenticate))
                        .route("/{media_id}/news", web::get().to(media::news_list))
                        .route(
                            "/{media_id}/toggle-subscription",
                            web::post().to(media::toggle_subscription),
                        ),
                )
                .service(
                    web::scope("/news")
                        .route("", web::post().to(news::create))
                        .route("/{news_id}", web::get().to(news::get))
                        .route(
                            "/{news_id}/toggle-favorite",
                            web::post().to(news::toggle_favorite),
                        )
                        .service(
                            web::resource("/{news_id}/audio")
                                .route(web::put().to(news::put_audio))
                                .route(web::get().to(news::get_audio)),
                        )
                        .service(
                            web::resource("/{news_id}/image")
                                .route(web::put().to(news::put_image))
                                .route(web::get().to(news::get_image)),
                        )
                        .service(
                            web::resource("/{news_id}/video")
                                .route(web::put().to(news::put_video))
                                .route(web::get().to(news::get_video)),
                        ),
                )
                .route("/feed", web::get().to(feed::get_feed))
                .route("/favorites", web::get().to(feed::favorite_list)),
        );
    }
}
