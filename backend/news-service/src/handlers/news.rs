/// News handlers: publication, reads, favorites and attachments
use actix_multipart::form::{bytes::Bytes as FileField, MultipartForm};
use actix_web::{web, HttpResponse};

use super::{ok, DataResponse};
use crate::error::Result;
use crate::middleware::{MediaSession, OptionalUserSession, UserSession};
use crate::models::CreateNewsRequest;
use crate::storage::BlobKind;
use crate::AppState;

/// `multipart/form-data` body carrying one attachment in the `file` field
#[derive(MultipartForm)]
pub struct AttachmentForm {
    pub file: FileField,
}

/// Publish news as the signed-in media (201)
pub async fn create(
    state: web::Data<AppState>,
    session: MediaSession,
    req: web::Json<CreateNewsRequest>,
) -> Result<HttpResponse> {
    let news = state.news.create(session.0, req.into_inner()).await?;
    Ok(HttpResponse::Created().json(DataResponse { data: news }))
}

pub async fn get(
    state: web::Data<AppState>,
    news_id: web::Path<i64>,
    viewer: OptionalUserSession,
) -> Result<HttpResponse> {
    let news = state.news.get(news_id.into_inner(), viewer.0).await?;
    Ok(ok(news))
}

pub async fn toggle_favorite(
    state: web::Data<AppState>,
    news_id: web::Path<i64>,
    session: UserSession,
) -> Result<HttpResponse> {
    let result = state
        .news
        .toggle_favorite(session.0, news_id.into_inner())
        .await?;

    Ok(ok(result))
}

async fn put_attachment(
    kind: BlobKind,
    state: web::Data<AppState>,
    session: MediaSession,
    news_id: i64,
    form: AttachmentForm,
) -> Result<HttpResponse> {
    state
        .news
        .put_attachment(kind, news_id, session.0, &form.file.data)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

async fn get_attachment(
    kind: BlobKind,
    state: web::Data<AppState>,
    news_id: i64,
) -> Result<HttpResponse> {
    let data = state.news.get_attachment(kind, news_id).await?;

    Ok(HttpResponse::Ok()
        .content_type(kind.content_type())
        .body(data))
}

pub async fn put_audio(
    state: web::Data<AppState>,
    session: MediaSession,
    news_id: web::Path<i64>,
    MultipartForm(form): MultipartForm<AttachmentForm>,
) -> Result<HttpResponse> {
    put_attachment(BlobKind::Audio, state, session, news_id.into_inner(), form).await
}

pub async fn get_audio(state: web::Data<AppState>, news_id: web::Path<i64>) -> Result<HttpResponse> {
    get_attachment(BlobKind::Audio, state, news_id.into_inner()).await
}

pub async fn put_image(
    state: web::Data<AppState>,
    session: MediaSession,
    news_id: web::Path<i64>,
    MultipartForm(form): MultipartForm<AttachmentForm>,
) -> Result<HttpResponse> {
    put_attachment(BlobKind::Image, state, session, news_id.into_inner(), form).await
}

pub async fn get_image(state: web::Data<AppState>, news_id: web::Path<i64>) -> Result<HttpResponse> {
    get_attachment(BlobKind::Image, state, news_id.into_inner()).await
}

pub async fn put_video(
    state: web::Data<AppState>,
    session: MediaSession,
    news_id: web::Path<i64>,
    MultipartForm(form): MultipartForm<AttachmentForm>,
) -> Result<HttpResponse> {
    put_attachment(BlobKind::Video, state, session, news_id.into_inner(), form).await
}

pub async fn get_video(state: web::Data<AppState>, news_id: web::Path<i64>) -> Result<HttpResponse> {
    get_attachment(BlobKind::Video, state, news_id.into_inner()).await
}
