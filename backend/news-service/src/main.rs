use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use chrono::Utc;
use db_pool::create_pool;
use news_service::db::MIGRATOR;
use news_service::handlers;
use news_service::middleware::SessionManager;
use news_service::storage::MediaBlobs;
use news_service::{AppState, Config, Repositories};
use sqlx::PgPool;
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct HealthState {
    db_pool: PgPool,
}

impl HealthState {
    async fn check_postgres(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.db_pool)
            .await
            .map(|_| ())
    }
}

async fn health_summary(state: web::Data<HealthState>) -> HttpResponse {
    match state.check_postgres().await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "news-service",
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": Utc::now().to_rfc3339()
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("PostgreSQL connection failed: {}", e),
            "service": "news-service"
        })),
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate =
            signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = terminate.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());
    let json = std::env::var("LOG_FORMAT")
        .map(|value| value.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// News Service
///
/// Readers register, subscribe to media outlets and read a feed of the news
/// those outlets publish after the subscription. Media accounts publish
/// news and attach one audio, image and video file to each.
///
/// # Routes
///
/// - `/api/users/*` - reader accounts and subscriptions
/// - `/api/media/*` - media accounts, directory, subscription toggle
/// - `/api/news/*` - publication, favorites, attachments
/// - `/api/feed`, `/api/favorites` - personal listings
/// - `/api/health`, `/metrics`
#[actix_web::main]
async fn main() -> io::Result<()> {
    let _ = dotenvy::dotenv();

    init_tracing();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting news-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    config.database.log_config();
    let db_pool = create_pool(config.database.clone()).await.map_err(|e| {
        io::Error::new(
            io::ErrorKind::Other,
            format!("Failed to create database pool: {}", e),
        )
    })?;

    MIGRATOR.run(&db_pool).await.map_err(|e| {
        io::Error::new(
            io::ErrorKind::Other,
            format!("Failed to run migrations: {}", e),
        )
    })?;
    tracing::info!("Database migrations applied");

    let blobs = MediaBlobs::open_dir(&config.storage.root)
        .await
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::Other,
                format!("Failed to open media storage: {:#}", e),
            )
        })?;
    tracing::info!(root = %config.storage.root.display(), "Media storage ready");

    let app_state = web::Data::new(AppState::new(Repositories::postgres(db_pool.clone()), blobs));
    let sessions = web::Data::new(SessionManager::new(
        config.session.key(),
        config.session.secure_cookies,
    ));
    let health_state = web::Data::new(HealthState {
        db_pool: db_pool.clone(),
    });

    let bind_address = (config.app.host.clone(), config.app.port);
    let upload_limit = config.storage.max_upload_bytes;
    let cors_config = config.cors.clone();

    let server = HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in cors_config.origins() {
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(app_state.clone())
            .app_data(sessions.clone())
            .app_data(health_state.clone())
            .wrap(cors)
            .wrap(tracing_actix_web::TracingLogger::default())
            .route(
                "/metrics",
                web::get().to(news_service::metrics::serve_metrics),
            )
            .route("/api/health", web::get().to(health_summary))
            .configure(handlers::routes(upload_limit))
    })
    .bind(bind_address)?
    .disable_signals()
    .run();

    tracing::info!(
        "HTTP server listening on {}:{}",
        config.app.host,
        config.app.port
    );

    let server_handle = server.handle();
    let mut server_task = tokio::spawn(server);

    let finished = tokio::select! {
        result = &mut server_task => Some(result),
        _ = shutdown_signal() => None,
    };

    let result = match finished {
        Some(result) => result,
        None => {
            tracing::info!("Shutdown signal received");
            server_handle.stop(true).await;
            server_task.await
        }
    };

    db_pool.close().await;
    tracing::info!("News-service shut down");

    match result {
        Ok(served) => served,
        Err(e) => Err(io::Error::new(io::ErrorKind::Other, e.to_string())),
    }
}
