use axum::http::{header, HeaderValue, Method};
use fyyur_db::AppState;
use fyyur_server::config::ServerConfig;
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env();
    fyyur_server::telemetry::init(&config).expect("failed to open the error log file");

    // Database connection
    let db_config = fyyur_db::DatabaseConfig::from_env();
    tracing::info!("connecting to database...");
    let db = fyyur_db::connect(&db_config)
        .await
        .expect("failed to connect to database");

    // Run migrations
    tracing::info!("running database migrations...");
    fyyur_migration::Migrator::up(&db, None)
        .await
        .expect("failed to run migrations");
    tracing::info!("migrations complete");

    let state = Arc::new(AppState { db });

    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];
    let cors = if config.cors_origins.is_empty() {
        tracing::warn!("CORS_ORIGINS not set, cross-origin requests will be rejected");
        CorsLayer::new().allow_methods(methods)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();
        tracing::info!("CORS allowed origins: {:?}", origins);
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(tower_http::cors::Any)
    };

    let app = fyyur_server::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ));

    tracing::info!(addr = %config.bind_addr, production = config.production, "server started");

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("failed to bind listen address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
