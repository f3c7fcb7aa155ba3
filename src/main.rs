//! Atelier Booking server
//!
//! HTTP backend for studio slot reservations: availability checks and holds
//! against the external calendar gateway, package price quotes, and the
//! durable first-order promo flag.

use actix_cors::Cors;
use actix_web::{http::header, middleware, web, App, HttpResponse, HttpServer};
use std::env;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use atelier_api::{configure_booking, configure_health, SessionRegistry};
use atelier_core::config::AppConfig;
use atelier_gateway::HttpCalendarGateway;
use atelier_promo::RedisPromoStore;

/// Configure API routes
fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(configure_health)
            .configure(configure_booking),
    );
}

/// Initialize tracing/logging
fn init_tracing() {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "atelier_booking={},atelier_api={},atelier_services={},atelier_gateway={},actix_web=info",
            log_level, log_level, log_level, log_level
        ))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    info!(
        "Starting Atelier Booking server v{}",
        env!("CARGO_PKG_VERSION")
    );

    // A missing gateway endpoint or token is fatal at startup.
    let config = AppConfig::load().expect("Failed to load configuration");

    let gateway = Arc::new(
        HttpCalendarGateway::new(&config.gateway).expect("Invalid calendar gateway configuration"),
    );
    info!(
        "Calendar gateway configured with {}s timeout",
        config.gateway.timeout_secs
    );

    info!("Connecting to promo store...");
    let promo = Arc::new(
        RedisPromoStore::new(&config.promo.redis_url)
            .await
            .expect("Failed to connect to promo store"),
    );
    if let Err(e) = promo.ping().await {
        warn!("Promo store ping failed at startup: {}", e);
    }

    let registry = web::Data::new(SessionRegistry::new(gateway, promo));
    let app_config = web::Data::new(config.clone());

    // CORS configuration
    let cors_origins = env::var("CORS_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let bind_addr = config.server_addr();
    info!(
        "Starting HTTP server on {} with {} workers",
        bind_addr, config.server.workers
    );

    HttpServer::new(move || {
        // Clone cors_origins for each worker
        let cors_origins_inner = cors_origins.clone();
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _req_head| {
                let origins: Vec<&str> = cors_origins_inner.split(',').collect();
                if let Ok(origin_str) = origin.to_str() {
                    origins.iter().any(|o| o.trim() == origin_str)
                } else {
                    false
                }
            })
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
            .max_age(3600);

        App::new()
            .app_data(registry.clone())
            .app_data(app_config.clone())
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                let error_message = err.to_string();
                actix_web::error::InternalError::from_response(
                    err,
                    HttpResponse::BadRequest().json(serde_json::json!({
                        "error": "invalid_body",
                        "message": error_message
                    })),
                )
                .into()
            }))
            .wrap(cors)
            .wrap(middleware::Logger::new("%a \"%r\" %s %b %Dms"))
            .wrap(middleware::Compress::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_routes)
            // Root redirect to health
            .route(
                "/",
                web::get().to(|| async {
                    HttpResponse::Found()
                        .append_header(("Location", "/api/v1/health"))
                        .finish()
                }),
            )
    })
    .workers(config.server.workers)
    .bind(&bind_addr)?
    .run()
    .await
}
