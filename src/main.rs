mod config;
mod core;
mod models;
mod routes;
mod services;

use crate::core::resolver::{MatchNotifier, MatchResolver, MatchStore, ProfileAccessor, SwipeStore};
use crate::core::teams::TeamBuilder;
use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use config::Settings;
use routes::matches::AppState;
use services::{DirectoryClient, NoopNotifier, PgStore, ProfileCache, WebhookNotifier};
use std::sync::Arc;
use tracing::{info, warn};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .content_type("application/json")
            .body(serde_json::to_string(self).unwrap())
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Configuration loads before the subscriber so logging can honor the
    // configured level and format
    let settings = Settings::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    // Initialize logging; RUST_LOG overrides the configured level
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if settings.logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting Huddle matching service...");
    info!("Configuration loaded successfully");

    // Initialize the profile directory client
    let directory = Arc::new(DirectoryClient::new(
        settings.directory.endpoint,
        settings.directory.api_key,
    ));

    info!("Profile directory client initialized");

    // Initialize the profile snapshot cache (optional - a directory-only
    // setup works, just slower)
    let cache_ttl = settings.cache.ttl_secs.unwrap_or(300);
    let l1_cache_size = settings.cache.l1_cache_size.unwrap_or(1000);

    let cache = match ProfileCache::new(&settings.cache.redis_url, l1_cache_size, cache_ttl).await {
        Ok(c) => {
            info!(
                "Profile cache initialized (L1: {} entries, TTL: {}s)",
                l1_cache_size, cache_ttl
            );
            Some(Arc::new(c))
        }
        Err(e) => {
            warn!("Failed to connect to Redis ({}), running without cache", e);
            None
        }
    };

    // Initialize the Postgres-backed swipe ledger and match store
    let postgres = Arc::new(
        PgStore::from_settings(
            &settings.database.url,
            settings.database.max_connections,
            settings.database.min_connections,
        )
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to connect to PostgreSQL: {}", e);
            panic!("PostgreSQL connection error: {}", e);
        }),
    );

    info!("PostgreSQL store initialized");

    // Match-created events go to the webhook when configured
    let notifier: Arc<dyn MatchNotifier> = match settings.notifier.webhook_url {
        Some(url) => {
            info!("Match notifier webhook configured");
            Arc::new(WebhookNotifier::new(url))
        }
        None => {
            warn!("No notifier webhook configured; match events will be logged and dropped");
            Arc::new(NoopNotifier)
        }
    };

    let profiles: Arc<dyn ProfileAccessor> = directory;
    let swipes: Arc<dyn SwipeStore> = postgres.clone();
    let matches: Arc<dyn MatchStore> = postgres.clone();

    let resolver = MatchResolver::new(profiles.clone(), swipes, matches, notifier);
    let teams = TeamBuilder::new(
        settings.matching.candidate_window,
        settings.matching.combination_cap,
    );

    info!(
        "Team search caps: window {}, combinations {}",
        settings.matching.candidate_window, settings.matching.combination_cap
    );

    // Build application state
    let app_state = AppState {
        profiles,
        resolver,
        teams,
        cache,
        postgres: Some(postgres),
        candidate_pool_limit: settings.matching.candidate_pool_limit,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
