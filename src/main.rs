//! Sourcing Data Import Server - Main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware,
//! plus the background import worker and tmp-file cleanup task.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http::header, web, App, HttpServer};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use sourcing_import_lib::api;
use sourcing_import_lib::config::Config;
use sourcing_import_lib::db::DbPool;
use sourcing_import_lib::middleware::RequestLogger;
use sourcing_import_lib::migration::{Migrator, MigratorTrait};
use sourcing_import_lib::services::{
    self, CleanupConfig, EventBroadcaster, FileService, ImportQueue, ImportWorker,
};

/// Perform health check (for Docker healthcheck).
async fn health_check() -> bool {
    // Simple check - just verify we can load config
    Config::from_env().is_ok()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Check for --health-check flag (used by Docker HEALTHCHECK)
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|arg| arg == "--health-check") {
        dotenvy::dotenv().ok();
        if health_check().await {
            std::process::exit(0);
        } else {
            std::process::exit(1);
        }
    }

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - In production, DATABASE_URL must be set");
            error!("  - SDI_TMP_DIR must point below /tmp");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  Sourcing Data Import Server");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
        info!("Using development defaults for DATABASE_URL");
    }

    // Create the upload staging directory
    let file_service = FileService::new(config.tmp_dir.clone());
    file_service
        .ensure_tmp_dir()
        .await
        .expect("Failed to create tmp directory");

    // Initialize database and run migrations
    let pool = DbPool::connect(&config)
        .await
        .expect("Failed to connect to database");
    info!("Database connection established");

    Migrator::up(pool.connection(), None)
        .await
        .expect("Failed to run migrations");
    info!("Database migrations complete");

    // Progress event fan-out for websocket clients
    let broadcaster = EventBroadcaster::new();

    // Start the import worker draining the job queue
    let (queue, queue_rx) = ImportQueue::new(config.queue_capacity);
    services::start_import_worker(
        ImportWorker {
            pool: pool.clone(),
            broadcaster: broadcaster.clone(),
            files: file_service.clone(),
            geocoder: Arc::new(services::geocoding::CoordinateGeocoder),
        },
        queue_rx,
    );
    info!(
        "Import worker started (queue capacity: {})",
        config.queue_capacity
    );

    // Start the cleanup background task
    let cleanup_config = CleanupConfig {
        tmp_dir: config.tmp_dir.clone(),
        retention_hours: config.tmp_retention_hours,
        interval_secs: if config.is_development() { 60 } else { 3600 }, // 1 min dev, 1 hour prod
    };
    services::start_cleanup_task(cleanup_config);
    info!(
        "Cleanup service started (file retention: {} hours)",
        config.tmp_retention_hours
    );

    // Prepare shared state
    let bind_address = config.bind_address();
    let is_development = config.is_development();
    let max_upload_size = config.max_upload_size;

    let worker_count = if is_development {
        info!(
            "Starting server at http://{} (4 workers - development mode)",
            bind_address
        );
        4
    } else {
        let cpus = num_cpus::get();
        info!(
            "Starting server at http://{} ({} workers)",
            bind_address, cpus
        );
        cpus
    };

    let config_data = web::Data::new(config);

    // Start HTTP server
    HttpServer::new(move || {
        // Configure CORS
        let cors = if is_development {
            // Permissive CORS for development
            Cors::default()
                .allowed_origin("http://localhost:3000")
                .allowed_origin("http://127.0.0.1:3000")
                .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
                .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
                .max_age(3600)
        } else {
            // Restrictive CORS for production (same-origin only)
            Cors::default()
                .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
                .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
                .max_age(3600)
        };

        App::new()
            // Add CORS middleware (must be before other middleware)
            .wrap(cors)
            // Add request logging middleware
            .wrap(RequestLogger)
            // Add shared state
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(file_service.clone()))
            .app_data(web::Data::new(queue.clone()))
            .app_data(web::Data::new(broadcaster.clone()))
            .app_data(config_data.clone())
            // Allow some multipart framing overhead on top of the file limit;
            // the exact limit is enforced while streaming
            .app_data(web::PayloadConfig::new(max_upload_size * 2))
            // Configure API routes
            .service(
                web::scope("/api/v1")
                    .configure(api::configure_health_routes)
                    .configure(api::configure_import_routes)
                    .configure(api::configure_task_routes)
                    .configure(api::configure_sourcing_record_routes)
                    .configure(api::configure_websocket_routes),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", api::ApiDoc::openapi()),
            )
    })
    .workers(worker_count)
    .bind(&bind_address)?
    .run()
    .await
}
