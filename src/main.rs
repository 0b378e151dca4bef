// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, sheet store, media store and start HTTP server

use actix_web::{middleware::Logger, web, App, HttpServer};
use chrono::FixedOffset;
use dotenv::dotenv;
use optimum_bookings::config::{self, Config};
use optimum_bookings::db::{BookingRepository, SqliteSheetStore};
use optimum_bookings::handlers;
use optimum_bookings::services::{IntakeService, LocalMediaStore, MediaService};
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    }

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            &config.log_level
        } else {
            "info,actix_web=info,sqlx=warn"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    log::info!("Starting optimum-bookings intake service...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    let placement = match config.placement_policy() {
        Ok(policy) => policy,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };
    let Some(sheet_offset) = FixedOffset::east_opt(config.sheet_utc_offset_minutes * 60) else {
        log::error!(
            "SHEET_UTC_OFFSET_MINUTES out of range: {}",
            config.sheet_utc_offset_minutes
        );
        std::process::exit(1);
    };

    // 4. Initialize sheet store
    let pool = match config::init_db_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to open sheet store: {}", e);
            std::process::exit(1);
        }
    };
    let repository = BookingRepository::new(
        Arc::new(SqliteSheetStore::new(pool)),
        config.sheet_name.clone(),
    );

    // 5. Initialize media store
    let media_store = Arc::new(LocalMediaStore::new(
        config.media_root.clone(),
        config.media_base_url.clone(),
    ));
    let media = MediaService::new(
        media_store.clone(),
        config.media_root_collection.clone(),
        placement,
    );
    log::info!(
        "Media root: {} (placement: {:?})",
        config.media_root,
        placement
    );

    let intake = web::Data::new(IntakeService::new(repository, media, sheet_offset));
    let media_files = web::Data::from(media_store);

    // 6. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);

    HttpServer::new(move || {
        App::new()
            // Application state (intake service and media store)
            .app_data(intake.clone())
            .app_data(media_files.clone())
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::media_config)
            .configure(handlers::intake_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}
