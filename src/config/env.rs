// src/config/env.rs
// DOCUMENTATION: Environment variable management
// PURPOSE: Load and validate configuration from .env files

use crate::errors::BookingError;
use crate::models::PlacementPolicy;
use dotenv::dotenv;
use std::env;

/// Application configuration loaded from environment variables
/// DOCUMENTATION: Centralizes all configuration in one struct
/// Load with Config::from_env() at application startup
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection string for the booking sheet store
    /// Format: sqlite://path/to/bookings.db
    pub database_url: String,

    /// Server bind address (e.g., "127.0.0.1")
    pub server_address: String,

    /// Server listen port (default 8002)
    pub server_port: u16,

    /// Environment: development, staging, production
    pub environment: String,

    /// Log level: debug, info, warn, error
    pub log_level: String,

    /// Maximum connections in database pool
    pub db_max_connections: u32,

    /// Connection timeout in seconds
    pub db_connection_timeout: u64,

    /// Name of the sheet holding booking rows
    pub sheet_name: String,

    /// UTC offset (minutes) the sheet uses for native date cells
    pub sheet_utc_offset_minutes: i32,

    /// Directory backing the media store
    pub media_root: String,

    /// Public URL prefix under which media files are shared
    pub media_base_url: String,

    /// Name of the root collection holding all booking media
    pub media_root_collection: String,

    /// Media placement policy: "size-based" or "customer-keyed"
    pub media_placement: String,
}

impl Config {
    /// Load configuration from environment variables
    /// DOCUMENTATION: Reads from .env or process environment
    /// Called once at application startup
    pub fn from_env() -> Self {
        dotenv().ok();

        Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://data/bookings.db".to_string()),

            server_address: env::var("SERVER_ADDRESS").unwrap_or_else(|_| "127.0.0.1".to_string()),

            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8002".to_string())
                .parse()
                .unwrap_or(8002),

            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),

            db_connection_timeout: env::var("DB_CONNECTION_TIMEOUT")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),

            sheet_name: env::var("SHEET_NAME").unwrap_or_else(|_| "Bookings".to_string()),

            sheet_utc_offset_minutes: env::var("SHEET_UTC_OFFSET_MINUTES")
                .unwrap_or_else(|_| "330".to_string())
                .parse()
                .unwrap_or(330),

            media_root: env::var("MEDIA_ROOT").unwrap_or_else(|_| "data/media".to_string()),

            media_base_url: env::var("MEDIA_BASE_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8002/media".to_string()),

            media_root_collection: env::var("MEDIA_ROOT_COLLECTION")
                .unwrap_or_else(|_| "Optimum Electricals Bookings".to_string()),

            media_placement: env::var("MEDIA_PLACEMENT")
                .unwrap_or_else(|_| "size-based".to_string()),
        }
    }

    /// Parsed media placement policy
    pub fn placement_policy(&self) -> Result<PlacementPolicy, BookingError> {
        self.media_placement.parse()
    }

    /// Validate critical configuration
    /// DOCUMENTATION: Ensures application can start safely
    pub fn validate(&self) -> Result<(), String> {
        if self.database_url.is_empty() {
            return Err("DATABASE_URL is required".to_string());
        }

        if self.sheet_name.trim().is_empty() {
            return Err("SHEET_NAME must not be empty".to_string());
        }

        if !(-720..=840).contains(&self.sheet_utc_offset_minutes) {
            return Err(format!(
                "SHEET_UTC_OFFSET_MINUTES out of range: {}",
                self.sheet_utc_offset_minutes
            ));
        }

        self.placement_policy().map_err(|e| e.to_string())?;

        if self.media_base_url.is_empty() {
            log::warn!("MEDIA_BASE_URL not configured - shared links will be relative");
        }

        Ok(())
    }
}
