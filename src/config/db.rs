// src/config/db.rs
// DOCUMENTATION: Database connection pool initialization
// PURPOSE: Setup the SQLite pool backing the booking sheet store

use crate::config::Config;
use crate::db::SqliteSheetStore;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Initialize SQLite connection pool
/// DOCUMENTATION: Creates the database file if missing and installs the sheet schema
/// Called once during application startup in main.rs
pub async fn init_db_pool(config: &Config) -> Result<SqlitePool, sqlx::Error> {
    log::info!("Initializing database pool: {}", config.database_url);

    ensure_sqlite_dir(&config.database_url)?;

    let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connection_timeout))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .connect_with(options)
        .await?;

    SqliteSheetStore::migrate(&pool).await?;

    log::info!("Database pool initialized successfully");
    Ok(pool)
}

/// Create the parent directory of a file-backed SQLite URL
fn ensure_sqlite_dir(db_url: &str) -> std::io::Result<()> {
    let Some(path) = db_url
        .strip_prefix("sqlite://")
        .or_else(|| db_url.strip_prefix("sqlite:"))
    else {
        return Ok(());
    };

    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path == ":memory:" {
        return Ok(());
    }

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_url_needs_no_dir() {
        assert!(ensure_sqlite_dir("sqlite::memory:").is_ok());
    }

    #[test]
    fn test_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested/bookings.db");
        let url = format!("sqlite://{}", db_path.display());
        ensure_sqlite_dir(&url).unwrap();
        assert!(dir.path().join("nested").is_dir());
    }
}
