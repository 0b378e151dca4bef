// src/db/sheet_repository.rs
// DOCUMENTATION: Spreadsheet-shaped row store
// PURPOSE: Named sheets of JSON-encoded cell rows; the first row of a sheet is its header

use crate::errors::BookingError;
use crate::models::CellValue;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

/// Tabular store port
/// DOCUMENTATION: The intake endpoint is the only writer. Rows are append-only;
/// there is no update or delete operation.
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// Create the sheet with its header row unless it already exists.
    /// Returns true when the sheet was created by this call.
    async fn ensure_sheet(&self, name: &str, headers: &[&str]) -> Result<bool, BookingError>;

    /// Append one row to the end of the sheet
    async fn append_row(&self, name: &str, row: &[CellValue]) -> Result<(), BookingError>;

    /// All rows of the sheet, header row first. A missing sheet has no rows.
    async fn get_values(&self, name: &str) -> Result<Vec<Vec<CellValue>>, BookingError>;
}

pub struct SqliteSheetStore {
    pool: SqlitePool,
}

impl SqliteSheetStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Install the sheet tables
    pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sheets (
                name TEXT PRIMARY KEY,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sheet_rows (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                sheet_name TEXT NOT NULL REFERENCES sheets(name),
                cells TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_sheet_rows_sheet ON sheet_rows (sheet_name, id)")
            .execute(pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl SheetStore for SqliteSheetStore {
    async fn ensure_sheet(&self, name: &str, headers: &[&str]) -> Result<bool, BookingError> {
        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await.map_err(|e| {
            log::error!("Failed to open transaction for sheet {}: {}", name, e);
            BookingError::StoreOperation(format!("Begin transaction failed: {}", e))
        })?;

        let created = sqlx::query("INSERT OR IGNORE INTO sheets (name, created_at) VALUES (?1, ?2)")
            .bind(name)
            .bind(&now)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                log::error!("Failed to create sheet {}: {}", name, e);
                BookingError::StoreOperation(format!("Create sheet failed: {}", e))
            })?
            .rows_affected()
            == 1;

        if created {
            let header_row: Vec<CellValue> = headers.iter().map(|h| CellValue::text(*h)).collect();
            let cells = encode_row(&header_row)?;
            sqlx::query("INSERT INTO sheet_rows (sheet_name, cells, created_at) VALUES (?1, ?2, ?3)")
                .bind(name)
                .bind(&cells)
                .bind(&now)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    log::error!("Failed to write header row for {}: {}", name, e);
                    BookingError::StoreOperation(format!("Write header failed: {}", e))
                })?;
        }

        tx.commit().await.map_err(|e| {
            BookingError::StoreOperation(format!("Commit failed: {}", e))
        })?;

        if created {
            log::info!("Created sheet '{}' with {} header columns", name, headers.len());
        }
        Ok(created)
    }

    async fn append_row(&self, name: &str, row: &[CellValue]) -> Result<(), BookingError> {
        let cells = encode_row(row)?;

        sqlx::query(
            r#"
            INSERT INTO sheet_rows (sheet_name, cells, created_at)
            SELECT name, ?2, ?3 FROM sheets WHERE name = ?1
            "#,
        )
        .bind(name)
        .bind(&cells)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Failed to append row to {}: {}", name, e);
            BookingError::StoreOperation(format!("Append row failed: {}", e))
        })
        .and_then(|result| {
            if result.rows_affected() == 1 {
                Ok(())
            } else {
                Err(BookingError::StoreOperation(format!("Sheet not found: {}", name)))
            }
        })
    }

    async fn get_values(&self, name: &str) -> Result<Vec<Vec<CellValue>>, BookingError> {
        let rows = sqlx::query_as::<_, (String,)>(
            r#"
            SELECT cells FROM sheet_rows
            WHERE sheet_name = ?1
            ORDER BY id ASC
            "#,
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Failed to read sheet {}: {}", name, e);
            BookingError::StoreOperation(format!("Read sheet failed: {}", e))
        })?;

        rows.into_iter()
            .map(|(cells,)| {
                serde_json::from_str::<Vec<CellValue>>(&cells).map_err(|e| {
                    BookingError::StoreOperation(format!("Corrupt row in {}: {}", name, e))
                })
            })
            .collect()
    }
}

fn encode_row(row: &[CellValue]) -> Result<String, BookingError> {
    serde_json::to_string(row)
        .map_err(|e| BookingError::StoreOperation(format!("Encode row failed: {}", e)))
}

/// In-memory store; one connection so every query sees the same database
#[cfg(test)]
pub(crate) async fn memory_store() -> SqliteSheetStore {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    SqliteSheetStore::migrate(&pool).await.unwrap();
    SqliteSheetStore::new(pool)
}
