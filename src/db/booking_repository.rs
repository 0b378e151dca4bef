// src/db/booking_repository.rs
// DOCUMENTATION: Booking rows on top of the sheet store
// PURPOSE: Append booking records and read the booking sheet back for availability

use crate::db::SheetStore;
use crate::errors::BookingError;
use crate::models::{CellValue, SHEET_HEADERS};
use std::sync::Arc;

/// Booking sheet accessor
/// DOCUMENTATION: Ensures the sheet (and its header row) exists before every
/// read or write, so first use needs no setup step.
#[derive(Clone)]
pub struct BookingRepository {
    store: Arc<dyn SheetStore>,
    sheet_name: String,
}

impl BookingRepository {
    pub fn new(store: Arc<dyn SheetStore>, sheet_name: impl Into<String>) -> Self {
        Self {
            store,
            sheet_name: sheet_name.into(),
        }
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    async fn ensure_sheet(&self) -> Result<(), BookingError> {
        self.store
            .ensure_sheet(&self.sheet_name, &SHEET_HEADERS)
            .await
            .map(|_| ())
    }

    /// Append one booking row
    pub async fn append(&self, row: Vec<CellValue>) -> Result<(), BookingError> {
        self.ensure_sheet().await?;
        self.store.append_row(&self.sheet_name, &row).await?;
        log::info!("Booking row appended to '{}'", self.sheet_name);
        Ok(())
    }

    /// Whole sheet, header row first
    pub async fn values(&self) -> Result<Vec<Vec<CellValue>>, BookingError> {
        self.ensure_sheet().await?;
        self.store.get_values(&self.sheet_name).await
    }
}
