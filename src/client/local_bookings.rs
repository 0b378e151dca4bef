// src/client/local_bookings.rs
// DOCUMENTATION: Client-side copy of submitted bookings
// PURPOSE: Back the "my bookings" listing; never reconciled with the booking sheet

use crate::errors::BookingError;
use crate::models::BookingSubmission;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// One locally remembered booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalBookingRecord {
    pub id: String,
    pub saved_at: String,
    /// confirmed, failed or pending (endpoint not configured)
    pub sync_status: String,
    #[serde(flatten)]
    pub booking: BookingSubmission,
}

/// JSON file holding the local booking list
pub struct LocalBookings {
    path: PathBuf,
}

impl LocalBookings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// All saved bookings; a missing or unreadable file is an empty list
    pub async fn load(&self) -> Vec<LocalBookingRecord> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(_) => return Vec::new(),
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable local bookings at {}: {}", self.path.display(), e);
            Vec::new()
        })
    }

    /// Remember a booking; inline image data is dropped, names are kept
    pub async fn save(
        &self,
        booking: &BookingSubmission,
        sync_status: &str,
    ) -> Result<LocalBookingRecord, BookingError> {
        let mut booking = booking.clone();
        for image in booking.images.iter_mut() {
            image.data = None;
        }
        if let Some(screenshot) = booking.payment_screenshot.as_mut() {
            screenshot.data = None;
        }

        let record = LocalBookingRecord {
            id: Uuid::new_v4().to_string(),
            saved_at: Utc::now().to_rfc3339(),
            sync_status: sync_status.to_string(),
            booking,
        };

        let mut records = self.load().await;
        records.push(record.clone());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(&records)
            .map_err(|e| BookingError::StoreOperation(e.to_string()))?;
        tokio::fs::write(&self.path, json).await?;

        Ok(record)
    }
}
