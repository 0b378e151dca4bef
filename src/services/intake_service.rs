// src/services/intake_service.rs
// DOCUMENTATION: Booking intake business logic
// PURPOSE: Persist uploaded media, derive the sheet row, answer availability

use crate::db::BookingRepository;
use crate::errors::BookingError;
use crate::models::{AvailabilityResponse, BookingSubmission, CellValue, IntakeAck};
use crate::services::{compute_availability, MediaService};
use chrono::{FixedOffset, NaiveDate, Utc};

/// Separator used for joined names and links in a single cell
pub const CELL_LIST_SEPARATOR: &str = ", ";

pub struct IntakeService {
    repository: BookingRepository,
    media: MediaService,
    sheet_offset: FixedOffset,
}

impl IntakeService {
    pub fn new(repository: BookingRepository, media: MediaService, sheet_offset: FixedOffset) -> Self {
        Self {
            repository,
            media,
            sheet_offset,
        }
    }

    /// Write path
    /// DOCUMENTATION: Images first, then the screenshot, then one appended row.
    /// Image problems shorten the link list; store failures abort the request.
    pub async fn submit(&self, submission: BookingSubmission) -> Result<IntakeAck, BookingError> {
        log::info!(
            "Received booking for {} on {} ({})",
            submission.customer_name,
            submission.booking_date,
            submission.preferred_time_slot
        );

        let customer_key = submission.customer_key();

        let image_links = if submission.images.is_empty() {
            Vec::new()
        } else {
            self.media.save_images(&submission.images, &customer_key).await
        };

        let mut screenshot_link = String::new();
        if let Some(screenshot) = submission
            .payment_screenshot
            .as_ref()
            .filter(|s| s.data.is_some())
        {
            let links = self
                .media
                .save_images(std::slice::from_ref(screenshot), &customer_key)
                .await;
            if let Some(link) = links.into_iter().next() {
                log::info!("Payment screenshot link: {}", link);
                screenshot_link = link;
            }
        }

        let mut row = self.prepare_row(&submission);
        row.push(CellValue::text(image_links.join(CELL_LIST_SEPARATOR)));
        row.push(CellValue::text(screenshot_link));

        self.repository.append(row).await?;

        Ok(IntakeAck::saved())
    }

    /// Read path
    pub async fn available_slots(&self, date: &str) -> Result<AvailabilityResponse, BookingError> {
        let values = self.repository.values().await?;
        compute_availability(date, &values)
    }

    /// Row cells up to and including the payment screenshot name
    pub fn prepare_row(&self, submission: &BookingSubmission) -> Vec<CellValue> {
        let timestamp = submission
            .timestamp
            .clone()
            .unwrap_or_else(|| Utc::now().to_rfc3339());

        let image_names: Vec<&str> = submission.images.iter().map(|i| i.name.as_str()).collect();
        let screenshot_name = submission
            .payment_screenshot
            .as_ref()
            .map(|s| s.name.clone())
            .unwrap_or_default();

        vec![
            CellValue::text(timestamp),
            CellValue::text(&submission.customer_name),
            CellValue::text(&submission.customer_phone),
            CellValue::text(&submission.locality),
            CellValue::text(&submission.landmark),
            CellValue::text(&submission.full_address),
            CellValue::text(&submission.problem_description),
            CellValue::text(&submission.preferred_time_slot),
            self.booking_date_cell(&submission.booking_date),
            CellValue::text(if submission.is_urgent { "Yes" } else { "No" }),
            CellValue::Number(submission.total_fee),
            CellValue::text(submission.payment_confirmed_at.clone().unwrap_or_default()),
            CellValue::Number(submission.images.len() as i64),
            CellValue::text(image_names.join(CELL_LIST_SEPARATOR)),
            CellValue::text(screenshot_name),
        ]
    }

    /// `YYYY-MM-DD` becomes a native date cell, like a spreadsheet would store it
    fn booking_date_cell(&self, raw: &str) -> CellValue {
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .ok()
            .and_then(|date| CellValue::date_at_midnight(date, self.sheet_offset))
            .unwrap_or_else(|| CellValue::text(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_store;
    use crate::models::{ImagePayload, PlacementPolicy, SHEET_HEADERS};
    use crate::services::media_service::TINY_JPEG;
    use crate::services::LocalMediaStore;
    use std::sync::Arc;

    async fn service(dir: &std::path::Path, policy: PlacementPolicy) -> IntakeService {
        let repository = BookingRepository::new(Arc::new(memory_store().await), "Bookings");
        let store = Arc::new(LocalMediaStore::new(dir, "http://localhost/media"));
        let media = MediaService::new(store, "Optimum Electricals Bookings", policy);
        IntakeService::new(repository, media, FixedOffset::east_opt(330 * 60).unwrap())
    }

    fn test_customer() -> BookingSubmission {
        BookingSubmission {
            customer_name: "Test Customer".to_string(),
            customer_phone: "9876543210".to_string(),
            locality: "Rilbong".to_string(),
            booking_date: "2024-01-15".to_string(),
            preferred_time_slot: "10:00-12:00".to_string(),
            total_fee: 100,
            ..Default::default()
        }
    }

    async fn last_row(service: &IntakeService) -> Vec<CellValue> {
        service.repository.values().await.unwrap().pop().unwrap()
    }

    #[actix_rt::test]
    async fn test_zero_images_leaves_link_columns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path(), PlacementPolicy::SizeBased).await;

        let ack = service.submit(test_customer()).await.unwrap();
        assert!(ack.success);
        assert_eq!(ack.message.as_deref(), Some("Booking saved successfully"));

        let row = last_row(&service).await;
        assert_eq!(row.len(), SHEET_HEADERS.len());
        assert_eq!(row[9], CellValue::text("No"));
        assert_eq!(row[10], CellValue::Number(100));
        assert_eq!(row[12], CellValue::Number(0));
        assert_eq!(row[15], CellValue::text(""));
        assert_eq!(row[16], CellValue::text(""));
    }

    #[actix_rt::test]
    async fn test_single_image_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path(), PlacementPolicy::SizeBased).await;

        let mut submission = test_customer();
        submission.images = vec![ImagePayload {
            name: "a.jpg".to_string(),
            data: Some(TINY_JPEG.to_string()),
        }];
        submission.payment_screenshot = Some(ImagePayload {
            name: "payment-screenshot.jpg".to_string(),
            data: Some(TINY_JPEG.to_string()),
        });
        submission.payment_confirmed_at = Some("2024-01-14T09:00:00Z".to_string());

        assert!(service.submit(submission).await.unwrap().success);

        let row = last_row(&service).await;
        assert_eq!(row[11], CellValue::text("2024-01-14T09:00:00Z"));
        assert_eq!(row[12], CellValue::Number(1));
        assert_eq!(row[13], CellValue::text("a.jpg"));
        assert_eq!(row[14], CellValue::text("payment-screenshot.jpg"));

        let image_link = row[15].to_string();
        assert!(image_link.starts_with("http://localhost/media/"));
        assert!(image_link.ends_with("_a.jpg"));
        assert!(!image_link.contains(CELL_LIST_SEPARATOR));
        assert!(row[16].to_string().ends_with("_payment-screenshot.jpg"));
    }

    #[actix_rt::test]
    async fn test_invalid_images_still_append_row() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path(), PlacementPolicy::SizeBased).await;

        let mut submission = test_customer();
        submission.images = vec![
            ImagePayload { name: "a.jpg".to_string(), data: None },
            ImagePayload { name: "b.jpg".to_string(), data: Some(String::new()) },
        ];

        assert!(service.submit(submission).await.unwrap().success);

        let row = last_row(&service).await;
        assert_eq!(row[12], CellValue::Number(2));
        assert_eq!(row[13], CellValue::text("a.jpg, b.jpg"));
        assert_eq!(row[15], CellValue::text(""));
    }

    #[actix_rt::test]
    async fn test_submission_feeds_availability() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path(), PlacementPolicy::SizeBased).await;

        service.submit(test_customer()).await.unwrap();

        let row = last_row(&service).await;
        assert_eq!(row[8].type_name(), "date");

        let result = service.available_slots("2024-01-15").await.unwrap();
        assert_eq!(result.booked_time_slots, vec!["10:00-12:00"]);
        assert_eq!(result.available_time_slots.len(), 5);

        let other_day = service.available_slots("2024-01-14").await.unwrap();
        assert!(other_day.booked_time_slots.is_empty());
    }

    #[actix_rt::test]
    async fn test_prepare_row_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path(), PlacementPolicy::SizeBased).await;

        let row = service.prepare_row(&BookingSubmission {
            booking_date: "next tuesday".to_string(),
            is_urgent: true,
            ..Default::default()
        });

        assert_eq!(row.len(), SHEET_HEADERS.len() - 2);
        assert!(matches!(row[0], CellValue::Text(ref ts) if !ts.is_empty()));
        assert_eq!(row[1], CellValue::text(""));
        assert_eq!(row[8], CellValue::text("next tuesday"));
        assert_eq!(row[9], CellValue::text("Yes"));
        assert_eq!(row[10], CellValue::Number(0));
        assert_eq!(row[14], CellValue::text(""));
    }
}
