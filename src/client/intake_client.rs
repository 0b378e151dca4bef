// src/client/intake_client.rs
// DOCUMENTATION: HTTP client for the booking intake endpoint
// PURPOSE: Fetch slot availability (fail-open) and submit bookings (awaited)

use crate::errors::BookingError;
use crate::models::{all_time_slots, AvailabilityResponse, BookingSubmission, IntakeAck};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Serialize;
use std::env;
use std::time::Duration;

/// Slot picker state for a date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotAvailability {
    pub all: Vec<String>,
    pub booked: Vec<String>,
    pub available: Vec<String>,
    /// True when the endpoint could not be asked and every slot is offered
    pub degraded: bool,
}

impl SlotAvailability {
    fn everything_open() -> Self {
        let all = all_time_slots();
        SlotAvailability {
            available: all.clone(),
            all,
            booked: Vec::new(),
            degraded: true,
        }
    }

    pub fn is_available(&self, slot: &str) -> bool {
        self.available.iter().any(|s| s == slot)
    }
}

/// Outcome of a booking submission
#[derive(Debug, Clone)]
pub enum SubmissionStatus {
    Confirmed(IntakeAck),
    Failed(String),
    NotConfigured,
}

impl SubmissionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SubmissionStatus::Confirmed(_) => "confirmed",
            SubmissionStatus::Failed(_) => "failed",
            SubmissionStatus::NotConfigured => "pending",
        }
    }
}

/// Intake endpoint client
/// DOCUMENTATION: A missing base URL is a valid configuration; reads then offer
/// every slot and writes report `NotConfigured` instead of failing.
pub struct IntakeClient {
    client: Client,
    base_url: Option<String>,
}

impl IntakeClient {
    pub fn new(base_url: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
        }
    }

    /// Base URL from `BOOKING_API_URL`
    pub fn from_env() -> Self {
        Self::new(env::var("BOOKING_API_URL").ok())
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    /// Availability for `date`; any failure offers every slot
    pub async fn available_slots(&self, date: &str) -> SlotAvailability {
        let Some(base_url) = self.base_url.as_deref() else {
            log::warn!("Booking API URL not configured - treating all slots as available");
            return SlotAvailability::everything_open();
        };

        match self.fetch_availability(base_url, date).await {
            Ok(response) => SlotAvailability {
                all: response.all_time_slots,
                booked: response.booked_time_slots,
                available: response.available_time_slots,
                degraded: false,
            },
            Err(e) => {
                log::warn!("Availability check failed for {}: {} - treating all slots as available", date, e);
                SlotAvailability::everything_open()
            }
        }
    }

    async fn fetch_availability(
        &self,
        base_url: &str,
        date: &str,
    ) -> Result<AvailabilityResponse, BookingError> {
        let response = self
            .client
            .get(format!("{}/", base_url))
            .query(&[("action", "getAvailableTimeSlots"), ("date", date)])
            .send()
            .await
            .map_err(|e| BookingError::ExternalApi(e.to_string()))?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| BookingError::ExternalApi(format!("Failed to parse response: {}", e)))?;

        if body.get("success").and_then(serde_json::Value::as_bool) != Some(true) {
            let error = body
                .get("error")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("unknown error");
            return Err(BookingError::ExternalApi(error.to_string()));
        }

        serde_json::from_value(body)
            .map_err(|e| BookingError::ExternalApi(format!("Unexpected response shape: {}", e)))
    }

    /// Submit a booking and wait for the endpoint's acknowledgement
    pub async fn submit(&self, submission: &BookingSubmission) -> SubmissionStatus {
        let Some(base_url) = self.base_url.as_deref() else {
            log::error!("Booking API URL is not configured - booking kept locally only");
            return SubmissionStatus::NotConfigured;
        };

        match self.post_submission(base_url, submission).await {
            Ok(ack) if ack.success => SubmissionStatus::Confirmed(ack),
            Ok(ack) => SubmissionStatus::Failed(
                ack.error.unwrap_or_else(|| "Booking was not saved".to_string()),
            ),
            Err(e) => {
                log::error!("Booking submission failed: {}", e);
                SubmissionStatus::Failed(e.to_string())
            }
        }
    }

    async fn post_submission(
        &self,
        base_url: &str,
        submission: &BookingSubmission,
    ) -> Result<IntakeAck, BookingError> {
        let body = serde_json::to_string(submission)
            .map_err(|e| BookingError::InvalidPayload(e.to_string()))?;

        let response = self
            .client
            .post(format!("{}/", base_url))
            // Plain text avoids a CORS preflight when the same endpoint serves browsers
            .header(CONTENT_TYPE, "text/plain;charset=utf-8")
            .body(body)
            .send()
            .await
            .map_err(|e| BookingError::ExternalApi(e.to_string()))?;

        response
            .json::<IntakeAck>()
            .await
            .map_err(|e| BookingError::ExternalApi(format!("Failed to parse response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{memory_store, BookingRepository};
    use crate::handlers;
    use crate::models::PlacementPolicy;
    use crate::services::{IntakeService, LocalMediaStore, MediaService};
    use actix_web::{web, App, HttpServer};
    use chrono::FixedOffset;
    use std::sync::Arc;

    /// Run the intake endpoint on an ephemeral port and return its base URL
    async fn spawn_intake(dir: &std::path::Path) -> String {
        let repository = BookingRepository::new(Arc::new(memory_store().await), "Bookings");
        let store = Arc::new(LocalMediaStore::new(dir, "http://localhost/media"));
        let media = MediaService::new(store, "Optimum Electricals Bookings", PlacementPolicy::SizeBased);
        let service = web::Data::new(IntakeService::new(
            repository,
            media,
            FixedOffset::east_opt(330 * 60).unwrap(),
        ));

        let server = HttpServer::new(move || {
            App::new()
                .app_data(service.clone())
                .configure(handlers::intake_config)
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
        let addr = server.addrs()[0];
        actix_rt::spawn(server.run());

        format!("http://{}", addr)
    }

    fn booking() -> BookingSubmission {
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

    #[actix_rt::test]
    async fn test_unconfigured_client_fails_open() {
        let client = IntakeClient::new(Some("   ".to_string()));
        assert!(!client.is_configured());

        let slots = client.available_slots("2024-01-15").await;
        assert!(slots.degraded);
        assert_eq!(slots.available, all_time_slots());

        assert!(matches!(client.submit(&booking()).await, SubmissionStatus::NotConfigured));
    }

    #[actix_rt::test]
    async fn test_unreachable_endpoint_fails_open() {
        let client = IntakeClient::new(Some("http://127.0.0.1:1".to_string()));

        let slots = client.available_slots("2024-01-15").await;
        assert!(slots.degraded);
        assert_eq!(slots.available.len(), 6);

        let status = client.submit(&booking()).await;
        assert_eq!(status.label(), "failed");
    }

    #[actix_rt::test]
    async fn test_round_trip_against_intake() {
        let dir = tempfile::tempdir().unwrap();
        let client = IntakeClient::new(Some(spawn_intake(dir.path()).await));

        let before = client.available_slots("2024-01-15").await;
        assert!(!before.degraded);
        assert!(before.is_available("10:00-12:00"));

        let status = client.submit(&booking()).await;
        assert!(matches!(status, SubmissionStatus::Confirmed(ref ack) if ack.success));

        let after = client.available_slots("2024-01-15").await;
        assert!(!after.degraded);
        assert_eq!(after.booked, vec!["10:00-12:00"]);
        assert!(!after.is_available("10:00-12:00"));
        assert_eq!(after.available.len(), 5);
    }
}
