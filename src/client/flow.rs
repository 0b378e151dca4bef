// src/client/flow.rs
// DOCUMENTATION: Booking flow orchestration
// PURPOSE: Validate, price, check the slot, submit and remember a booking

use crate::client::{
    check_photo_count, is_urgent, BookingForm, FeeSchedule, IntakeClient, LocalBookingRecord, LocalBookings,
    SubmissionStatus,
};
use crate::errors::BookingError;
use crate::models::BookingSubmission;
use chrono::{NaiveDate, Utc};

/// Result shown on the confirmation screen
#[derive(Debug)]
pub struct BookingOutcome {
    pub status: SubmissionStatus,
    pub record: LocalBookingRecord,
}

pub struct BookingFlow<'a> {
    pub client: &'a IntakeClient,
    pub local: &'a LocalBookings,
    pub schedule: FeeSchedule,
}

impl<'a> BookingFlow<'a> {
    /// Fill in derived fields: urgency, total fee and timestamps
    pub fn prepare(&self, mut booking: BookingSubmission, today: NaiveDate) -> BookingSubmission {
        booking.is_urgent = is_urgent(&booking.booking_date, today);
        booking.total_fee = self.schedule.total_fee(&booking.locality, booking.is_urgent);
        if booking.timestamp.is_none() {
            booking.timestamp = Some(Utc::now().to_rfc3339());
        }
        if has_screenshot(&booking) && booking.payment_confirmed_at.is_none() {
            booking.payment_confirmed_at = Some(Utc::now().to_rfc3339());
            booking.status = Some("payment_confirmed".to_string());
        }
        booking
    }

    /// Run the whole flow; the endpoint's answer is awaited before anything is reported
    pub async fn confirm(
        &self,
        booking: BookingSubmission,
        today: NaiveDate,
    ) -> Result<BookingOutcome, BookingError> {
        if let Some(message) = BookingForm::from_submission(&booking).first_error() {
            return Err(BookingError::Validation(message));
        }
        check_photo_count(booking.images.len())?;
        if !has_screenshot(&booking) {
            return Err(BookingError::Validation(
                "Please upload payment screenshot to confirm your booking".to_string(),
            ));
        }

        let booking = self.prepare(booking, today);

        let slots = self.client.available_slots(&booking.booking_date).await;
        if !slots.is_available(&booking.preferred_time_slot) {
            return Err(BookingError::Validation(format!(
                "Time slot {} is already booked on {}",
                booking.preferred_time_slot, booking.booking_date
            )));
        }

        let status = self.client.submit(&booking).await;
        let record = self.local.save(&booking, status.label()).await?;

        Ok(BookingOutcome { status, record })
    }
}

fn has_screenshot(booking: &BookingSubmission) -> bool {
    booking
        .payment_screenshot
        .as_ref()
        .and_then(|s| s.data.as_deref())
        .is_some_and(|data| !data.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ImagePayload;
    use crate::services::media_service::TINY_JPEG;

    fn screenshot() -> Option<ImagePayload> {
        Some(ImagePayload {
            name: "payment.jpg".to_string(),
            data: Some(TINY_JPEG.to_string()),
        })
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn booking() -> BookingSubmission {
        BookingSubmission {
            customer_name: "Test Customer".to_string(),
            customer_phone: "9876543210".to_string(),
            locality: "Police Bazaar".to_string(),
            full_address: "123 Test Street".to_string(),
            problem_description: "Sparking socket".to_string(),
            preferred_time_slot: "14:00-16:00".to_string(),
            booking_date: "2024-01-15".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_prepare_prices_same_day_booking() {
        let client = IntakeClient::new(None);
        let local = LocalBookings::new("unused.json");
        let flow = BookingFlow { client: &client, local: &local, schedule: FeeSchedule::PerLocality };

        let mut input = booking();
        input.payment_screenshot = screenshot();

        let prepared = flow.prepare(input, day(2024, 1, 15));
        assert!(prepared.is_urgent);
        assert_eq!(prepared.total_fee, 300);
        assert!(prepared.timestamp.is_some());
        assert!(prepared.payment_confirmed_at.is_some());
        assert_eq!(prepared.status.as_deref(), Some("payment_confirmed"));

        let later = flow.prepare(booking(), day(2024, 1, 10));
        assert!(!later.is_urgent);
        assert_eq!(later.total_fee, 200);
        assert!(later.payment_confirmed_at.is_none());
    }

    #[actix_rt::test]
    async fn test_invalid_booking_is_not_sent() {
        let dir = tempfile::tempdir().unwrap();
        let client = IntakeClient::new(None);
        let local = LocalBookings::new(dir.path().join("bookings.json"));
        let flow = BookingFlow { client: &client, local: &local, schedule: FeeSchedule::PerLocality };

        let mut input = booking();
        input.customer_phone = "123".to_string();

        let err = flow.confirm(input, day(2024, 1, 10)).await.unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Enter a 10-digit phone number");
        assert!(local.load().await.is_empty());
    }

    #[actix_rt::test]
    async fn test_unconfigured_endpoint_keeps_pending_copy() {
        let dir = tempfile::tempdir().unwrap();
        let client = IntakeClient::new(None);
        let local = LocalBookings::new(dir.path().join("bookings.json"));
        let flow = BookingFlow { client: &client, local: &local, schedule: FeeSchedule::Discounted };

        let mut input = booking();
        input.payment_screenshot = screenshot();

        let outcome = flow.confirm(input, day(2024, 1, 10)).await.unwrap();
        assert!(matches!(outcome.status, SubmissionStatus::NotConfigured));
        assert_eq!(outcome.record.sync_status, "pending");
        assert_eq!(outcome.record.booking.total_fee, 200);
        assert!(outcome.record.booking.payment_confirmed_at.is_some());
        assert_eq!(local.load().await.len(), 1);
    }

    #[actix_rt::test]
    async fn test_booking_without_payment_screenshot_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let client = IntakeClient::new(None);
        let local = LocalBookings::new(dir.path().join("bookings.json"));
        let flow = BookingFlow { client: &client, local: &local, schedule: FeeSchedule::PerLocality };

        let err = flow.confirm(booking(), day(2024, 1, 10)).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: Please upload payment screenshot to confirm your booking"
        );

        let mut empty_shot = booking();
        empty_shot.payment_screenshot = Some(ImagePayload { name: "pay.jpg".to_string(), data: None });
        assert!(flow.confirm(empty_shot, day(2024, 1, 10)).await.is_err());

        assert!(local.load().await.is_empty());
    }

    #[actix_rt::test]
    async fn test_too_many_photos_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let client = IntakeClient::new(None);
        let local = LocalBookings::new(dir.path().join("bookings.json"));
        let flow = BookingFlow { client: &client, local: &local, schedule: FeeSchedule::PerLocality };

        let mut input = booking();
        input.payment_screenshot = screenshot();
        input.images = (0..7)
            .map(|i| ImagePayload { name: format!("p{}.jpg", i), data: Some(TINY_JPEG.to_string()) })
            .collect();

        let err = flow.confirm(input, day(2024, 1, 10)).await.unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));
        assert!(local.load().await.is_empty());
    }
}
