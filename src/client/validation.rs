// src/client/validation.rs
// DOCUMENTATION: Booking form validation
// PURPOSE: Reject incomplete bookings before anything is sent

use crate::models::{BookingSubmission, ALL_TIME_SLOTS};
use chrono::NaiveDate;
use validator::{Validate, ValidationError};

/// Fields a customer fills in before paying
#[derive(Debug, Clone, Validate)]
pub struct BookingForm {
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    pub name: String,

    #[validate(custom(function = "ten_digit_phone", message = "Enter a 10-digit phone number"))]
    pub phone: String,

    #[validate(custom(function = "not_blank", message = "Locality is required"))]
    pub locality: String,

    #[validate(custom(function = "not_blank", message = "Full address is required"))]
    pub address: String,

    #[validate(custom(function = "not_blank", message = "Problem description is required"))]
    pub problem: String,

    #[validate(custom(function = "known_time_slot", message = "Please choose a preferred time slot"))]
    pub time_slot: String,

    #[validate(custom(function = "calendar_date", message = "Please select a booking date"))]
    pub booking_date: String,
}

/// Field order in which errors are reported
const FIELD_ORDER: [&str; 7] = [
    "name",
    "phone",
    "locality",
    "address",
    "problem",
    "time_slot",
    "booking_date",
];

impl BookingForm {
    pub fn from_submission(submission: &BookingSubmission) -> Self {
        BookingForm {
            name: submission.customer_name.clone(),
            phone: submission.customer_phone.clone(),
            locality: submission.locality.clone(),
            address: submission.full_address.clone(),
            problem: submission.problem_description.clone(),
            time_slot: submission.preferred_time_slot.clone(),
            booking_date: submission.booking_date.clone(),
        }
    }

    /// First failing field's message, in form order
    pub fn first_error(&self) -> Option<String> {
        let errors = self.validate().err()?;
        let field_errors = errors.field_errors();

        FIELD_ORDER.iter().find_map(|field| {
            field_errors.get(field).and_then(|errs| {
                errs.first().map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                })
            })
        })
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

fn ten_digit_phone(value: &str) -> Result<(), ValidationError> {
    if value.chars().filter(char::is_ascii_digit).count() != 10 {
        return Err(ValidationError::new("phone"));
    }
    Ok(())
}

fn known_time_slot(value: &str) -> Result<(), ValidationError> {
    if !ALL_TIME_SLOTS.contains(&value) {
        return Err(ValidationError::new("time_slot"));
    }
    Ok(())
}

fn calendar_date(value: &str) -> Result<(), ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| ValidationError::new("date"))
}
