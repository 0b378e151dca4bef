// src/services/availability.rs
// DOCUMENTATION: Slot availability computation
// PURPOSE: Derive booked and free slots for a date from the booking sheet

use crate::errors::BookingError;
use crate::models::{
    all_time_slots, AvailabilityResponse, CellValue, BOOKING_DATE_HEADER, TIME_SLOT_HEADER,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::json;

/// Normalize a stored booking date to `YYYY-MM-DD`
/// DOCUMENTATION: Native dates and parseable strings use the calendar date in
/// their own offset, so a midnight stored at +05:30 never slides to the previous
/// day. Opaque strings keep whatever precedes a `T` time suffix.
pub fn normalize_date(cell: &CellValue) -> String {
    match cell {
        CellValue::Date(dt) => dt.date_naive().format("%Y-%m-%d").to_string(),
        CellValue::Text(s) => {
            let trimmed = s.trim();
            match parse_calendar_date(trimmed) {
                Some(date) => date.format("%Y-%m-%d").to_string(),
                None => trimmed.split('T').next().unwrap_or("").trim().to_string(),
            }
        }
        CellValue::Number(n) => n.to_string(),
        CellValue::Empty => String::new(),
    }
}

fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
    }
    for format in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }
    None
}

/// Compute availability for `date` from the sheet values (header row first)
pub fn compute_availability(
    date: &str,
    values: &[Vec<CellValue>],
) -> Result<AvailabilityResponse, BookingError> {
    let headers: Vec<String> = values
        .first()
        .map(|row| row.iter().map(|c| c.to_string().trim().to_string()).collect())
        .unwrap_or_default();

    let date_index = headers.iter().position(|h| h == BOOKING_DATE_HEADER);
    let slot_index = headers.iter().position(|h| h == TIME_SLOT_HEADER);
    let (Some(date_index), Some(slot_index)) = (date_index, slot_index) else {
        return Err(BookingError::ColumnsNotFound);
    };

    let bookings = values.get(1..).unwrap_or_default();
    let empty = CellValue::Empty;

    let mut considered = Vec::with_capacity(bookings.len());
    let mut booked: Vec<String> = Vec::new();

    for row in bookings {
        let date_cell = row.get(date_index).unwrap_or(&empty);
        let slot_cell = row.get(slot_index).unwrap_or(&empty);
        let normalized = normalize_date(date_cell);

        considered.push(json!({
            "date": date_cell.to_json(),
            "timeSlot": slot_cell.to_json(),
            "dateType": date_cell.type_name(),
            "normalizedDate": normalized,
            "fullRow": row.iter().map(CellValue::to_json).collect::<Vec<_>>(),
        }));

        if normalized != date {
            continue;
        }
        let slot = slot_cell.to_string().trim().to_string();
        if !slot.is_empty() && !booked.contains(&slot) {
            booked.push(slot);
        }
    }

    let all = all_time_slots();
    let available: Vec<String> = all
        .iter()
        .filter(|slot| !booked.contains(slot))
        .cloned()
        .collect();

    log::debug!(
        "Availability for {}: {} booked, {} available ({} rows scanned)",
        date,
        booked.len(),
        available.len(),
        bookings.len()
    );

    Ok(AvailabilityResponse {
        success: true,
        date: date.to_string(),
        debug_info: json!({
            "lookingForDate": date,
            "headers": headers,
            "dateIndex": date_index,
            "timeSlotIndex": slot_index,
            "allBookingDates": considered,
            "foundBookedTimeSlots": booked,
        }),
        all_time_slots: all,
        booked_time_slots: booked,
        available_time_slots: available,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
