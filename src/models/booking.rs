// src/models/booking.rs
// DOCUMENTATION: Core data structures for bookings
// PURPOSE: Canonical booking submission plus the API envelopes of the intake endpoint

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Bookable time slots, two-hour grid from 08:00 to 20:00
pub const ALL_TIME_SLOTS: [&str; 6] = [
    "08:00-10:00",
    "10:00-12:00",
    "12:00-14:00",
    "14:00-16:00",
    "16:00-18:00",
    "18:00-20:00",
];

pub fn all_time_slots() -> Vec<String> {
    ALL_TIME_SLOTS.iter().map(|s| s.to_string()).collect()
}

/// An image carried inline in a booking payload
/// DOCUMENTATION: `data` is a base64 data URL; it is optional because callers
/// routinely send items whose data is missing or not a string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImagePayload {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// Canonical booking submission
/// DOCUMENTATION: Every accepted payload shape resolves into this struct once,
/// at the boundary. The client serializes it as the JSON body it posts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSubmission {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub locality: String,
    #[serde(default)]
    pub landmark: String,
    #[serde(default)]
    pub full_address: String,
    #[serde(default)]
    pub problem_description: String,
    #[serde(default)]
    pub preferred_time_slot: String,
    #[serde(default)]
    pub booking_date: String,
    #[serde(default)]
    pub is_urgent: bool,
    #[serde(default)]
    pub total_fee: i64,
    #[serde(default)]
    pub images: Vec<ImagePayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_screenshot: Option<ImagePayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_confirmed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl BookingSubmission {
    /// Build a submission from a loosely typed field map
    /// DOCUMENTATION: Flat parameter maps only carry strings, so numbers, flags and
    /// the nested image fields are coerced here. Anything unusable becomes its default.
    pub fn from_fields(fields: &Map<String, Value>) -> Self {
        BookingSubmission {
            customer_name: text_field(fields, "customerName"),
            customer_phone: text_field(fields, "customerPhone"),
            locality: text_field(fields, "locality"),
            landmark: text_field(fields, "landmark"),
            full_address: text_field(fields, "fullAddress"),
            problem_description: text_field(fields, "problemDescription"),
            preferred_time_slot: text_field(fields, "preferredTimeSlot"),
            booking_date: text_field(fields, "bookingDate"),
            is_urgent: flag_field(fields, "isUrgent"),
            total_fee: number_field(fields, "totalFee"),
            images: fields.get("images").map(image_list).unwrap_or_default(),
            payment_screenshot: fields.get("paymentScreenshot").and_then(single_image),
            timestamp: optional_text_field(fields, "timestamp"),
            payment_confirmed_at: optional_text_field(fields, "paymentConfirmedAt"),
            status: optional_text_field(fields, "status"),
        }
    }

    /// Folder name for this customer's media
    pub fn customer_key(&self) -> String {
        format!("{}_{}", self.customer_name, self.customer_phone)
    }
}

fn text_field(fields: &Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn optional_text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    let value = text_field(fields, key);
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn flag_field(fields: &Map<String, Value>, key: &str) -> bool {
    match fields.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|v| v != 0.0).unwrap_or(false),
        Some(Value::String(s)) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "1"
        ),
        _ => false,
    }
}

fn number_field(fields: &Map<String, Value>, key: &str) -> i64 {
    match fields.get(key) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|v| v.round() as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|v| v.round() as i64))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

/// Images arrive as a JSON array, or as a JSON-encoded string in flat maps
fn image_list(value: &Value) -> Vec<ImagePayload> {
    match value {
        Value::Array(items) => items.iter().map(image_item).collect(),
        Value::String(s) => serde_json::from_str::<Value>(s)
            .ok()
            .filter(Value::is_array)
            .map(|v| image_list(&v))
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn image_item(value: &Value) -> ImagePayload {
    match value {
        Value::Object(obj) => ImagePayload {
            name: text_field(obj, "name"),
            data: obj.get("data").and_then(Value::as_str).map(str::to_string),
        },
        _ => ImagePayload::default(),
    }
}

fn single_image(value: &Value) -> Option<ImagePayload> {
    match value {
        Value::Object(_) => Some(image_item(value)),
        Value::String(s) => serde_json::from_str::<Value>(s)
            .ok()
            .filter(Value::is_object)
            .map(|v| image_item(&v)),
        _ => None,
    }
}

/// Write-path acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeAck {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub timestamp: String,
}

impl IntakeAck {
    pub fn saved() -> Self {
        IntakeAck {
            success: true,
            message: Some("Booking saved successfully".to_string()),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Read-path response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub success: bool,
    pub date: String,
    pub all_time_slots: Vec<String>,
    pub booked_time_slots: Vec<String>,
    pub available_time_slots: Vec<String>,
    #[serde(default)]
    pub debug_info: Value,
    #[serde(default)]
    pub timestamp: String,
}
