// src/handlers/intake.rs
// DOCUMENTATION: HTTP handlers for the booking intake endpoint
// PURPOSE: Resolve payloads, call the intake service, always answer with an envelope

use crate::errors::BookingError;
use crate::models::IncomingPayload;
use crate::services::IntakeService;
use actix_web::{http::header, web, HttpRequest, HttpResponse};
use serde_json::json;

pub const AVAILABILITY_ACTION: &str = "getAvailableTimeSlots";

/// Largest request body read by the write path; photos travel inline as base64
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Query parameters understood by the GET endpoint
#[derive(Debug, Default, PartialEq, Eq)]
pub struct IntakeQuery {
    pub action: Option<String>,
    pub date: Option<String>,
}

impl IntakeQuery {
    /// Lenient parse: unknown keys are ignored and a repeated key keeps its last value
    pub fn parse(query_string: &str) -> Self {
        let mut query = IntakeQuery::default();
        for (key, value) in url::form_urlencoded::parse(query_string.as_bytes()) {
            match key.as_ref() {
                "action" => query.action = Some(value.into_owned()),
                "date" => query.date = Some(value.into_owned()),
                _ => {}
            }
        }
        query
    }
}

/// Read the whole request body, turning transport failures into a failure envelope
async fn read_body(payload: web::Payload, limit: usize) -> Result<web::Bytes, BookingError> {
    match payload.to_bytes_limited(limit).await {
        Ok(Ok(body)) => Ok(body),
        Ok(Err(e)) => Err(BookingError::InvalidPayload(format!(
            "Failed to read request body: {}",
            e
        ))),
        Err(_) => Err(BookingError::InvalidPayload(format!(
            "Request body exceeds {} bytes",
            limit
        ))),
    }
}

/// POST / and POST /bookings
/// Accept a booking submission
pub async fn submit_booking(
    service: web::Data<IntakeService>,
    req: HttpRequest,
    payload: web::Payload,
) -> Result<HttpResponse, BookingError> {
    let body = read_body(payload, MAX_BODY_BYTES).await.map_err(|e| {
        log::error!("Rejected booking body: {}", e);
        e
    })?;

    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    let payload = match IncomingPayload::resolve(content_type, &body, req.query_string()) {
        Ok(payload) => payload,
        Err(BookingError::NoDataReceived) => {
            log::error!("No data received in any format: {} {}", req.method(), req.uri());
            return Ok(no_data_response(&req, &body));
        }
        Err(e) => return Err(e),
    };

    log::debug!("Resolved booking payload from {} shape", payload.shape());

    let ack = service.submit(payload.into_submission()).await.map_err(|e| {
        log::error!("Error processing booking: {}", e);
        e
    })?;

    Ok(HttpResponse::Ok().json(ack))
}

/// GET /
/// Slot availability when `action=getAvailableTimeSlots`, liveness otherwise
pub async fn get_intake(
    service: web::Data<IntakeService>,
    req: HttpRequest,
) -> Result<HttpResponse, BookingError> {
    let query = IntakeQuery::parse(req.query_string());
    if query.action.as_deref() != Some(AVAILABILITY_ACTION) {
        return Ok(HttpResponse::Ok().json(json!({
            "message": "Optimum Electricals Booking API is running",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "method": "GET"
        })));
    }

    let date = match query.date.as_deref().map(str::trim) {
        Some(date) if !date.is_empty() => date,
        _ => {
            return Ok(HttpResponse::Ok().json(json!({
                "success": false,
                "error": "Date parameter is required"
            })))
        }
    };

    let availability = service.available_slots(date).await.map_err(|e| {
        log::error!("Error getting available time slots for {}: {}", date, e);
        e
    })?;

    Ok(HttpResponse::Ok().json(availability))
}

/// Failure envelope echoing the raw request for diagnostics
fn no_data_response(req: &HttpRequest, body: &[u8]) -> HttpResponse {
    let headers: serde_json::Map<String, serde_json::Value> = req
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                json!(value.to_str().unwrap_or("<binary>")),
            )
        })
        .collect();

    HttpResponse::Ok().json(json!({
        "success": false,
        "error": BookingError::NoDataReceived.to_string(),
        "received": {
            "method": req.method().as_str(),
            "path": req.path(),
            "queryString": req.query_string(),
            "headers": headers,
            "body": String::from_utf8_lossy(body),
        },
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Configuration for intake routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::post().to(submit_booking))
        .route("/", web::get().to(get_intake))
        .route("/bookings", web::post().to(submit_booking));
}
