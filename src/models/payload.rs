// src/models/payload.rs
// DOCUMENTATION: Incoming request payload shapes
// PURPOSE: Resolve one of three accepted shapes into a BookingSubmission

use crate::errors::BookingError;
use crate::models::BookingSubmission;
use serde_json::{Map, Value};

/// The shapes a booking may arrive in, tried in declaration order
#[derive(Debug, Clone, PartialEq)]
pub enum IncomingPayload {
    JsonBody(Map<String, Value>),
    QueryParams(Map<String, Value>),
    FormParams(Map<String, Value>),
}

impl IncomingPayload {
    /// Resolve the payload from raw request parts
    /// DOCUMENTATION: JSON text body first, then the query string, then a
    /// urlencoded form body. Nothing usable yields `NoDataReceived`.
    pub fn resolve(
        content_type: Option<&str>,
        body: &[u8],
        query_string: &str,
    ) -> Result<Self, BookingError> {
        let is_form = content_type.map(is_form_content_type).unwrap_or(false);
        let body_text = String::from_utf8_lossy(body);

        if !is_form && !body_text.trim().is_empty() {
            let value: Value = serde_json::from_str(body_text.trim())
                .map_err(|e| BookingError::InvalidPayload(e.to_string()))?;
            return match value {
                Value::Object(map) if !map.is_empty() => Ok(IncomingPayload::JsonBody(map)),
                Value::Object(_) => Err(BookingError::NoDataReceived),
                other => Err(BookingError::InvalidPayload(format!(
                    "expected a JSON object, got {}",
                    json_type(&other)
                ))),
            };
        }

        let query = parse_flat_map(query_string.as_bytes());
        if !query.is_empty() {
            return Ok(IncomingPayload::QueryParams(query));
        }

        if is_form {
            let form = parse_flat_map(body);
            if !form.is_empty() {
                return Ok(IncomingPayload::FormParams(form));
            }
        }

        Err(BookingError::NoDataReceived)
    }

    pub fn shape(&self) -> &'static str {
        match self {
            IncomingPayload::JsonBody(_) => "json",
            IncomingPayload::QueryParams(_) => "query",
            IncomingPayload::FormParams(_) => "form",
        }
    }

    pub fn into_submission(self) -> BookingSubmission {
        match self {
            IncomingPayload::JsonBody(fields)
            | IncomingPayload::QueryParams(fields)
            | IncomingPayload::FormParams(fields) => BookingSubmission::from_fields(&fields),
        }
    }
}

fn is_form_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime == "application/x-www-form-urlencoded"
}

/// Decode `a=1&b=2` pairs; repeated keys keep the last value
fn parse_flat_map(input: &[u8]) -> Map<String, Value> {
    url::form_urlencoded::parse(input)
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.into_owned(), Value::String(value.into_owned())))
        .collect()
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_body_wins() {
        let payload = IncomingPayload::resolve(
            Some("text/plain;charset=utf-8"),
            br#"{"customerName":"Asha"}"#,
            "customerName=Other",
        )
        .unwrap();

        assert_eq!(payload.shape(), "json");
        assert_eq!(payload.into_submission().customer_name, "Asha");
    }

    #[test]
    fn test_query_params_fallback() {
        let payload =
            IncomingPayload::resolve(None, b"", "customerName=Test%20Customer&totalFee=100")
                .unwrap();

        assert_eq!(payload.shape(), "query");
        let submission = payload.into_submission();
        assert_eq!(submission.customer_name, "Test Customer");
        assert_eq!(submission.total_fee, 100);
    }

    #[test]
    fn test_form_params() {
        let payload = IncomingPayload::resolve(
            Some("application/x-www-form-urlencoded"),
            b"customerName=Asha&locality=Rilbong&isUrgent=true",
            "",
        )
        .unwrap();

        assert_eq!(payload.shape(), "form");
        let submission = payload.into_submission();
        assert_eq!(submission.locality, "Rilbong");
        assert!(submission.is_urgent);
    }

    #[test]
    fn test_nothing_received() {
        let err = IncomingPayload::resolve(None, b"   ", "").unwrap_err();
        assert!(matches!(err, BookingError::NoDataReceived));

        let err = IncomingPayload::resolve(Some("application/json"), b"{}", "").unwrap_err();
        assert!(matches!(err, BookingError::NoDataReceived));
    }

    #[test]
    fn test_malformed_json_is_invalid() {
        let err = IncomingPayload::resolve(None, b"{not json", "").unwrap_err();
        assert!(matches!(err, BookingError::InvalidPayload(_)));

        let err = IncomingPayload::resolve(None, b"[1,2]", "").unwrap_err();
        assert!(matches!(err, BookingError::InvalidPayload(_)));
    }
}
