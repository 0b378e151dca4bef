// src/models/sheet.rs
// DOCUMENTATION: Spreadsheet-shaped storage values
// PURPOSE: Cells and header layout of the booking sheet

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Header row of the booking sheet, in column order
pub const SHEET_HEADERS: [&str; 17] = [
    "Timestamp",
    "Customer Name",
    "Phone Number",
    "Locality",
    "Landmark",
    "Full Address",
    "Problem Description",
    "Preferred Time Slot",
    "Booking Date",
    "Is Urgent",
    "Total Fee",
    "Payment Confirmed At",
    "Image Count",
    "Image Names",
    "Payment Screenshot Name",
    "Image Link/Folder Link",
    "Payment Screenshot Link",
];

pub const BOOKING_DATE_HEADER: &str = "Booking Date";
pub const TIME_SLOT_HEADER: &str = "Preferred Time Slot";

/// A single sheet cell
/// DOCUMENTATION: Mirrors what a spreadsheet hands back: text, numbers,
/// native date values (an instant carrying the sheet's offset) or nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CellValue {
    Text(String),
    Number(i64),
    Date(DateTime<FixedOffset>),
    Empty,
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    /// Native date cell at local midnight in the given offset
    pub fn date_at_midnight(date: NaiveDate, offset: FixedOffset) -> Option<Self> {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        offset
            .from_local_datetime(&midnight)
            .single()
            .map(CellValue::Date)
    }

    /// Type label used in availability diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Text(_) => "string",
            CellValue::Number(_) => "number",
            CellValue::Date(_) => "date",
            CellValue::Empty => "empty",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Date(d) => write!(f, "{}", d.to_rfc3339()),
            CellValue::Empty => Ok(()),
        }
    }
}

/// JSON form of a cell for API responses (plain scalar, not tagged)
impl CellValue {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            CellValue::Text(s) => serde_json::Value::String(s.clone()),
            CellValue::Number(n) => serde_json::Value::from(*n),
            CellValue::Date(d) => serde_json::Value::String(d.to_rfc3339()),
            CellValue::Empty => serde_json::Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_cell_keeps_offset() {
        let ist = FixedOffset::east_opt(330 * 60).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let cell = CellValue::date_at_midnight(date, ist).unwrap();

        match &cell {
            CellValue::Date(d) => {
                assert_eq!(d.date_naive(), date);
                assert_eq!(d.to_rfc3339(), "2024-01-15T00:00:00+05:30");
            }
            other => panic!("unexpected cell {:?}", other),
        }
        assert_eq!(cell.type_name(), "date");
    }

    #[test]
    fn test_cell_serialization_is_tagged() {
        let json = serde_json::to_string(&CellValue::Number(200)).unwrap();
        assert_eq!(json, r#"{"type":"number","value":200}"#);

        let back: CellValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CellValue::Number(200));

        let empty: CellValue = serde_json::from_str(r#"{"type":"empty"}"#).unwrap();
        assert_eq!(empty, CellValue::Empty);
    }

    #[test]
    fn test_header_positions() {
        assert_eq!(SHEET_HEADERS.iter().position(|h| *h == BOOKING_DATE_HEADER), Some(8));
        assert_eq!(SHEET_HEADERS.iter().position(|h| *h == TIME_SLOT_HEADER), Some(7));
    }
}
