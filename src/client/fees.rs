// src/client/fees.rs
// DOCUMENTATION: Booking fee computation
// PURPOSE: Price a booking from its locality and whether it is a same-day booking

use crate::errors::BookingError;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::str::FromStr;

/// Selectable localities and their visit fee
pub const LOCALITY_FEES: [(&str, i64); 4] = [
    ("Rilbong", 100),
    ("Police Bazaar", 200),
    ("Laitumkhrah", 200),
    ("Other", 200),
];

/// Same-day surcharge
pub const URGENT_SURCHARGE: i64 = 100;

/// Flat visit fee of the discount schedule
pub const BASE_FEE: i64 = 200;

/// Fee schedule variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeeSchedule {
    /// Locality fee plus the urgent surcharge
    #[default]
    PerLocality,
    /// Base fee plus the urgent surcharge, minus a locality discount
    Discounted,
}

/// Line items shown next to the total
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeBreakdown {
    pub locality_fee: i64,
    pub urgent_fee: i64,
    pub discount: i64,
    pub total: i64,
}

pub fn locality_fee(locality: &str) -> Option<i64> {
    LOCALITY_FEES
        .iter()
        .find(|(name, _)| *name == locality)
        .map(|(_, fee)| *fee)
}

pub fn locality_discount(locality: &str) -> i64 {
    match locality {
        "Rilbong" => 100,
        _ => 0,
    }
}

impl FeeSchedule {
    pub fn breakdown(&self, locality: &str, is_urgent: bool) -> FeeBreakdown {
        let urgent_fee = if is_urgent { URGENT_SURCHARGE } else { 0 };
        match self {
            FeeSchedule::PerLocality => {
                let locality_fee = locality_fee(locality).unwrap_or(0);
                FeeBreakdown {
                    locality_fee,
                    urgent_fee,
                    discount: 0,
                    total: locality_fee + urgent_fee,
                }
            }
            FeeSchedule::Discounted => {
                let discount = locality_discount(locality);
                FeeBreakdown {
                    locality_fee: BASE_FEE,
                    urgent_fee,
                    discount,
                    total: (BASE_FEE + urgent_fee - discount).max(0),
                }
            }
        }
    }

    pub fn total_fee(&self, locality: &str, is_urgent: bool) -> i64 {
        self.breakdown(locality, is_urgent).total
    }
}

impl FromStr for FeeSchedule {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per-locality" | "locality" => Ok(FeeSchedule::PerLocality),
            "discounted" | "discount" => Ok(FeeSchedule::Discounted),
            other => Err(BookingError::Config(format!("unknown fee schedule: {}", other))),
        }
    }
}

/// A booking is urgent when it is for `today`
pub fn is_urgent(booking_date: &str, today: NaiveDate) -> bool {
    NaiveDate::parse_from_str(booking_date.trim(), "%Y-%m-%d")
        .map(|date| date == today)
        .unwrap_or(false)
}

/// Today's date in the machine's local time zone
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_per_locality_fees() {
        let schedule = FeeSchedule::PerLocality;
        assert_eq!(schedule.total_fee("Rilbong", false), 100);
        assert_eq!(schedule.total_fee("Rilbong", true), 200);
        assert_eq!(schedule.total_fee("Police Bazaar", true), 300);
        assert_eq!(schedule.total_fee("Atlantis", false), 0);
    }

    #[test]
    fn test_discounted_rilbong_not_today() {
        let today = day(2024, 1, 14);
        let urgent = is_urgent("2024-01-15", today);
        assert!(!urgent);

        let breakdown = FeeSchedule::Discounted.breakdown("Rilbong", urgent);
        assert_eq!(breakdown.total, BASE_FEE - locality_discount("Rilbong"));
        assert_eq!(breakdown.total, 100);
        assert!(breakdown.total >= 0);
    }

    #[test]
    fn test_discounted_other_localities() {
        assert_eq!(FeeSchedule::Discounted.total_fee("Laitumkhrah", false), 200);
        assert_eq!(FeeSchedule::Discounted.total_fee("Laitumkhrah", true), 300);
        assert_eq!(FeeSchedule::Discounted.total_fee("Rilbong", true), 200);
    }

    #[test]
    fn test_urgency() {
        let today = day(2024, 1, 15);
        assert!(is_urgent("2024-01-15", today));
        assert!(is_urgent(" 2024-01-15 ", today));
        assert!(!is_urgent("2024-01-16", today));
        assert!(!is_urgent("", today));
    }

    #[test]
    fn test_parse_schedule() {
        assert_eq!("discounted".parse::<FeeSchedule>().unwrap(), FeeSchedule::Discounted);
        assert_eq!("per-locality".parse::<FeeSchedule>().unwrap(), FeeSchedule::PerLocality);
        assert!("free".parse::<FeeSchedule>().is_err());
    }
}
