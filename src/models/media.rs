// src/models/media.rs
// DOCUMENTATION: Media store entities
// PURPOSE: Collections, stored files and the placement policy for uploaded images

use crate::errors::BookingError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Handle to a collection (folder) in the media store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionHandle {
    /// Store-relative path, e.g. "Optimum Electricals Bookings/Asha_9876543210"
    pub path: String,
    pub name: String,
}

/// A file persisted in the media store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    /// Store-relative path of the file
    pub path: String,
}

/// Decoded image ready to persist
#[derive(Debug, Clone)]
pub struct ImageBlob {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Where uploaded images land
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlacementPolicy {
    /// One image goes to the root collection (file link); several go to the
    /// customer collection (one folder link)
    SizeBased,
    /// Every upload goes to the customer collection; one link per file
    CustomerKeyed,
}

impl FromStr for PlacementPolicy {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "size-based" | "size_based" => Ok(PlacementPolicy::SizeBased),
            "customer-keyed" | "customer_keyed" => Ok(PlacementPolicy::CustomerKeyed),
            other => Err(BookingError::Config(format!(
                "unknown media placement policy: {}",
                other
            ))),
        }
    }
}
