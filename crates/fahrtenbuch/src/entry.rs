//! Core logbook types.
//!
//! An [`Entry`] is one recorded trip. The serialized field names are part of
//! the persisted format and must not change.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a trip was recorded.
///
/// `(0, 0)` means the coordinates are unknown, e.g. for manually typed
/// addresses or imported rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Human-readable address.
    pub address: String,
}

impl Location {
    /// A location with known coordinates.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, address: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            address: address.into(),
        }
    }

    /// A location known only by its address.
    #[must_use]
    pub fn from_address(address: impl Into<String>) -> Self {
        Self::new(0.0, 0.0, address)
    }

    /// Whether the coordinates are the "not geocoded" sentinel.
    #[must_use]
    pub fn is_unresolved(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }
}

/// A recorded trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Unique, immutable identifier.
    pub id: String,
    /// ISO-8601 timestamp of the trip.
    pub timestamp: String,
    /// Odometer reading as entered (decimal text).
    pub mileage: String,
    /// Where the trip was recorded.
    pub location: Location,
    /// Durable photo path, or empty when there is no photo.
    pub photo_uri: String,
    /// Free-text purpose of the trip.
    pub purpose: String,
}

impl Entry {
    /// Generate a fresh entry id.
    #[must_use]
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Whether this entry has a photo sidecar.
    #[must_use]
    pub fn has_photo(&self) -> bool {
        !self.photo_uri.is_empty()
    }
}

/// An entry as supplied by a caller, before an id has been assigned.
///
/// `photo_uri` points at the transient capture location; the store moves it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntry {
    /// ISO-8601 timestamp of the trip.
    pub timestamp: String,
    /// Odometer reading as entered.
    pub mileage: String,
    /// Where the trip was recorded.
    pub location: Location,
    /// Transient photo uri, or empty.
    pub photo_uri: String,
    /// Free-text purpose.
    pub purpose: String,
}

impl NewEntry {
    /// Attach an id, producing a storable entry.
    #[must_use]
    pub fn with_id(self, id: String) -> Entry {
        Entry {
            id,
            timestamp: self.timestamp,
            mileage: self.mileage,
            location: self.location,
            photo_uri: self.photo_uri,
            purpose: self.purpose,
        }
    }
}
