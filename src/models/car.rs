//! Car entity
//!
//! The single resource served by the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored car, as returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: u64,
    pub brand: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable fields of a car, accepted by create and update.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewCar {
    pub brand: String,
    pub country: String,
}

impl NewCar {
    pub fn new(brand: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            brand: brand.into(),
            country: country.into(),
        }
    }
}

impl Car {
    /// Cache key under which the car is read through.
    pub fn cache_key(id: u64) -> String {
        format!("cars/{id}")
    }
}
