//! Pin records: the treasure locations a hunt is made of.
//!
//! A pin is either a geolocation (`lat`/`lng`) or a proximity marker
//! (`distanceFt`/`directionStr`) relative to wherever the player stands.
//! The position of a pin in its hunt's sequence is its pin number.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use crate::bearing::Bearing;

/// Decimal places kept for latitude and longitude.
pub const COORDINATE_DECIMALS: i32 = 6;
/// Decimal places kept for proximity distances.
pub const DISTANCE_DECIMALS: i32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PinRecord {
    Geo {
        lat: f64,
        lng: f64,
    },
    Proximity {
        #[serde(rename = "distanceFt")]
        distance_ft: f64,
        #[serde(rename = "directionStr")]
        direction: Bearing,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PinValidationError {
    #[error("latitude {0} is outside -90..=90")]
    Latitude(f64),

    #[error("longitude {0} is outside -180..=180")]
    Longitude(f64),

    #[error("distance {0}ft must be a finite, non-negative number")]
    Distance(f64),
}

impl PinRecord {
    pub fn geo(lat: f64, lng: f64) -> Self {
        PinRecord::Geo { lat, lng }
    }

    pub fn proximity(distance_ft: f64, direction: Bearing) -> Self {
        PinRecord::Proximity {
            distance_ft,
            direction,
        }
    }

    /// The pin as it is stored in a hunt token: coordinates to 6 decimal
    /// places, distances to 1.
    pub fn rounded(&self) -> Self {
        match *self {
            PinRecord::Geo { lat, lng } => PinRecord::Geo {
                lat: round_to(lat, COORDINATE_DECIMALS),
                lng: round_to(lng, COORDINATE_DECIMALS),
            },
            PinRecord::Proximity {
                distance_ft,
                direction,
            } => PinRecord::Proximity {
                distance_ft: round_to(distance_ft, DISTANCE_DECIMALS),
                direction,
            },
        }
    }

    /// Check the range invariants. NaN fails every check.
    pub fn validate(&self) -> Result<(), PinValidationError> {
        match *self {
            PinRecord::Geo { lat, lng } => {
                if !(-90.0..=90.0).contains(&lat) {
                    return Err(PinValidationError::Latitude(lat));
                }
                if !(-180.0..=180.0).contains(&lng) {
                    return Err(PinValidationError::Longitude(lng));
                }
            }
            PinRecord::Proximity { distance_ft, .. } => {
                if !(distance_ft.is_finite() && distance_ft >= 0.0) {
                    return Err(PinValidationError::Distance(distance_ft));
                }
            }
        }
        Ok(())
    }

    /// JSON object form with the wire field names.
    ///
    /// Built as a `Value` so that serialising a pin list cannot fail.
    pub fn to_json(&self) -> Value {
        match self {
            PinRecord::Geo { lat, lng } => json!({ "lat": lat, "lng": lng }),
            PinRecord::Proximity {
                distance_ft,
                direction,
            } => json!({
                "distanceFt": distance_ft,
                "directionStr": direction.to_string(),
            }),
        }
    }
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
