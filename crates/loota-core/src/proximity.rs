//! Proximity widget geometry.
//!
//! The proximity editor is a circle of `radius_px` pixels standing for
//! `radius_ft` feet around the player. A click inside it becomes a
//! distance in feet plus a compass bearing; a stored pin maps back to a
//! pixel position for rendering. Screen `y` grows downward, north is up.
//!
//! Bearing strings already embedded in shared hunt links depend on the
//! exact angle formula and cardinal handling below.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::bearing::{Bearing, Cardinal, Quadrant};
use crate::pin::{DISTANCE_DECIMALS, PinRecord, round_to};

/// Real-world scale of the widget's outer circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProximityRadius {
    Ten,
    #[default]
    Fifty,
    Hundred,
}

impl ProximityRadius {
    pub fn feet(self) -> f64 {
        match self {
            ProximityRadius::Ten => 10.0,
            ProximityRadius::Fifty => 50.0,
            ProximityRadius::Hundred => 100.0,
        }
    }
}

impl fmt::Display for ProximityRadius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.feet())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported proximity radius {0:?} (expected 10, 50 or 100 feet)")]
pub struct UnsupportedRadius(String);

impl FromStr for ProximityRadius {
    type Err = UnsupportedRadius;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_end_matches("ft").trim() {
            "10" => Ok(ProximityRadius::Ten),
            "50" => Ok(ProximityRadius::Fifty),
            "100" => Ok(ProximityRadius::Hundred),
            _ => Err(UnsupportedRadius(s.to_string())),
        }
    }
}

/// A click landed outside the widget's circle.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("click is {distance_px:.1}px from the centre, outside the {radius_px}px widget")]
pub struct OutOfBoundsError {
    pub distance_px: f64,
    pub radius_px: f64,
}

/// A placed proximity marker.
///
/// `x`/`y` are the raw click coordinates, kept so the dot can be redrawn
/// where it was placed; distance and bearing are what goes into the hunt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProximityMarker {
    #[serde(rename = "distanceFt")]
    pub distance_ft: f64,
    #[serde(rename = "directionStr")]
    pub direction: Bearing,
    pub x: f64,
    pub y: f64,
}

impl From<ProximityMarker> for PinRecord {
    fn from(marker: ProximityMarker) -> Self {
        PinRecord::proximity(marker.distance_ft, marker.direction)
    }
}

/// One reference circle drawn inside the widget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RingDescriptor {
    pub radius_px: f64,
    pub label_ft: f64,
}

/// Convert a click inside the widget into a proximity marker.
///
/// The edge of the circle is inclusive. A click exactly on the centre has
/// distance 0 and bearing `N` (`atan2(+0, +0)` is 0).
pub fn point_to_marker(
    click_x: f64,
    click_y: f64,
    center_x: f64,
    center_y: f64,
    radius_px: f64,
    radius_ft: f64,
) -> Result<ProximityMarker, OutOfBoundsError> {
    let east = click_x - center_x;
    // Negated screen offset: positive when the click is above the centre.
    // Written as a difference so a centre click yields +0, not -0.
    let north = center_y - click_y;
    let distance_px = (east * east + north * north).sqrt();

    // Non-finite distances or radii would scale to a NaN distance in feet.
    let inside = distance_px.is_finite() && radius_px.is_finite() && distance_px <= radius_px;
    if !inside {
        debug!(distance_px, radius_px, "click outside proximity widget");
        return Err(OutOfBoundsError {
            distance_px,
            radius_px,
        });
    }

    let direction = bearing_from_angle(compass_angle(east, north));
    let distance_ft = scaled_distance(distance_px, radius_px, radius_ft);
    debug!(distance_ft, direction = %direction, "placed proximity marker");

    Ok(ProximityMarker {
        distance_ft: round_to(distance_ft, DISTANCE_DECIMALS),
        direction,
        x: click_x,
        y: click_y,
    })
}

/// Unrounded real-world distance for a pixel distance from the centre.
pub fn scaled_distance(distance_px: f64, radius_px: f64, radius_ft: f64) -> f64 {
    if distance_px == 0.0 {
        return 0.0;
    }
    (distance_px / radius_px) * radius_ft
}

/// Degrees clockwise from north for an offset given as (east, north).
pub fn compass_angle(east: f64, north: f64) -> f64 {
    (east.atan2(north) * 180.0 / PI + 360.0) % 360.0
}

/// Quadrant bearing for a compass angle.
///
/// Only the exact angles 0, 90, 180, 270 (and 360) become bare cardinals;
/// everything else is quadrant-relative with the offset rounded to the
/// nearest whole degree.
pub fn bearing_from_angle(angle_deg: f64) -> Bearing {
    let angle = angle_deg.rem_euclid(360.0);
    let cardinal = match angle {
        a if a == 0.0 || a == 360.0 => Some(Cardinal::North),
        a if a == 90.0 => Some(Cardinal::East),
        a if a == 180.0 => Some(Cardinal::South),
        a if a == 270.0 => Some(Cardinal::West),
        _ => None,
    };
    if let Some(c) = cardinal {
        return Bearing::Cardinal(c);
    }

    let from = if angle < 90.0 {
        Cardinal::North
    } else if angle < 180.0 {
        Cardinal::East
    } else if angle < 270.0 {
        Cardinal::South
    } else {
        Cardinal::West
    };
    let offset = (angle - f64::from(from.degrees())).round() as u8;

    Bearing::Quadrant(Quadrant::clockwise_from(from, offset))
}

/// Reference rings at `i / interval_count` of the radius, for
/// `i in 1..interval_count`. The outer edge itself is not a ring.
pub fn ring_geometry(radius_px: f64, radius_ft: f64, interval_count: u32) -> Vec<RingDescriptor> {
    let count = f64::from(interval_count);
    (1..interval_count)
        .map(|i| {
            let i = f64::from(i);
            RingDescriptor {
                radius_px: radius_px * i / count,
                label_ft: (radius_ft / count) * i,
            }
        })
        .collect()
}

/// Pixel position of a stored proximity pin on the widget.
pub fn marker_position(
    distance_ft: f64,
    bearing: Bearing,
    center_x: f64,
    center_y: f64,
    radius_px: f64,
    radius_ft: f64,
) -> (f64, f64) {
    let distance_px = if radius_ft > 0.0 {
        distance_ft / radius_ft * radius_px
    } else {
        0.0
    };
    let theta = bearing.degrees_clockwise() * PI / 180.0;
    (
        center_x + distance_px * theta.sin(),
        center_y - distance_px * theta.cos(),
    )
}

/// Layout of a proximity widget on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityWidget {
    pub center_x: f64,
    pub center_y: f64,
    pub radius_px: f64,
    pub radius: ProximityRadius,
}

impl ProximityWidget {
    pub fn new(center_x: f64, center_y: f64, radius_px: f64, radius: ProximityRadius) -> Self {
        Self {
            center_x,
            center_y,
            radius_px,
            radius,
        }
    }

    pub fn place(&self, click_x: f64, click_y: f64) -> Result<ProximityMarker, OutOfBoundsError> {
        point_to_marker(
            click_x,
            click_y,
            self.center_x,
            self.center_y,
            self.radius_px,
            self.radius.feet(),
        )
    }

    pub fn rings(&self, interval_count: u32) -> Vec<RingDescriptor> {
        ring_geometry(self.radius_px, self.radius.feet(), interval_count)
    }

    pub fn position_of(&self, distance_ft: f64, bearing: Bearing) -> (f64, f64) {
        marker_position(
            distance_ft,
            bearing,
            self.center_x,
            self.center_y,
            self.radius_px,
            self.radius.feet(),
        )
    }
}
