//! Compass bearings in the quadrant notation carried by proximity pins.
//!
//! A bearing is either a bare cardinal (`N`, `E`, `S`, `W`) or a quadrant
//! bearing that starts at one cardinal and turns toward a neighbouring one:
//!
//! - `N45E`: 45 degrees east of north (compass 45)
//! - `E30S`: 30 degrees south of east (compass 120)
//! - `S10W`: 10 degrees west of south (compass 190)
//! - `W80N`: 80 degrees north of west (compass 350)
//!
//! The start letter and the turn letter always sit on different axes, and
//! the turn is at most 90 degrees.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinal {
    North,
    East,
    South,
    West,
}

impl Cardinal {
    pub fn letter(self) -> char {
        match self {
            Cardinal::North => 'N',
            Cardinal::East => 'E',
            Cardinal::South => 'S',
            Cardinal::West => 'W',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        match c {
            'N' => Some(Cardinal::North),
            'E' => Some(Cardinal::East),
            'S' => Some(Cardinal::South),
            'W' => Some(Cardinal::West),
            _ => None,
        }
    }

    /// Compass angle in degrees, clockwise from north.
    pub fn degrees(self) -> u16 {
        match self {
            Cardinal::North => 0,
            Cardinal::East => 90,
            Cardinal::South => 180,
            Cardinal::West => 270,
        }
    }

    /// The cardinal a quarter turn clockwise from this one.
    pub fn clockwise(self) -> Self {
        match self {
            Cardinal::North => Cardinal::East,
            Cardinal::East => Cardinal::South,
            Cardinal::South => Cardinal::West,
            Cardinal::West => Cardinal::North,
        }
    }

    fn is_meridian(self) -> bool {
        matches!(self, Cardinal::North | Cardinal::South)
    }
}

impl fmt::Display for Cardinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A compass bearing such as `N`, or `N45E`.
///
/// Serialised as its string form, so a pin's `directionStr` field is
/// validated against the bearing grammar when it is deserialised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Bearing {
    Cardinal(Cardinal),
    Quadrant(Quadrant),
}

/// A turn of at most 90 degrees from one cardinal toward a neighbouring one.
///
/// Only built through [`Bearing::quadrant`] or the parser, so the axis and
/// angle constraints always hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Quadrant {
    start: Cardinal,
    degrees: u8,
    toward: Cardinal,
}

impl Quadrant {
    /// A turn clockwise from `start`. `degrees` is clamped to 90.
    pub(crate) fn clockwise_from(start: Cardinal, degrees: u8) -> Self {
        Self {
            start,
            degrees: degrees.min(Bearing::MAX_QUADRANT_DEGREES),
            toward: start.clockwise(),
        }
    }

    pub fn start(&self) -> Cardinal {
        self.start
    }

    pub fn degrees(&self) -> u8 {
        self.degrees
    }

    pub fn toward(&self) -> Cardinal {
        self.toward
    }
}

impl Bearing {
    pub const MAX_QUADRANT_DEGREES: u8 = 90;

    /// Build a quadrant bearing, checking the axis and angle constraints.
    pub fn quadrant(start: Cardinal, degrees: u8, toward: Cardinal) -> Result<Self, BearingParseError> {
        if degrees > Self::MAX_QUADRANT_DEGREES {
            return Err(BearingParseError::AngleOutOfRange(u32::from(degrees)));
        }
        if start.is_meridian() == toward.is_meridian() {
            return Err(BearingParseError::SameAxis(format!("{start}{degrees}{toward}")));
        }
        Ok(Bearing::Quadrant(Quadrant {
            start,
            degrees,
            toward,
        }))
    }

    /// Compass angle in degrees clockwise from north, in `[0, 360)`.
    pub fn degrees_clockwise(&self) -> f64 {
        match *self {
            Bearing::Cardinal(c) => f64::from(c.degrees()),
            Bearing::Quadrant(q) => {
                let base = f64::from(q.start.degrees());
                let offset = f64::from(q.degrees);
                let angle = if q.start.clockwise() == q.toward {
                    base + offset
                } else {
                    base - offset
                };
                angle.rem_euclid(360.0)
            }
        }
    }
}

impl fmt::Display for Bearing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bearing::Cardinal(c) => write!(f, "{c}"),
            Bearing::Quadrant(q) => write!(f, "{}{}{}", q.start, q.degrees, q.toward),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BearingParseError {
    #[error("empty bearing")]
    Empty,

    #[error("unknown compass letter in bearing {0:?}")]
    UnknownLetter(String),

    #[error("bearing {0:?} turns along its own axis")]
    SameAxis(String),

    #[error("bearing angle {0} is outside 0..=90")]
    AngleOutOfRange(u32),

    #[error("malformed bearing {0:?}")]
    Malformed(String),
}

impl FromStr for Bearing {
    type Err = BearingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(BearingParseError::Empty);
        }
        if !s.is_ascii() || s.len() == 2 {
            return Err(BearingParseError::Malformed(s.to_string()));
        }

        let letter = |c: char| {
            Cardinal::from_letter(c).ok_or_else(|| BearingParseError::UnknownLetter(s.to_string()))
        };

        let bytes = s.as_bytes();
        let from = letter(bytes[0] as char)?;
        if bytes.len() == 1 {
            return Ok(Bearing::Cardinal(from));
        }

        let toward = letter(bytes[bytes.len() - 1] as char)?;
        let digits = &s[1..s.len() - 1];
        // Leading zeros would not survive a re-encode, so `N045E` is refused.
        let leading_zero = digits.len() > 1 && digits.starts_with('0');
        if !digits.bytes().all(|b| b.is_ascii_digit()) || leading_zero {
            return Err(BearingParseError::Malformed(s.to_string()));
        }
        let degrees: u32 = digits
            .parse()
            .map_err(|_| BearingParseError::Malformed(s.to_string()))?;
        if degrees > u32::from(Self::MAX_QUADRANT_DEGREES) {
            return Err(BearingParseError::AngleOutOfRange(degrees));
        }

        // Checked against MAX_QUADRANT_DEGREES above, so it fits.
        Bearing::quadrant(from, degrees as u8, toward)
    }
}

impl TryFrom<String> for Bearing {
    type Error = BearingParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Bearing> for String {
    fn from(bearing: Bearing) -> Self {
        bearing.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Bearing {
        s.parse().unwrap_or_else(|e| panic!("{s:?} should parse: {e}"))
    }

    #[test]
    fn cardinals_parse() {
        assert_eq!(parse("N"), Bearing::Cardinal(Cardinal::North));
        assert_eq!(parse("E"), Bearing::Cardinal(Cardinal::East));
        assert_eq!(parse("S"), Bearing::Cardinal(Cardinal::South));
        assert_eq!(parse("W"), Bearing::Cardinal(Cardinal::West));
    }

    #[test]
    fn quadrant_forms_parse() {
        let quadrant = |s: &str| match parse(s) {
            Bearing::Quadrant(q) => (q.start(), q.degrees(), q.toward()),
            other => panic!("{s:?} parsed as {other:?}"),
        };
        assert_eq!(quadrant("N45E"), (Cardinal::North, 45, Cardinal::East));
        assert_eq!(quadrant("E0S"), (Cardinal::East, 0, Cardinal::South));
        assert_eq!(quadrant("W90N"), (Cardinal::West, 90, Cardinal::North));
        assert_eq!(
            parse("N45E"),
            Bearing::quadrant(Cardinal::North, 45, Cardinal::East).unwrap()
        );
    }

    #[test]
    fn display_matches_input() {
        for s in ["N", "E", "S", "W", "N45E", "E12S", "S3W", "W89N", "N10W", "S90E"] {
            assert_eq!(parse(s).to_string(), s);
        }
    }

    #[test]
    fn rejects_bad_bearings() {
        assert_eq!("".parse::<Bearing>(), Err(BearingParseError::Empty));
        assert!(matches!("X".parse::<Bearing>(), Err(BearingParseError::UnknownLetter(_))));
        assert!(matches!("NE".parse::<Bearing>(), Err(BearingParseError::Malformed(_))));
        assert!(matches!("N45X".parse::<Bearing>(), Err(BearingParseError::UnknownLetter(_))));
        assert!(matches!("N45S".parse::<Bearing>(), Err(BearingParseError::SameAxis(_))));
        assert!(matches!("E10W".parse::<Bearing>(), Err(BearingParseError::SameAxis(_))));
        assert_eq!("N91E".parse::<Bearing>(), Err(BearingParseError::AngleOutOfRange(91)));
        assert!(matches!("N-5E".parse::<Bearing>(), Err(BearingParseError::Malformed(_))));
        assert!(matches!("N4.5E".parse::<Bearing>(), Err(BearingParseError::Malformed(_))));
        assert!(matches!("n45e".parse::<Bearing>(), Err(BearingParseError::UnknownLetter(_))));
        assert!(matches!("N°E".parse::<Bearing>(), Err(BearingParseError::Malformed(_))));
    }

    #[test]
    fn leading_zeros_rejected() {
        for s in ["N045E", "E00S", "W090N"] {
            assert!(matches!(s.parse::<Bearing>(), Err(BearingParseError::Malformed(_))), "{s}");
        }
        assert_eq!(parse("N0E").to_string(), "N0E");
    }

    #[test]
    fn clockwise_turn_is_clamped() {
        let q = Quadrant::clockwise_from(Cardinal::South, 200);
        assert_eq!(q.degrees(), 90);
        assert_eq!(q.toward(), Cardinal::West);
        assert_eq!(Bearing::Quadrant(q).to_string(), "S90W");
    }

    #[test]
    fn huge_angle_is_malformed_not_a_panic() {
        assert!(matches!(
            "N99999999999999999999E".parse::<Bearing>(),
            Err(BearingParseError::Malformed(_))
        ));
    }

    #[test]
    fn degrees_clockwise_for_each_quadrant() {
        assert_eq!(parse("N").degrees_clockwise(), 0.0);
        assert_eq!(parse("E").degrees_clockwise(), 90.0);
        assert_eq!(parse("S").degrees_clockwise(), 180.0);
        assert_eq!(parse("W").degrees_clockwise(), 270.0);
        assert_eq!(parse("N45E").degrees_clockwise(), 45.0);
        assert_eq!(parse("E30S").degrees_clockwise(), 120.0);
        assert_eq!(parse("S10W").degrees_clockwise(), 190.0);
        assert_eq!(parse("W80N").degrees_clockwise(), 350.0);
    }

    #[test]
    fn counter_clockwise_turns() {
        assert_eq!(parse("N10W").degrees_clockwise(), 350.0);
        assert_eq!(parse("S20E").degrees_clockwise(), 160.0);
        assert_eq!(parse("E15N").degrees_clockwise(), 75.0);
        assert_eq!(parse("W5S").degrees_clockwise(), 265.0);
        assert_eq!(parse("N0W").degrees_clockwise(), 0.0);
    }

    #[test]
    fn serde_uses_string_form() {
        let json = serde_json::to_string(&parse("E30S")).unwrap();
        assert_eq!(json, r#""E30S""#);
        let back: Bearing = serde_json::from_str(&json).unwrap();
        assert_eq!(back, parse("E30S"));
        assert!(serde_json::from_str::<Bearing>(r#""NORTH""#).is_err());
    }

    #[test]
    fn quadrant_constructor_validates() {
        assert!(Bearing::quadrant(Cardinal::North, 45, Cardinal::East).is_ok());
        assert!(Bearing::quadrant(Cardinal::North, 91, Cardinal::East).is_err());
        assert!(Bearing::quadrant(Cardinal::East, 10, Cardinal::West).is_err());
    }
}
