//! Hunt token codec.
//!
//! A hunt's pins travel through a link as one query-parameter value: a
//! compact JSON array of pin objects, wrapped in standard padded base64.
//! The base64 alphabet includes `+`, `/` and `=`, which the caller has to
//! percent-encode when building the URL (see [`crate::share`]); this module
//! never does.
//!
//! Decoding is all-or-nothing. A single bad pin rejects the whole token.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::pin::PinRecord;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("hunt token is not valid base64: {0}")]
    MalformedTransform(#[from] base64::DecodeError),

    #[error("hunt token does not hold a pin list: {0}")]
    MalformedStructure(String),

    #[error("hunt token holds no pins")]
    EmptyResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeErrorKind {
    MalformedTransform,
    MalformedStructure,
    EmptyResult,
}

impl DecodeError {
    pub fn kind(&self) -> DecodeErrorKind {
        match self {
            DecodeError::MalformedTransform(_) => DecodeErrorKind::MalformedTransform,
            DecodeError::MalformedStructure(_) => DecodeErrorKind::MalformedStructure,
            DecodeError::EmptyResult => DecodeErrorKind::EmptyResult,
        }
    }
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DecodeErrorKind::MalformedTransform => "malformed-transform",
            DecodeErrorKind::MalformedStructure => "malformed-structure",
            DecodeErrorKind::EmptyResult => "empty-result",
        })
    }
}

/// Encode pins, in order, into a hunt token.
///
/// Each pin is rounded to its stored precision first. Callers reject an
/// empty hunt, and any pin whose rounded form fails
/// [`PinRecord::validate`], before getting here: a non-finite number is
/// written as JSON `null` and the token would not decode.
pub fn encode(pins: &[PinRecord]) -> String {
    debug_assert!(
        pins.iter().all(|pin| pin.rounded().validate().is_ok()),
        "encode called with an invalid pin"
    );
    let json = Value::Array(pins.iter().map(|pin| pin.rounded().to_json()).collect()).to_string();
    debug!(pins = pins.len(), json_bytes = json.len(), "encoded hunt token");
    STANDARD.encode(json)
}

/// Decode a hunt token back into its pins.
///
/// Unknown fields on a pin object are ignored, so tokens from older
/// editors that also stored pixel positions still load.
pub fn decode(payload: &str) -> Result<Vec<PinRecord>, DecodeError> {
    let bytes = STANDARD.decode(payload)?;

    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|e| DecodeError::MalformedStructure(format!("invalid JSON: {e}")))?;
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(DecodeError::MalformedStructure(format!(
                "expected an array, found {}",
                json_kind(&other)
            )));
        }
    };
    if items.is_empty() {
        return Err(DecodeError::EmptyResult);
    }

    let pins = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let number = i + 1;
            let pin: PinRecord = serde_json::from_value(item).map_err(|e| {
                DecodeError::MalformedStructure(format!("pin {number}: {e}"))
            })?;
            pin.validate()
                .map_err(|e| DecodeError::MalformedStructure(format!("pin {number}: {e}")))?;
            Ok(pin)
        })
        .collect::<Result<Vec<_>, DecodeError>>()?;

    debug!(pins = pins.len(), "decoded hunt token");
    Ok(pins)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bearing::Bearing;

    fn bearing(s: &str) -> Bearing {
        s.parse().unwrap()
    }

    fn wrap(json: &str) -> String {
        STANDARD.encode(json)
    }

    #[test]
    fn geo_pins_round_trip() {
        let pins = vec![
            PinRecord::geo(40.712776, -74.005974),
            PinRecord::geo(51.507351, -0.127758),
            PinRecord::geo(-33.86882, 151.209296),
        ];
        assert_eq!(decode(&encode(&pins)).unwrap(), pins);
    }

    #[test]
    fn proximity_pins_round_trip() {
        let pins = vec![
            PinRecord::proximity(35.4, bearing("N45E")),
            PinRecord::proximity(0.0, bearing("N")),
            PinRecord::proximity(99.9, bearing("W12N")),
        ];
        assert_eq!(decode(&encode(&pins)).unwrap(), pins);
    }

    #[test]
    fn round_trip_is_lossy_only_in_rounding() {
        let pins = vec![
            PinRecord::geo(40.7127761234, -74.0059738),
            PinRecord::proximity(12.26, bearing("E30S")),
        ];
        let decoded = decode(&encode(&pins)).unwrap();
        assert_eq!(
            decoded,
            vec![
                PinRecord::geo(40.712776, -74.005974),
                PinRecord::proximity(12.3, bearing("E30S")),
            ]
        );
        let rounded: Vec<_> = pins.iter().map(PinRecord::rounded).collect();
        assert_eq!(decoded, rounded);
    }

    #[test]
    fn order_is_preserved() {
        let pins = vec![
            PinRecord::proximity(5.0, bearing("S")),
            PinRecord::geo(1.0, 2.0),
            PinRecord::proximity(5.0, bearing("N")),
        ];
        let decoded = decode(&encode(&pins)).unwrap();
        assert_eq!(decoded[0], pins[0]);
        assert_eq!(decoded[1], pins[1]);
        assert_eq!(decoded[2], pins[2]);
    }

    #[test]
    fn token_is_base64_of_compact_json() {
        let token = encode(&[PinRecord::geo(1.5, 2.25)]);
        assert!(
            token
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'='))
        );
        let json = String::from_utf8(STANDARD.decode(&token).unwrap()).unwrap();
        assert_eq!(json, r#"[{"lat":1.5,"lng":2.25}]"#);

        let token = encode(&[PinRecord::proximity(35.4, bearing("N45E"))]);
        let json = String::from_utf8(STANDARD.decode(&token).unwrap()).unwrap();
        assert_eq!(json, r#"[{"directionStr":"N45E","distanceFt":35.4}]"#);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "invalid pin")]
    fn encoding_a_non_finite_pin_is_a_caller_bug() {
        encode(&[PinRecord::geo(f64::NAN, 0.0)]);
    }

    #[test]
    fn invalid_base64_is_malformed_transform() {
        let err = decode("not-valid-base64!!").unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::MalformedTransform);
        assert_eq!(err.kind().to_string(), "malformed-transform");
    }

    #[test]
    fn non_array_is_malformed_structure() {
        let err = decode(&wrap("{}")).unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::MalformedStructure);
        assert!(err.to_string().contains("found an object"));

        let err = decode(&wrap("hello")).unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::MalformedStructure);
    }

    #[test]
    fn empty_array_is_empty_result() {
        let err = decode(&wrap("[]")).unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::EmptyResult);
        assert_eq!(err.kind().to_string(), "empty-result");
    }

    #[test]
    fn bad_elements_reject_the_whole_token() {
        for json in [
            r#"[{"lat": 1.0, "lng": 2.0}, {"lat": 1.0}]"#,
            r#"[{"lat": "1.0", "lng": 2.0}]"#,
            r#"[{"distanceFt": 10}]"#,
            r#"[{"distanceFt": "10", "directionStr": "N"}]"#,
            r#"[{"distanceFt": 10, "directionStr": "north"}]"#,
            r#"[{"lat": 91.0, "lng": 0.0}]"#,
            r#"[{"distanceFt": -1, "directionStr": "N"}]"#,
            r#"[null]"#,
            r#"[42]"#,
        ] {
            let err = decode(&wrap(json)).unwrap_err();
            assert_eq!(err.kind(), DecodeErrorKind::MalformedStructure, "{json}");
        }
    }

    #[test]
    fn error_names_the_offending_pin() {
        let err = decode(&wrap(r#"[{"lat": 1, "lng": 2}, {"lat": 100, "lng": 2}]"#)).unwrap_err();
        assert!(err.to_string().contains("pin 2"), "{err}");
    }

    #[test]
    fn extra_fields_are_ignored() {
        let json = r#"[
            {"distanceFt": 10.5, "directionStr": "E30S", "x": 12, "y": 40},
            {"lat": 1.0, "lng": 2.0, "id": 7, "found": false}
        ]"#;
        assert_eq!(
            decode(&wrap(json)).unwrap(),
            vec![
                PinRecord::proximity(10.5, bearing("E30S")),
                PinRecord::geo(1.0, 2.0),
            ]
        );
    }
}
