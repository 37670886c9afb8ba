//! Loota core: hunt tokens, compass bearings, and proximity widget geometry.

pub mod bearing;
pub mod codec;
pub mod pin;
pub mod proximity;
pub mod share;

pub use bearing::{Bearing, BearingParseError, Cardinal, Quadrant};
pub use codec::{DecodeError, DecodeErrorKind, decode, encode};
pub use pin::{PinRecord, PinValidationError};
pub use proximity::{
    OutOfBoundsError, ProximityMarker, ProximityRadius, ProximityWidget, RingDescriptor,
    point_to_marker, ring_geometry,
};
pub use share::{hunt_link, token_from_link};
