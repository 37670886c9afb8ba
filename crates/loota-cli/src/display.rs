//! Plain-text rendering of hunts and proximity widget geometry.
//!
//! Pins are listed in hunt order, which is also their pin number.

use loota_core::{PinRecord, ProximityRadius, RingDescriptor};

const MAX_LISTED_PINS: usize = 50;

// ── Public API ──

/// Print a decoded hunt as a numbered pin card.
pub fn print_hunt(pins: &[PinRecord]) {
    let geo = pins
        .iter()
        .filter(|p| matches!(p, PinRecord::Geo { .. }))
        .count();
    let proximity = pins.len() - geo;

    println!("=== Hunt ({}) ===", plural(pins.len(), "pin"));
    println!("  {:<14} {}", "geolocation", geo);
    println!("  {:<14} {}", "proximity", proximity);
    println!();

    println!("Pins");
    for (i, pin) in pins.iter().take(MAX_LISTED_PINS).enumerate() {
        println!("{}", pin_line(i + 1, pin));
    }
    if pins.len() > MAX_LISTED_PINS {
        println!("    ... and {} more", pins.len() - MAX_LISTED_PINS);
    }
}

/// Print the reference rings for a widget.
pub fn print_rings(rings: &[RingDescriptor], radius: ProximityRadius) {
    println!("=== Rings ({radius} ft widget) ===");
    if rings.is_empty() {
        println!("  (none)");
        return;
    }
    println!("  {:<10} {}", "radius px", "label");
    for ring in rings {
        println!("{}", ring_line(ring));
    }
}

/// Print a pixel position on the widget.
pub fn print_position(x: f64, y: f64) {
    println!("  {:<14} {x:.2}", "x");
    println!("  {:<14} {y:.2}", "y");
}

// ── Line formatting ──

fn pin_line(number: usize, pin: &PinRecord) -> String {
    match pin {
        PinRecord::Geo { lat, lng } => {
            format!("  #{number:<4} {:<12} {lat:.6}, {lng:.6}", "geolocation")
        }
        PinRecord::Proximity {
            distance_ft,
            direction,
        } => format!("  #{number:<4} {:<12} {distance_ft:.1} ft {direction}", "proximity"),
    }
}

fn ring_line(ring: &RingDescriptor) -> String {
    format!("  {:<10.1} {} ft", ring.radius_px, trim_float(ring.label_ft))
}

/// Whole numbers without a trailing `.0`, everything else to one place.
fn trim_float(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}
