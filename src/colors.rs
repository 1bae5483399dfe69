//! Earthquake depth and magnitude classification
//!
//! Depth bands (km, strict lower bound, evaluated deepest first):
//! Band     | Colour
//! ---------|--------
//! > 90     | red
//! > 70     | orange
//! > 50     | yellow
//! > 30     | green
//! > 10     | purple
//! else     | black

use serde::Serialize;

/// Marker colour for an earthquake depth band.
///
/// Serialises to the lowercase CSS colour keyword Leaflet expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DepthColour {
    Black,
    Purple,
    Green,
    Yellow,
    Orange,
    Red,
}

impl DepthColour {
    pub fn css_name(self) -> &'static str {
        match self {
            DepthColour::Black => "black",
            DepthColour::Purple => "purple",
            DepthColour::Green => "green",
            DepthColour::Yellow => "yellow",
            DepthColour::Orange => "orange",
            DepthColour::Red => "red",
        }
    }
}

/// One depth band: events deeper than `threshold` (and not deeper than the
/// next band's threshold) are drawn in `colour`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthBand {
    pub threshold: f64,
    pub colour: DepthColour,
}

impl DepthBand {
    pub const fn new(threshold: f64, colour: DepthColour) -> Self {
        Self { threshold, colour }
    }
}

/// Depth bands ordered shallowest first. The first band is the catch-all for
/// everything no deeper than 10 km, including negative depths.
pub const DEPTH_BANDS: &[DepthBand] = &[
    DepthBand::new(0.0, DepthColour::Black),
    DepthBand::new(10.0, DepthColour::Purple),
    DepthBand::new(30.0, DepthColour::Green),
    DepthBand::new(50.0, DepthColour::Yellow),
    DepthBand::new(70.0, DepthColour::Orange),
    DepthBand::new(90.0, DepthColour::Red),
];

/// Smallest marker radius in pixels. Magnitudes that would scale below this
/// (zero, negative, or NaN) are drawn at this size.
pub const MIN_RADIUS: f64 = 1.0;

/// Pixels of radius per unit of magnitude
pub const RADIUS_SCALE: f64 = 4.0;

/// Pick the marker colour for a depth in km.
///
/// Comparisons are strict, so a depth sitting exactly on a threshold falls
/// into the shallower band. NaN compares false everywhere and lands in black.
pub fn colour_for_depth(depth: f64) -> DepthColour {
    if depth > 90.0 {
        DepthColour::Red
    } else if depth > 70.0 {
        DepthColour::Orange
    } else if depth > 50.0 {
        DepthColour::Yellow
    } else if depth > 30.0 {
        DepthColour::Green
    } else if depth > 10.0 {
        DepthColour::Purple
    } else {
        DepthColour::Black
    }
}

/// Marker radius for a magnitude: `magnitude * 4`, floored at [`MIN_RADIUS`].
pub fn radius_for_magnitude(magnitude: f64) -> f64 {
    let radius = magnitude * RADIUS_SCALE;
    if radius >= MIN_RADIUS {
        radius
    } else {
        MIN_RADIUS
    }
}
