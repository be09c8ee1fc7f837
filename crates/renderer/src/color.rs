//! Value-to-color mapping for station readings.
//!
//! Readings are normalized against a range and swept through a hue ramp at
//! fixed saturation, from blue (low) to red (high). Every function here is
//! pure; the same inputs always give the same color.

use std::fmt;

use serde::{Deserialize, Serialize};
use station_common::ValueRange;

/// Neutral slate used for temperature markers without a usable reading.
pub const DEFAULT_TEMPERATURE_RGB: Rgb = Rgb::new(148, 163, 184);

/// Blue used for pressure markers without a reading.
pub const DEFAULT_PRESSURE_RGB: Rgb = Rgb::new(59, 130, 246);

/// Fixed regional window pressure colors are drawn against (hPa).
pub const DEFAULT_PRESSURE_COLOR_RANGE: ValueRange = ValueRange {
    min: 980.0,
    max: 1045.0,
};

/// Position returned by [`normalize`] when the inputs are unusable.
pub const NEUTRAL_POSITION: f64 = 0.5;

/// An opaque color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS color string, exactly `rgb(r, g, b)`.
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Format a color for CSS.
pub fn rgb_to_css(rgb: Rgb) -> String {
    rgb.to_css()
}

/// Clamped linear position of `value` within `[min, max]`.
///
/// Returns [`NEUTRAL_POSITION`] when any input is non-finite or the range is
/// empty, never NaN.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if !value.is_finite() || !min.is_finite() || !max.is_finite() || max == min {
        return NEUTRAL_POSITION;
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

/// The hue ramps available to layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScale {
    /// Blue (230°) to red, lightness 0.55
    Temperature,
    /// Blue (225°) to red, darkening slightly towards high pressure
    Pressure,
}

impl ColorScale {
    /// Color for a reading.
    ///
    /// Temperature needs both a value and a range, otherwise the neutral slate
    /// is returned. Pressure only needs a value; without a range it is drawn
    /// against [`DEFAULT_PRESSURE_COLOR_RANGE`].
    pub fn value_to_rgb(&self, value: Option<f64>, range: Option<ValueRange>) -> Rgb {
        match self {
            ColorScale::Temperature => {
                let (Some(value), Some(range)) = (value, range) else {
                    return DEFAULT_TEMPERATURE_RGB;
                };
                let t = normalize(value, range.min, range.max);
                let hue = 230.0 - t * 230.0;
                hsl_to_rgb(hue / 360.0, 0.85, 0.55)
            }
            ColorScale::Pressure => {
                let Some(value) = value else {
                    return DEFAULT_PRESSURE_RGB;
                };
                let range = range.unwrap_or(DEFAULT_PRESSURE_COLOR_RANGE);
                let t = normalize(value, range.min, range.max);
                let hue = 225.0 - t * 225.0;
                hsl_to_rgb(hue / 360.0, 0.85, 0.52 - t * 0.05)
            }
        }
    }
}

/// Temperature color for a reading within `range`.
pub fn temperature_to_rgb(value: Option<f64>, range: Option<ValueRange>) -> Rgb {
    ColorScale::Temperature.value_to_rgb(value, range)
}

/// Pressure color for a reading, against `range` or the regional window.
pub fn pressure_to_rgb(value: Option<f64>, range: Option<ValueRange>) -> Rgb {
    ColorScale::Pressure.value_to_rgb(value, range)
}

/// HSL to RGB with all components in [0, 1].
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Rgb {
    if s == 0.0 {
        let v = channel(l);
        return Rgb::new(v, v, v);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    Rgb::new(
        channel(hue_to_rgb(p, q, h + 1.0 / 3.0)),
        channel(hue_to_rgb(p, q, h)),
        channel(hue_to_rgb(p, q, h - 1.0 / 3.0)),
    )
}

fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let mut t = t;
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn channel(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}
