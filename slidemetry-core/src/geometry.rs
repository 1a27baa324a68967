//! Geometry primitives shared across the measurement pipeline.

use serde::{Deserialize, Serialize};

/// Fixed width of the editable slide area in CSS pixels.
///
/// The host editor lays every slide out at this width regardless of
/// viewport; a container measuring a different width indicates a caller
/// error, not a valid state.
pub const SLIDE_WIDTH: f64 = 1174.0;

/// An axis-aligned rectangle in CSS pixels.
///
/// At the surface boundary coordinates are viewport-relative; inside a
/// measurement they are relative to the slide container.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Bounds {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Re-express this rectangle relative to `origin`'s top-left corner.
    #[must_use]
    pub fn relative_to(&self, origin: &Self) -> Self {
        Self {
            x: self.x - origin.x,
            y: self.y - origin.y,
            width: self.width,
            height: self.height,
        }
    }

    /// Round all components to two decimal places.
    ///
    /// Geometry reads carry sub-centipixel float jitter; rounding here keeps
    /// hashing and comparison stable.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            x: round2(self.x),
            y: round2(self.y),
            width: round2(self.width),
            height: round2(self.height),
        }
    }
}

/// Slide container dimensions at capture time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideDimensions {
    /// Container width in CSS pixels (expected to equal [`SLIDE_WIDTH`]).
    pub width: f64,
    /// Container height in CSS pixels.
    pub height: f64,
    /// Device pixel ratio of the rendering surface.
    pub device_pixel_ratio: f64,
}

impl SlideDimensions {
    /// Create dimensions with an explicit device pixel ratio.
    #[must_use]
    pub const fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }
}

/// Round to two decimal places, half away from zero.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to four decimal places, half away from zero.
#[must_use]
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert!((round2(10.004) - 10.0).abs() < f64::EPSILON);
        assert!((round2(10.006) - 10.01).abs() < f64::EPSILON);
        assert!((round2(-3.456) - -3.46).abs() < f64::EPSILON);
    }

    #[test]
    fn test_round4() {
        assert!((round4(1.499_94) - 1.4999).abs() < f64::EPSILON);
        assert!((round4(1.499_96) - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_relative_to() {
        let container = Bounds::new(100.0, 50.0, 1174.0, 660.0);
        let element = Bounds::new(150.0, 80.0, 200.0, 120.0);
        let relative = element.relative_to(&container);
        assert!((relative.x - 50.0).abs() < f64::EPSILON);
        assert!((relative.y - 30.0).abs() < f64::EPSILON);
        assert!((relative.width - 200.0).abs() < f64::EPSILON);
        assert!((relative.height - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rounded_stabilizes_jitter() {
        let noisy = Bounds::new(10.001, 20.004_9, 100.0049, 50.0);
        let clean = Bounds::new(10.002, 20.001, 100.001, 50.0);
        assert_eq!(noisy.rounded(), clean.rounded());
    }
}
