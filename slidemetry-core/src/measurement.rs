//! Per-element measurement records.

use serde::{Deserialize, Serialize};

use crate::geometry::Bounds;
use crate::transform::TransformMatrix;

/// Identifier of a moveable element, supplied by the host editor.
///
/// Identifiers must be unique within a slide. They are ordered so the
/// snapshot's element map is deterministic regardless of enumeration order.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Create an identifier from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Computed CSS visibility of a measured element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// The element is rendered.
    #[default]
    Visible,
    /// The element is hidden but keeps its layout box.
    Hidden,
    /// The element is collapsed (table/flex contexts).
    Collapse,
}

impl Visibility {
    /// Map a computed `visibility` value; unknown values read as visible.
    #[must_use]
    pub fn from_css(value: &str) -> Self {
        match value.trim() {
            "hidden" => Self::Hidden,
            "collapse" => Self::Collapse,
            _ => Self::Visible,
        }
    }
}

/// Geometry and paint state of a single moveable element.
///
/// Produced fresh on every capture and owned by the snapshot that contains
/// it; never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementMeasurement {
    /// Bounding box relative to the slide container, rounded to 2 decimals.
    pub absolute_bounds: Bounds,
    /// Parsed and decomposed computed transform.
    pub transform_matrix: TransformMatrix,
    /// Stacking order (`auto` reads as 0).
    pub z_index: i32,
    /// Computed opacity in `0.0..=1.0`.
    pub opacity: f64,
    /// Computed visibility.
    pub visibility: Visibility,
}

impl ElementMeasurement {
    /// An untransformed, fully visible measurement of the given bounds.
    ///
    /// Convenient for tests and for synthesizing expected states.
    #[must_use]
    pub fn plain(absolute_bounds: Bounds) -> Self {
        Self {
            absolute_bounds,
            transform_matrix: TransformMatrix::identity(),
            z_index: 0,
            opacity: 1.0,
            visibility: Visibility::Visible,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_id_display() {
        let id = ElementId::from("chart-3");
        assert_eq!(id.to_string(), "chart-3");
        assert_eq!(id.as_str(), "chart-3");
    }

    #[test]
    fn test_element_id_ordering() {
        let mut ids = [
            ElementId::from("text-2"),
            ElementId::from("chart-1"),
            ElementId::from("image-9"),
        ];
        ids.sort();
        assert_eq!(ids[0].as_str(), "chart-1");
        assert_eq!(ids[2].as_str(), "text-2");
    }

    #[test]
    fn test_visibility_from_css() {
        assert_eq!(Visibility::from_css("visible"), Visibility::Visible);
        assert_eq!(Visibility::from_css("hidden"), Visibility::Hidden);
        assert_eq!(Visibility::from_css("collapse"), Visibility::Collapse);
        assert_eq!(Visibility::from_css("inherit"), Visibility::Visible);
        assert_eq!(Visibility::from_css(" hidden "), Visibility::Hidden);
    }

    #[test]
    fn test_plain_measurement_is_identity() {
        let measurement = ElementMeasurement::plain(Bounds::new(10.0, 20.0, 100.0, 50.0));
        assert!(measurement.transform_matrix.is_identity());
        assert_eq!(measurement.z_index, 0);
        assert_eq!(measurement.visibility, Visibility::Visible);
    }

    #[test]
    fn test_measurement_serializes_camel_case() {
        let measurement = ElementMeasurement::plain(Bounds::new(1.0, 2.0, 3.0, 4.0));
        let json = serde_json::to_string(&measurement).expect("serialize");
        assert!(json.contains("absoluteBounds"));
        assert!(json.contains("transformMatrix"));
        assert!(json.contains("zIndex"));
    }
}
