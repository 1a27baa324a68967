//! Advisory sanity checks for measured geometry.
//!
//! Findings are reported, never thrown: a suspect measurement is still a
//! measurement, and the caller decides whether to retry, discard, or accept
//! it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::measurement::ElementMeasurement;

/// Plausibility policy for measured geometry.
///
/// The defaults describe what can legitimately appear inside the editor
/// viewport; anything outside usually means a geometry read raced a DOM
/// mutation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationPolicy {
    /// Minimum plausible x/y position in pixels.
    pub min_position: f64,
    /// Maximum plausible x/y position in pixels.
    pub max_position: f64,
    /// Maximum plausible width/height in pixels.
    pub max_dimension: f64,
    /// Sanity ceiling for the decomposed scale magnitude.
    pub max_scale: f64,
    /// Sanity ceiling for the rotation magnitude in degrees.
    pub max_rotation_deg: f64,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            min_position: -1000.0,
            max_position: 2000.0,
            max_dimension: 2000.0,
            max_scale: 10.0,
            max_rotation_deg: 360.0,
        }
    }
}

/// A single sanity-check finding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationIssue {
    /// Position lies outside the plausible viewport-relative range.
    #[error("position ({x}, {y}) outside plausible range")]
    PositionOutOfRange {
        /// Measured x.
        x: f64,
        /// Measured y.
        y: f64,
    },

    /// Width or height is non-positive or implausibly large.
    #[error("size {width}x{height} not plausible")]
    ImplausibleSize {
        /// Measured width.
        width: f64,
        /// Measured height.
        height: f64,
    },

    /// A transform matrix coefficient is NaN or infinite.
    #[error("transform matrix entry {index} is not finite")]
    NonFiniteMatrix {
        /// Index of the offending coefficient.
        index: usize,
    },

    /// Decomposed scale exceeds the sanity ceiling.
    #[error("scale ({scale_x}, {scale_y}) exceeds the sanity ceiling")]
    ScaleOutOfRange {
        /// Decomposed horizontal scale.
        scale_x: f64,
        /// Decomposed vertical scale.
        scale_y: f64,
    },

    /// Rotation magnitude exceeds the sanity ceiling.
    #[error("rotation {rotation} degrees outside the +/-{limit} degree range")]
    RotationOutOfRange {
        /// Decomposed rotation in degrees.
        rotation: f64,
        /// Configured limit in degrees.
        limit: f64,
    },
}

/// Outcome of validating one measurement.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Whether the measurement passed every check.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// The individual findings.
    #[must_use]
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    fn push(&mut self, issue: ValidationIssue) {
        tracing::warn!(%issue, "measurement failed a sanity check");
        self.issues.push(issue);
    }
}

/// Sanity-checks measurements against a [`ValidationPolicy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    policy: ValidationPolicy,
}

impl Validator {
    /// Create a validator with an explicit policy.
    #[must_use]
    pub const fn new(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    /// Check one measurement; findings are advisory.
    #[must_use]
    pub fn validate(&self, measurement: &ElementMeasurement) -> ValidationReport {
        let mut report = ValidationReport::default();
        let bounds = &measurement.absolute_bounds;
        let policy = &self.policy;

        let position_plausible = |v: f64| v >= policy.min_position && v <= policy.max_position;
        if !position_plausible(bounds.x) || !position_plausible(bounds.y) {
            report.push(ValidationIssue::PositionOutOfRange {
                x: bounds.x,
                y: bounds.y,
            });
        }

        let size_plausible = |v: f64| v > 0.0 && v <= policy.max_dimension;
        if !size_plausible(bounds.width) || !size_plausible(bounds.height) {
            report.push(ValidationIssue::ImplausibleSize {
                width: bounds.width,
                height: bounds.height,
            });
        }

        for (index, coefficient) in measurement.transform_matrix.matrix.iter().enumerate() {
            if !coefficient.is_finite() {
                report.push(ValidationIssue::NonFiniteMatrix { index });
            }
        }

        let decomposed = &measurement.transform_matrix.decomposed;
        if decomposed.scale_x.abs() > policy.max_scale || decomposed.scale_y.abs() > policy.max_scale
        {
            report.push(ValidationIssue::ScaleOutOfRange {
                scale_x: decomposed.scale_x,
                scale_y: decomposed.scale_y,
            });
        }
        if decomposed.rotation.abs() > policy.max_rotation_deg {
            report.push(ValidationIssue::RotationOutOfRange {
                rotation: decomposed.rotation,
                limit: policy.max_rotation_deg,
            });
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Bounds;
    use crate::transform::TransformMatrix;

    fn validator() -> Validator {
        Validator::default()
    }

    fn plain(x: f64, y: f64, width: f64, height: f64) -> ElementMeasurement {
        ElementMeasurement::plain(Bounds::new(x, y, width, height))
    }

    #[test]
    fn test_normal_measurement_is_valid() {
        let report = validator().validate(&plain(10.0, 20.0, 300.0, 80.0));
        assert!(report.is_valid());
        assert!(report.issues().is_empty());
    }

    #[test]
    fn test_position_boundaries() {
        assert!(validator().validate(&plain(2000.0, 0.0, 10.0, 10.0)).is_valid());
        assert!(validator().validate(&plain(-1000.0, 0.0, 10.0, 10.0)).is_valid());
        assert!(!validator().validate(&plain(2000.1, 0.0, 10.0, 10.0)).is_valid());
        assert!(!validator().validate(&plain(0.0, -1000.1, 10.0, 10.0)).is_valid());
    }

    #[test]
    fn test_size_must_be_positive_and_bounded() {
        assert!(!validator().validate(&plain(0.0, 0.0, 0.0, 10.0)).is_valid());
        assert!(!validator().validate(&plain(0.0, 0.0, 10.0, -5.0)).is_valid());
        assert!(!validator().validate(&plain(0.0, 0.0, 2000.5, 10.0)).is_valid());
        assert!(validator().validate(&plain(0.0, 0.0, 2000.0, 10.0)).is_valid());
    }

    #[test]
    fn test_non_finite_matrix_is_flagged() {
        let mut measurement = plain(0.0, 0.0, 10.0, 10.0);
        measurement.transform_matrix.matrix[4] = f64::NAN;
        let report = validator().validate(&measurement);
        assert!(!report.is_valid());
        assert!(matches!(
            report.issues()[0],
            ValidationIssue::NonFiniteMatrix { index: 4 }
        ));
    }

    #[test]
    fn test_scale_ceiling() {
        let mut measurement = plain(0.0, 0.0, 10.0, 10.0);
        measurement.transform_matrix = TransformMatrix::parse("matrix(10.5, 0, 0, 1, 0, 0)");
        let report = validator().validate(&measurement);
        assert!(report
            .issues()
            .iter()
            .any(|i| matches!(i, ValidationIssue::ScaleOutOfRange { .. })));
    }

    #[test]
    fn test_rotation_ceiling() {
        let mut measurement = plain(0.0, 0.0, 10.0, 10.0);
        measurement.transform_matrix.decomposed.rotation = 400.0;
        let report = validator().validate(&measurement);
        assert!(report
            .issues()
            .iter()
            .any(|i| matches!(i, ValidationIssue::RotationOutOfRange { .. })));
    }

    #[test]
    fn test_multiple_findings_accumulate() {
        let mut measurement = plain(5000.0, 0.0, -1.0, 10.0);
        measurement.transform_matrix.decomposed.rotation = 720.0;
        let report = validator().validate(&measurement);
        assert_eq!(report.issues().len(), 3);
    }

    #[test]
    fn test_custom_policy() {
        let strict = Validator::new(ValidationPolicy {
            max_scale: 2.0,
            ..ValidationPolicy::default()
        });
        let mut measurement = plain(0.0, 0.0, 10.0, 10.0);
        measurement.transform_matrix = TransformMatrix::parse("matrix(3, 0, 0, 1, 0, 0)");
        assert!(!strict.validate(&measurement).is_valid());
        assert!(validator().validate(&measurement).is_valid());
    }
}
