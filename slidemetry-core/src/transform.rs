//! Computed CSS transform parsing and 2D decomposition.

use serde::{Deserialize, Serialize};

use crate::geometry::{round2, round4};

/// Coefficients of the identity 2D matrix `(a, b, c, d, tx, ty)`.
pub const IDENTITY_MATRIX: [f64; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// Translate/scale/rotation components of a 2D transform.
///
/// Translation is rounded to 2 decimals (pixels), scale to 4 decimals,
/// rotation to 2 decimals (degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decomposed {
    /// Horizontal translation in pixels.
    pub translate_x: f64,
    /// Vertical translation in pixels.
    pub translate_y: f64,
    /// Horizontal scale factor.
    pub scale_x: f64,
    /// Vertical scale factor.
    pub scale_y: f64,
    /// Rotation in degrees.
    pub rotation: f64,
}

impl Decomposed {
    /// Components of the identity transform.
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
        }
    }
}

impl Default for Decomposed {
    fn default() -> Self {
        Self::identity()
    }
}

/// A computed `transform` value with its parsed matrix and decomposition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformMatrix {
    /// The computed style string as read from the surface.
    pub raw: String,
    /// 2D matrix coefficients `[a, b, c, d, tx, ty]`.
    pub matrix: [f64; 6],
    /// Decomposed translate/scale/rotation.
    pub decomposed: Decomposed,
}

impl TransformMatrix {
    /// The identity transform, as produced for untransformed elements.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            raw: "none".to_owned(),
            matrix: IDENTITY_MATRIX,
            decomposed: Decomposed::identity(),
        }
    }

    /// Parse a computed `transform` value.
    ///
    /// Computed styles reduce every 2D transform to `matrix(a, b, c, d, tx,
    /// ty)`; 3D transforms arrive as `matrix3d(...)` and are reduced to
    /// their 2D equivalent. `none`, empty, and malformed inputs all produce
    /// the identity transform: capture must not fail on an unreadable style.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            return Self::identity();
        }
        parse_coefficients(trimmed).map_or_else(
            || {
                tracing::debug!(transform = raw, "unparseable transform, treating as identity");
                Self {
                    raw: raw.to_owned(),
                    matrix: IDENTITY_MATRIX,
                    decomposed: Decomposed::identity(),
                }
            },
            |matrix| Self {
                raw: raw.to_owned(),
                matrix,
                decomposed: decompose(&matrix),
            },
        )
    }

    /// Whether the matrix equals the canonical identity.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.matrix
            .iter()
            .zip(&IDENTITY_MATRIX)
            .all(|(actual, expected)| (actual - expected).abs() < f64::EPSILON)
    }
}

impl Default for TransformMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

/// Decompose 2D matrix coefficients into translate/scale/rotation.
#[must_use]
pub fn decompose(matrix: &[f64; 6]) -> Decomposed {
    let [a, b, c, d, tx, ty] = *matrix;
    Decomposed {
        translate_x: round2(tx),
        translate_y: round2(ty),
        scale_x: round4(a.hypot(b)),
        scale_y: round4(c.hypot(d)),
        rotation: round2(b.atan2(a).to_degrees()),
    }
}

/// Extract 2D coefficients from a `matrix(...)` or `matrix3d(...)` string.
///
/// The 16-value `matrix3d` form reduces to 2D via indices 0, 1, 4, 5, 12
/// and 13 (the in-plane block plus the x/y translation).
fn parse_coefficients(value: &str) -> Option<[f64; 6]> {
    let (name, rest) = value.split_once('(')?;
    let body = rest.strip_suffix(')')?;
    let numbers: Vec<f64> = body
        .split(',')
        .map(|entry| entry.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .ok()?;
    match (name.trim(), numbers.len()) {
        ("matrix", 6) => Some([
            numbers[0], numbers[1], numbers[2], numbers[3], numbers[4], numbers[5],
        ]),
        ("matrix3d", 16) => Some([
            numbers[0],
            numbers[1],
            numbers[4],
            numbers[5],
            numbers[12],
            numbers[13],
        ]),
        _ => None,
    }
}
