//! Computed-style transform strings for fixtures.
//!
//! Browsers reduce every authored 2D transform to a `matrix(...)` computed
//! value; fixtures synthesize the same form so parsing sees exactly what a
//! live capture would.

/// Format a CSS `matrix(...)` string from coefficients.
#[must_use]
pub fn matrix_string(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> String {
    format!("matrix({a}, {b}, {c}, {d}, {tx}, {ty})")
}

/// Compose translate/scale/rotation into a computed-style matrix string.
///
/// Applies scale, then rotation, then translation, matching the order the
/// host editor's drag/resize surface writes transforms in.
#[must_use]
pub fn compose_transform(
    translate_x: f64,
    translate_y: f64,
    scale_x: f64,
    scale_y: f64,
    rotation_deg: f64,
) -> String {
    let (sin, cos) = rotation_deg.to_radians().sin_cos();
    matrix_string(
        scale_x * cos,
        scale_x * sin,
        -scale_y * sin,
        scale_y * cos,
        translate_x,
        translate_y,
    )
}
