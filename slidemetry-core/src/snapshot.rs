//! Immutable per-slide capture snapshots and their fingerprint hash.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::error::MeasureResult;
use crate::geometry::SlideDimensions;
use crate::measurement::{ElementId, ElementMeasurement};

/// Snapshot of every moveable element in a slide at one instant.
///
/// Snapshots are ephemeral value objects: a new capture produces a new
/// snapshot rather than mutating the old one. The element map is ordered
/// (`BTreeMap`) so serialization and the fingerprint are stable regardless
/// of enumeration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideSnapshot {
    /// Identifier of the captured slide.
    pub slide_id: String,
    /// Container dimensions at capture time.
    pub slide_dimensions: SlideDimensions,
    /// Measurements keyed by element identifier.
    pub elements: BTreeMap<ElementId, ElementMeasurement>,
    /// Capture time, milliseconds since the Unix epoch.
    pub capture_timestamp: u64,
    /// Fingerprint over the element map; equal hashes mean equal rounded
    /// geometry.
    pub capture_hash: String,
}

impl SlideSnapshot {
    /// Assemble a snapshot, stamping the capture time and fingerprint.
    #[must_use]
    pub fn new(
        slide_id: impl Into<String>,
        slide_dimensions: SlideDimensions,
        elements: BTreeMap<ElementId, ElementMeasurement>,
    ) -> Self {
        let capture_hash = fingerprint(&elements);
        Self {
            slide_id: slide_id.into(),
            slide_dimensions,
            elements,
            capture_timestamp: current_timestamp_ms(),
            capture_hash,
        }
    }

    /// Number of measured elements.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Serialize the snapshot to JSON for the export backend.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> MeasureResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> MeasureResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Fingerprint an element map for cheap change detection.
///
/// Every numeric value is rounded to 2 decimals before serialization so
/// sub-centipixel float noise cannot flip the hash. The canonical string is
/// folded through a wrapping 31-multiplier into signed 32 bits and rendered
/// base-36, matching the fingerprint the editor stores alongside persisted
/// layouts. This is a change-detection fingerprint, not a cryptographic
/// hash; collision resistance is not a goal.
#[must_use]
pub fn fingerprint(elements: &BTreeMap<ElementId, ElementMeasurement>) -> String {
    let mut canonical = String::new();
    for (id, measurement) in elements {
        let bounds = &measurement.absolute_bounds;
        let decomposed = &measurement.transform_matrix.decomposed;
        // Writing into a String cannot fail.
        let _ = write!(
            canonical,
            "{id}|{:.2},{:.2},{:.2},{:.2}|",
            bounds.x, bounds.y, bounds.width, bounds.height
        );
        for coefficient in &measurement.transform_matrix.matrix {
            let _ = write!(canonical, "{coefficient:.2},");
        }
        let _ = write!(
            canonical,
            "|{:.2},{:.2},{:.2},{:.2},{:.2}|{},{:.2},{:?};",
            decomposed.translate_x,
            decomposed.translate_y,
            decomposed.scale_x,
            decomposed.scale_y,
            decomposed.rotation,
            measurement.z_index,
            measurement.opacity,
            measurement.visibility
        );
    }
    to_base36(fold32(&canonical))
}

/// Fold a string into signed 32 bits with the classic 31-multiplier.
fn fold32(text: &str) -> i32 {
    let mut hash: i32 = 0;
    for ch in text.chars() {
        // Deliberate 32-bit wrap, matching the editor's stored fingerprints.
        #[allow(clippy::cast_possible_wrap)]
        let code = u32::from(ch) as i32;
        hash = hash.wrapping_mul(31).wrapping_add(code);
    }
    hash
}

/// Render a signed 32-bit value in base 36, keeping the sign.
fn to_base36(value: i32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_owned();
    }
    let mut magnitude = u64::from(value.unsigned_abs());
    let mut encoded = Vec::new();
    while magnitude > 0 {
        encoded.push(DIGITS[(magnitude % 36) as usize]);
        magnitude /= 36;
    }
    if value < 0 {
        encoded.push(b'-');
    }
    encoded.reverse();
    String::from_utf8(encoded).unwrap_or_default()
}

/// Current Unix timestamp in milliseconds.
#[cfg(not(target_arch = "wasm32"))]
fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| {
        // Will not exceed u64 for millennia.
        #[allow(clippy::cast_possible_truncation)]
        {
            d.as_millis() as u64
        }
    })
}

/// Current Unix timestamp in milliseconds (browser clock).
#[cfg(target_arch = "wasm32")]
fn current_timestamp_ms() -> u64 {
    #[cfg(feature = "wasm")]
    {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            js_sys::Date::now() as u64
        }
    }
    #[cfg(not(feature = "wasm"))]
    {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Bounds;

    fn sample_elements() -> BTreeMap<ElementId, ElementMeasurement> {
        let mut elements = BTreeMap::new();
        elements.insert(
            ElementId::from("text-1"),
            ElementMeasurement::plain(Bounds::new(10.0, 20.0, 300.0, 80.0)),
        );
        elements.insert(
            ElementId::from("chart-2"),
            ElementMeasurement::plain(Bounds::new(50.0, 140.0, 400.0, 260.0)),
        );
        elements
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let elements = sample_elements();
        assert_eq!(fingerprint(&elements), fingerprint(&elements));
    }

    #[test]
    fn test_fingerprint_ignores_subcentipixel_noise() {
        let mut noisy = sample_elements();
        if let Some(m) = noisy.get_mut(&ElementId::from("text-1")) {
            m.absolute_bounds.x = 10.001;
        }
        let mut noisier = sample_elements();
        if let Some(m) = noisier.get_mut(&ElementId::from("text-1")) {
            m.absolute_bounds.x = 10.004;
        }
        assert_eq!(fingerprint(&noisy), fingerprint(&noisier));
    }

    #[test]
    fn test_fingerprint_changes_on_movement() {
        let moved = {
            let mut elements = sample_elements();
            if let Some(m) = elements.get_mut(&ElementId::from("text-1")) {
                m.absolute_bounds.x += 1.0;
            }
            elements
        };
        assert_ne!(fingerprint(&sample_elements()), fingerprint(&moved));
    }

    #[test]
    fn test_fingerprint_is_insertion_order_independent() {
        let forward = sample_elements();
        let mut reversed = BTreeMap::new();
        for (id, measurement) in sample_elements().into_iter().rev() {
            reversed.insert(id, measurement);
        }
        assert_eq!(fingerprint(&forward), fingerprint(&reversed));
    }

    #[test]
    fn test_fold32_known_values() {
        assert_eq!(fold32(""), 0);
        assert_eq!(fold32("a"), 97);
        // 'a' * 31 + 'b' = 3105
        assert_eq!(fold32("ab"), 3105);
    }

    #[test]
    fn test_to_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(97), "2p");
        assert_eq!(to_base36(-36), "-10");
        assert_eq!(to_base36(i32::MIN), "-zik0zk");
    }

    #[test]
    fn test_snapshot_json_round_trip() {
        let snapshot = SlideSnapshot::new(
            "slide-7",
            SlideDimensions::new(1174.0, 660.0, 2.0),
            sample_elements(),
        );
        let json = snapshot.to_json().expect("serialize");
        assert!(json.contains("captureHash"));
        assert!(json.contains("slideDimensions"));
        assert!(json.contains("devicePixelRatio"));
        let restored = SlideSnapshot::from_json(&json).expect("deserialize");
        assert_eq!(restored, snapshot);
    }

    #[test]
    fn test_snapshot_counts_elements() {
        let snapshot = SlideSnapshot::new(
            "slide-1",
            SlideDimensions::new(1174.0, 660.0, 1.0),
            sample_elements(),
        );
        assert_eq!(snapshot.element_count(), 2);
        assert!(!snapshot.capture_hash.is_empty());
    }
}
