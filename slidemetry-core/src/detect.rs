//! Snapshot comparison: staleness checks and drift reports.

use serde::{Deserialize, Serialize};

use crate::geometry::{Bounds, round2};
use crate::measurement::{ElementId, ElementMeasurement};
use crate::snapshot::SlideSnapshot;
use crate::transform::Decomposed;

/// Comparison tolerances for deciding whether layout has really moved.
///
/// The defaults absorb the float jitter that survives 2-decimal rounding
/// without masking genuine edits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tolerances {
    /// Maximum bounds delta (x/y/width/height) in pixels.
    pub bounds_px: f64,
    /// Maximum translate delta in pixels.
    pub translate_px: f64,
    /// Maximum scale factor delta.
    pub scale: f64,
    /// Maximum rotation delta in degrees.
    pub rotation_deg: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            bounds_px: 0.5,
            translate_px: 0.5,
            scale: 0.01,
            rotation_deg: 0.5,
        }
    }
}

/// Decides whether persisted layout state is stale.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeDetector {
    tolerances: Tolerances,
}

impl ChangeDetector {
    /// Create a detector with explicit tolerances.
    #[must_use]
    pub const fn new(tolerances: Tolerances) -> Self {
        Self { tolerances }
    }

    /// Whether `current` differs from `previous` enough to re-persist.
    ///
    /// A missing previous snapshot always reads as changed. Hash and
    /// element-count mismatches short-circuit; otherwise every element is
    /// compared within the configured tolerances.
    #[must_use]
    pub fn has_changed(&self, previous: Option<&SlideSnapshot>, current: &SlideSnapshot) -> bool {
        let Some(previous) = previous else {
            return true;
        };
        if previous.capture_hash != current.capture_hash {
            return true;
        }
        if previous.elements.len() != current.elements.len() {
            return true;
        }
        for (id, current_measurement) in &current.elements {
            let Some(previous_measurement) = previous.elements.get(id) else {
                return true;
            };
            if self.element_changed(previous_measurement, current_measurement) {
                return true;
            }
        }
        false
    }

    /// Detailed comparison for parity reporting between two captures (for
    /// instance the on-screen slide versus the export renderer's layout).
    #[must_use]
    pub fn diff(&self, previous: &SlideSnapshot, current: &SlideSnapshot) -> SnapshotDiff {
        let mut diff = SnapshotDiff::default();
        for id in previous.elements.keys() {
            if !current.elements.contains_key(id) {
                diff.removed.push(id.clone());
            }
        }
        for (id, current_measurement) in &current.elements {
            match previous.elements.get(id) {
                None => diff.added.push(id.clone()),
                Some(previous_measurement) => {
                    let drift = self.drift_between(id, previous_measurement, current_measurement);
                    if drift.is_nonzero() {
                        diff.drifted.push(drift);
                    }
                }
            }
        }
        diff
    }

    fn element_changed(&self, previous: &ElementMeasurement, current: &ElementMeasurement) -> bool {
        let t = self.tolerances;
        let pb = &previous.absolute_bounds;
        let cb = &current.absolute_bounds;
        if (pb.x - cb.x).abs() > t.bounds_px
            || (pb.y - cb.y).abs() > t.bounds_px
            || (pb.width - cb.width).abs() > t.bounds_px
            || (pb.height - cb.height).abs() > t.bounds_px
        {
            return true;
        }
        let pd = &previous.transform_matrix.decomposed;
        let cd = &current.transform_matrix.decomposed;
        (pd.translate_x - cd.translate_x).abs() > t.translate_px
            || (pd.translate_y - cd.translate_y).abs() > t.translate_px
            || (pd.scale_x - cd.scale_x).abs() > t.scale
            || (pd.scale_y - cd.scale_y).abs() > t.scale
            || (pd.rotation - cd.rotation).abs() > t.rotation_deg
    }

    fn drift_between(
        &self,
        id: &ElementId,
        previous: &ElementMeasurement,
        current: &ElementMeasurement,
    ) -> ElementDrift {
        let pb = &previous.absolute_bounds;
        let cb = &current.absolute_bounds;
        let pd = &previous.transform_matrix.decomposed;
        let cd = &current.transform_matrix.decomposed;
        ElementDrift {
            id: id.clone(),
            bounds_delta: Bounds::new(
                round2(cb.x - pb.x),
                round2(cb.y - pb.y),
                round2(cb.width - pb.width),
                round2(cb.height - pb.height),
            ),
            transform_delta: Decomposed {
                translate_x: round2(cd.translate_x - pd.translate_x),
                translate_y: round2(cd.translate_y - pd.translate_y),
                scale_x: cd.scale_x - pd.scale_x,
                scale_y: cd.scale_y - pd.scale_y,
                rotation: round2(cd.rotation - pd.rotation),
            },
            exceeds_tolerance: self.element_changed(previous, current),
        }
    }
}

/// Per-element deltas between two measurements (current minus previous).
///
/// `bounds_delta` and `transform_delta` reuse the geometry containers as
/// plain delta records; a zero entry means that component did not move.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDrift {
    /// Element identifier.
    pub id: ElementId,
    /// Bounds component deltas.
    pub bounds_delta: Bounds,
    /// Decomposed transform component deltas.
    pub transform_delta: Decomposed,
    /// Whether any component exceeds the comparison tolerances.
    pub exceeds_tolerance: bool,
}

impl ElementDrift {
    /// Whether any component moved at all.
    #[must_use]
    pub fn is_nonzero(&self) -> bool {
        let zero_transform = Decomposed {
            translate_x: 0.0,
            translate_y: 0.0,
            scale_x: 0.0,
            scale_y: 0.0,
            rotation: 0.0,
        };
        self.bounds_delta != Bounds::default() || self.transform_delta != zero_transform
    }
}

/// Outcome of comparing two snapshots element by element.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDiff {
    /// Identifiers present only in the current snapshot.
    pub added: Vec<ElementId>,
    /// Identifiers present only in the previous snapshot.
    pub removed: Vec<ElementId>,
    /// Elements present in both whose geometry moved.
    pub drifted: Vec<ElementDrift>,
}

impl SnapshotDiff {
    /// Whether the two snapshots describe identical layouts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.drifted.is_empty()
    }

    /// Whether anything changed beyond the comparison tolerances.
    #[must_use]
    pub fn has_material_change(&self) -> bool {
        !self.added.is_empty()
            || !self.removed.is_empty()
            || self.drifted.iter().any(|d| d.exceeds_tolerance)
    }
}
