//! Capture lifecycle around the stateless pipeline.
//!
//! The session is what an editor binds to one open slide: it remembers the
//! last persisted snapshot, captures on demand, and answers whether the
//! persisted layout has gone stale.

use crate::capture::{CaptureConfig, Capturer};
use crate::detect::{ChangeDetector, Tolerances};
use crate::error::{MeasureError, MeasureResult};
use crate::measurement::{ElementId, ElementMeasurement};
use crate::snapshot::SlideSnapshot;
use crate::surface::{FrameClock, SlideSurface};
use crate::validate::{ValidationPolicy, Validator};

/// Outcome of a session capture.
#[derive(Debug, Clone)]
pub struct CaptureOutcome {
    /// The freshly captured snapshot.
    pub snapshot: SlideSnapshot,
    /// Whether layout differs from the last persisted snapshot.
    pub changed: bool,
    /// Elements whose measurements failed sanity checks.
    pub suspect: Vec<ElementId>,
}

/// Tracks one slide's capture/compare/persist cycle.
///
/// Captures are cooperative: the session holds no locks and expects the
/// caller to serialize capture requests (e.g. trigger only on save).
#[derive(Debug)]
pub struct PositioningSession<S, C> {
    slide_id: String,
    capturer: Capturer<C>,
    detector: ChangeDetector,
    validator: Validator,
    surface: Option<S>,
    last_persisted: Option<SlideSnapshot>,
}

impl<S: SlideSurface, C: FrameClock> PositioningSession<S, C> {
    /// Create a session with default capture, comparison, and validation
    /// policies.
    #[must_use]
    pub fn new(slide_id: impl Into<String>, clock: C) -> Self {
        Self {
            slide_id: slide_id.into(),
            capturer: Capturer::new(clock),
            detector: ChangeDetector::default(),
            validator: Validator::default(),
            surface: None,
            last_persisted: None,
        }
    }

    /// Create a session with explicit policies.
    #[must_use]
    pub fn with_policies(
        slide_id: impl Into<String>,
        clock: C,
        config: CaptureConfig,
        tolerances: Tolerances,
        policy: ValidationPolicy,
    ) -> Self {
        Self {
            slide_id: slide_id.into(),
            capturer: Capturer::with_config(clock, config),
            detector: ChangeDetector::new(tolerances),
            validator: Validator::new(policy),
            surface: None,
            last_persisted: None,
        }
    }

    /// Bind the live slide container.
    pub fn attach(&mut self, surface: S) {
        self.surface = Some(surface);
    }

    /// Unbind the slide container, returning it if one was attached.
    pub fn detach(&mut self) -> Option<S> {
        self.surface.take()
    }

    /// Whether a slide container is currently attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.surface.is_some()
    }

    /// The snapshot the editor's store last accepted, if any.
    #[must_use]
    pub fn last_persisted(&self) -> Option<&SlideSnapshot> {
        self.last_persisted.as_ref()
    }

    /// Capture the attached slide and compare against the last persisted
    /// snapshot.
    ///
    /// Every measurement is sanity-checked; findings are advisory and the
    /// offending identifiers are surfaced in the outcome rather than
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::ContainerMissing`] when no surface is
    /// attached, or [`MeasureError::Detached`] when the container itself
    /// cannot be measured.
    pub async fn capture(&self) -> MeasureResult<CaptureOutcome> {
        let surface = self
            .surface
            .as_ref()
            .ok_or(MeasureError::ContainerMissing)?;
        let snapshot = self.capturer.capture_all(&self.slide_id, surface).await?;

        let mut suspect = Vec::new();
        for (id, measurement) in &snapshot.elements {
            if !self.validator.validate(measurement).is_valid() {
                suspect.push(id.clone());
            }
        }

        let changed = self
            .detector
            .has_changed(self.last_persisted.as_ref(), &snapshot);
        tracing::debug!(
            slide_id = %self.slide_id,
            elements = snapshot.element_count(),
            changed,
            suspect = suspect.len(),
            "slide capture complete"
        );
        Ok(CaptureOutcome {
            snapshot,
            changed,
            suspect,
        })
    }

    /// Incrementally re-measure one element.
    ///
    /// Returns `Ok(None)` when the element is not found in the slide.
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::ContainerMissing`] when no surface is
    /// attached.
    pub async fn capture_element(
        &self,
        id: &ElementId,
    ) -> MeasureResult<Option<ElementMeasurement>> {
        let surface = self
            .surface
            .as_ref()
            .ok_or(MeasureError::ContainerMissing)?;
        self.capturer.capture_one(surface, id).await
    }

    /// Record the snapshot the editor's store accepted, so subsequent
    /// captures compare against it.
    pub fn mark_persisted(&mut self, snapshot: SlideSnapshot) {
        self.last_persisted = Some(snapshot);
    }
}
