//! Batch and incremental capture of slide element geometry.

use std::collections::BTreeMap;

use crate::error::MeasureResult;
use crate::geometry::{SlideDimensions, SLIDE_WIDTH};
use crate::measurement::{ElementId, ElementMeasurement};
use crate::snapshot::SlideSnapshot;
use crate::surface::{ElementSurface, FrameClock, SlideSurface, Surface};
use crate::transform::TransformMatrix;

/// Tolerance when checking the container against the editor slide width.
const WIDTH_CHECK_TOLERANCE: f64 = 0.5;

/// Capture-time configuration.
#[derive(Debug, Clone, Copy)]
pub struct CaptureConfig {
    /// Width the slide container is expected to measure, in CSS pixels.
    ///
    /// A container measuring a different width is a caller error; capture
    /// proceeds but logs a warning.
    pub expected_slide_width: f64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            expected_slide_width: SLIDE_WIDTH,
        }
    }
}

/// Measures moveable elements through a [`SlideSurface`].
///
/// The capturer is stateless between calls; it owns only its frame clock
/// and configuration. Concurrent captures against the same slide are not
/// guarded; callers serialize capture requests (e.g. trigger on save).
#[derive(Debug)]
pub struct Capturer<C> {
    clock: C,
    config: CaptureConfig,
}

impl<C: FrameClock> Capturer<C> {
    /// Create a capturer with the default configuration.
    #[must_use]
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            config: CaptureConfig::default(),
        }
    }

    /// Create a capturer with an explicit configuration.
    #[must_use]
    pub fn with_config(clock: C, config: CaptureConfig) -> Self {
        Self { clock, config }
    }

    /// Measure a single element relative to its container.
    ///
    /// Awaits one frame tick so pending transforms are committed, flushes
    /// layout on both nodes, then derives container-relative bounds and the
    /// decomposed transform from one pair of geometry reads. Bounds are
    /// rounded to 2 decimals. The element is never mutated.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MeasureError::Detached`] if either geometry read
    /// fails.
    pub async fn measure_element<E, S>(
        &self,
        element: &E,
        container: &S,
    ) -> MeasureResult<ElementMeasurement>
    where
        E: ElementSurface,
        S: Surface,
    {
        self.clock.next_frame().await;
        element.flush_layout()?;
        container.flush_layout()?;
        let element_rect = element.bounding_rect()?;
        let container_rect = container.bounding_rect()?;
        let absolute_bounds = element_rect.relative_to(&container_rect).rounded();
        let transform_matrix = element
            .computed_transform()
            .map_or_else(TransformMatrix::identity, |raw| TransformMatrix::parse(&raw));
        Ok(ElementMeasurement {
            absolute_bounds,
            transform_matrix,
            z_index: element.z_index(),
            opacity: element.opacity(),
            visibility: element.visibility(),
        })
    }

    /// Capture every moveable element in the slide.
    ///
    /// Marker nodes without an identifier attribute are skipped with a
    /// warning. A failed geometry read excludes that element and the
    /// capture continues; the batch fails only if the container itself
    /// cannot be read.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MeasureError::Detached`] if the container cannot be
    /// flushed or measured.
    pub async fn capture_all<S: SlideSurface>(
        &self,
        slide_id: &str,
        slide: &S,
    ) -> MeasureResult<SlideSnapshot> {
        slide.flush_layout()?;
        let container_rect = slide.bounding_rect()?;
        if (container_rect.width - self.config.expected_slide_width).abs() > WIDTH_CHECK_TOLERANCE {
            tracing::warn!(
                slide_id,
                width = container_rect.width,
                expected = self.config.expected_slide_width,
                "slide container width differs from the editor constant"
            );
        }

        let mut elements = BTreeMap::new();
        for tagged in slide.moveable_elements()? {
            let Some(id) = tagged.id else {
                tracing::warn!(slide_id, "moveable element without identifier, skipping");
                continue;
            };
            match self.measure_element(&tagged.element, slide).await {
                Ok(measurement) => {
                    if elements.insert(id.clone(), measurement).is_some() {
                        tracing::warn!(
                            slide_id,
                            element_id = %id,
                            "duplicate element identifier, keeping the last measurement"
                        );
                    }
                }
                Err(error) => {
                    tracing::warn!(
                        slide_id,
                        element_id = %id,
                        %error,
                        "element measurement failed, excluding from snapshot"
                    );
                }
            }
        }

        let dimensions = SlideDimensions::new(
            container_rect.width,
            container_rect.height,
            slide.device_pixel_ratio(),
        );
        Ok(SlideSnapshot::new(slide_id, dimensions, elements))
    }

    /// Re-measure a single element by identifier.
    ///
    /// Returns `Ok(None)` when no moveable element carries the id; absence
    /// is an expected state during editing, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MeasureError::Detached`] if the container or the
    /// found element cannot be measured.
    pub async fn capture_one<S: SlideSurface>(
        &self,
        slide: &S,
        id: &ElementId,
    ) -> MeasureResult<Option<ElementMeasurement>> {
        match slide.element_by_id(id)? {
            Some(element) => Ok(Some(self.measure_element(&element, slide).await?)),
            None => {
                tracing::debug!(element_id = %id, "element not found for incremental capture");
                Ok(None)
            }
        }
    }
}
