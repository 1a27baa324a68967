//! In-memory slide and element surfaces.

use slidemetry_core::{
    Bounds, ElementId, ElementSurface, MeasureError, MeasureResult, SlideSurface, Surface, Tagged,
    Visibility, SLIDE_WIDTH,
};

/// Default fixture slide height in pixels.
const DEFAULT_HEIGHT: f64 = 660.0;

/// An in-memory moveable element.
///
/// Bounds are viewport-relative, like a real `getBoundingClientRect` read;
/// the capture pipeline is responsible for making them container-relative.
#[derive(Debug, Clone)]
pub struct FakeElement {
    bounds: Bounds,
    transform: Option<String>,
    z_index: i32,
    opacity: f64,
    visibility: Visibility,
    detached: bool,
}

impl FakeElement {
    /// Create an element at the given viewport-relative position.
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            bounds: Bounds::new(x, y, width, height),
            transform: None,
            z_index: 0,
            opacity: 1.0,
            visibility: Visibility::Visible,
            detached: false,
        }
    }

    /// Set the computed `transform` string.
    #[must_use]
    pub fn with_transform(mut self, transform: impl Into<String>) -> Self {
        self.transform = Some(transform.into());
        self
    }

    /// Set the stacking order.
    #[must_use]
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Set the computed opacity.
    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    /// Set the computed visibility.
    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Mark the element as detached; every geometry read will fail.
    #[must_use]
    pub fn detached(mut self) -> Self {
        self.detached = true;
        self
    }

    /// Move the element by the given viewport-relative offset.
    pub fn move_by(&mut self, dx: f64, dy: f64) {
        self.bounds.x += dx;
        self.bounds.y += dy;
    }

    /// Replace the computed `transform` string.
    pub fn set_transform(&mut self, transform: impl Into<String>) {
        self.transform = Some(transform.into());
    }

    /// Detach the element from its document.
    pub fn detach(&mut self) {
        self.detached = true;
    }
}

impl Surface for FakeElement {
    fn flush_layout(&self) -> MeasureResult<()> {
        if self.detached {
            return Err(MeasureError::Detached("fixture element".to_owned()));
        }
        Ok(())
    }

    fn bounding_rect(&self) -> MeasureResult<Bounds> {
        if self.detached {
            return Err(MeasureError::Detached("fixture element".to_owned()));
        }
        Ok(self.bounds)
    }
}

impl ElementSurface for FakeElement {
    fn computed_transform(&self) -> Option<String> {
        self.transform.clone()
    }

    fn z_index(&self) -> i32 {
        self.z_index
    }

    fn opacity(&self) -> f64 {
        self.opacity
    }

    fn visibility(&self) -> Visibility {
        self.visibility
    }
}

/// An in-memory slide container.
///
/// Defaults to the editor slide width at the viewport origin with a device
/// pixel ratio of 1.
#[derive(Debug, Clone)]
pub struct FakeSlide {
    rect: Bounds,
    device_pixel_ratio: f64,
    elements: Vec<Tagged<FakeElement>>,
}

impl FakeSlide {
    /// Create an empty slide at the viewport origin.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rect: Bounds::new(0.0, 0.0, SLIDE_WIDTH, DEFAULT_HEIGHT),
            device_pixel_ratio: 1.0,
            elements: Vec::new(),
        }
    }

    /// Place the container at an explicit viewport rectangle.
    #[must_use]
    pub fn with_rect(mut self, rect: Bounds) -> Self {
        self.rect = rect;
        self
    }

    /// Set the device pixel ratio.
    #[must_use]
    pub fn with_device_pixel_ratio(mut self, ratio: f64) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }

    /// Add a moveable element carrying an identifier attribute.
    pub fn insert(&mut self, id: impl Into<ElementId>, element: FakeElement) {
        self.elements.push(Tagged {
            id: Some(id.into()),
            element,
        });
    }

    /// Add a marker node that is missing its identifier attribute.
    pub fn insert_unidentified(&mut self, element: FakeElement) {
        self.elements.push(Tagged { id: None, element });
    }

    /// Mutable access to an element, for simulating edits between captures.
    pub fn element_mut(&mut self, id: &ElementId) -> Option<&mut FakeElement> {
        self.elements
            .iter_mut()
            .find(|tagged| tagged.id.as_ref() == Some(id))
            .map(|tagged| &mut tagged.element)
    }
}

impl Default for FakeSlide {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for FakeSlide {
    fn flush_layout(&self) -> MeasureResult<()> {
        Ok(())
    }

    fn bounding_rect(&self) -> MeasureResult<Bounds> {
        Ok(self.rect)
    }
}

impl SlideSurface for FakeSlide {
    type Element = FakeElement;

    fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    fn moveable_elements(&self) -> MeasureResult<Vec<Tagged<FakeElement>>> {
        Ok(self.elements.clone())
    }

    fn element_by_id(&self, id: &ElementId) -> MeasureResult<Option<FakeElement>> {
        Ok(self
            .elements
            .iter()
            .find(|tagged| tagged.id.as_ref() == Some(id))
            .map(|tagged| tagged.element.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detached_element_fails_reads() {
        let element = FakeElement::new(0.0, 0.0, 10.0, 10.0).detached();
        assert!(element.flush_layout().is_err());
        assert!(element.bounding_rect().is_err());
    }

    #[test]
    fn test_slide_lookup() {
        let mut slide = FakeSlide::new();
        slide.insert("text-1", FakeElement::new(10.0, 20.0, 100.0, 50.0));
        let id = ElementId::from("text-1");
        assert!(slide.element_by_id(&id).expect("enumerable").is_some());
        assert!(slide
            .element_by_id(&ElementId::from("missing"))
            .expect("enumerable")
            .is_none());
    }

    #[test]
    fn test_element_mut_moves_element() {
        let mut slide = FakeSlide::new();
        slide.insert("text-1", FakeElement::new(10.0, 20.0, 100.0, 50.0));
        let id = ElementId::from("text-1");
        slide.element_mut(&id).expect("present").move_by(5.0, 0.0);
        let element = slide.element_by_id(&id).expect("enumerable").expect("present");
        let rect = element.bounding_rect().expect("attached");
        assert!((rect.x - 15.0).abs() < f64::EPSILON);
    }
}
