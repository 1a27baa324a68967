//! DOM-backed surfaces for in-browser capture.
//!
//! Wraps `web-sys` elements in the surface traits so the same pipeline
//! that tests run against fixtures drives real slides in the editor.

use async_trait::async_trait;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::capture::Capturer;
use crate::error::{MeasureError, MeasureResult};
use crate::geometry::Bounds;
use crate::measurement::{ElementId, Visibility};
use crate::surface::{ElementSurface, FrameClock, SlideSurface, Surface, Tagged};

/// Marker attribute tagging an element as moveable.
pub const MOVEABLE_ATTR: &str = "data-moveable";

/// Identifier attribute on moveable elements.
pub const ELEMENT_ID_ATTR: &str = "data-element-id";

/// Install the panic hook for readable browser stack traces.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Read an element's computed style declaration.
fn computed_style(element: &web_sys::Element) -> Option<web_sys::CssStyleDeclaration> {
    web_sys::window()?.get_computed_style(element).ok().flatten()
}

/// Read a single computed style property as a string.
fn style_value(element: &web_sys::Element, property: &str) -> Option<String> {
    computed_style(element)?.get_property_value(property).ok()
}

/// Describe an element for error messages.
fn describe(element: &web_sys::Element) -> String {
    element
        .get_attribute(ELEMENT_ID_ATTR)
        .unwrap_or_else(|| element.tag_name().to_lowercase())
}

fn ensure_connected(element: &web_sys::Element) -> MeasureResult<()> {
    if element.is_connected() {
        Ok(())
    } else {
        Err(MeasureError::Detached(describe(element)))
    }
}

fn flush_element(element: &web_sys::Element) -> MeasureResult<()> {
    ensure_connected(element)?;
    // Reading offsetHeight forces a synchronous layout pass.
    if let Some(html) = element.dyn_ref::<web_sys::HtmlElement>() {
        let _ = html.offset_height();
    }
    Ok(())
}

fn rect_of(element: &web_sys::Element) -> MeasureResult<Bounds> {
    ensure_connected(element)?;
    let rect = element.get_bounding_client_rect();
    Ok(Bounds::new(rect.x(), rect.y(), rect.width(), rect.height()))
}

/// A moveable DOM element measured through `web-sys`.
#[derive(Debug, Clone)]
pub struct DomElement {
    inner: web_sys::Element,
}

impl DomElement {
    /// Wrap a DOM element.
    #[must_use]
    pub const fn new(inner: web_sys::Element) -> Self {
        Self { inner }
    }
}

impl Surface for DomElement {
    fn flush_layout(&self) -> MeasureResult<()> {
        flush_element(&self.inner)
    }

    fn bounding_rect(&self) -> MeasureResult<Bounds> {
        rect_of(&self.inner)
    }
}

impl ElementSurface for DomElement {
    fn computed_transform(&self) -> Option<String> {
        style_value(&self.inner, "transform")
    }

    fn z_index(&self) -> i32 {
        style_value(&self.inner, "z-index")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }

    fn opacity(&self) -> f64 {
        style_value(&self.inner, "opacity")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(1.0)
    }

    fn visibility(&self) -> Visibility {
        style_value(&self.inner, "visibility")
            .map_or(Visibility::Visible, |v| Visibility::from_css(&v))
    }
}

/// A slide container rooted at a DOM element.
#[derive(Debug, Clone)]
pub struct DomSlide {
    root: web_sys::Element,
}

impl DomSlide {
    /// Wrap the slide container element.
    #[must_use]
    pub const fn new(root: web_sys::Element) -> Self {
        Self { root }
    }
}

impl Surface for DomSlide {
    fn flush_layout(&self) -> MeasureResult<()> {
        flush_element(&self.root)
    }

    fn bounding_rect(&self) -> MeasureResult<Bounds> {
        rect_of(&self.root)
    }
}

impl SlideSurface for DomSlide {
    type Element = DomElement;

    fn device_pixel_ratio(&self) -> f64 {
        web_sys::window().map_or(1.0, |w| w.device_pixel_ratio())
    }

    fn moveable_elements(&self) -> MeasureResult<Vec<Tagged<DomElement>>> {
        ensure_connected(&self.root)?;
        let selector = format!("[{MOVEABLE_ATTR}]");
        let list = self
            .root
            .query_selector_all(&selector)
            .map_err(|_| MeasureError::Detached(describe(&self.root)))?;
        let mut elements = Vec::new();
        for index in 0..list.length() {
            let Some(node) = list.item(index) else {
                continue;
            };
            let Ok(element) = node.dyn_into::<web_sys::Element>() else {
                continue;
            };
            let id = element.get_attribute(ELEMENT_ID_ATTR).map(ElementId::from);
            elements.push(Tagged {
                id,
                element: DomElement::new(element),
            });
        }
        Ok(elements)
    }

    fn element_by_id(&self, id: &ElementId) -> MeasureResult<Option<DomElement>> {
        Ok(self
            .moveable_elements()?
            .into_iter()
            .find(|tagged| tagged.id.as_ref() == Some(id))
            .map(|tagged| tagged.element))
    }
}

/// Frame clock driven by `requestAnimationFrame`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RafClock;

#[async_trait(?Send)]
impl FrameClock for RafClock {
    async fn next_frame(&self) {
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            match web_sys::window() {
                Some(window) => {
                    if window.request_animation_frame(&resolve).is_err() {
                        let _ = resolve.call0(&JsValue::NULL);
                    }
                }
                // No window (e.g. worker context): resolve immediately
                // rather than stalling the capture.
                None => {
                    let _ = resolve.call0(&JsValue::NULL);
                }
            }
        });
        let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
    }
}

/// Capture every moveable element under `root` and return snapshot JSON.
///
/// JavaScript-callable entry point for editors that consume the library as
/// a WASM module rather than through the Rust API.
///
/// # Errors
///
/// Rejects with a message when the container cannot be measured or the
/// snapshot cannot be serialized.
#[wasm_bindgen(js_name = captureSlide)]
// Async exports cannot borrow their arguments.
#[allow(clippy::needless_pass_by_value)]
pub async fn capture_slide(root: web_sys::Element, slide_id: String) -> Result<String, JsValue> {
    let capturer = Capturer::new(RafClock);
    let slide = DomSlide::new(root);
    let snapshot = capturer
        .capture_all(&slide_id, &slide)
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    snapshot
        .to_json()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
