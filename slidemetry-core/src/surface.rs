//! Surface abstraction between the measurement pipeline and a host UI.
//!
//! The pipeline reads geometry through these traits so the core never
//! couples to one drag/resize library's callback shapes or to the DOM
//! directly. A browser adapter lives behind the `wasm` feature; tests use
//! in-memory fixtures.

use async_trait::async_trait;

use crate::error::MeasureResult;
use crate::geometry::Bounds;
use crate::measurement::{ElementId, Visibility};

/// A node whose layout can be flushed and whose geometry can be read.
pub trait Surface {
    /// Force a synchronous layout pass before geometry reads.
    ///
    /// Cached layout values go stale while styles mutate; implementations
    /// read a layout-dependent property (e.g. `offsetHeight`) to flush.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MeasureError::Detached`] if the node cannot be laid
    /// out.
    fn flush_layout(&self) -> MeasureResult<()>;

    /// Viewport-relative bounding box.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MeasureError::Detached`] if geometry cannot be read.
    fn bounding_rect(&self) -> MeasureResult<Bounds>;
}

/// A moveable element inside a slide.
pub trait ElementSurface: Surface {
    /// The computed `transform` value, or `None` when the style is
    /// unavailable. Unparseable values are treated as identity downstream.
    fn computed_transform(&self) -> Option<String>;

    /// Stacking order (`auto` reads as 0).
    fn z_index(&self) -> i32;

    /// Computed opacity in `0.0..=1.0`.
    fn opacity(&self) -> f64;

    /// Computed visibility.
    fn visibility(&self) -> Visibility;
}

/// A moveable element together with its identifier attribute, if present.
#[derive(Debug, Clone)]
pub struct Tagged<E> {
    /// Identifier attribute value; `None` when the marker node carries no
    /// identifier (such nodes are skipped with a warning).
    pub id: Option<ElementId>,
    /// The element surface.
    pub element: E,
}

/// The slide container that hosts moveable elements.
pub trait SlideSurface: Surface {
    /// Concrete element surface type produced by enumeration.
    type Element: ElementSurface;

    /// Device pixel ratio of the rendering surface.
    fn device_pixel_ratio(&self) -> f64;

    /// All descendants carrying the moveable marker, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MeasureError::Detached`] if the container cannot be
    /// enumerated.
    fn moveable_elements(&self) -> MeasureResult<Vec<Tagged<Self::Element>>>;

    /// Look up a single moveable element by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MeasureError::Detached`] if the container cannot be
    /// enumerated.
    fn element_by_id(&self, id: &ElementId) -> MeasureResult<Option<Self::Element>>;
}

/// Clock that resolves once the renderer has committed pending changes.
///
/// Reading layout before the next animation frame can observe a transform
/// that is set in style but not yet applied by the renderer; capture awaits
/// one tick before every geometry read. Futures are not required to be
/// `Send` so single-threaded browser clocks can implement the trait.
#[async_trait(?Send)]
pub trait FrameClock {
    /// Wait for the next animation frame (or an equivalent commit point).
    async fn next_frame(&self);
}
