//! # Slidemetry Core
//!
//! Measurement pipeline that keeps an editable slide pixel-consistent with
//! its exported rendering. The editor captures a snapshot of every
//! moveable element's geometry, fingerprints it, and compares it against
//! the layout the backend last persisted; only genuine movement triggers a
//! re-persist.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────┐
//! │                slidemetry-core                 │
//! ├────────────────────────────────────────────────┤
//! │  Surfaces          │  Capture                  │
//! │  - Slide container │  - Frame-tick wait        │
//! │  - Moveable nodes  │  - Layout flush + read    │
//! │  - Frame clock     │  - Transform decompose    │
//! ├────────────────────────────────────────────────┤
//! │  Snapshots         │  Comparison               │
//! │  - Element map     │  - Fingerprint fast path  │
//! │  - Fingerprint     │  - Tolerance compare      │
//! │  - JSON documents  │  - Drift reports          │
//! └────────────────────────────────────────────────┘
//!          DOM / fixtures  →  snapshot  →  editor store / export
//! ```
//!
//! Data flows one way: a surface is measured into an immutable
//! [`SlideSnapshot`], and snapshots are compared or serialized downstream.
//! Nothing here writes back to the surface.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod capture;
pub mod detect;
pub mod error;
pub mod geometry;
pub mod measurement;
pub mod session;
pub mod snapshot;
pub mod surface;
pub mod transform;
pub mod validate;

#[cfg(feature = "wasm")]
pub mod dom;

pub use capture::{CaptureConfig, Capturer};
pub use detect::{ChangeDetector, ElementDrift, SnapshotDiff, Tolerances};
pub use error::{MeasureError, MeasureResult};
pub use geometry::{Bounds, SlideDimensions, SLIDE_WIDTH};
pub use measurement::{ElementId, ElementMeasurement, Visibility};
pub use session::{CaptureOutcome, PositioningSession};
pub use snapshot::{fingerprint, SlideSnapshot};
pub use surface::{ElementSurface, FrameClock, SlideSurface, Surface, Tagged};
pub use transform::{decompose, Decomposed, TransformMatrix, IDENTITY_MATRIX};
pub use validate::{ValidationIssue, ValidationPolicy, ValidationReport, Validator};

/// Measurement core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
