//! # Slidemetry Fixtures
//!
//! In-memory slide surfaces and frame clocks for exercising the
//! measurement pipeline without a browser. A [`FakeSlide`] stands in for
//! the slide container, [`FakeElement`]s for its moveable nodes, and
//! [`InstantClock`] for the animation-frame wait; the capture code under
//! test cannot tell the difference.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod clock;
pub mod css;
pub mod surface;

pub use clock::InstantClock;
pub use css::{compose_transform, matrix_string};
pub use surface::{FakeElement, FakeSlide};
