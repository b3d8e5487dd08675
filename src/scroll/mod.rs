//! Scroll Module - viewports and the bars that pan them.
//!
//! - [`Scrollbar`] - track, bar and step buttons along one axis
//! - [`Scrollable`] - clipped viewport with its own nested input routing

mod scrollable;
mod scrollbar;

pub use scrollable::{Scrollable, ScrollableOptions};
pub use scrollbar::{Orientation, STEP_SPEED, Scrollbar, WHEEL_STEP};
