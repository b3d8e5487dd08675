//! Layout Module - containers that position child widgets.
//!
//! # Architecture
//!
//! Every container follows the same two passes:
//!
//! 1. `size(ctx)` sizes children bottom-up and computes the container's
//!    natural size from theirs.
//! 2. `layout(x, y)` places the container's lower-left corner and hands
//!    each child an absolute position.
//!
//! Between the passes a parent may call `expand` on expandable children to
//! grow them into slack space. [`Spacer`](crate::primitives::Spacer) is the
//! simplest expandable widget; a container is expandable when any of its
//! children is.
//!
//! # Containers
//!
//! - [`VerticalLayout`] / [`HorizontalLayout`] - packed along one axis
//! - [`GridLayout`] - rows and columns sized independently
//! - [`FreeLayout`] - children pinned to anchors, overlapping allowed

mod free;
mod grid;
mod packed;

pub use free::FreeLayout;
pub use grid::GridLayout;
pub use packed::{DEFAULT_PADDING, HorizontalLayout, VerticalLayout};
