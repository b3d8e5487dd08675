//! Primitives - leaf widgets.
//!
//! - [`Spacer`] - empty filler that grows into slack space
//! - [`Graphic`] - one themed image
//! - [`Label`] - one line of text
//!
//! All three create their surface allocations lazily on the first
//! `size(Some(ctx))` and release them in `delete()`.

mod graphic;
mod label;
mod spacer;

pub use graphic::Graphic;
pub use label::Label;
pub use spacer::Spacer;
