//! Frame Module - single-child decorators.
//!
//! - [`Wrapper`] - plain holder, snug or anchored in slack space
//! - [`Frame`] - themed panel image behind the content
//! - [`TitleFrame`] / [`SectionHeader`] - title bar and captioned rule
//! - [`FoldingSection`] - header that shows or hides its body

mod folding;
mod panel;
mod title;
mod wrapper;

pub use folding::FoldingSection;
pub use panel::Frame;
pub use title::{SectionHeader, TitleFrame};
pub use wrapper::Wrapper;
