//! Errors for unrecoverable construction misuse.
//!
//! Layout and theme lookups never fail; they substitute defaults. Only the
//! constructors below can reject their input.

use thiserror::Error;

/// Errors raised by widget and theme constructors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GuiError {
    #[error("grid layout needs at least one cell slot")]
    EmptyGrid,

    #[error("fixed-size scrollable needs both max_width and max_height")]
    UnboundedFixedScrollable,

    #[error("dropdown needs at least one option")]
    NoOptions,

    #[error("slider range is empty: min {min} must be below max {max}")]
    EmptyRange { min: f32, max: f32 },

    #[error("image region {region:?} lies outside texture `{src}` ({width}x{height})")]
    RegionOutOfBounds {
        src: String,
        region: [i32; 4],
        width: i32,
        height: i32,
    },
}

/// Result alias for fallible constructors.
pub type Result<T> = std::result::Result<T, GuiError>;
