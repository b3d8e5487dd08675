//! State Module - input routing
//!
//! - **Cycle** - tab-order stepping with wrap detection
//! - **Manager** - hover, focus and wheel routing over a flat control list

mod cycle;
mod manager;

pub use cycle::*;
pub use manager::*;
