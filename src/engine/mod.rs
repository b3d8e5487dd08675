//! Widget engine - the node protocol and its plumbing.
//!
//! The engine defines what every widget is:
//! - Registry: stable [`ControlId`] allocation
//! - Node: the two-pass size/layout protocol and tree queries
//! - Control: input capability, hover/focus/disabled state, values
//! - Context: dialog attachment, [`SizeCtx`] and [`EventCtx`]
//!
//! # Architecture
//!
//! Containers own their children as `Box<dyn Node>`. Nothing holds a
//! pointer back up the tree; widgets keep a weak [`DialogLink`] and the
//! event manager keeps [`ControlId`]s, resolving them by searching the tree
//! when it needs the control.
//!
//! ```text
//! Dialog
//!   └─ Frame (Node)
//!        └─ VerticalLayout (Node)
//!             ├─ Label (Node)
//!             └─ Button (Node + Control)   ← (ControlId, hit region) in the manager
//! ```

mod context;
mod node;
mod registry;

pub use context::*;
pub use node::*;
pub use registry::*;
