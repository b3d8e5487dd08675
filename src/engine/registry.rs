//! Control identity.
//!
//! Every control gets a [`ControlId`] at construction. The id never changes,
//! so the event manager can keep `(id, hit region)` pairs across layout
//! passes and find the control again by searching the tree. An id whose
//! control has left the tree simply resolves to nothing.

use std::cell::Cell;
use std::fmt;

thread_local! {
    /// Next id to hand out on this thread.
    static NEXT_CONTROL_ID: Cell<u64> = const { Cell::new(1) };
}

/// Stable identity of a control.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId(u64);

impl ControlId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        NEXT_CONTROL_ID.with(|next| {
            let id = next.get();
            next.set(id + 1);
            ControlId(id)
        })
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
