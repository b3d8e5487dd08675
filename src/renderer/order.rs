//! Dialog stacking tokens.

use std::cell::Cell;

/// Hands out monotonically increasing paint-order tokens.
///
/// Owned by the root [`Gui`](crate::dialog::Gui) and shared with each
/// dialog it creates. The dialog holding the latest token draws on top.
#[derive(Debug, Default)]
pub struct PaintOrderAllocator {
    last: Cell<u64>,
}

impl PaintOrderAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh token, greater than every token handed out before.
    pub fn next_token(&self) -> u64 {
        let token = self.last.get() + 1;
        self.last.set(token);
        token
    }

    /// The most recently issued token (0 before any).
    pub fn latest(&self) -> u64 {
        self.last.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_increase() {
        let orders = PaintOrderAllocator::new();
        assert_eq!(orders.latest(), 0);
        let a = orders.next_token();
        let b = orders.next_token();
        assert!(b > a);
        assert_eq!(orders.latest(), b);
    }
}
