//! Spacer - empty, expandable filler.

use crate::engine::{Node, SizeCtx, WidgetBase};
use crate::types::size;

/// Empty widget that shrinks to its minimum and grows into slack.
///
/// Use a fixed-size widget instead when the gap must not grow.
#[derive(Debug, Default)]
pub struct Spacer {
    base: WidgetBase,
    min_width: i32,
    min_height: i32,
}

impl Spacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spacer covering at least `width` x `height`.
    pub fn min(width: i32, height: i32) -> Self {
        Self { base: WidgetBase::new(), min_width: width, min_height: height }
    }
}

impl Node for Spacer {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn size(&mut self, ctx: Option<&SizeCtx<'_>>) {
        let Some(ctx) = ctx else {
            return;
        };
        self.base.attach(ctx.link);
        self.base.set_size(size(self.min_width, self.min_height));
    }

    fn layout(&mut self, x: i32, y: i32) {
        self.base.set_position(x, y);
    }

    fn delete(&mut self) {}

    fn is_expandable(&self) -> bool {
        true
    }

    fn expand(&mut self, width: i32, height: i32) {
        self.base.set_size(size(width, height));
    }
}
