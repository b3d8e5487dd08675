//! Vertical and horizontal packing.
//!
//! Both layouts stack children along one axis with uniform padding between
//! and around them:
//!
//! ```text
//! main  = p + sum(child_main + p)
//! cross = max(child_cross) + 2p
//! ```
//!
//! When expanded beyond that, slack along the main axis is split evenly
//! between expandable children (integer division, remainder handed out one
//! pixel at a time from the first), and every expandable child is stretched
//! across the inner cross extent.

use tracing::trace;

use crate::engine::{Node, SizeCtx, WidgetBase, nodes, nodes_mut};
use crate::primitives::Spacer;
use crate::types::{HAlign, Rect, Size, VAlign, size};

/// Default gap between and around children.
pub const DEFAULT_PADDING: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Vertical,
    Horizontal,
}

impl Axis {
    fn main(self, s: Size) -> i32 {
        match self {
            Axis::Vertical => s.height,
            Axis::Horizontal => s.width,
        }
    }

    fn cross(self, s: Size) -> i32 {
        match self {
            Axis::Vertical => s.width,
            Axis::Horizontal => s.height,
        }
    }

    fn compose(self, main: i32, cross: i32) -> Size {
        match self {
            Axis::Vertical => size(cross, main),
            Axis::Horizontal => size(main, cross),
        }
    }
}

// =============================================================================
// Shared core
// =============================================================================

struct Packed {
    base: WidgetBase,
    axis: Axis,
    padding: i32,
    children: Vec<Box<dyn Node>>,
}

impl Packed {
    fn new(axis: Axis) -> Self {
        Self { base: WidgetBase::new(), axis, padding: DEFAULT_PADDING, children: Vec::new() }
    }

    fn size(&mut self, ctx: Option<&SizeCtx<'_>>) {
        let Some(ctx) = ctx else {
            return;
        };
        self.base.attach(ctx.link);

        let p = self.padding;
        let mut main = p;
        let mut cross = 2 * p;
        for child in &mut self.children {
            child.size(Some(ctx));
            let s = child.rect().size();
            main += self.axis.main(s) + p;
            cross = cross.max(self.axis.cross(s) + 2 * p);
        }

        let inner_cross = cross - 2 * p;
        for child in self.children.iter_mut().filter(|c| c.is_expandable()) {
            let child_main = self.axis.main(child.rect().size());
            let stretched = self.axis.compose(child_main, inner_cross);
            child.expand(stretched.width, stretched.height);
        }

        self.base.set_size(self.axis.compose(main, cross));
        trace!(axis = ?self.axis, width = self.base.rect.width, height = self.base.rect.height, "packed size");
    }

    fn is_expandable(&self) -> bool {
        self.children.iter().any(|c| c.is_expandable())
    }

    fn expand(&mut self, width: i32, height: i32) {
        let natural = self.base.rect.size();
        let target = size(width.max(natural.width), height.max(natural.height));
        let slack = self.axis.main(target) - self.axis.main(natural);
        let inner_cross = self.axis.cross(target) - 2 * self.padding;

        let expandable: Vec<usize> =
            (0..self.children.len()).filter(|&i| self.children[i].is_expandable()).collect();
        if !expandable.is_empty() {
            let count = expandable.len() as i32;
            let share = slack / count;
            let remainder = slack % count;
            for (k, &i) in expandable.iter().enumerate() {
                let child = &mut self.children[i];
                let extra = i32::from((k as i32) < remainder);
                let child_main = self.axis.main(child.rect().size()) + share + extra;
                let stretched = self.axis.compose(child_main, inner_cross);
                child.expand(stretched.width, stretched.height);
            }
        }
        self.base.set_size(target);
    }

    /// Place children; `cross_offset(space, extent)` positions each child
    /// across the packing axis.
    fn layout(&mut self, x: i32, y: i32, cross_offset: impl Fn(i32, i32) -> i32) {
        self.base.set_position(x, y);
        let Rect { width, height, .. } = self.base.rect;
        let p = self.padding;
        match self.axis {
            Axis::Vertical => {
                let mut top = y + height - p;
                for child in &mut self.children {
                    let s = child.rect().size();
                    child.layout(x + cross_offset(width, s.width), top - s.height);
                    top -= s.height + p;
                }
            }
            Axis::Horizontal => {
                let mut left = x + p;
                for child in &mut self.children {
                    let s = child.rect().size();
                    child.layout(left, y + cross_offset(height, s.height));
                    left += s.width + p;
                }
            }
        }
    }

    fn delete(&mut self) {
        for child in &mut self.children {
            child.delete();
        }
    }

    fn teardown(&mut self) {
        for child in &mut self.children {
            child.teardown();
        }
        self.children.clear();
    }

    fn add(&mut self, child: Box<dyn Node>) {
        self.children.push(child);
        self.base.request_layout();
    }

    fn insert(&mut self, index: usize, child: Box<dyn Node>) {
        let index = index.min(self.children.len());
        self.children.insert(index, child);
        self.base.request_layout();
    }

    fn remove(&mut self, index: usize) -> Option<Box<dyn Node>> {
        if index >= self.children.len() {
            return None;
        }
        let mut child = self.children.remove(index);
        child.delete();
        self.base.request_layout();
        Some(child)
    }

    fn clear(&mut self) {
        self.delete();
        self.children.clear();
        self.base.request_layout();
    }
}

/// Generates the builder and mutation API shared by both packed layouts.
macro_rules! packed_api {
    ($name:ident, $align:ty) => {
        impl $name {
            /// Append a child.
            pub fn child(mut self, child: impl Node) -> Self {
                self.inner.children.push(Box::new(child));
                self
            }

            /// Append an already boxed child.
            pub fn boxed(mut self, child: Box<dyn Node>) -> Self {
                self.inner.children.push(child);
                self
            }

            /// Append an expandable gap.
            pub fn spacer(self) -> Self {
                self.child(Spacer::new())
            }

            pub fn align(mut self, align: $align) -> Self {
                self.align = align;
                self
            }

            pub fn padding(mut self, padding: i32) -> Self {
                self.inner.padding = padding;
                self
            }

            pub fn len(&self) -> usize {
                self.inner.children.len()
            }

            pub fn is_empty(&self) -> bool {
                self.inner.children.is_empty()
            }

            pub fn get(&self, index: usize) -> Option<&dyn Node> {
                self.inner.children.get(index).map(|c| &**c)
            }

            pub fn get_mut(&mut self, index: usize) -> Option<&mut dyn Node> {
                match self.inner.children.get_mut(index) {
                    Some(child) => Some(&mut **child),
                    None => None,
                }
            }

            /// Append a child and mark the owner dirty.
            pub fn add(&mut self, child: Box<dyn Node>) {
                self.inner.add(child);
            }

            /// Insert a child and mark the owner dirty.
            pub fn insert(&mut self, index: usize, child: Box<dyn Node>) {
                self.inner.insert(index, child);
            }

            /// Remove a child, releasing its graphics, and mark the owner dirty.
            pub fn remove(&mut self, index: usize) -> Option<Box<dyn Node>> {
                self.inner.remove(index)
            }

            /// Remove every child.
            pub fn clear(&mut self) {
                self.inner.clear();
            }
        }
    };
}

// =============================================================================
// VerticalLayout
// =============================================================================

/// Children stacked top to bottom.
pub struct VerticalLayout {
    inner: Packed,
    align: HAlign,
}

impl Default for VerticalLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl VerticalLayout {
    pub fn new() -> Self {
        Self { inner: Packed::new(Axis::Vertical), align: HAlign::Center }
    }
}

packed_api!(VerticalLayout, HAlign);

impl Node for VerticalLayout {
    fn base(&self) -> &WidgetBase {
        &self.inner.base
    }

    fn size(&mut self, ctx: Option<&SizeCtx<'_>>) {
        self.inner.size(ctx);
    }

    fn layout(&mut self, x: i32, y: i32) {
        let (align, p) = (self.align, self.inner.padding);
        self.inner.layout(x, y, |space, extent| match align {
            HAlign::Left => p,
            HAlign::Center => HAlign::Center.place(space, extent),
            HAlign::Right => space - extent - p,
        });
    }

    fn delete(&mut self) {
        self.inner.delete();
    }

    fn teardown(&mut self) {
        self.inner.teardown();
    }

    fn is_expandable(&self) -> bool {
        self.inner.is_expandable()
    }

    fn expand(&mut self, width: i32, height: i32) {
        self.inner.expand(width, height);
    }

    fn children(&self) -> Vec<&dyn Node> {
        nodes(&self.inner.children)
    }

    fn children_mut(&mut self) -> Vec<&mut dyn Node> {
        nodes_mut(&mut self.inner.children)
    }
}

// =============================================================================
// HorizontalLayout
// =============================================================================

/// Children in a row, left to right.
pub struct HorizontalLayout {
    inner: Packed,
    align: VAlign,
}

impl Default for HorizontalLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl HorizontalLayout {
    pub fn new() -> Self {
        Self { inner: Packed::new(Axis::Horizontal), align: VAlign::Center }
    }
}

packed_api!(HorizontalLayout, VAlign);

impl Node for HorizontalLayout {
    fn base(&self) -> &WidgetBase {
        &self.inner.base
    }

    fn size(&mut self, ctx: Option<&SizeCtx<'_>>) {
        self.inner.size(ctx);
    }

    fn layout(&mut self, x: i32, y: i32) {
        let (align, p) = (self.align, self.inner.padding);
        self.inner.layout(x, y, |space, extent| match align {
            VAlign::Bottom => p,
            VAlign::Center => VAlign::Center.place(space, extent),
            VAlign::Top => space - extent - p,
        });
    }

    fn delete(&mut self) {
        self.inner.delete();
    }

    fn teardown(&mut self) {
        self.inner.teardown();
    }

    fn is_expandable(&self) -> bool {
        self.inner.is_expandable()
    }

    fn expand(&mut self, width: i32, height: i32) {
        self.inner.expand(width, height);
    }

    fn children(&self) -> Vec<&dyn Node> {
        nodes(&self.inner.children)
    }

    fn children_mut(&mut self) -> Vec<&mut dyn Node> {
        nodes_mut(&mut self.inner.children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;

    /// Fixed-size block.
    struct Block(WidgetBase);

    impl Block {
        fn new(width: i32, height: i32) -> Self {
            Block(WidgetBase::sized(width, height))
        }
    }

    impl Node for Block {
        fn base(&self) -> &WidgetBase {
            &self.0
        }
        fn size(&mut self, _ctx: Option<&SizeCtx<'_>>) {}
        fn layout(&mut self, x: i32, y: i32) {
            self.0.set_position(x, y);
        }
        fn delete(&mut self) {}
    }

    fn setup() -> Harness {
        Harness::new()
    }

    fn rect_of(layout: &VerticalLayout, index: usize) -> Rect {
        layout.get(index).map(|c| c.rect()).unwrap_or_default()
    }

    #[test]
    fn test_vertical_left_aligned_stack() {
        let h = setup();
        let mut layout = VerticalLayout::new()
            .child(Block::new(40, 20))
            .child(Block::new(60, 30))
            .padding(5)
            .align(HAlign::Left);
        h.place(&mut layout, 0, 0);

        assert_eq!(layout.rect().size(), size(70, 65));
        let (first, second) = (rect_of(&layout, 0), rect_of(&layout, 1));
        assert_eq!(first, Rect::new(5, 40, 40, 20));
        assert_eq!(first.y - second.y, 30 + 5);
    }

    #[test]
    fn test_vertical_right_and_center() {
        let h = setup();
        let mut right = VerticalLayout::new().child(Block::new(10, 10)).child(Block::new(30, 10)).align(HAlign::Right);
        h.place(&mut right, 0, 0);
        assert_eq!(rect_of(&right, 0).x, 40 - 10 - 5);

        let mut center = VerticalLayout::new().child(Block::new(10, 10)).child(Block::new(30, 10));
        h.place(&mut center, 0, 0);
        assert_eq!(rect_of(&center, 0).x, 15);
    }

    #[test]
    fn test_horizontal_row() {
        let h = setup();
        let mut row = HorizontalLayout::new()
            .child(Block::new(10, 10))
            .child(Block::new(20, 30))
            .align(VAlign::Bottom);
        h.place(&mut row, 100, 100);
        assert_eq!(row.rect(), Rect::new(100, 100, 45, 40));
        assert_eq!(row.get(0).map(|c| c.rect()), Some(Rect::new(105, 105, 10, 10)));
        assert_eq!(row.get(1).map(|c| c.rect()), Some(Rect::new(120, 105, 20, 30)));
    }

    #[test]
    fn test_empty_layout_is_padding_only() {
        let h = setup();
        let mut layout = VerticalLayout::new();
        h.place(&mut layout, 0, 0);
        assert_eq!(layout.rect().size(), size(10, 5));
        assert!(!layout.is_expandable());
    }

    #[test]
    fn test_slack_split_with_remainder() {
        let h = setup();
        let mut layout = VerticalLayout::new()
            .padding(0)
            .spacer()
            .child(Block::new(10, 10))
            .spacer()
            .spacer();
        h.place(&mut layout, 0, 0);
        assert!(layout.is_expandable());
        layout.expand(10, 21);
        layout.layout(0, 0);

        let heights: Vec<i32> = (0..4).map(|i| rect_of(&layout, i).height).collect();
        assert_eq!(heights, vec![4, 10, 4, 3]);
        assert_eq!(heights.iter().sum::<i32>(), 21);
        assert_eq!(rect_of(&layout, 0).width, 10);
    }

    #[test]
    fn test_size_none_is_noop() {
        let mut layout = VerticalLayout::new().child(Block::new(10, 10));
        layout.size(None);
        layout.layout(0, 0);
        assert_eq!(layout.rect(), Rect::default());
    }

    #[test]
    fn test_mutation_marks_owner_dirty() {
        let h = setup();
        let mut layout = VerticalLayout::new().child(Block::new(10, 10));
        h.place(&mut layout, 0, 0);
        assert!(!h.handle.needs_layout());

        layout.add(Box::new(Block::new(5, 5)));
        assert!(h.handle.take_needs_layout());
        assert!(layout.remove(0).is_some());
        assert!(layout.remove(9).is_none());
        assert_eq!(layout.len(), 1);
        assert!(h.handle.needs_layout());
    }
}
