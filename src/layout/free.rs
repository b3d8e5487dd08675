//! Free layout - children pinned to anchors of whatever space it gets.

use crate::engine::{Node, SizeCtx, WidgetBase};
use crate::types::{Anchor, Point, relative_point, size};

struct Pinned {
    anchor: Anchor,
    offset: Point,
    node: Box<dyn Node>,
}

/// Places each child at an anchor of its own rectangle plus an offset.
/// Children may overlap. Always expandable.
#[derive(Default)]
pub struct FreeLayout {
    base: WidgetBase,
    children: Vec<Pinned>,
}

impl FreeLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn child(mut self, anchor: Anchor, offset: Point, child: impl Node) -> Self {
        self.children.push(Pinned { anchor, offset, node: Box::new(child) });
        self
    }

    pub fn add(&mut self, anchor: Anchor, offset: Point, child: Box<dyn Node>) {
        self.children.push(Pinned { anchor, offset, node: child });
        self.base.request_layout();
    }

    /// Remove a child, releasing its graphics.
    pub fn remove(&mut self, index: usize) -> Option<Box<dyn Node>> {
        if index >= self.children.len() {
            return None;
        }
        let mut pinned = self.children.remove(index);
        pinned.node.delete();
        self.base.request_layout();
        Some(pinned.node)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Node for FreeLayout {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn size(&mut self, ctx: Option<&SizeCtx<'_>>) {
        let Some(ctx) = ctx else {
            return;
        };
        self.base.attach(ctx.link);

        let (mut width, mut height) = (0, 0);
        for pinned in &mut self.children {
            pinned.node.size(Some(ctx));
            let s = pinned.node.rect().size();
            width = width.max(s.width + pinned.offset.x.abs());
            height = height.max(s.height + pinned.offset.y.abs());
        }
        self.base.set_size(size(width, height));
    }

    fn layout(&mut self, x: i32, y: i32) {
        self.base.set_position(x, y);
        let rect = self.base.rect;
        for pinned in &mut self.children {
            let at = relative_point(&rect, pinned.anchor, pinned.node.rect().size(), None, pinned.offset);
            pinned.node.layout(at.x, at.y);
        }
    }

    fn delete(&mut self) {
        for pinned in &mut self.children {
            pinned.node.delete();
        }
    }

    fn teardown(&mut self) {
        for pinned in &mut self.children {
            pinned.node.teardown();
        }
        self.children.clear();
    }

    fn is_expandable(&self) -> bool {
        true
    }

    fn expand(&mut self, width: i32, height: i32) {
        let current = self.base.rect.size();
        self.base.set_size(size(width.max(current.width), height.max(current.height)));
    }

    fn children(&self) -> Vec<&dyn Node> {
        self.children.iter().map(|p| &*p.node as &dyn Node).collect()
    }

    fn children_mut(&mut self) -> Vec<&mut dyn Node> {
        self.children.iter_mut().map(|p| &mut *p.node as &mut dyn Node).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Spacer;
    use crate::testing::Harness;
    use crate::types::{Rect, point as at};

    #[test]
    fn test_pinned_to_corners() {
        let h = Harness::new();
        let mut free = FreeLayout::new()
            .child(Anchor::TopRight, at(-2, -2), Spacer::min(10, 10))
            .child(Anchor::BottomLeft, at(0, 0), Spacer::min(4, 4));
        free.size(Some(&h.size_ctx()));
        assert_eq!(free.rect().size(), size(12, 12));

        free.expand(100, 50);
        free.layout(0, 0);
        let rects: Vec<Rect> = free.children().iter().map(|c| c.rect()).collect();
        assert_eq!(rects, vec![Rect::new(88, 38, 10, 10), Rect::new(0, 0, 4, 4)]);
    }

    #[test]
    fn test_remove_requests_layout() {
        let h = Harness::new();
        let mut free = FreeLayout::new().child(Anchor::Center, at(0, 0), Spacer::new());
        h.place(&mut free, 0, 0);
        assert!(free.remove(0).is_some());
        assert!(free.is_empty());
        assert!(h.handle.needs_layout());
    }
}
