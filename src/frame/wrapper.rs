//! Wrapper - holds at most one child and places it by anchor.

use crate::engine::{Node, SizeCtx, WidgetBase};
use crate::types::{Anchor, Point, point, relative_point, size};

/// Wraps one node snugly. With `expandable(true)` it grows into slack and
/// positions the content inside by anchor and offset.
pub struct Wrapper {
    base: WidgetBase,
    content: Option<Box<dyn Node>>,
    expandable: bool,
    anchor: Anchor,
    offset: Point,
}

impl Default for Wrapper {
    fn default() -> Self {
        Self {
            base: WidgetBase::new(),
            content: None,
            expandable: false,
            anchor: Anchor::Center,
            offset: point(0, 0),
        }
    }
}

impl Wrapper {
    pub fn new(content: impl Node) -> Self {
        Self { content: Some(Box::new(content)), ..Self::default() }
    }

    /// A wrapper with nothing inside yet.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn expandable(mut self, expandable: bool) -> Self {
        self.expandable = expandable;
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn offset(mut self, offset: Point) -> Self {
        self.offset = offset;
        self
    }

    pub fn content(&self) -> Option<&dyn Node> {
        self.content.as_deref()
    }

    pub fn content_mut(&mut self) -> Option<&mut dyn Node> {
        match &mut self.content {
            Some(content) => Some(&mut **content),
            None => None,
        }
    }

    /// Swap the content. The old content's graphics are released and the
    /// owner re-lays out.
    pub fn set(&mut self, content: Option<Box<dyn Node>>) -> Option<Box<dyn Node>> {
        let mut old = std::mem::replace(&mut self.content, content);
        if let Some(old) = old.as_mut() {
            old.delete();
        }
        self.base.request_layout();
        old
    }
}

impl Node for Wrapper {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn size(&mut self, ctx: Option<&SizeCtx<'_>>) {
        let Some(ctx) = ctx else {
            return;
        };
        self.base.attach(ctx.link);
        let natural = match &mut self.content {
            Some(content) => {
                content.size(Some(ctx));
                content.rect().size()
            }
            None => size(0, 0),
        };
        self.base.set_size(natural);
    }

    fn layout(&mut self, x: i32, y: i32) {
        self.base.set_position(x, y);
        let rect = self.base.rect;
        if let Some(content) = &mut self.content {
            let at = relative_point(&rect, self.anchor, content.rect().size(), None, self.offset);
            content.layout(at.x, at.y);
        }
    }

    fn delete(&mut self) {
        if let Some(content) = &mut self.content {
            content.delete();
        }
    }

    fn teardown(&mut self) {
        if let Some(mut content) = self.content.take() {
            content.teardown();
        }
    }

    fn is_expandable(&self) -> bool {
        self.expandable
    }

    fn expand(&mut self, width: i32, height: i32) {
        if let Some(content) = &mut self.content
            && content.is_expandable()
        {
            content.expand(width, height);
        }
        self.base.set_size(size(width, height));
    }

    fn children(&self) -> Vec<&dyn Node> {
        self.content.iter().map(|c| &**c as &dyn Node).collect()
    }

    fn children_mut(&mut self) -> Vec<&mut dyn Node> {
        self.content.iter_mut().map(|c| &mut **c as &mut dyn Node).collect()
    }
}
