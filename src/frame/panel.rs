//! Frame - a stretchable themed panel around one child.

use tracing::trace;

use crate::engine::{Node, SizeCtx, WidgetBase};
use crate::theme::GraphicElement;
use crate::types::{Anchor, Point, point, relative_point, size};

/// Draws the theme image at `path`/`image` behind its content and sizes
/// itself to fit the content plus the image's padding.
///
/// The content is anchored inside the image's interior region, which can be
/// larger than the content when the artwork has a minimum size.
pub struct Frame {
    base: WidgetBase,
    content: Box<dyn Node>,
    path: &'static [&'static str],
    image: &'static str,
    expandable: bool,
    anchor: Anchor,
    offset: Point,
    use_bg_group: bool,
    frame: Option<GraphicElement>,
}

impl Frame {
    pub fn new(content: impl Node) -> Self {
        Self::boxed(Box::new(content))
    }

    pub fn boxed(content: Box<dyn Node>) -> Self {
        Self {
            base: WidgetBase::new(),
            content,
            path: &["frame"],
            image: "image",
            expandable: false,
            anchor: Anchor::Center,
            offset: point(0, 0),
            use_bg_group: false,
            frame: None,
        }
    }

    /// Theme path the image and its color come from.
    pub fn path(mut self, path: &'static [&'static str]) -> Self {
        self.path = path;
        self
    }

    /// Image key under the theme path.
    pub fn image(mut self, image: &'static str) -> Self {
        self.image = image;
        self
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

    /// Draw in the background layer instead of the panel layer.
    pub fn use_bg_group(mut self, on: bool) -> Self {
        self.use_bg_group = on;
        self
    }

    pub fn content(&self) -> &dyn Node {
        &*self.content
    }

    pub fn content_mut(&mut self) -> &mut dyn Node {
        &mut *self.content
    }

    pub fn graphic(&self) -> Option<&GraphicElement> {
        self.frame.as_ref()
    }

    /// Replace the content, releasing the old one's graphics.
    pub fn set(&mut self, content: Box<dyn Node>) -> Box<dyn Node> {
        let mut old = std::mem::replace(&mut self.content, content);
        old.delete();
        self.base.request_layout();
        old
    }
}

impl Node for Frame {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn size(&mut self, ctx: Option<&SizeCtx<'_>>) {
        let Some(ctx) = ctx else {
            return;
        };
        if self.base.attach(ctx.link) {
            self.frame = None;
        }
        self.content.size(Some(ctx));
        let frame = self.frame.get_or_insert_with(|| {
            let group = if self.use_bg_group { &ctx.layers.background } else { &ctx.layers.panel };
            ctx.image(self.path, self.image, ctx.theme.gui_color(self.path), group)
        });
        let needed = frame.needed_size(self.content.rect().size());
        self.base.set_size(needed);
        trace!(path = ?self.path, width = needed.width, height = needed.height, "frame size");
    }

    fn layout(&mut self, x: i32, y: i32) {
        self.base.set_position(x, y);
        let Some(frame) = &mut self.frame else {
            return;
        };
        frame.update(self.base.rect);
        let interior = frame.content_region();
        let at = relative_point(&interior, self.anchor, self.content.rect().size(), None, self.offset);
        self.content.layout(at.x, at.y);
    }

    fn delete(&mut self) {
        self.frame = None;
        self.content.delete();
    }

    fn teardown(&mut self) {
        self.frame = None;
        self.content.teardown();
    }

    fn is_expandable(&self) -> bool {
        self.expandable
    }

    fn expand(&mut self, width: i32, height: i32) {
        if self.content.is_expandable()
            && let Some(frame) = &self.frame
        {
            let inner = frame.content_size(size(width, height));
            self.content.expand(inner.width, inner.height);
        }
        self.base.set_size(size(width, height));
    }

    fn children(&self) -> Vec<&dyn Node> {
        vec![&*self.content]
    }

    fn children_mut(&mut self) -> Vec<&mut dyn Node> {
        vec![&mut *self.content]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{Label, Spacer};
    use crate::testing::Harness;
    use crate::types::Rect;

    #[test]
    fn test_needed_size_adds_padding() {
        let h = Harness::new();
        let mut frame = Frame::new(Spacer::min(30, 20));
        h.place(&mut frame, 0, 0);
        // flat frame pads 6 on every side
        assert_eq!(frame.rect(), Rect::new(0, 0, 42, 32));
        assert_eq!(frame.content().rect(), Rect::new(6, 6, 30, 20));
    }

    #[test]
    fn test_small_content_centered_in_artwork() {
        let h = Harness::new();
        let mut frame = Frame::new(Spacer::min(2, 2));
        h.place(&mut frame, 0, 0);
        assert_eq!(frame.rect().size(), size(16, 16));
        assert_eq!(frame.content().rect(), Rect::new(7, 7, 2, 2));
    }

    #[test]
    fn test_expand_passes_interior_to_content() {
        let h = Harness::new();
        let mut frame = Frame::new(Spacer::new()).expandable(true);
        frame.size(Some(&h.size_ctx()));
        frame.expand(100, 50);
        frame.layout(0, 0);
        assert_eq!(frame.content().rect(), Rect::new(6, 6, 88, 38));
    }

    #[test]
    fn test_background_layer_and_release() {
        let h = Harness::new();
        let mut frame = Frame::new(Label::new("hi")).use_bg_group(true);
        h.place(&mut frame, 0, 0);
        let id = frame.graphic().and_then(|g| g.mesh_id());
        let group = id.and_then(|id| h.surface().get(id).map(|a| a.group().clone()));
        assert!(group.is_some_and(|g| std::rc::Rc::ptr_eq(&g, &h.layers.background)));

        frame.delete();
        assert_eq!(h.live(), 0);
        h.place(&mut frame, 0, 0);
        assert_eq!(h.live(), 2);
    }
}
