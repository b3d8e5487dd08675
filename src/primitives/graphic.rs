//! Graphic - a single themed image, e.g. part of a title bar.

use crate::engine::{Node, SizeCtx, WidgetBase};
use crate::theme::GraphicElement;
use crate::types::{Rect, size};

/// A theme image at `path`/`key`, drawn in the foreground layer.
#[derive(Debug)]
pub struct Graphic {
    base: WidgetBase,
    path: &'static [&'static str],
    key: &'static str,
    expandable: bool,
    graphic: Option<GraphicElement>,
    min_width: i32,
    min_height: i32,
}

impl Graphic {
    pub fn new(path: &'static [&'static str], key: &'static str) -> Self {
        Self {
            base: WidgetBase::new(),
            path,
            key,
            expandable: false,
            graphic: None,
            min_width: 0,
            min_height: 0,
        }
    }

    /// Let the graphic stretch into slack space.
    pub fn expandable(mut self, expandable: bool) -> Self {
        self.expandable = expandable;
        self
    }

    /// Switch to the image under another theme path. The new image is
    /// generated on the next size pass.
    pub fn set_path(&mut self, path: &'static [&'static str]) {
        if path == self.path {
            return;
        }
        self.delete();
        self.path = path;
        self.base.request_layout();
    }

    pub fn path(&self) -> &'static [&'static str] {
        self.path
    }

    pub fn graphic(&self) -> Option<&GraphicElement> {
        self.graphic.as_ref()
    }
}

impl Node for Graphic {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn size(&mut self, ctx: Option<&SizeCtx<'_>>) {
        let Some(ctx) = ctx else {
            return;
        };
        if self.base.attach(ctx.link) {
            self.delete();
        }
        if self.graphic.is_none() {
            let color = ctx.theme.gui_color(self.path);
            let graphic = ctx.image(self.path, self.key, color, &ctx.layers.foreground);
            self.min_width = graphic.width();
            self.min_height = graphic.height();
            self.graphic = Some(graphic);
        }
        self.base.set_size(size(self.min_width, self.min_height));
    }

    fn layout(&mut self, x: i32, y: i32) {
        self.base.set_position(x, y);
        if let Some(graphic) = &mut self.graphic {
            graphic.update(self.base.rect);
        }
    }

    fn delete(&mut self) {
        self.graphic = None;
    }

    fn is_expandable(&self) -> bool {
        self.expandable
    }

    fn expand(&mut self, width: i32, height: i32) {
        if !self.expandable {
            return;
        }
        self.base.set_size(size(width, height));
        if let Some(graphic) = &mut self.graphic {
            let Rect { x, y, .. } = self.base.rect;
            graphic.update(Rect::new(x, y, width, height));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;

    #[test]
    fn test_graphic_takes_natural_size() {
        let h = Harness::new();
        let mut graphic = Graphic::new(&["section", "opened"], "image");
        h.place(&mut graphic, 10, 20);
        assert_eq!(graphic.rect(), Rect::new(10, 20, 8, 8));
        assert_eq!(h.live(), 1);
    }

    #[test]
    fn test_delete_then_size_reallocates_once() {
        let h = Harness::new();
        let mut graphic = Graphic::new(&["frame"], "image").expandable(true);
        h.place(&mut graphic, 0, 0);
        graphic.size(Some(&h.size_ctx()));
        assert_eq!(h.live(), 1);

        graphic.delete();
        assert_eq!(h.live(), 0);
        h.place(&mut graphic, 0, 0);
        assert_eq!(h.live(), 1);
        assert_eq!(graphic.rect().size(), size(16, 16));

        graphic.expand(40, 30);
        assert_eq!(graphic.graphic().map(|g| g.rect()), Some(Rect::new(0, 0, 40, 30)));
    }

    #[test]
    fn test_missing_image_is_placeholder() {
        let h = Harness::new();
        let mut graphic = Graphic::new(&["nowhere"], "image");
        h.place(&mut graphic, 0, 0);
        assert!(graphic.graphic().is_some_and(|g| g.template().is_placeholder()));
    }
}
