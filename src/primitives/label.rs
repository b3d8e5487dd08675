//! Label - a single run of text.

use crate::engine::{Node, SizeCtx, WidgetBase};
use crate::renderer::{FontSpec, TextElement, TextRun};
use crate::theme::Theme;
use crate::types::{Color, point, size};

/// A line of text measured through the surface.
///
/// Height is `ascent - descent`; the baseline sits `-descent` above the
/// bottom edge.
#[derive(Debug)]
pub struct Label {
    base: WidgetBase,
    text: String,
    bold: bool,
    italic: bool,
    font_name: Option<String>,
    font_size: Option<u32>,
    color: Option<Color>,
    path: &'static [&'static str],
    live: Option<TextElement>,
    descent: i32,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            base: WidgetBase::new(),
            text: text.into(),
            bold: false,
            italic: false,
            font_name: None,
            font_size: None,
            color: None,
            path: &[],
            live: None,
            descent: 0,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn font_name(mut self, name: impl Into<String>) -> Self {
        self.font_name = Some(name.into());
        self
    }

    pub fn font_size(mut self, size: u32) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Theme path the font and color are looked up under.
    pub fn component(mut self, path: &'static [&'static str]) -> Self {
        self.path = path;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text. Takes effect on the owner's next layout.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text == self.text {
            return;
        }
        self.text = text;
        self.delete();
        self.request_layout();
    }

    /// Recolor in place, or override the theme color for the next sizing.
    pub fn set_color(&mut self, color: Color) {
        self.color = Some(color);
        if let Some(live) = &mut self.live {
            live.set_color(color);
        }
    }

    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }

    fn font(&self, theme: &Theme) -> FontSpec {
        let mut font = theme.font(self.path);
        if let Some(name) = &self.font_name {
            font.name = name.clone();
        }
        if let Some(size) = self.font_size {
            font.size = size;
        }
        font.bold = self.bold;
        font.italic = self.italic;
        font
    }
}

impl Node for Label {
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
        if self.live.is_none() {
            let font = self.font(ctx.theme);
            let extent = ctx.measure(&self.text, &font);
            let color = self.color.unwrap_or_else(|| ctx.theme.text_color(self.path));
            let group = ctx.groups.text_group(&ctx.layers.foreground);
            let rect = self.base.rect;
            let run = TextRun {
                text: self.text.clone(),
                font,
                color,
                origin: point(rect.x, rect.y - extent.descent),
            };
            self.live = Some(TextElement::new(ctx.surface, &group, run));
            self.descent = extent.descent;
            self.base.set_size(size(extent.width, extent.height()));
        }
    }

    fn layout(&mut self, x: i32, y: i32) {
        self.base.set_position(x, y);
        if let Some(live) = &mut self.live {
            live.move_to(point(x, y - self.descent));
        }
    }

    fn delete(&mut self) {
        self.live = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;
    use crate::types::Rect;

    #[test]
    fn test_label_measures_through_surface() {
        let h = Harness::new();
        let mut label = Label::new("Hello");
        h.place(&mut label, 10, 20);
        // 5 glyphs at 12pt with half-size advance; ascent 12, descent -3.
        assert_eq!(label.rect(), Rect::new(10, 20, 30, 15));
        let origin = h.surface().texts().next().map(|run| run.origin);
        assert_eq!(origin, Some(point(10, 23)));
    }

    #[test]
    fn test_overrides_apply() {
        let h = Harness::new();
        let mut label = Label::new("ab").font_size(20).bold().color(Color::BLACK);
        h.place(&mut label, 0, 0);
        assert_eq!(label.rect().size(), size(20, 25));
        let run = h.surface().texts().next().cloned();
        assert!(run.as_ref().is_some_and(|r| r.font.bold && r.color == Color::BLACK));
    }

    #[test]
    fn test_scoped_text_color() {
        let h = Harness::new();
        let mut label = Label::new("Ok").component(&["button"]);
        h.place(&mut label, 0, 0);
        let color = h.surface().texts().next().map(|r| r.color);
        assert_eq!(color, Some(Color::BLACK));
    }

    #[test]
    fn test_set_text_regenerates_and_dirties() {
        let h = Harness::new();
        let mut label = Label::new("a");
        h.place(&mut label, 0, 0);
        label.set_text("abcd");
        assert!(!label.is_live());
        assert!(h.handle.needs_layout());

        h.place(&mut label, 0, 0);
        assert_eq!(label.rect().width, 24);
        assert_eq!(h.live(), 1);
    }

    #[test]
    fn test_layout_before_size_is_harmless() {
        let mut label = Label::new("x");
        label.layout(3, 4);
        assert_eq!(label.rect(), Rect::new(3, 4, 0, 0));
    }
}
