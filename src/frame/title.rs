//! Title frames and section headers, composed from layouts and frames.

use crate::engine::{Node, SizeCtx, WidgetBase};
use crate::layout::{HorizontalLayout, VerticalLayout};
use crate::primitives::{Graphic, Label};
use crate::types::{HAlign, VAlign};

use super::Frame;

/// Implements `Node` by forwarding to a wrapped layout.
macro_rules! forward_node {
    ($ty:ty, $field:tt) => {
        impl Node for $ty {
            fn base(&self) -> &WidgetBase {
                self.$field.base()
            }

            fn size(&mut self, ctx: Option<&SizeCtx<'_>>) {
                self.$field.size(ctx);
            }

            fn layout(&mut self, x: i32, y: i32) {
                self.$field.layout(x, y);
            }

            fn delete(&mut self) {
                self.$field.delete();
            }

            fn teardown(&mut self) {
                self.$field.teardown();
            }

            fn is_expandable(&self) -> bool {
                self.$field.is_expandable()
            }

            fn expand(&mut self, width: i32, height: i32) {
                self.$field.expand(width, height);
            }

            fn children(&self) -> Vec<&dyn Node> {
                self.$field.children()
            }

            fn children_mut(&mut self) -> Vec<&mut dyn Node> {
                self.$field.children_mut()
            }
        }
    };
}

/// Which side rules of a header grow for an alignment.
pub(crate) fn rule_expansion(align: HAlign) -> (bool, bool) {
    match align {
        HAlign::Left => (false, true),
        HAlign::Center => (true, true),
        HAlign::Right => (true, false),
    }
}

/// The three-piece bar used by section headers: rule, framed middle, rule.
pub(crate) fn section_bar(middle: impl Node, align: HAlign) -> HorizontalLayout {
    let (left, right) = rule_expansion(align);
    HorizontalLayout::new()
        .align(VAlign::Bottom)
        .padding(0)
        .child(Graphic::new(&["section", "left"], "image").expandable(left))
        .child(Frame::new(middle).path(&["section", "center"]).use_bg_group(true))
        .child(Graphic::new(&["section", "right"], "image").expandable(right))
}

// =============================================================================
// TitleFrame
// =============================================================================

/// A frame with a title bar across the top.
///
/// ```text
/// [left rule][ title ][right rule]
/// [          content            ]
/// ```
pub struct TitleFrame(VerticalLayout);

impl TitleFrame {
    pub fn new(title: impl Into<String>, content: impl Node) -> Self {
        let bar = HorizontalLayout::new()
            .align(VAlign::Bottom)
            .padding(0)
            .child(Graphic::new(&["titlebar", "left"], "image").expandable(true))
            .child(Frame::new(Label::new(title).component(&["titlebar"])).path(&["titlebar", "center"]))
            .child(Graphic::new(&["titlebar", "right"], "image").expandable(true));
        let body = Frame::new(content).path(&["titlebar", "frame"]).expandable(true);
        Self(VerticalLayout::new().padding(0).child(bar).child(body))
    }
}

forward_node!(TitleFrame, 0);

// =============================================================================
// SectionHeader
// =============================================================================

/// A captioned horizontal rule. The alignment decides which side of the
/// caption stretches.
pub struct SectionHeader(HorizontalLayout);

impl SectionHeader {
    pub fn new(title: impl Into<String>) -> Self {
        Self::aligned(title, HAlign::Center)
    }

    pub fn aligned(title: impl Into<String>, align: HAlign) -> Self {
        Self(section_bar(Label::new(title).component(&["section"]), align))
    }
}

forward_node!(SectionHeader, 0);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Spacer;
    use crate::testing::Harness;
    use crate::types::size;

    #[test]
    fn test_title_bar_spans_content() {
        let h = Harness::new();
        let mut frame = TitleFrame::new("Title", Spacer::min(120, 40));
        h.place(&mut frame, 0, 0);

        let children = frame.children();
        let (bar, body) = (children[0].rect(), children[1].rect());
        assert_eq!(body.size(), size(132, 52));
        assert_eq!(bar.width, body.width);
        assert_eq!(bar.y, body.top());
        assert_eq!(frame.rect().height, bar.height + body.height);
    }

    #[test]
    fn test_section_rule_growth_follows_alignment() {
        assert_eq!(rule_expansion(HAlign::Left), (false, true));
        assert_eq!(rule_expansion(HAlign::Center), (true, true));
        assert_eq!(rule_expansion(HAlign::Right), (true, false));

        let h = Harness::new();
        let mut header = SectionHeader::aligned("Options", HAlign::Left);
        header.size(Some(&h.size_ctx()));
        header.expand(200, header.rect().height);
        header.layout(0, 0);
        let rects: Vec<_> = header.children().iter().map(|c| c.rect()).collect();
        assert_eq!(rects[0].width, 8);
        assert_eq!(rects[2].right(), 200);
    }

    #[test]
    fn test_header_frame_draws_in_background() {
        let h = Harness::new();
        let mut header = SectionHeader::new("A");
        h.place(&mut header, 0, 0);
        // two rules, the middle frame and the caption
        assert_eq!(h.live(), 4);
    }
}
