//! FoldingSection - a section header that shows or hides a body.

use tracing::debug;

use crate::engine::{
    Control, ControlEntry, ControlId, ControlState, EventCtx, Node, SizeCtx, Values, WidgetBase, downcast_mut,
};
use crate::event::{Capabilities, Event, Handled};
use crate::layout::{HorizontalLayout, VerticalLayout};
use crate::primitives::{Graphic, Label};
use crate::types::{HAlign, Rect};

use super::Frame;
use super::title::rule_expansion;

const OPENED: &[&str] = &["section", "opened"];
const CLOSED: &[&str] = &["section", "closed"];

/// A clickable header above an optional body.
///
/// Only the header answers to the pointer, whether or not the body is
/// showing. Pressing it toggles the body in and out of the section's
/// layout and swaps the open/closed icon.
pub struct FoldingSection {
    state: ControlState,
    layout: VerticalLayout,
    /// The body while folded away; `None` while it sits in `layout`.
    stowed: Option<Box<dyn Node>>,
    is_open: bool,
}

impl FoldingSection {
    pub fn new(title: impl Into<String>, body: impl Node) -> Self {
        Self::with_options(title, Box::new(body), true, HAlign::Center)
    }

    /// Start folded or unfolded, with the header rules grown for `align`.
    pub fn with_options(title: impl Into<String>, body: Box<dyn Node>, is_open: bool, align: HAlign) -> Self {
        let (left, right) = rule_expansion(align);
        let caption = HorizontalLayout::new()
            .child(Graphic::new(if is_open { OPENED } else { CLOSED }, "image"))
            .child(Label::new(title).component(&["section"]));
        let header = HorizontalLayout::new()
            .align(crate::types::VAlign::Bottom)
            .padding(0)
            .child(Graphic::new(&["section", "left"], "image").expandable(left))
            .child(Frame::new(caption).path(&["section", "center"]).use_bg_group(true))
            .child(Graphic::new(&["section", "right"], "image").expandable(right));

        let mut layout = VerticalLayout::new().align(align).child(header);
        let stowed = if is_open {
            layout = layout.boxed(body);
            None
        } else {
            Some(body)
        };
        Self { state: ControlState::new(), layout, stowed, is_open }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    fn header_rect(&self) -> Rect {
        self.layout.get(0).map(|h| h.rect()).unwrap_or_default()
    }

    /// The open/closed icon, four levels down the header.
    fn book_mut(&mut self) -> Option<&mut Graphic> {
        let header = downcast_mut::<HorizontalLayout>(self.layout.get_mut(0)?)?;
        let frame = downcast_mut::<Frame>(header.get_mut(1)?)?;
        let caption = downcast_mut::<HorizontalLayout>(frame.content_mut())?;
        downcast_mut::<Graphic>(caption.get_mut(0)?)
    }

    /// Show or hide the body.
    pub fn set_open(&mut self, open: bool) {
        if open == self.is_open {
            return;
        }
        self.is_open = open;
        if let Some(book) = self.book_mut() {
            book.set_path(if open { OPENED } else { CLOSED });
        }
        if open {
            if let Some(body) = self.stowed.take() {
                self.layout.add(body);
            }
        } else {
            self.stowed = self.layout.remove(1);
        }
        debug!(open, "folding section toggled");
    }

    pub fn toggle(&mut self) {
        self.set_open(!self.is_open);
    }
}

impl Node for FoldingSection {
    fn base(&self) -> &WidgetBase {
        self.layout.base()
    }

    fn size(&mut self, ctx: Option<&SizeCtx<'_>>) {
        self.layout.size(ctx);
    }

    fn layout(&mut self, x: i32, y: i32) {
        self.layout.layout(x, y);
    }

    fn delete(&mut self) {
        self.layout.delete();
    }

    fn teardown(&mut self) {
        if let Some(mut body) = self.stowed.take() {
            body.teardown();
        }
        self.layout.teardown();
    }

    fn is_expandable(&self) -> bool {
        self.layout.is_expandable()
    }

    fn expand(&mut self, width: i32, height: i32) {
        self.layout.expand(width, height);
    }

    fn hit_test(&self, x: i32, y: i32) -> bool {
        self.header_rect().contains(x, y)
    }

    fn children(&self) -> Vec<&dyn Node> {
        self.layout.children()
    }

    fn children_mut(&mut self) -> Vec<&mut dyn Node> {
        self.layout.children_mut()
    }

    fn collect_controls(&self, out: &mut Vec<ControlEntry>) {
        self.layout.collect_controls(out);
        out.push(ControlEntry::new(self.control_id(), self.header_rect()));
    }

    fn find_control(&mut self, id: ControlId) -> Option<&mut dyn Control> {
        if self.control_id() == id {
            return Some(self);
        }
        self.layout.find_control(id)
    }

    fn find_by_id(&mut self, id: &str) -> Option<&mut dyn Control> {
        if self.state.id() == Some(id) {
            return Some(self);
        }
        self.layout.find_by_id(id)
    }

    fn collect_values(&self, out: &mut Values) {
        self.layout.collect_values(out);
    }
}

impl Control for FoldingSection {
    fn state(&self) -> &ControlState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ControlState {
        &mut self.state
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::PRESS
    }

    fn handle(&mut self, event: &Event, ctx: &mut EventCtx<'_>) -> Handled {
        match event {
            Event::PointerDown { .. } => {
                self.toggle();
                ctx.request_layout();
                Handled::Yes
            }
            _ => Handled::No,
        }
    }
}
