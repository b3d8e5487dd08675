//! Dropdown - one visible option, the rest in a popup menu.
//!
//! Releasing over the field opens a popup [`Dialog`] holding a framed,
//! scrollable [`Menu`]. Picking an option closes the popup; the choice is
//! applied to the dropdown on its next tick, inside its own dialog.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, warn};

use super::{Menu, TextCallback, skin_color};
use crate::dialog::{Dialog, DialogOptions};
use crate::engine::{Control, ControlState, DialogHandle, EventCtx, Node, SizeCtx, Value, WidgetBase};
use crate::error::{GuiError, Result};
use crate::event::{Capabilities, Event, Handled};
use crate::frame::Frame;
use crate::primitives::Label;
use crate::scroll::{Scrollable, ScrollableOptions};
use crate::theme::GraphicElement;
use crate::types::{Anchor, VAlign, point, size};

const PATH: &[&str] = &["dropdown"];
const PULLDOWN: &[&str] = &["dropdown", "pulldown"];

pub struct Dropdown {
    base: WidgetBase,
    state: ControlState,
    options: Vec<String>,
    selected: String,
    max_height: i32,
    align: VAlign,
    on_select: Option<TextCallback>,
    label: Label,
    field: Option<GraphicElement>,
    highlight: Option<GraphicElement>,
    popup: Option<DialogHandle>,
    pending: Rc<RefCell<Option<String>>>,
    suppress_release: bool,
}

impl std::fmt::Debug for Dropdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dropdown")
            .field("selected", &self.selected)
            .field("options", &self.options)
            .field("open", &self.is_open())
            .field("rect", &self.base.rect)
            .finish_non_exhaustive()
    }
}

fn display(option: &str) -> &str {
    option.strip_prefix('-').unwrap_or(option)
}

impl Dropdown {
    /// Options use the [`Menu`] convention: a leading `-` disables one.
    /// The first enabled option starts selected.
    pub fn new(options: impl IntoIterator<Item = impl Into<String>>) -> Result<Self> {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        let first = options
            .iter()
            .find(|o| !o.starts_with('-'))
            .or_else(|| options.first())
            .ok_or(GuiError::NoOptions)?;
        let selected = display(first).to_string();
        Ok(Self {
            base: WidgetBase::new(),
            state: ControlState::new(),
            label: Label::new(selected.clone()).component(PATH),
            selected,
            options,
            max_height: 400,
            align: VAlign::Bottom,
            on_select: None,
            field: None,
            highlight: None,
            popup: None,
            pending: Rc::new(RefCell::new(None)),
            suppress_release: false,
        })
    }

    /// Start with `text` shown; ignored when no option matches.
    pub fn selected(mut self, text: &str) -> Self {
        if self.options.iter().any(|o| display(o) == text) {
            self.selected = text.to_string();
            self.label = Label::new(text.to_string()).component(PATH);
        }
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.state.set_id(id);
        self
    }

    /// Tallest the popup grows before it scrolls.
    pub fn max_height(mut self, max_height: i32) -> Self {
        self.max_height = max_height;
        self
    }

    /// Side the popup opens on: `Top` above the field, anything else below.
    /// It flips when the window has no room on that side.
    pub fn align(mut self, align: VAlign) -> Self {
        self.align = align;
        self
    }

    pub fn on_select(mut self, callback: impl FnMut(&str, &mut EventCtx<'_>) + 'static) -> Self {
        self.on_select = Some(Box::new(callback));
        self
    }

    pub fn get_selected(&self) -> &str {
        &self.selected
    }

    pub fn is_open(&self) -> bool {
        self.popup.as_ref().is_some_and(|p| !p.is_closed())
    }

    /// The open popup's handle.
    pub fn popup(&self) -> Option<&DialogHandle> {
        self.popup.as_ref().filter(|p| !p.is_closed())
    }

    fn close_popup(&mut self) {
        if let Some(popup) = self.popup.take()
            && popup.close()
        {
            debug!("dropdown popup closed");
        }
    }

    fn open_popup(&mut self, ctx: &mut EventCtx<'_>) {
        let pending = self.pending.clone();
        let owner = ctx.link().clone();
        let menu = Menu::new(self.options.iter().cloned())
            .with_selected(&self.selected)
            .on_select(move |text, ctx| {
                *pending.borrow_mut() = Some(text.to_string());
                owner.request_layout();
                ctx.close_dialog();
            });
        let options = ScrollableOptions { max_height: Some(self.max_height), ..Default::default() };
        let scroll = match Scrollable::new(menu, options) {
            Ok(scroll) => scroll,
            Err(err) => {
                warn!(%err, "dropdown popup not opened");
                return;
            }
        };
        let content = Frame::new(scroll).path(PULLDOWN);

        let rect = self.base.rect;
        let window = ctx.window();
        let mut popup = Dialog::new(
            ctx.gui(),
            content,
            DialogOptions {
                anchor: Anchor::TopLeft,
                offset: point(rect.x, rect.y - window.height),
                movable: false,
                close_on_outside_press: true,
                on_escape: Some(Box::new(|dialog: &mut Dialog| dialog.close())),
                ..Default::default()
            },
        );

        let height = popup.rect().height;
        let fits_below = rect.y - height >= 0;
        let fits_above = rect.top() + height <= window.height;
        let above = match self.align {
            VAlign::Top => fits_above || !fits_below,
            VAlign::Center | VAlign::Bottom => !fits_below && fits_above,
        };
        if above {
            popup.set_anchor(Anchor::BottomLeft);
            popup.set_offset(point(rect.x, rect.top()));
            popup.do_layout();
        }
        debug!(above, rect = ?popup.rect(), "dropdown popup opened");
        self.popup = Some(ctx.open_popup(popup));
    }

    fn apply_pending(&mut self, ctx: &mut EventCtx<'_>) {
        let Some(text) = self.pending.borrow_mut().take() else {
            return;
        };
        if text != self.selected {
            self.label.set_text(text.clone());
            self.selected = text;
            ctx.request_layout();
        }
        debug!(selected = %self.selected, "dropdown selection");
        if let Some(callback) = &mut self.on_select {
            callback(&self.selected, ctx);
        }
    }
}

impl Node for Dropdown {
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
        let disabled = self.state.is_disabled();
        if self.field.is_none() {
            let color = skin_color(ctx.theme, PATH, disabled);
            self.field = Some(ctx.image(PATH, "image", color, &ctx.layers.background));
        }
        if self.state.is_highlight() && !disabled {
            if self.highlight.is_none() {
                let color = ctx.theme.highlight_color(PATH);
                self.highlight = Some(ctx.image(PATH, "image-highlight", color, &ctx.layers.highlight));
            }
        } else {
            self.highlight = None;
        }
        self.label.size(Some(ctx));

        let font = ctx.theme.font(PATH);
        let widest = self.options.iter().map(|o| ctx.measure(display(o), &font).width).max().unwrap_or(0);
        let text = size(widest.max(self.label.rect().width), self.label.rect().height);
        let dims = self.field.as_ref().map_or(text, |field| field.needed_size(text));
        self.base.set_size(dims);
    }

    fn layout(&mut self, x: i32, y: i32) {
        self.base.set_position(x, y);
        let rect = self.base.rect;
        for graphic in [&mut self.field, &mut self.highlight].into_iter().flatten() {
            graphic.update(rect);
        }
        let region = self.field.as_ref().map_or(rect, GraphicElement::content_region);
        let text = self.label.rect().size();
        self.label.layout(region.x, region.y + (region.height - text.height) / 2);
    }

    fn delete(&mut self) {
        self.field = None;
        self.highlight = None;
        self.label.delete();
        self.close_popup();
    }

    fn teardown(&mut self) {
        self.delete();
        self.on_select = None;
    }

    crate::leaf_control!();
}

impl Control for Dropdown {
    fn state(&self) -> &ControlState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ControlState {
        &mut self.state
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::PRESS | Capabilities::HIGHLIGHT | Capabilities::TICK
    }

    fn handle(&mut self, event: &Event, ctx: &mut EventCtx<'_>) -> Handled {
        match event {
            Event::HighlightGained | Event::HighlightLost => {
                ctx.request_layout();
                Handled::Yes
            }
            Event::Tick { .. } => {
                self.apply_pending(ctx);
                if self.popup.as_ref().is_some_and(DialogHandle::is_closed) {
                    self.popup = None;
                }
                Handled::Yes
            }
            _ if self.is_disabled() => Handled::No,
            Event::PointerDown { .. } => {
                // the same press that closed the popup from outside
                self.suppress_release = self.popup.as_ref().is_some_and(DialogHandle::is_closed);
                if self.suppress_release {
                    self.popup = None;
                }
                Handled::Yes
            }
            Event::PointerUp { x, y, .. } => {
                if std::mem::take(&mut self.suppress_release) {
                    return Handled::Yes;
                }
                if self.is_open() {
                    self.close_popup();
                } else if self.hit_test(*x, *y) {
                    self.open_popup(ctx);
                }
                Handled::Yes
            }
            _ => Handled::No,
        }
    }

    fn is_input(&self) -> bool {
        true
    }

    fn value(&self) -> Option<Value> {
        Some(Value::Choice(Some(self.selected.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Key;
    use crate::testing::Harness;
    use crate::types::Rect;

    fn setup(x: i32, y: i32) -> (Harness, Dropdown, Rc<RefCell<Vec<String>>>) {
        let h = Harness::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut dropdown = Dropdown::new(["Red", "Green", "Blue"])
            .unwrap()
            .on_select(move |text, _| sink.borrow_mut().push(text.to_string()));
        h.place(&mut dropdown, x, y);
        (h, dropdown, seen)
    }

    fn click(h: &mut Harness, dropdown: &mut Dropdown) {
        let (x, y) = (dropdown.rect().x + 5, dropdown.rect().y + 5);
        dropdown.handle(&Event::press(x, y), &mut h.ctx());
        dropdown.handle(&Event::release(x, y), &mut h.ctx());
    }

    #[test]
    fn test_requires_options() {
        let none: [&str; 0] = [];
        assert_eq!(Dropdown::new(none).err(), Some(GuiError::NoOptions));
        let dropdown = Dropdown::new(["-Off", "On"]).unwrap();
        assert_eq!(dropdown.get_selected(), "On");
        assert_eq!(dropdown.selected("Off").get_selected(), "Off");
    }

    #[test]
    fn test_field_fits_widest_option() {
        let (_h, dropdown, _) = setup(100, 300);
        // "Green" is 30px wide; field padding 6/6/4/4
        assert_eq!(dropdown.rect(), Rect::new(100, 300, 42, 23));
        assert_eq!(dropdown.value(), Some(Value::Choice(Some("Red".into()))));
    }

    #[test]
    fn test_popup_opens_below() {
        let (mut h, mut dropdown, _) = setup(100, 300);
        click(&mut h, &mut dropdown);
        assert!(dropdown.is_open());
        assert_eq!(h.popups.len(), 1);
        // menu 38x61 inside a 2px pulldown frame
        assert_eq!(h.popups[0].rect(), Rect::new(100, 235, 42, 65));
    }

    #[test]
    fn test_popup_flips_above_without_room() {
        let (mut h, mut dropdown, _) = setup(100, 20);
        click(&mut h, &mut dropdown);
        assert_eq!(h.popups[0].rect(), Rect::new(100, 43, 42, 65));
    }

    #[test]
    fn test_choice_applies_on_tick() {
        let (mut h, mut dropdown, seen) = setup(100, 300);
        click(&mut h, &mut dropdown);
        let popup = &mut h.popups[0];
        popup.handle_event(&Event::press(120, 265));
        popup.handle_event(&Event::release(120, 265));
        assert!(popup.is_closed());
        assert_eq!(dropdown.get_selected(), "Red");

        assert!(h.handle.take_needs_layout());
        dropdown.handle(&Event::Tick { dt: 0.016 }, &mut h.ctx());
        assert_eq!(dropdown.get_selected(), "Green");
        assert_eq!(*seen.borrow(), vec!["Green".to_string()]);
        assert!(!dropdown.is_open());
    }

    #[test]
    fn test_escape_and_second_click_close() {
        let (mut h, mut dropdown, _) = setup(100, 300);
        click(&mut h, &mut dropdown);
        h.popups[0].handle_event(&Event::key(Key::Escape));
        assert!(!dropdown.is_open());
        dropdown.handle(&Event::Tick { dt: 0.016 }, &mut h.ctx());
        assert!(dropdown.popup().is_none());

        click(&mut h, &mut dropdown);
        assert_eq!(h.popups.len(), 2);
        click(&mut h, &mut dropdown);
        assert!(!dropdown.is_open());
        assert!(h.popups[1].is_closed());
    }

    #[test]
    fn test_outside_press_does_not_reopen() {
        let (mut h, mut dropdown, _) = setup(100, 300);
        click(&mut h, &mut dropdown);
        assert_eq!(h.popups[0].handle_event(&Event::press(105, 305)), Handled::No);
        assert!(h.popups[0].is_closed());

        click(&mut h, &mut dropdown);
        assert_eq!(h.popups.len(), 1);
        assert!(!dropdown.is_open());
    }

    #[test]
    fn test_delete_closes_popup() {
        let (mut h, mut dropdown, _) = setup(100, 300);
        click(&mut h, &mut dropdown);
        dropdown.delete();
        assert!(h.popups[0].is_closed());
    }
}
