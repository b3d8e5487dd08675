//! Checkbox - a captioned two-state toggle.

use tracing::debug;

use super::{ToggleCallback, skin_color};
use crate::engine::{Control, ControlState, EventCtx, Node, SizeCtx, Value, WidgetBase};
use crate::event::{Capabilities, Event, Handled};
use crate::primitives::Label;
use crate::theme::GraphicElement;
use crate::types::{HAlign, Rect, size};

const PATH: &[&str] = &["checkbox"];

/// A box and a caption. The caption sits right of the box unless aligned
/// [`HAlign::Left`].
pub struct Checkbox {
    base: WidgetBase,
    state: ControlState,
    on_click: Option<ToggleCallback>,
    is_checked: bool,
    align: HAlign,
    padding: Option<i32>,
    label: Label,
    check: Option<GraphicElement>,
    highlight: Option<GraphicElement>,
}

impl std::fmt::Debug for Checkbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Checkbox")
            .field("text", &self.label.text())
            .field("checked", &self.is_checked)
            .field("rect", &self.base.rect)
            .finish_non_exhaustive()
    }
}

impl Checkbox {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            base: WidgetBase::new(),
            state: ControlState::new(),
            on_click: None,
            is_checked: false,
            align: HAlign::Right,
            padding: None,
            label: Label::new(text).component(PATH),
            check: None,
            highlight: None,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.state.set_id(id);
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.is_checked = checked;
        self
    }

    /// Side the caption goes on. `Center` is treated as `Right`.
    pub fn align(mut self, align: HAlign) -> Self {
        self.align = align;
        self
    }

    /// Gap between box and caption; the theme's `padding` otherwise.
    pub fn padding(mut self, padding: i32) -> Self {
        self.padding = Some(padding);
        self
    }

    pub fn on_click(mut self, callback: impl FnMut(bool, &mut EventCtx<'_>) + 'static) -> Self {
        self.on_click = Some(Box::new(callback));
        self
    }

    pub fn is_checked(&self) -> bool {
        self.is_checked
    }

    /// Change the state without firing `on_click`.
    pub fn set_checked(&mut self, checked: bool) {
        if checked != self.is_checked {
            self.is_checked = checked;
            self.check = None;
            self.base.request_layout();
        }
    }

    fn gap(&self) -> i32 {
        self.padding.unwrap_or(0)
    }
}

impl Node for Checkbox {
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
        if self.padding.is_none() {
            self.padding = Some(ctx.theme.number(PATH, "padding"));
        }
        let disabled = self.state.is_disabled();
        if self.check.is_none() {
            let key = if self.is_checked { "image-checked" } else { "image-unchecked" };
            let color = skin_color(ctx.theme, PATH, disabled);
            self.check = Some(ctx.image(PATH, key, color, &ctx.layers.background));
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

        let text = self.label.rect().size();
        let check = self.check.as_ref().map_or(size(0, 0), GraphicElement::natural_size);
        self.base.set_size(size(
            check.width + self.gap() + text.width,
            check.height.max(text.height),
        ));
    }

    fn layout(&mut self, x: i32, y: i32) {
        self.base.set_position(x, y);
        let height = self.base.rect.height;
        let check = self.check.as_ref().map_or(size(0, 0), GraphicElement::natural_size);
        let text = self.label.rect().size();

        let (check_x, label_x) = match self.align {
            HAlign::Left => (x + text.width + self.gap(), x),
            HAlign::Center | HAlign::Right => (x, x + check.width + self.gap()),
        };
        let check_rect = Rect::new(check_x, y + (height - check.height) / 2, check.width, check.height);
        for graphic in [&mut self.check, &mut self.highlight].into_iter().flatten() {
            graphic.update(check_rect);
        }
        self.label.layout(label_x, y + (height - text.height) / 2);
    }

    fn delete(&mut self) {
        self.check = None;
        self.highlight = None;
        self.label.delete();
    }

    fn teardown(&mut self) {
        self.delete();
        self.on_click = None;
    }

    crate::leaf_control!();
}

impl Control for Checkbox {
    fn state(&self) -> &ControlState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ControlState {
        &mut self.state
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::PRESS | Capabilities::HIGHLIGHT
    }

    fn handle(&mut self, event: &Event, ctx: &mut EventCtx<'_>) -> Handled {
        match event {
            Event::HighlightGained | Event::HighlightLost => {
                ctx.request_layout();
                Handled::Yes
            }
            Event::PointerDown { .. } => Handled::from(!self.is_disabled()),
            Event::PointerUp { x, y, .. } if !self.is_disabled() => {
                if !self.hit_test(*x, *y) {
                    return Handled::Yes;
                }
                self.set_checked(!self.is_checked);
                debug!(checked = self.is_checked, "checkbox toggled");
                if let Some(callback) = &mut self.on_click {
                    callback(self.is_checked, ctx);
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
        Some(Value::Bool(self.is_checked))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Values;
    use crate::testing::Harness;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_caption_right_of_box() {
        let h = Harness::new();
        let mut checkbox = Checkbox::new("Opt");
        h.place(&mut checkbox, 0, 0);
        // 12px box, 4px theme gap, 18px caption
        assert_eq!(checkbox.rect(), Rect::new(0, 0, 34, 15));
        assert_eq!(checkbox.check.as_ref().map(GraphicElement::rect), Some(Rect::new(0, 1, 12, 12)));
        assert_eq!(checkbox.label.rect().x, 16);
    }

    #[test]
    fn test_caption_left_of_box() {
        let h = Harness::new();
        let mut checkbox = Checkbox::new("Opt").align(HAlign::Left).padding(2);
        h.place(&mut checkbox, 0, 0);
        assert_eq!(checkbox.label.rect().x, 0);
        assert_eq!(checkbox.check.as_ref().map(|c| c.rect().x), Some(20));
    }

    #[test]
    fn test_release_toggles_and_reports() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut h = Harness::new();
        let mut checkbox = Checkbox::new("Opt").id("opt").on_click(move |on, _| sink.borrow_mut().push(on));
        h.place(&mut checkbox, 0, 0);

        checkbox.handle(&Event::press(5, 5), &mut h.ctx());
        checkbox.handle(&Event::release(5, 5), &mut h.ctx());
        assert!(checkbox.is_checked());
        assert!(checkbox.check.is_none());
        checkbox.handle(&Event::press(5, 5), &mut h.ctx());
        checkbox.handle(&Event::release(5, 5), &mut h.ctx());
        assert_eq!(*seen.borrow(), vec![true, false]);

        let mut values = Values::new();
        checkbox.collect_values(&mut values);
        assert_eq!(values.get("opt"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_disabled_keeps_value() {
        let mut h = Harness::new();
        let mut checkbox = Checkbox::new("Opt").checked(true);
        h.place(&mut checkbox, 0, 0);
        checkbox.set_disabled(true);
        checkbox.handle(&Event::release(5, 5), &mut h.ctx());
        assert!(checkbox.is_checked());
    }
}
