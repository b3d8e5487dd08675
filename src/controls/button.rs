//! Button - a text-captioned push button.

use tracing::debug;

use super::{ClickCallback, skin_color};
use crate::engine::{Control, ControlState, EventCtx, Node, SizeCtx, WidgetBase};
use crate::event::{Capabilities, Event, Handled};
use crate::primitives::Label;
use crate::theme::GraphicElement;

const PATH: &[&str] = &["button"];

/// Fires `on_click` when a press is released over the button.
pub struct Button {
    base: WidgetBase,
    state: ControlState,
    on_click: Option<ClickCallback>,
    is_pressed: bool,
    label: Label,
    face: Option<GraphicElement>,
    highlight: Option<GraphicElement>,
}

impl std::fmt::Debug for Button {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Button")
            .field("text", &self.label.text())
            .field("rect", &self.base.rect)
            .field("pressed", &self.is_pressed)
            .finish_non_exhaustive()
    }
}

impl Button {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            base: WidgetBase::new(),
            state: ControlState::new(),
            on_click: None,
            is_pressed: false,
            label: Label::new(text).component(PATH),
            face: None,
            highlight: None,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.state.set_id(id);
        self
    }

    pub fn on_click(mut self, callback: impl FnMut(&mut EventCtx<'_>) + 'static) -> Self {
        self.on_click = Some(Box::new(callback));
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.state.set_disabled_flag(disabled);
        self
    }

    pub fn text(&self) -> &str {
        self.label.text()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.label.set_text(text);
    }

    pub fn is_pressed(&self) -> bool {
        self.is_pressed
    }

    /// The button's skin, once sized.
    pub fn face(&self) -> Option<&GraphicElement> {
        self.face.as_ref()
    }

    fn set_pressed(&mut self, pressed: bool, ctx: &EventCtx<'_>) {
        if pressed != self.is_pressed {
            self.is_pressed = pressed;
            self.face = None;
            ctx.request_layout();
        }
    }
}

impl Node for Button {
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
        if self.face.is_none() {
            let key = if self.is_pressed { "image-down" } else { "image-up" };
            let color = skin_color(ctx.theme, PATH, disabled);
            self.face = Some(ctx.image(PATH, key, color, &ctx.layers.background));
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
        let dims = self.face.as_ref().map_or(text, |face| face.needed_size(text));
        self.base.set_size(dims);
    }

    fn layout(&mut self, x: i32, y: i32) {
        self.base.set_position(x, y);
        let rect = self.base.rect;
        for graphic in [&mut self.face, &mut self.highlight].into_iter().flatten() {
            graphic.update(rect);
        }
        let region = self.face.as_ref().map_or(rect, GraphicElement::content_region);
        let text = self.label.rect().size();
        self.label.layout(
            region.x + (region.width - text.width) / 2,
            region.y + (region.height - text.height) / 2,
        );
    }

    fn delete(&mut self) {
        self.face = None;
        self.highlight = None;
        self.label.delete();
    }

    fn teardown(&mut self) {
        self.delete();
        self.on_click = None;
    }

    crate::leaf_control!();
}

impl Control for Button {
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
            Event::PointerDown { .. } if !self.is_disabled() => {
                self.set_pressed(true, ctx);
                Handled::Yes
            }
            Event::PointerUp { x, y, .. } if self.is_pressed => {
                self.set_pressed(false, ctx);
                if self.hit_test(*x, *y)
                    && let Some(callback) = &mut self.on_click
                {
                    debug!(text = self.label.text(), "button clicked");
                    callback(ctx);
                }
                Handled::Yes
            }
            _ => Handled::No,
        }
    }
}
