//! Input - a single-line text field.
//!
//! Edits apply to the working text immediately; the value reported to the
//! dialog is only committed when the field loses focus.

use tracing::{debug, trace};

use super::{TextCallback, skin_color};
use crate::engine::{Control, ControlState, EventCtx, Node, SizeCtx, Value, WidgetBase};
use crate::event::{Capabilities, Event, Handled, Key};
use crate::primitives::Label;
use crate::theme::GraphicElement;
use crate::types::{Color, Rect, size};

const PATH: &[&str] = &["input"];

/// Seconds between caret blinks.
pub const BLINK_INTERVAL: f32 = 0.5;

pub struct Input {
    base: WidgetBase,
    state: ControlState,
    text: String,
    committed: String,
    /// Caret position in chars.
    caret: usize,
    length: usize,
    padding: i32,
    on_input: Option<TextCallback>,
    label: Label,
    /// Pixel offset of every char boundary from the text origin.
    stops: Vec<i32>,
    line_height: i32,
    caret_visible: bool,
    blink: f32,
    caret_color: Color,
    field: Option<GraphicElement>,
    highlight: Option<GraphicElement>,
    caret_mark: Option<GraphicElement>,
}

impl std::fmt::Debug for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Input")
            .field("text", &self.text)
            .field("committed", &self.committed)
            .field("caret", &self.caret)
            .field("rect", &self.base.rect)
            .finish_non_exhaustive()
    }
}

impl Input {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            base: WidgetBase::new(),
            state: ControlState::new(),
            committed: text.clone(),
            caret: text.chars().count(),
            label: Label::new(text.clone()).component(PATH),
            text,
            length: 20,
            padding: 0,
            on_input: None,
            stops: Vec::new(),
            line_height: 0,
            caret_visible: true,
            blink: 0.0,
            caret_color: Color::BLACK,
            field: None,
            highlight: None,
            caret_mark: None,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.state.set_id(id);
        self
    }

    /// Visible width in characters.
    pub fn length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    pub fn padding(mut self, padding: i32) -> Self {
        self.padding = padding;
        self
    }

    /// Called with the text whenever the field loses focus.
    pub fn on_input(mut self, callback: impl FnMut(&str, &mut EventCtx<'_>) + 'static) -> Self {
        self.on_input = Some(Box::new(callback));
        self
    }

    /// Working text, including uncommitted edits.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Last committed text.
    pub fn committed(&self) -> &str {
        &self.committed
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Replace and commit the text, caret at the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.committed = self.text.clone();
        self.caret = self.text.chars().count();
        self.label.set_text(self.text.clone());
        self.base.request_layout();
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_at(&self, index: usize) -> usize {
        self.text.char_indices().nth(index).map_or(self.text.len(), |(byte, _)| byte)
    }

    fn text_origin(&self) -> (i32, i32) {
        let region = self.field.as_ref().map_or(self.base.rect, GraphicElement::content_region);
        (region.x + self.padding, region.y + self.padding)
    }

    /// Char boundary nearest to a screen x.
    fn boundary_at(&self, x: i32) -> usize {
        let offset = x - self.text_origin().0;
        self.stops
            .iter()
            .enumerate()
            .min_by_key(|(_, stop)| (*stop - offset).abs())
            .map_or(self.char_count(), |(index, _)| index)
    }

    fn show_caret(&mut self) {
        self.caret_visible = true;
        self.blink = 0.0;
        let color = self.caret_color;
        if let Some(mark) = &mut self.caret_mark {
            mark.set_color(color);
        }
    }

    fn changed(&mut self, ctx: &EventCtx<'_>) {
        self.label.set_text(self.text.clone());
        self.show_caret();
        ctx.request_layout();
    }

    fn insert(&mut self, text: &str, ctx: &EventCtx<'_>) -> Handled {
        let text: String = text.chars().filter(|c| !c.is_control()).collect();
        if text.is_empty() {
            return Handled::No;
        }
        let at = self.byte_at(self.caret);
        self.text.insert_str(at, &text);
        self.caret += text.chars().count();
        self.changed(ctx);
        Handled::Yes
    }

    fn key(&mut self, key: Key, ctx: &EventCtx<'_>) -> Handled {
        let count = self.char_count();
        match key {
            Key::Backspace if self.caret > 0 => {
                self.caret -= 1;
                let at = self.byte_at(self.caret);
                self.text.remove(at);
                self.changed(ctx);
            }
            Key::Delete if self.caret < count => {
                let at = self.byte_at(self.caret);
                self.text.remove(at);
                self.changed(ctx);
            }
            Key::Backspace | Key::Delete => {}
            Key::Left | Key::Right | Key::Home | Key::End => {
                self.caret = match key {
                    Key::Left => self.caret.saturating_sub(1),
                    Key::Right => (self.caret + 1).min(count),
                    Key::Home => 0,
                    _ => count,
                };
                self.show_caret();
                ctx.request_layout();
            }
            _ => return Handled::No,
        }
        Handled::Yes
    }

    fn commit(&mut self, ctx: &mut EventCtx<'_>) {
        self.committed = self.text.clone();
        debug!(text = %self.committed, "input committed");
        if let Some(callback) = &mut self.on_input {
            callback(&self.committed, ctx);
        }
    }
}

impl Node for Input {
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
        let font = ctx.theme.font(PATH);
        let glyph = ctx.measure("A", &font);
        let glyph_width = glyph.width.max(ctx.measure("_", &font).width);
        self.line_height = glyph.height();

        let disabled = self.state.is_disabled();
        if self.field.is_none() {
            let color = skin_color(ctx.theme, PATH, disabled);
            self.field = Some(ctx.image(PATH, "image", color, &ctx.layers.background));
        }
        let lit = (self.state.is_highlight() || self.state.is_focus()) && !disabled;
        if lit {
            if self.highlight.is_none() {
                let color = ctx.theme.highlight_color(PATH);
                self.highlight = Some(ctx.image(PATH, "image-highlight", color, &ctx.layers.highlight));
            }
        } else {
            self.highlight = None;
        }
        self.caret_color = ctx.theme.text_color(PATH);
        if self.state.is_focus() {
            if self.caret_mark.is_none() {
                let color = if self.caret_visible { self.caret_color } else { Color::TRANSPARENT };
                self.caret_mark = Some(ctx.image(PATH, "image-caret", color, &ctx.layers.highlight));
            }
        } else {
            self.caret_mark = None;
        }

        self.label.size(Some(ctx));
        self.stops = std::iter::once(0)
            .chain(self.text.char_indices().map(|(byte, c)| byte + c.len_utf8()))
            .map(|end| ctx.measure(&self.text[..end], &font).width)
            .collect();

        let needed = size(
            self.length as i32 * glyph_width + 2 * self.padding,
            self.line_height + 2 * self.padding,
        );
        let dims = self.field.as_ref().map_or(needed, |f| f.needed_size(needed));
        self.base.set_size(dims);
        trace!(?dims, "input size");
    }

    fn layout(&mut self, x: i32, y: i32) {
        self.base.set_position(x, y);
        let rect = self.base.rect;
        for graphic in [&mut self.field, &mut self.highlight].into_iter().flatten() {
            graphic.update(rect);
        }
        let (tx, ty) = self.text_origin();
        self.label.layout(tx, ty);
        let offset = self.stops.get(self.caret).copied().unwrap_or(0);
        let line_height = self.line_height;
        if let Some(mark) = &mut self.caret_mark {
            mark.update(Rect::new(tx + offset, ty, 1, line_height));
        }
    }

    fn delete(&mut self) {
        self.field = None;
        self.highlight = None;
        self.caret_mark = None;
        self.label.delete();
    }

    fn teardown(&mut self) {
        self.delete();
        self.on_input = None;
    }

    crate::leaf_control!();
}

impl Control for Input {
    fn state(&self) -> &ControlState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ControlState {
        &mut self.state
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::PRESS
            | Capabilities::KEY
            | Capabilities::TEXT
            | Capabilities::FOCUS
            | Capabilities::HIGHLIGHT
            | Capabilities::TICK
    }

    fn handle(&mut self, event: &Event, ctx: &mut EventCtx<'_>) -> Handled {
        match event {
            Event::HighlightGained | Event::HighlightLost => {
                ctx.request_layout();
                Handled::Yes
            }
            Event::FocusGained => {
                self.caret = self.char_count();
                self.show_caret();
                ctx.request_layout();
                Handled::Yes
            }
            Event::FocusLost => {
                self.commit(ctx);
                ctx.request_layout();
                Handled::Yes
            }
            _ if self.is_disabled() => Handled::No,
            Event::PointerDown { x, .. } => {
                self.caret = self.boundary_at(*x);
                self.show_caret();
                ctx.request_layout();
                Handled::Yes
            }
            Event::KeyDown { key, .. } => self.key(*key, ctx),
            Event::Text(text) => self.insert(text, ctx),
            Event::Tick { dt } if self.is_focus() => {
                if dt.is_finite() && *dt > 0.0 {
                    self.blink += dt;
                    let flips = (self.blink / BLINK_INTERVAL) as u64;
                    self.blink %= BLINK_INTERVAL;
                    if flips % 2 == 1 {
                        self.caret_visible = !self.caret_visible;
                    }
                }
                let color = if self.caret_visible { self.caret_color } else { Color::TRANSPARENT };
                if let Some(mark) = &mut self.caret_mark {
                    mark.set_color(color);
                }
                Handled::Yes
            }
            _ => Handled::No,
        }
    }

    fn is_focusable(&self) -> bool {
        true
    }

    fn is_input(&self) -> bool {
        true
    }

    fn value(&self) -> Option<Value> {
        Some(Value::Text(self.committed.clone()))
    }
}
