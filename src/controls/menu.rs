//! Menu - a vertical list of options with single selection.
//!
//! The menu registers as one control. It tracks which row the pointer is
//! over itself, so rows are plain nodes without back references.

use tracing::debug;

use super::TextCallback;
use crate::engine::{Control, ControlState, EventCtx, Node, SizeCtx, Value, WidgetBase, downcast_mut, downcast_ref};
use crate::event::{Capabilities, Event, Handled};
use crate::layout::VerticalLayout;
use crate::primitives::Label;
use crate::theme::GraphicElement;
use crate::types::{HAlign, size};

const PATH: &[&str] = &["menuoption"];
const SELECTED: &[&str] = &["menuoption", "selection"];
const PADDING: i32 = 4;

// =============================================================================
// MenuOption
// =============================================================================

/// One row: a label over an optional selection band and hover band.
struct MenuOption {
    base: WidgetBase,
    text: String,
    disabled: bool,
    selected: bool,
    lit: bool,
    align: HAlign,
    label: Label,
    background: Option<GraphicElement>,
    highlight: Option<GraphicElement>,
}

impl MenuOption {
    fn new(text: String, disabled: bool, align: HAlign) -> Self {
        Self {
            base: WidgetBase::new(),
            label: Label::new(text.clone()).component(PATH),
            text,
            disabled,
            selected: false,
            lit: false,
            align,
            background: None,
            highlight: None,
        }
    }

    fn set_selected(&mut self, selected: bool) {
        if selected == self.selected {
            return;
        }
        self.selected = selected;
        let path = if selected { SELECTED } else { PATH };
        self.label = Label::new(self.text.clone()).component(path);
        self.background = None;
        self.base.request_layout();
    }

    fn set_lit(&mut self, lit: bool) {
        if lit != self.lit {
            self.lit = lit;
            self.highlight = None;
            self.base.request_layout();
        }
    }
}

impl Node for MenuOption {
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
        let path = if self.selected { SELECTED } else { PATH };
        if self.disabled && !self.label.is_live() {
            self.label.set_color(ctx.theme.disabled_color(path));
        }
        self.label.size(Some(ctx));
        if self.selected && self.background.is_none() {
            let color = ctx.theme.gui_color(path);
            self.background = Some(ctx.image(PATH, "image-highlight", color, &ctx.layers.background));
        }
        if self.lit && self.highlight.is_none() {
            let color = ctx.theme.highlight_color(PATH);
            self.highlight = Some(ctx.image(PATH, "image-highlight", color, &ctx.layers.highlight));
        }
        self.base.set_size(self.label.rect().size());
    }

    fn layout(&mut self, x: i32, y: i32) {
        self.base.set_position(x, y);
        let rect = self.base.rect;
        for band in [&mut self.background, &mut self.highlight].into_iter().flatten() {
            band.update(rect);
        }
        let text = self.label.rect().size();
        self.label.layout(
            x + self.align.place(rect.width, text.width),
            y + (rect.height - text.height) / 2,
        );
    }

    fn delete(&mut self) {
        self.label.delete();
        self.background = None;
        self.highlight = None;
    }

    fn is_expandable(&self) -> bool {
        true
    }

    fn expand(&mut self, width: i32, height: i32) {
        self.base.set_size(size(width, height));
    }
}

// =============================================================================
// Menu
// =============================================================================

/// Options stacked top to bottom. A leading `-` marks an option disabled;
/// the dash is not shown.
pub struct Menu {
    state: ControlState,
    layout: VerticalLayout,
    items: Vec<(String, bool)>,
    align: HAlign,
    selected: Option<String>,
    hovered: Option<usize>,
    on_select: Option<TextCallback>,
}

impl std::fmt::Debug for Menu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Menu")
            .field("items", &self.items)
            .field("selected", &self.selected)
            .field("rect", &self.layout.rect())
            .finish_non_exhaustive()
    }
}

fn parse(options: impl IntoIterator<Item = impl Into<String>>) -> Vec<(String, bool)> {
    options
        .into_iter()
        .map(|option| {
            let option = option.into();
            match option.strip_prefix('-') {
                Some(rest) => (rest.to_string(), true),
                None => (option, false),
            }
        })
        .collect()
}

impl Menu {
    pub fn new(options: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut menu = Self {
            state: ControlState::new(),
            layout: VerticalLayout::new(),
            items: parse(options),
            align: HAlign::Center,
            selected: None,
            hovered: None,
            on_select: None,
        };
        menu.rebuild();
        menu
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.state.set_id(id);
        self
    }

    /// Where labels sit inside their rows.
    pub fn align(mut self, align: HAlign) -> Self {
        self.align = align;
        self.rebuild();
        self
    }

    pub fn on_select(mut self, callback: impl FnMut(&str, &mut EventCtx<'_>) + 'static) -> Self {
        self.on_select = Some(Box::new(callback));
        self
    }

    /// Start with `text` selected.
    pub fn with_selected(mut self, text: &str) -> Self {
        self.select(text);
        self
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Option texts in order, without disabled markers.
    pub fn options(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|(text, _)| text.as_str())
    }

    /// Replace every option and clear the selection.
    pub fn set_options(&mut self, options: impl IntoIterator<Item = impl Into<String>>) {
        self.layout.base().request_layout();
        self.items = parse(options);
        self.selected = None;
        self.hovered = None;
        self.rebuild();
    }

    /// Select an enabled option by text without firing `on_select`.
    pub fn select(&mut self, text: &str) -> bool {
        let Some(index) = self.items.iter().position(|(t, disabled)| t == text && !disabled) else {
            return false;
        };
        let previous = self.selected.as_deref().and_then(|s| self.items.iter().position(|(t, _)| t == s));
        if let Some(old) = previous.and_then(|i| self.option_mut(i)) {
            old.set_selected(false);
        }
        if let Some(option) = self.option_mut(index) {
            option.set_selected(true);
        }
        self.selected = Some(text.to_string());
        true
    }

    fn rebuild(&mut self) {
        let align = self.align;
        let layout = self.items.iter().fold(VerticalLayout::new().padding(PADDING).align(align), |layout, (text, disabled)| {
            layout.child(MenuOption::new(text.clone(), *disabled, align))
        });
        self.layout = layout;
        if let Some(selected) = self.selected.take() {
            self.select(&selected);
        }
    }

    fn option_mut(&mut self, index: usize) -> Option<&mut MenuOption> {
        downcast_mut::<MenuOption>(self.layout.get_mut(index)?)
    }

    /// Row under a point. Rows span the menu's full width; the gaps
    /// between them belong to nobody.
    fn option_at(&self, x: i32, y: i32) -> Option<usize> {
        let rect = self.layout.rect();
        if x < rect.x || x >= rect.right() {
            return None;
        }
        (0..self.layout.len()).find(|&i| {
            self.layout
                .get(i)
                .and_then(downcast_ref::<MenuOption>)
                .is_some_and(|o| y >= o.rect().y && y < o.rect().top())
        })
    }

    fn set_hover(&mut self, index: Option<usize>) {
        let index = index.filter(|&i| self.items.get(i).is_some_and(|(_, disabled)| !disabled));
        if index == self.hovered {
            return;
        }
        if let Some(old) = self.hovered.and_then(|i| self.option_mut(i)) {
            old.set_lit(false);
        }
        if let Some(new) = index.and_then(|i| self.option_mut(i)) {
            new.set_lit(true);
        }
        self.hovered = index;
    }
}

impl Node for Menu {
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
        self.layout.teardown();
        self.on_select = None;
    }

    fn is_expandable(&self) -> bool {
        self.layout.is_expandable()
    }

    fn expand(&mut self, width: i32, height: i32) {
        self.layout.expand(width, height);
    }

    fn children(&self) -> Vec<&dyn Node> {
        self.layout.children()
    }

    fn children_mut(&mut self) -> Vec<&mut dyn Node> {
        self.layout.children_mut()
    }

    crate::leaf_control!();
}

impl Control for Menu {
    fn state(&self) -> &ControlState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ControlState {
        &mut self.state
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::PRESS | Capabilities::MOTION | Capabilities::HIGHLIGHT
    }

    fn handle(&mut self, event: &Event, ctx: &mut EventCtx<'_>) -> Handled {
        match event {
            Event::PointerMove { x, y, .. } => {
                self.set_hover(self.option_at(*x, *y));
                Handled::Yes
            }
            Event::HighlightLost => {
                self.set_hover(None);
                Handled::Yes
            }
            Event::PointerDown { .. } => Handled::from(!self.is_disabled()),
            Event::PointerUp { x, y, .. } if !self.is_disabled() => {
                let Some(index) = self.option_at(*x, *y) else {
                    return Handled::Yes;
                };
                let text = self.items[index].0.clone();
                if self.select(&text) {
                    debug!(%text, "menu option selected");
                    if let Some(callback) = &mut self.on_select {
                        callback(&text, ctx);
                    }
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
        Some(Value::Choice(self.selected.clone()))
    }
}
