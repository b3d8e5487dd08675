//! Dialogs - the roots of widget trees.
//!
//! A [`Dialog`] owns one content tree, the paint groups it draws into, and
//! the [`EventManager`] routing input to its controls. Layout is never
//! synchronous: anything that changes geometry marks the dialog dirty and
//! the next [`Dialog::update`] sizes, places and re-registers everything.
//!
//! [`Gui`] keeps the dialog stack for a window. Index 0 is the topmost
//! dialog and the first to see input; popups opened from a handler are
//! pushed above their parent once the dispatch returns.
//!
//! # Example
//!
//! ```ignore
//! use spark_gui::prelude::*;
//!
//! let mut gui = Gui::new(presets::flat(), surface, size(640, 480));
//! let dialog = Dialog::new(
//!     gui.context(),
//!     Frame::new(VerticalLayout::new().child(Label::new("Hello")).child(Button::new("Ok"))),
//!     DialogOptions { anchor: Anchor::TopLeft, ..Default::default() },
//! );
//! gui.push(dialog);
//! gui.update(1.0 / 60.0);
//! ```

mod popup;

pub use popup::*;

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::engine::{Control, DialogHandle, DialogLink, EventCtx, FocusStep, Node, SizeCtx, Value, Values};
use crate::event::{Event, Handled, Key, Modifiers};
use crate::renderer::{Group, GroupCache, GroupRef, Layers, PaintOrderAllocator, SurfaceRef};
use crate::state::{EventManager, PressOutcome};
use crate::theme::Theme;
use crate::types::{Anchor, Point, Rect, Size, point, relative_point, size};

// =============================================================================
// Shared context
// =============================================================================

/// Resources every dialog of a window shares: theme, surface, stacking
/// tokens, the root paint group and the window size.
#[derive(Debug, Clone)]
pub struct GuiContext {
    theme: Rc<Theme>,
    surface: SurfaceRef,
    orders: Rc<PaintOrderAllocator>,
    root: GroupRef,
    window: Rc<Cell<Size>>,
}

impl GuiContext {
    pub fn new(theme: Theme, surface: SurfaceRef, window: Size) -> Self {
        Self {
            theme: Rc::new(theme),
            surface,
            orders: Rc::new(PaintOrderAllocator::new()),
            root: Group::root(),
            window: Rc::new(Cell::new(window)),
        }
    }

    /// Same window and surface, different theme.
    pub fn with_theme(&self, theme: Rc<Theme>) -> Self {
        Self { theme, ..self.clone() }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn surface(&self) -> &SurfaceRef {
        &self.surface
    }

    pub fn orders(&self) -> &PaintOrderAllocator {
        &self.orders
    }

    pub fn root_group(&self) -> &GroupRef {
        &self.root
    }

    pub fn window(&self) -> Size {
        self.window.get()
    }

    pub fn set_window(&self, window: Size) {
        self.window.set(window);
    }
}

// =============================================================================
// Options
// =============================================================================

/// Callback receiving the dialog it is bound to.
pub type DialogCallback = Box<dyn FnMut(&mut Dialog)>;

/// Construction options for a [`Dialog`].
pub struct DialogOptions {
    /// Window anchor the dialog is positioned against.
    pub anchor: Anchor,
    /// Pixel offset from the anchor; +x right, +y up.
    pub offset: Point,
    /// Drag the dialog by pressing on its background.
    pub movable: bool,
    /// Fired when Enter wraps past the last focusable control.
    pub on_enter: Option<DialogCallback>,
    /// Fired on Escape.
    pub on_escape: Option<DialogCallback>,
    /// Close when a press lands outside the dialog.
    pub close_on_outside_press: bool,
    /// Theme override; the window theme otherwise.
    pub theme: Option<Rc<Theme>>,
}

impl Default for DialogOptions {
    fn default() -> Self {
        Self {
            anchor: Anchor::Center,
            offset: point(0, 0),
            movable: true,
            on_enter: None,
            on_escape: None,
            close_on_outside_press: false,
            theme: None,
        }
    }
}

// =============================================================================
// Dialog
// =============================================================================

/// A window-level widget tree with its own input routing.
pub struct Dialog {
    content: Option<Box<dyn Node>>,
    rect: Rect,
    anchor: Anchor,
    offset: Point,
    window: Size,
    movable: bool,
    dragging: bool,
    close_on_outside_press: bool,
    on_enter: Option<DialogCallback>,
    on_escape: Option<DialogCallback>,
    handle: DialogHandle,
    link: DialogLink,
    gui: GuiContext,
    group: GroupRef,
    layers: Layers,
    groups: GroupCache,
    manager: EventManager,
    spawned: Vec<Dialog>,
    torn_down: bool,
}

impl fmt::Debug for Dialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dialog")
            .field("rect", &self.rect)
            .field("anchor", &self.anchor)
            .field("offset", &self.offset)
            .field("order", &self.group.dialog_order())
            .field("closed", &self.handle.is_closed())
            .finish_non_exhaustive()
    }
}

impl Dialog {
    /// Create a dialog around `content` and lay it out right away.
    pub fn new(gui: &GuiContext, content: impl Node, options: DialogOptions) -> Self {
        Self::boxed(gui, Box::new(content), options)
    }

    pub fn boxed(gui: &GuiContext, content: Box<dyn Node>, options: DialogOptions) -> Self {
        let gui = match options.theme {
            Some(theme) => gui.with_theme(theme),
            None => gui.clone(),
        };
        let group = Group::dialog(gui.orders().next_token(), Some(gui.root_group()));
        let layers = Layers::new(&group);
        let handle = DialogHandle::new();
        let link = handle.link();

        let mut dialog = Self {
            content: Some(content),
            rect: Rect::default(),
            anchor: options.anchor,
            offset: options.offset,
            window: gui.window(),
            movable: options.movable,
            dragging: false,
            close_on_outside_press: options.close_on_outside_press,
            on_enter: options.on_enter,
            on_escape: options.on_escape,
            handle,
            link,
            gui,
            group,
            layers,
            groups: GroupCache::new(),
            manager: EventManager::new(),
            spawned: Vec::new(),
            torn_down: false,
        };
        dialog.do_layout();
        debug!(order = ?dialog.group.dialog_order(), "dialog created");
        dialog
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn handle(&self) -> DialogHandle {
        self.handle.clone()
    }

    pub fn gui(&self) -> &GuiContext {
        &self.gui
    }

    pub fn layers(&self) -> &Layers {
        &self.layers
    }

    pub fn manager(&self) -> &EventManager {
        &self.manager
    }

    pub fn content(&self) -> Option<&dyn Node> {
        self.content.as_deref()
    }

    pub fn content_mut(&mut self) -> Option<&mut dyn Node> {
        match self.content.as_mut() {
            Some(content) => Some(&mut **content),
            None => None,
        }
    }

    pub fn is_movable(&self) -> bool {
        self.movable
    }

    pub fn is_closed(&self) -> bool {
        self.handle.is_closed()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn needs_layout(&self) -> bool {
        self.handle.needs_layout()
    }

    /// Schedule a re-layout for the next update.
    pub fn set_needs_layout(&self) {
        self.handle.set_needs_layout();
    }

    pub fn set_offset(&mut self, offset: Point) {
        self.offset = offset;
        self.set_needs_layout();
    }

    pub fn set_anchor(&mut self, anchor: Anchor) {
        self.anchor = anchor;
        self.set_needs_layout();
    }

    pub fn set_on_enter(&mut self, callback: impl FnMut(&mut Dialog) + 'static) {
        self.on_enter = Some(Box::new(callback));
    }

    pub fn set_on_escape(&mut self, callback: impl FnMut(&mut Dialog) + 'static) {
        self.on_escape = Some(Box::new(callback));
    }

    /// Popups opened by handlers that nobody has collected yet.
    pub fn popups(&self) -> &[Dialog] {
        &self.spawned
    }

    pub(crate) fn take_popups(&mut self) -> Vec<Dialog> {
        std::mem::take(&mut self.spawned)
    }

    // =========================================================================
    // Values and controls
    // =========================================================================

    /// Committed value of the input control with this id.
    pub fn get_value(&self, id: &str) -> Option<Value> {
        self.get_values().remove(id)
    }

    /// Committed values of every id-bearing input control.
    pub fn get_values(&self) -> Values {
        let mut out = Values::new();
        if let Some(content) = &self.content {
            content.collect_values(&mut out);
        }
        out
    }

    /// Control with this external id.
    pub fn control(&mut self, id: &str) -> Option<&mut dyn Control> {
        self.content.as_deref_mut()?.find_by_id(id)
    }

    /// Enable or disable a control by id. A disabled control gives up
    /// hover and focus immediately.
    pub fn set_disabled(&mut self, id: &str, disabled: bool) -> bool {
        let Some(control) = self.control(id) else {
            warn!(id, "set_disabled on unknown control");
            return false;
        };
        control.set_disabled(disabled);
        let control_id = control.control_id();
        if disabled {
            self.route(|manager, content, ctx| manager.release(content, control_id, ctx));
        }
        true
    }

    /// Run `f` with the manager, the content and an event context.
    fn route<R>(
        &mut self,
        f: impl FnOnce(&mut EventManager, &mut dyn Node, &mut EventCtx<'_>) -> R,
    ) -> Option<R> {
        let Dialog { content, manager, link, gui, spawned, .. } = self;
        let content = content.as_deref_mut()?;
        let mut ctx = EventCtx::new(link, gui, spawned);
        Some(f(manager, content, &mut ctx))
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Size the content, place the dialog against the window and rebuild
    /// the control list.
    pub fn do_layout(&mut self) {
        let Dialog {
            content,
            rect,
            anchor,
            offset,
            window,
            gui,
            layers,
            groups,
            link,
            manager,
            spawned,
            ..
        } = self;
        let Some(content) = content.as_deref_mut() else {
            return;
        };

        let size_ctx = SizeCtx { theme: gui.theme(), surface: gui.surface(), layers, groups, link };
        content.size(Some(&size_ctx));

        let dims = content.rect().size();
        *window = gui.window();
        let screen = Rect::from_size(*window);
        let base = relative_point(&screen, *anchor, dims, None, point(0, 0));

        let max_x = window.width - dims.width - base.x;
        let max_y = window.height - dims.height - base.y;
        offset.x = offset.x.min(max_x).max(-base.x);
        offset.y = offset.y.min(max_y).max(-base.y);

        let (x, y) = (base.x + offset.x, base.y + offset.y);
        content.layout(x, y);
        *rect = Rect::new(x, y, dims.width, dims.height);

        let mut ctx = EventCtx::new(link, gui, spawned);
        manager.rebuild(content, &mut ctx);
        trace!(?rect, "dialog laid out");
    }

    /// Per-frame update: consume the dirty flag, then tick controls.
    pub fn update(&mut self, dt: f32) {
        if self.torn_down {
            return;
        }
        let resized = self.gui.window() != self.window;
        if self.handle.take_needs_layout() || resized {
            self.do_layout();
        }
        self.route(|manager, content, ctx| manager.tick(content, dt, ctx));
    }

    // =========================================================================
    // Stacking
    // =========================================================================

    pub fn is_on_top(&self) -> bool {
        self.group.dialog_order() == Some(self.gui.orders().latest())
    }

    /// Take a fresh stacking token and move to the front of input handling.
    pub fn pop_to_top(&mut self) {
        let token = self.gui.orders().next_token();
        self.group.set_order(token);
        self.gui.surface().borrow_mut().resort();
        self.handle.request_raise();
        debug!(token, "dialog popped to top");
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Drop hover without moving it anywhere.
    pub fn clear_hover(&mut self) {
        self.route(|manager, content, ctx| manager.set_hover(content, None, ctx));
    }

    /// Route one input event. Returns whether it was consumed.
    pub fn handle_event(&mut self, event: &Event) -> Handled {
        if self.torn_down || self.handle.is_closed() {
            return Handled::No;
        }
        trace!(?event, "dialog event");

        match event {
            Event::PointerMove { x, y, .. } => {
                self.route(|manager, content, ctx| manager.pointer_motion(content, event, ctx));
                Handled::from(self.rect.contains(*x, *y))
            }
            Event::PointerDown { x, y, .. } => self.press(event, *x, *y),
            Event::PointerUp { x, y, .. } => {
                let was_dragging = std::mem::take(&mut self.dragging);
                let handled = self
                    .route(|manager, content, ctx| manager.pointer_release(content, event, ctx))
                    .unwrap_or_default();
                Handled::from(was_dragging || handled.is_handled() || self.rect.contains(*x, *y))
            }
            Event::PointerDrag { dx, dy, .. } => {
                let handled = self
                    .route(|manager, content, ctx| manager.pointer_drag(content, event, ctx))
                    .unwrap_or_default();
                if handled.is_handled() {
                    return handled;
                }
                if self.movable && self.dragging {
                    self.offset.x += dx;
                    self.offset.y += dy;
                    self.set_needs_layout();
                    return Handled::Yes;
                }
                Handled::No
            }
            Event::Scroll { x, y, .. } => {
                if !self.rect.contains(*x, *y) {
                    return Handled::No;
                }
                self.route(|manager, content, ctx| manager.scroll(content, event, ctx));
                Handled::Yes
            }
            Event::KeyDown { key: Key::Escape, .. } => self.fire_escape(),
            Event::KeyDown { key: key @ (Key::Tab | Key::Enter), modifiers } => {
                let reverse = modifiers.contains(Modifiers::SHIFT);
                let step = self
                    .route(|manager, content, ctx| manager.focus_step(content, reverse, ctx))
                    .unwrap_or(FocusStep::Empty);
                // with nothing focusable, Tab submits too
                let submit = match step {
                    FocusStep::Empty => true,
                    FocusStep::Wrapped => *key == Key::Enter,
                    FocusStep::Moved => false,
                };
                if submit && self.on_enter.is_some() {
                    return self.fire_enter();
                }
                Handled::from(step != FocusStep::Empty)
            }
            Event::KeyDown { .. } | Event::KeyUp { .. } | Event::Text(_) => self
                .route(|manager, content, ctx| manager.to_focus(content, event, ctx))
                .unwrap_or_default(),
            Event::Resize { width, height } => {
                self.gui.set_window(size(*width, *height));
                Handled::No
            }
            Event::FocusGained
            | Event::FocusLost
            | Event::HighlightGained
            | Event::HighlightLost
            | Event::Tick { .. } => Handled::No,
        }
    }

    fn press(&mut self, event: &Event, x: i32, y: i32) -> Handled {
        let bounds = self.rect;
        let outcome = self
            .route(|manager, content, ctx| {
                let outcome = manager.pointer_press(content, event, bounds, ctx);
                if outcome == PressOutcome::Outside {
                    manager.set_focus(content, None, ctx);
                }
                outcome
            })
            .unwrap_or(PressOutcome::Outside);

        if !bounds.contains(x, y) {
            if outcome == PressOutcome::Outside && self.close_on_outside_press {
                debug!("press outside closes dialog");
                self.close();
            }
            return Handled::from(outcome == PressOutcome::Captured);
        }

        if !self.is_on_top() {
            self.pop_to_top();
        }
        if outcome == PressOutcome::Unclaimed && self.movable {
            self.dragging = true;
        }
        Handled::Yes
    }

    fn fire_enter(&mut self) -> Handled {
        let Some(mut callback) = self.on_enter.take() else {
            return Handled::No;
        };
        debug!("dialog on_enter");
        callback(self);
        if self.on_enter.is_none() {
            self.on_enter = Some(callback);
        }
        Handled::Yes
    }

    fn fire_escape(&mut self) -> Handled {
        let Some(mut callback) = self.on_escape.take() else {
            return Handled::No;
        };
        debug!("dialog on_escape");
        callback(self);
        if self.on_escape.is_none() {
            self.on_escape = Some(callback);
        }
        Handled::Yes
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Mark the dialog closed; the owning [`Gui`] tears it down. Closing
    /// twice is a no-op.
    pub fn close(&self) {
        if self.handle.close() {
            debug!("dialog closed");
        }
    }

    /// Release everything: controls, content graphics, callbacks, popups.
    pub fn teardown(&mut self) {
        if self.torn_down {
            warn!("dialog torn down twice");
            return;
        }
        self.torn_down = true;
        self.handle.close();
        self.manager.reset();
        if let Some(mut content) = self.content.take() {
            content.teardown();
        }
        for mut popup in self.spawned.drain(..) {
            popup.teardown();
        }
        self.on_enter = None;
        self.on_escape = None;
        self.groups.clear();
        self.gui.surface().borrow_mut().resort();
        debug!("dialog torn down");
    }
}

// =============================================================================
// Gui
// =============================================================================

/// The dialog stack of one window.
#[derive(Debug)]
pub struct Gui {
    context: GuiContext,
    dialogs: Vec<Dialog>,
}

impl Gui {
    pub fn new(theme: Theme, surface: SurfaceRef, window: Size) -> Self {
        Self { context: GuiContext::new(theme, surface, window), dialogs: Vec::new() }
    }

    pub fn context(&self) -> &GuiContext {
        &self.context
    }

    /// Dialogs, topmost first.
    pub fn dialogs(&self) -> &[Dialog] {
        &self.dialogs
    }

    pub fn len(&self) -> usize {
        self.dialogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dialogs.is_empty()
    }

    pub fn dialog(&self, handle: &DialogHandle) -> Option<&Dialog> {
        self.dialogs.iter().find(|d| d.handle.same_dialog(handle))
    }

    pub fn dialog_mut(&mut self, handle: &DialogHandle) -> Option<&mut Dialog> {
        self.dialogs.iter_mut().find(|d| d.handle.same_dialog(handle))
    }

    /// Put a dialog on top of the stack.
    pub fn push(&mut self, dialog: Dialog) -> DialogHandle {
        let handle = dialog.handle();
        self.dialogs.insert(0, dialog);
        handle
    }

    /// Offer an event to the dialogs top to bottom until one consumes it.
    /// Motion clears hover in every dialog below the one under the pointer.
    pub fn dispatch(&mut self, event: &Event) -> Handled {
        let handled = match event {
            Event::Resize { width, height } => {
                self.context.set_window(size(*width, *height));
                for dialog in &mut self.dialogs {
                    dialog.set_needs_layout();
                }
                Handled::Yes
            }
            Event::PointerMove { .. } => {
                let mut handled = Handled::No;
                for dialog in &mut self.dialogs {
                    if handled.is_handled() {
                        dialog.clear_hover();
                    } else {
                        handled = dialog.handle_event(event);
                    }
                }
                handled
            }
            _ => {
                let mut handled = Handled::No;
                for dialog in &mut self.dialogs {
                    if dialog.handle_event(event).is_handled() {
                        handled = Handled::Yes;
                        break;
                    }
                }
                handled
            }
        };
        self.settle();
        handled
    }

    /// Per-frame update of every dialog.
    pub fn update(&mut self, dt: f32) {
        for dialog in &mut self.dialogs {
            dialog.update(dt);
        }
        self.settle();
    }

    /// Apply stacking changes, adopt new popups and drop closed dialogs.
    fn settle(&mut self) {
        let raised: Vec<usize> = (0..self.dialogs.len())
            .filter(|&i| self.dialogs[i].handle.take_raise())
            .collect();
        for (moved, index) in raised.into_iter().enumerate() {
            let dialog = self.dialogs.remove(index);
            self.dialogs.insert(moved, dialog);
        }

        let popups: Vec<Dialog> = self.dialogs.iter_mut().flat_map(|d| d.take_popups()).collect();
        for popup in popups {
            self.dialogs.insert(0, popup);
        }

        let mut index = 0;
        while index < self.dialogs.len() {
            if self.dialogs[index].is_closed() {
                let mut dialog = self.dialogs.remove(index);
                dialog.teardown();
            } else {
                index += 1;
            }
        }
    }
}
