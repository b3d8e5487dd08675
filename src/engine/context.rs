//! Dialog attachment and the contexts threaded through size and dispatch.
//!
//! Widgets never own their dialog. They hold a [`DialogLink`] (a weak
//! handle to the dialog's shared flags) recorded the first time they are
//! sized inside it, and use it to ask for a re-layout. Graphics are only
//! ever created while sizing with a [`SizeCtx`], which is what "attached"
//! means in practice.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use crate::dialog::{Dialog, GuiContext};
use crate::renderer::{FontSpec, GroupCache, GroupRef, Layers, SurfaceRef, TextExtent};
use crate::theme::{GraphicElement, ImageTemplate, Theme};
use crate::types::{Color, Rect, Size};

// =============================================================================
// Dialog flags
// =============================================================================

/// Flags a dialog shares with everything attached to it.
#[derive(Debug, Default)]
pub struct DialogShared {
    needs_layout: Cell<bool>,
    closed: Cell<bool>,
    raise: Cell<bool>,
}

/// Non-owning link from a widget back to its dialog.
#[derive(Debug, Clone, Default)]
pub struct DialogLink(Weak<DialogShared>);

impl DialogLink {
    /// Ask the dialog for a re-layout on its next update. Returns false if
    /// the dialog is gone.
    pub fn request_layout(&self) -> bool {
        match self.0.upgrade() {
            Some(shared) => {
                shared.needs_layout.set(true);
                true
            }
            None => false,
        }
    }

    /// Mark the dialog closed. Returns false if it already was or is gone.
    pub fn close(&self) -> bool {
        self.0.upgrade().is_some_and(|shared| !shared.closed.replace(true))
    }

    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }

    /// True when both links point at the same dialog.
    pub fn same(&self, other: &DialogLink) -> bool {
        Weak::ptr_eq(&self.0, &other.0)
    }
}

/// Owning handle to a dialog's flags. Held by the dialog itself and handed
/// out for popups so callers can close them later.
#[derive(Debug, Clone, Default)]
pub struct DialogHandle(Rc<DialogShared>);

impl DialogHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn link(&self) -> DialogLink {
        DialogLink(Rc::downgrade(&self.0))
    }

    pub fn set_needs_layout(&self) {
        self.0.needs_layout.set(true);
    }

    pub fn needs_layout(&self) -> bool {
        self.0.needs_layout.get()
    }

    /// Read and clear the dirty flag.
    pub(crate) fn take_needs_layout(&self) -> bool {
        self.0.needs_layout.replace(false)
    }

    /// Mark the dialog closed. Returns false if it already was.
    pub fn close(&self) -> bool {
        !self.0.closed.replace(true)
    }

    pub fn is_closed(&self) -> bool {
        self.0.closed.get()
    }

    pub(crate) fn request_raise(&self) {
        self.0.raise.set(true);
    }

    pub(crate) fn take_raise(&self) -> bool {
        self.0.raise.replace(false)
    }

    /// True when both handles belong to the same dialog.
    pub fn same_dialog(&self, other: &DialogHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

// =============================================================================
// Attachment
// =============================================================================

/// Whether a widget has been sized inside a dialog.
#[derive(Debug, Clone, Default)]
pub enum Attachment {
    #[default]
    Detached,
    Attached(DialogLink),
}

/// Rectangle and attachment state every widget carries.
#[derive(Debug, Clone, Default)]
pub struct WidgetBase {
    pub rect: Rect,
    pub attachment: Attachment,
}

impl WidgetBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Widget with a fixed starting size.
    pub fn sized(width: i32, height: i32) -> Self {
        Self { rect: Rect::new(0, 0, width, height), attachment: Attachment::Detached }
    }

    /// Record the dialog this widget is being sized in. Returns true when
    /// the widget moved from a different dialog, in which case the caller
    /// must release its graphics before regenerating them.
    pub fn attach(&mut self, link: &DialogLink) -> bool {
        let moved = match &self.attachment {
            Attachment::Attached(current) => !current.same(link),
            Attachment::Detached => false,
        };
        self.attachment = Attachment::Attached(link.clone());
        moved
    }

    pub fn detach(&mut self) {
        self.attachment = Attachment::Detached;
    }

    pub fn is_attached(&self) -> bool {
        matches!(self.attachment, Attachment::Attached(_))
    }

    /// Ask the owning dialog to re-layout. No-op while detached.
    pub fn request_layout(&self) {
        if let Attachment::Attached(link) = &self.attachment {
            link.request_layout();
        }
    }

    pub fn set_size(&mut self, size: Size) {
        self.rect.width = size.width;
        self.rect.height = size.height;
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.rect.x = x;
        self.rect.y = y;
    }
}

// =============================================================================
// Size context
// =============================================================================

/// Everything a widget needs to materialize its graphics.
#[derive(Clone, Copy)]
pub struct SizeCtx<'a> {
    pub theme: &'a Theme,
    pub surface: &'a SurfaceRef,
    pub layers: &'a Layers,
    pub groups: &'a GroupCache,
    pub link: &'a DialogLink,
}

impl<'a> SizeCtx<'a> {
    /// Same context drawing into different layers.
    pub fn with_layers<'b>(&self, layers: &'b Layers) -> SizeCtx<'b>
    where
        'a: 'b,
    {
        SizeCtx {
            theme: self.theme,
            surface: self.surface,
            layers,
            groups: self.groups,
            link: self.link,
        }
    }

    /// Generate a live element from a template.
    pub fn generate(&self, template: &ImageTemplate, color: Color, group: &GroupRef) -> GraphicElement {
        template.generate(color, self.surface, group)
    }

    /// Generate the image at `path`/`key` in the theme.
    pub fn image(&self, path: &[&str], key: &str, color: Color, group: &GroupRef) -> GraphicElement {
        self.generate(&self.theme.image(path, key), color, group)
    }

    pub fn measure(&self, text: &str, font: &FontSpec) -> TextExtent {
        self.surface.borrow().measure_text(text, font)
    }
}

// =============================================================================
// Event context
// =============================================================================

/// Context handed to controls while they handle an event.
pub struct EventCtx<'a> {
    link: &'a DialogLink,
    gui: &'a GuiContext,
    popups: &'a mut Vec<Dialog>,
}

impl<'a> EventCtx<'a> {
    pub fn new(link: &'a DialogLink, gui: &'a GuiContext, popups: &'a mut Vec<Dialog>) -> Self {
        Self { link, gui, popups }
    }

    /// Ask the dialog for a re-layout on its next update.
    pub fn request_layout(&self) {
        self.link.request_layout();
    }

    pub fn link(&self) -> &DialogLink {
        self.link
    }

    /// Close the dialog this event was dispatched in.
    pub fn close_dialog(&self) {
        if self.link.close() {
            tracing::debug!("dialog closed from handler");
        }
    }

    pub fn gui(&self) -> &GuiContext {
        self.gui
    }

    /// Current window size.
    pub fn window(&self) -> Size {
        self.gui.window()
    }

    /// Register a popup dialog above the current one. It starts receiving
    /// input once the current dispatch returns.
    pub fn open_popup(&mut self, dialog: Dialog) -> DialogHandle {
        let handle = dialog.handle();
        tracing::debug!("popup opened");
        self.popups.push(dialog);
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_requests_layout() {
        let handle = DialogHandle::new();
        let link = handle.link();
        assert!(!handle.needs_layout());
        assert!(link.request_layout());
        assert!(handle.take_needs_layout());
        assert!(!handle.needs_layout());
    }

    #[test]
    fn test_link_outlives_dialog() {
        let handle = DialogHandle::new();
        let link = handle.link();
        drop(handle);
        assert!(!link.is_alive());
        assert!(!link.request_layout());
    }

    #[test]
    fn test_close_is_idempotent() {
        let handle = DialogHandle::new();
        assert!(handle.close());
        assert!(!handle.close());
        assert!(handle.is_closed());
    }

    #[test]
    fn test_attach_reports_moves() {
        let a = DialogHandle::new();
        let b = DialogHandle::new();
        let mut base = WidgetBase::new();
        assert!(!base.attach(&a.link()));
        assert!(!base.attach(&a.link()));
        assert!(base.attach(&b.link()));
        base.request_layout();
        assert!(b.needs_layout());
        assert!(!a.needs_layout());
    }
}
