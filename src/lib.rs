//! # spark-gui
//!
//! Retained-mode dialog and widget toolkit over an immediate-mode drawing
//! surface.
//!
//! ## Architecture
//!
//! A [`Gui`](dialog::Gui) holds a stack of [`Dialog`](dialog::Dialog)s. Each
//! dialog owns a tree of [`Node`](engine::Node)s and an
//! [`EventManager`](state::EventManager) that routes input to the
//! [`Control`](engine::Control)s in that tree.
//!
//! Layout runs in two passes and is always deferred to the frame update:
//! ```text
//! state change → request_layout → Dialog::update → size (bottom-up) → layout (top-down) → rebuild controls
//! ```
//!
//! Widgets create their graphics lazily while sizing and release them on
//! `delete`, so a [`Surface`](renderer::Surface) only ever holds what is
//! visible. Theme lookups walk nested scopes and fall back to defaults;
//! they never fail.
//!
//! ## Modules
//!
//! - [`types`] - Geometry, colors, alignment and anchors
//! - [`event`] - Input and lifecycle events, capability masks
//! - [`renderer`] - Surface abstraction, paint groups, recording surface
//! - [`theme`] - Scoped theme data, image templates, graphic elements
//! - [`engine`] - Node and control contracts, dialog attachment
//! - [`primitives`] - Spacer, Graphic, Label
//! - [`layout`] - Packed, grid and free layouts
//! - [`frame`] - Wrapper, Frame, titled frames, folding sections
//! - [`scroll`] - Scrollbars and the clipping Scrollable
//! - [`state`] - Hover, focus and wheel routing
//! - [`dialog`] - Dialogs, the dialog stack, popups
//! - [`controls`] - Button, Checkbox, Slider, Input, Menu, Dropdown
//! - [`input`] - crossterm event bridge

pub mod controls;
pub mod dialog;
pub mod engine;
pub mod error;
pub mod event;
pub mod frame;
pub mod input;
pub mod layout;
pub mod primitives;
pub mod renderer;
pub mod scroll;
pub mod state;
pub mod theme;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used items
pub use types::*;

pub use error::{GuiError, Result};

pub use event::{Capabilities, Event, Handled, Key, Modifiers, MouseButton, MouseButtons};

pub use engine::{
    Control, ControlId, ControlState, DialogHandle, DialogLink, EventCtx, Node, SizeCtx, Value,
    Values, WidgetBase,
};

pub use renderer::{RecordingSurface, Surface, SurfaceRef};

pub use theme::{GraphicElement, ImageSpec, Scope, Theme, presets};

pub use dialog::{Dialog, DialogOptions, Gui, GuiContext, popup_confirm, popup_message};

/// Everything needed to build and drive dialogs.
pub mod prelude {
    pub use crate::controls::{Button, Checkbox, Dropdown, Input, Menu, Slider, SliderOptions};
    pub use crate::dialog::{Dialog, DialogOptions, Gui, GuiContext, popup_confirm, popup_message};
    pub use crate::engine::{Control, EventCtx, Node, Value};
    pub use crate::event::{Event, Handled, Key};
    pub use crate::frame::{FoldingSection, Frame, SectionHeader, TitleFrame, Wrapper};
    pub use crate::layout::{FreeLayout, GridLayout, HorizontalLayout, VerticalLayout};
    pub use crate::primitives::{Graphic, Label, Spacer};
    pub use crate::scroll::{Scrollable, ScrollableOptions};
    pub use crate::theme::{Theme, presets};
    pub use crate::types::{Anchor, Color, HAlign, Rect, VAlign, point, size};
}
