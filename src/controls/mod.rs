//! Controls - interactive widgets built on the control contract.
//!
//! - [`Button`] - pressed/up/highlight skins, fires on release inside
//! - [`Checkbox`] - two-state toggle with a caption
//! - [`Slider`] - value over a range, optionally snapped to steps
//! - [`Input`] - single-line text field with a blinking caret
//! - [`Menu`] - list of options with single selection
//! - [`Dropdown`] - shows one option, picks another from a popup menu
//!
//! Every control regenerates its skin lazily: a state change drops the
//! affected graphics and asks the dialog for a layout, and the next size
//! pass creates them again under the new theme key.

mod button;
mod checkbox;
mod dropdown;
mod input;
mod menu;
mod slider;

pub use button::Button;
pub use checkbox::Checkbox;
pub use dropdown::Dropdown;
pub use input::{BLINK_INTERVAL, Input};
pub use menu::Menu;
pub use slider::{Slider, SliderOptions};

use crate::engine::EventCtx;
use crate::theme::Theme;
use crate::types::Color;

/// Fired by a button click.
pub type ClickCallback = Box<dyn FnMut(&mut EventCtx<'_>)>;

/// Fired with a checkbox's new state.
pub type ToggleCallback = Box<dyn FnMut(bool, &mut EventCtx<'_>)>;

/// Fired with a slider's committed value.
pub type SetCallback = Box<dyn FnMut(f32, &mut EventCtx<'_>)>;

/// Fired with committed text or a chosen option.
pub type TextCallback = Box<dyn FnMut(&str, &mut EventCtx<'_>)>;

/// Skin color for a control's main graphic.
pub(crate) fn skin_color(theme: &Theme, path: &[&str], disabled: bool) -> Color {
    if disabled { theme.disabled_color(path) } else { theme.gui_color(path) }
}
