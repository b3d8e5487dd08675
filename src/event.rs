//! Event types.
//!
//! A closed set of input and lifecycle events. The platform feeds the
//! input variants into a [`Dialog`](crate::dialog::Dialog) (usually through
//! [`Gui`](crate::dialog::Gui)); the event manager synthesizes the focus and
//! highlight variants and forwards everything to at most one control.
//!
//! Controls answer with [`Handled`].

use std::fmt;

// =============================================================================
// Modifier and button masks
// =============================================================================

bitflags::bitflags! {
    /// Keyboard modifier state as a bitmask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
        const META = 1 << 3;
    }
}

bitflags::bitflags! {
    /// Set of mouse buttons held during a drag.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MouseButtons: u8 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const MIDDLE = 1 << 2;
    }
}

bitflags::bitflags! {
    /// Which event families a control wants delivered to `handle`.
    ///
    /// The manager always tracks hover and focus state; this mask only
    /// filters what reaches the control's handler.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u16 {
        const PRESS = 1 << 0;
        const DRAG = 1 << 1;
        const MOTION = 1 << 2;
        const SCROLL = 1 << 3;
        const KEY = 1 << 4;
        const TEXT = 1 << 5;
        const FOCUS = 1 << 6;
        const HIGHLIGHT = 1 << 7;
        const TICK = 1 << 8;
    }
}

/// Mouse button identity for press/release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

impl From<MouseButton> for MouseButtons {
    fn from(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => MouseButtons::LEFT,
            MouseButton::Right => MouseButtons::RIGHT,
            MouseButton::Middle => MouseButtons::MIDDLE,
        }
    }
}

// =============================================================================
// Keys
// =============================================================================

/// Keys the toolkit reacts to. Printable input arrives separately as
/// [`Event::Text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Tab,
    Enter,
    Escape,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Char(char),
    Function(u8),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{c}"),
            Key::Function(n) => write!(f, "F{n}"),
            other => write!(f, "{other:?}"),
        }
    }
}

// =============================================================================
// Event
// =============================================================================

/// Every event a control can receive.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    PointerMove { x: i32, y: i32, dx: i32, dy: i32 },
    PointerDown { x: i32, y: i32, button: MouseButton, modifiers: Modifiers },
    PointerUp { x: i32, y: i32, button: MouseButton, modifiers: Modifiers },
    PointerDrag {
        x: i32,
        y: i32,
        dx: i32,
        dy: i32,
        buttons: MouseButtons,
        modifiers: Modifiers,
    },
    Scroll { x: i32, y: i32, scroll_x: f32, scroll_y: f32 },
    KeyDown { key: Key, modifiers: Modifiers },
    KeyUp { key: Key, modifiers: Modifiers },
    Text(String),
    FocusGained,
    FocusLost,
    HighlightGained,
    HighlightLost,
    Tick { dt: f32 },
    Resize { width: i32, height: i32 },
}

impl Event {
    /// Left-button press at a point with no modifiers.
    pub fn press(x: i32, y: i32) -> Self {
        Event::PointerDown { x, y, button: MouseButton::Left, modifiers: Modifiers::empty() }
    }

    /// Left-button release at a point with no modifiers.
    pub fn release(x: i32, y: i32) -> Self {
        Event::PointerUp { x, y, button: MouseButton::Left, modifiers: Modifiers::empty() }
    }

    /// Pointer motion to a point.
    pub fn motion(x: i32, y: i32) -> Self {
        Event::PointerMove { x, y, dx: 0, dy: 0 }
    }

    /// Left-button drag by a delta, ending at a point.
    pub fn drag(x: i32, y: i32, dx: i32, dy: i32) -> Self {
        Event::PointerDrag {
            x,
            y,
            dx,
            dy,
            buttons: MouseButtons::LEFT,
            modifiers: Modifiers::empty(),
        }
    }

    /// Key press with no modifiers.
    pub fn key(key: Key) -> Self {
        Event::KeyDown { key, modifiers: Modifiers::empty() }
    }

    /// Key press with modifiers.
    pub fn key_with(key: Key, modifiers: Modifiers) -> Self {
        Event::KeyDown { key, modifiers }
    }

    /// Pointer position carried by the event, if any.
    pub fn position(&self) -> Option<(i32, i32)> {
        match *self {
            Event::PointerMove { x, y, .. }
            | Event::PointerDown { x, y, .. }
            | Event::PointerUp { x, y, .. }
            | Event::PointerDrag { x, y, .. }
            | Event::Scroll { x, y, .. } => Some((x, y)),
            _ => None,
        }
    }

    /// The capability a control must declare to receive this event.
    pub fn capability(&self) -> Capabilities {
        match self {
            Event::PointerDown { .. } | Event::PointerUp { .. } => Capabilities::PRESS,
            Event::PointerDrag { .. } => Capabilities::DRAG,
            Event::PointerMove { .. } => Capabilities::MOTION,
            Event::Scroll { .. } => Capabilities::SCROLL,
            Event::KeyDown { .. } | Event::KeyUp { .. } => Capabilities::KEY,
            Event::Text(_) => Capabilities::TEXT,
            Event::FocusGained | Event::FocusLost => Capabilities::FOCUS,
            Event::HighlightGained | Event::HighlightLost => Capabilities::HIGHLIGHT,
            Event::Tick { .. } => Capabilities::TICK,
            Event::Resize { .. } => Capabilities::empty(),
        }
    }
}

/// Result of offering an event to a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Handled {
    Yes,
    #[default]
    No,
}

impl Handled {
    #[inline]
    pub fn is_handled(self) -> bool {
        self == Handled::Yes
    }

    /// `Yes` if either side handled the event.
    #[inline]
    pub fn or(self, other: Handled) -> Handled {
        if self.is_handled() { self } else { other }
    }
}

impl From<bool> for Handled {
    fn from(consumed: bool) -> Self {
        if consumed { Handled::Yes } else { Handled::No }
    }
}
