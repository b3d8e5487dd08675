//! Input Module - crossterm bridge
//!
//! Converts crossterm's terminal events into toolkit [`Event`]s so a
//! terminal backend can drive dialogs. Terminal cells map to pixels through a
//! configurable cell size, and rows are flipped into the y-up convention.
//!
//! # API
//!
//! - `InputBridge::convert` - Convert one crossterm event into zero or more events
//! - `poll_events` - Poll the terminal and convert whatever arrived
//! - `enable_mouse` / `disable_mouse` - Toggle terminal mouse capture
//!
//! # Example
//!
//! ```ignore
//! use spark_gui::input::{InputBridge, poll_events};
//!
//! let mut bridge = InputBridge::new(80, 24);
//! loop {
//!     for event in poll_events(&mut bridge, Duration::from_millis(16))? {
//!         gui.dispatch(&event);
//!     }
//!     gui.update(0.016);
//! }
//! ```

use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyCode,
    KeyEvent as CrosstermKeyEvent, KeyEventKind, KeyModifiers,
    MouseButton as CrosstermMouseButton, MouseEvent as CrosstermMouseEvent, MouseEventKind,
    poll, read,
};
use crossterm::execute;
use std::io::stdout;
use std::time::Duration;

use crate::event::{Event, Key, Modifiers, MouseButton};
use crate::types::{Point, Size, point, size};

// =============================================================================
// BRIDGE
// =============================================================================

/// Stateful converter from terminal cells to toolkit pixels.
///
/// Remembers the last pointer position so motion and drag events carry
/// deltas, which crossterm does not report.
#[derive(Debug, Clone)]
pub struct InputBridge {
    cell: Size,
    window: Size,
    last_pointer: Option<Point>,
}

impl InputBridge {
    /// Bridge for a terminal of `columns` x `rows` with one pixel per cell.
    pub fn new(columns: u16, rows: u16) -> Self {
        Self::with_cell_size(columns, rows, size(1, 1))
    }

    /// Bridge that scales each cell to `cell` pixels.
    pub fn with_cell_size(columns: u16, rows: u16, cell: Size) -> Self {
        let cell = size(cell.width.max(1), cell.height.max(1));
        Self {
            cell,
            window: size(columns as i32 * cell.width, rows as i32 * cell.height),
            last_pointer: None,
        }
    }

    /// Window size in pixels.
    pub fn window(&self) -> Size {
        self.window
    }

    /// Pixel position of the center of a terminal cell, y-up.
    pub fn cell_to_pixel(&self, column: u16, row: u16) -> Point {
        let x = column as i32 * self.cell.width + self.cell.width / 2;
        let y = self.window.height - 1 - (row as i32 * self.cell.height + self.cell.height / 2);
        point(x, y)
    }

    /// Convert a crossterm event. Some keys produce both a key press and a
    /// text event, so the result is a list.
    pub fn convert(&mut self, event: CrosstermEvent) -> Vec<Event> {
        match event {
            CrosstermEvent::Key(key) => convert_key_event(key),
            CrosstermEvent::Mouse(mouse) => self.convert_mouse_event(mouse).into_iter().collect(),
            CrosstermEvent::Resize(columns, rows) => {
                self.window = size(columns as i32 * self.cell.width, rows as i32 * self.cell.height);
                vec![Event::Resize { width: self.window.width, height: self.window.height }]
            }
            CrosstermEvent::Paste(text) => vec![Event::Text(text)],
            CrosstermEvent::FocusGained | CrosstermEvent::FocusLost => Vec::new(),
        }
    }

    /// Convert a crossterm mouse event.
    pub fn convert_mouse_event(&mut self, event: CrosstermMouseEvent) -> Option<Event> {
        let Point { x, y } = self.cell_to_pixel(event.column, event.row);
        let modifiers = convert_modifiers(event.modifiers);
        let (dx, dy) = match self.last_pointer {
            Some(last) => (x - last.x, y - last.y),
            None => (0, 0),
        };
        self.last_pointer = Some(point(x, y));

        let converted = match event.kind {
            MouseEventKind::Down(btn) => {
                Event::PointerDown { x, y, button: convert_mouse_button(btn), modifiers }
            }
            MouseEventKind::Up(btn) => {
                Event::PointerUp { x, y, button: convert_mouse_button(btn), modifiers }
            }
            MouseEventKind::Drag(btn) => Event::PointerDrag {
                x,
                y,
                dx,
                dy,
                buttons: convert_mouse_button(btn).into(),
                modifiers,
            },
            MouseEventKind::Moved => Event::PointerMove { x, y, dx, dy },
            MouseEventKind::ScrollUp => Event::Scroll { x, y, scroll_x: 0.0, scroll_y: 1.0 },
            MouseEventKind::ScrollDown => Event::Scroll { x, y, scroll_x: 0.0, scroll_y: -1.0 },
            MouseEventKind::ScrollLeft => Event::Scroll { x, y, scroll_x: -1.0, scroll_y: 0.0 },
            MouseEventKind::ScrollRight => Event::Scroll { x, y, scroll_x: 1.0, scroll_y: 0.0 },
        };
        Some(converted)
    }
}

// =============================================================================
// KEY CONVERSION
// =============================================================================

/// Convert a crossterm key event.
///
/// Printable characters without Ctrl/Alt also yield an [`Event::Text`].
pub fn convert_key_event(event: CrosstermKeyEvent) -> Vec<Event> {
    let mut modifiers = convert_modifiers(event.modifiers);
    let key = match event.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => {
            modifiers |= Modifiers::SHIFT;
            Key::Tab
        }
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Esc => Key::Escape,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::F(n) => Key::Function(n),
        _ => return Vec::new(),
    };

    match event.kind {
        KeyEventKind::Release => vec![Event::KeyUp { key, modifiers }],
        KeyEventKind::Press | KeyEventKind::Repeat => {
            let mut events = vec![Event::KeyDown { key, modifiers }];
            if let Key::Char(c) = key {
                if !modifiers.intersects(Modifiers::CTRL | Modifiers::ALT) {
                    events.push(Event::Text(c.to_string()));
                }
            }
            events
        }
    }
}

fn convert_mouse_button(btn: CrosstermMouseButton) -> MouseButton {
    match btn {
        CrosstermMouseButton::Left => MouseButton::Left,
        CrosstermMouseButton::Right => MouseButton::Right,
        CrosstermMouseButton::Middle => MouseButton::Middle,
    }
}

fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    let mut out = Modifiers::empty();
    out.set(Modifiers::SHIFT, mods.contains(KeyModifiers::SHIFT));
    out.set(Modifiers::CTRL, mods.contains(KeyModifiers::CONTROL));
    out.set(Modifiers::ALT, mods.contains(KeyModifiers::ALT));
    out.set(Modifiers::META, mods.contains(KeyModifiers::META) || mods.contains(KeyModifiers::SUPER));
    out
}

// =============================================================================
// TERMINAL I/O
// =============================================================================

/// Poll for terminal input and convert everything available.
pub fn poll_events(bridge: &mut InputBridge, timeout: Duration) -> std::io::Result<Vec<Event>> {
    let mut events = Vec::new();
    let mut wait = timeout;
    while poll(wait)? {
        events.extend(bridge.convert(read()?));
        wait = Duration::ZERO;
    }
    Ok(events)
}

/// Enable terminal mouse capture.
pub fn enable_mouse() -> std::io::Result<()> {
    execute!(stdout(), EnableMouseCapture)
}

/// Disable terminal mouse capture.
pub fn disable_mouse() -> std::io::Result<()> {
    execute!(stdout(), DisableMouseCapture)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> CrosstermKeyEvent {
        CrosstermKeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> CrosstermMouseEvent {
        CrosstermMouseEvent { kind, column, row, modifiers: KeyModifiers::empty() }
    }

    #[test]
    fn test_convert_mouse_down_flips_rows() {
        let mut bridge = InputBridge::new(80, 24);
        let event = bridge.convert_mouse_event(mouse(MouseEventKind::Down(CrosstermMouseButton::Left), 10, 0));
        assert_eq!(event, Some(Event::press(10, 23)));
    }

    #[test]
    fn test_convert_mouse_drag_carries_delta() {
        let mut bridge = InputBridge::new(80, 24);
        bridge.convert_mouse_event(mouse(MouseEventKind::Down(CrosstermMouseButton::Left), 10, 10));
        let event = bridge.convert_mouse_event(mouse(MouseEventKind::Drag(CrosstermMouseButton::Left), 12, 9));
        assert_eq!(event, Some(Event::drag(12, 14, 2, 1)));
    }

    #[test]
    fn test_convert_scroll_directions() {
        let mut bridge = InputBridge::new(80, 24);
        let up = bridge.convert_mouse_event(mouse(MouseEventKind::ScrollUp, 0, 23));
        assert_eq!(up, Some(Event::Scroll { x: 0, y: 0, scroll_x: 0.0, scroll_y: 1.0 }));
        let down = bridge.convert_mouse_event(mouse(MouseEventKind::ScrollDown, 0, 23));
        assert_eq!(down, Some(Event::Scroll { x: 0, y: 0, scroll_x: 0.0, scroll_y: -1.0 }));
    }

    #[test]
    fn test_cell_size_scaling() {
        let bridge = InputBridge::with_cell_size(10, 10, size(8, 16));
        assert_eq!(bridge.window(), size(80, 160));
        assert_eq!(bridge.cell_to_pixel(0, 0), point(4, 160 - 1 - 8));
    }

    #[test]
    fn test_convert_char_emits_text() {
        let events = convert_key_event(key(KeyCode::Char('a'), KeyModifiers::empty()));
        assert_eq!(events, vec![Event::key(Key::Char('a')), Event::Text("a".into())]);
    }

    #[test]
    fn test_convert_ctrl_char_has_no_text() {
        let events = convert_key_event(key(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(events, vec![Event::key_with(Key::Char('c'), Modifiers::CTRL)]);
    }

    #[test]
    fn test_convert_backtab_is_shift_tab() {
        let events = convert_key_event(key(KeyCode::BackTab, KeyModifiers::empty()));
        assert_eq!(events, vec![Event::key_with(Key::Tab, Modifiers::SHIFT)]);
    }

    #[test]
    fn test_convert_release() {
        let mut event = key(KeyCode::Enter, KeyModifiers::empty());
        event.kind = KeyEventKind::Release;
        assert_eq!(
            convert_key_event(event),
            vec![Event::KeyUp { key: Key::Enter, modifiers: Modifiers::empty() }]
        );
    }

    #[test]
    fn test_convert_resize() {
        let mut bridge = InputBridge::new(80, 24);
        let events = bridge.convert(CrosstermEvent::Resize(100, 30));
        assert_eq!(events, vec![Event::Resize { width: 100, height: 30 }]);
        assert_eq!(bridge.window(), size(100, 30));
    }
}
