//! Scrollbar - a fractional position over a content extent.
//!
//! `pos` runs from 0 (start) to `1 - bar_width` (end) where
//! `bar_width = viewport / extent`. Every interaction (dragging, paging,
//! end buttons, the wheel) goes through the same clamped setter, so
//! `0 <= pos` and `pos + bar_width <= 1` always hold.
//!
//! Vertical bars start at the top: `pos = 0` shows the top of the content.

use tracing::trace;

use crate::engine::{Control, ControlState, EventCtx, Node, SizeCtx, WidgetBase};
use crate::event::{Capabilities, Event, Handled};
use crate::theme::GraphicElement;
use crate::types::{Rect, size};

/// Autoscroll speed of the end buttons, in track pixels per second.
pub const STEP_SPEED: f32 = 50.0;

/// Content pixels moved per wheel notch.
pub const WHEEL_STEP: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    fn path(self) -> &'static [&'static str] {
        match self {
            Orientation::Horizontal => &["hscrollbar"],
            Orientation::Vertical => &["vscrollbar"],
        }
    }

    /// Start and end button keys, then their at-limit variants.
    fn keys(self) -> [&'static str; 4] {
        match self {
            Orientation::Horizontal => ["image-left", "image-right", "image-leftmax", "image-rightmax"],
            Orientation::Vertical => ["image-up", "image-down", "image-upmax", "image-downmax"],
        }
    }
}

#[derive(Debug, Default)]
struct Parts {
    start: Option<GraphicElement>,
    space: Option<GraphicElement>,
    bar: Option<GraphicElement>,
    end: Option<GraphicElement>,
}

/// Horizontal or vertical scrollbar with end buttons, a track and a bar.
#[derive(Debug)]
pub struct Scrollbar {
    base: WidgetBase,
    state: ControlState,
    orientation: Orientation,
    pos: f32,
    bar_width: f32,
    length: i32,
    extent: i32,
    start_len: i32,
    end_len: i32,
    dragging: bool,
    step: i32,
    parts: Parts,
    /// `(at_start, at_end)` when the button images were generated.
    drawn_limits: (bool, bool),
}

impl Scrollbar {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            base: WidgetBase::new(),
            state: ControlState::new(),
            orientation,
            pos: 0.0,
            bar_width: 0.5,
            length: 0,
            extent: 0,
            start_len: 0,
            end_len: 0,
            dragging: false,
            step: 0,
            parts: Parts::default(),
            drawn_limits: (true, false),
        }
    }

    pub fn horizontal() -> Self {
        Self::new(Orientation::Horizontal)
    }

    pub fn vertical() -> Self {
        Self::new(Orientation::Vertical)
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn pos(&self) -> f32 {
        self.pos
    }

    pub fn bar_width(&self) -> f32 {
        self.bar_width
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Size the bar for a viewport over a content extent. The scrollbar
    /// itself spans `viewport` pixels.
    pub fn set(&mut self, viewport: i32, extent: i32) {
        self.length = viewport;
        self.extent = extent;
        match self.orientation {
            Orientation::Horizontal => self.base.rect.width = viewport,
            Orientation::Vertical => self.base.rect.height = viewport,
        }
        self.bar_width = if extent > 0 { (viewport as f32 / extent as f32).clamp(0.0, 1.0) } else { 1.0 };
        self.set_pos(self.pos);
    }

    /// Content offset in pixels for the current position.
    pub fn get(&self, extent: i32) -> i32 {
        (self.pos * extent as f32) as i32
    }

    /// The one clamped setter every interaction goes through.
    pub fn set_pos(&mut self, pos: f32) {
        let max = (1.0 - self.bar_width).max(0.0);
        self.pos = if pos.is_finite() { pos.clamp(0.0, max) } else { 0.0 };
    }

    /// Move the bar by `delta` pixels of track.
    pub fn drag_bar(&mut self, delta: f32) {
        let space = self.space_len();
        if space > 0 {
            self.set_pos(self.pos + delta / space as f32);
        }
    }

    /// Move the content by `delta` pixels.
    pub fn scroll_pixels(&mut self, delta: f32) {
        if self.extent > 0 {
            self.set_pos(self.pos + delta / self.extent as f32);
        }
    }

    fn limits(&self) -> (bool, bool) {
        (self.pos <= 0.0, self.pos >= 1.0 - self.bar_width)
    }

    fn space_len(&self) -> i32 {
        (self.length - self.start_len - self.end_len).max(0)
    }

    // =========================================================================
    // Regions
    // =========================================================================

    pub fn start_region(&self) -> Rect {
        let Rect { x, y, width, height } = self.base.rect;
        match self.orientation {
            Orientation::Horizontal => Rect::new(x, y, self.start_len, height),
            Orientation::Vertical => Rect::new(x, y + height - self.start_len, width, self.start_len),
        }
    }

    pub fn end_region(&self) -> Rect {
        let Rect { x, y, width, height } = self.base.rect;
        match self.orientation {
            Orientation::Horizontal => Rect::new(x + width - self.end_len, y, self.end_len, height),
            Orientation::Vertical => Rect::new(x, y, width, self.end_len),
        }
    }

    pub fn space_region(&self) -> Rect {
        let Rect { x, y, width, height } = self.base.rect;
        let space = self.space_len();
        match self.orientation {
            Orientation::Horizontal => Rect::new(x + self.start_len, y, space, height),
            Orientation::Vertical => Rect::new(x, y + self.end_len, width, space),
        }
    }

    pub fn bar_region(&self) -> Rect {
        let space = self.space_region();
        match self.orientation {
            Orientation::Horizontal => {
                let len = space.width as f32;
                Rect::new(space.x + (self.pos * len) as i32, space.y, (self.bar_width * len) as i32, space.height)
            }
            Orientation::Vertical => {
                let len = space.height as f32;
                let top = space.top() - (self.pos * len) as i32;
                let bar = (self.bar_width * len) as i32;
                Rect::new(space.x, top - bar, space.width, bar)
            }
        }
    }

    /// Position changed: regenerate the button images if a limit flipped,
    /// then ask for a layout.
    fn moved(&mut self, ctx: &EventCtx<'_>) {
        if self.limits() != self.drawn_limits {
            self.delete();
        }
        ctx.request_layout();
        trace!(pos = self.pos, "scrollbar moved");
    }

    fn press(&mut self, x: i32, y: i32, ctx: &EventCtx<'_>) -> Handled {
        if self.space_region().contains(x, y) {
            let bar = self.bar_region();
            if bar.contains(x, y) {
                self.dragging = true;
                return Handled::Yes;
            }
            let before = match self.orientation {
                Orientation::Horizontal => x < bar.x,
                Orientation::Vertical => y >= bar.top(),
            };
            let page = if before { -self.bar_width } else { self.bar_width };
            self.set_pos(self.pos + page);
            self.moved(ctx);
            return Handled::Yes;
        }
        if self.start_region().contains(x, y) {
            self.step = -1;
        } else if self.end_region().contains(x, y) {
            self.step = 1;
        }
        Handled::from(self.step != 0)
    }
}

impl Node for Scrollbar {
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
        let path = self.orientation.path();
        let color = ctx.theme.gui_color(path);
        let group = &ctx.layers.foreground;
        let [start, end, start_max, end_max] = self.orientation.keys();
        let (at_start, at_end) = self.limits();

        if self.parts.start.is_none() {
            let key = if at_start { start_max } else { start };
            self.parts.start = Some(ctx.image(path, key, color, group));
            self.parts.space = Some(ctx.image(path, "image-space", color, group));
            self.parts.bar = Some(ctx.image(path, "image-bar", color, group));
            let key = if at_end { end_max } else { end };
            self.parts.end = Some(ctx.image(path, key, color, group));
            self.drawn_limits = (at_start, at_end);
        }

        let natural = |part: &Option<GraphicElement>| part.as_ref().map_or(size(0, 0), |g| g.natural_size());
        let (start, end) = (natural(&self.parts.start), natural(&self.parts.end));
        let dims = match self.orientation {
            Orientation::Horizontal => {
                self.start_len = start.width;
                self.end_len = end.width;
                size(self.length, start.height)
            }
            Orientation::Vertical => {
                self.start_len = start.height;
                self.end_len = end.height;
                size(start.width, self.length)
            }
        };
        self.base.set_size(dims);
    }

    fn layout(&mut self, x: i32, y: i32) {
        self.base.set_position(x, y);
        let regions = [self.start_region(), self.space_region(), self.bar_region(), self.end_region()];
        let parts = [&mut self.parts.start, &mut self.parts.space, &mut self.parts.bar, &mut self.parts.end];
        for (part, region) in parts.into_iter().zip(regions) {
            if let Some(graphic) = part {
                graphic.update(region);
            }
        }
    }

    fn delete(&mut self) {
        self.parts = Parts::default();
    }

    crate::leaf_control!();
}

impl Control for Scrollbar {
    fn state(&self) -> &ControlState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ControlState {
        &mut self.state
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::PRESS | Capabilities::DRAG | Capabilities::SCROLL | Capabilities::TICK
    }

    fn handle(&mut self, event: &Event, ctx: &mut EventCtx<'_>) -> Handled {
        match *event {
            Event::PointerDown { x, y, .. } => self.press(x, y, ctx),
            Event::PointerUp { .. } => {
                self.dragging = false;
                self.step = 0;
                Handled::Yes
            }
            Event::PointerDrag { dx, dy, .. } if self.dragging => {
                let delta = match self.orientation {
                    Orientation::Horizontal => dx,
                    Orientation::Vertical => -dy,
                };
                self.drag_bar(delta as f32);
                self.moved(ctx);
                Handled::Yes
            }
            Event::Scroll { scroll_x, scroll_y, .. } => {
                let notches = match self.orientation {
                    Orientation::Vertical => -scroll_y,
                    Orientation::Horizontal if scroll_x != 0.0 => scroll_x,
                    Orientation::Horizontal => -scroll_y,
                };
                if notches == 0.0 {
                    return Handled::No;
                }
                self.scroll_pixels(notches * WHEEL_STEP);
                self.moved(ctx);
                Handled::Yes
            }
            Event::Tick { dt } if self.step != 0 => {
                self.drag_bar(self.step as f32 * STEP_SPEED * dt);
                self.moved(ctx);
                Handled::Yes
            }
            _ => Handled::No,
        }
    }
}
