//! Slider - a horizontal value picker.
//!
//! The knob position is kept as a fraction of the track in `[0, 1]` and
//! mapped onto `[min, max]` when the value is read. With `steps` set, the
//! knob snaps to `steps + 1` evenly spaced marks when released.

use tracing::debug;

use super::{SetCallback, skin_color};
use crate::engine::{Control, ControlState, EventCtx, Node, SizeCtx, Value, WidgetBase};
use crate::error::{GuiError, Result};
use crate::event::{Capabilities, Event, Handled};
use crate::theme::GraphicElement;
use crate::types::{Insets, Point, Rect, insets, point, size};

const PATH: &[&str] = &["slider"];

/// Range and track length for a [`Slider`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderOptions {
    pub value: f32,
    pub min: f32,
    pub max: f32,
    /// Number of intervals to snap to; `None` slides smoothly.
    pub steps: Option<u32>,
    /// Minimum length of the track, not counting the theme padding.
    pub width: i32,
}

impl Default for SliderOptions {
    fn default() -> Self {
        Self { value: 0.0, min: 0.0, max: 1.0, steps: None, width: 100 }
    }
}

pub struct Slider {
    base: WidgetBase,
    state: ControlState,
    options: SliderOptions,
    pos: f32,
    is_dragging: bool,
    on_set: Option<SetCallback>,
    padding: Insets,
    knob_offset: Point,
    step_offset: Point,
    bar: Option<GraphicElement>,
    knob: Option<GraphicElement>,
    markers: Vec<GraphicElement>,
}

impl std::fmt::Debug for Slider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slider")
            .field("options", &self.options)
            .field("pos", &self.pos)
            .field("rect", &self.base.rect)
            .finish_non_exhaustive()
    }
}

impl Slider {
    /// Fails when `min` is not below `max`.
    pub fn new(options: SliderOptions) -> Result<Self> {
        let SliderOptions { min, max, value, .. } = options;
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(GuiError::EmptyRange { min, max });
        }
        Ok(Self {
            base: WidgetBase::new(),
            state: ControlState::new(),
            options,
            pos: ((value - min) / (max - min)).clamp(0.0, 1.0),
            is_dragging: false,
            on_set: None,
            padding: insets(0, 0, 0, 0),
            knob_offset: point(0, 0),
            step_offset: point(0, 0),
            bar: None,
            knob: None,
            markers: Vec::new(),
        })
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.state.set_id(id);
        self
    }

    pub fn on_set(mut self, callback: impl FnMut(f32, &mut EventCtx<'_>) + 'static) -> Self {
        self.on_set = Some(Box::new(callback));
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.state.set_disabled_flag(disabled);
        self
    }

    /// Knob position as a fraction of the track.
    pub fn pos(&self) -> f32 {
        self.pos
    }

    pub fn get_value(&self) -> f32 {
        let SliderOptions { min, max, .. } = self.options;
        min + (max - min) * self.pos
    }

    /// Move the knob to `value`, clamped into the range.
    pub fn set_value(&mut self, value: f32) {
        let SliderOptions { min, max, .. } = self.options;
        self.set_pos((value - min) / (max - min));
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    fn set_pos(&mut self, pos: f32) {
        self.pos = if pos.is_finite() { pos.clamp(0.0, 1.0) } else { 0.0 };
        self.place_knob();
    }

    fn track(&self) -> Option<Rect> {
        self.bar.as_ref().map(GraphicElement::content_region)
    }

    fn place_knob(&mut self) {
        let (Some(track), Some(knob)) = (self.track(), self.knob.as_mut()) else {
            return;
        };
        let x = track.x + (track.width as f32 * self.pos) as i32 + self.knob_offset.x;
        let y = track.y + self.knob_offset.y;
        knob.update(Rect::new(x, y, knob.width(), knob.height()));
    }

    fn snap_to_nearest(&mut self) {
        if let Some(steps) = self.options.steps.filter(|&s| s > 0) {
            let n = (self.pos * steps as f32 + 0.5).floor();
            self.set_pos(n / steps as f32);
        }
    }
}

impl Node for Slider {
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
        let color = skin_color(ctx.theme, PATH, self.state.is_disabled());
        if self.bar.is_none() {
            self.bar = Some(ctx.image(PATH, "image-bar", color, &ctx.layers.background));
            self.padding = ctx.theme.insets(PATH, "padding");
        }
        if self.knob.is_none() {
            self.knob = Some(ctx.image(PATH, "image-knob", color, &ctx.layers.highlight));
            self.knob_offset = ctx.theme.offset(PATH, "knob_offset");
        }
        if let Some(steps) = self.options.steps
            && self.markers.is_empty()
        {
            self.markers = (0..=steps)
                .map(|_| ctx.image(PATH, "image-step", color, &ctx.layers.foreground))
                .collect();
            self.step_offset = ctx.theme.offset(PATH, "step_offset");
        }

        let track = size(self.options.width, 0);
        let bar = self.bar.as_ref().map_or(track, |b| b.needed_size(track));
        let Insets { left, right, top, bottom } = self.padding;
        self.base.set_size(size(bar.width + left + right, bar.height + top + bottom));
    }

    fn layout(&mut self, x: i32, y: i32) {
        self.base.set_position(x, y);
        let Insets { left, right, top, bottom } = self.padding;
        let rect = self.base.rect;
        if let Some(bar) = &mut self.bar {
            bar.update(Rect::new(x + left, y + bottom, rect.width - left - right, rect.height - top - bottom));
        }
        self.place_knob();

        let Some(track) = self.track() else {
            return;
        };
        let count = self.markers.len();
        if count > 1 {
            let step = track.width as f32 / (count - 1) as f32;
            for (n, marker) in self.markers.iter_mut().enumerate() {
                let mx = (track.x as f32 + step * n as f32) as i32 + self.step_offset.x;
                marker.update(Rect::new(mx, track.y + self.step_offset.y, marker.width(), marker.height()));
            }
        }
    }

    fn delete(&mut self) {
        self.bar = None;
        self.knob = None;
        self.markers.clear();
    }

    fn teardown(&mut self) {
        self.delete();
        self.on_set = None;
    }

    fn is_expandable(&self) -> bool {
        true
    }

    fn expand(&mut self, width: i32, _height: i32) {
        let height = self.base.rect.height;
        self.base.set_size(size(width, height));
    }

    crate::leaf_control!();
}

impl Control for Slider {
    fn state(&self) -> &ControlState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ControlState {
        &mut self.state
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::PRESS | Capabilities::DRAG
    }

    fn handle(&mut self, event: &Event, ctx: &mut EventCtx<'_>) -> Handled {
        if self.is_disabled() {
            return Handled::No;
        }
        match event {
            Event::PointerDown { x, .. } => {
                self.is_dragging = true;
                if let Some(track) = self.track().filter(|t| t.width > 0) {
                    self.set_pos((x - track.x) as f32 / track.width as f32);
                }
                Handled::Yes
            }
            Event::PointerDrag { dx, .. } if self.is_dragging => {
                if let Some(track) = self.track().filter(|t| t.width > 0) {
                    self.set_pos(self.pos + *dx as f32 / track.width as f32);
                }
                Handled::Yes
            }
            Event::PointerUp { .. } if self.is_dragging => {
                self.is_dragging = false;
                self.snap_to_nearest();
                let value = self.get_value();
                debug!(value, "slider set");
                if let Some(callback) = &mut self.on_set {
                    callback(value, ctx);
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
        Some(Value::Number(self.get_value()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;
    use std::cell::Cell;
    use std::rc::Rc;

    fn setup(options: SliderOptions) -> (Harness, Slider) {
        let h = Harness::new();
        let mut slider = Slider::new(options).unwrap();
        h.place(&mut slider, 0, 0);
        (h, slider)
    }

    #[test]
    fn test_empty_range_rejected() {
        let options = SliderOptions { min: 1.0, max: 1.0, ..Default::default() };
        assert_eq!(Slider::new(options).err(), Some(GuiError::EmptyRange { min: 1.0, max: 1.0 }));
        let options = SliderOptions { min: 0.0, max: f32::NAN, ..Default::default() };
        assert!(Slider::new(options).is_err());
    }

    #[test]
    fn test_track_and_knob_geometry() {
        let (_h, slider) = setup(SliderOptions { value: 5.0, max: 10.0, ..Default::default() });
        // 100px track plus 4/4/5/5 theme padding
        assert_eq!(slider.rect(), Rect::new(0, 0, 108, 16));
        assert_eq!(slider.track(), Some(Rect::new(4, 5, 100, 6)));
        assert_eq!(slider.knob.as_ref().map(GraphicElement::rect), Some(Rect::new(50, 0, 8, 16)));
    }

    #[test]
    fn test_press_drag_release_commits() {
        let committed = Rc::new(Cell::new(f32::NAN));
        let sink = committed.clone();
        let mut h = Harness::new();
        let mut slider = Slider::new(SliderOptions { max: 10.0, ..Default::default() })
            .unwrap()
            .on_set(move |v, _| sink.set(v));
        h.place(&mut slider, 0, 0);

        slider.handle(&Event::press(24, 8), &mut h.ctx());
        assert!((slider.pos() - 0.2).abs() < 1e-6);
        slider.handle(&Event::drag(54, 8, 30, 0), &mut h.ctx());
        assert!((slider.pos() - 0.5).abs() < 1e-6);
        slider.handle(&Event::drag(500, 8, 500, 0), &mut h.ctx());
        assert_eq!(slider.pos(), 1.0);
        slider.handle(&Event::release(500, 8), &mut h.ctx());
        assert_eq!(committed.get(), 10.0);
        assert!(!slider.is_dragging());
    }

    #[test]
    fn test_steps_snap_on_release() {
        let (mut h, mut slider) = setup(SliderOptions { steps: Some(4), ..Default::default() });
        assert_eq!(slider.markers.len(), 5);
        assert_eq!(slider.markers[2].rect().x, 4 + 50 - 1);

        slider.handle(&Event::press(4 + 33, 8), &mut h.ctx());
        slider.handle(&Event::release(4 + 33, 8), &mut h.ctx());
        assert_eq!(slider.pos(), 0.25);
        assert_eq!(slider.value(), Some(Value::Number(0.25)));
    }

    #[test]
    fn test_expand_widens_track() {
        let (h, mut slider) = setup(SliderOptions::default());
        slider.expand(208, 40);
        slider.layout(0, 0);
        assert_eq!(slider.rect().size(), size(208, 16));
        assert_eq!(slider.track().map(|t| t.width), Some(200));
        h.place(&mut slider, 0, 0);
        assert_eq!(slider.rect().width, 108);
    }

    #[test]
    fn test_disabled_slider_ignores_input() {
        let (mut h, mut slider) = setup(SliderOptions::default());
        slider.set_disabled(true);
        assert_eq!(slider.handle(&Event::press(50, 8), &mut h.ctx()), Handled::No);
        assert_eq!(slider.pos(), 0.0);
    }
}
