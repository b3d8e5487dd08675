//! Scrollable - a clipped viewport over content larger than itself.
//!
//! # Architecture
//!
//! The scrollable registers itself in its dialog's control list with its
//! viewport as the hit region, next to its scrollbars. Events the dialog
//! routes to it are dispatched again by a nested [`EventManager`] over the
//! content's own controls, so hover, focus and the wheel work the same way
//! inside as they do at the top level.
//!
//! Content draws into a private set of [`Layers`] below a clip group that
//! follows the viewport on every layout pass.
//!
//! ```text
//! dialog foreground
//!   └─ clip (viewport)
//!        ├─ panel
//!        ├─ background
//!        ├─ foreground
//!        └─ highlight
//! ```

use tracing::{debug, trace};

use super::{Orientation, Scrollbar};
use crate::engine::{
    Control, ControlEntry, ControlId, ControlState, EventCtx, FocusStep, Node, SizeCtx, Traversal, Values,
    WidgetBase,
};
use crate::error::{GuiError, Result};
use crate::event::{Capabilities, Event, Handled};
use crate::renderer::{Group, GroupRef, Layers};
use crate::state::{EventManager, PressOutcome, deliver};
use crate::types::{Rect, Size, size};

/// Viewport caps and scrollbar policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollableOptions {
    /// Widest the viewport gets; `None` leaves the axis unbounded.
    pub max_width: Option<i32>,
    /// Tallest the viewport gets; `None` leaves the axis unbounded.
    pub max_height: Option<i32>,
    /// Always show exactly `max_width` x `max_height`. Needs both caps.
    pub fixed_size: bool,
    pub always_show_scrollbars: bool,
}

/// Clips its content to a viewport and pans it with scrollbars.
pub struct Scrollable {
    base: WidgetBase,
    state: ControlState,
    content: Box<dyn Node>,
    options: ScrollableOptions,
    hbar: Option<Scrollbar>,
    vbar: Option<Scrollbar>,
    viewport: Rect,
    laid_offset: Size,
    clip: Option<GroupRef>,
    layers: Option<Layers>,
    manager: EventManager,
    stale: bool,
    has_focusables: bool,
}

impl std::fmt::Debug for Scrollable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scrollable")
            .field("rect", &self.base.rect)
            .field("viewport", &self.viewport)
            .field("options", &self.options)
            .field("hbar", &self.hbar.as_ref().map(Scrollbar::pos))
            .field("vbar", &self.vbar.as_ref().map(Scrollbar::pos))
            .finish()
    }
}

impl Scrollable {
    pub fn new(content: impl Node, options: ScrollableOptions) -> Result<Self> {
        Self::boxed(Box::new(content), options)
    }

    /// Fails when `fixed_size` is set without both caps.
    pub fn boxed(content: Box<dyn Node>, options: ScrollableOptions) -> Result<Self> {
        if options.fixed_size && (options.max_width.is_none() || options.max_height.is_none()) {
            return Err(GuiError::UnboundedFixedScrollable);
        }
        Ok(Self {
            base: WidgetBase::new(),
            state: ControlState::new(),
            content,
            options,
            hbar: None,
            vbar: None,
            viewport: Rect::default(),
            laid_offset: Size::default(),
            clip: None,
            layers: None,
            manager: EventManager::new(),
            stale: true,
            has_focusables: false,
        })
    }

    pub fn options(&self) -> &ScrollableOptions {
        &self.options
    }

    /// Visible part of the content, in screen coordinates.
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn content(&self) -> &dyn Node {
        &*self.content
    }

    pub fn content_mut(&mut self) -> &mut dyn Node {
        &mut *self.content
    }

    pub fn hscrollbar(&self) -> Option<&Scrollbar> {
        self.hbar.as_ref()
    }

    pub fn vscrollbar(&self) -> Option<&Scrollbar> {
        self.vbar.as_ref()
    }

    pub fn hscrollbar_mut(&mut self) -> Option<&mut Scrollbar> {
        self.hbar.as_mut()
    }

    pub fn vscrollbar_mut(&mut self) -> Option<&mut Scrollbar> {
        self.vbar.as_mut()
    }

    /// The nested manager routing input over the content.
    pub fn manager(&self) -> &EventManager {
        &self.manager
    }

    /// Layers the content draws into, once sized.
    pub fn layers(&self) -> Option<&Layers> {
        self.layers.as_ref()
    }

    /// How far the content is panned from its top-left corner.
    pub fn scroll_offset(&self) -> Size {
        let content = self.content.rect().size();
        size(
            self.hbar.as_ref().map_or(0, |b| b.get(content.width)),
            self.vbar.as_ref().map_or(0, |b| b.get(content.height)),
        )
    }

    /// Pan so the control's whole region lies inside the viewport. Returns
    /// true when a scrollbar moved; the new offset applies on the next
    /// layout.
    pub fn ensure_visible(&mut self, id: ControlId) -> bool {
        let Some(mut region) = self.manager.region_of(id) else {
            return false;
        };
        // regions date from the last layout; apply any scrolling since then
        let pending = self.scroll_offset();
        region.x -= pending.width - self.laid_offset.width;
        region.y += pending.height - self.laid_offset.height;
        let vp = self.viewport;
        let mut moved = false;

        if let Some(bar) = &mut self.vbar {
            let delta = if region.top() > vp.top() {
                vp.top() - region.top()
            } else if region.y < vp.y {
                vp.y - region.y
            } else {
                0
            };
            if delta != 0 {
                bar.scroll_pixels(delta as f32);
                moved = true;
            }
        }
        if let Some(bar) = &mut self.hbar {
            let delta = if region.x < vp.x {
                region.x - vp.x
            } else if region.right() > vp.right() {
                region.right() - vp.right()
            } else {
                0
            };
            if delta != 0 {
                bar.scroll_pixels(delta as f32);
                moved = true;
            }
        }

        if moved {
            trace!(?id, ?region, "scrolled into view");
            self.base.request_layout();
        }
        moved
    }

    fn bar_thickness(&self) -> Size {
        size(
            self.vbar.as_ref().map_or(0, |b| b.rect().width),
            self.hbar.as_ref().map_or(0, |b| b.rect().height),
        )
    }

    /// Create, resize or drop one scrollbar.
    fn sync_bar(
        slot: &mut Option<Scrollbar>,
        needed: bool,
        orientation: Orientation,
        viewport: i32,
        extent: i32,
        ctx: &SizeCtx<'_>,
    ) {
        if !needed {
            if slot.take().is_some() {
                debug!(?orientation, "scrollbar removed");
            }
            return;
        }
        let bar = slot.get_or_insert_with(|| Scrollbar::new(orientation));
        bar.set(viewport, extent.max(viewport));
        bar.size(Some(ctx));
    }

    /// Rebuild the nested control list after a layout pass.
    fn sync(&mut self, ctx: &mut EventCtx<'_>) {
        if self.stale {
            self.manager.rebuild(&mut *self.content, ctx);
            self.stale = false;
        }
    }

    fn drop_groups(&mut self) {
        self.clip = None;
        self.layers = None;
    }
}

impl Node for Scrollable {
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
        if self.clip.is_none() {
            let clip = Group::clip(self.viewport, &ctx.layers.foreground);
            self.layers = Some(Layers::new(&clip));
            self.clip = Some(clip);
            // children regenerate under the new groups
            self.content.delete();
        }
        if let Some(layers) = &self.layers {
            self.content.size(Some(&ctx.with_layers(layers)));
        }

        let natural = self.content.rect().size();
        let options = self.options;
        let caps = size(
            options.max_width.unwrap_or(natural.width),
            options.max_height.unwrap_or(natural.height),
        );
        let viewport = if options.fixed_size {
            caps
        } else {
            size(natural.width.min(caps.width), natural.height.min(caps.height))
        };
        let always = options.always_show_scrollbars;
        Self::sync_bar(
            &mut self.hbar,
            always || natural.width > viewport.width,
            Orientation::Horizontal,
            viewport.width,
            natural.width,
            ctx,
        );
        Self::sync_bar(
            &mut self.vbar,
            always || natural.height > viewport.height,
            Orientation::Vertical,
            viewport.height,
            natural.height,
            ctx,
        );

        self.viewport.width = viewport.width;
        self.viewport.height = viewport.height;
        let bars = self.bar_thickness();
        self.base.set_size(size(viewport.width + bars.width, viewport.height + bars.height));
        trace!(?natural, ?viewport, "scrollable size");
    }

    fn layout(&mut self, x: i32, y: i32) {
        self.base.set_position(x, y);
        let mut bottom = y;
        if let Some(bar) = &mut self.hbar {
            bar.layout(x, y);
            bottom += bar.rect().height;
        }
        if let Some(bar) = &mut self.vbar {
            bar.layout(x + self.viewport.width, bottom);
        }
        self.viewport.x = x;
        self.viewport.y = bottom;
        if let Some(clip) = &self.clip {
            clip.set_clip(self.viewport);
        }

        let offset = self.scroll_offset();
        self.laid_offset = offset;
        let content = self.content.rect().size();
        let content_y = bottom + self.viewport.height - content.height + offset.height;
        self.content.layout(x - offset.width, content_y);

        let mut entries = Vec::new();
        self.content.collect_controls(&mut entries);
        self.has_focusables = entries
            .iter()
            .any(|e| self.content.find_control(e.id).is_some_and(|c| c.is_focusable() && !c.is_disabled()));
        self.stale = true;
    }

    fn delete(&mut self) {
        self.content.delete();
        for bar in [&mut self.hbar, &mut self.vbar].into_iter().flatten() {
            bar.delete();
        }
        self.drop_groups();
    }

    fn teardown(&mut self) {
        self.content.teardown();
        self.hbar = None;
        self.vbar = None;
        self.drop_groups();
        self.manager.reset();
    }

    fn is_expandable(&self) -> bool {
        true
    }

    fn expand(&mut self, width: i32, height: i32) {
        let bars = self.bar_thickness();
        let mut viewport = self.viewport.size();
        if !self.options.fixed_size {
            let room = size(width - bars.width, height - bars.height);
            viewport.width = room.width.min(self.options.max_width.unwrap_or(i32::MAX)).max(viewport.width);
            viewport.height = room.height.min(self.options.max_height.unwrap_or(i32::MAX)).max(viewport.height);
        }
        if self.content.is_expandable() {
            let content = self.content.rect().size();
            self.content.expand(content.width.max(viewport.width), content.height.max(viewport.height));
        }
        let content = self.content.rect().size();
        if let Some(bar) = &mut self.hbar {
            bar.set(viewport.width, content.width.max(viewport.width));
        }
        if let Some(bar) = &mut self.vbar {
            bar.set(viewport.height, content.height.max(viewport.height));
        }
        self.viewport.width = viewport.width;
        self.viewport.height = viewport.height;
        self.base.set_size(size(
            width.max(viewport.width + bars.width),
            height.max(viewport.height + bars.height),
        ));
    }

    fn hit_test(&self, x: i32, y: i32) -> bool {
        self.viewport.contains(x, y)
    }

    fn children(&self) -> Vec<&dyn Node> {
        let mut out: Vec<&dyn Node> = vec![&*self.content];
        out.extend(self.hbar.iter().map(|b| b as &dyn Node));
        out.extend(self.vbar.iter().map(|b| b as &dyn Node));
        out
    }

    fn children_mut(&mut self) -> Vec<&mut dyn Node> {
        let mut out: Vec<&mut dyn Node> = vec![&mut *self.content];
        out.extend(self.hbar.iter_mut().map(|b| b as &mut dyn Node));
        out.extend(self.vbar.iter_mut().map(|b| b as &mut dyn Node));
        out
    }

    fn collect_controls(&self, out: &mut Vec<ControlEntry>) {
        for bar in self.hbar.iter().chain(self.vbar.iter()) {
            bar.collect_controls(out);
        }
        out.push(ControlEntry::new(self.control_id(), self.viewport));
    }

    fn find_control(&mut self, id: ControlId) -> Option<&mut dyn Control> {
        if self.control_id() == id {
            return Some(self);
        }
        if let Some(bar) = self.hbar.iter_mut().chain(self.vbar.iter_mut()).find(|b| b.control_id() == id) {
            return Some(bar);
        }
        self.content.find_control(id)
    }

    fn find_by_id(&mut self, id: &str) -> Option<&mut dyn Control> {
        if self.state.id() == Some(id) {
            return Some(self);
        }
        self.content.find_by_id(id)
    }

    fn collect_values(&self, out: &mut Values) {
        self.content.collect_values(out);
    }
}

impl Control for Scrollable {
    fn state(&self) -> &ControlState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ControlState {
        &mut self.state
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::all()
    }

    fn handle(&mut self, event: &Event, ctx: &mut EventCtx<'_>) -> Handled {
        self.sync(ctx);
        let content = &mut *self.content;
        let manager = &mut self.manager;
        match event {
            Event::PointerMove { .. } => manager.pointer_motion(content, event, ctx),
            Event::PointerDown { .. } => match manager.pointer_press(content, event, self.viewport, ctx) {
                PressOutcome::Outside => Handled::No,
                PressOutcome::Captured | PressOutcome::Unclaimed => Handled::Yes,
            },
            Event::PointerUp { .. } => manager.pointer_release(content, event, ctx),
            Event::PointerDrag { .. } => manager.pointer_drag(content, event, ctx),
            Event::Scroll { .. } => {
                if manager.scroll(content, event, ctx).is_handled() {
                    return Handled::Yes;
                }
                match self.vbar.as_mut().or(self.hbar.as_mut()) {
                    Some(bar) => deliver(bar, event, ctx),
                    None => Handled::No,
                }
            }
            Event::KeyDown { .. } | Event::KeyUp { .. } | Event::Text(_) => manager.to_focus(content, event, ctx),
            Event::FocusLost => {
                manager.set_focus(content, None, ctx);
                Handled::Yes
            }
            Event::HighlightLost => {
                manager.set_hover(content, None, ctx);
                Handled::Yes
            }
            Event::Tick { dt } => {
                manager.tick(content, *dt, ctx);
                Handled::Yes
            }
            _ => Handled::No,
        }
    }

    fn is_focusable(&self) -> bool {
        self.has_focusables
    }

    fn is_wheel_target(&self) -> bool {
        self.hbar.is_some() || self.vbar.is_some()
    }

    /// Hover lives in the nested manager, never on the scrollable itself.
    fn is_highlight(&self) -> bool {
        false
    }

    fn traverse_focus(&mut self, traversal: Traversal, ctx: &mut EventCtx<'_>) -> Option<FocusStep> {
        self.sync(ctx);
        let content = &mut *self.content;
        let step = match traversal {
            Traversal::Enter { reverse } => {
                self.manager.set_focus(content, None, ctx);
                self.manager.focus_step(content, reverse, ctx)
            }
            Traversal::Step { reverse } => self.manager.focus_step(content, reverse, ctx),
        };
        if step == FocusStep::Wrapped && matches!(traversal, Traversal::Step { .. }) {
            self.manager.set_focus(content, None, ctx);
        } else if let Some(focus) = self.manager.focus() {
            self.ensure_visible(focus);
        }
        Some(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Frame;
    use crate::layout::VerticalLayout;
    use crate::primitives::Spacer;
    use crate::testing::{Harness, Probe, log};

    fn capped(height: i32) -> ScrollableOptions {
        ScrollableOptions { max_height: Some(height), ..Default::default() }
    }

    /// 50x20 focusable probes stacked without gaps.
    fn probes(log: &crate::testing::Log, names: &[&'static str]) -> VerticalLayout {
        names.iter().fold(VerticalLayout::new().padding(0), |layout, &name| {
            layout.child(Probe::new(name, Rect::new(0, 0, 50, 20), log).focusable())
        })
    }

    fn column(log: &crate::testing::Log) -> VerticalLayout {
        probes(log, &["a", "b", "c", "d"])
    }

    #[test]
    fn test_fixed_size_needs_both_caps() {
        let options = ScrollableOptions { max_width: Some(10), fixed_size: true, ..Default::default() };
        assert!(matches!(Scrollable::new(Spacer::new(), options), Err(GuiError::UnboundedFixedScrollable)));
    }

    #[test]
    fn test_fits_without_scrollbars() {
        let h = Harness::new();
        let mut scroll = Scrollable::new(Spacer::min(50, 50), capped(100)).unwrap();
        h.place(&mut scroll, 0, 0);
        assert_eq!(scroll.rect().size(), size(50, 50));
        assert!(scroll.vscrollbar().is_none() && scroll.hscrollbar().is_none());
        assert!(!scroll.is_wheel_target());
    }

    #[test]
    fn test_overflow_adds_scrollbar_and_clips() {
        let h = Harness::new();
        let mut scroll = Scrollable::new(Frame::new(Spacer::min(68, 288)), capped(100)).unwrap();
        h.place(&mut scroll, 10, 20);

        // frame is 80x300; vertical bar is 8 wide
        assert_eq!(scroll.rect(), Rect::new(10, 20, 88, 100));
        assert_eq!(scroll.viewport(), Rect::new(10, 20, 80, 100));
        let bar = scroll.vscrollbar().map(|b| (b.bar_width(), b.rect()));
        assert_eq!(bar, Some((100.0 / 300.0, Rect::new(90, 20, 8, 100))));

        // top of the content lines up with the top of the viewport
        assert_eq!(scroll.content().rect(), Rect::new(10, -180, 80, 300));
        let surface = h.surface();
        let clips: Vec<_> = surface.draw_list().into_iter().filter_map(|id| surface.clip_of(id)).collect();
        assert!(!clips.is_empty());
        assert!(clips.iter().all(|&c| c == scroll.viewport()));
    }

    #[test]
    fn test_offset_follows_scrollbar() {
        let h = Harness::new();
        let mut scroll = Scrollable::new(Spacer::min(80, 300), capped(100)).unwrap();
        h.place(&mut scroll, 0, 0);
        if let Some(bar) = scroll.vscrollbar_mut() {
            bar.set_pos(0.5);
        }
        h.place(&mut scroll, 0, 0);
        assert_eq!(scroll.scroll_offset(), size(0, 150));
        assert_eq!(scroll.content().rect().y, 100 - 300 + 150);
    }

    #[test]
    fn test_tab_walks_inside_and_scrolls_into_view() {
        let log = log();
        let mut h = Harness::new();
        let mut scroll = Scrollable::new(column(&log), capped(40)).unwrap();
        h.place(&mut scroll, 0, 0);
        assert!(scroll.is_focusable());

        let step = scroll.traverse_focus(Traversal::Enter { reverse: false }, &mut h.ctx());
        assert_eq!(step, Some(FocusStep::Moved));
        let step = scroll.traverse_focus(Traversal::Step { reverse: false }, &mut h.ctx());
        assert_eq!(step, Some(FocusStep::Moved));
        assert_eq!(scroll.vscrollbar().map(Scrollbar::pos), Some(0.0));

        // c sits below the viewport
        scroll.traverse_focus(Traversal::Step { reverse: false }, &mut h.ctx());
        assert_eq!(scroll.vscrollbar().map(Scrollbar::pos), Some(0.25));
        assert!(h.handle.needs_layout());
        h.place(&mut scroll, 0, 0);
        let c = scroll.content().children()[2].rect();
        assert!(scroll.viewport().contains_rect(&c));

        scroll.traverse_focus(Traversal::Step { reverse: false }, &mut h.ctx());
        h.place(&mut scroll, 0, 0);
        assert_eq!(scroll.vscrollbar().map(Scrollbar::pos), Some(0.5));

        let step = scroll.traverse_focus(Traversal::Step { reverse: false }, &mut h.ctx());
        assert_eq!(step, Some(FocusStep::Wrapped));
        assert_eq!(scroll.manager().focus(), None);
        assert_eq!(log.borrow().last().map(String::as_str), Some("a:focus-"));
    }

    #[test]
    fn test_tabs_between_layouts_scroll_from_pending_offset() {
        let log = log();
        let mut h = Harness::new();
        let names = ["a", "b", "c", "d", "e", "f"];
        let mut scroll = Scrollable::new(probes(&log, &names), capped(40)).unwrap();
        h.place(&mut scroll, 0, 0);

        scroll.traverse_focus(Traversal::Enter { reverse: false }, &mut h.ctx());
        scroll.traverse_focus(Traversal::Step { reverse: false }, &mut h.ctx());
        scroll.traverse_focus(Traversal::Step { reverse: false }, &mut h.ctx());
        assert_eq!(scroll.scroll_offset(), size(0, 20));

        // d is reached before the next layout
        scroll.traverse_focus(Traversal::Step { reverse: false }, &mut h.ctx());
        assert_eq!(scroll.scroll_offset(), size(0, 40));
        h.place(&mut scroll, 0, 0);
        let d = scroll.content().children()[3].rect();
        assert_eq!(d, Rect::new(0, 0, 50, 20));
    }

    #[test]
    fn test_events_reach_nested_controls() {
        let log = log();
        let mut h = Harness::new();
        let mut scroll = Scrollable::new(column(&log), capped(40)).unwrap();
        h.place(&mut scroll, 0, 0);

        // a covers y in [20, 40), b covers [0, 20)
        scroll.handle(&Event::motion(5, 25), &mut h.ctx());
        scroll.handle(&Event::press(5, 5), &mut h.ctx());
        assert!(log.borrow().iter().any(|e| e == "a:hover+"));
        assert!(log.borrow().iter().any(|e| e == "b:press"));
        assert!(scroll.manager().focus().is_some());

        scroll.handle(&Event::FocusLost, &mut h.ctx());
        assert_eq!(scroll.manager().focus(), None);
        assert!(!scroll.is_highlight());
    }

    #[test]
    fn test_wheel_scrolls_viewport() {
        let mut h = Harness::new();
        let mut scroll = Scrollable::new(Spacer::min(80, 300), capped(100)).unwrap();
        h.place(&mut scroll, 0, 0);
        assert!(scroll.is_wheel_target());

        let down = Event::Scroll { x: 5, y: 5, scroll_x: 0.0, scroll_y: -3.0 };
        assert_eq!(scroll.handle(&down, &mut h.ctx()), Handled::Yes);
        h.place(&mut scroll, 0, 0);
        assert_eq!(scroll.scroll_offset(), size(0, 30));
    }

    #[test]
    fn test_delete_keeps_position() {
        let h = Harness::new();
        let mut scroll = Scrollable::new(Frame::new(Spacer::min(80, 300)), capped(100)).unwrap();
        h.place(&mut scroll, 0, 0);
        if let Some(bar) = scroll.vscrollbar_mut() {
            bar.set_pos(0.2);
        }
        scroll.delete();
        assert_eq!(h.live(), 0);
        h.place(&mut scroll, 0, 0);
        assert!(h.live() > 0);
        assert_eq!(scroll.vscrollbar().map(Scrollbar::pos), Some(0.2));
    }
}
