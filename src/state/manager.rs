//! Event manager - hover, focus and wheel routing over a flat control list.
//!
//! The manager never owns controls. After every layout pass it snapshots
//! `(ControlId, hit region)` pairs from the tree, front to back, and from
//! then on resolves ids through [`Node::find_control`]. Any id that no longer
//! resolves (or now resolves to a disabled control) is dropped from hover and
//! focus on the next [`EventManager::rebuild`].
//!
//! Dialogs own one manager; a [`Scrollable`](crate::scroll::Scrollable) owns
//! another for the controls inside its viewport.

use tracing::{debug, trace};

use super::cycle::find_next_focusable;
use crate::engine::{Control, ControlEntry, ControlId, EventCtx, FocusStep, Node, Traversal};
use crate::event::{Capabilities, Event, Handled};
use crate::types::Rect;

/// How a press was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// A control received the press.
    Captured,
    /// The press landed inside the bounds but on no control.
    Unclaimed,
    /// The press landed outside the bounds.
    Outside,
}

/// Offer `event` to `control` if it declared the matching capability.
pub fn deliver(control: &mut dyn Control, event: &Event, ctx: &mut EventCtx<'_>) -> Handled {
    let needed = event.capability();
    if !needed.is_empty() && !control.capabilities().contains(needed) {
        return Handled::No;
    }
    control.handle(event, ctx)
}

/// Routes input to the controls of one subtree.
#[derive(Debug, Default)]
pub struct EventManager {
    controls: Vec<ControlEntry>,
    hover: Option<ControlId>,
    focus: Option<ControlId>,
    wheel_hint: Option<ControlId>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered controls, front to back.
    pub fn controls(&self) -> &[ControlEntry] {
        &self.controls
    }

    pub fn hover(&self) -> Option<ControlId> {
        self.hover
    }

    pub fn focus(&self) -> Option<ControlId> {
        self.focus
    }

    pub fn wheel_hint(&self) -> Option<ControlId> {
        self.wheel_hint
    }

    /// Cached hit region of a registered control.
    pub fn region_of(&self, id: ControlId) -> Option<Rect> {
        self.controls.iter().find(|e| e.id == id).map(|e| e.region)
    }

    fn is_active(&self, root: &mut dyn Node, id: ControlId) -> bool {
        self.region_of(id).is_some() && root.find_control(id).is_some_and(|c| !c.is_disabled())
    }

    // =========================================================================
    // Control list
    // =========================================================================

    /// Re-snapshot the control list after a layout pass and drop stale
    /// hover/focus references.
    pub fn rebuild(&mut self, root: &mut dyn Node, ctx: &mut EventCtx<'_>) {
        self.controls.clear();
        root.collect_controls(&mut self.controls);
        trace!(count = self.controls.len(), "control list rebuilt");

        if self.hover.is_some_and(|id| !self.is_active(root, id)) {
            self.set_hover(root, None, ctx);
        }
        if self.focus.is_some_and(|id| !self.is_active(root, id)) {
            self.set_focus(root, None, ctx);
        }

        self.wheel_hint = self
            .controls
            .iter()
            .map(|e| e.id)
            .find(|&id| root.find_control(id).is_some_and(|c| c.is_wheel_target()));
    }

    /// Drop every reference without notifying anybody.
    pub fn reset(&mut self) {
        self.controls.clear();
        self.hover = None;
        self.focus = None;
        self.wheel_hint = None;
    }

    /// Relinquish hover and focus held by `id`, e.g. right after disabling it.
    pub fn release(&mut self, root: &mut dyn Node, id: ControlId, ctx: &mut EventCtx<'_>) {
        if self.hover == Some(id) {
            self.set_hover(root, None, ctx);
        }
        if self.focus == Some(id) {
            self.set_focus(root, None, ctx);
        }
    }

    /// Clear hover and focus, notifying both.
    pub fn clear(&mut self, root: &mut dyn Node, ctx: &mut EventCtx<'_>) {
        self.set_hover(root, None, ctx);
        self.set_focus(root, None, ctx);
    }

    // =========================================================================
    // Hover and focus transitions
    // =========================================================================

    pub fn set_hover(&mut self, root: &mut dyn Node, target: Option<ControlId>, ctx: &mut EventCtx<'_>) {
        if self.hover == target {
            return;
        }
        if let Some(old) = self.hover.take()
            && let Some(control) = root.find_control(old)
        {
            control.state_mut().set_highlight(false);
            deliver(control, &Event::HighlightLost, ctx);
        }
        if let Some(id) = target
            && let Some(control) = root.find_control(id)
        {
            control.state_mut().set_highlight(true);
            self.hover = Some(id);
            deliver(control, &Event::HighlightGained, ctx);
        }
        debug!(hover = ?self.hover, "hover changed");
    }

    pub fn set_focus(&mut self, root: &mut dyn Node, target: Option<ControlId>, ctx: &mut EventCtx<'_>) {
        if self.focus == target {
            return;
        }
        if let Some(old) = self.focus.take()
            && let Some(control) = root.find_control(old)
        {
            control.state_mut().set_focus(false);
            deliver(control, &Event::FocusLost, ctx);
        }
        if let Some(id) = target
            && let Some(control) = root.find_control(id)
        {
            control.state_mut().set_focus(true);
            self.focus = Some(id);
            deliver(control, &Event::FocusGained, ctx);
        }
        debug!(focus = ?self.focus, "focus changed");
    }

    // =========================================================================
    // Hit testing
    // =========================================================================

    /// Frontmost control whose region contains the point and whose own hit
    /// test accepts it.
    pub fn hit_control(&self, root: &mut dyn Node, x: i32, y: i32) -> Option<ControlId> {
        self.controls
            .iter()
            .filter(|e| e.region.contains(x, y))
            .map(|e| e.id)
            .find(|&id| root.find_control(id).is_some_and(|c| c.hit_test(x, y)))
    }

    /// Recompute hover at a point. A disabled control under the pointer
    /// leaves nothing hovered.
    pub fn update_hover(&mut self, root: &mut dyn Node, x: i32, y: i32, ctx: &mut EventCtx<'_>) {
        let hit = self
            .hit_control(root, x, y)
            .filter(|&id| root.find_control(id).is_some_and(|c| !c.is_disabled()));
        self.set_hover(root, hit, ctx);
    }

    fn send(root: &mut dyn Node, id: ControlId, event: &Event, ctx: &mut EventCtx<'_>) -> Handled {
        match root.find_control(id) {
            Some(control) => deliver(control, event, ctx),
            None => Handled::No,
        }
    }

    // =========================================================================
    // Pointer routing
    // =========================================================================

    /// Motion: update hover, then forward the motion to it.
    pub fn pointer_motion(&mut self, root: &mut dyn Node, event: &Event, ctx: &mut EventCtx<'_>) -> Handled {
        let Some((x, y)) = event.position() else {
            return Handled::No;
        };
        self.update_hover(root, x, y, ctx);
        match self.hover {
            Some(id) => {
                Self::send(root, id, event, ctx);
                Handled::Yes
            }
            None => Handled::No,
        }
    }

    /// Press: sticky to the focused control when inside its region,
    /// otherwise focus follows hover.
    pub fn pointer_press(
        &mut self,
        root: &mut dyn Node,
        event: &Event,
        bounds: Rect,
        ctx: &mut EventCtx<'_>,
    ) -> PressOutcome {
        let Some((x, y)) = event.position() else {
            return PressOutcome::Outside;
        };

        if let Some(focus) = self.focus
            && self.region_of(focus).is_some_and(|r| r.contains(x, y))
        {
            trace!(?focus, "press forwarded to focus");
            Self::send(root, focus, event, ctx);
            return PressOutcome::Captured;
        }

        if !bounds.contains(x, y) {
            return PressOutcome::Outside;
        }

        self.update_hover(root, x, y, ctx);
        let target = self.hover;
        self.set_focus(root, target, ctx);
        match self.focus {
            Some(id) => {
                Self::send(root, id, event, ctx);
                PressOutcome::Captured
            }
            None => PressOutcome::Unclaimed,
        }
    }

    /// Release: forward to focus, then re-hover at the release point.
    pub fn pointer_release(&mut self, root: &mut dyn Node, event: &Event, ctx: &mut EventCtx<'_>) -> Handled {
        let handled = match self.focus {
            Some(id) => {
                Self::send(root, id, event, ctx);
                Handled::Yes
            }
            None => Handled::No,
        };
        if let Some((x, y)) = event.position() {
            self.update_hover(root, x, y, ctx);
        }
        handled
    }

    /// Drag: always to the focused control.
    pub fn pointer_drag(&mut self, root: &mut dyn Node, event: &Event, ctx: &mut EventCtx<'_>) -> Handled {
        match self.focus {
            Some(id) => {
                Self::send(root, id, event, ctx);
                Handled::Yes
            }
            None => Handled::No,
        }
    }

    /// Wheel: hovered control first, then the wheel hint.
    pub fn scroll(&mut self, root: &mut dyn Node, event: &Event, ctx: &mut EventCtx<'_>) -> Handled {
        if let Some(hover) = self.hover
            && Self::send(root, hover, event, ctx).is_handled()
        {
            return Handled::Yes;
        }
        match self.wheel_hint {
            Some(hint) if Some(hint) != self.hover => Self::send(root, hint, event, ctx),
            _ => Handled::No,
        }
    }

    /// Key and text input go only to focus.
    pub fn to_focus(&mut self, root: &mut dyn Node, event: &Event, ctx: &mut EventCtx<'_>) -> Handled {
        match self.focus {
            Some(id) => Self::send(root, id, event, ctx),
            None => Handled::No,
        }
    }

    // =========================================================================
    // Focus cycling
    // =========================================================================

    fn focusables(&self, root: &mut dyn Node) -> Vec<ControlId> {
        self.controls
            .iter()
            .map(|e| e.id)
            .filter(|&id| root.find_control(id).is_some_and(|c| c.is_focusable() && !c.is_disabled()))
            .collect()
    }

    /// Move focus one step in tab order. A focused control that manages
    /// its own children gets to move inside itself first.
    pub fn focus_step(&mut self, root: &mut dyn Node, reverse: bool, ctx: &mut EventCtx<'_>) -> FocusStep {
        if let Some(current) = self.focus
            && let Some(control) = root.find_control(current)
            && control.traverse_focus(Traversal::Step { reverse }, ctx) == Some(FocusStep::Moved)
        {
            return FocusStep::Moved;
        }

        let focusables = self.focusables(root);
        let Some(next) = find_next_focusable(&focusables, self.focus, reverse) else {
            return FocusStep::Empty;
        };

        self.set_focus(root, Some(next.target), ctx);
        if let Some(control) = root.find_control(next.target) {
            control.traverse_focus(Traversal::Enter { reverse }, ctx);
        }
        debug!(target = ?next.target, wrapped = next.wrapped, "focus stepped");

        if next.wrapped { FocusStep::Wrapped } else { FocusStep::Moved }
    }

    // =========================================================================
    // Per-frame
    // =========================================================================

    /// Deliver a tick to every control that asked for them. Iterates over a
    /// snapshot so handlers may invalidate the list.
    pub fn tick(&mut self, root: &mut dyn Node, dt: f32, ctx: &mut EventCtx<'_>) {
        let snapshot: Vec<ControlId> = self.controls.iter().map(|e| e.id).collect();
        let event = Event::Tick { dt };
        for id in snapshot {
            if let Some(control) = root.find_control(id)
                && control.capabilities().contains(Capabilities::TICK)
            {
                control.handle(&event, ctx);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Harness, Probe, Stack, log};

    fn setup() -> (Harness, Stack, crate::testing::Log, Vec<ControlId>) {
        let log = log();
        let a = Probe::new("a", Rect::new(0, 0, 50, 20), &log).focusable();
        let b = Probe::new("b", Rect::new(0, 30, 50, 20), &log).focusable();
        let c = Probe::new("c", Rect::new(0, 60, 50, 20), &log).focusable();
        let ids = vec![a.control_id(), b.control_id(), c.control_id()];
        let stack = Stack::new(vec![Box::new(a), Box::new(b), Box::new(c)]);
        (Harness::new(), stack, log, ids)
    }

    fn bounds() -> Rect {
        Rect::new(0, 0, 100, 100)
    }

    fn highlighted(stack: &mut Stack, ids: &[ControlId]) -> usize {
        ids.iter()
            .filter(|&&id| stack.find_control(id).is_some_and(|c| c.is_highlight()))
            .count()
    }

    #[test]
    fn test_motion_moves_hover() {
        let (mut h, mut stack, log, ids) = setup();
        let mut manager = EventManager::new();
        manager.rebuild(&mut stack, &mut h.ctx());

        manager.pointer_motion(&mut stack, &Event::motion(10, 5), &mut h.ctx());
        assert_eq!(manager.hover(), Some(ids[0]));
        manager.pointer_motion(&mut stack, &Event::motion(10, 35), &mut h.ctx());
        assert_eq!(manager.hover(), Some(ids[1]));
        assert_eq!(highlighted(&mut stack, &ids), 1);

        let events = log.borrow().clone();
        assert_eq!(
            events,
            vec!["a:hover+", "a:motion", "a:hover-", "b:hover+", "b:motion"]
        );
    }

    #[test]
    fn test_motion_into_gap_clears_hover() {
        let (mut h, mut stack, _log, ids) = setup();
        let mut manager = EventManager::new();
        manager.rebuild(&mut stack, &mut h.ctx());

        manager.pointer_motion(&mut stack, &Event::motion(10, 5), &mut h.ctx());
        let handled = manager.pointer_motion(&mut stack, &Event::motion(10, 25), &mut h.ctx());
        assert_eq!(handled, Handled::No);
        assert_eq!(manager.hover(), None);
        assert_eq!(highlighted(&mut stack, &ids), 0);
    }

    #[test]
    fn test_press_focuses_hover_and_sticks() {
        let (mut h, mut stack, log, ids) = setup();
        let mut manager = EventManager::new();
        manager.rebuild(&mut stack, &mut h.ctx());

        let outcome = manager.pointer_press(&mut stack, &Event::press(10, 5), bounds(), &mut h.ctx());
        assert_eq!(outcome, PressOutcome::Captured);
        assert_eq!(manager.focus(), Some(ids[0]));

        log.borrow_mut().clear();
        manager.pointer_drag(&mut stack, &Event::drag(10, 40, 0, 35), &mut h.ctx());
        manager.pointer_release(&mut stack, &Event::release(10, 40), &mut h.ctx());
        assert_eq!(manager.focus(), Some(ids[0]));
        assert_eq!(manager.hover(), Some(ids[1]));
        assert_eq!(log.borrow()[..2], ["a:drag".to_string(), "a:release".to_string()]);
    }

    #[test]
    fn test_press_on_background_is_unclaimed() {
        let (mut h, mut stack, _log, _ids) = setup();
        let mut manager = EventManager::new();
        manager.rebuild(&mut stack, &mut h.ctx());

        let inside = manager.pointer_press(&mut stack, &Event::press(80, 80), bounds(), &mut h.ctx());
        assert_eq!(inside, PressOutcome::Unclaimed);
        assert_eq!(manager.focus(), None);

        let outside = manager.pointer_press(&mut stack, &Event::press(500, 500), bounds(), &mut h.ctx());
        assert_eq!(outside, PressOutcome::Outside);
    }

    #[test]
    fn test_keys_only_reach_focus() {
        let (mut h, mut stack, log, _ids) = setup();
        let mut manager = EventManager::new();
        manager.rebuild(&mut stack, &mut h.ctx());

        let key = Event::key(crate::event::Key::Char('x'));
        assert_eq!(manager.to_focus(&mut stack, &key, &mut h.ctx()), Handled::No);

        manager.focus_step(&mut stack, false, &mut h.ctx());
        log.borrow_mut().clear();
        assert_eq!(manager.to_focus(&mut stack, &key, &mut h.ctx()), Handled::Yes);
        assert_eq!(*log.borrow(), vec!["a:key"]);
    }

    #[test]
    fn test_tab_cycles_and_wraps() {
        let (mut h, mut stack, _log, ids) = setup();
        let mut manager = EventManager::new();
        manager.rebuild(&mut stack, &mut h.ctx());

        let mut seen = Vec::new();
        for _ in 0..3 {
            assert_eq!(manager.focus_step(&mut stack, false, &mut h.ctx()), FocusStep::Moved);
            seen.push(manager.focus());
        }
        assert_eq!(seen, vec![Some(ids[0]), Some(ids[1]), Some(ids[2])]);
        assert_eq!(manager.focus_step(&mut stack, false, &mut h.ctx()), FocusStep::Wrapped);
        assert_eq!(manager.focus(), Some(ids[0]));

        assert_eq!(manager.focus_step(&mut stack, true, &mut h.ctx()), FocusStep::Wrapped);
        assert_eq!(manager.focus(), Some(ids[2]));
    }

    #[test]
    fn test_tab_skips_disabled_and_unfocusable() {
        let log = log();
        let a = Probe::new("a", Rect::new(0, 0, 10, 10), &log).focusable();
        let b = Probe::new("b", Rect::new(0, 20, 10, 10), &log);
        let mut c = Probe::new("c", Rect::new(0, 40, 10, 10), &log).focusable();
        c.set_disabled(true);
        let a_id = a.control_id();
        let mut stack = Stack::new(vec![Box::new(a), Box::new(b), Box::new(c)]);
        let mut h = Harness::new();
        let mut manager = EventManager::new();
        manager.rebuild(&mut stack, &mut h.ctx());

        manager.focus_step(&mut stack, false, &mut h.ctx());
        assert_eq!(manager.focus(), Some(a_id));
        assert_eq!(manager.focus_step(&mut stack, false, &mut h.ctx()), FocusStep::Wrapped);
        assert_eq!(manager.focus(), Some(a_id));
    }

    #[test]
    fn test_disabled_control_is_never_hovered() {
        let (mut h, mut stack, _log, ids) = setup();
        if let Some(c) = stack.find_control(ids[0]) {
            c.set_disabled(true);
        }
        let mut manager = EventManager::new();
        manager.rebuild(&mut stack, &mut h.ctx());

        manager.pointer_motion(&mut stack, &Event::motion(10, 5), &mut h.ctx());
        assert_eq!(manager.hover(), None);
        let outcome = manager.pointer_press(&mut stack, &Event::press(10, 5), bounds(), &mut h.ctx());
        assert_eq!(outcome, PressOutcome::Unclaimed);
        assert_eq!(manager.focus(), None);
    }

    #[test]
    fn test_rebuild_drops_stale_references() {
        let (mut h, mut stack, log, ids) = setup();
        let mut manager = EventManager::new();
        manager.rebuild(&mut stack, &mut h.ctx());
        manager.pointer_press(&mut stack, &Event::press(10, 35), bounds(), &mut h.ctx());
        assert_eq!(manager.focus(), Some(ids[1]));
        assert_eq!(manager.hover(), Some(ids[1]));

        if let Some(b) = stack.find_control(ids[1]) {
            b.set_disabled(true);
        }
        log.borrow_mut().clear();
        manager.rebuild(&mut stack, &mut h.ctx());
        assert_eq!(manager.hover(), None);
        assert_eq!(manager.focus(), None);
        assert_eq!(*log.borrow(), vec!["b:hover-", "b:focus-"]);

        stack.children.remove(0);
        manager.rebuild(&mut stack, &mut h.ctx());
        assert_eq!(manager.controls().len(), 2);
    }

    #[test]
    fn test_release_clears_immediately() {
        let (mut h, mut stack, _log, ids) = setup();
        let mut manager = EventManager::new();
        manager.rebuild(&mut stack, &mut h.ctx());
        manager.pointer_press(&mut stack, &Event::press(10, 5), bounds(), &mut h.ctx());

        manager.release(&mut stack, ids[0], &mut h.ctx());
        assert_eq!(manager.hover(), None);
        assert_eq!(manager.focus(), None);
    }

    #[test]
    fn test_scroll_falls_back_to_wheel_hint() {
        let log = log();
        let a = Probe::new("a", Rect::new(0, 0, 10, 10), &log).ignoring(Capabilities::SCROLL);
        let pane = Probe::new("pane", Rect::new(0, 20, 10, 10), &log).wheel_target();
        let mut stack = Stack::new(vec![Box::new(a), Box::new(pane)]);
        let mut h = Harness::new();
        let mut manager = EventManager::new();
        manager.rebuild(&mut stack, &mut h.ctx());
        assert!(manager.wheel_hint().is_some());

        manager.pointer_motion(&mut stack, &Event::motion(5, 5), &mut h.ctx());
        log.borrow_mut().clear();
        let wheel = Event::Scroll { x: 5, y: 5, scroll_x: 0.0, scroll_y: 1.0 };
        assert_eq!(manager.scroll(&mut stack, &wheel, &mut h.ctx()), Handled::Yes);
        assert_eq!(*log.borrow(), vec!["pane:scroll"]);
    }

    #[test]
    fn test_tick_reaches_every_subscriber() {
        let (mut h, mut stack, log, _ids) = setup();
        let mut manager = EventManager::new();
        manager.rebuild(&mut stack, &mut h.ctx());
        manager.tick(&mut stack, 0.5, &mut h.ctx());
        assert_eq!(*log.borrow(), vec!["a:tick", "b:tick", "c:tick"]);
    }
}
