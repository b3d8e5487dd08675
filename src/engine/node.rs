//! Node and Control capability traits.
//!
//! # Protocol
//!
//! 1. `size(Some(ctx))` computes the node's width and height bottom-up and
//!    lazily creates its graphics. `size(None)` means "not attached yet" and
//!    leaves everything as it was.
//! 2. `expand(w, h)` may follow for nodes reporting `is_expandable()`, when a
//!    parent has slack to hand out.
//! 3. `layout(x, y)` places the node's lower-left corner at absolute screen
//!    coordinates and positions children from their computed sizes.
//!
//! Controls additionally expose a [`ControlState`] and a `handle` method.
//! The event manager is the only thing that flips hover and focus.

use std::any::Any;
use std::collections::BTreeMap;

use super::context::{EventCtx, SizeCtx, WidgetBase};
use super::registry::ControlId;
use crate::event::{Capabilities, Event, Handled};
use crate::types::Rect;

// =============================================================================
// Values
// =============================================================================

/// A committed value read from an input control.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Bool(bool),
    Number(f32),
    Choice(Option<String>),
}

/// Values keyed by control id.
pub type Values = BTreeMap<String, Value>;

/// A control and the screen region it answers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlEntry {
    pub id: ControlId,
    pub region: Rect,
}

impl ControlEntry {
    pub fn new(id: ControlId, region: Rect) -> Self {
        Self { id, region }
    }
}

// =============================================================================
// Node
// =============================================================================

/// Downcasting support for nodes.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A positionable, sizeable piece of a dialog.
pub trait Node: AsAny {
    fn base(&self) -> &WidgetBase;

    /// Compute width and height, creating graphics on first attachment.
    fn size(&mut self, ctx: Option<&SizeCtx<'_>>);

    /// Place the lower-left corner and position children.
    fn layout(&mut self, x: i32, y: i32);

    /// Release graphics. The node can be sized again afterwards.
    fn delete(&mut self);

    /// Release graphics and drop children and callbacks.
    fn teardown(&mut self) {
        self.delete();
    }

    fn rect(&self) -> Rect {
        self.base().rect
    }

    fn is_expandable(&self) -> bool {
        false
    }

    /// Grow to `width` x `height`. Only called on expandable nodes.
    fn expand(&mut self, width: i32, height: i32) {
        debug_assert!(false, "expand({width}, {height}) on a non-expandable node");
    }

    /// Finer-grained hit test inside the node's rectangle.
    fn hit_test(&self, x: i32, y: i32) -> bool {
        self.rect().contains(x, y)
    }

    /// Ask the owning dialog to re-layout.
    fn request_layout(&self) {
        self.base().request_layout();
    }

    fn children(&self) -> Vec<&dyn Node> {
        Vec::new()
    }

    fn children_mut(&mut self) -> Vec<&mut dyn Node> {
        Vec::new()
    }

    /// Append this subtree's interactive controls, front to back.
    fn collect_controls(&self, out: &mut Vec<ControlEntry>) {
        for child in self.children() {
            child.collect_controls(out);
        }
    }

    /// Find a control in this subtree.
    fn find_control(&mut self, id: ControlId) -> Option<&mut dyn Control> {
        self.children_mut().into_iter().find_map(|child| child.find_control(id))
    }

    /// Find a control in this subtree by its external id.
    fn find_by_id(&mut self, id: &str) -> Option<&mut dyn Control> {
        self.children_mut().into_iter().find_map(|child| child.find_by_id(id))
    }

    /// Append committed values of id-bearing input controls.
    fn collect_values(&self, out: &mut Values) {
        for child in self.children() {
            child.collect_values(out);
        }
    }
}

/// Borrow a slice of boxed nodes as trait objects.
pub fn nodes(children: &[Box<dyn Node>]) -> Vec<&dyn Node> {
    children.iter().map(|c| &**c as &dyn Node).collect()
}

/// Mutably borrow a slice of boxed nodes as trait objects.
pub fn nodes_mut(children: &mut [Box<dyn Node>]) -> Vec<&mut dyn Node> {
    children.iter_mut().map(|c| &mut **c as &mut dyn Node).collect()
}

/// Downcast a node reference.
pub fn downcast_ref<T: Node>(node: &dyn Node) -> Option<&T> {
    node.as_any().downcast_ref::<T>()
}

/// Downcast a mutable node reference.
pub fn downcast_mut<T: Node>(node: &mut dyn Node) -> Option<&mut T> {
    node.as_any_mut().downcast_mut::<T>()
}

// =============================================================================
// Control
// =============================================================================

/// Identity and interaction flags of a control.
#[derive(Debug, Clone)]
pub struct ControlState {
    control_id: ControlId,
    id: Option<String>,
    disabled: bool,
    highlight: bool,
    focus: bool,
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlState {
    pub fn new() -> Self {
        Self {
            control_id: ControlId::next(),
            id: None,
            disabled: false,
            highlight: false,
            focus: false,
        }
    }

    pub fn control_id(&self) -> ControlId {
        self.control_id
    }

    /// Externally visible key for value extraction.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_highlight(&self) -> bool {
        self.highlight
    }

    pub fn is_focus(&self) -> bool {
        self.focus
    }

    pub(crate) fn set_disabled_flag(&mut self, disabled: bool) -> bool {
        let changed = self.disabled != disabled;
        self.disabled = disabled;
        changed
    }

    pub(crate) fn set_highlight(&mut self, on: bool) {
        self.highlight = on;
    }

    pub(crate) fn set_focus(&mut self, on: bool) {
        self.focus = on;
    }
}

/// How a nested focus traversal went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusStep {
    /// Focus moved to another control without wrapping.
    Moved,
    /// Focus wrapped past the end (or start, in reverse).
    Wrapped,
    /// Nothing focusable.
    Empty,
}

/// A focus traversal request for a control that manages its own children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// Focus just arrived; pick the first (or last, in reverse) child.
    Enter { reverse: bool },
    /// Move to the next (or previous) child.
    Step { reverse: bool },
}

/// A node that receives input.
pub trait Control: Node {
    fn state(&self) -> &ControlState;
    fn state_mut(&mut self) -> &mut ControlState;

    /// Event families delivered to `handle`.
    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }

    fn handle(&mut self, event: &Event, ctx: &mut EventCtx<'_>) -> Handled;

    fn is_focusable(&self) -> bool {
        false
    }

    /// Whether the value this control reports is user input.
    fn is_input(&self) -> bool {
        false
    }

    /// Current committed value, for input controls.
    fn value(&self) -> Option<Value> {
        None
    }

    /// Candidate for receiving wheel events nobody else handled.
    fn is_wheel_target(&self) -> bool {
        false
    }

    /// Nested focus traversal for controls that manage child controls.
    fn traverse_focus(&mut self, traversal: Traversal, ctx: &mut EventCtx<'_>) -> Option<FocusStep> {
        let _ = (traversal, ctx);
        None
    }

    fn control_id(&self) -> ControlId {
        self.state().control_id()
    }

    fn is_disabled(&self) -> bool {
        self.state().is_disabled()
    }

    fn is_highlight(&self) -> bool {
        self.state().is_highlight()
    }

    fn is_focus(&self) -> bool {
        self.state().is_focus()
    }

    /// Enable or disable. Graphics are regenerated on the next layout.
    fn set_disabled(&mut self, disabled: bool) {
        if self.state_mut().set_disabled_flag(disabled) {
            self.delete();
            self.request_layout();
        }
    }
}

/// Record a control's value if it has an id and is an input.
pub fn record_value(control: &dyn Control, out: &mut Values) {
    if !control.is_input() {
        return;
    }
    if let (Some(id), Some(value)) = (control.state().id(), control.value()) {
        out.insert(id.to_string(), value);
    }
}

/// The `Node` methods every leaf control implements the same way:
/// register itself, find itself by handle or id, and report its value.
#[macro_export]
macro_rules! leaf_control {
    () => {
        fn collect_controls(&self, out: &mut Vec<$crate::engine::ControlEntry>) {
            out.push($crate::engine::ControlEntry::new(
                $crate::engine::Control::control_id(self),
                $crate::engine::Node::rect(self),
            ));
        }

        fn find_control(
            &mut self,
            id: $crate::engine::ControlId,
        ) -> Option<&mut dyn $crate::engine::Control> {
            if $crate::engine::Control::control_id(self) == id {
                Some(self)
            } else {
                None
            }
        }

        fn find_by_id(&mut self, id: &str) -> Option<&mut dyn $crate::engine::Control> {
            if $crate::engine::Control::state(self).id() == Some(id) {
                Some(self)
            } else {
                None
            }
        }

        fn collect_values(&self, out: &mut $crate::engine::Values) {
            $crate::engine::record_value(self, out);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe {
        base: WidgetBase,
        state: ControlState,
    }

    impl Node for Probe {
        fn base(&self) -> &WidgetBase {
            &self.base
        }
        fn size(&mut self, _ctx: Option<&SizeCtx<'_>>) {}
        fn layout(&mut self, x: i32, y: i32) {
            self.base.set_position(x, y);
        }
        fn delete(&mut self) {}
        crate::leaf_control!();
    }

    impl Control for Probe {
        fn state(&self) -> &ControlState {
            &self.state
        }
        fn state_mut(&mut self) -> &mut ControlState {
            &mut self.state
        }
        fn handle(&mut self, _event: &Event, _ctx: &mut EventCtx<'_>) -> Handled {
            Handled::No
        }
        fn is_input(&self) -> bool {
            true
        }
        fn value(&self) -> Option<Value> {
            Some(Value::Bool(true))
        }
    }

    fn setup() -> Probe {
        Probe { base: WidgetBase::sized(10, 10), state: ControlState::new() }
    }

    #[test]
    fn test_leaf_control_registers_itself() {
        let probe = setup();
        let mut out = Vec::new();
        probe.collect_controls(&mut out);
        assert_eq!(out, vec![ControlEntry::new(probe.control_id(), Rect::new(0, 0, 10, 10))]);
    }

    #[test]
    fn test_find_control_by_id() {
        let mut probe = setup();
        let id = probe.control_id();
        assert!(probe.find_control(id).is_some());
        assert!(probe.find_control(ControlId::next()).is_none());

        probe.state.set_id("name");
        assert!(probe.find_by_id("name").is_some());
        assert!(probe.find_by_id("other").is_none());
    }

    #[test]
    fn test_values_need_an_id() {
        let mut probe = setup();
        let mut out = Values::new();
        probe.collect_values(&mut out);
        assert!(out.is_empty());

        probe.state.set_id("agree");
        probe.collect_values(&mut out);
        assert_eq!(out.get("agree"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_downcast() {
        let boxed: Box<dyn Node> = Box::new(setup());
        assert!(downcast_ref::<Probe>(&*boxed).is_some());
    }

    #[test]
    fn test_set_disabled_reports_change_once() {
        let mut probe = setup();
        probe.set_disabled(true);
        assert!(probe.is_disabled());
        probe.set_disabled(true);
        assert!(probe.is_disabled());
    }
}
