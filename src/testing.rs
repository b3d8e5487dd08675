//! Fixtures shared by unit tests: a headless dialog context, a recording
//! probe control and a container that keeps children where they were put.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::dialog::{Dialog, GuiContext};
use crate::engine::{
    Control, ControlState, DialogHandle, DialogLink, EventCtx, Node, SizeCtx, Value, WidgetBase, nodes,
    nodes_mut,
};
use crate::event::{Capabilities, Event, Handled};
use crate::renderer::{Group, GroupCache, Layers, RecordingSurface, SurfaceRef};
use crate::theme::presets;
use crate::types::{Rect, size};

pub(crate) type Log = Rc<RefCell<Vec<String>>>;

pub(crate) fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

/// Short name for an event in probe logs.
pub(crate) fn tag(event: &Event) -> &'static str {
    match event {
        Event::PointerMove { .. } => "motion",
        Event::PointerDown { .. } => "press",
        Event::PointerUp { .. } => "release",
        Event::PointerDrag { .. } => "drag",
        Event::Scroll { .. } => "scroll",
        Event::KeyDown { .. } => "key",
        Event::KeyUp { .. } => "keyup",
        Event::Text(_) => "text",
        Event::FocusGained => "focus+",
        Event::FocusLost => "focus-",
        Event::HighlightGained => "hover+",
        Event::HighlightLost => "hover-",
        Event::Tick { .. } => "tick",
        Event::Resize { .. } => "resize",
    }
}

// =============================================================================
// Harness
// =============================================================================

/// A dialog's worth of context without a dialog.
pub(crate) struct Harness {
    pub recording: Rc<RefCell<RecordingSurface>>,
    pub gui: GuiContext,
    pub handle: DialogHandle,
    pub link: DialogLink,
    pub layers: Layers,
    pub groups: GroupCache,
    pub popups: Vec<Dialog>,
}

impl Harness {
    pub fn new() -> Self {
        let recording = Rc::new(RefCell::new(RecordingSurface::new()));
        let surface: SurfaceRef = recording.clone();
        let gui = GuiContext::new(presets::flat(), surface, size(640, 480));
        let handle = DialogHandle::new();
        let link = handle.link();
        let dialog_group = Group::dialog(gui.orders().next_token(), Some(gui.root_group()));
        let layers = Layers::new(&dialog_group);
        Self { recording, gui, handle, link, layers, groups: GroupCache::new(), popups: Vec::new() }
    }

    pub fn ctx(&mut self) -> EventCtx<'_> {
        EventCtx::new(&self.link, &self.gui, &mut self.popups)
    }

    pub fn size_ctx(&self) -> SizeCtx<'_> {
        SizeCtx {
            theme: self.gui.theme(),
            surface: self.gui.surface(),
            layers: &self.layers,
            groups: &self.groups,
            link: &self.link,
        }
    }

    /// Size then lay out a node at a point.
    pub fn place(&self, node: &mut dyn Node, x: i32, y: i32) {
        node.size(Some(&self.size_ctx()));
        node.layout(x, y);
    }

    pub fn surface(&self) -> Ref<'_, RecordingSurface> {
        self.recording.borrow()
    }

    pub fn live(&self) -> usize {
        self.recording.borrow().live_count()
    }
}

// =============================================================================
// Probe
// =============================================================================

/// Control that logs every event it receives as `name:tag`.
pub(crate) struct Probe {
    base: WidgetBase,
    state: ControlState,
    name: &'static str,
    log: Log,
    focusable: bool,
    wheel: bool,
    caps: Capabilities,
    value: Option<Value>,
}

impl Probe {
    pub fn new(name: &'static str, rect: Rect, log: &Log) -> Self {
        let mut base = WidgetBase::new();
        base.rect = rect;
        Self {
            base,
            state: ControlState::new(),
            name,
            log: log.clone(),
            focusable: false,
            wheel: false,
            caps: Capabilities::all(),
            value: None,
        }
    }

    pub fn focusable(mut self) -> Self {
        self.focusable = true;
        self
    }

    pub fn wheel_target(mut self) -> Self {
        self.wheel = true;
        self
    }

    pub fn ignoring(mut self, caps: Capabilities) -> Self {
        self.caps.remove(caps);
        self
    }

    pub fn with_value(mut self, id: &str, value: Value) -> Self {
        self.state.set_id(id);
        self.value = Some(value);
        self
    }
}

impl Node for Probe {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn size(&mut self, ctx: Option<&SizeCtx<'_>>) {
        if let Some(ctx) = ctx {
            self.base.attach(ctx.link);
        }
    }

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

    fn capabilities(&self) -> Capabilities {
        self.caps
    }

    fn handle(&mut self, event: &Event, _ctx: &mut EventCtx<'_>) -> Handled {
        self.log.borrow_mut().push(format!("{}:{}", self.name, tag(event)));
        Handled::Yes
    }

    fn is_focusable(&self) -> bool {
        self.focusable
    }

    fn is_input(&self) -> bool {
        self.value.is_some()
    }

    fn value(&self) -> Option<Value> {
        self.value.clone()
    }

    fn is_wheel_target(&self) -> bool {
        self.wheel
    }
}

// =============================================================================
// Stack
// =============================================================================

/// Container that sizes its children but never moves them.
pub(crate) struct Stack {
    base: WidgetBase,
    pub children: Vec<Box<dyn Node>>,
}

impl Stack {
    pub fn new(children: Vec<Box<dyn Node>>) -> Self {
        Self::sized(100, 100, children)
    }

    pub fn sized(width: i32, height: i32, children: Vec<Box<dyn Node>>) -> Self {
        Self { base: WidgetBase::sized(width, height), children }
    }
}

impl Node for Stack {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn size(&mut self, ctx: Option<&SizeCtx<'_>>) {
        for child in &mut self.children {
            child.size(ctx);
        }
    }

    fn layout(&mut self, x: i32, y: i32) {
        self.base.set_position(x, y);
    }

    fn delete(&mut self) {
        for child in &mut self.children {
            child.delete();
        }
    }

    fn children(&self) -> Vec<&dyn Node> {
        nodes(&self.children)
    }

    fn children_mut(&mut self) -> Vec<&mut dyn Node> {
        nodes_mut(&mut self.children)
    }
}
