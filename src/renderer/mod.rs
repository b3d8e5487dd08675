//! Drawable surface abstraction.
//!
//! The toolkit never talks to a GPU. Widgets allocate meshes and text runs
//! on a [`Surface`] inside a paint [`Group`], update them as layout moves
//! things, and delete them when they are torn down. A backend implements
//! [`Surface`]; [`RecordingSurface`] is the in-memory implementation used
//! headless and in tests.
//!
//! # Ownership
//!
//! Every allocation has exactly one owner at a time (a graphic element or a
//! label). Owners release their handle on delete, so a surface's live count
//! is the number of visible pieces.

mod group;
mod order;
mod recording;
mod text;

pub use group::{Group, GroupCache, GroupKind, GroupRef, Layers};
pub use order::PaintOrderAllocator;
pub use recording::{Allocation, RecordingSurface};
pub use text::TextElement;

use std::cell::RefCell;
use std::rc::Rc;

use crate::types::{Color, Point};

// =============================================================================
// Geometry payloads
// =============================================================================

/// Handle to a live allocation on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub u64);

/// How a vertex list is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveMode {
    /// Four vertices per quad.
    Quads,
    /// Two vertices per line segment.
    Lines,
}

/// One interleaved vertex: position, color, texture coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: [i32; 2],
    pub color: Color,
    pub uv: [f32; 2],
}

impl Vertex {
    pub const fn new(x: i32, y: i32, color: Color, uv: [f32; 2]) -> Self {
        Self { position: [x, y], color, uv }
    }
}

/// A source texture known to the backend by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Texture {
    pub src: String,
    pub width: i32,
    pub height: i32,
}

impl Texture {
    pub fn new(src: impl Into<String>, width: i32, height: i32) -> Rc<Self> {
        Rc::new(Self { src: src.into(), width, height })
    }
}

/// A vertex list ready for allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub mode: PrimitiveMode,
    pub vertices: Vec<Vertex>,
    pub texture: Option<Rc<Texture>>,
}

// =============================================================================
// Text
// =============================================================================

/// Font selection for a text run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontSpec {
    pub name: String,
    pub size: u32,
    pub bold: bool,
    pub italic: bool,
}

/// Measured extent of a line of text. `descent` is zero or negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextExtent {
    pub width: i32,
    pub ascent: i32,
    pub descent: i32,
}

impl TextExtent {
    #[inline]
    pub fn height(&self) -> i32 {
        self.ascent - self.descent
    }
}

/// A single line of text anchored at its baseline origin.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub font: FontSpec,
    pub color: Color,
    pub origin: Point,
}

// =============================================================================
// Surface
// =============================================================================

/// The immediate-mode drawing substrate widgets render into.
pub trait Surface {
    /// Allocate a mesh in a paint group.
    fn allocate(&mut self, group: &GroupRef, mesh: Mesh) -> MeshId;

    /// Replace the vertices of a live mesh.
    fn update_vertices(&mut self, id: MeshId, vertices: Vec<Vertex>);

    /// Recolor every vertex of a live mesh or text run.
    fn update_color(&mut self, id: MeshId, color: Color);

    /// Allocate a text run in a paint group.
    fn allocate_text(&mut self, group: &GroupRef, run: TextRun) -> MeshId;

    /// Move a live text run.
    fn move_text(&mut self, id: MeshId, origin: Point);

    /// Measure one line of text.
    fn measure_text(&self, text: &str, font: &FontSpec) -> TextExtent;

    /// Release an allocation. Unknown ids are ignored.
    fn delete(&mut self, id: MeshId);

    /// Group ordering changed; re-sort before the next draw.
    fn resort(&mut self);
}

impl std::fmt::Debug for dyn Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Surface")
    }
}

/// Shared handle to the single drawing surface.
pub type SurfaceRef = Rc<RefCell<dyn Surface>>;
