//! In-memory surface.
//!
//! Keeps every live allocation in a map so callers can inspect what would
//! be drawn: how many pieces are alive, their vertices, their stacking
//! order and clip rectangles. Text is measured with fixed-advance metrics.

use std::collections::HashMap;

use super::{FontSpec, GroupRef, Mesh, MeshId, Surface, TextExtent, TextRun, Vertex};
use crate::types::{Color, Point, Rect};

/// A live allocation.
#[derive(Debug, Clone)]
pub enum Allocation {
    Mesh { group: GroupRef, mesh: Mesh },
    Text { group: GroupRef, run: TextRun },
}

impl Allocation {
    pub fn group(&self) -> &GroupRef {
        match self {
            Allocation::Mesh { group, .. } | Allocation::Text { group, .. } => group,
        }
    }
}

/// Headless [`Surface`] that records allocations.
#[derive(Debug)]
pub struct RecordingSurface {
    next_id: u64,
    live: HashMap<MeshId, Allocation>,
    resorts: usize,
    /// Glyph advance as a fraction of font size.
    advance: f32,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self { next_id: 0, live: HashMap::new(), resorts: 0, advance: 0.5 }
    }

    /// Number of live allocations.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn get(&self, id: MeshId) -> Option<&Allocation> {
        self.live.get(&id)
    }

    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        match self.live.get(&id) {
            Some(Allocation::Mesh { mesh, .. }) => Some(mesh),
            _ => None,
        }
    }

    pub fn text(&self, id: MeshId) -> Option<&TextRun> {
        match self.live.get(&id) {
            Some(Allocation::Text { run, .. }) => Some(run),
            _ => None,
        }
    }

    /// All live text runs, in no particular order.
    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.live.values().filter_map(|a| match a {
            Allocation::Text { run, .. } => Some(run),
            Allocation::Mesh { .. } => None,
        })
    }

    /// Live ids in draw order: by group path, then allocation order.
    pub fn draw_list(&self) -> Vec<MeshId> {
        let mut keyed: Vec<(Vec<u64>, MeshId)> = self
            .live
            .iter()
            .map(|(id, alloc)| (alloc.group().sort_key(), *id))
            .collect();
        keyed.sort();
        keyed.into_iter().map(|(_, id)| id).collect()
    }

    /// Scissor rectangle an allocation is drawn under, if any.
    pub fn clip_of(&self, id: MeshId) -> Option<Rect> {
        self.live.get(&id).and_then(|a| a.group().clip_rect())
    }

    /// How many times a re-sort was requested.
    pub fn resort_count(&self) -> usize {
        self.resorts
    }

    fn insert(&mut self, alloc: Allocation) -> MeshId {
        self.next_id += 1;
        let id = MeshId(self.next_id);
        self.live.insert(id, alloc);
        id
    }
}

impl Surface for RecordingSurface {
    fn allocate(&mut self, group: &GroupRef, mesh: Mesh) -> MeshId {
        self.insert(Allocation::Mesh { group: group.clone(), mesh })
    }

    fn update_vertices(&mut self, id: MeshId, vertices: Vec<Vertex>) {
        match self.live.get_mut(&id) {
            Some(Allocation::Mesh { mesh, .. }) => mesh.vertices = vertices,
            _ => tracing::warn!(?id, "update_vertices on a dead or text allocation"),
        }
    }

    fn update_color(&mut self, id: MeshId, color: Color) {
        match self.live.get_mut(&id) {
            Some(Allocation::Mesh { mesh, .. }) => {
                for v in &mut mesh.vertices {
                    v.color = color;
                }
            }
            Some(Allocation::Text { run, .. }) => run.color = color,
            None => tracing::warn!(?id, "update_color on a dead allocation"),
        }
    }

    fn allocate_text(&mut self, group: &GroupRef, run: TextRun) -> MeshId {
        self.insert(Allocation::Text { group: group.clone(), run })
    }

    fn move_text(&mut self, id: MeshId, origin: Point) {
        match self.live.get_mut(&id) {
            Some(Allocation::Text { run, .. }) => run.origin = origin,
            _ => tracing::warn!(?id, "move_text on a dead or mesh allocation"),
        }
    }

    fn measure_text(&self, text: &str, font: &FontSpec) -> TextExtent {
        let chars = text.chars().count() as f32;
        let size = font.size as i32;
        TextExtent {
            width: (chars * font.size as f32 * self.advance).ceil() as i32,
            ascent: size,
            descent: -(size / 4),
        }
    }

    fn delete(&mut self, id: MeshId) {
        if self.live.remove(&id).is_none() {
            tracing::trace!(?id, "delete of unknown allocation ignored");
        }
    }

    fn resort(&mut self) {
        self.resorts += 1;
    }
}
