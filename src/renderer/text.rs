//! Live text runs.

use super::{GroupRef, MeshId, SurfaceRef, TextRun};
use crate::types::{Color, Point};

/// A text run placed on a surface. Released on drop.
#[derive(Debug)]
pub struct TextElement {
    id: Option<MeshId>,
    run: TextRun,
    surface: SurfaceRef,
}

impl TextElement {
    pub fn new(surface: &SurfaceRef, group: &GroupRef, run: TextRun) -> Self {
        let id = surface.borrow_mut().allocate_text(group, run.clone());
        Self { id: Some(id), run, surface: surface.clone() }
    }

    pub fn text(&self) -> &str {
        &self.run.text
    }

    pub fn origin(&self) -> Point {
        self.run.origin
    }

    pub fn mesh_id(&self) -> Option<MeshId> {
        self.id
    }

    /// Move the baseline origin.
    pub fn move_to(&mut self, origin: Point) {
        if origin == self.run.origin {
            return;
        }
        self.run.origin = origin;
        if let Some(id) = self.id {
            self.surface.borrow_mut().move_text(id, origin);
        }
    }

    pub fn set_color(&mut self, color: Color) {
        if color == self.run.color {
            return;
        }
        self.run.color = color;
        if let Some(id) = self.id {
            self.surface.borrow_mut().update_color(id, color);
        }
    }

    /// Delete the allocation. Safe to call more than once.
    pub fn release(&mut self) {
        if let Some(id) = self.id.take() {
            match self.surface.try_borrow_mut() {
                Ok(mut surface) => surface.delete(id),
                Err(_) => tracing::warn!(?id, "surface busy while releasing text"),
            }
        }
    }
}

impl Drop for TextElement {
    fn drop(&mut self) {
        self.release();
    }
}
