//! Graphic templates and the live elements they generate.
//!
//! A template describes a piece of skin: a plain texture region, a 9-slice
//! frame that stretches its interior, or the placeholder box drawn for
//! anything the theme does not define. `generate` allocates a mesh on the
//! surface and hands back a [`GraphicElement`] that owns it. Dropping or
//! releasing the element deletes the allocation.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::{GuiError, Result};
use crate::renderer::{GroupRef, Mesh, MeshId, PrimitiveMode, SurfaceRef, Texture, Vertex};
use crate::types::{Color, Insets, Rect, Size, insets, size};

/// Natural size of the placeholder graphic.
pub const PLACEHOLDER_SIZE: i32 = 8;

/// Image declaration as it appears in theme data.
///
/// `region` is `[x, y, width, height]` in the source texture, `stretch` is
/// the 9-slice interior as `[left, bottom, width, height]` relative to the
/// region, and `padding` is `[left, right, top, bottom]` content insets.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageSpec {
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<[i32; 4]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stretch: Option<[i32; 4]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<[i32; 4]>,
}

/// A factory for live graphic elements.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageTemplate {
    /// Outlined box with diagonals, drawn with lines.
    Placeholder,
    /// A texture region drawn as one quad.
    Texture { texture: Rc<Texture>, region: Rect },
    /// A 9-slice frame: fixed margins, stretched interior, content padding.
    Frame {
        texture: Rc<Texture>,
        region: Rect,
        margins: Insets,
        padding: Insets,
    },
}

impl ImageTemplate {
    /// Build a template from theme data and the texture it names.
    pub fn from_spec(spec: &ImageSpec, texture: Rc<Texture>) -> Result<Self> {
        let [x, y, w, h] = spec.region.unwrap_or([0, 0, texture.width, texture.height]);
        if x < 0 || y < 0 || w <= 0 || h <= 0 || x + w > texture.width || y + h > texture.height {
            return Err(GuiError::RegionOutOfBounds {
                src: texture.src.clone(),
                region: [x, y, w, h],
                width: texture.width,
                height: texture.height,
            });
        }
        let region = Rect::new(x, y, w, h);

        if spec.stretch.is_none() && spec.padding.is_none() {
            return Ok(ImageTemplate::Texture { texture, region });
        }

        let [sx, sy, sw, sh] = spec.stretch.unwrap_or([0, 0, w, h]);
        let [pl, pr, pt, pb] = spec.padding.unwrap_or([0, 0, 0, 0]);
        Ok(ImageTemplate::Frame {
            texture,
            region,
            margins: insets(sx, w - sw - sx, h - sh - sy, sy),
            padding: insets(pl, pr, pt, pb),
        })
    }

    /// Plain texture template covering `region`.
    pub fn texture(texture: &Rc<Texture>, region: [i32; 4]) -> Self {
        let [x, y, w, h] = region;
        ImageTemplate::Texture { texture: texture.clone(), region: Rect::new(x, y, w, h) }
    }

    /// 9-slice template; `stretch` is `[left, bottom, width, height]`
    /// relative to `region`, `padding` is `[left, right, top, bottom]`.
    pub fn frame(texture: &Rc<Texture>, region: [i32; 4], stretch: [i32; 4], padding: [i32; 4]) -> Self {
        let [x, y, w, h] = region;
        let [sx, sy, sw, sh] = stretch;
        let [pl, pr, pt, pb] = padding;
        ImageTemplate::Frame {
            texture: texture.clone(),
            region: Rect::new(x, y, w, h),
            margins: insets(sx, w - sw - sx, h - sh - sy, sy),
            padding: insets(pl, pr, pt, pb),
        }
    }

    /// Size of the source artwork.
    pub fn natural_size(&self) -> Size {
        match self {
            ImageTemplate::Placeholder => size(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE),
            ImageTemplate::Texture { region, .. } | ImageTemplate::Frame { region, .. } => {
                region.size()
            }
        }
    }

    /// Content insets; zero for anything but frames.
    pub fn padding(&self) -> Insets {
        match self {
            ImageTemplate::Frame { padding, .. } => *padding,
            _ => insets(0, 0, 0, 0),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, ImageTemplate::Placeholder)
    }

    /// Allocate a live element at the origin with its natural size.
    pub fn generate(&self, color: Color, surface: &SurfaceRef, group: &GroupRef) -> GraphicElement {
        let rect = Rect::from_size(self.natural_size());
        let mesh = Mesh {
            mode: match self {
                ImageTemplate::Placeholder => PrimitiveMode::Lines,
                _ => PrimitiveMode::Quads,
            },
            vertices: self.vertices(rect, color),
            texture: match self {
                ImageTemplate::Placeholder => None,
                ImageTemplate::Texture { texture, .. } | ImageTemplate::Frame { texture, .. } => {
                    Some(texture.clone())
                }
            },
        };
        let id = surface.borrow_mut().allocate(group, mesh);
        GraphicElement {
            template: self.clone(),
            color,
            rect,
            mesh: Some(id),
            surface: surface.clone(),
        }
    }

    fn vertices(&self, rect: Rect, color: Color) -> Vec<Vertex> {
        match self {
            ImageTemplate::Placeholder => {
                let (x0, y0, x1, y1) = (rect.x, rect.y, rect.right(), rect.top());
                [
                    (x0, y0, x1, y0),
                    (x1, y0, x1, y1),
                    (x1, y1, x0, y1),
                    (x0, y1, x0, y0),
                    (x0, y0, x1, y1),
                    (x0, y1, x1, y0),
                ]
                .iter()
                .flat_map(|&(ax, ay, bx, by)| {
                    [Vertex::new(ax, ay, color, [0.0, 0.0]), Vertex::new(bx, by, color, [0.0, 0.0])]
                })
                .collect()
            }
            ImageTemplate::Texture { texture, region } => {
                let u = uv_span(region.x, region.right(), texture.width);
                let v = uv_span(region.y, region.top(), texture.height);
                quad(rect.x, rect.y, rect.right(), rect.top(), u, v, color).to_vec()
            }
            ImageTemplate::Frame { texture, region, margins, .. } => {
                let xs = [rect.x, rect.x + margins.left, rect.right() - margins.right, rect.right()];
                let ys = [rect.y, rect.y + margins.bottom, rect.top() - margins.top, rect.top()];
                let us = [
                    region.x,
                    region.x + margins.left,
                    region.right() - margins.right,
                    region.right(),
                ]
                .map(|p| p as f32 / texture.width.max(1) as f32);
                let vs = [
                    region.y,
                    region.y + margins.bottom,
                    region.top() - margins.top,
                    region.top(),
                ]
                .map(|p| p as f32 / texture.height.max(1) as f32);

                let mut out = Vec::with_capacity(36);
                for row in 0..3 {
                    for col in 0..3 {
                        out.extend(quad(
                            xs[col],
                            ys[row],
                            xs[col + 1],
                            ys[row + 1],
                            (us[col], us[col + 1]),
                            (vs[row], vs[row + 1]),
                            color,
                        ));
                    }
                }
                out
            }
        }
    }
}

fn uv_span(from: i32, to: i32, extent: i32) -> (f32, f32) {
    let extent = extent.max(1) as f32;
    (from as f32 / extent, to as f32 / extent)
}

fn quad(x0: i32, y0: i32, x1: i32, y1: i32, u: (f32, f32), v: (f32, f32), color: Color) -> [Vertex; 4] {
    [
        Vertex::new(x0, y0, color, [u.0, v.0]),
        Vertex::new(x1, y0, color, [u.1, v.0]),
        Vertex::new(x1, y1, color, [u.1, v.1]),
        Vertex::new(x0, y1, color, [u.0, v.1]),
    ]
}

// =============================================================================
// Live element
// =============================================================================

/// A positioned piece of skin that owns one surface allocation.
#[derive(Debug)]
pub struct GraphicElement {
    template: ImageTemplate,
    color: Color,
    rect: Rect,
    mesh: Option<MeshId>,
    surface: SurfaceRef,
}

impl GraphicElement {
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn width(&self) -> i32 {
        self.rect.width
    }

    pub fn height(&self) -> i32 {
        self.rect.height
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn template(&self) -> &ImageTemplate {
        &self.template
    }

    /// Size of the source artwork.
    pub fn natural_size(&self) -> Size {
        self.template.natural_size()
    }

    /// Surface handle, `None` once released.
    pub fn mesh_id(&self) -> Option<MeshId> {
        self.mesh
    }

    /// Size needed to show `content` inside this element: content plus
    /// padding, never smaller than the artwork.
    pub fn needed_size(&self, content: Size) -> Size {
        match &self.template {
            ImageTemplate::Placeholder => content,
            ImageTemplate::Texture { region, .. } => {
                size(content.width.max(region.width), content.height.max(region.height))
            }
            ImageTemplate::Frame { region, padding, .. } => size(
                (content.width + padding.left + padding.right).max(region.width),
                (content.height + padding.top + padding.bottom).max(region.height),
            ),
        }
    }

    /// Interior size left for content if this element covered `outer`.
    pub fn content_size(&self, outer: Size) -> Size {
        let pad = self.template.padding();
        size(
            (outer.width - pad.left - pad.right).max(0),
            (outer.height - pad.top - pad.bottom).max(0),
        )
    }

    /// Interior area available to content at the current placement.
    pub fn content_region(&self) -> Rect {
        self.rect.inset(self.template.padding())
    }

    /// Move and resize, rewriting the vertices.
    pub fn update(&mut self, rect: Rect) {
        if rect == self.rect {
            return;
        }
        self.rect = rect;
        if let Some(id) = self.mesh {
            let vertices = self.template.vertices(rect, self.color);
            self.surface.borrow_mut().update_vertices(id, vertices);
        }
    }

    pub fn set_color(&mut self, color: Color) {
        if color == self.color {
            return;
        }
        self.color = color;
        if let Some(id) = self.mesh {
            self.surface.borrow_mut().update_color(id, color);
        }
    }

    /// Delete the surface allocation. Safe to call more than once.
    pub fn release(&mut self) {
        if let Some(id) = self.mesh.take() {
            match self.surface.try_borrow_mut() {
                Ok(mut surface) => surface.delete(id),
                Err(_) => tracing::warn!(?id, "surface busy while releasing graphic"),
            }
        }
    }
}

impl Drop for GraphicElement {
    fn drop(&mut self) {
        self.release();
    }
}
