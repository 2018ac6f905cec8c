//! Shape generation for 2D primitives
//!
//! Converts a `Scene` into one triangle list in normalized device coordinates,
//! split into batches that share a texture.

use glam::Vec2;

use super::scene::{DrawCommand, Scene};
use super::vertex::{Vertex, colors};
use crate::assets::AssetId;
use crate::sim::{Field, Rect};

/// Run of vertices drawn with one texture (`None` = plain white)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Batch {
    pub texture: Option<AssetId>,
    pub start: u32,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub batches: Vec<Batch>,
}

impl Mesh {
    fn push(&mut self, texture: Option<AssetId>, vertices: &[Vertex]) {
        let start = self.vertices.len() as u32;
        self.vertices.extend_from_slice(vertices);
        let count = vertices.len() as u32;

        match self.batches.last_mut() {
            Some(last) if last.texture == texture => last.count += count,
            _ => self.batches.push(Batch {
                texture,
                start,
                count,
            }),
        }
    }
}

/// Field pixels (y down) to NDC (y up)
pub fn pixel_to_ndc(field: Field, p: Vec2) -> Vec2 {
    let w = field.width.max(1.0);
    let h = field.height.max(1.0);
    Vec2::new(p.x / w * 2.0 - 1.0, 1.0 - p.y / h * 2.0)
}

/// Two triangles covering `rect`, with the full texture mapped onto it
pub fn quad(field: Field, rect: Rect, color: [f32; 4]) -> [Vertex; 6] {
    let min = pixel_to_ndc(field, rect.min());
    let max = pixel_to_ndc(field, rect.max());

    let tl = Vertex::new(min.x, min.y, 0.0, 0.0, color);
    let tr = Vertex::new(max.x, min.y, 1.0, 0.0, color);
    let bl = Vertex::new(min.x, max.y, 0.0, 1.0, color);
    let br = Vertex::new(max.x, max.y, 1.0, 1.0, color);

    [tl, bl, tr, tr, bl, br]
}

/// Four bars along the edges of `rect`, centred on the edge like a canvas stroke
pub fn outline(field: Field, rect: Rect, color: [f32; 4], thickness: f32) -> Vec<Vertex> {
    let half = thickness / 2.0;
    let min = rect.min();
    let max = rect.max();
    let span = rect.size;

    let bars = [
        Rect::new(min.x - half, min.y - half, span.x + thickness, thickness),
        Rect::new(min.x - half, max.y - half, span.x + thickness, thickness),
        Rect::new(min.x - half, min.y + half, thickness, (span.y - thickness).max(0.0)),
        Rect::new(max.x - half, min.y + half, thickness, (span.y - thickness).max(0.0)),
    ];

    bars.iter()
        .flat_map(|bar| quad(field, *bar, color))
        .collect()
}

/// Build the frame's mesh in draw order
pub fn tessellate(scene: &Scene) -> Mesh {
    let field = scene.field;
    let mut mesh = Mesh::default();

    for command in &scene.commands {
        match command {
            DrawCommand::Sprite { asset, rect, alpha } => {
                let tint = colors::with_alpha(colors::WHITE, *alpha);
                mesh.push(Some(*asset), &quad(field, *rect, tint));
            }
            DrawCommand::Fill { rect, color } => {
                mesh.push(None, &quad(field, *rect, *color));
            }
            DrawCommand::Outline {
                rect,
                color,
                thickness,
            } => {
                mesh.push(None, &outline(field, *rect, *color, *thickness));
            }
        }
    }

    mesh
}
