//! Vertex types for 2D sprite rendering

use bytemuck::{Pod, Zeroable};

use crate::sim::ObstacleKind;

/// Textured, tinted 2D vertex
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, u: f32, v: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            uv: [u, v],
            color,
        }
    }

    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x4];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Colors for game elements and sprite fallbacks
pub mod colors {
    pub const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const GRAY: [f32; 4] = [0.5, 0.5, 0.5, 1.0];
    pub const ORANGE: [f32; 4] = [1.0, 0.65, 0.0, 1.0];
    pub const BROWN: [f32; 4] = [0.65, 0.16, 0.16, 1.0];
    pub const GREEN: [f32; 4] = [0.0, 0.5, 0.0, 1.0];
    pub const BLUE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
    pub const PURPLE: [f32; 4] = [0.5, 0.0, 0.5, 1.0];
    pub const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const CYAN: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
    pub const YELLOW: [f32; 4] = [1.0, 1.0, 0.0, 1.0];

    /// Same color at a different opacity
    pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
        [color[0], color[1], color[2], alpha.clamp(0.0, 1.0)]
    }
}

/// Fill used when an obstacle's sprite is unavailable
pub fn obstacle_fallback(kind: ObstacleKind) -> [f32; 4] {
    match kind {
        ObstacleKind::LightRock | ObstacleKind::FastFragment | ObstacleKind::HeavyDebris => {
            colors::GRAY
        }
        ObstacleKind::DenseShard => colors::ORANGE,
        ObstacleKind::DriftingJunk => colors::BROWN,
        ObstacleKind::LargeCraft => colors::GREEN,
    }
}
