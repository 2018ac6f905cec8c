//! WebGPU rendering module
//!
//! The scene builder produces a draw list from the game state; the sprite
//! pipeline tessellates it and draws it in a single pass.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{DrawCommand, Scene, build_scene, fallback_scene};
