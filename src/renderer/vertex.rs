//! Vertex types for the blade ribbon
//!
//! Plain `#[repr(C)]` floats so the host can upload the ribbon straight into a
//! GPU buffer.

use bytemuck::{Pod, Zeroable};
use serde::Serialize;

/// 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable, Serialize)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    /// Floats per vertex: x, y, r, g, b, a
    pub const FLOATS: usize = 6;

    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// Colors for game elements
pub mod colors {
    /// White blade, slightly transparent
    pub const BLADE: [f32; 4] = [1.0, 1.0, 1.0, 0.9];
}

/// View a vertex slice as interleaved floats
pub fn as_floats(vertices: &[Vertex]) -> &[f32] {
    bytemuck::cast_slice(vertices)
}
