//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for overlay elements (fruit/particles carry their own)
pub mod colors {
    /// Pointer dot and trail
    pub const POINTER: [f32; 4] = [0.0, 1.0, 1.0, 0.8];
    pub const TRAIL: [f32; 3] = [0.0, 1.0, 1.0];
    /// Hand landmark dots
    pub const LANDMARK: [f32; 4] = [1.0, 0.0, 0.0, 0.7];
    /// Skeleton bone lines
    pub const BONE: [f32; 4] = [1.0, 1.0, 1.0, 0.5];
}
