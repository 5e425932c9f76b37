//! Vertex and index buffer wrappers
//!
//! Thin owners of a `wgpu::Buffer` that remember how many elements they hold.

use wgpu::util::DeviceExt;

use crate::gfx::scene::vertex::Vertex3D;

pub struct VertexBuffer {
    buffer: wgpu::Buffer,
    len: u32,
}

impl VertexBuffer {
    pub fn new(device: &wgpu::Device, label: &str, vertices: &[Vertex3D]) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", label)),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self {
            buffer,
            len: vertices.len() as u32,
        }
    }

    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..)
    }

    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

pub struct IndexBuffer {
    buffer: wgpu::Buffer,
    len: u32,
}

impl IndexBuffer {
    pub const FORMAT: wgpu::IndexFormat = wgpu::IndexFormat::Uint32;

    pub fn new(device: &wgpu::Device, label: &str, indices: &[u32]) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", label)),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            buffer,
            len: indices.len() as u32,
        }
    }

    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..)
    }

    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
