/// Geometry providers for drawables.
///
/// A drawable does not know how its vertices are stored: it delegates bound
/// computation and device buffer management to a `DrawableGeometry`.
/// `MeshGeometry` is the stock implementation for typed vertex arrays.

use std::sync::Arc;
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use crate::bounding::BoundingBox;
use crate::error::Result;
use crate::graphics_device::{
    Buffer, BufferDesc, BufferFormat, BufferUsage, GraphicsDevice, IndexType, VertexLayout,
};
use crate::scene_graph::DrawRange;

// ===== DRAWABLE GEOMETRY =====

/// Source of vertex data and device buffers for a Drawable
pub trait DrawableGeometry: Send {
    /// Layout of one vertex
    fn vertex_layout(&self) -> VertexLayout;

    /// Bound of the vertices touched by `range` (empty if none)
    fn compute_bounding_box(&self, range: &DrawRange) -> BoundingBox;

    /// Allocate and fill device buffers. Must be idempotent: called by the
    /// cull visitor every frame the drawable survives culling.
    fn configure_device_buffers(&mut self, _device: &mut dyn GraphicsDevice) -> Result<()> {
        Ok(())
    }

    fn vertex_buffer(&self) -> Option<Arc<dyn Buffer>> {
        None
    }

    fn index_buffer(&self) -> Option<Arc<dyn Buffer>> {
        None
    }

    fn index_type(&self) -> IndexType {
        IndexType::U32
    }
}

// ===== VERTEX TYPES =====

/// Plain-old-data vertex with a position
pub trait Vertex: Pod + Send {
    fn position(&self) -> Vec3;

    /// Interleaved layout of this vertex type
    fn layout() -> VertexLayout;
}

/// Position-only vertex
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct VertexPosition {
    pub position: [f32; 3],
}

impl VertexPosition {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { position: [x, y, z] }
    }
}

impl Vertex for VertexPosition {
    fn position(&self) -> Vec3 {
        Vec3::from(self.position)
    }

    fn layout() -> VertexLayout {
        VertexLayout::interleaved(&[BufferFormat::R32G32B32_SFLOAT])
    }
}

/// Position + RGBA color vertex
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct VertexPositionColor {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl VertexPositionColor {
    pub fn new(position: [f32; 3], color: [f32; 4]) -> Self {
        Self { position, color }
    }
}

impl Vertex for VertexPositionColor {
    fn position(&self) -> Vec3 {
        Vec3::from(self.position)
    }

    fn layout() -> VertexLayout {
        VertexLayout::interleaved(&[
            BufferFormat::R32G32B32_SFLOAT,
            BufferFormat::R32G32B32A32_SFLOAT,
        ])
    }
}

// ===== MESH GEOMETRY =====

/// Vertex array + 32-bit index array with lazily uploaded device buffers.
///
/// Buffers are created on the first `configure_device_buffers` call and
/// reused afterwards. The arrays are immutable once built: new data goes
/// through `Drawable::set_geometry`, which also invalidates the bounds.
pub struct MeshGeometry<V: Vertex> {
    name: String,
    vertices: Vec<V>,
    indices: Vec<u32>,
    vertex_buffer: Option<Arc<dyn Buffer>>,
    index_buffer: Option<Arc<dyn Buffer>>,
}

impl<V: Vertex> MeshGeometry<V> {
    pub fn new(name: &str, vertices: Vec<V>, indices: Vec<u32>) -> Self {
        Self {
            name: name.to_string(),
            vertices,
            indices,
            vertex_buffer: None,
            index_buffer: None,
        }
    }

    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    fn upload(
        device: &mut dyn GraphicsDevice,
        name: String,
        usage: BufferUsage,
        bytes: &[u8],
    ) -> Result<Arc<dyn Buffer>> {
        let buffer = device.create_buffer(BufferDesc {
            name,
            size: bytes.len() as u64,
            usage,
        })?;
        buffer.update(0, bytes)?;
        Ok(buffer)
    }
}

impl<V: Vertex> DrawableGeometry for MeshGeometry<V> {
    fn vertex_layout(&self) -> VertexLayout {
        V::layout()
    }

    fn compute_bounding_box(&self, range: &DrawRange) -> BoundingBox {
        let mut bb = BoundingBox::EMPTY;

        match *range {
            DrawRange::DrawArrays { first, count } => {
                let start = (first as usize).min(self.vertices.len());
                let end = start.saturating_add(count as usize).min(self.vertices.len());
                for v in &self.vertices[start..end] {
                    bb.expand_by_point(v.position());
                }
            }
            DrawRange::DrawElements { first_index, index_count, base_vertex } => {
                let start = (first_index as usize).min(self.indices.len());
                let end = start.saturating_add(index_count as usize).min(self.indices.len());
                for &index in &self.indices[start..end] {
                    let vertex = index as i64 + base_vertex as i64;
                    if vertex < 0 {
                        continue;
                    }
                    if let Some(v) = self.vertices.get(vertex as usize) {
                        bb.expand_by_point(v.position());
                    }
                }
            }
        }

        bb
    }

    fn configure_device_buffers(&mut self, device: &mut dyn GraphicsDevice) -> Result<()> {
        if self.vertex_buffer.is_none() && !self.vertices.is_empty() {
            self.vertex_buffer = Some(Self::upload(
                device,
                format!("{}_vertices", self.name),
                BufferUsage::Vertex,
                bytemuck::cast_slice(&self.vertices),
            )?);
        }

        if self.index_buffer.is_none() && !self.indices.is_empty() {
            self.index_buffer = Some(Self::upload(
                device,
                format!("{}_indices", self.name),
                BufferUsage::Index,
                bytemuck::cast_slice(&self.indices),
            )?);
        }

        Ok(())
    }

    fn vertex_buffer(&self) -> Option<Arc<dyn Buffer>> {
        self.vertex_buffer.clone()
    }

    fn index_buffer(&self) -> Option<Arc<dyn Buffer>> {
        self.index_buffer.clone()
    }
}

#[cfg(test)]
#[path = "geometry_tests.rs"]
mod tests;
