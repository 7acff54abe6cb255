/// Drawable - leaf node content: primitive sets over a geometry provider.

use std::sync::{Arc, Mutex, MutexGuard};
use crate::bounding::BoundingBox;
use crate::error::Result;
use crate::engine_bail;
use crate::graphics_device::{Buffer, CommandList, GraphicsDevice, VertexLayout};
use crate::scene_graph::{DrawableGeometry, PrimitiveSet};

/// Replaces the default draw of a drawable
pub type DrawCallback = Arc<dyn Fn(&mut dyn CommandList, &Drawable) -> Result<()> + Send + Sync>;

/// Drawable content of a Drawable node
pub struct Drawable {
    name: String,
    vertex_layout: VertexLayout,
    primitive_sets: Vec<Arc<PrimitiveSet>>,
    geometry: Mutex<Box<dyn DrawableGeometry>>,
    draw_callback: Option<DrawCallback>,
}

impl Drawable {
    /// Drawable over `geometry`, vertex layout taken from the geometry
    pub fn new<G: DrawableGeometry + 'static>(name: &str, geometry: G) -> Self {
        let vertex_layout = geometry.vertex_layout();
        Self {
            name: name.to_string(),
            vertex_layout,
            primitive_sets: Vec::new(),
            geometry: Mutex::new(Box::new(geometry)),
            draw_callback: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn vertex_layout(&self) -> &VertexLayout {
        &self.vertex_layout
    }

    pub fn set_vertex_layout(&mut self, layout: VertexLayout) {
        self.vertex_layout = layout;
    }

    fn geometry(&self) -> MutexGuard<'_, Box<dyn DrawableGeometry>> {
        self.geometry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replace the geometry provider (invalidates every primitive set bound)
    pub fn set_geometry<G: DrawableGeometry + 'static>(&mut self, geometry: G) {
        self.vertex_layout = geometry.vertex_layout();
        match self.geometry.get_mut() {
            Ok(slot) => *slot = Box::new(geometry),
            Err(poisoned) => *poisoned.into_inner() = Box::new(geometry),
        }
        self.dirty_primitive_set_bounds();
    }

    /// Run `f` with the geometry locked
    pub fn with_geometry<R>(&self, f: impl FnOnce(&dyn DrawableGeometry) -> R) -> R {
        let geometry = self.geometry();
        f(geometry.as_ref())
    }

    // ===== PRIMITIVE SETS =====

    pub fn primitive_sets(&self) -> &[Arc<PrimitiveSet>] {
        &self.primitive_sets
    }

    pub fn num_primitive_sets(&self) -> usize {
        self.primitive_sets.len()
    }

    pub fn add_primitive_set(&mut self, primitive_set: PrimitiveSet) {
        self.primitive_sets.push(Arc::new(primitive_set));
    }

    /// Remove and return the set at `index`
    pub fn remove_primitive_set(&mut self, index: usize) -> Result<Arc<PrimitiveSet>> {
        if index >= self.primitive_sets.len() {
            engine_bail!(
                "galaxy3d::Drawable",
                InvalidArgument,
                "primitive set index {} out of range for drawable '{}' ({} sets)",
                index,
                self.name,
                self.primitive_sets.len()
            );
        }
        Ok(self.primitive_sets.remove(index))
    }

    /// Mutable access to one set (copy-on-write if a frame still holds it)
    pub fn primitive_set_mut(&mut self, index: usize) -> Result<&mut PrimitiveSet> {
        if index >= self.primitive_sets.len() {
            engine_bail!(
                "galaxy3d::Drawable",
                InvalidArgument,
                "primitive set index {} out of range for drawable '{}' ({} sets)",
                index,
                self.name,
                self.primitive_sets.len()
            );
        }
        Ok(Arc::make_mut(&mut self.primitive_sets[index]))
    }

    /// Cached bound of one primitive set
    pub fn primitive_set_bounding_box(&self, index: usize) -> Option<BoundingBox> {
        let primitive_set = self.primitive_sets.get(index)?;
        let geometry = self.geometry();
        Some(primitive_set.bounding_box(geometry.as_ref()))
    }

    /// Union of every primitive set bound
    pub fn compute_bounding_box(&self) -> BoundingBox {
        let geometry = self.geometry();
        let mut bb = BoundingBox::EMPTY;
        for primitive_set in &self.primitive_sets {
            bb.expand_by_box(&primitive_set.bounding_box(geometry.as_ref()));
        }
        bb
    }

    pub fn dirty_primitive_set_bounds(&self) {
        for primitive_set in &self.primitive_sets {
            primitive_set.dirty_bound();
        }
    }

    // ===== DEVICE BUFFERS =====

    /// Let the geometry allocate / refresh its device buffers (idempotent)
    pub fn configure_device_buffers(&self, device: &mut dyn GraphicsDevice) -> Result<()> {
        self.geometry().configure_device_buffers(device)
    }

    pub fn vertex_buffer(&self) -> Option<Arc<dyn Buffer>> {
        self.geometry().vertex_buffer()
    }

    pub fn index_buffer(&self) -> Option<Arc<dyn Buffer>> {
        self.geometry().index_buffer()
    }

    // ===== DRAW =====

    pub fn draw_callback(&self) -> Option<&DrawCallback> {
        self.draw_callback.as_ref()
    }

    pub fn set_draw_callback(&mut self, callback: Option<DrawCallback>) {
        self.draw_callback = callback;
    }

    /// Record the draw commands of every primitive set.
    ///
    /// A custom draw callback, when set, replaces the default: bind the
    /// vertex buffer, bind the index buffer if any, draw each set in order.
    pub fn draw(&self, cmd: &mut dyn CommandList) -> Result<()> {
        if let Some(callback) = &self.draw_callback {
            return callback(cmd, self);
        }

        let (vertex_buffer, index_buffer, index_type) = {
            let geometry = self.geometry();
            (geometry.vertex_buffer(), geometry.index_buffer(), geometry.index_type())
        };

        if let Some(buffer) = &vertex_buffer {
            cmd.bind_vertex_buffer(buffer, 0)?;
        }
        if let Some(buffer) = &index_buffer {
            cmd.bind_index_buffer(buffer, 0, index_type)?;
        }
        for primitive_set in &self.primitive_sets {
            primitive_set.draw(cmd)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "drawable_tests.rs"]
mod tests;
