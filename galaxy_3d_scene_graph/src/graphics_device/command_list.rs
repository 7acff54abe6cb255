/// CommandList trait - draw commands issued by drawables

use std::sync::Arc;
use crate::error::Result;
use crate::graphics_device::{Buffer, IndexType};

/// Command recording surface used by `Drawable::draw` and primitive sets
///
/// Only the subset of commands a drawable needs. Pipeline and resource set
/// binding belong to the external draw-submission stage.
pub trait CommandList {
    /// Bind a vertex buffer at binding 0
    fn bind_vertex_buffer(&mut self, buffer: &Arc<dyn Buffer>, offset: u64) -> Result<()>;

    /// Bind an index buffer
    fn bind_index_buffer(
        &mut self,
        buffer: &Arc<dyn Buffer>,
        offset: u64,
        index_type: IndexType,
    ) -> Result<()>;

    /// Non-indexed draw
    fn draw(&mut self, vertex_count: u32, first_vertex: u32) -> Result<()>;

    /// Indexed draw
    ///
    /// # Arguments
    ///
    /// * `index_count` - Number of indices to draw
    /// * `first_index` - First index in the bound index buffer
    /// * `vertex_offset` - Value added to each index before fetching the vertex
    fn draw_indexed(&mut self, index_count: u32, first_index: u32, vertex_offset: i32) -> Result<()>;
}
