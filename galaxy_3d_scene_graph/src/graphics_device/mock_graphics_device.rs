/// Mock graphics device for unit tests (no GPU required)
///
/// Records buffer creations, buffer uploads and draw commands so tests can
/// assert on what the scene graph asked the device to do.

use std::sync::{Arc, Mutex};
use crate::error::{Error, Result};
use crate::graphics_device::{
    Buffer, BufferDesc, BufferUsage, CommandList, GraphicsDevice, IndexType,
    Texture, TextureFormat, TextureInfo,
};

// ============================================================================
// Mock Buffer
// ============================================================================

pub struct MockBuffer {
    pub name: String,
    pub size: u64,
    pub usage: BufferUsage,
    /// (offset, byte count) of every update
    pub updates: Mutex<Vec<(u64, usize)>>,
}

impl MockBuffer {
    pub fn new(desc: BufferDesc) -> Self {
        Self {
            name: desc.name,
            size: desc.size,
            usage: desc.usage,
            updates: Mutex::new(Vec::new()),
        }
    }
}

impl Buffer for MockBuffer {
    fn size(&self) -> u64 {
        self.size
    }

    fn usage(&self) -> BufferUsage {
        self.usage
    }

    fn update(&self, offset: u64, data: &[u8]) -> Result<()> {
        if offset + data.len() as u64 > self.size {
            return Err(Error::InvalidResource(format!(
                "update of {} bytes at {} overflows buffer '{}' ({} bytes)",
                data.len(), offset, self.name, self.size
            )));
        }
        self.updates.lock().unwrap().push((offset, data.len()));
        Ok(())
    }
}

// ============================================================================
// Mock Texture
// ============================================================================

pub struct MockTexture {
    pub info: TextureInfo,
}

impl MockTexture {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            info: TextureInfo {
                width,
                height,
                format: TextureFormat::R8G8B8A8_UNORM,
                mip_levels: 1,
            },
        }
    }
}

impl Texture for MockTexture {
    fn info(&self) -> TextureInfo {
        self.info
    }
}

// ============================================================================
// Mock GraphicsDevice
// ============================================================================

#[derive(Default)]
pub struct MockGraphicsDevice {
    /// Descriptors of every created buffer, in creation order
    pub created: Vec<BufferDesc>,
    /// When set, create_buffer fails with OutOfMemory
    pub fail_allocations: bool,
}

impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Mutex<MockGraphicsDevice>> {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn buffer_count(&self) -> usize {
        self.created.len()
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn create_buffer(&mut self, desc: BufferDesc) -> Result<Arc<dyn Buffer>> {
        if self.fail_allocations {
            return Err(Error::OutOfMemory);
        }
        self.created.push(desc.clone());
        Ok(Arc::new(MockBuffer::new(desc)))
    }
}

// ============================================================================
// Mock CommandList
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCommand {
    BindVertexBuffer { size: u64 },
    BindIndexBuffer { size: u64, index_type: IndexType },
    Draw { vertex_count: u32, first_vertex: u32 },
    DrawIndexed { index_count: u32, first_index: u32, vertex_offset: i32 },
}

#[derive(Default)]
pub struct MockCommandList {
    pub commands: Vec<MockCommand>,
}

impl MockCommandList {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CommandList for MockCommandList {
    fn bind_vertex_buffer(&mut self, buffer: &Arc<dyn Buffer>, _offset: u64) -> Result<()> {
        self.commands.push(MockCommand::BindVertexBuffer { size: buffer.size() });
        Ok(())
    }

    fn bind_index_buffer(
        &mut self,
        buffer: &Arc<dyn Buffer>,
        _offset: u64,
        index_type: IndexType,
    ) -> Result<()> {
        self.commands.push(MockCommand::BindIndexBuffer { size: buffer.size(), index_type });
        Ok(())
    }

    fn draw(&mut self, vertex_count: u32, first_vertex: u32) -> Result<()> {
        self.commands.push(MockCommand::Draw { vertex_count, first_vertex });
        Ok(())
    }

    fn draw_indexed(&mut self, index_count: u32, first_index: u32, vertex_offset: i32) -> Result<()> {
        self.commands.push(MockCommand::DrawIndexed { index_count, first_index, vertex_offset });
        Ok(())
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
