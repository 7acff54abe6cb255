/// GraphicsDevice trait - resource factory consumed by drawables

use std::sync::Arc;
use crate::error::Result;
use crate::graphics_device::{Buffer, BufferDesc};

/// Resource factory used to allocate device buffers
///
/// Implemented by the rendering backend. The cull visitor holds it as
/// `Arc<Mutex<dyn GraphicsDevice>>` and hands it to
/// `Drawable::configure_device_buffers` during traversal.
pub trait GraphicsDevice: Send + Sync {
    /// Create a buffer
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfMemory` or `Error::BackendError` on failure.
    fn create_buffer(&mut self, desc: BufferDesc) -> Result<Arc<dyn Buffer>>;
}
