/// Graphics device module - the device-facing types the scene graph consumes
///
/// Only interfaces and descriptors live here; real backends implement
/// `GraphicsDevice`, `Buffer`, `Texture` and `CommandList` elsewhere.

pub mod graphics_device;
pub mod buffer;
pub mod texture;
pub mod pipeline;
pub mod command_list;

pub use graphics_device::*;
pub use buffer::*;
pub use texture::*;
pub use pipeline::*;
pub use command_list::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
