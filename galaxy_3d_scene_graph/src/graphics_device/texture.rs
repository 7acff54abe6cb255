/// Texture trait

/// Texture format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    R8G8B8A8_UNORM,
    R8G8B8A8_SRGB,
    B8G8R8A8_UNORM,
    D32_FLOAT,
}

/// Texture description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub mip_levels: u32,
}

/// Device texture
///
/// Opaque to the scene graph: pipeline states only carry shared handles.
pub trait Texture: Send + Sync {
    /// Texture description
    fn info(&self) -> TextureInfo;
}
