/// PipelineState - render state attached to nodes and drawables.
///
/// Shared through `Arc<PipelineState>`. Batching compares pipeline states by
/// identity (`Arc::ptr_eq`), never by value: two separately built states with
/// equal fields still produce two render group states.

use std::fmt;
use std::sync::Arc;
use crate::graphics_device::{
    BlendState, Buffer, DepthStencilState, RasterizationState, Texture,
};

/// Shader pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex shader
    Vertex,
    /// Fragment/Pixel shader
    Fragment,
}

/// Compiled shader stage description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderStageDesc {
    pub stage: ShaderStage,
    /// Compiled shader bytecode (SPIR-V or DXIL), opaque to the scene graph
    pub code: Arc<[u8]>,
    /// Entry point name
    pub entry_point: String,
}

impl ShaderStageDesc {
    pub fn new(stage: ShaderStage, code: &[u8], entry_point: &str) -> Self {
        Self { stage, code: Arc::from(code), entry_point: entry_point.to_string() }
    }
}

/// Texture bound at a shader binding slot
#[derive(Clone)]
pub struct TextureBinding {
    pub binding: u32,
    pub texture: Arc<dyn Texture>,
}

/// Uniform buffer bound at a shader binding slot
#[derive(Clone)]
pub struct UniformBinding {
    pub binding: u32,
    pub buffer: Arc<dyn Buffer>,
}

/// Pipeline state
#[derive(Clone, Default)]
pub struct PipelineState {
    pub vertex_shader: Option<ShaderStageDesc>,
    pub fragment_shader: Option<ShaderStageDesc>,
    pub texture_bindings: Vec<TextureBinding>,
    pub uniform_bindings: Vec<UniformBinding>,
    pub blend_state: BlendState,
    pub depth_stencil: DepthStencilState,
    pub rasterization: RasterizationState,
}

impl PipelineState {
    /// Default state: no shaders, opaque blending, depth test and write on
    pub fn new() -> Self {
        Self::default()
    }

    /// Alpha-blended state with depth writes off
    pub fn transparent() -> Self {
        Self {
            blend_state: BlendState::single_alpha_blend(),
            depth_stencil: DepthStencilState::DEPTH_READ_ONLY,
            ..Default::default()
        }
    }

    pub fn with_shaders(mut self, vertex: ShaderStageDesc, fragment: ShaderStageDesc) -> Self {
        self.vertex_shader = Some(vertex);
        self.fragment_shader = Some(fragment);
        self
    }

    pub fn with_blend_state(mut self, blend_state: BlendState) -> Self {
        self.blend_state = blend_state;
        self
    }

    pub fn with_depth_stencil(mut self, depth_stencil: DepthStencilState) -> Self {
        self.depth_stencil = depth_stencil;
        self
    }

    pub fn with_rasterization(mut self, rasterization: RasterizationState) -> Self {
        self.rasterization = rasterization;
        self
    }

    pub fn with_texture(mut self, binding: u32, texture: Arc<dyn Texture>) -> Self {
        self.texture_bindings.push(TextureBinding { binding, texture });
        self
    }

    pub fn with_uniform(mut self, binding: u32, buffer: Arc<dyn Buffer>) -> Self {
        self.uniform_bindings.push(UniformBinding { binding, buffer });
        self
    }

    /// Goes to the transparent render group
    pub fn is_transparent(&self) -> bool {
        self.blend_state.has_alpha_blend()
    }

    /// Wrap in an `Arc` for attaching to nodes
    pub fn into_shared(self) -> Arc<PipelineState> {
        Arc::new(self)
    }
}

impl fmt::Debug for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineState")
            .field("vertex_shader", &self.vertex_shader.as_ref().map(|s| &s.entry_point))
            .field("fragment_shader", &self.fragment_shader.as_ref().map(|s| &s.entry_point))
            .field("textures", &self.texture_bindings.len())
            .field("uniforms", &self.uniform_bindings.len())
            .field("blend_state", &self.blend_state)
            .field("depth_stencil", &self.depth_stencil)
            .field("rasterization", &self.rasterization)
            .finish()
    }
}
