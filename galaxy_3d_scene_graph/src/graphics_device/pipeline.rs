/// Fixed-function pipeline descriptors consumed by the scene graph
///
/// Topology and vertex layout are part of the render batching key, so they
/// are hashable. Blend, depth-stencil and rasterization descriptions are
/// compared by value.

use crate::graphics_device::BufferFormat;

/// Primitive topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTopology {
    /// Point list
    PointList,
    /// Line list
    LineList,
    /// Line strip
    LineStrip,
    /// Triangle list
    TriangleList,
    /// Triangle strip
    TriangleStrip,
}

/// Index buffer element type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexType {
    /// 16-bit indices
    U16,
    /// 32-bit indices
    U32,
}

impl IndexType {
    /// Size in bytes of one index element
    pub fn size_bytes(&self) -> u32 {
        match self {
            IndexType::U16 => 2,
            IndexType::U32 => 4,
        }
    }
}

/// Vertex input rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexInputRate {
    /// Per-vertex data
    Vertex,
    /// Per-instance data
    Instance,
}

/// Vertex attribute description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    /// Attribute location in shader
    pub location: u32,
    /// Binding index
    pub binding: u32,
    /// Data format
    pub format: BufferFormat,
    /// Offset in bytes from the start of the vertex
    pub offset: u32,
}

/// Vertex binding description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexBinding {
    /// Binding index
    pub binding: u32,
    /// Stride in bytes between consecutive elements
    pub stride: u32,
    /// Input rate
    pub input_rate: VertexInputRate,
}

/// Vertex input layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct VertexLayout {
    /// Vertex bindings
    pub bindings: Vec<VertexBinding>,
    /// Vertex attributes
    pub attributes: Vec<VertexAttribute>,
}

impl VertexLayout {
    /// Single interleaved binding at slot 0, attributes packed in order
    pub fn interleaved(formats: &[BufferFormat]) -> Self {
        let mut attributes = Vec::with_capacity(formats.len());
        let mut offset = 0;
        for (location, format) in formats.iter().enumerate() {
            attributes.push(VertexAttribute {
                location: location as u32,
                binding: 0,
                format: *format,
                offset,
            });
            offset += format.size_bytes();
        }
        Self {
            bindings: vec![VertexBinding {
                binding: 0,
                stride: offset,
                input_rate: VertexInputRate::Vertex,
            }],
            attributes,
        }
    }
}

// ===== RASTERIZATION =====

/// Face culling mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CullMode {
    None,
    Front,
    Back,
}

/// Front face winding order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrontFace {
    CounterClockwise,
    Clockwise,
}

/// Polygon rendering mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolygonMode {
    Fill,
    Line,
    Point,
}

/// Rasterization fixed-function state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterizationState {
    pub cull_mode: CullMode,
    pub front_face: FrontFace,
    pub polygon_mode: PolygonMode,
    pub depth_clip_enable: bool,
    pub scissor_test_enable: bool,
}

impl Default for RasterizationState {
    fn default() -> Self {
        Self {
            cull_mode: CullMode::Back,
            front_face: FrontFace::CounterClockwise,
            polygon_mode: PolygonMode::Fill,
            depth_clip_enable: true,
            scissor_test_enable: false,
        }
    }
}

// ===== DEPTH / STENCIL =====

/// Comparison operator for depth and stencil tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Never,
    Less,
    Equal,
    LessOrEqual,
    Greater,
    NotEqual,
    GreaterOrEqual,
    Always,
}

/// Depth testing state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthStencilState {
    pub depth_test_enable: bool,
    pub depth_write_enable: bool,
    pub depth_compare_op: CompareOp,
    pub stencil_test_enable: bool,
}

impl DepthStencilState {
    /// Depth test on, depth writes off (typical for blended geometry)
    pub const DEPTH_READ_ONLY: Self = Self {
        depth_test_enable: true,
        depth_write_enable: false,
        depth_compare_op: CompareOp::LessOrEqual,
        stencil_test_enable: false,
    };
}

impl Default for DepthStencilState {
    fn default() -> Self {
        Self {
            depth_test_enable: true,
            depth_write_enable: true,
            depth_compare_op: CompareOp::LessOrEqual,
            stencil_test_enable: false,
        }
    }
}

// ===== COLOR BLEND =====

/// Blend factor for color blending equations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
}

/// Blend operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendOp {
    Add,
    Subtract,
    ReverseSubtract,
    Min,
    Max,
}

/// Blend state of one color attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorBlendAttachment {
    pub blend_enable: bool,
    pub src_color_factor: BlendFactor,
    pub dst_color_factor: BlendFactor,
    pub color_blend_op: BlendOp,
    pub src_alpha_factor: BlendFactor,
    pub dst_alpha_factor: BlendFactor,
    pub alpha_blend_op: BlendOp,
}

impl ColorBlendAttachment {
    /// Source overwrites destination
    pub const OVERRIDE_BLEND: Self = Self {
        blend_enable: false,
        src_color_factor: BlendFactor::One,
        dst_color_factor: BlendFactor::Zero,
        color_blend_op: BlendOp::Add,
        src_alpha_factor: BlendFactor::One,
        dst_alpha_factor: BlendFactor::Zero,
        alpha_blend_op: BlendOp::Add,
    };

    /// Classic "over" compositing: src * a + dst * (1 - a)
    pub const ALPHA_BLEND: Self = Self {
        blend_enable: true,
        src_color_factor: BlendFactor::SrcAlpha,
        dst_color_factor: BlendFactor::OneMinusSrcAlpha,
        color_blend_op: BlendOp::Add,
        src_alpha_factor: BlendFactor::SrcAlpha,
        dst_alpha_factor: BlendFactor::OneMinusSrcAlpha,
        alpha_blend_op: BlendOp::Add,
    };

    /// src + dst
    pub const ADDITIVE_BLEND: Self = Self {
        blend_enable: true,
        src_color_factor: BlendFactor::SrcAlpha,
        dst_color_factor: BlendFactor::One,
        color_blend_op: BlendOp::Add,
        src_alpha_factor: BlendFactor::SrcAlpha,
        dst_alpha_factor: BlendFactor::One,
        alpha_blend_op: BlendOp::Add,
    };
}

impl Default for ColorBlendAttachment {
    fn default() -> Self {
        Self::OVERRIDE_BLEND
    }
}

/// Blend state of all color attachments
#[derive(Debug, Clone, PartialEq)]
pub struct BlendState {
    /// Constant blend color
    pub blend_constant: [f32; 4],
    /// One entry per color attachment
    pub attachments: Vec<ColorBlendAttachment>,
}

impl BlendState {
    /// One opaque attachment
    pub fn single_override() -> Self {
        Self {
            blend_constant: [0.0; 4],
            attachments: vec![ColorBlendAttachment::OVERRIDE_BLEND],
        }
    }

    /// One alpha-blended attachment
    pub fn single_alpha_blend() -> Self {
        Self {
            blend_constant: [0.0; 4],
            attachments: vec![ColorBlendAttachment::ALPHA_BLEND],
        }
    }

    /// True if any attachment uses the alpha-blend equation
    pub fn has_alpha_blend(&self) -> bool {
        self.attachments.contains(&ColorBlendAttachment::ALPHA_BLEND)
    }
}

impl Default for BlendState {
    fn default() -> Self {
        Self::single_override()
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
