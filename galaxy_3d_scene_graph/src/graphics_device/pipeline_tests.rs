/// Unit tests for pipeline descriptors (vertex layouts, blend classification)

use super::*;
use crate::graphics_device::BufferFormat;
use std::collections::HashSet;

// ============================================================================
// VERTEX LAYOUT
// ============================================================================

#[test]
fn test_interleaved_layout_offsets_and_stride() {
    let layout = VertexLayout::interleaved(&[
        BufferFormat::R32G32B32_SFLOAT,
        BufferFormat::R32G32B32_SFLOAT,
        BufferFormat::R32G32_SFLOAT,
    ]);

    assert_eq!(layout.bindings.len(), 1);
    assert_eq!(layout.bindings[0].stride, 32);
    assert_eq!(layout.attributes[0].offset, 0);
    assert_eq!(layout.attributes[1].offset, 12);
    assert_eq!(layout.attributes[2].offset, 24);
    assert_eq!(layout.attributes[2].location, 2);
}

#[test]
fn test_vertex_layout_hash_eq() {
    let a = VertexLayout::interleaved(&[BufferFormat::R32G32B32_SFLOAT]);
    let b = VertexLayout::interleaved(&[BufferFormat::R32G32B32_SFLOAT]);
    let c = VertexLayout::interleaved(&[BufferFormat::R32G32_SFLOAT]);

    let mut set = HashSet::new();
    set.insert(a.clone());
    assert!(set.contains(&b));
    assert!(!set.contains(&c));
}

#[test]
fn test_index_type_size() {
    assert_eq!(IndexType::U16.size_bytes(), 2);
    assert_eq!(IndexType::U32.size_bytes(), 4);
}

// ============================================================================
// BLEND STATE
// ============================================================================

#[test]
fn test_default_blend_state_is_opaque() {
    let state = BlendState::default();
    assert_eq!(state.attachments, vec![ColorBlendAttachment::OVERRIDE_BLEND]);
    assert!(!state.has_alpha_blend());
}

#[test]
fn test_alpha_blend_detection() {
    assert!(BlendState::single_alpha_blend().has_alpha_blend());

    let mixed = BlendState {
        blend_constant: [0.0; 4],
        attachments: vec![
            ColorBlendAttachment::OVERRIDE_BLEND,
            ColorBlendAttachment::ALPHA_BLEND,
        ],
    };
    assert!(mixed.has_alpha_blend());
}

#[test]
fn test_additive_blend_is_not_alpha_blend() {
    let additive = BlendState {
        blend_constant: [0.0; 4],
        attachments: vec![ColorBlendAttachment::ADDITIVE_BLEND],
    };
    assert!(!additive.has_alpha_blend());
}

#[test]
fn test_rasterization_and_depth_defaults() {
    let raster = RasterizationState::default();
    assert_eq!(raster.cull_mode, CullMode::Back);
    assert_eq!(raster.front_face, FrontFace::CounterClockwise);

    let depth = DepthStencilState::default();
    assert!(depth.depth_write_enable);
    assert!(!DepthStencilState::DEPTH_READ_ONLY.depth_write_enable);
}
