use std::sync::Arc;
use glam::Vec3;
use crate::error::Error;
use crate::graphics_device::mock_graphics_device::{MockCommand, MockCommandList, MockGraphicsDevice};
use crate::graphics_device::{IndexType, PrimitiveTopology};
use crate::scene_graph::{DrawRange, MeshGeometry, VertexPosition};
use super::*;

fn triangle_pair() -> Drawable {
    let mesh = MeshGeometry::new(
        "pair",
        vec![
            VertexPosition::new(0.0, 0.0, 0.0),
            VertexPosition::new(1.0, 0.0, 0.0),
            VertexPosition::new(0.0, 1.0, 0.0),
            VertexPosition::new(5.0, 5.0, 5.0),
            VertexPosition::new(6.0, 5.0, 5.0),
            VertexPosition::new(5.0, 6.0, 5.0),
        ],
        vec![0, 1, 2, 3, 4, 5],
    );
    let mut drawable = Drawable::new("pair", mesh);
    drawable.add_primitive_set(PrimitiveSet::draw_elements(PrimitiveTopology::TriangleList, 0, 3, 0));
    drawable.add_primitive_set(PrimitiveSet::draw_elements(PrimitiveTopology::TriangleList, 3, 3, 0));
    drawable
}

// ============================================================================
// Bounds
// ============================================================================

#[test]
fn test_bound_is_union_of_primitive_sets() {
    let drawable = triangle_pair();
    let bb = drawable.compute_bounding_box();
    assert_eq!(bb.min, Vec3::ZERO);
    assert_eq!(bb.max, Vec3::new(6.0, 6.0, 5.0));

    let second = drawable.primitive_set_bounding_box(1).unwrap();
    assert_eq!(second.min, Vec3::splat(5.0));
    assert!(drawable.primitive_set_bounding_box(2).is_none());
}

#[test]
fn test_primitive_set_bound_is_cached_until_dirtied() {
    let mut drawable = triangle_pair();
    drawable.primitive_set_bounding_box(0);
    assert!(drawable.primitive_sets()[0].bound_is_fresh());

    drawable.primitive_set_mut(0).unwrap().set_range(DrawRange::DrawElements {
        first_index: 0,
        index_count: 6,
        base_vertex: 0,
    });
    assert!(!drawable.primitive_sets()[0].bound_is_fresh());
    assert_eq!(drawable.primitive_set_bounding_box(0).unwrap().max, Vec3::new(6.0, 6.0, 5.0));
}

#[test]
fn test_primitive_set_initial_bound_and_callback() {
    let mut drawable = triangle_pair();
    {
        let pset = drawable.primitive_set_mut(0).unwrap();
        pset.set_initial_bound(crate::bounding::BoundingBox::new(Vec3::splat(-3.0), Vec3::splat(-2.0)));
    }
    assert_eq!(drawable.primitive_set_bounding_box(0).unwrap().min, Vec3::splat(-3.0));
    assert_eq!(drawable.primitive_set_bounding_box(0).unwrap().max, Vec3::new(1.0, 1.0, 0.0));

    drawable.primitive_set_mut(1).unwrap().set_compute_bound_callback(Some(Arc::new(|_: &PrimitiveSet, _: &dyn DrawableGeometry| {
        crate::bounding::BoundingBox::new(Vec3::splat(100.0), Vec3::splat(101.0))
    })));
    assert_eq!(drawable.primitive_set_bounding_box(1).unwrap().max, Vec3::splat(101.0));
}

#[test]
fn test_primitive_set_copy_on_write() {
    let mut drawable = triangle_pair();
    let held_by_frame = Arc::clone(&drawable.primitive_sets()[0]);

    drawable.primitive_set_mut(0).unwrap().set_topology(PrimitiveTopology::LineList);

    assert_eq!(held_by_frame.topology(), PrimitiveTopology::TriangleList);
    assert_eq!(drawable.primitive_sets()[0].topology(), PrimitiveTopology::LineList);
}

#[test]
fn test_primitive_set_index_out_of_range() {
    let mut drawable = triangle_pair();
    assert!(matches!(drawable.primitive_set_mut(5), Err(Error::InvalidArgument(_))));
    assert!(matches!(drawable.remove_primitive_set(2), Err(Error::InvalidArgument(_))));

    let removed = drawable.remove_primitive_set(0).unwrap();
    assert_eq!(removed.range().count(), 3);
    assert_eq!(drawable.num_primitive_sets(), 1);
}

#[test]
fn test_set_geometry_dirties_primitive_sets() {
    let mut drawable = triangle_pair();
    drawable.compute_bounding_box();

    drawable.set_geometry(MeshGeometry::new(
        "moved",
        (0..6).map(|i| VertexPosition::new(i as f32, -1.0, -1.0)).collect(),
        vec![0, 1, 2, 3, 4, 5],
    ));
    assert!(!drawable.primitive_sets()[0].bound_is_fresh());
    let bb = drawable.compute_bounding_box();
    assert_eq!(bb.min, Vec3::new(0.0, -1.0, -1.0));
    assert_eq!(bb.max, Vec3::new(5.0, -1.0, -1.0));
}

// ============================================================================
// Device buffers and draw
// ============================================================================

#[test]
fn test_configure_device_buffers_exposes_handles() {
    let drawable = triangle_pair();
    assert!(drawable.vertex_buffer().is_none());

    let mut device = MockGraphicsDevice::new();
    drawable.configure_device_buffers(&mut device).unwrap();
    drawable.configure_device_buffers(&mut device).unwrap();

    assert_eq!(device.buffer_count(), 2);
    assert_eq!(drawable.vertex_buffer().unwrap().size(), 6 * 12);
    assert_eq!(drawable.index_buffer().unwrap().size(), 6 * 4);
}

#[test]
fn test_set_geometry_uploads_new_data() {
    let mut drawable = triangle_pair();
    let mut device = MockGraphicsDevice::new();
    drawable.configure_device_buffers(&mut device).unwrap();
    assert_eq!(drawable.compute_bounding_box().max, Vec3::new(6.0, 6.0, 5.0));

    drawable.set_geometry(MeshGeometry::new(
        "pair",
        vec![
            VertexPosition::new(-2.0, 0.0, 0.0),
            VertexPosition::new(0.0, 0.0, 0.0),
            VertexPosition::new(0.0, 2.0, 0.0),
        ],
        vec![0, 1, 2, 2, 1, 0],
    ));
    assert!(drawable.vertex_buffer().is_none());
    assert!(drawable.index_buffer().is_none());

    drawable.configure_device_buffers(&mut device).unwrap();
    assert_eq!(device.buffer_count(), 4);
    assert_eq!(drawable.vertex_buffer().unwrap().size(), 3 * 12);
    assert_eq!(drawable.index_buffer().unwrap().size(), 6 * 4);

    let bb = drawable.compute_bounding_box();
    assert_eq!(bb.min, Vec3::new(-2.0, 0.0, 0.0));
    assert_eq!(bb.max, Vec3::new(0.0, 2.0, 0.0));
}

#[test]
fn test_default_draw_binds_and_draws_each_set() {
    let drawable = triangle_pair();
    let mut device = MockGraphicsDevice::new();
    drawable.configure_device_buffers(&mut device).unwrap();

    let mut cmd = MockCommandList::new();
    drawable.draw(&mut cmd).unwrap();

    assert_eq!(
        cmd.commands,
        vec![
            MockCommand::BindVertexBuffer { size: 72 },
            MockCommand::BindIndexBuffer { size: 24, index_type: IndexType::U32 },
            MockCommand::DrawIndexed { index_count: 3, first_index: 0, vertex_offset: 0 },
            MockCommand::DrawIndexed { index_count: 3, first_index: 3, vertex_offset: 0 },
        ]
    );
}

#[test]
fn test_draw_arrays_set() {
    let mut drawable = Drawable::new(
        "points",
        MeshGeometry::new("points", vec![VertexPosition::new(0.0, 0.0, 0.0); 4], Vec::new()),
    );
    drawable.add_primitive_set(PrimitiveSet::draw_arrays(PrimitiveTopology::PointList, 1, 3));

    let mut cmd = MockCommandList::new();
    drawable.draw(&mut cmd).unwrap();
    assert_eq!(cmd.commands, vec![MockCommand::Draw { vertex_count: 3, first_vertex: 1 }]);
}

#[test]
fn test_draw_callback_replaces_default() {
    let mut drawable = triangle_pair();
    drawable.set_draw_callback(Some(Arc::new(|cmd: &mut dyn CommandList, d: &Drawable| {
        cmd.draw(d.num_primitive_sets() as u32, 99)
    })));

    let mut cmd = MockCommandList::new();
    drawable.draw(&mut cmd).unwrap();
    assert_eq!(cmd.commands, vec![MockCommand::Draw { vertex_count: 2, first_vertex: 99 }]);
}
