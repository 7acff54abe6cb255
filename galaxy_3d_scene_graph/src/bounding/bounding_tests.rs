use glam::{Mat4, Quat, Vec3};
use super::*;

fn bb(min: [f32; 3], max: [f32; 3]) -> BoundingBox {
    BoundingBox::new(Vec3::from(min), Vec3::from(max))
}

// ============================================================================
// BoundingBox
// ============================================================================

#[test]
fn test_empty_box_is_invalid() {
    assert!(!BoundingBox::EMPTY.valid());
    assert!(!BoundingBox::default().valid());
    assert!(bb([0.0; 3], [0.0; 3]).valid());
}

#[test]
fn test_empty_expanded_adopts_operand() {
    let mut target = BoundingBox::EMPTY;
    let operand = bb([-1.0, 2.0, 3.0], [4.0, 5.0, 6.0]);
    target.expand_by_box(&operand);
    assert_eq!(target, operand);
}

#[test]
fn test_empty_union_empty_is_empty() {
    let mut target = BoundingBox::EMPTY;
    target.expand_by_box(&BoundingBox::EMPTY);
    assert!(!target.valid());
    assert_eq!(target, BoundingBox::EMPTY);
}

#[test]
fn test_expand_by_box_is_componentwise_min_max() {
    let mut target = bb([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
    target.expand_by_box(&bb([-2.0, 0.5, 0.5], [0.5, 3.0, 0.5]));
    assert_eq!(target, bb([-2.0, 0.0, 0.0], [1.0, 3.0, 1.0]));
}

#[test]
fn test_expand_order_independent() {
    let inputs = [
        bb([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]),
        bb([-5.0, 2.0, 0.0], [-4.0, 3.0, 9.0]),
        BoundingBox::EMPTY,
        bb([3.0, -7.0, 1.0], [3.5, -6.0, 2.0]),
    ];

    let mut forward = BoundingBox::EMPTY;
    for b in inputs.iter() {
        forward.expand_by_box(b);
    }

    let mut backward = BoundingBox::EMPTY;
    for b in inputs.iter().rev() {
        backward.expand_by_box(b);
    }

    // ((a ∪ b) ∪ c) vs (a ∪ (b ∪ c))
    let grouped = inputs[0].union(&inputs[1].union(&inputs[2].union(&inputs[3])));

    assert_eq!(forward, backward);
    assert_eq!(forward, grouped);
    assert_eq!(forward, bb([-5.0, -7.0, 0.0], [3.5, 3.0, 9.0]));
}

#[test]
fn test_expand_by_point_and_from_points() {
    let points = [Vec3::new(1.0, 2.0, 3.0), Vec3::new(-1.0, 0.0, 5.0)];
    let from = BoundingBox::from_points(points);
    assert_eq!(from, bb([-1.0, 0.0, 3.0], [1.0, 2.0, 5.0]));
    assert!(!BoundingBox::from_points(std::iter::empty()).valid());
}

#[test]
fn test_expand_by_sphere() {
    let mut target = BoundingBox::EMPTY;
    target.expand_by_sphere(&BoundingSphere::new(Vec3::new(1.0, 0.0, 0.0), 2.0));
    assert_eq!(target, bb([-1.0, -2.0, -2.0], [3.0, 2.0, 2.0]));

    target.expand_by_sphere(&BoundingSphere::EMPTY);
    assert_eq!(target, bb([-1.0, -2.0, -2.0], [3.0, 2.0, 2.0]));
}

#[test]
fn test_center_and_radius() {
    let b = bb([0.0, 0.0, 0.0], [2.0, 2.0, 2.0]);
    assert_eq!(b.center(), Vec3::ONE);
    assert!((b.radius() - 3.0f32.sqrt()).abs() < 1e-6);
}

#[test]
fn test_corners() {
    let b = bb([0.0, 0.0, 0.0], [1.0, 2.0, 3.0]);
    assert_eq!(b.corner(0), Vec3::ZERO);
    assert_eq!(b.corner(7), Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(b.corner(5), Vec3::new(1.0, 0.0, 3.0));
}

#[test]
fn test_intersect_and_contains() {
    let a = bb([0.0, 0.0, 0.0], [2.0, 2.0, 2.0]);
    let b = bb([1.0, 1.0, 1.0], [3.0, 3.0, 3.0]);
    let far = bb([10.0, 10.0, 10.0], [11.0, 11.0, 11.0]);

    assert!(a.intersects(&b));
    assert!(!a.intersects(&far));
    assert_eq!(a.intersect(&b), bb([1.0, 1.0, 1.0], [2.0, 2.0, 2.0]));
    assert!(!a.intersect(&far).valid());

    assert!(a.contains(&bb([0.5, 0.5, 0.5], [1.0, 1.0, 1.0])));
    assert!(!a.contains(&b));
    assert!(a.contains_point(Vec3::splat(2.0)));
    assert!(!BoundingBox::EMPTY.contains_point(Vec3::ZERO));
}

#[test]
fn test_transformed_translation_and_rotation() {
    let b = bb([-1.0, -1.0, -1.0], [1.0, 1.0, 1.0]);

    let moved = b.transformed(&Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)));
    assert_eq!(moved, bb([9.0, -1.0, -1.0], [11.0, 1.0, 1.0]));

    let rotated = bb([0.0, 0.0, 0.0], [2.0, 1.0, 1.0])
        .transformed(&Mat4::from_quat(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2)));
    assert!((rotated.min - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-5);
    assert!((rotated.max - Vec3::new(0.0, 2.0, 1.0)).length() < 1e-5);

    assert!(!BoundingBox::EMPTY.transformed(&Mat4::IDENTITY).valid());
}

// ============================================================================
// BoundingSphere
// ============================================================================

#[test]
fn test_sphere_from_box_contains_box() {
    let b = bb([-1.0, -2.0, -3.0], [3.0, 2.0, 1.0]);
    let s = BoundingSphere::from_box(&b);

    assert_eq!(s.center, b.center());
    assert!((s.radius - b.radius()).abs() < 1e-6);
    for i in 0..8 {
        let d = (b.corner(i) - s.center).length();
        assert!(d <= s.radius + 1e-5);
    }

    assert!(!BoundingSphere::from_box(&BoundingBox::EMPTY).valid());
}

#[test]
fn test_sphere_expand_by_point() {
    let mut s = BoundingSphere::EMPTY;
    s.expand_by_point(Vec3::ZERO);
    assert_eq!(s, BoundingSphere::new(Vec3::ZERO, 0.0));

    s.expand_by_point(Vec3::new(2.0, 0.0, 0.0));
    assert!((s.radius - 1.0).abs() < 1e-6);
    assert!((s.center - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-6);
}

#[test]
fn test_sphere_expand_by_sphere() {
    let mut s = BoundingSphere::new(Vec3::ZERO, 1.0);

    // already inside
    s.expand_by_sphere(&BoundingSphere::new(Vec3::new(0.2, 0.0, 0.0), 0.5));
    assert_eq!(s, BoundingSphere::new(Vec3::ZERO, 1.0));

    // disjoint
    s.expand_by_sphere(&BoundingSphere::new(Vec3::new(4.0, 0.0, 0.0), 1.0));
    assert!((s.radius - 3.0).abs() < 1e-6);
    assert!((s.center - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-6);

    // swallowed by operand
    s.expand_by_sphere(&BoundingSphere::new(Vec3::ZERO, 100.0));
    assert_eq!(s, BoundingSphere::new(Vec3::ZERO, 100.0));

    // empty operand is a no-op
    s.expand_by_sphere(&BoundingSphere::EMPTY);
    assert_eq!(s.radius, 100.0);
}

#[test]
fn test_sphere_expand_by_box() {
    let mut s = BoundingSphere::EMPTY;
    let b = bb([0.0, 0.0, 0.0], [2.0, 2.0, 2.0]);
    s.expand_by_box(&b);
    assert_eq!(s, BoundingSphere::from_box(&b));
}

#[test]
fn test_sphere_queries() {
    let a = BoundingSphere::new(Vec3::ZERO, 1.0);
    let b = BoundingSphere::new(Vec3::new(1.5, 0.0, 0.0), 1.0);
    let c = BoundingSphere::new(Vec3::new(5.0, 0.0, 0.0), 1.0);

    assert!(a.contains_point(Vec3::new(0.5, 0.5, 0.0)));
    assert!(!a.contains_point(Vec3::new(2.0, 0.0, 0.0)));
    assert!(a.intersects(&b));
    assert!(!a.intersects(&c));
    assert!(!a.intersects(&BoundingSphere::EMPTY));
}
