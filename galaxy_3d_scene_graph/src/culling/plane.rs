/// Plane - one half-space of a convex culling volume.
///
/// Stored as a unit normal and a signed distance so that for a point P,
/// `normal.dot(P) + distance` is the signed distance to the plane.
/// The normal points inward: a non-negative distance means inside.

use glam::{Vec3, Vec4};
use crate::bounding::{BoundingBox, BoundingSphere};

/// Result of a 3-way volume/plane (or volume/polytope) classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullTest {
    /// Volume lies entirely on the outer side
    Outside,
    /// Volume lies entirely on the inner side
    Inside,
    /// Volume straddles the boundary
    Partial,
}

/// Inward-facing plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal pointing toward the inside
    pub normal: Vec3,
    /// Signed distance term (the D of Ax + By + Cz + D = 0)
    pub distance: f32,
}

impl Plane {
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self { normal, distance }
    }

    /// Plane from raw (A, B, C, D) coefficients, normalized so that the
    /// normal has unit length. Degenerate coefficients are kept as-is.
    pub fn from_coefficients(coefficients: Vec4) -> Self {
        let normal = coefficients.truncate();
        let length = normal.length();
        if length > 0.0 {
            Self { normal: normal / length, distance: coefficients.w / length }
        } else {
            Self { normal, distance: coefficients.w }
        }
    }

    /// Plane through `point` with inward `normal` (normalized here)
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize_or_zero();
        Self { normal, distance: -normal.dot(point) }
    }

    /// Signed distance from the plane (positive = inside)
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }

    /// Classify a box with the positive/negative vertex test.
    ///
    /// The p-vertex is the corner furthest along the normal: if it is outside,
    /// the whole box is. The n-vertex is the opposite corner: if it is inside,
    /// the whole box is.
    pub fn classify_box(&self, bb: &BoundingBox) -> CullTest {
        let n = self.normal;

        let p_vertex = Vec3::new(
            if n.x >= 0.0 { bb.max.x } else { bb.min.x },
            if n.y >= 0.0 { bb.max.y } else { bb.min.y },
            if n.z >= 0.0 { bb.max.z } else { bb.min.z },
        );
        if self.distance_to_point(p_vertex) < 0.0 {
            return CullTest::Outside;
        }

        let n_vertex = Vec3::new(
            if n.x >= 0.0 { bb.min.x } else { bb.max.x },
            if n.y >= 0.0 { bb.min.y } else { bb.max.y },
            if n.z >= 0.0 { bb.min.z } else { bb.max.z },
        );
        if self.distance_to_point(n_vertex) < 0.0 {
            CullTest::Partial
        } else {
            CullTest::Inside
        }
    }

    pub fn classify_sphere(&self, sphere: &BoundingSphere) -> CullTest {
        let d = self.distance_to_point(sphere.center);
        if d < -sphere.radius {
            CullTest::Outside
        } else if d >= sphere.radius {
            CullTest::Inside
        } else {
            CullTest::Partial
        }
    }
}
