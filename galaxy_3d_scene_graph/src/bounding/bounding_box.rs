/// Axis-aligned bounding box with an explicit empty state.
///
/// The empty box stores min = +MAX and max = -MAX, so expanding it by any
/// valid volume simply adopts that volume's extent and the union of two
/// empty boxes stays empty.

use glam::{Mat4, Vec3};
use super::BoundingSphere;

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner (x, y, z)
    pub min: Vec3,
    /// Maximum corner (x, y, z)
    pub max: Vec3,
}

impl BoundingBox {
    /// The empty box
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::MAX),
        max: Vec3::splat(-f32::MAX),
    };

    /// Box from two corners (not reordered)
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing all points (empty for no points)
    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Self {
        let mut bb = Self::EMPTY;
        for p in points {
            bb.expand_by_point(p);
        }
        bb
    }

    /// Reset to empty
    pub fn init(&mut self) {
        *self = Self::EMPTY;
    }

    /// False for the empty box
    pub fn valid(&self) -> bool {
        self.max.x >= self.min.x && self.max.y >= self.min.y && self.max.z >= self.min.z
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half the diagonal length
    pub fn radius(&self) -> f32 {
        self.radius2().sqrt()
    }

    /// Squared half diagonal
    pub fn radius2(&self) -> f32 {
        0.25 * (self.max - self.min).length_squared()
    }

    /// Corner `index` (0..8). Bit 0 selects max.x, bit 1 max.y, bit 2 max.z.
    pub fn corner(&self, index: usize) -> Vec3 {
        Vec3::new(
            if index & 1 != 0 { self.max.x } else { self.min.x },
            if index & 2 != 0 { self.max.y } else { self.min.y },
            if index & 4 != 0 { self.max.z } else { self.min.z },
        )
    }

    pub fn expand_by_point(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Union in place. An invalid operand leaves the receiver untouched.
    pub fn expand_by_box(&mut self, other: &BoundingBox) {
        if !other.valid() {
            return;
        }
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Grow to enclose the sphere's axis-aligned extent
    pub fn expand_by_sphere(&mut self, sphere: &BoundingSphere) {
        if !sphere.valid() {
            return;
        }
        let extent = Vec3::splat(sphere.radius);
        self.min = self.min.min(sphere.center - extent);
        self.max = self.max.max(sphere.center + extent);
    }

    /// Union of two boxes
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let mut result = *self;
        result.expand_by_box(other);
        result
    }

    /// Overlap of two boxes (empty when disjoint)
    pub fn intersect(&self, other: &BoundingBox) -> BoundingBox {
        let result = BoundingBox {
            min: self.min.max(other.min),
            max: self.max.min(other.max),
        };
        if result.valid() { result } else { Self::EMPTY }
    }

    /// True if the boxes overlap or touch
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.valid() && other.valid()
            && self.min.x <= other.max.x && self.max.x >= other.min.x
            && self.min.y <= other.max.y && self.max.y >= other.min.y
            && self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// True if `other` lies entirely within `self`
    pub fn contains(&self, other: &BoundingBox) -> bool {
        self.valid() && other.valid()
            && self.min.x <= other.min.x && self.max.x >= other.max.x
            && self.min.y <= other.min.y && self.max.y >= other.max.y
            && self.min.z <= other.min.z && self.max.z >= other.max.z
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        self.valid()
            && point.x >= self.min.x && point.x <= self.max.x
            && point.y >= self.min.y && point.y <= self.max.y
            && point.z >= self.min.z && point.z <= self.max.z
    }

    /// Box enclosing this box carried through an affine matrix.
    ///
    /// Arvo's method: each matrix axis is scaled by the min/max extents and
    /// the per-component minimum / maximum is accumulated, which is exact for
    /// the transformed corners without transforming all 8 of them.
    pub fn transformed(&self, matrix: &Mat4) -> BoundingBox {
        if !self.valid() {
            return Self::EMPTY;
        }

        let translation = matrix.col(3).truncate();
        let mut new_min = translation;
        let mut new_max = translation;

        for i in 0..3 {
            let axis = matrix.col(i).truncate();
            let a = axis * self.min[i];
            let b = axis * self.max[i];
            new_min += a.min(b);
            new_max += a.max(b);
        }

        BoundingBox { min: new_min, max: new_max }
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}
