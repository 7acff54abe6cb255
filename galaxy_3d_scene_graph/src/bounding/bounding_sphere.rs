/// Bounding sphere with an explicit empty state (negative radius).

use glam::Vec3;
use super::BoundingBox;

/// Bounding sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    /// Negative for the empty sphere
    pub radius: f32,
}

impl BoundingSphere {
    /// The empty sphere
    pub const EMPTY: Self = Self { center: Vec3::ZERO, radius: -1.0 };

    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Sphere through the corners of `bb` (empty for an empty box)
    pub fn from_box(bb: &BoundingBox) -> Self {
        if bb.valid() {
            Self { center: bb.center(), radius: bb.radius() }
        } else {
            Self::EMPTY
        }
    }

    /// Reset to empty
    pub fn init(&mut self) {
        *self = Self::EMPTY;
    }

    pub fn valid(&self) -> bool {
        self.radius >= 0.0
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Grow (moving the center) until `point` is enclosed
    pub fn expand_by_point(&mut self, point: Vec3) {
        if !self.valid() {
            self.center = point;
            self.radius = 0.0;
            return;
        }

        let delta = point - self.center;
        let distance = delta.length();
        if distance > self.radius {
            let grow = (distance - self.radius) * 0.5;
            self.center += delta * (grow / distance);
            self.radius += grow;
        }
    }

    /// Smallest sphere enclosing both spheres
    pub fn expand_by_sphere(&mut self, other: &BoundingSphere) {
        if !other.valid() {
            return;
        }
        if !self.valid() {
            *self = *other;
            return;
        }

        let distance = (other.center - self.center).length();

        // other already inside self
        if distance + other.radius <= self.radius {
            return;
        }

        // self inside other
        if distance + self.radius <= other.radius {
            *self = *other;
            return;
        }

        let new_radius = (self.radius + distance + other.radius) * 0.5;
        let ratio = (new_radius - self.radius) / distance;
        self.center += (other.center - self.center) * ratio;
        self.radius = new_radius;
    }

    /// Grow to enclose the box
    pub fn expand_by_box(&mut self, bb: &BoundingBox) {
        self.expand_by_sphere(&BoundingSphere::from_box(bb));
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        self.valid() && (point - self.center).length_squared() <= self.radius * self.radius
    }

    pub fn intersects(&self, other: &BoundingSphere) -> bool {
        if !self.valid() || !other.valid() {
            return false;
        }
        let reach = self.radius + other.radius;
        (other.center - self.center).length_squared() <= reach * reach
    }
}

impl Default for BoundingSphere {
    fn default() -> Self {
        Self::EMPTY
    }
}
