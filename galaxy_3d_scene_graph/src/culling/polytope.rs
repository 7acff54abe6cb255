/// Polytope - convex culling volume made of inward-facing planes.
///
/// Besides the plane list, the polytope keeps a stack of "active plane"
/// bit masks. Bit `i` set means plane `i` still has to be tested. When a
/// parent volume is found fully inside a plane, that plane's bit is cleared
/// in the result mask; pushing the result mask before descending lets every
/// descendant skip the plane entirely (plane coherency). Popping restores
/// the parent's mask when the traversal climbs back up.

use glam::{Mat4, Vec4};
use crate::bounding::{BoundingBox, BoundingSphere};
use crate::culling::{CullTest, Plane};
use crate::error::Result;
use crate::engine_bail;

/// Maximum number of planes (one bit each in the mask)
pub const MAX_PLANES: usize = 32;

/// Plane indices after `set_view_projection`
pub const PLANE_NEAR: usize = 0;
pub const PLANE_FAR: usize = 1;
pub const PLANE_LEFT: usize = 2;
pub const PLANE_RIGHT: usize = 3;
pub const PLANE_TOP: usize = 4;
pub const PLANE_BOTTOM: usize = 5;

/// Convex clipping volume with a coherency mask stack
#[derive(Debug, Clone, Default)]
pub struct Polytope {
    planes: Vec<Plane>,
    result_mask: u32,
    mask_stack: Vec<u32>,
    plane_tests: u64,
}

impl Polytope {
    /// Empty polytope (no planes, empty mask stack: contains everything)
    pub fn new() -> Self {
        Self::default()
    }

    /// Six-plane frustum with its mask already set up
    pub fn from_view_projection(view_projection: &Mat4) -> Self {
        let mut polytope = Self::new();
        polytope.set_view_projection(view_projection);
        polytope
    }

    /// Replace the planes with the six frustum planes of `view_projection`
    /// and restart the mask stack.
    ///
    /// Gribb & Hartmann extraction from the matrix rows, stored in the order
    /// NEAR, FAR, LEFT, RIGHT, TOP, BOTTOM, each normalized. Clip depth is
    /// expected in [0, 1] (glam's `perspective_rh` / `orthographic_rh`).
    pub fn set_view_projection(&mut self, view_projection: &Mat4) {
        let row0 = view_projection.row(0);
        let row1 = view_projection.row(1);
        let row2 = view_projection.row(2);
        let row3 = view_projection.row(3);

        let coefficients: [Vec4; 6] = [
            row2,        // near
            row3 - row2, // far
            row3 + row0, // left
            row3 - row0, // right
            row3 - row1, // top
            row3 + row1, // bottom
        ];

        self.planes.clear();
        self.planes.extend(coefficients.iter().map(|c| Plane::from_coefficients(*c)));
        self.setup_mask();
    }

    /// Append a plane. Does not touch the mask stack; call `setup_mask`
    /// once all planes are in.
    pub fn add_plane(&mut self, plane: Plane) -> Result<()> {
        if self.planes.len() >= MAX_PLANES {
            engine_bail!(
                "galaxy3d::Polytope",
                InvalidArgument,
                "polytope already holds {} planes (max {})",
                self.planes.len(),
                MAX_PLANES
            );
        }
        self.planes.push(plane);
        Ok(())
    }

    /// Remove every plane and mask
    pub fn clear(&mut self) {
        self.planes.clear();
        self.mask_stack.clear();
        self.result_mask = 0;
    }

    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    /// Mask with one bit set per plane
    pub fn full_mask(&self) -> u32 {
        let count = self.planes.len();
        if count >= MAX_PLANES {
            u32::MAX
        } else {
            (1u32 << count) - 1
        }
    }

    /// Restart the mask stack with every plane active
    pub fn setup_mask(&mut self) {
        self.result_mask = self.full_mask();
        self.mask_stack.clear();
        self.mask_stack.push(self.result_mask);
    }

    /// Mask left by the last containment test
    pub fn result_mask(&self) -> u32 {
        self.result_mask
    }

    /// Mask on top of the stack (0 when empty)
    pub fn current_mask(&self) -> u32 {
        self.mask_stack.last().copied().unwrap_or(0)
    }

    pub fn mask_depth(&self) -> usize {
        self.mask_stack.len()
    }

    /// Push the result of the last test so descendants inherit it
    pub fn push_current_mask(&mut self) {
        self.mask_stack.push(self.result_mask);
    }

    pub fn pop_current_mask(&mut self) {
        self.mask_stack.pop();
    }

    /// Test a box against the planes still active in the top mask.
    ///
    /// Returns false as soon as one plane has the box entirely outside.
    /// Planes with the box entirely inside are cleared from the result mask.
    /// An empty mask stack or an empty box is never excluded.
    pub fn contains(&mut self, bb: &BoundingBox) -> bool {
        let Some(&mask) = self.mask_stack.last() else {
            return true;
        };
        self.result_mask = mask;

        if !bb.valid() {
            return true;
        }

        let mut selector = 1u32;
        for plane in &self.planes {
            if self.result_mask & selector != 0 {
                self.plane_tests += 1;
                match plane.classify_box(bb) {
                    CullTest::Outside => return false,
                    CullTest::Inside => self.result_mask ^= selector,
                    CullTest::Partial => {}
                }
            }
            selector = selector.wrapping_shl(1);
        }

        true
    }

    /// `contains` for a box expressed in the space `model` maps into the
    /// plane space (typically model-to-world with world-space planes).
    pub fn contains_transformed(&mut self, bb: &BoundingBox, model: &Mat4) -> bool {
        if !bb.valid() {
            return self.contains(bb);
        }
        let transformed = bb.transformed(model);
        self.contains(&transformed)
    }

    /// Sphere variant of `contains`, same mask semantics
    pub fn contains_sphere(&mut self, sphere: &BoundingSphere) -> bool {
        let Some(&mask) = self.mask_stack.last() else {
            return true;
        };
        self.result_mask = mask;

        if !sphere.valid() {
            return true;
        }

        let mut selector = 1u32;
        for plane in &self.planes {
            if self.result_mask & selector != 0 {
                self.plane_tests += 1;
                match plane.classify_sphere(sphere) {
                    CullTest::Outside => return false,
                    CullTest::Inside => self.result_mask ^= selector,
                    CullTest::Partial => {}
                }
            }
            selector = selector.wrapping_shl(1);
        }

        true
    }

    /// 3-way classification against every plane, ignoring the masks
    pub fn classify(&self, bb: &BoundingBox) -> CullTest {
        if !bb.valid() {
            return CullTest::Inside;
        }

        let mut all_inside = true;
        for plane in &self.planes {
            match plane.classify_box(bb) {
                CullTest::Outside => return CullTest::Outside,
                CullTest::Partial => all_inside = false,
                CullTest::Inside => {}
            }
        }

        if all_inside { CullTest::Inside } else { CullTest::Partial }
    }

    /// Number of individual plane tests run by `contains*` since the last reset
    pub fn plane_test_count(&self) -> u64 {
        self.plane_tests
    }

    pub fn reset_plane_test_count(&mut self) {
        self.plane_tests = 0;
    }
}

#[cfg(test)]
#[path = "polytope_tests.rs"]
mod tests;
