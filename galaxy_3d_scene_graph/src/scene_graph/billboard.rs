/// Billboard - geode specialization whose drawables turn toward the viewer.
///
/// The orientation is computed per frame by the cull visitor from the eye
/// position expressed in the billboard's local space. The resulting matrix
/// is a pure rotation about the local origin, applied before the
/// accumulated model-view matrix.

use glam::{Mat3, Mat4, Quat, Vec3};

/// How the content is rotated toward the eye
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BillboardMode {
    /// Normal points at the eye, content up follows the camera up vector
    #[default]
    PointRotEye,
    /// Normal points at the eye, content up follows `axis`
    PointRotWorld,
    /// Rotation about `axis` only (trees, light shafts)
    AxialRot,
}

/// Billboard parameters of a Billboard node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Billboard {
    pub mode: BillboardMode,
    /// Rotation axis (AxialRot) or up vector (PointRotWorld), local space
    pub axis: Vec3,
    /// Direction the content faces before rotation, local space
    pub normal: Vec3,
}

impl Billboard {
    pub fn new(mode: BillboardMode) -> Self {
        Self { mode, ..Default::default() }
    }

    pub fn with_axis(mut self, axis: Vec3) -> Self {
        self.axis = axis.normalize_or_zero();
        self
    }

    pub fn with_normal(mut self, normal: Vec3) -> Self {
        self.normal = normal.normalize_or_zero();
        self
    }

    /// Orientation matrix for one frame.
    ///
    /// # Arguments
    ///
    /// * `model_view` - Accumulated model-view matrix of the billboard node
    /// * `eye_local` - Eye position in the billboard's local space
    ///
    /// Degenerate inputs (eye at the origin, eye along the axis) give identity.
    pub fn compute_matrix(&self, model_view: &Mat4, eye_local: Vec3) -> Mat4 {
        let to_eye = eye_local.normalize_or_zero();
        if to_eye == Vec3::ZERO {
            return Mat4::IDENTITY;
        }

        match self.mode {
            BillboardMode::PointRotEye => {
                let camera_up = model_view.row(1).truncate();
                self.point_rotation(to_eye, camera_up)
            }
            BillboardMode::PointRotWorld => self.point_rotation(to_eye, self.axis),
            BillboardMode::AxialRot => self.axial_rotation(to_eye),
        }
    }

    fn point_rotation(&self, to_eye: Vec3, up: Vec3) -> Mat4 {
        let mut right = up.cross(to_eye);
        if right.length_squared() < 1e-12 {
            // up parallel to the view direction: any perpendicular will do
            right = to_eye.any_orthonormal_vector();
        }
        let right = right.normalize();
        let up = to_eye.cross(right);

        // Basis maps local +Z onto the eye direction
        let basis = Mat3::from_cols(right, up, to_eye);
        let align_normal = Quat::from_rotation_arc(self.normal, Vec3::Z);

        Mat4::from_mat3(basis * Mat3::from_quat(align_normal))
    }

    fn axial_rotation(&self, to_eye: Vec3) -> Mat4 {
        let axis = self.axis;
        let eye_projected = to_eye - axis * to_eye.dot(axis);
        let normal_projected = self.normal - axis * self.normal.dot(axis);
        if eye_projected.length_squared() < 1e-12 || normal_projected.length_squared() < 1e-12 {
            return Mat4::IDENTITY;
        }

        let angle = axis
            .dot(normal_projected.cross(eye_projected))
            .atan2(normal_projected.dot(eye_projected));

        Mat4::from_axis_angle(axis, angle)
    }
}

impl Default for Billboard {
    fn default() -> Self {
        Self {
            mode: BillboardMode::default(),
            axis: Vec3::Y,
            normal: Vec3::Z,
        }
    }
}

#[cfg(test)]
#[path = "billboard_tests.rs"]
mod tests;
