/// Transform - group specialization carrying a local matrix.

use glam::Mat4;

/// How a transform combines with the accumulated parent matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferenceFrame {
    /// Compose with the parent: world = parent * local
    #[default]
    Relative,
    /// Replace the parent: world = local
    Absolute,
}

/// Local matrix and reference frame of a Transform node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub matrix: Mat4,
    pub reference_frame: ReferenceFrame,
}

impl Transform {
    pub fn new(matrix: Mat4) -> Self {
        Self { matrix, reference_frame: ReferenceFrame::Relative }
    }

    pub fn absolute(matrix: Mat4) -> Self {
        Self { matrix, reference_frame: ReferenceFrame::Absolute }
    }

    /// Fold this transform into an accumulated local-to-world matrix
    pub fn compute_local_to_world_matrix(&self, matrix: &mut Mat4) {
        match self.reference_frame {
            ReferenceFrame::Relative => *matrix = *matrix * self.matrix,
            ReferenceFrame::Absolute => *matrix = self.matrix,
        }
    }

    /// Fold this transform into an accumulated world-to-local matrix
    pub fn compute_world_to_local_matrix(&self, matrix: &mut Mat4) {
        let inverse = self.matrix.inverse();
        match self.reference_frame {
            ReferenceFrame::Relative => *matrix = inverse * *matrix,
            ReferenceFrame::Absolute => *matrix = inverse,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY)
    }
}
