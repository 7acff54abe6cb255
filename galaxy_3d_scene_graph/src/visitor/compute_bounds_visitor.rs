/// ComputeBoundsVisitor - world-space box of every reachable drawable.

use glam::Mat4;
use crate::bounding::BoundingBox;
use crate::error::Result;
use crate::scene_graph::{NodeKey, SceneGraph};
use crate::visitor::{NodeVisitor, TraversalMode, VisitorCore};

/// Accumulates drawable bounds through transforms and reference frames
pub struct ComputeBoundsVisitor {
    core: VisitorCore,
    matrix_stack: Vec<Mat4>,
    bounding_box: BoundingBox,
}

impl ComputeBoundsVisitor {
    pub fn new() -> Self {
        Self::with_mode(TraversalMode::TraverseAllChildren)
    }

    pub fn with_mode(traversal_mode: TraversalMode) -> Self {
        Self {
            core: VisitorCore::new(traversal_mode),
            matrix_stack: vec![Mat4::IDENTITY],
            bounding_box: BoundingBox::EMPTY,
        }
    }

    /// Start over with an empty box and the identity matrix
    pub fn reset(&mut self) {
        self.matrix_stack.clear();
        self.matrix_stack.push(Mat4::IDENTITY);
        self.bounding_box = BoundingBox::EMPTY;
        self.core.clear_node_path();
    }

    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    fn current_matrix(&self) -> Mat4 {
        self.matrix_stack.last().copied().unwrap_or(Mat4::IDENTITY)
    }
}

impl Default for ComputeBoundsVisitor {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeVisitor for ComputeBoundsVisitor {
    fn core(&self) -> &VisitorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut VisitorCore {
        &mut self.core
    }

    fn apply_transform(&mut self, graph: &SceneGraph, key: NodeKey) -> Result<()> {
        let mut matrix = self.current_matrix();
        if let Some(transform) = graph.get(key)?.as_transform() {
            transform.compute_local_to_world_matrix(&mut matrix);
        }

        self.matrix_stack.push(matrix);
        let result = self.apply_group(graph, key);
        self.matrix_stack.pop();
        result
    }

    fn apply_drawable(&mut self, graph: &SceneGraph, key: NodeKey) -> Result<()> {
        let local = graph.bounding_box(key)?;
        let world = local.transformed(&self.current_matrix());
        self.bounding_box.expand_by_box(&world);
        Ok(())
    }
}
