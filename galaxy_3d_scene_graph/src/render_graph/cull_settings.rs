/// Configuration of the cull/batch visitor

use crate::scene_graph::NodeMask;
use crate::visitor::TraversalMode;

/// Cull visitor settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CullSettings {
    /// Nodes whose mask does not intersect this one are skipped with their subtree
    pub traversal_mask: NodeMask,
    pub traversal_mode: TraversalMode,
    /// When false every node passes the frustum test
    pub frustum_culling: bool,
    /// Sort each transparent state's elements farthest first after traversal
    pub sort_transparent_back_to_front: bool,
}

impl Default for CullSettings {
    fn default() -> Self {
        Self {
            traversal_mask: NodeMask::CULL,
            traversal_mode: TraversalMode::TraverseActiveChildren,
            frustum_culling: true,
            sort_transparent_back_to_front: false,
        }
    }
}
