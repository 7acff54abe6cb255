/// NodeVisitor - double-dispatch traversal protocol.
///
/// `SceneGraph::accept` picks the `apply_*` method matching the node
/// variant. Every default chains toward the more general variant and ends
/// in `apply_node`, which recurses with `traverse`:
///
/// ```text
/// apply_billboard -> apply_geode -> apply_group -> apply_node -> traverse
/// apply_transform ----------------> apply_group
/// apply_drawable  ---------------------------------> apply_node
/// ```

use crate::error::Result;
use crate::scene_graph::{Node, NodeKey, NodeMask, SceneGraph};

/// Which children `traverse` visits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalMode {
    /// Do not recurse
    TraverseNone,
    /// Every child edge
    #[default]
    TraverseAllChildren,
    /// Child edges whose `active` flag is set
    TraverseActiveChildren,
}

/// State shared by every visitor: mode, mask and the current node path
#[derive(Debug, Clone)]
pub struct VisitorCore {
    pub traversal_mode: TraversalMode,
    pub traversal_mask: NodeMask,
    node_path: Vec<NodeKey>,
}

impl VisitorCore {
    pub fn new(traversal_mode: TraversalMode) -> Self {
        Self {
            traversal_mode,
            traversal_mask: NodeMask::ALL,
            node_path: Vec::new(),
        }
    }

    /// Root-first keys of the nodes currently being visited
    pub fn node_path(&self) -> &[NodeKey] {
        &self.node_path
    }

    pub fn clear_node_path(&mut self) {
        self.node_path.clear();
    }
}

impl Default for VisitorCore {
    fn default() -> Self {
        Self::new(TraversalMode::default())
    }
}

/// Scene graph visitor
pub trait NodeVisitor {
    fn core(&self) -> &VisitorCore;

    fn core_mut(&mut self) -> &mut VisitorCore;

    fn traversal_mode(&self) -> TraversalMode {
        self.core().traversal_mode
    }

    fn traversal_mask(&self) -> NodeMask {
        self.core().traversal_mask
    }

    /// `node_mask & traversal_mask != 0`
    fn valid_node_mask(&self, node: &Node) -> bool {
        node.node_mask().intersects(self.traversal_mask())
    }

    fn node_path(&self) -> &[NodeKey] {
        self.core().node_path()
    }

    fn push_onto_node_path(&mut self, key: NodeKey) {
        self.core_mut().node_path.push(key);
    }

    fn pop_from_node_path(&mut self) {
        self.core_mut().node_path.pop();
    }

    fn apply_node(&mut self, graph: &SceneGraph, key: NodeKey) -> Result<()> {
        self.traverse(graph, key)
    }

    fn apply_group(&mut self, graph: &SceneGraph, key: NodeKey) -> Result<()> {
        self.apply_node(graph, key)
    }

    fn apply_transform(&mut self, graph: &SceneGraph, key: NodeKey) -> Result<()> {
        self.apply_group(graph, key)
    }

    fn apply_geode(&mut self, graph: &SceneGraph, key: NodeKey) -> Result<()> {
        self.apply_group(graph, key)
    }

    fn apply_billboard(&mut self, graph: &SceneGraph, key: NodeKey) -> Result<()> {
        self.apply_geode(graph, key)
    }

    fn apply_drawable(&mut self, graph: &SceneGraph, key: NodeKey) -> Result<()> {
        self.apply_node(graph, key)
    }

    /// Visit the children of `key` through `SceneGraph::accept`
    fn traverse(&mut self, graph: &SceneGraph, key: NodeKey) -> Result<()> {
        graph.traverse(key, self)
    }
}

#[cfg(test)]
#[path = "visitor_tests.rs"]
mod tests;
